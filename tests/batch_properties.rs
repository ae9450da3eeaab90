use parex::workloads::{factorial_task, Factorial};
use parex::{
    parallel_map, ExecutionMode, ExecutorConfig, ExecutorError, ParallelExecutor, Task, TaskBatch,
    TaskError,
};

const DEMO_INPUTS: [u32; 4] = [5000, 6000, 700, 8000];

fn collatz_steps(n: &u64) -> Result<u32, TaskError> {
    let mut n = *n;
    let mut steps = 0;
    while n > 1 {
        n = if n % 2 == 0 { n / 2 } else { 3 * n + 1 };
        steps += 1;
    }
    Ok(steps)
}

#[tokio::test]
async fn demo_factorials_match_sequential_values() {
    for mode in [ExecutionMode::CpuBound, ExecutionMode::IoBound] {
        let config = ExecutorConfig::default().with_mode(mode);
        let report = parallel_map(DEMO_INPUTS, factorial_task(None), config).await.unwrap();

        assert_eq!(report.len(), 4);
        for (result, n) in report.results.iter().zip(DEMO_INPUTS) {
            assert_eq!(result.input, n);
            assert_eq!(result.output(), Some(&Factorial::compute(n)));
        }
    }
}

#[tokio::test]
async fn demo_failure_handling_depends_on_fail_fast() {
    let lenient = ExecutorConfig::default().with_units(4);
    let report = parallel_map(DEMO_INPUTS, factorial_task(Some(700)), lenient).await.unwrap();
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.success_count(), 3);
    assert!(report.results[2].error().is_some());

    let strict = ExecutorConfig::default().with_units(4).with_fail_fast(true);
    match parallel_map(DEMO_INPUTS, factorial_task(Some(700)), strict).await {
        Err(ExecutorError::BatchAborted { input, .. }) => assert_eq!(input, "700"),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("batch should have been aborted"),
    }
}

#[tokio::test]
async fn outputs_equal_sequential_evaluation() {
    let inputs: Vec<u64> = (1..200).collect();
    let expected: Vec<u32> = inputs.iter().map(|n| collatz_steps(n).unwrap()).collect();

    let report = parallel_map(inputs, collatz_steps, ExecutorConfig::default().with_units(3))
        .await
        .unwrap();
    let outputs: Vec<u32> = report.outputs().unwrap().into_iter().copied().collect();

    assert_eq!(outputs, expected);
}

#[tokio::test]
async fn extra_units_do_not_change_results() {
    let inputs: Vec<u64> = vec![27, 97, 871, 6171];

    let small = parallel_map(inputs.clone(), collatz_steps, ExecutorConfig::default().with_units(2))
        .await
        .unwrap();
    let large = parallel_map(inputs.clone(), collatz_steps, ExecutorConfig::default().with_units(64))
        .await
        .unwrap();

    assert_eq!(small.into_outcomes(), large.into_outcomes());
}

#[tokio::test]
async fn single_task_batch_matches_direct_call() {
    for mode in [ExecutionMode::CpuBound, ExecutionMode::IoBound] {
        let executor = ParallelExecutor::new(ExecutorConfig::default().with_mode(mode)).unwrap();
        let mut batch = TaskBatch::new();
        batch.push(Task::new(871u64, collatz_steps));

        let report = executor.execute(batch).await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.results[0].outcome, collatz_steps(&871));
    }
}

#[tokio::test]
async fn tasks_with_distinct_functions_in_one_batch() {
    let batch: TaskBatch<String, usize> = vec![
        Task::new("alpha".to_string(), |s: &String| Ok(s.len())),
        Task::new("beta".to_string(), |s: &String| Ok(s.matches('a').count())),
        Task::new("".to_string(), |_: &String| Err(TaskError::failed("empty"))),
    ]
    .into_iter()
    .collect();

    let executor = ParallelExecutor::new(ExecutorConfig::io_bound().with_units(2)).unwrap();
    let report = executor.execute(batch).await.unwrap();

    assert_eq!(report.results[0].output(), Some(&5));
    assert_eq!(report.results[1].output(), Some(&1));
    assert_eq!(report.results[2].error(), Some(&TaskError::failed("empty")));
}

#[test]
fn units_beyond_limit_fail_setup() {
    let config = ExecutorConfig {
        units: Some(9),
        max_units: 8,
        ..ExecutorConfig::default()
    };

    assert!(matches!(ParallelExecutor::new(config), Err(ExecutorError::Setup { .. })));
}
