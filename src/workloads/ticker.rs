// src/workloads/ticker.rs
use std::fmt;
use std::thread;
use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::error::TaskError;

/// Wait-dominated emitter used by the ticker demo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Emitter {
    Numbers,
    Letters,
}

impl Emitter {
    /// Lines this emitter produces, in order
    pub fn lines(&self) -> Vec<String> {
        match self {
            Emitter::Numbers => (0..5).map(|i| format!("Number: {}", i)).collect(),
            Emitter::Letters => "abcde".chars().map(|c| format!("Letter: {}", c)).collect(),
        }
    }
}

impl fmt::Display for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emitter::Numbers => write!(f, "numbers"),
            Emitter::Letters => write!(f, "letters"),
        }
    }
}

/// Task function that sleeps `delay` before printing each line.
///
/// Lines from concurrently running emitters interleave in no particular order.
pub fn ticker_task(delay: Duration) -> impl Fn(&Emitter) -> Result<Vec<String>, TaskError> + Send + Sync + 'static {
    move |emitter: &Emitter| {
        let lines = emitter.lines();
        for line in &lines {
            thread::sleep(delay);
            println!("{}", line);
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitter_lines() {
        assert_eq!(Emitter::Numbers.lines()[4], "Number: 4");
        assert_eq!(Emitter::Letters.lines(), vec![
            "Letter: a", "Letter: b", "Letter: c", "Letter: d", "Letter: e",
        ]);
    }

    #[test]
    fn test_ticker_returns_emitted_lines() {
        let task = ticker_task(Duration::ZERO);
        assert_eq!(task(&Emitter::Numbers).unwrap().len(), 5);
    }
}
