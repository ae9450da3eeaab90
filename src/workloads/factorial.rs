// src/workloads/factorial.rs
use std::fmt;
use serde::{Serialize, Serializer};
use tracing::info;

use crate::error::TaskError;

const LIMB_BASE: u64 = 1_000_000_000;
const LIMB_DIGITS: usize = 9;

/// Arbitrary-precision factorial value, stored as base 10^9 limbs (least significant first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorial {
    n: u32,
    limbs: Vec<u32>,
}

impl Factorial {
    /// Compute `n!` by repeated multiplication
    pub fn compute(n: u32) -> Self {
        let mut limbs = vec![1u32];

        for k in 2..=n as u64 {
            let mut carry = 0u64;
            for limb in limbs.iter_mut() {
                let product = *limb as u64 * k + carry;
                *limb = (product % LIMB_BASE) as u32;
                carry = product / LIMB_BASE;
            }
            while carry > 0 {
                limbs.push((carry % LIMB_BASE) as u32);
                carry /= LIMB_BASE;
            }
        }

        Self { n, limbs }
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    /// Number of decimal digits
    pub fn digit_count(&self) -> usize {
        let top = self.limbs[self.limbs.len() - 1];
        (self.limbs.len() - 1) * LIMB_DIGITS + top.to_string().len()
    }

    /// Leading decimal digits, at most `count`
    pub fn leading_digits(&self, count: usize) -> String {
        let mut digits = String::with_capacity(count + LIMB_DIGITS);
        let mut limbs = self.limbs.iter().rev();

        if let Some(top) = limbs.next() {
            digits.push_str(&top.to_string());
        }
        for limb in limbs {
            if digits.len() >= count {
                break;
            }
            digits.push_str(&format!("{:09}", limb));
        }

        digits.truncate(count);
        digits
    }

    /// One-line summary used by the CLI
    pub fn summary(&self) -> String {
        let digits = self.digit_count();
        if digits <= 40 {
            self.to_string()
        } else {
            format!("{}... ({} digits)", self.leading_digits(40), digits)
        }
    }
}

impl fmt::Display for Factorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut limbs = self.limbs.iter().rev();
        if let Some(top) = limbs.next() {
            write!(f, "{}", top)?;
        }
        for limb in limbs {
            write!(f, "{:09}", limb)?;
        }
        Ok(())
    }
}

impl Serialize for Factorial {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Task function for the factorial demo. `fail_on` makes one input fail.
pub fn factorial_task(fail_on: Option<u32>) -> impl Fn(&u32) -> Result<Factorial, TaskError> + Send + Sync + 'static {
    move |n: &u32| {
        if fail_on == Some(*n) {
            return Err(TaskError::failed(format!("factorial of {} rejected", n)));
        }

        info!("Computing factorial of {}", n);
        let result = Factorial::compute(*n);
        info!("Factorial of {} has {} digits", n, result.digit_count());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_factorials() {
        assert_eq!(Factorial::compute(0).to_string(), "1");
        assert_eq!(Factorial::compute(1).to_string(), "1");
        assert_eq!(Factorial::compute(5).to_string(), "120");
        assert_eq!(Factorial::compute(20).to_string(), "2432902008176640000");
        assert_eq!(
            Factorial::compute(25).to_string(),
            "15511210043330985984000000"
        );
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(Factorial::compute(10).digit_count(), 7);
        assert_eq!(Factorial::compute(100).digit_count(), 158);
        assert_eq!(Factorial::compute(1000).digit_count(), 2568);
    }

    #[test]
    fn test_leading_digits() {
        let f = Factorial::compute(100);
        assert_eq!(f.leading_digits(10), "9332621544");
        assert_eq!(f.to_string().len(), 158);
        assert!(f.summary().ends_with("(158 digits)"));
    }

    #[test]
    fn test_task_rejects_configured_input() {
        let task = factorial_task(Some(700));
        assert!(task(&700).is_err());
        assert_eq!(task(&6).unwrap().to_string(), "720");
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let json = serde_json::to_string(&Factorial::compute(10)).unwrap();
        assert_eq!(json, "\"3628800\"");
    }
}
