//! Workload module
//!
//! Operation tags, workload mixes and the generator that turns a mix into a
//! shuffled operation sequence.

pub mod generator;

use serde::{Deserialize, Serialize};

use crate::{Result, SetBenchError};

// Re-export commonly used functions
pub use generator::generate;

/// Allowed distance between the sum of a mix's fractions and 1.0
pub const FRACTION_TOLERANCE: f64 = 1e-6;

/// One operation of a generated sequence. The key is drawn when the
/// operation executes, not when it is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Membership test
    Member,
    /// Insert a key that is not currently present
    Insert,
    /// Delete a random key if present
    Delete,
}

/// Relative fractions of Member, Insert and Delete operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadMix {
    /// Display name, e.g. "Case 1"
    pub name: String,
    /// Fraction of membership tests
    pub member: f64,
    /// Fraction of inserts
    pub insert: f64,
    /// Fraction of deletes
    pub delete: f64,
}

impl WorkloadMix {
    /// Create a new workload mix
    pub fn new(name: impl Into<String>, member: f64, insert: f64, delete: f64) -> Self {
        Self {
            name: name.into(),
            member,
            insert,
            delete,
        }
    }

    /// 99% Member, 0.5% Insert, 0.5% Delete
    pub fn case_1() -> Self {
        Self::new("Case 1", 0.99, 0.005, 0.005)
    }

    /// 90% Member, 5% Insert, 5% Delete
    pub fn case_2() -> Self {
        Self::new("Case 2", 0.90, 0.05, 0.05)
    }

    /// 50% Member, 25% Insert, 25% Delete
    pub fn case_3() -> Self {
        Self::new("Case 3", 0.50, 0.25, 0.25)
    }

    /// The three standard cases
    pub fn standard_cases() -> Vec<Self> {
        vec![Self::case_1(), Self::case_2(), Self::case_3()]
    }

    /// Validate that each fraction is in [0, 1] and that they sum to 1
    pub fn validate(&self) -> Result<()> {
        for (label, fraction) in [
            ("member", self.member),
            ("insert", self.insert),
            ("delete", self.delete),
        ] {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(SetBenchError::ConfigError(format!(
                    "{}: {} fraction must be between 0.0 and 1.0, got {}",
                    self.name, label, fraction
                )));
            }
        }

        let sum = self.member + self.insert + self.delete;
        if (sum - 1.0).abs() > FRACTION_TOLERANCE {
            return Err(SetBenchError::ConfigError(format!(
                "{}: fractions must sum to 1.0, got {}",
                self.name, sum
            )));
        }

        Ok(())
    }

    /// Get a human-readable description of the mix
    pub fn description(&self) -> String {
        format!(
            "Member={:.3}, Insert={:.3}, Delete={:.3}",
            self.member, self.insert, self.delete
        )
    }
}

/// Number of operations per tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCounts {
    /// Member operations
    pub member: u64,
    /// Insert operations
    pub insert: u64,
    /// Delete operations
    pub delete: u64,
}

impl OperationCounts {
    /// Per-tag counts for `m` operations under `mix`.
    ///
    /// Member and Insert counts are rounded half away from zero and clamped
    /// to the remaining budget; Delete absorbs the rounding remainder so the
    /// total is always exactly `m`.
    pub fn for_mix(m: usize, mix: &WorkloadMix) -> Self {
        let member = rounded_share(m, mix.member);
        let insert = rounded_share(m, mix.insert).min(m - member);
        let delete = m - member - insert;

        Self {
            member: member as u64,
            insert: insert as u64,
            delete: delete as u64,
        }
    }

    /// Count tags in an operation sequence
    pub fn tally(ops: &[Operation]) -> Self {
        let mut counts = Self::default();
        for op in ops {
            counts.record(*op);
        }
        counts
    }

    /// Count one operation
    pub fn record(&mut self, op: Operation) {
        match op {
            Operation::Member => self.member += 1,
            Operation::Insert => self.insert += 1,
            Operation::Delete => self.delete += 1,
        }
    }

    /// Add another set of counts to this one
    pub fn merge(&mut self, other: &Self) {
        self.member += other.member;
        self.insert += other.insert;
        self.delete += other.delete;
    }

    /// Total across all tags
    pub fn total(&self) -> u64 {
        self.member + self.insert + self.delete
    }
}

fn rounded_share(m: usize, fraction: f64) -> usize {
    let share = (m as f64 * fraction).round();
    if share <= 0.0 {
        0
    } else {
        (share as usize).min(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_cases_validate() {
        for mix in WorkloadMix::standard_cases() {
            mix.validate().unwrap();
        }
    }

    #[test]
    fn test_validate_rejects_bad_sum() {
        let mix = WorkloadMix::new("bad", 0.5, 0.3, 0.3);
        assert!(matches!(mix.validate(), Err(SetBenchError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_negative_fraction() {
        let mix = WorkloadMix::new("neg", 1.2, -0.1, -0.1);
        let err = mix.validate().unwrap_err();
        assert!(err.to_string().contains("member"));
    }

    #[test]
    fn test_counts_for_balanced_mix() {
        let counts = OperationCounts::for_mix(10_000, &WorkloadMix::case_3());
        assert_eq!(counts.member, 5000);
        assert_eq!(counts.insert, 2500);
        assert_eq!(counts.delete, 2500);
    }

    #[test]
    fn test_counts_for_read_mostly_mix() {
        let counts = OperationCounts::for_mix(10_000, &WorkloadMix::case_1());
        assert_eq!(counts.member, 9900);
        assert_eq!(counts.insert, 50);
        assert_eq!(counts.delete, 50);
    }

    #[test]
    fn test_delete_absorbs_rounding() {
        // 3 * 0.5 rounds to 2 for both Member and Insert; Insert is clamped
        let mix = WorkloadMix::new("odd", 0.5, 0.5, 0.0);
        let counts = OperationCounts::for_mix(3, &mix);
        assert_eq!(counts, OperationCounts { member: 2, insert: 1, delete: 0 });

        let thirds = WorkloadMix::new("thirds", 1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
        let counts = OperationCounts::for_mix(10, &thirds);
        assert_eq!(counts, OperationCounts { member: 3, insert: 3, delete: 4 });
    }

    #[test]
    fn test_counts_for_empty_sequence() {
        let counts = OperationCounts::for_mix(0, &WorkloadMix::case_2());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_tally_and_merge() {
        let ops = [
            Operation::Member,
            Operation::Delete,
            Operation::Member,
            Operation::Insert,
        ];
        let mut counts = OperationCounts::tally(&ops);
        assert_eq!(counts, OperationCounts { member: 2, insert: 1, delete: 1 });
        counts.merge(&OperationCounts { member: 1, insert: 0, delete: 2 });
        assert_eq!(counts.total(), 7);
    }
}
