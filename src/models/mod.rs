//! Data models module
//!
//! Contains trial and configuration result structures, the experiment
//! report, and the sample statistics computed over repeated trials.

pub mod result;
pub mod stats;

// Re-export commonly used types
pub use result::{ConfigurationResult, ExperimentReport, TrialResult, WorkerCounters};
pub use stats::SampleStats;

// Custom serde modules for Duration serialization
pub(crate) mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_nanos().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u128::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos as u64))
    }
}

pub(crate) mod durations_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos: Vec<u128> = durations.iter().map(Duration::as_nanos).collect();
        nanos.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = Vec::<u128>::deserialize(deserializer)?;
        Ok(nanos
            .into_iter()
            .map(|n| Duration::from_nanos(n as u64))
            .collect())
    }
}
