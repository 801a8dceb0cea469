use serde::{Deserialize, Serialize};

/// Outcome history for one prompt token.
///
/// Invariant: `successes <= attempts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub token: String,
    pub attempts: u64,
    pub successes: u64,
}

impl TelemetryRecord {
    /// Fraction of attempts in which the token showed up, `None` before the first attempt.
    pub fn manifestation_rate(&self) -> Option<f64> {
        if self.attempts == 0 {
            None
        } else {
            Some(self.successes as f64 / self.attempts as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_without_attempts() {
        let record = TelemetryRecord {
            token: "wand".into(),
            attempts: 0,
            successes: 0,
        };
        assert_eq!(record.manifestation_rate(), None);
    }

    #[test]
    fn test_rate() {
        let record = TelemetryRecord {
            token: "wand".into(),
            attempts: 4,
            successes: 1,
        };
        assert_eq!(record.manifestation_rate(), Some(0.25));
    }
}
