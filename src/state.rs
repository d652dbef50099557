// Threshold classifier: single-sample, no hysteresis or smoothing.

use crate::models::LoadState;

/// Two ascending cut points: below `medium` is Low, below `high` is Medium,
/// everything else is High.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub medium: f64,
    pub high: f64,
}

/// CPU utilization, percent.
pub const CPU_THRESHOLDS: Thresholds = Thresholds {
    medium: 30.0,
    high: 70.0,
};

/// Target response time, seconds.
pub const RESPONSE_TIME_THRESHOLDS: Thresholds = Thresholds {
    medium: 0.5,
    high: 2.0,
};

/// Absent value classifies as Unknown, never as a numeric level.
pub fn classify(value: Option<f64>, thresholds: Thresholds) -> LoadState {
    match value {
        None => LoadState::Unknown,
        Some(v) if v < thresholds.medium => LoadState::Low,
        Some(v) if v < thresholds.high => LoadState::Medium,
        Some(_) => LoadState::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_boundaries() {
        assert_eq!(classify(Some(25.0), CPU_THRESHOLDS), LoadState::Low);
        assert_eq!(classify(Some(30.0), CPU_THRESHOLDS), LoadState::Medium);
        assert_eq!(classify(Some(50.0), CPU_THRESHOLDS), LoadState::Medium);
        assert_eq!(classify(Some(70.0), CPU_THRESHOLDS), LoadState::High);
        assert_eq!(classify(Some(75.0), CPU_THRESHOLDS), LoadState::High);
    }

    #[test]
    fn response_time_boundaries() {
        assert_eq!(
            classify(Some(0.2), RESPONSE_TIME_THRESHOLDS),
            LoadState::Low
        );
        assert_eq!(
            classify(Some(1.0), RESPONSE_TIME_THRESHOLDS),
            LoadState::Medium
        );
        assert_eq!(
            classify(Some(3.0), RESPONSE_TIME_THRESHOLDS),
            LoadState::High
        );
    }

    #[test]
    fn absent_is_unknown() {
        assert_eq!(classify(None, CPU_THRESHOLDS), LoadState::Unknown);
        assert_eq!(classify(None, RESPONSE_TIME_THRESHOLDS), LoadState::Unknown);
    }
}
