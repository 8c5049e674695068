use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Leading-edge debounce: the first trigger fires, and every trigger within
/// `window` of the last *accepted* one is dropped.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last_accepted: Option<DateTime<Utc>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// Record a trigger at `now`; returns true if it should take effect.
    pub fn accept(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_accepted {
            if now - last < self.window {
                debug!("Trigger dropped {}ms after previous", (now - last).num_milliseconds());
                return false;
            }
        }

        self.last_accepted = Some(now);
        true
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_first_trigger_fires() {
        let mut debouncer = Debouncer::new(Duration::milliseconds(300));
        assert!(debouncer.accept(t0()));
    }

    #[test]
    fn test_burst_collapses_to_one() {
        let mut debouncer = Debouncer::new(Duration::milliseconds(300));
        let fired = (0..10)
            .filter(|i| debouncer.accept(t0() + Duration::milliseconds(i * 20)))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_trigger_after_window_fires() {
        let mut debouncer = Debouncer::new(Duration::milliseconds(300));
        assert!(debouncer.accept(t0()));
        assert!(!debouncer.accept(t0() + Duration::milliseconds(299)));
        assert!(debouncer.accept(t0() + Duration::milliseconds(300)));
    }

    #[test]
    fn test_window_measured_from_accepted_trigger() {
        let mut debouncer = Debouncer::new(Duration::milliseconds(300));
        assert!(debouncer.accept(t0()));
        assert!(!debouncer.accept(t0() + Duration::milliseconds(200)));
        // Dropped triggers do not extend the window
        assert!(debouncer.accept(t0() + Duration::milliseconds(310)));
    }
}
