//! Playback position bookkeeping driven by the media element's native events.
//!
//! The clock never extrapolates between samples: what it reports is exactly the
//! last `timeupdate` / `loadedmetadata` value it was handed.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MediaClock {
    current_time: f64,
    duration: f64,
}

impl MediaClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether metadata has arrived and seeking is meaningful.
    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }

    /// Percentage of the source already played, `0.0` until the duration is known.
    pub fn progress_percent(&self) -> f64 {
        if !self.has_duration() {
            return 0.0;
        }
        (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
    }

    pub fn on_time_update(&mut self, seconds: f64) {
        if !seconds.is_finite() || seconds < 0.0 {
            return;
        }
        self.current_time = if self.has_duration() {
            seconds.min(self.duration)
        } else {
            seconds
        };
    }

    pub fn on_loaded_metadata(&mut self, duration: f64) {
        // Live or broken sources report NaN/Infinity; keep scrubbing disabled for them.
        self.duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        if self.has_duration() {
            self.current_time = self.current_time.min(self.duration);
        }
    }

    /// Seek target for a scrub bar position, `None` while the duration is unknown.
    pub fn scrub_target(&self, percent: f64) -> Option<f64> {
        if !self.has_duration() || percent.is_nan() {
            return None;
        }
        Some(percent.clamp(0.0, 100.0) / 100.0 * self.duration)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `m:ss` readout used next to the scrub bar.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_zero_until_duration_known() {
        let mut clock = MediaClock::new();
        clock.on_time_update(12.0);
        assert_eq!(clock.current_time(), 12.0);
        assert_eq!(clock.progress_percent(), 0.0);

        clock.on_loaded_metadata(48.0);
        assert_eq!(clock.progress_percent(), 25.0);
    }

    #[test]
    fn broken_metadata_keeps_scrubbing_disabled() {
        let mut clock = MediaClock::new();
        clock.on_loaded_metadata(f64::NAN);
        assert!(!clock.has_duration());
        assert_eq!(clock.scrub_target(50.0), None);

        clock.on_loaded_metadata(f64::INFINITY);
        assert_eq!(clock.scrub_target(10.0), None);
    }

    #[test]
    fn scrub_target_maps_percent_onto_duration() {
        let mut clock = MediaClock::new();
        clock.on_loaded_metadata(120.0);
        assert_eq!(clock.scrub_target(50.0), Some(60.0));
        assert_eq!(clock.scrub_target(0.0), Some(0.0));
        assert_eq!(clock.scrub_target(100.0), Some(120.0));
        assert_eq!(clock.scrub_target(140.0), Some(120.0));
        assert_eq!(clock.scrub_target(-5.0), Some(0.0));
        assert_eq!(clock.scrub_target(f64::NAN), None);
    }

    #[test]
    fn time_updates_never_exceed_duration_and_ignore_garbage() {
        let mut clock = MediaClock::new();
        clock.on_loaded_metadata(30.0);
        clock.on_time_update(31.5);
        assert_eq!(clock.current_time(), 30.0);
        assert_eq!(clock.progress_percent(), 100.0);

        clock.on_time_update(-1.0);
        clock.on_time_update(f64::NAN);
        assert_eq!(clock.current_time(), 30.0);
    }

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }
}
