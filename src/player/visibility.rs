//! Auto-hide state for the on-screen transport controls.
//!
//! Every `show` hands out a ticket stamped with a fresh generation. The runtime
//! timer carries that ticket and presents it back on expiry; a ticket from an
//! older generation (superseded by a later `show`, or by teardown) is ignored.

use chrono::{DateTime, Utc};
use std::time::Duration;

pub const CONTROLS_IDLE_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ControlsVisibility {
    visible: bool,
    generation: u64,
    last_activity: Option<DateTime<Utc>>,
    torn_down: bool,
}

impl Default for ControlsVisibility {
    fn default() -> Self {
        Self {
            visible: true,
            generation: 0,
            last_activity: None,
            torn_down: false,
        }
    }
}

impl ControlsVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity
    }

    /// Marks activity. Returns the ticket the caller must schedule a hide with,
    /// or `None` once the session is gone.
    pub fn show(&mut self, now: DateTime<Utc>) -> Option<HideTicket> {
        if self.torn_down {
            return None;
        }
        self.visible = true;
        self.last_activity = Some(now);
        self.generation = self.generation.wrapping_add(1);
        Some(HideTicket(self.generation))
    }

    /// Applies an expired countdown. Returns whether the controls were hidden.
    pub fn expire(&mut self, ticket: HideTicket) -> bool {
        if self.torn_down || ticket.0 != self.generation {
            return false;
        }
        self.visible = false;
        true
    }

    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn idle_countdown_hides_controls() {
        let mut visibility = ControlsVisibility::new();
        let ticket = visibility.show(Utc::now()).unwrap();
        assert!(visibility.is_visible());
        assert!(visibility.expire(ticket));
        assert!(!visibility.is_visible());
    }

    #[test]
    fn show_before_expiry_invalidates_previous_countdown() {
        let mut visibility = ControlsVisibility::new();
        let start = Utc::now();
        let first = visibility.show(start).unwrap();
        let second = visibility.show(start + TimeDelta::seconds(2)).unwrap();

        assert!(!visibility.expire(first));
        assert!(visibility.is_visible());
        assert_eq!(
            visibility.last_activity(),
            Some(start + TimeDelta::seconds(2))
        );

        assert!(visibility.expire(second));
        assert!(!visibility.is_visible());
    }

    #[test]
    fn hidden_controls_come_back_on_activity() {
        let mut visibility = ControlsVisibility::new();
        let ticket = visibility.show(Utc::now()).unwrap();
        visibility.expire(ticket);
        visibility.show(Utc::now());
        assert!(visibility.is_visible());
    }

    #[test]
    fn teardown_drops_pending_hide_and_refuses_new_ones() {
        let mut visibility = ControlsVisibility::new();
        let ticket = visibility.show(Utc::now()).unwrap();
        visibility.teardown();
        assert!(!visibility.expire(ticket));
        assert!(visibility.show(Utc::now()).is_none());
    }
}
