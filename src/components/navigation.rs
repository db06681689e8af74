use dioxus::prelude::*;
use std::collections::VecDeque;

use crate::components::app_view::AppView;

const NAV_HISTORY_LIMIT: usize = 64;

/// The visible page plus a bounded back stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewHistory {
    current: AppView,
    back: VecDeque<AppView>,
}

impl ViewHistory {
    pub fn new(start: AppView) -> Self {
        Self {
            current: start,
            back: VecDeque::new(),
        }
    }

    pub fn current(&self) -> AppView {
        self.current
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    /// Returns false when `target` is already showing.
    pub fn push(&mut self, target: AppView) -> bool {
        if self.current == target {
            return false;
        }
        self.back.push_back(self.current);
        if self.back.len() > NAV_HISTORY_LIMIT {
            self.back.pop_front();
        }
        self.current = target;
        true
    }

    pub fn pop(&mut self) -> Option<AppView> {
        let previous = self.back.pop_back()?;
        self.current = previous;
        Some(previous)
    }
}

/// Copyable handle to the shared history, provided through context.
#[derive(Clone, Copy, PartialEq)]
pub struct Navigation {
    state: Signal<ViewHistory>,
}

impl Navigation {
    pub fn new(state: Signal<ViewHistory>) -> Self {
        Self { state }
    }

    pub fn current(&self) -> AppView {
        self.state.read().current()
    }

    pub fn navigate_to(&self, target: AppView) {
        let mut state = self.state;
        if state.peek().current() == target {
            return;
        }
        state.write().push(target);
        tracing::debug!("navigated to {target:?}");
    }

    pub fn can_go_back(&self) -> bool {
        self.state.read().can_go_back()
    }

    #[allow(clippy::let_and_return)]
    pub fn go_back(&self) -> Option<AppView> {
        let mut state = self.state;
        if !state.peek().can_go_back() {
            return None;
        }
        let previous = state.write().pop();
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigating_to_the_current_view_is_a_no_op() {
        let mut history = ViewHistory::new(AppView::Home);
        assert!(!history.push(AppView::Home));
        assert!(!history.can_go_back());
    }

    #[test]
    fn back_returns_to_the_previous_view() {
        let mut history = ViewHistory::new(AppView::Home);
        assert!(history.push(AppView::Movies));
        assert_eq!(history.current(), AppView::Movies);

        assert_eq!(history.pop(), Some(AppView::Home));
        assert_eq!(history.current(), AppView::Home);
        assert_eq!(history.pop(), None);
        assert_eq!(history.current(), AppView::Home);
    }

    #[test]
    fn back_stack_is_bounded() {
        let mut history = ViewHistory::new(AppView::Home);
        for _ in 0..NAV_HISTORY_LIMIT {
            history.push(AppView::Movies);
            history.push(AppView::Home);
        }
        assert_eq!(history.back.len(), NAV_HISTORY_LIMIT);
    }
}
