//! Single-shot countdown owned by one player session.

use dioxus::core::{Runtime, Task};
use dioxus::prelude::*;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
async fn idle_delay(delay: Duration) {
    tokio::time::sleep(delay).await;
}

#[cfg(target_arch = "wasm32")]
async fn idle_delay(delay: Duration) {
    gloo_timers::future::TimeoutFuture::new(delay.as_millis().min(u32::MAX as u128) as u32).await;
}

/// At most one countdown is live: scheduling cancels the previous one, and
/// dropping the timer cancels the pending one.
#[derive(Default)]
pub struct IdleTimer {
    pending: Option<Task>,
}

impl IdleTimer {
    pub fn schedule<F>(&mut self, delay: Duration, on_expire: F)
    where
        F: FnOnce() + 'static,
    {
        self.cancel();
        self.pending = Some(spawn(async move {
            idle_delay(delay).await;
            on_expire();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
    }
}

impl Drop for IdleTimer {
    fn drop(&mut self) {
        // Without a runtime the VirtualDom is gone and took its tasks with it.
        if Runtime::try_current().is_some() {
            self.cancel();
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Fired = Rc<Cell<u32>>;

    fn record(fired: &Fired, amount: u32) -> impl FnOnce() {
        let fired = fired.clone();
        move || fired.set(fired.get() + amount)
    }

    async fn run(app: fn(Fired) -> Element) -> u32 {
        let fired = Fired::default();
        let mut dom = VirtualDom::new_with_props(app, fired.clone());
        dom.rebuild_in_place();
        let _ = tokio::time::timeout(Duration::from_millis(60), dom.wait_for_work()).await;
        fired.get()
    }

    #[tokio::test]
    async fn rescheduling_replaces_the_pending_countdown() {
        fn app(fired: Fired) -> Element {
            use_hook(|| {
                let mut timer = IdleTimer::default();
                timer.schedule(Duration::from_millis(10), record(&fired, 100));
                timer.schedule(Duration::from_millis(10), record(&fired, 1));
                Rc::new(RefCell::new(timer))
            });
            rsx! {}
        }

        assert_eq!(run(app).await, 1);
    }

    #[tokio::test]
    async fn dropped_timer_never_fires() {
        fn app(fired: Fired) -> Element {
            use_hook(|| {
                let mut timer = IdleTimer::default();
                timer.schedule(Duration::from_millis(10), record(&fired, 1));
                drop(timer);
            });
            rsx! {}
        }

        assert_eq!(run(app).await, 0);
    }

    #[tokio::test]
    async fn cancelled_timer_never_fires() {
        fn app(fired: Fired) -> Element {
            use_hook(|| {
                let mut timer = IdleTimer::default();
                timer.schedule(Duration::from_millis(10), record(&fired, 1));
                timer.cancel();
                Rc::new(RefCell::new(timer))
            });
            rsx! {}
        }

        assert_eq!(run(app).await, 0);
    }
}
