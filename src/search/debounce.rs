//! Owned, cancellable quiet-window timer for one search box

use std::time::Duration;
use tokio::task::JoinHandle;

use crate::generation::{Generation, Token};

/// Default quiet window between the last keystroke and the search
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Single pending timer; scheduling a new one cancels the previous.
///
/// The timer callback receives a [`Token`]. A timer aborted just after it
/// fired may still have delivered its callback, so the owner must check
/// [`Debouncer::is_current`] before acting on it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    generation: Generation,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            generation: Generation::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the timer; `on_fire` runs once the quiet window elapses
    pub fn schedule<F>(&mut self, on_fire: F) -> Token
    where
        F: FnOnce(Token) + Send + 'static,
    {
        self.abort_pending();
        let token = self.generation.issue();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(token);
        }));
        token
    }

    /// Drop the pending timer, if any
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.generation.invalidate();
    }

    /// Whether a fired timer is the latest one scheduled
    pub fn is_current(&self, token: Token) -> bool {
        self.generation.is_current(token)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_schedule_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(150));

        for _ in 0..5 {
            let fired = Arc::clone(&fired);
            debouncer.schedule(move |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::default();

        let counter = Arc::clone(&fired);
        let token = debouncer.schedule(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.is_pending());
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_current(token));
    }
}
