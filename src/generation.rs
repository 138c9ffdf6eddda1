//! Most-recent-request-wins bookkeeping
//!
//! Every logical slot that issues overlapping async work owns a
//! [`Generation`]. Issuing a request hands out a [`Token`]; when the work
//! completes, its result is applied only if the token is still current.
//! Completion order never matters, only issue order.

use std::fmt;
use std::sync::Arc;

/// Identifies one issued request within a [`Generation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(u64);

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic counter; only the latest issued token is current
#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token, making every earlier one stale
    pub fn issue(&mut self) -> Token {
        self.current += 1;
        Token(self.current)
    }

    /// Make every outstanding token stale without issuing a new one
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, token: Token) -> bool {
        token.0 == self.current
    }
}

/// Callback used by background tasks to hand completions back to the
/// state-owning event loop.
pub struct Emitter<E> {
    inner: Arc<dyn Fn(E) + Send + Sync>,
}

impl<E> Emitter<E> {
    pub fn new(f: impl Fn(E) + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    pub fn emit(&self, event: E) {
        (self.inner)(event)
    }
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Send + 'static> Emitter<E> {
    /// Emitter that forwards into an unbounded channel, dropping events
    /// once the receiver is gone.
    pub fn channel(tx: tokio::sync::mpsc::UnboundedSender<E>) -> Self {
        Self::new(move |event| {
            let _ = tx.send(event);
        })
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Emitter")
    }
}
