//! Page iterator types
//!
//! Callback signals and iterator lifecycle states.

use crate::error::{Error, Result};

/// What a callback asks the iterator to do after an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationSignal {
    /// Move on to the next item
    Continue,
    /// Stop here; `resume()` picks up at the next item
    Pause,
}

impl IterationSignal {
    /// Check if iteration should continue
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if iteration should pause
    pub fn should_pause(&self) -> bool {
        matches!(self, Self::Pause)
    }
}

impl From<bool> for IterationSignal {
    fn from(keep_going: bool) -> Self {
        if keep_going {
            Self::Continue
        } else {
            Self::Pause
        }
    }
}

/// Values a page iterator callback may return
///
/// | Return value            | Signal                  |
/// |-------------------------|-------------------------|
/// | `true` / `Continue`     | continue                |
/// | `false` / `Pause`       | pause                   |
/// | `()`                    | pause                   |
/// | `Ok(x)`                 | signal of `x`           |
/// | `Err(e)`                | error returned to caller |
///
/// A callback that returns nothing therefore runs once per `iterate()` or
/// `resume()` call.
pub trait CallbackResult {
    /// Convert into a signal, or the error the callback raised
    fn into_signal(self) -> Result<IterationSignal>;
}

impl CallbackResult for IterationSignal {
    fn into_signal(self) -> Result<IterationSignal> {
        Ok(self)
    }
}

impl CallbackResult for bool {
    fn into_signal(self) -> Result<IterationSignal> {
        Ok(IterationSignal::from(self))
    }
}

impl CallbackResult for () {
    fn into_signal(self) -> Result<IterationSignal> {
        Ok(IterationSignal::Pause)
    }
}

impl<S, E> CallbackResult for std::result::Result<S, E>
where
    S: CallbackResult,
    E: Into<Error>,
{
    fn into_signal(self) -> Result<IterationSignal> {
        match self {
            Ok(signal) => signal.into_signal(),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lifecycle of a page iterator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IteratorState {
    /// Constructed, not started
    #[default]
    Ready,
    /// Processing a page
    Running,
    /// Stopped by the callback or by an error; can be resumed
    Paused,
    /// Every page has been processed
    Complete,
}

impl IteratorState {
    /// Check if every page has been processed
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Check if the iterator is waiting to be resumed
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }
}
