//! Logging Module
//!
//! Stores log through an injectable [`Logger`] handle instead of reaching for
//! ambient global state. A logger without a dispatcher falls back to whatever
//! subscriber the process installed (see [`init_tracing`]).

use std::fmt;

use tracing::{dispatcher, Dispatch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// == Logger ==
/// Log sink handed to a store at construction time.
#[derive(Clone, Default)]
pub struct Logger {
    dispatch: Option<Dispatch>,
}

impl Logger {
    /// Routes every log line of the owning store to `dispatch`.
    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    /// Logger that writes to the process-wide default subscriber.
    pub fn global() -> Self {
        Self::default()
    }

    /// Returns true when a dedicated dispatcher was injected.
    pub fn is_scoped(&self) -> bool {
        self.dispatch.is_some()
    }

    /// Runs `f` with this logger's dispatcher as the current default.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.dispatch {
            Some(dispatch) => dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}

impl From<Dispatch> for Logger {
    fn from(dispatch: Dispatch) -> Self {
        Self::new(dispatch)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("scoped", &self.is_scoped())
            .finish()
    }
}

// == Subscriber Setup ==
/// Installs the process-wide subscriber: env filter plus fmt layer.
///
/// `RUST_LOG` overrides `default_filter` when set.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
