use std::task::Poll;

use crate::foundation::error::CaptionResult;

/// Readiness of a [`BackendService`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendStatus {
    /// Initialization has not resolved yet.
    Loading,
    /// The backend can be used.
    Ready,
    /// Initialization failed; it will not be retried.
    Failed,
}

/// Deferred backend initialization, polled until it resolves.
pub trait BackendLoad<B> {
    /// Advance initialization.
    fn poll_load(&mut self) -> Poll<CaptionResult<B>>;
}

impl<B, F> BackendLoad<B> for F
where
    F: FnMut() -> Poll<CaptionResult<B>>,
{
    fn poll_load(&mut self) -> Poll<CaptionResult<B>> {
        self()
    }
}

enum ServiceState<B> {
    Loading(Box<dyn BackendLoad<B>>),
    Ready(B),
    Failed(String),
}

/// Owns a rendering backend and its initialization lifecycle.
///
/// Created once by the host and handed to the caption generator. Loading resolves at most once;
/// a failed load is remembered and never polled again.
pub struct BackendService<B> {
    state: ServiceState<B>,
    load_polls: u64,
}

impl<B> std::fmt::Debug for BackendService<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendService")
            .field("status", &self.status())
            .field("load_polls", &self.load_polls)
            .finish()
    }
}

impl<B> BackendService<B> {
    /// Service around an already initialized backend.
    pub fn ready(backend: B) -> Self {
        Self {
            state: ServiceState::Ready(backend),
            load_polls: 0,
        }
    }

    /// Service whose backend is produced by `loader`.
    pub fn loading(loader: impl BackendLoad<B> + 'static) -> Self {
        Self {
            state: ServiceState::Loading(Box::new(loader)),
            load_polls: 0,
        }
    }

    /// Current status without polling.
    pub fn status(&self) -> BackendStatus {
        match self.state {
            ServiceState::Loading(_) => BackendStatus::Loading,
            ServiceState::Ready(_) => BackendStatus::Ready,
            ServiceState::Failed(_) => BackendStatus::Failed,
        }
    }

    /// Poll the loader if still loading, then report status.
    pub fn poll_ready(&mut self) -> BackendStatus {
        if let ServiceState::Loading(loader) = &mut self.state {
            self.load_polls += 1;
            match loader.poll_load() {
                Poll::Pending => return BackendStatus::Loading,
                Poll::Ready(Ok(backend)) => {
                    tracing::debug!(polls = self.load_polls, "rendering backend ready");
                    self.state = ServiceState::Ready(backend);
                }
                Poll::Ready(Err(err)) => {
                    tracing::warn!(error = %err, "rendering backend failed to initialize");
                    self.state = ServiceState::Failed(err.to_string());
                }
            }
        }
        self.status()
    }

    /// Backend, once ready.
    pub fn backend(&self) -> Option<&B> {
        match &self.state {
            ServiceState::Ready(b) => Some(b),
            _ => None,
        }
    }

    /// Mutable backend, once ready.
    pub fn backend_mut(&mut self) -> Option<&mut B> {
        match &mut self.state {
            ServiceState::Ready(b) => Some(b),
            _ => None,
        }
    }

    /// Failure message of a failed load.
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            ServiceState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// How many times the loader has been polled.
    pub fn load_polls(&self) -> u64 {
        self.load_polls
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/service.rs"]
mod tests;
