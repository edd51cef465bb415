//! Single-shot status probes and the polling loop that drives them.
//!
//! A [`StateRefresh`] implementation asks the remote service once for the
//! current state of a resource and reports a [`Refresh`]. It keeps no memory
//! between calls. [`wait_for_state`] is the caller-side loop that re-runs a
//! probe until the resource reaches a target state.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::ProviderError;

/// One observation of a remote resource.
#[derive(Debug)]
pub struct Refresh<T> {
    /// The raw response, present only when the resource was found.
    pub value: Option<T>,
    /// Provider-defined state name (e.g. `"Created"`).
    pub state: String,
    /// Set when the probe could not determine the state.
    pub error: Option<ProviderError>,
}

impl<T> Refresh<T> {
    pub fn new(value: Option<T>, state: impl Into<String>) -> Self {
        Self {
            value,
            state: state.into(),
            error: None,
        }
    }

    /// A probe that failed; the resource state is whatever `state` says.
    pub fn failed(state: impl Into<String>, error: ProviderError) -> Self {
        Self {
            value: None,
            state: state.into(),
            error: Some(error),
        }
    }

    /// Split into the `(value, state, error)` triple.
    pub fn into_parts(self) -> (Option<T>, String, Option<ProviderError>) {
        (self.value, self.state, self.error)
    }
}

/// A single-shot status probe.
pub trait StateRefresh: Send + Sync {
    /// The raw response type returned when the resource is found.
    type Value: Send;

    /// Query the remote service once.
    fn refresh(&self) -> impl Future<Output = Refresh<Self::Value>> + Send;
}

/// Settings for [`wait_for_state`].
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// States that mean "keep polling".
    pub pending: Vec<String>,
    /// States that end the wait successfully.
    pub target: Vec<String>,
    /// Overall deadline for the wait.
    pub timeout: Duration,
    /// Delay between probes.
    pub poll_interval: Duration,
    /// Number of consecutive value-less observations tolerated before
    /// giving up.
    pub not_found_checks: u32,
}

impl WaitConfig {
    /// Wait for any of the `target` states with default timings.
    pub fn new<I, S>(target: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: Vec::new(),
            target: target.into_iter().map(Into::into).collect(),
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
            not_found_checks: 20,
        }
    }

    #[must_use]
    pub fn with_pending<I, S>(mut self, pending: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending = pending.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn with_not_found_checks(mut self, checks: u32) -> Self {
        self.not_found_checks = checks;
        self
    }
}

/// Errors that end a [`wait_for_state`] loop.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The probe reported an error.
    #[error("status refresh failed in state '{state}': {source}")]
    Refresh {
        state: String,
        #[source]
        source: ProviderError,
    },

    /// The resource reached a state that is neither pending nor a target.
    #[error("unexpected state '{state}', wanted one of {target:?}")]
    UnexpectedState { state: String, target: Vec<String> },

    /// The resource was missing for too many consecutive probes.
    #[error("resource not found after {0} consecutive checks")]
    NotFound(u32),

    /// The deadline passed before a target state was seen.
    #[error("timeout after {timeout:?} waiting for one of {target:?} (last state: '{last_state}')")]
    Timeout {
        timeout: Duration,
        target: Vec<String>,
        last_state: String,
    },
}

/// Re-run `refresher` until it reports one of `config.target`.
///
/// Returns the value of the final observation, which is `None` when the
/// target state is one reported without a value (e.g. waiting for a
/// resource to disappear).
///
/// A found resource in a non-target state is only an error when
/// `config.pending` is non-empty and does not list that state; with no
/// pending states every non-target state keeps the loop polling. A timeout
/// too large to represent as an [`Instant`] means no deadline.
#[instrument(skip_all, fields(target = ?config.target))]
pub async fn wait_for_state<R: StateRefresh>(
    refresher: &R,
    config: &WaitConfig,
) -> Result<Option<R::Value>, WaitError> {
    let deadline = Instant::now().checked_add(config.timeout);
    let mut not_found_ticks = 0u32;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let Refresh {
            value,
            state,
            error,
        } = refresher.refresh().await;
        debug!(attempt, state = %state, found = value.is_some(), "status refreshed");

        if let Some(source) = error {
            warn!(state = %state, error = %source, "status refresh failed");
            return Err(WaitError::Refresh { state, source });
        }

        if config.target.contains(&state) {
            debug!(attempt, state = %state, "target state reached");
            return Ok(value);
        }

        if value.is_none() {
            not_found_ticks += 1;
            if not_found_ticks > config.not_found_checks {
                return Err(WaitError::NotFound(not_found_ticks));
            }
        } else {
            not_found_ticks = 0;
            if !config.pending.is_empty() && !config.pending.contains(&state) {
                return Err(WaitError::UnexpectedState {
                    state,
                    target: config.target.clone(),
                });
            }
        }

        let next_poll = Instant::now().checked_add(config.poll_interval);
        if deadline.is_some_and(|deadline| next_poll.is_none_or(|next| next > deadline)) {
            return Err(WaitError::Timeout {
                timeout: config.timeout,
                target: config.target.clone(),
                last_state: state,
            });
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}
