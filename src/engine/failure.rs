use std::fmt;
use std::sync::Arc;

use crate::error::TransportError;
use crate::http::HttpResponse;

type Predicate = dyn Fn(Option<u16>, Option<&TransportError>) -> bool + Send + Sync;

/// Decides whether a request attempt counts as failed.
///
/// The predicate sees the status code when a response arrived, or the
/// transport error when none did. One policy applies to every step of every
/// virtual user in a run.
#[derive(Clone)]
pub struct FailurePolicy {
    predicate: Arc<Predicate>,
    name: &'static str,
}

impl FailurePolicy {
    /// Transport errors and any non-2xx status are failures.
    #[must_use]
    pub fn non_success() -> Self {
        Self {
            predicate: Arc::new(|status, error| {
                error.is_some() || !status.is_some_and(|code| (200..300).contains(&code))
            }),
            name: "non-2xx",
        }
    }

    /// Anything other than exactly `code` is a failure.
    #[must_use]
    pub fn expect_status(code: u16) -> Self {
        Self {
            predicate: Arc::new(move |status, error| error.is_some() || status != Some(code)),
            name: "expect-status",
        }
    }

    #[must_use]
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(Option<u16>, Option<&TransportError>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            name: "custom",
        }
    }

    #[must_use]
    pub fn is_failure(&self, result: &Result<HttpResponse, TransportError>) -> bool {
        match result {
            Ok(response) => (self.predicate)(Some(response.status), None),
            Err(err) => (self.predicate)(None, Some(err)),
        }
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::non_success()
    }
}

impl fmt::Debug for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailurePolicy")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
