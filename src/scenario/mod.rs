//! Pluggable user behaviour.
//!
//! The engine asks a [`ScenarioFactory`] for one [`Scenario`] per virtual
//! user and never looks inside the requests it produces.
mod steps;

#[cfg(test)]
mod tests;

use crate::error::TransportError;
use crate::http::{HttpResponse, RequestSpec};

pub use steps::StepScenario;

/// Behaviour of a single virtual user. May keep per-user state such as
/// session cookies.
pub trait Scenario: Send {
    /// The next request to issue, or `None` when there is nothing to send
    /// this iteration (the user still paces and asks again).
    fn next_request(&mut self) -> Option<RequestSpec>;

    /// Sees the result of the request returned by the last `next_request`.
    fn observe(&mut self, _result: &Result<HttpResponse, TransportError>) {}
}

/// Produces a fresh scenario instance for each virtual user.
pub trait ScenarioFactory: Send + Sync {
    fn build(&self, user_id: u64) -> Box<dyn Scenario>;
}

impl<F> ScenarioFactory for F
where
    F: Fn(u64) -> Box<dyn Scenario> + Send + Sync,
{
    fn build(&self, user_id: u64) -> Box<dyn Scenario> {
        self(user_id)
    }
}
