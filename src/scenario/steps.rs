use std::sync::Arc;

use crate::error::ValidationError;
use crate::http::RequestSpec;

use super::{Scenario, ScenarioFactory};

/// A fixed list of named steps, replayed in order and wrapped around.
#[derive(Clone, Debug)]
pub struct StepScenario {
    steps: Arc<[RequestSpec]>,
}

impl StepScenario {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyScenario`] when `steps` is empty.
    pub fn new(steps: Vec<RequestSpec>) -> Result<Self, ValidationError> {
        if steps.is_empty() {
            return Err(ValidationError::EmptyScenario);
        }
        Ok(Self {
            steps: Arc::from(steps),
        })
    }

    /// Single-step scenario issuing `GET path` every iteration.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            steps: Arc::from(vec![RequestSpec::get(path)]),
        }
    }

    #[must_use]
    pub fn steps(&self) -> &[RequestSpec] {
        &self.steps
    }
}

impl ScenarioFactory for StepScenario {
    fn build(&self, _user_id: u64) -> Box<dyn Scenario> {
        Box::new(StepCursor {
            steps: Arc::clone(&self.steps),
            next: 0,
        })
    }
}

struct StepCursor {
    steps: Arc<[RequestSpec]>,
    next: usize,
}

impl Scenario for StepCursor {
    fn next_request(&mut self) -> Option<RequestSpec> {
        let step = self.steps.get(self.next)?.clone();
        self.next = self
            .next
            .checked_add(1)
            .filter(|next| *next < self.steps.len())
            .unwrap_or(0);
        Some(step)
    }
}
