//! Request lifecycle: the single outcome slot and the transitions between
//! Idle, Loading, Success and Failure.
//!
//! Transitions:
//!
//! ```text
//! Idle | Success | Failure --begin--> Loading
//! Failure (with retained input) --retry--> Loading
//! Loading --complete(Ok)--> Success
//! Loading --complete(Err)--> Failure
//! Success | Failure --dismiss--> Idle
//! ```
//!
//! Anything else is ignored and leaves the state untouched.

use crate::client::{PredictError, PredictionClient};
use crate::models::{PredictionResult, PropertyAttributes};
use tracing::{debug, info, warn};

/// What the result area currently shows. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestOutcome {
    #[default]
    Idle,
    Loading,
    Success(PredictionResult),
    Failure(String),
}

impl RequestOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            RequestOutcome::Idle => "idle",
            RequestOutcome::Loading => "loading",
            RequestOutcome::Success(_) => "success",
            RequestOutcome::Failure(_) => "failure",
        }
    }
}

/// A request the orchestrator has committed to sending
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub id: u64,
    pub attributes: PropertyAttributes,
}

/// Owns the outcome slot and the input retained for retry
#[derive(Debug, Default)]
pub struct Session {
    outcome: RequestOutcome,
    last_submission: Option<PropertyAttributes>,
    current: Option<u64>,
    next_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.outcome, RequestOutcome::Loading)
    }

    /// Retry is offered only on a failure with input to replay
    pub fn can_retry(&self) -> bool {
        matches!(self.outcome, RequestOutcome::Failure(_)) && self.last_submission.is_some()
    }

    /// Start a fresh submission. Clears any shown result or error.
    ///
    /// Returns None while another request is in flight.
    pub fn begin(&mut self, attributes: PropertyAttributes) -> Option<Dispatch> {
        if self.is_loading() {
            debug!("Submission ignored, request {:?} still in flight", self.current);
            return None;
        }
        self.last_submission = Some(attributes.clone());
        Some(self.enter_loading(attributes))
    }

    /// Resend the retained input after a failure
    pub fn retry(&mut self) -> Option<Dispatch> {
        if !self.can_retry() {
            debug!("Retry ignored in state {}", self.outcome.name());
            return None;
        }
        let attributes = self.last_submission.clone()?;
        info!("Retrying last submission");
        Some(self.enter_loading(attributes))
    }

    fn enter_loading(&mut self, attributes: PropertyAttributes) -> Dispatch {
        self.next_id += 1;
        let id = self.next_id;
        self.current = Some(id);
        self.outcome = RequestOutcome::Loading;
        Dispatch { id, attributes }
    }

    /// Apply the result of a dispatched request.
    ///
    /// Only the current request may resolve Loading; anything else is stale
    /// and dropped. Returns whether the outcome changed.
    pub fn complete(&mut self, id: u64, result: Result<PredictionResult, PredictError>) -> bool {
        if !self.is_loading() || self.current != Some(id) {
            warn!("Dropping stale response for request {}", id);
            return false;
        }
        self.current = None;
        self.outcome = match result {
            Ok(prediction) => RequestOutcome::Success(prediction),
            Err(err) => {
                warn!("Prediction failed ({}): {}", err.category(), err);
                RequestOutcome::Failure(err.to_string())
            }
        };
        true
    }

    /// Close the result or error panel
    pub fn dismiss(&mut self) -> bool {
        match self.outcome {
            RequestOutcome::Success(_) | RequestOutcome::Failure(_) => {
                self.outcome = RequestOutcome::Idle;
                true
            }
            RequestOutcome::Idle | RequestOutcome::Loading => false,
        }
    }

    /// Run one dispatch to completion against a client
    pub async fn execute<C>(&mut self, client: &C, dispatch: Dispatch) -> &RequestOutcome
    where
        C: PredictionClient + ?Sized,
    {
        let result = client.predict(&dispatch.attributes).await;
        self.complete(dispatch.id, result);
        &self.outcome
    }

    /// Submit and wait for the outcome in one step
    pub async fn run<C>(&mut self, client: &C, attributes: PropertyAttributes) -> &RequestOutcome
    where
        C: PredictionClient + ?Sized,
    {
        match self.begin(attributes) {
            Some(dispatch) => self.execute(client, dispatch).await,
            None => &self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfidenceTier;
    use crate::testing::{attributes as attrs, prediction, ScriptedClient};

    #[test]
    fn begin_enters_loading_and_retains_input() {
        let mut session = Session::new();
        let dispatch = session.begin(attrs(3)).unwrap();
        assert!(session.is_loading());
        assert_eq!(dispatch.attributes, attrs(3));

        session.complete(dispatch.id, Err(PredictError::Malformed("empty".into())));
        assert_eq!(session.retry().unwrap().attributes, attrs(3));
    }

    #[test]
    fn second_submit_while_loading_is_ignored() {
        let mut session = Session::new();
        let first = session.begin(attrs(3)).unwrap();
        assert!(session.begin(attrs(4)).is_none());

        assert!(session.complete(first.id, Err(PredictError::Malformed("empty".into()))));
        assert_eq!(session.retry().unwrap().attributes, attrs(3));
    }

    #[test]
    fn stale_and_unsolicited_completions_are_dropped() {
        let mut session = Session::new();
        assert!(!session.complete(1, Ok(prediction("Alta"))));
        assert_eq!(session.outcome(), &RequestOutcome::Idle);

        let dispatch = session.begin(attrs(3)).unwrap();
        assert!(!session.complete(dispatch.id + 1, Ok(prediction("Alta"))));
        assert!(session.is_loading());
    }

    #[test]
    fn new_submission_clears_previous_outcome() {
        let mut session = Session::new();
        let d = session.begin(attrs(3)).unwrap();
        session.complete(d.id, Err(PredictError::Malformed("bad".into())));
        assert!(matches!(session.outcome(), RequestOutcome::Failure(_)));

        let d = session.begin(attrs(5)).unwrap();
        assert_eq!(session.outcome(), &RequestOutcome::Loading);
        session.complete(d.id, Ok(prediction("Média")));
        assert!(matches!(session.outcome(), RequestOutcome::Success(_)));

        session.begin(attrs(2)).unwrap();
        assert_eq!(session.outcome(), &RequestOutcome::Loading);
    }

    #[test]
    fn dismiss_returns_to_idle_from_either_panel() {
        let mut session = Session::new();
        let d = session.begin(attrs(3)).unwrap();
        session.complete(d.id, Ok(prediction("Alta")));
        assert!(session.dismiss());
        assert_eq!(session.outcome(), &RequestOutcome::Idle);

        let d = session.begin(attrs(3)).unwrap();
        session.complete(d.id, Err(PredictError::Status { status: 500, detail: None }));
        assert!(session.dismiss());
        assert_eq!(session.outcome(), &RequestOutcome::Idle);

        assert!(!session.dismiss());
        session.begin(attrs(3)).unwrap();
        assert!(!session.dismiss());
        assert!(session.is_loading());
    }

    #[test]
    fn retry_only_from_failure() {
        let mut session = Session::new();
        assert!(session.retry().is_none());

        let d = session.begin(attrs(3)).unwrap();
        assert!(session.retry().is_none());
        session.complete(d.id, Ok(prediction("Alta")));
        assert!(session.retry().is_none());
    }

    #[tokio::test]
    async fn failure_then_retry_resends_identical_attributes() {
        let client = ScriptedClient::new(vec![
            Err(PredictError::Malformed("truncated".into())),
            Ok(prediction("Alta confiança")),
        ]);
        let mut session = Session::new();

        let outcome = session.run(&client, attrs(4)).await;
        match outcome {
            RequestOutcome::Failure(message) => assert!(message.contains("truncated")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(session.can_retry());

        let dispatch = session.retry().unwrap();
        assert_eq!(dispatch.attributes, attrs(4));
        let outcome = session.execute(&client, dispatch).await;
        match outcome {
            RequestOutcome::Success(result) => {
                assert_eq!(result.confidence_tier(), ConfidenceTier::High)
            }
            other => panic!("expected success, got {:?}", other),
        }

        let sent = client.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn identical_submissions_are_independent_exchanges() {
        let client = ScriptedClient::new(vec![Ok(prediction("Alta")), Ok(prediction("Média"))]);
        let mut session = Session::new();

        session.run(&client, attrs(3)).await;
        session.run(&client, attrs(3)).await;

        assert_eq!(client.sent().len(), 2);
        match session.outcome() {
            RequestOutcome::Success(result) => assert_eq!(result.confidence, "Média"),
            other => panic!("expected success, got {:?}", other),
        }
    }
}
