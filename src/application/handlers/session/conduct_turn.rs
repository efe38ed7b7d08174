//! ConductTurnHandler - Command handler for one interviewer/patient exchange.
//!
//! The handler holds the session's turn gate for the whole exchange:
//!
//! 1. prepare the turn from a read of the committed session
//! 2. ask the dialogue service to play the patient (the only await that can
//!    take long, bounded by a timeout)
//! 3. parse the reply and commit it under a short write lock
//!
//! Any failure before step 3, or the future being dropped, leaves the session
//! exactly as it was.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::SessionHandle;
use crate::domain::dialogue::PatientResponse;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::session::{DynamicsEngine, SessionError, TurnOutcome};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata, TokenUsage,
};

const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(90);
const DEFAULT_MAX_TOKENS: u32 = 400;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Command carrying the interviewer's next utterance.
#[derive(Debug, Clone)]
pub struct ConductTurnCommand {
    pub utterance: String,
}

impl ConductTurnCommand {
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
        }
    }
}

/// Result of a committed turn.
#[derive(Debug, Clone)]
pub struct ConductTurnResult {
    pub outcome: TurnOutcome,
    pub usage: TokenUsage,
    /// Model that produced the reply.
    pub model: String,
}

impl ConductTurnResult {
    pub fn patient_text(&self) -> &str {
        &self.outcome.turn.patient_text
    }
}

/// Errors that reject a turn. The session is unchanged in every case.
#[derive(Debug, Error)]
pub enum ConductTurnError {
    #[error("Validation error: utterance cannot be empty")]
    EmptyUtterance,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("AI provider error: {0}")]
    Provider(#[from] AIError),

    #[error("Dialogue service did not answer within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl ConductTurnError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConductTurnError::EmptyUtterance => ErrorCode::ValidationFailed,
            ConductTurnError::Session(err) => err.code(),
            ConductTurnError::Provider(_) => ErrorCode::AIProviderError,
            ConductTurnError::Timeout { .. } => ErrorCode::Timeout,
        }
    }

    /// Whether resubmitting the same utterance may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ConductTurnError::EmptyUtterance => false,
            ConductTurnError::Session(SessionError::MalformedResponse(_)) => true,
            ConductTurnError::Session(_) => false,
            ConductTurnError::Provider(err) => err.is_retryable(),
            ConductTurnError::Timeout { .. } => true,
        }
    }
}

impl From<ConductTurnError> for DomainError {
    fn from(err: ConductTurnError) -> Self {
        match err {
            ConductTurnError::Session(inner) => inner.into(),
            other => DomainError::new(other.code(), other.to_string()),
        }
    }
}

/// Handler for conducting turns.
pub struct ConductTurnHandler {
    engine: Arc<DynamicsEngine>,
    provider: Arc<dyn AIProvider>,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
    json_mode: bool,
}

impl ConductTurnHandler {
    pub fn new(engine: Arc<DynamicsEngine>, provider: Arc<dyn AIProvider>) -> Self {
        Self {
            engine,
            provider,
            timeout: DEFAULT_TURN_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            json_mode: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    pub fn engine(&self) -> &DynamicsEngine {
        &self.engine
    }

    #[tracing::instrument(skip(self, handle, cmd), fields(session_id = %handle.id()))]
    pub async fn handle(
        &self,
        handle: &SessionHandle,
        cmd: ConductTurnCommand,
    ) -> Result<ConductTurnResult, ConductTurnError> {
        let utterance = cmd.utterance.trim();
        if utterance.is_empty() {
            return Err(ConductTurnError::EmptyUtterance);
        }

        let _turn = handle.begin_turn().await;

        let prepared = handle.read().await.prepare_turn(&self.engine, utterance)?;
        debug!(
            turn = prepared.turn_index,
            lexical_delta = prepared.analysis.lexical_delta,
            negatives = ?prepared.analysis.matched_negative,
            positives = ?prepared.analysis.matched_positive,
            "turn prepared"
        );

        let request = CompletionRequest::new(RequestMetadata::new(
            handle.id(),
            prepared.turn_index,
            format!("{}-turn-{}", handle.id(), prepared.turn_index),
        ))
        .with_message(MessageRole::User, prepared.prompt.as_str())
        .with_max_tokens(self.max_tokens)
        .with_temperature(self.temperature)
        .with_json_mode(self.json_mode);

        let completion =
            match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
                Ok(Ok(completion)) => completion,
                Ok(Err(err)) => {
                    warn!(turn = prepared.turn_index, error = %err, "dialogue service failed");
                    return Err(err.into());
                }
                Err(_) => {
                    warn!(turn = prepared.turn_index, "dialogue service timed out");
                    return Err(ConductTurnError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    });
                }
            };

        let response = PatientResponse::parse(&completion.content).inspect_err(|err| {
            warn!(turn = prepared.turn_index, error = %err, "rejecting patient reply")
        })?;

        let outcome = handle
            .write()
            .await
            .record_turn(&self.engine, prepared, response)?;

        self.report(&outcome);

        Ok(ConductTurnResult {
            outcome,
            usage: completion.usage,
            model: completion.model,
        })
    }

    fn report(&self, outcome: &TurnOutcome) {
        let transition = &outcome.transition;
        info!(
            turn = transition.turn,
            anxiety_before = transition.before.value(),
            anxiety_after = transition.after.value(),
            raw_delta = outcome.fusion.raw_delta,
            adjusted_delta = outcome.fusion.adjusted_delta,
            level = %transition.level_after,
            "turn committed"
        );

        if transition.crossed_into_extreme() {
            warn!(
                turn = transition.turn,
                anxiety = transition.after.value(),
                "patient anxiety crossed into extreme"
            );
        }
        if let Some(warning) = &outcome.length_warning {
            warn!(turn = transition.turn, %warning, "patient reply length out of bounds");
        }
        if outcome.level_disagrees() {
            debug!(
                turn = transition.turn,
                reported = %outcome.turn.reported_level,
                derived = %transition.level_after,
                "service level label disagrees with derived level"
            );
        }
        if outcome.symptom_mention {
            debug!(turn = transition.turn, "symptom mention recorded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::anxiety::{AnxietyLevel, FusionPolicy};
    use crate::domain::foundation::SessionId;
    use crate::domain::patient::fixtures;
    use crate::domain::session::PatientSession;

    fn handle(initial: f64) -> SessionHandle {
        SessionHandle::new(PatientSession::start(
            SessionId::new(),
            fixtures::profile("extrovert", initial),
        ))
    }

    fn handler(provider: MockAIProvider, policy: FusionPolicy) -> ConductTurnHandler {
        ConductTurnHandler::new(
            Arc::new(DynamicsEngine::default().with_policy(policy)),
            Arc::new(provider),
        )
    }

    #[tokio::test]
    async fn test_committed_turn_updates_session() {
        let provider = MockAIProvider::new().with_patient_reply(
            "Tests? Is something wrong with me?",
            0.2,
            AnxietyLevel::Significant,
            true,
        );
        let handler = handler(provider, FusionPolicy::attenuation_only());
        let session = handle(0.5);

        let result = handler
            .handle(&session, ConductTurnCommand::new("We need to run some tests."))
            .await
            .unwrap();

        assert_eq!(result.patient_text(), "Tests? Is something wrong with me?");
        assert_eq!(result.outcome.transition.after.value(), 0.6);
        assert!(!result.outcome.level_disagrees());
        assert_eq!(session.turn_count().await, 1);
        assert_eq!(session.presentation().await.unwrap().level, AnxietyLevel::Significant);
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_json_mode() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = ConductTurnHandler::new(Arc::new(DynamicsEngine::default()), provider.clone())
            .with_max_tokens(256)
            .with_temperature(0.2);
        let session = handle(0.4);

        handler
            .handle(&session, ConductTurnCommand::new("Where does it hurt?"))
            .await
            .unwrap();

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].json_mode);
        assert_eq!(calls[0].max_tokens, Some(256));
        assert_eq!(calls[0].metadata.turn_index, 1);
        assert!(calls[0].prompt_text().contains("Where does it hurt?"));
    }

    #[tokio::test]
    async fn test_empty_utterance_rejected_without_calling_provider() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = ConductTurnHandler::new(Arc::new(DynamicsEngine::default()), provider.clone());
        let session = handle(0.4);

        let err = handler
            .handle(&session, ConductTurnCommand::new("   "))
            .await
            .unwrap_err();

        assert!(matches!(err, ConductTurnError::EmptyUtterance));
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_session_unchanged() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "maintenance".to_string(),
        });
        let handler = handler(provider, FusionPolicy::full());
        let session = handle(0.4);

        let err = handler
            .handle(&session, ConductTurnCommand::new("How are you feeling?"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConductTurnError::Provider(_)));
        assert!(err.is_retryable());
        assert_eq!(session.turn_count().await, 0);
        assert_eq!(session.presentation().await.unwrap().anxiety, 0.4);
    }

    #[tokio::test]
    async fn test_malformed_reply_is_retryable_and_not_committed() {
        let provider = MockAIProvider::new()
            .with_raw_response(r#"{"response_text": "Hmm", "anxiety_level": "mild", "understands": true}"#);
        let handler = handler(provider, FusionPolicy::full());
        let session = handle(0.4);

        let err = handler
            .handle(&session, ConductTurnCommand::new("How are you feeling?"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::MalformedResponse);
        assert!(err.is_retryable());
        assert!(session.snapshot().await.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_leaves_session_unchanged() {
        let provider = MockAIProvider::new().with_delay(Duration::from_secs(5));
        let handler =
            handler(provider, FusionPolicy::full()).with_timeout(Duration::from_millis(50));
        let session = handle(0.4);

        let err = handler
            .handle(&session, ConductTurnCommand::new("How are you feeling?"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConductTurnError::Timeout { .. }));
        assert_eq!(err.code(), ErrorCode::Timeout);
        assert_eq!(session.turn_count().await, 0);
        assert!(!session.turn_in_flight());
    }

    #[test]
    fn test_domain_error_conversion_keeps_code() {
        let err: DomainError = ConductTurnError::from(SessionError::Uninitialized).into();
        assert_eq!(err.code, ErrorCode::SessionUninitialized);

        let err: DomainError = ConductTurnError::Timeout { timeout_secs: 3 }.into();
        assert_eq!(err.code, ErrorCode::Timeout);
    }
}
