//! StartSessionHandler - Command handler for opening a patient interview.

use std::sync::Arc;

use tracing::info;

use super::SessionHandle;
use crate::domain::foundation::SessionId;
use crate::domain::patient::PatientProfile;
use crate::domain::session::{PatientSession, PresentationSignal, SessionError};

/// Command to start a new session.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub profile: PatientProfile,
    /// Reuse a caller-chosen id; a fresh one is generated otherwise.
    pub session_id: Option<SessionId>,
}

impl StartSessionCommand {
    pub fn new(profile: PatientProfile) -> Self {
        Self {
            profile,
            session_id: None,
        }
    }
}

/// Result of successful session start.
#[derive(Debug, Clone)]
pub struct StartSessionResult {
    pub handle: Arc<SessionHandle>,
    pub presentation: PresentationSignal,
}

/// Handler for starting sessions.
#[derive(Debug, Default)]
pub struct StartSessionHandler;

impl StartSessionHandler {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(skip_all, fields(case_id = %cmd.profile.case_id()))]
    pub fn handle(&self, cmd: StartSessionCommand) -> Result<StartSessionResult, SessionError> {
        let session_id = cmd.session_id.unwrap_or_default();
        let session = PatientSession::start(session_id, cmd.profile);
        let presentation = session.presentation()?;

        info!(
            session_id = %session_id,
            case_name = session.profile().case_name(),
            personality = session.profile().personality().as_str(),
            initial_anxiety = presentation.anxiety,
            level = %presentation.level,
            "session started"
        );

        Ok(StartSessionResult {
            handle: Arc::new(SessionHandle::new(session)),
            presentation,
        })
    }
}
