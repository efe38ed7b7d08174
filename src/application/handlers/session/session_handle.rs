//! SessionHandle - the shared, explicitly passed owner of one interview.

use tokio::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::SessionId;
use crate::domain::session::{PatientSession, PresentationSignal, SessionError};

/// One live interview.
///
/// Two locks with different jobs:
/// - `turn_gate` is held for a whole turn, network round trip included, so at
///   most one turn per session is in flight.
/// - `session` is only held for the read that prepares a turn and the write
///   that commits it, so presentation queries never wait on the network.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    turn_gate: Mutex<()>,
    session: RwLock<PatientSession>,
}

impl SessionHandle {
    pub fn new(session: PatientSession) -> Self {
        Self {
            id: session.id(),
            turn_gate: Mutex::new(()),
            session: RwLock::new(session),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current anxiety, level, turn count and animation intensity.
    pub async fn presentation(&self) -> Result<PresentationSignal, SessionError> {
        self.session.read().await.presentation()
    }

    pub async fn turn_count(&self) -> u32 {
        self.session.read().await.state().turn_count()
    }

    /// A copy of the committed session.
    pub async fn snapshot(&self) -> PatientSession {
        self.session.read().await.clone()
    }

    /// True while a turn holds the gate.
    pub fn turn_in_flight(&self) -> bool {
        self.turn_gate.try_lock().is_err()
    }

    pub(crate) async fn begin_turn(&self) -> MutexGuard<'_, ()> {
        self.turn_gate.lock().await
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, PatientSession> {
        self.session.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, PatientSession> {
        self.session.write().await
    }
}
