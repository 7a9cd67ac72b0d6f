//! In-memory registry of live sessions.
//!
//! The engine does no locking of its own. The registry serializes requests
//! against the same session; each session sits behind its own mutex.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::engine::AssessmentEngine;
use crate::error::AssessmentError;
use crate::session::{AnswerOutcome, AssessmentResult, AssessmentSession};

type SharedSession = Arc<Mutex<AssessmentSession>>;

/// Sessions keyed by id.
#[derive(Default)]
pub struct SessionRegistry {
    engine: AssessmentEngine,
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionRegistry {
    pub fn new(engine: AssessmentEngine) -> Self {
        Self {
            engine,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &AssessmentEngine {
        &self.engine
    }

    /// Start a new session and return its id.
    pub async fn start(&self, seed_level: u8) -> Result<Uuid, AssessmentError> {
        let session = self.engine.start(seed_level)?;
        Ok(self.insert(session).await)
    }

    /// Register a session restored from a snapshot.
    pub async fn restore(&self, snapshot: AssessmentSession) -> Result<Uuid, AssessmentError> {
        let session = self.engine.resume(snapshot)?;
        Ok(self.insert(session).await)
    }

    async fn insert(&self, session: AssessmentSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        tracing::debug!(%id, "session registered");
        id
    }

    async fn get(&self, id: Uuid) -> Result<SharedSession, AssessmentError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AssessmentError::SessionNotFound(id))
    }

    /// Submit an answer to session `id`.
    pub async fn submit(&self, id: Uuid, correct: bool) -> Result<AnswerOutcome, AssessmentError> {
        let session = self.get(id).await?;
        let mut session = session.lock().await;
        self.engine.submit_answer(&mut session, correct)
    }

    /// Complete session `id`, forcing it if it is still running.
    pub async fn complete(&self, id: Uuid) -> Result<AssessmentResult, AssessmentError> {
        let session = self.get(id).await?;
        let mut session = session.lock().await;
        Ok(self.engine.complete(&mut session))
    }

    /// A copy of session `id` suitable for persisting.
    pub async fn snapshot(&self, id: Uuid) -> Result<AssessmentSession, AssessmentError> {
        let session = self.get(id).await?;
        let session = session.lock().await;
        Ok(session.clone())
    }

    /// Drop session `id`, returning its final state.
    pub async fn remove(&self, id: Uuid) -> Result<AssessmentSession, AssessmentError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(AssessmentError::SessionNotFound(id))?;
        let session = session.lock().await;
        Ok(session.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StopReason;

    #[tokio::test]
    async fn start_submit_complete() {
        let registry = SessionRegistry::default();
        let id = registry.start(0).await.unwrap();

        registry.submit(id, true).await.unwrap();
        let outcome = registry.submit(id, true).await.unwrap();
        assert_eq!(outcome.level, 1);

        let result = registry.complete(id).await.unwrap();
        assert_eq!(result.final_level, 2);
        assert_eq!(result.stop_reason, StopReason::Forced);

        let err = registry.submit(id, true).await.unwrap_err();
        assert!(err.is_completed_session());
    }

    #[tokio::test]
    async fn unknown_session_is_an_error() {
        let registry = SessionRegistry::default();
        let id = Uuid::new_v4();
        assert_eq!(
            registry.submit(id, true).await.unwrap_err(),
            AssessmentError::SessionNotFound(id)
        );
        assert!(registry.remove(id).await.is_err());
    }

    #[tokio::test]
    async fn snapshot_restore_continues_where_it_left_off() {
        let registry = SessionRegistry::default();
        let id = registry.start(3).await.unwrap();
        registry.submit(id, false).await.unwrap();

        let snapshot = registry.snapshot(id).await.unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        registry.remove(id).await.unwrap();
        assert!(registry.is_empty().await);

        let restored: AssessmentSession = serde_json::from_str(&json).unwrap();
        let id = registry.restore(restored).await.unwrap();
        let outcome = registry.submit(id, false).await.unwrap();
        assert_eq!(outcome.level, 2);
        assert_eq!(registry.snapshot(id).await.unwrap().total_questions, 2);
    }

    #[tokio::test]
    async fn invalid_seed_and_snapshot_are_rejected() {
        let registry = SessionRegistry::default();
        assert!(matches!(
            registry.start(42).await,
            Err(AssessmentError::InvalidArgument(_))
        ));

        let mut broken = registry.engine().start(1).unwrap();
        broken.total_questions = 3;
        assert!(registry.restore(broken).await.is_err());
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submits_are_serialized() {
        let registry = Arc::new(SessionRegistry::default());
        let id = registry.start(4).await.unwrap();

        // In any interleaving, ten answers from level 4 cannot hit a stop condition.
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.submit(id, i % 2 == 0).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let session = registry.snapshot(id).await.unwrap();
        assert_eq!(session.total_questions, 10);
        assert_eq!(session.level_history.len(), 11);
    }
}
