use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::SessionState,
    services::{LlmClient, MetadataProvider},
};

/// One user's isolated state plus the service clients it talks to
///
/// Clients start out as the process defaults and can be swapped for the session
/// alone when the user supplies their own API keys.
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub state: SessionState,
    llm: Arc<dyn LlmClient>,
    metadata: Arc<dyn MetadataProvider>,
}

impl Session {
    pub fn new(llm: Arc<dyn LlmClient>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: SessionState::new(),
            llm,
            metadata,
        }
    }

    pub fn llm(&self) -> Arc<dyn LlmClient> {
        Arc::clone(&self.llm)
    }

    pub fn metadata(&self) -> Arc<dyn MetadataProvider> {
        Arc::clone(&self.metadata)
    }

    pub fn set_llm(&mut self, llm: Arc<dyn LlmClient>) {
        self.llm = llm;
    }

    pub fn set_metadata(&mut self, metadata: Arc<dyn MetadataProvider>) {
        self.metadata = metadata;
    }
}

/// Shared handle to a session. Holding the lock serializes that session's actions.
pub type SessionHandle = Arc<Mutex<Session>>;

struct SessionSlot {
    handle: SessionHandle,
    last_access: Instant,
}

/// Registry of live sessions
///
/// Sessions nobody has touched for a while are dropped by
/// [`SessionStore::spawn_sweeper`].
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionSlot>>>,
}

/// Handle for stopping the idle-session sweeper
pub struct SessionSweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl SessionSweeperHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Session sweeper shutdown signal sent");
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new empty session and returns its id
    pub async fn create(
        &self,
        llm: Arc<dyn LlmClient>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Uuid {
        let session = Session::new(llm, metadata);
        let id = session.id;

        self.sessions.write().await.insert(
            id,
            SessionSlot {
                handle: Arc::new(Mutex::new(session)),
                last_access: Instant::now(),
            },
        );

        tracing::info!(session_id = %id, "Session started");
        id
    }

    /// Looks a session up and marks it as active
    pub async fn get(&self, id: Uuid) -> AppResult<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} does not exist", id)))?;

        slot.last_access = Instant::now();
        Ok(Arc::clone(&slot.handle))
    }

    /// Drops a session and everything in it
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                tracing::info!(session_id = %id, "Session ended");
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Session {} does not exist", id))),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops sessions idle for at least `idle_ttl` and returns how many went
    ///
    /// A session whose handle is still held by a request is never dropped.
    pub async fn sweep_idle(&self, idle_ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, slot| {
            let keep = Arc::strong_count(&slot.handle) > 1
                || now.duration_since(slot.last_access) < idle_ttl;
            if !keep {
                tracing::info!(session_id = %id, "Idle session expired");
            }
            keep
        });

        before - sessions.len()
    }

    /// Starts a background task that sweeps idle sessions every `every`
    pub fn spawn_sweeper(&self, idle_ttl: Duration, every: Duration) -> SessionSweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let store = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            tracing::info!(idle_ttl_secs = idle_ttl.as_secs(), "Session sweeper started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !store.is_empty().await {
                            let removed = store.sweep_idle(idle_ttl).await;
                            if removed > 0 {
                                let live = store.len().await;
                                tracing::info!(removed, live, "Idle sessions swept");
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Session sweeper stopped");
                        break;
                    }
                }
            }
        });

        SessionSweeperHandle { shutdown_tx }
    }
}
