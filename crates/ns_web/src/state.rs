use std::sync::Arc;
use std::time::Duration;

use ns_core::Topic;
use ns_session::{Dashboard, DashboardView};
use tracing::{debug, error, info};

use crate::session::{SessionRegistry, SharedSlot};

/// A user action on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fetch(Topic),
    LoadMore,
}

pub struct AppState {
    pub dashboard: Dashboard,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(dashboard: Dashboard, session_ttl: Duration) -> Self {
        Self {
            dashboard,
            sessions: Arc::new(SessionRegistry::new(session_ttl)),
        }
    }

    /// Runs `action` for the session in a task of its own. The task commits
    /// its result itself, so the work survives the caller going away.
    ///
    /// Actions of one session run one at a time: a load more issued during
    /// a fetch pages from what that fetch committed. Starting a fetch aborts
    /// the running action, and anything queued before it is dropped.
    pub async fn run(&self, slot: SharedSlot, action: Action) -> DashboardView {
        let (gate, generation) = {
            let mut slot = slot.lock().await;
            slot.touch();
            if let Action::Fetch(_) = action {
                if let Some(task) = slot.task.take() {
                    debug!("✋ Aborting superseded request");
                    task.abort();
                }
                slot.generation += 1;
            }
            (slot.gate.clone(), slot.generation)
        };
        let permit = gate.lock_owned().await;

        let handle = {
            let mut current = slot.lock().await;
            if current.generation != generation {
                debug!("⏭️ Skipping {:?}, a newer fetch took over", action);
                return current.state.view();
            }
            let snapshot = current.state.clone();
            let dashboard = self.dashboard.clone();
            let slot = slot.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                let next = match action {
                    Action::Fetch(topic) => dashboard.fetch(snapshot, topic).await,
                    Action::LoadMore => dashboard.load_more(snapshot).await,
                };
                let mut slot = slot.lock().await;
                if slot.generation == generation {
                    slot.state = next;
                } else {
                    debug!("⏭️ Dropping result of a superseded request");
                }
                slot.task = None;
                slot.touch();
                slot.state.view()
            });
            current.task = Some(handle.abort_handle());
            handle
        };

        match handle.await {
            Ok(view) => view,
            Err(e) => {
                if e.is_cancelled() {
                    debug!("⏭️ Request cancelled");
                } else {
                    error!("❌ Dashboard task failed: {}", e);
                }
                slot.lock().await.state.view()
            }
        }
    }
}

/// Periodically forgets idle sessions.
pub fn spawn_session_evictor(sessions: Arc<SessionRegistry>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_idle().await;
            if evicted > 0 {
                info!("🧹 Evicted {} idle sessions", evicted);
            }
        }
    })
}
