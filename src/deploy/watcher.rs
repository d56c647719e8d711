// ABOUTME: Readiness watcher: tracks per-service ready pods until the stack is stable.
// ABOUTME: Runs as a background task and reports through a one-shot completion handle.

use super::error::WatchError;
use crate::cluster::{PodEvent, PodOps, PodReadiness, ResourceError};
use crate::stack::Stack;
use crate::types::ServiceName;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Expected replica count versus the pods currently observed ready.
#[derive(Debug)]
pub struct ServiceReadiness {
    expected: u32,
    ready: HashSet<String>,
}

impl ServiceReadiness {
    fn new(expected: u32) -> Self {
        Self {
            expected,
            ready: HashSet::new(),
        }
    }

    pub fn expected(&self) -> u32 {
        self.expected
    }

    pub fn ready(&self) -> usize {
        self.ready.len()
    }

    fn is_satisfied(&self) -> bool {
        self.ready.len() as u64 >= u64::from(self.expected)
    }
}

/// Per-deploy readiness state. Owned exclusively by the watch task; the
/// caller only ever sees the completion outcome.
struct WatchSession {
    services: HashMap<ServiceName, ServiceReadiness>,
}

impl WatchSession {
    fn new(services: impl IntoIterator<Item = (ServiceName, u32)>) -> Self {
        Self {
            services: services
                .into_iter()
                .map(|(name, expected)| (name, ServiceReadiness::new(expected)))
                .collect(),
        }
    }

    fn observe(&mut self, event: &PodEvent) {
        let Some(state) = self.services.get_mut(&event.service) else {
            tracing::debug!(service = %event.service, pod = %event.pod, "event for unknown service ignored");
            return;
        };
        match event.readiness {
            PodReadiness::Ready => {
                state.ready.insert(event.pod.clone());
            }
            PodReadiness::NotReady | PodReadiness::Deleted => {
                state.ready.remove(&event.pod);
            }
        }
    }

    /// Stable means every service is at its expected count at the same
    /// time, not merely that each has reached it at some point.
    fn is_stable(&self) -> bool {
        self.services.values().all(ServiceReadiness::is_satisfied)
    }
}

/// Completion signal of one watch session. Fires exactly once: either
/// success once the stack is stable, or the error that ended the watch.
pub struct CompletionHandle {
    rx: oneshot::Receiver<Result<(), WatchError>>,
}

impl CompletionHandle {
    /// Block until the watch session reports its outcome.
    pub async fn wait(self) -> Result<(), WatchError> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(WatchError::SessionLost),
        }
    }
}

/// Start watching the stack's pods in a background task. The caller
/// blocks on the returned handle; only the task touches session state.
pub fn watch(pods: Arc<dyn PodOps>, stack: &Stack) -> CompletionHandle {
    let session = WatchSession::new(
        stack
            .services
            .iter()
            .map(|service| (service.name.clone(), service.replicas)),
    );
    let events = pods.watch_pods(&stack.name);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = run_session(session, events).await;
        let _ = tx.send(outcome);
    });
    CompletionHandle { rx }
}

async fn run_session(
    mut session: WatchSession,
    mut events: BoxStream<'static, Result<PodEvent, ResourceError>>,
) -> Result<(), WatchError> {
    // A stack expecting zero replicas everywhere is stable from the start.
    if session.is_stable() {
        return Ok(());
    }

    while let Some(step) = events.next().await {
        let event = step.map_err(|source| WatchError::Stream { source })?;
        session.observe(&event);
        if session.is_stable() {
            return Ok(());
        }
    }
    Err(WatchError::StreamClosed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> ServiceName {
        ServiceName::new(value).unwrap()
    }

    fn event(service: &str, pod: &str, readiness: PodReadiness) -> PodEvent {
        PodEvent {
            pod: pod.to_string(),
            service: name(service),
            readiness,
        }
    }

    fn session() -> WatchSession {
        WatchSession::new([(name("web"), 2), (name("db"), 1)])
    }

    #[test]
    fn stable_only_when_all_services_at_target() {
        let mut session = session();
        session.observe(&event("web", "web-1", PodReadiness::Ready));
        session.observe(&event("web", "web-2", PodReadiness::Ready));
        assert!(!session.is_stable());

        session.observe(&event("db", "db-1", PodReadiness::Ready));
        assert!(session.is_stable());
    }

    #[test]
    fn regression_revokes_stability() {
        let mut session = session();
        session.observe(&event("web", "web-1", PodReadiness::Ready));
        session.observe(&event("web", "web-2", PodReadiness::Ready));
        session.observe(&event("web", "web-1", PodReadiness::NotReady));
        session.observe(&event("db", "db-1", PodReadiness::Ready));
        assert!(!session.is_stable());

        session.observe(&event("web", "web-1", PodReadiness::Ready));
        assert!(session.is_stable());
    }

    #[test]
    fn deleted_pod_leaves_the_ready_set() {
        let mut session = WatchSession::new([(name("web"), 1)]);
        session.observe(&event("web", "web-1", PodReadiness::Ready));
        assert!(session.is_stable());

        session.observe(&event("web", "web-1", PodReadiness::Deleted));
        assert!(!session.is_stable());
    }

    #[test]
    fn repeated_ready_events_count_once() {
        let mut session = WatchSession::new([(name("web"), 2)]);
        session.observe(&event("web", "web-1", PodReadiness::Ready));
        session.observe(&event("web", "web-1", PodReadiness::Ready));
        assert!(!session.is_stable());
    }

    #[test]
    fn unknown_service_events_are_ignored() {
        let mut session = WatchSession::new([(name("web"), 1)]);
        session.observe(&event("ghost", "ghost-1", PodReadiness::Ready));
        assert!(!session.is_stable());
    }

    #[test]
    fn zero_replica_stack_is_stable_immediately() {
        let session = WatchSession::new([(name("web"), 0)]);
        assert!(session.is_stable());
    }
}
