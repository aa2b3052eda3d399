//! SafetyMonitor - application service over the safety state machine.
//!
//! Owns one `SafetySession` per app session, publishes the events each
//! mutation produces, dispatches trauma-informed interventions on
//! detections, and drives the auto-recovery timer (at most one pending
//! timer per session, cancelled and rescheduled on every crisis-level
//! change).
//!
//! Collaborator failures fail open: a publish or audit error is logged and
//! the support flow continues, because a frozen flow is more harmful here
//! than a lost notification.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SafetyConfig;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::intervention::{
    InterventionDispatcher, InterventionRecord, InterventionResponse, TreatmentSeverity,
};
use crate::domain::safety::{
    CrisisLevel, SafetyEvent, SafetyPolicy, SafetySession, SafetySnapshot, SafetyState,
};
use crate::ports::{EventPublisher, InterventionLog};

struct SessionEntry {
    session: SafetySession,
    recovery_task: Option<JoinHandle<()>>,
}

struct MonitorInner {
    policy: SafetyPolicy,
    publisher: Arc<dyn EventPublisher>,
    audit: Arc<dyn InterventionLog>,
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
}

/// Application service coordinating sessions, interventions, and recovery.
#[derive(Clone)]
pub struct SafetyMonitor {
    inner: Arc<MonitorInner>,
}

impl SafetyMonitor {
    /// Creates a monitor from configuration and the two collaborator ports.
    pub fn new(
        config: &SafetyConfig,
        publisher: Arc<dyn EventPublisher>,
        audit: Arc<dyn InterventionLog>,
    ) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                policy: config.policy(),
                publisher,
                audit,
                sessions: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Starts tracking a session, returning its initial snapshot.
    ///
    /// Idempotent: an already-tracked session keeps its current state.
    pub async fn start_session(&self, id: SessionId) -> SafetySnapshot {
        let mut sessions = self.inner.sessions.lock().await;
        let entry = sessions.entry(id).or_insert_with(|| SessionEntry {
            session: SafetySession::new(id, self.inner.policy),
            recovery_task: None,
        });
        entry.session.snapshot()
    }

    /// Stops tracking a session, cancelling any pending recovery timer.
    pub async fn end_session(&self, id: SessionId) {
        let mut sessions = self.inner.sessions.lock().await;
        if let Some(entry) = sessions.remove(&id) {
            if let Some(task) = entry.recovery_task {
                task.abort();
            }
            debug!(session_id = %id, "safety session ended");
        }
    }

    /// Returns the current safety tuple for a session.
    pub async fn snapshot(&self, id: SessionId) -> Result<SafetySnapshot, DomainError> {
        let sessions = self.inner.sessions.lock().await;
        sessions
            .get(&id)
            .map(|e| e.session.snapshot())
            .ok_or_else(|| session_not_found(id))
    }

    /// Runs crisis detection over user content.
    ///
    /// On a detection, updates the session, publishes the resulting
    /// events, dispatches the matching intervention tier, and records the
    /// audit entry fire-and-forget. Returns the intervention to render,
    /// or `None` when nothing was detected (including cooldown-ignored
    /// calls).
    pub async fn analyze_content(
        &self,
        id: SessionId,
        text: &str,
    ) -> Result<Option<InterventionResponse>, DomainError> {
        let events = self
            .mutate(id, |session| {
                session.analyze_content(text).map_err(DomainError::from)
            })
            .await?;

        let detection = events.iter().find_map(|e| match e {
            SafetyEvent::CrisisDetected(d) => Some((d.level, d.matched_keywords.clone())),
            _ => None,
        });

        let Some((level, triggers)) = detection else {
            return Ok(None);
        };

        let severity = TreatmentSeverity::from_crisis_level(level);
        let response = InterventionDispatcher::dispatch(severity);
        info!(
            session_id = %id,
            level = %level,
            severity = %severity,
            "crisis detected, intervention dispatched"
        );

        let record = InterventionRecord::for_dispatch(id, severity, triggers, &response);
        if let Err(err) = self.inner.audit.record(record).await {
            warn!(session_id = %id, error = %err, "audit write failed; continuing");
        }

        Ok(Some(response))
    }

    /// Sets the crisis level by manual override.
    pub async fn set_crisis_level(
        &self,
        id: SessionId,
        level: CrisisLevel,
    ) -> Result<SafetySnapshot, DomainError> {
        self.mutate(id, |session| Ok(session.set_crisis_level(level)))
            .await?;
        self.snapshot(id).await
    }

    /// Sets the safety state; `Safe` clears the crisis level.
    pub async fn set_safety_state(
        &self,
        id: SessionId,
        state: SafetyState,
    ) -> Result<SafetySnapshot, DomainError> {
        self.mutate(id, |session| Ok(session.set_safety_state(state)))
            .await?;
        self.snapshot(id).await
    }

    /// Resets a session to the initial safety tuple.
    pub async fn reset(&self, id: SessionId) -> Result<SafetySnapshot, DomainError> {
        self.mutate(id, |session| Ok(session.reset())).await?;
        self.snapshot(id).await
    }

    /// Marks that the user asked for a break.
    pub async fn request_break(&self, id: SessionId) -> Result<SafetySnapshot, DomainError> {
        self.mutate(id, |session| {
            session.request_break();
            Ok(Vec::new())
        })
        .await?;
        self.snapshot(id).await
    }

    /// Clears a previously requested break.
    pub async fn end_break(&self, id: SessionId) -> Result<SafetySnapshot, DomainError> {
        self.mutate(id, |session| {
            session.end_break();
            Ok(Vec::new())
        })
        .await?;
        self.snapshot(id).await
    }

    /// Toggles the safe-space indicator.
    pub async fn set_safe_space(
        &self,
        id: SessionId,
        active: bool,
    ) -> Result<SafetySnapshot, DomainError> {
        self.mutate(id, |session| {
            session.set_safe_space(active);
            Ok(Vec::new())
        })
        .await?;
        self.snapshot(id).await
    }

    /// Applies a mutation, then publishes its events and reschedules the
    /// recovery timer if the crisis level moved.
    async fn mutate<F>(&self, id: SessionId, f: F) -> Result<Vec<SafetyEvent>, DomainError>
    where
        F: FnOnce(&mut SafetySession) -> Result<Vec<SafetyEvent>, DomainError>,
    {
        let events = {
            let mut sessions = self.inner.sessions.lock().await;
            let entry = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
            f(&mut entry.session)?
        };

        MonitorInner::publish_events(&self.inner, &events).await;
        if crisis_level_moved(&events) {
            MonitorInner::reschedule_recovery(&self.inner, id).await;
        }
        Ok(events)
    }
}

impl MonitorInner {
    /// Publishes events best-effort; failures are logged and skipped.
    async fn publish_events(inner: &Arc<MonitorInner>, events: &[SafetyEvent]) {
        for event in events {
            if let Err(err) = inner.publisher.publish(event.to_envelope()).await {
                warn!(
                    event_type = event.event_type(),
                    error = %err,
                    "event publish failed; continuing"
                );
            }
        }
    }

    /// Cancels the session's pending recovery timer and, when the current
    /// level calls for recovery, schedules a task that walks the ladder
    /// down one tier per timer expiry until the session is back at `None`.
    async fn reschedule_recovery(inner: &Arc<MonitorInner>, id: SessionId) {
        let mut sessions = inner.sessions.lock().await;
        let Some(entry) = sessions.get_mut(&id) else {
            return;
        };

        if let Some(task) = entry.recovery_task.take() {
            task.abort();
        }

        let Some(first_delay) = entry.session.recovery_delay() else {
            return;
        };

        // Weak reference so an abandoned monitor drops cleanly.
        let weak = Arc::downgrade(inner);
        // Fix the first deadline now, not on the task's first poll, so the
        // timer counts from the moment it is scheduled.
        let first_sleep = tokio::time::sleep(first_delay);
        entry.recovery_task = Some(tokio::spawn(async move {
            let mut sleep = first_sleep;
            loop {
                sleep.await;
                let Some(inner) = weak.upgrade() else {
                    return;
                };

                let (events, next_delay) = {
                    let mut sessions = inner.sessions.lock().await;
                    let Some(entry) = sessions.get_mut(&id) else {
                        return;
                    };
                    let events = entry.session.step_down_recovery();
                    (events, entry.session.recovery_delay())
                };

                if !events.is_empty() {
                    info!(session_id = %id, "crisis level auto-recovery step");
                    MonitorInner::publish_events(&inner, &events).await;
                }
                match next_delay {
                    Some(d) => sleep = tokio::time::sleep(d),
                    None => return,
                }
            }
        }));
        debug!(
            session_id = %id,
            delay_secs = first_delay.as_secs(),
            "recovery timer scheduled"
        );
    }
}

fn session_not_found(id: SessionId) -> DomainError {
    DomainError::new(ErrorCode::SessionNotFound, "Safety session not found")
        .with_detail("session_id", id.to_string())
}

fn crisis_level_moved(events: &[SafetyEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, SafetyEvent::CrisisLevelChanged(_)))
}
