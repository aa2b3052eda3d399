//! End-to-end flow of the safety monitor over the in-memory event bus:
//! detection, intervention, auto-recovery, and manual override.

use std::sync::Arc;

use haven::adapters::audit::TracingInterventionLog;
use haven::adapters::events::InMemoryEventBus;
use haven::application::SafetyMonitor;
use haven::config::SafetyConfig;
use haven::domain::foundation::SessionId;
use haven::domain::safety::{CrisisDetected, CrisisLevel, SafetyState};
use tokio::time::{advance, Duration};

fn monitor_with_bus() -> (SafetyMonitor, Arc<InMemoryEventBus>) {
    let bus = Arc::new(InMemoryEventBus::new());
    let monitor = SafetyMonitor::new(
        &SafetyConfig::default(),
        bus.clone(),
        Arc::new(TracingInterventionLog::new()),
    );
    (monitor, bus)
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn crisis_is_detected_escalated_and_recovered() {
    let (monitor, bus) = monitor_with_bus();
    let id = SessionId::new();

    let initial = monitor.start_session(id).await;
    assert_eq!(initial.safety_state, SafetyState::Safe);
    assert_eq!(initial.crisis_level, CrisisLevel::None);
    assert!(initial.safe_space_active);

    // High-risk content escalates to a crisis intervention.
    let response = monitor
        .analyze_content(id, "I can't take it, I want to die")
        .await
        .unwrap()
        .expect("crisis intervention expected");
    assert!(response.requires_professional);
    assert!(response.resources.iter().any(|r| r.contains("988")));

    let snapshot = monitor.snapshot(id).await.unwrap();
    assert_eq!(snapshot.crisis_level, CrisisLevel::High);
    assert_eq!(snapshot.safety_state, SafetyState::Concern);

    // The detection event carries the analyzed text and matched keywords.
    let detected = bus.events_of_type("safety.crisis_detected");
    assert_eq!(detected.len(), 1);
    let payload: CrisisDetected = detected[0].payload_as().unwrap();
    assert_eq!(payload.level, CrisisLevel::High);
    assert!(payload
        .matched_keywords
        .contains(&"want to die".to_string()));

    // Recovery walks High -> Medium -> Low -> None one tier at a time.
    advance(Duration::from_secs(300)).await;
    settle().await;
    let snapshot = monitor.snapshot(id).await.unwrap();
    assert_eq!(snapshot.crisis_level, CrisisLevel::Medium);
    assert_eq!(snapshot.safety_state, SafetyState::Caution);

    advance(Duration::from_secs(120)).await;
    settle().await;
    let snapshot = monitor.snapshot(id).await.unwrap();
    assert_eq!(snapshot.crisis_level, CrisisLevel::Low);
    assert_eq!(snapshot.safety_state, SafetyState::Caution);

    advance(Duration::from_secs(120)).await;
    settle().await;
    let snapshot = monitor.snapshot(id).await.unwrap();
    assert_eq!(snapshot.crisis_level, CrisisLevel::None);
    assert_eq!(snapshot.safety_state, SafetyState::Safe);
}

#[tokio::test(start_paused = true)]
async fn cooldown_suppresses_rapid_successive_detections() {
    let (monitor, bus) = monitor_with_bus();
    let id = SessionId::new();
    monitor.start_session(id).await;

    monitor
        .analyze_content(id, "feeling so anxious and overwhelmed")
        .await
        .unwrap();
    assert_eq!(bus.events_of_type("safety.crisis_detected").len(), 1);

    // Rapid follow-up input inside the 30s window is ignored.
    advance(Duration::from_secs(5)).await;
    let response = monitor
        .analyze_content(id, "everything feels hopeless")
        .await
        .unwrap();
    assert!(response.is_none());
    assert_eq!(bus.events_of_type("safety.crisis_detected").len(), 1);

    // After the window the same input registers.
    advance(Duration::from_secs(30)).await;
    let response = monitor
        .analyze_content(id, "everything feels hopeless")
        .await
        .unwrap();
    assert!(response.is_some());
    assert_eq!(bus.events_of_type("safety.crisis_detected").len(), 2);
    assert_eq!(
        monitor.snapshot(id).await.unwrap().crisis_level,
        CrisisLevel::Medium
    );
}

#[tokio::test(start_paused = true)]
async fn manual_safe_override_wins_and_sessions_are_isolated() {
    let (monitor, _) = monitor_with_bus();
    let first = SessionId::new();
    let second = SessionId::new();
    monitor.start_session(first).await;
    monitor.start_session(second).await;

    monitor
        .set_crisis_level(first, CrisisLevel::High)
        .await
        .unwrap();

    // The other session is untouched.
    let other = monitor.snapshot(second).await.unwrap();
    assert_eq!(other.crisis_level, CrisisLevel::None);

    // "I'm safe now" always wins over the current crisis reading.
    let snapshot = monitor
        .set_safety_state(first, SafetyState::Safe)
        .await
        .unwrap();
    assert_eq!(snapshot.crisis_level, CrisisLevel::None);
    assert_eq!(snapshot.safety_state, SafetyState::Safe);
}
