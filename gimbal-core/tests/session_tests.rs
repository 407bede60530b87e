//! Integration tests for control session lifecycle and command dispatch

use gimbal_core::backend::{ReceiverOptions, SimBackend, SimEvent};
use gimbal_core::session::ControlSession;
use gimbal_core::types::{Axis, Capability, MotionCommand, SourceIdentity};
use std::sync::Arc;
use std::time::Duration;

fn session(backend: &Arc<SimBackend>) -> ControlSession<SimBackend> {
    ControlSession::new(
        backend.clone(),
        ReceiverOptions::default(),
        Duration::from_millis(50),
    )
}

fn count_events(events: &[SimEvent], matcher: impl Fn(&SimEvent) -> bool) -> usize {
    events.iter().filter(|e| matcher(e)).count()
}

#[test]
fn test_bind_establishes_connection() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A"]));
    let mut session = session(&backend);

    session.bind_to(&SourceIdentity::new("Cam-A")).unwrap();

    assert!(session.is_bound());
    assert_eq!(session.identity().unwrap().name, "Cam-A");
    assert_eq!(session.capability(), Capability::Unknown);
    assert_eq!(backend.open_connection_count(), 1);
}

#[test]
fn test_rebind_releases_before_acquire() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A", "Cam-B"]));
    let mut session = session(&backend);

    session.bind_to(&SourceIdentity::new("Cam-A")).unwrap();
    session.bind_to(&SourceIdentity::new("Cam-B")).unwrap();

    let events = backend.events();
    let disconnect_a = events
        .iter()
        .position(|e| *e == SimEvent::Disconnected("Cam-A".to_string()))
        .expect("Cam-A should be released");
    let connect_b = events
        .iter()
        .position(|e| *e == SimEvent::Connected("Cam-B".to_string()))
        .expect("Cam-B should be connected");

    assert!(disconnect_a < connect_b, "old connection must close first");
    assert_eq!(backend.max_open_connections(), 1);
    assert_eq!(session.identity().unwrap().name, "Cam-B");
}

#[test]
fn test_rebind_same_identity_is_noop() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A"]));
    let mut session = session(&backend);

    session.bind_to(&SourceIdentity::new("Cam-A")).unwrap();
    session.bind_to(&SourceIdentity::new("Cam-A")).unwrap();

    let events = backend.events();
    assert_eq!(
        count_events(&events, |e| matches!(e, SimEvent::Connected(_))),
        1
    );
    assert_eq!(
        count_events(&events, |e| matches!(e, SimEvent::Disconnected(_))),
        0
    );
}

#[test]
fn test_failed_bind_leaves_unbound() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A", "Cam-B"]));
    backend.set_refuse_connect("Cam-B", true);
    let mut session = session(&backend);

    session.bind_to(&SourceIdentity::new("Cam-A")).unwrap();
    let err = session.bind_to(&SourceIdentity::new("Cam-B")).unwrap_err();

    assert!(err.to_string().contains("Cam-B"));
    // The stale session is not retained either
    assert!(!session.is_bound());
    assert_eq!(backend.open_connection_count(), 0);
    assert_eq!(
        count_events(&backend.events(), |e| {
            *e == SimEvent::Disconnected("Cam-A".to_string())
        }),
        1
    );
}

#[test]
fn test_unbind_without_session_is_safe() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A"]));
    let mut session = session(&backend);

    session.unbind();
    session.unbind();

    assert!(backend.events().is_empty());
}

#[test]
fn test_unbind_releases_once() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A"]));
    let mut session = session(&backend);

    session.bind_to(&SourceIdentity::new("Cam-A")).unwrap();
    session.unbind();
    session.unbind();

    assert_eq!(
        count_events(&backend.events(), |e| matches!(
            e,
            SimEvent::Disconnected(_)
        )),
        1
    );
    assert_eq!(backend.open_connection_count(), 0);
}

#[test]
fn test_set_axis_clamps() {
    let backend = Arc::new(SimBackend::new());
    let mut session = session(&backend);

    session.set_axis(Axis::Pan, 5.0);
    session.set_axis(Axis::Tilt, -5.0);
    session.set_axis(Axis::Zoom, 0.25);

    assert_eq!(session.pending().pan, 1.0);
    assert_eq!(session.pending().tilt, -1.0);
    assert_eq!(session.pending().zoom, 0.25);
}

#[test]
fn test_trigger_unbound_is_noop() {
    let backend = Arc::new(SimBackend::new());
    let mut session = session(&backend);

    session.set_axis(Axis::Pan, 0.5);
    session.trigger().unwrap();

    assert!(backend.events().is_empty());
    assert_eq!(session.last_commanded(), None);
}

#[test]
fn test_trigger_refines_capability_and_moves() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A"]));
    let mut session = session(&backend);

    session.bind_to(&SourceIdentity::new("Cam-A")).unwrap();
    session.set_axis(Axis::Pan, 0.5);
    session.set_axis(Axis::Tilt, -0.25);
    session.set_axis(Axis::Zoom, 2.0);
    session.trigger().unwrap();

    assert_eq!(session.capability(), Capability::Supported);
    let events = backend.events();
    assert!(events.contains(&SimEvent::PanTilt {
        source: "Cam-A".to_string(),
        pan: 0.5,
        tilt: -0.25,
    }));
    assert!(events.contains(&SimEvent::Zoom {
        source: "Cam-A".to_string(),
        zoom: 1.0,
    }));
    assert_eq!(
        session.last_commanded(),
        Some(MotionCommand::new(0.5, -0.25, 1.0))
    );
}

#[test]
fn test_trigger_capability_unsupported_drops_command() {
    let backend = Arc::new(SimBackend::new());
    backend.add_source("Static-1", false);
    let mut session = session(&backend);

    session.bind_to(&SourceIdentity::new("Static-1")).unwrap();
    session.set_axis(Axis::Pan, 0.5);
    session.trigger().unwrap();

    assert_eq!(session.capability(), Capability::Unsupported);
    let events = backend.events();
    assert_eq!(
        count_events(&events, |e| matches!(
            e,
            SimEvent::PanTilt { .. } | SimEvent::Zoom { .. }
        )),
        0
    );
    assert_eq!(session.last_commanded(), None);
}

#[test]
fn test_trigger_without_status_report_keeps_unknown() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A"]));
    backend.set_announce_status_on_connect(false);
    let mut session = session(&backend);

    session.bind_to(&SourceIdentity::new("Cam-A")).unwrap();
    session.set_axis(Axis::Pan, 0.5);
    session.trigger().unwrap();

    // Capability is never assumed; until the connection reports status
    // the command is dropped.
    assert_eq!(session.capability(), Capability::Unknown);
    assert_eq!(session.last_commanded(), None);

    backend.queue_status_change("Cam-A");
    session.trigger().unwrap();

    assert_eq!(session.capability(), Capability::Supported);
    assert_eq!(session.last_commanded(), Some(MotionCommand::new(0.5, 0.0, 0.0)));
}

#[test]
fn test_capability_resets_on_rebind() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A", "Cam-B"]));
    let mut session = session(&backend);

    session.bind_to(&SourceIdentity::new("Cam-A")).unwrap();
    session.trigger().unwrap();
    assert_eq!(session.capability(), Capability::Supported);

    session.bind_to(&SourceIdentity::new("Cam-B")).unwrap();
    assert_eq!(session.capability(), Capability::Unknown);
}
