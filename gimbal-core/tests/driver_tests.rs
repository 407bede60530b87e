//! Integration tests for the control thread driver

use gimbal_core::backend::{SimBackend, SimEvent};
use gimbal_core::config::ControlConfig;
use gimbal_core::driver::ManagerDriver;
use gimbal_core::error::GimbalError;
use gimbal_core::manager::Manager;
use gimbal_core::types::{Axis, MotionCommand};
use std::sync::Arc;
use std::time::Duration;

fn driver(backend: &Arc<SimBackend>) -> ManagerDriver {
    let config = ControlConfig::default()
        .with_scan_timeout(Duration::from_millis(200))
        .with_poll_timeout(Duration::from_millis(50));
    ManagerDriver::spawn(Manager::new(backend.clone(), config)).expect("spawn control thread")
}

#[tokio::test]
async fn test_select_completes_before_reply() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A", "Cam-B"]));
    let driver = driver(&backend);

    let name = driver.select(1).await.unwrap();

    assert_eq!(name, "Cam-B");
    let stats = driver.stats().await.unwrap();
    assert!(stats.bound);
    assert_eq!(stats.source.as_deref(), Some("Cam-B"));

    driver.shutdown().await;
}

#[tokio::test]
async fn test_events_apply_in_submission_order() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A"]));
    let driver = driver(&backend);

    driver.select(0).await.unwrap();
    // Fire-and-forget events; the stats reply is queued behind them, so
    // awaiting it proves they were applied in order.
    driver.set_axis(Axis::Pan, 0.5).unwrap();
    driver.set_axis(Axis::Tilt, -0.5).unwrap();
    driver.trigger().unwrap();

    let stats = driver.stats().await.unwrap();
    assert_eq!(
        stats.last_commanded,
        Some(MotionCommand::new(0.5, -0.5, 0.0))
    );
    assert!(backend.events().contains(&SimEvent::PanTilt {
        source: "Cam-A".to_string(),
        pan: 0.5,
        tilt: -0.5,
    }));

    driver.shutdown().await;
}

#[tokio::test]
async fn test_select_failure_keeps_driver_alive() {
    let backend = Arc::new(SimBackend::new());
    let driver = driver(&backend);

    let err = driver.select(0).await.unwrap_err();
    assert!(matches!(err, GimbalError::DiscoveryTimeout { .. }));

    // The control thread soaks the failure and keeps serving events
    let stats = driver.stats().await.unwrap();
    assert!(!stats.bound);

    driver.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_releases_session_once() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A"]));
    let driver = driver(&backend);

    driver.select(0).await.unwrap();
    driver.shutdown().await;
    driver.shutdown().await;

    let disconnects = backend
        .events()
        .iter()
        .filter(|e| **e == SimEvent::Disconnected("Cam-A".to_string()))
        .count();
    assert_eq!(disconnects, 1);
    assert_eq!(backend.open_connection_count(), 0);
}

#[tokio::test]
async fn test_events_after_shutdown_are_rejected() {
    let backend = Arc::new(SimBackend::with_sources(&["Cam-A"]));
    let driver = driver(&backend);

    driver.shutdown().await;

    assert!(matches!(
        driver.trigger(),
        Err(GimbalError::NoActiveSession)
    ));
    assert!(driver.select(0).await.is_err());
}
