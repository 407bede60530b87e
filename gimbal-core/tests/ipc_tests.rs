//! Integration tests for the IPC protocol

use gimbal_core::ipc::{ControllerStatus, IpcMessage, IpcResponse};
use gimbal_core::manager::ManagerStats;
use gimbal_core::types::{Axis, Capability, MotionCommand};

fn round_trip_message(msg: IpcMessage) -> IpcMessage {
    let bytes = msg.to_bytes();
    assert_eq!(*bytes.last().unwrap(), b'\n');
    IpcMessage::from_bytes(&bytes[..bytes.len() - 1]).expect("message should parse")
}

fn round_trip_response(resp: IpcResponse) -> IpcResponse {
    let bytes = resp.to_bytes();
    assert_eq!(*bytes.last().unwrap(), b'\n');
    IpcResponse::from_bytes(&bytes[..bytes.len() - 1]).expect("response should parse")
}

#[test]
fn test_ping_round_trip() {
    assert!(matches!(round_trip_message(IpcMessage::Ping), IpcMessage::Ping));
    assert!(matches!(
        round_trip_response(IpcResponse::Pong),
        IpcResponse::Pong
    ));
}

#[test]
fn test_select_round_trip() {
    let parsed = round_trip_message(IpcMessage::Select { index: 42 });
    assert!(matches!(parsed, IpcMessage::Select { index: 42 }));
}

#[test]
fn test_axis_round_trip() {
    let parsed = round_trip_message(IpcMessage::Axis {
        axis: Axis::Tilt,
        value: -0.5,
    });
    match parsed {
        IpcMessage::Axis { axis, value } => {
            assert_eq!(axis, Axis::Tilt);
            assert_eq!(value, -0.5);
        }
        other => panic!("unexpected message: {:?}", other),
    }
}

#[test]
fn test_axis_serializes_lowercase() {
    let msg = IpcMessage::Axis {
        axis: Axis::Pan,
        value: 0.5,
    };
    let json = String::from_utf8(msg.to_bytes()).unwrap();
    assert!(json.contains("\"pan\""), "got: {}", json);
}

#[test]
fn test_move_and_stop_round_trip() {
    assert!(matches!(round_trip_message(IpcMessage::Move), IpcMessage::Move));
    assert!(matches!(round_trip_message(IpcMessage::Stop), IpcMessage::Stop));
    assert!(matches!(
        round_trip_response(IpcResponse::Stopping),
        IpcResponse::Stopping
    ));
}

#[test]
fn test_selected_round_trip() {
    let parsed = round_trip_response(IpcResponse::Selected {
        name: "Cam-B".to_string(),
    });
    assert!(matches!(parsed, IpcResponse::Selected { name } if name == "Cam-B"));
}

#[test]
fn test_error_response_helper() {
    let resp = IpcResponse::error("scan timed out");
    match round_trip_response(resp) {
        IpcResponse::Error { message } => assert_eq!(message, "scan timed out"),
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_status_round_trip() {
    let status = ControllerStatus {
        manager: ManagerStats {
            bound: true,
            source: Some("Cam-B".to_string()),
            source_name: Some("Cam-B".to_string()),
            selected_index: Some(1),
            capability: Capability::Supported,
            scan_generation: 3,
            discovered: Some(4),
            pending: MotionCommand::new(0.1, -0.2, 0.3),
            last_commanded: Some(MotionCommand::new(0.1, -0.2, 0.3)),
        },
        pid: 4242,
        uptime_seconds: 12.5,
    };

    match round_trip_response(IpcResponse::Status(status)) {
        IpcResponse::Status(parsed) => {
            assert!(parsed.manager.bound);
            assert_eq!(parsed.manager.source.as_deref(), Some("Cam-B"));
            assert_eq!(parsed.manager.selected_index, Some(1));
            assert_eq!(parsed.manager.capability, Capability::Supported);
            assert_eq!(parsed.manager.scan_generation, 3);
            assert_eq!(parsed.manager.discovered, Some(4));
            assert_eq!(parsed.pid, 4242);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_invalid_message_rejected() {
    assert!(IpcMessage::from_bytes(b"{\"type\":\"Teleport\"}").is_err());
    assert!(IpcMessage::from_bytes(b"not json").is_err());
}
