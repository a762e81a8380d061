//! Wire-level tests of [`HttpArmService`] against a scripted local server.

use std::io::Read;
use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;
use std::time::Duration;

use armlink::api::{ArmService, HttpArmService};
use armlink::{ArmError, ClientConfig, JointId, LimitKind};

#[derive(Debug, PartialEq, Eq)]
struct Recorded {
    method: String,
    url: String,
    body: String,
}

/// One scripted HTTP exchange: status code and response body.
type Script = (u16, &'static str);

/// Serve exactly `script.len()` requests on an ephemeral port, recording
/// each one, then shut down.
fn scripted_server(script: Vec<Script>) -> (ClientConfig, Receiver<Recorded>, JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let (tx, rx) = mpsc::channel();

    let handle = std::thread::spawn(move || {
        for (status, body) in script {
            let mut request = server.recv().unwrap();
            let mut recorded_body = String::new();
            request
                .as_reader()
                .read_to_string(&mut recorded_body)
                .unwrap();
            let _ = tx.send(Recorded {
                method: request.method().to_string(),
                url: request.url().to_owned(),
                body: recorded_body,
            });
            let response =
                tiny_http::Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
        }
    });

    let config = ClientConfig {
        base_url: format!("http://127.0.0.1:{port}/services").into(),
        read_timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    (config, rx, handle)
}

#[test]
fn joint_info_hits_the_info_endpoint_and_decodes() {
    let (config, recorded, handle) =
        scripted_server(vec![(200, r#"{"pos": 90, "min": 0, "max": 180}"#)]);
    let service = HttpArmService::new(&config);

    let info = service.joint_info(JointId::Base).unwrap();
    assert_eq!((info.pos, info.min, info.max), (90, 0, 180));

    let request = recorded.recv().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "/services/base/info");
    handle.join().unwrap();
}

#[test]
fn malformed_info_body_is_an_invalid_response() {
    let (config, _recorded, handle) = scripted_server(vec![(200, "not json")]);
    let service = HttpArmService::new(&config);

    let err = service.joint_info(JointId::Wrist).unwrap_err();
    assert!(matches!(err, ArmError::InvalidResponse(_)), "{err:?}");
    handle.join().unwrap();
}

#[test]
fn set_position_puts_a_pos_body() {
    let (config, recorded, handle) = scripted_server(vec![(200, "")]);
    let service = HttpArmService::new(&config);

    service.set_position(JointId::Shoulder, 120).unwrap();

    let request = recorded.recv().unwrap();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.url, "/services/shoulder");
    assert_eq!(request.body, r#"{"pos":120}"#);
    handle.join().unwrap();
}

#[test]
fn set_limit_puts_the_named_bound() {
    let (config, recorded, handle) = scripted_server(vec![(200, "")]);
    let service = HttpArmService::new(&config);

    service.set_limit(JointId::Grip, LimitKind::Max, 95).unwrap();

    let request = recorded.recv().unwrap();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.url, "/services/grip");
    assert_eq!(request.body, r#"{"max":95}"#);
    handle.join().unwrap();
}

#[test]
fn rejected_limit_carries_the_service_reason() {
    let (config, _recorded, handle) =
        scripted_server(vec![(400, r#"{"status": 400, "message": "max below min"}"#)]);
    let service = HttpArmService::new(&config);

    let err = service
        .set_limit(JointId::Grip, LimitKind::Max, 40)
        .unwrap_err();
    assert_eq!(err, ArmError::LimitRejected("max below min".into()));
    handle.join().unwrap();
}

#[test]
fn acquire_posts_the_operator_name() {
    let (config, recorded, handle) = scripted_server(vec![(200, "")]);
    let service = HttpArmService::new(&config);

    service.acquire_control("alice").unwrap();

    let request = recorded.recv().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/services/control");
    assert_eq!(request.body, r#"{"name":"alice"}"#);
    handle.join().unwrap();
}

#[test]
fn acquire_conflict_names_the_holder() {
    let (config, _recorded, handle) =
        scripted_server(vec![(409, r#"{"status": 409, "message": "alice"}"#)]);
    let service = HttpArmService::new(&config);

    let err = service.acquire_control("bob").unwrap_err();
    assert_eq!(
        err,
        ArmError::ControlHeld {
            holder: "alice".into(),
        }
    );
    handle.join().unwrap();
}

#[test]
fn acquire_conflict_without_a_body_falls_back() {
    let (config, _recorded, handle) = scripted_server(vec![(423, "")]);
    let service = HttpArmService::new(&config);

    let err = service.acquire_control("bob").unwrap_err();
    assert_eq!(
        err,
        ArmError::ControlHeld {
            holder: "unknown".into(),
        }
    );
    handle.join().unwrap();
}

#[test]
fn release_deletes_the_control_resource() {
    let (config, recorded, handle) = scripted_server(vec![(200, "")]);
    let service = HttpArmService::new(&config);

    service.release_control().unwrap();

    let request = recorded.recv().unwrap();
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.url, "/services/control");
    handle.join().unwrap();
}

#[test]
fn camera_url_returns_the_trimmed_body() {
    let (config, recorded, handle) =
        scripted_server(vec![(200, "http://127.0.0.1:8080/stream\n")]);
    let service = HttpArmService::new(&config);

    let url = service.camera_url().unwrap();
    assert_eq!(url, "http://127.0.0.1:8080/stream");

    let request = recorded.recv().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "/services/camera/URL");
    handle.join().unwrap();
}

#[test]
fn server_errors_surface_as_transport_failures() {
    let (config, _recorded, handle) = scripted_server(vec![(500, "boom")]);
    let service = HttpArmService::new(&config);

    let err = service.joint_info(JointId::Base).unwrap_err();
    assert_eq!(err, ArmError::Transport("status 500".into()));
    handle.join().unwrap();
}
