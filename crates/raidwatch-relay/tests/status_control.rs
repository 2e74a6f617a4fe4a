//! Status prober, status monitor, and control command tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use raidwatch_core::protocol::{Command, Identity};
use raidwatch_relay::config;
use raidwatch_relay::services::{ControlClient, PlayerStatus, StatusMonitor, StatusProber};

mod scripted_client;
use scripted_client::{err, ok, ScriptedClient};

const TIMEOUT: Duration = Duration::from_secs(1);

fn bob() -> Identity {
    Identity::new("Bob", "MyPass", "server_2")
}

#[tokio::test]
async fn probe_maps_boolean_and_everything_else() {
    let client = Arc::new(ScriptedClient::new(vec![
        ok(json!(true)),
        ok(json!(false)),
        ok(json!("invalid")),
        err("NotLoggedIn"),
        None,
    ]));
    let prober = StatusProber::new(client.clone());

    assert_eq!(prober.probe(&bob(), TIMEOUT).await, Some(true));
    assert_eq!(prober.probe(&bob(), TIMEOUT).await, Some(false));
    assert_eq!(prober.probe(&bob(), TIMEOUT).await, None);
    assert_eq!(prober.probe(&bob(), TIMEOUT).await, None);
    assert_eq!(prober.probe(&bob(), TIMEOUT).await, None);

    let calls = client.calls();
    assert_eq!(calls.len(), 5);
    assert!(calls.iter().all(|c| c.command == Command::Info));
    assert_eq!(json!(calls[0].args), json!({"name": "connected"}));
}

#[tokio::test]
async fn monitor_reports_every_player_in_order() {
    let cfg = config::load_from_str(
        r#"
version: 1
server: { url: "ws://127.0.0.1:1" }
players:
  - info: { server: "server_1", username: "Alice", password: "Alice123" }
    services:
      attack_listener: { enabled: false }
      storm_searcher: { enabled: true }
    visibility: [1234, 2468]
  - info: { server: "server_2", username: "Bob", password: "MyPass" }
    services:
      attack_listener: { enabled: true }
    visibility: [1357, 89]
"#,
    )
    .unwrap();

    for (answer, expected) in [
        (json!(true), Some(true)),
        (json!(false), Some(false)),
        (json!("invalid"), None),
    ] {
        let client = Arc::new(ScriptedClient::constant(
            raidwatch_core::protocol::ResponseContent::Response(answer),
            2,
        ));
        let monitor = StatusMonitor::new(client, cfg.players.clone(), TIMEOUT);
        let status = monitor.get_status().await;

        assert_eq!(
            status,
            vec![
                (
                    PlayerStatus {
                        username: "Alice".into(),
                        server: "server_1".into(),
                        connected: expected,
                        attack_warnings: false,
                    },
                    vec![1234, 2468],
                ),
                (
                    PlayerStatus {
                        username: "Bob".into(),
                        server: "server_2".into(),
                        connected: expected,
                        attack_warnings: true,
                    },
                    vec![1357, 89],
                ),
            ]
        );
    }
}

#[tokio::test]
async fn control_commands_map_outcomes() {
    let client = Arc::new(ScriptedClient::new(vec![
        ok(json!("ok")),
        err("AlreadyConnected"),
        None,
    ]));
    let control = ControlClient::new(client.clone(), TIMEOUT);

    assert_eq!(control.disconnect(&bob()).await.unwrap(), json!("ok"));
    let e = control.reconnect(&bob()).await.unwrap_err();
    assert_eq!(e.kind().as_str(), "SERVER");
    let e = control.reconnect(&bob()).await.unwrap_err();
    assert_eq!(e.kind().as_str(), "TIMEOUT");

    let commands: Vec<Command> = client.calls().iter().map(|c| c.command).collect();
    assert_eq!(
        commands,
        vec![Command::Disconnect, Command::Reconnect, Command::Reconnect]
    );
}
