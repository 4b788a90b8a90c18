//! Tests against the real API.
//!
//! Ignored by default. Run with credentials in the environment:
//!
//! ```text
//! SENDSAY_LOGIN=... SENDSAY_PASSWORD=... SENDSAY_TEST_EMAIL=... cargo test --test live_api -- --ignored
//! ```

use sendsay_api::{SendsayClient, SendsayClientBuilder, Track, WaitOptions};
use serde_json::json;
use std::time::Duration;

fn live_client() -> Option<SendsayClient> {
    if std::env::var("SENDSAY_LOGIN").is_err() {
        eprintln!("SENDSAY_LOGIN not set, skipping");
        return None;
    }
    Some(SendsayClientBuilder::from_env().unwrap().build().unwrap())
}

#[tokio::test]
#[ignore]
async fn live_ping() {
    let mut client = SendsayClient::new().unwrap();
    let response = client.ping().await.unwrap();
    assert!(response.contains("pong"));
}

#[tokio::test]
#[ignore]
async fn live_relogin_after_logout() {
    let Some(mut client) = live_client() else { return };

    client.login().await.unwrap();
    client.request("logout", ()).await.unwrap();
    let response = client
        .request("sys.settings.get", json!({"list": ["about.id"]}))
        .await
        .unwrap();

    assert!(response.contains("list"));
}

#[tokio::test]
#[ignore]
async fn live_send_and_track() {
    let Some(mut client) = live_client() else { return };
    let Ok(email) = std::env::var("SENDSAY_TEST_EMAIL") else {
        eprintln!("SENDSAY_TEST_EMAIL not set, skipping");
        return;
    };

    let response = client
        .request(
            "issue.send",
            json!({
                "sendwhen": "test",
                "letter": {
                    "subject": "sendsay-api live test",
                    "from.email": email,
                    "message": {"text": "ping"}
                },
                "relink": 1,
                "users.list": email,
                "group": "masssending"
            }),
        )
        .await
        .unwrap();

    let mut track: Track = response.track().expect("issue.send returns track.id");
    let outcome = track
        .wait(
            &mut client,
            &WaitOptions::new()
                .with_interval(Duration::from_secs(2))
                .with_max_polls(30),
            |poll| eprintln!("{} ({})", poll.status_label(), poll.status_code()),
        )
        .await
        .unwrap();
    eprintln!("{outcome:?}");
}
