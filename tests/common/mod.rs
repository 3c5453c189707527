//! Shared test utilities and fixtures
//!
//! A wiremock stand-in for the ticket endpoint plus config helpers.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticketwall_config::ApiConfig;

pub const TICKETS_PATH: &str = "/buscarchamado";

/// A ticket as the endpoint serializes it.
pub fn ticket_json(protocol: u64, subject: &str, situation: Option<(i64, &str)>) -> Value {
    match situation {
        Some((id, description)) => json!({
            "protocol": protocol,
            "subject": subject,
            "situation": { "id": id, "description": description },
        }),
        None => json!({ "protocol": protocol, "subject": subject }),
    }
}

pub fn envelope(tickets: Vec<Value>) -> Value {
    json!({ "tickets": tickets })
}

/// One ticket in each category plus one outside all of them.
pub fn mixed_tickets() -> Vec<Value> {
    vec![
        ticket_json(101, "Printer offline", Some((1, "Open"))),
        ticket_json(102, "VPN drops", Some((1, "Open"))),
        ticket_json(103, "New laptop", Some((0, "Unlinked"))),
        ticket_json(104, "Password reset", Some((2, "Answered by agent"))),
        ticket_json(105, "Email quota", Some((3, "Answered by customer"))),
        ticket_json(106, "Archived", Some((7, "Closed"))),
        ticket_json(107, "No situation", None),
    ]
}

/// Answer every GET on the ticket path with `body`.
pub async fn mount_tickets(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(TICKETS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer the first GET with `body`, then fall through to later mocks.
pub async fn mount_tickets_once(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(TICKETS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// Answer the next `times` GETs with `status`, then fall through to later mocks.
pub async fn mount_status(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(TICKETS_PATH))
        .respond_with(ResponseTemplate::new(status))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// API config pointed at `server`, with short timeouts and no retries.
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        url: format!("{}{TICKETS_PATH}", server.uri()),
        timeout_secs: 2,
        max_retries: 0,
        ..ApiConfig::default()
    }
}
