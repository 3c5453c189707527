//! Config file to running dashboard.

use std::fs;
use std::time::Duration;

use tempfile::tempdir;
use wiremock::MockServer;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use ticketwall_client::TicketClient;
use ticketwall_config::{ConfigError, DashboardConfig};
use ticketwall_engine::App;

use crate::common::{TICKETS_PATH, envelope, mixed_tickets};

#[tokio::test]
async fn config_file_drives_client_and_app() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TICKETS_PATH))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(mixed_tickets())))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let file = dir.path().join("config.toml");
    fs::write(
        &file,
        r#"
[app]
title = "Service desk"
ascii_only = true

[api]
url = "${MOCK_URI}/buscarchamado"
poll_interval_ms = 2000
token = "${DESK_TOKEN}"

[display]
highlight_ms = 1000
"#,
    )
    .unwrap();

    let mut config = DashboardConfig::load_from(&file).unwrap();
    let uri = server.uri();
    config.apply_env(|name| match name {
        "MOCK_URI" => Some(uri.clone()),
        "DESK_TOKEN" => Some("s3cret".to_string()),
        _ => None,
    });

    assert_eq!(config.api.poll_interval(), Duration::from_secs(2));
    assert!(!format!("{:?}", config.api).contains("s3cret"));

    let app = App::new(&config);
    assert_eq!(app.title(), "Service desk");
    assert!(app.ui_options().ascii_only);

    let client = TicketClient::new(&config.api).unwrap();
    assert_eq!(client.fetch_tickets().await.unwrap().len(), 7);
}

#[test]
fn broken_config_file_reports_its_path() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("config.toml");
    fs::write(&file, "[api\nurl = ").unwrap();

    let err = DashboardConfig::load_from(&file).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), file.as_path());
}
