//! Ticket endpoint decoding and bucketing, end to end over HTTP.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticketwall_client::{FetchError, StatusCode, TicketClient};
use ticketwall_types::{Board, StatusCategory};

use crate::common::{
    TICKETS_PATH, api_config, envelope, mixed_tickets, mount_status, mount_tickets,
};

#[tokio::test]
async fn live_feed_is_bucketed_by_situation() {
    let server = MockServer::start().await;
    mount_tickets(&server, envelope(mixed_tickets())).await;

    let client = TicketClient::new(&api_config(&server)).unwrap();
    let board = Board::from_tickets(client.fetch_tickets().await.unwrap());
    let counts = board.counts();

    assert_eq!(board.tickets().len(), 7);
    assert_eq!(counts.get(StatusCategory::Open), 2);
    assert_eq!(counts.get(StatusCategory::Unlinked), 1);
    assert_eq!(counts.get(StatusCategory::AnsweredByAgent), 1);
    assert_eq!(counts.get(StatusCategory::AnsweredByCustomer), 1);
    assert_eq!(counts.total(), 5);

    let open: Vec<String> = board.open_tickets().map(|t| t.headline()).collect();
    assert_eq!(open, ["#101 - Printer offline", "#102 - VPN drops"]);
}

#[tokio::test]
async fn textual_protocols_and_missing_fields_decode() {
    let server = MockServer::start().await;
    mount_tickets(
        &server,
        json!({
            "tickets": [
                { "protocol": "HD-77", "subject": "Badge reader", "situation": { "id": 1 } },
                { "protocol": null, "subject": "Anonymous", "situation": { "id": 1, "description": "  " } },
            ]
        }),
    )
    .await;

    let client = TicketClient::new(&api_config(&server)).unwrap();
    let board = Board::from_tickets(client.fetch_tickets().await.unwrap());
    let open: Vec<_> = board.open_tickets().collect();

    assert_eq!(open.len(), 2);
    assert_eq!(open[0].headline(), "#HD-77 - Badge reader");
    assert_eq!(open[0].situation_label(), "Unavailable");
    assert_eq!(open[1].headline(), "# - Anonymous");
    assert_eq!(open[1].situation_label(), "Unavailable");
}

#[tokio::test]
async fn empty_envelope_is_an_empty_board() {
    let server = MockServer::start().await;
    mount_tickets(&server, json!({})).await;

    let client = TicketClient::new(&api_config(&server)).unwrap();
    let tickets = client.fetch_tickets().await.unwrap();
    assert!(tickets.is_empty());
    assert_eq!(Board::from_tickets(tickets).counts().total(), 0);
}

#[tokio::test]
async fn server_error_surfaces_status() {
    let server = MockServer::start().await;
    mount_status(&server, 500, 1).await;

    let client = TicketClient::new(&api_config(&server)).unwrap();
    let err = client.fetch_tickets().await.unwrap_err();
    assert!(
        matches!(err, FetchError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn retries_recover_from_a_transient_outage() {
    let server = MockServer::start().await;
    mount_status(&server, 503, 1).await;
    mount_tickets(&server, envelope(mixed_tickets())).await;

    let mut config = api_config(&server);
    config.max_retries = 2;
    let client = TicketClient::new(&config).unwrap();

    let tickets = client.fetch_tickets().await.unwrap();
    assert_eq!(tickets.len(), 7);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn absurd_retry_after_ms_falls_back_to_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TICKETS_PATH))
        .respond_with(ResponseTemplate::new(503).insert_header("retry-after-ms", "1e300"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_tickets(&server, envelope(mixed_tickets())).await;

    let mut config = api_config(&server);
    config.max_retries = 1;
    let client = TicketClient::new(&config).unwrap();

    let tickets = client.fetch_tickets().await.unwrap();
    assert_eq!(tickets.len(), 7);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
