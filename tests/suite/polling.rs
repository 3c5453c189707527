//! Background polling against a live mock endpoint.

use std::time::Duration;

use wiremock::MockServer;

use ticketwall_client::TicketClient;
use ticketwall_engine::{App, DashboardConfig, FeedStatus, PollEvent, Poller, StatusCategory};

use crate::common::{
    api_config, envelope, mixed_tickets, mount_status, mount_tickets, mount_tickets_once,
    ticket_json,
};

const WAIT: Duration = Duration::from_secs(5);

async fn next_event(poller: &mut Poller) -> PollEvent {
    tokio::time::timeout(WAIT, poller.next())
        .await
        .expect("timed out waiting for poll")
        .expect("poller stopped")
}

#[tokio::test]
async fn poller_reports_success_then_failure() {
    let server = MockServer::start().await;
    mount_tickets_once(&server, envelope(mixed_tickets())).await;
    mount_status(&server, 503, u64::MAX).await;

    let client = TicketClient::new(&api_config(&server)).unwrap();
    let mut poller = Poller::spawn(client, Duration::from_millis(50));

    match next_event(&mut poller).await {
        PollEvent::Updated { tickets, .. } => assert_eq!(tickets.len(), 7),
        other => panic!("expected update, got {other:?}"),
    }
    match next_event(&mut poller).await {
        PollEvent::Failed { error, .. } => assert!(error.contains("503"), "{error}"),
        other => panic!("expected failure, got {other:?}"),
    }

    poller.shutdown().await;
}

#[tokio::test]
async fn app_keeps_last_board_through_an_outage() {
    let server = MockServer::start().await;
    mount_tickets_once(&server, envelope(mixed_tickets())).await;
    mount_status(&server, 503, u64::MAX).await;

    let client = TicketClient::new(&api_config(&server)).unwrap();
    let mut poller = Poller::spawn(client, Duration::from_millis(50));
    let mut app = App::new(&DashboardConfig::default());

    app.apply_event(next_event(&mut poller).await);
    let last_success = app.feed().last_success();
    assert!(last_success.is_some());
    assert!(app.highlight(StatusCategory::Open).is_some());

    app.apply_event(next_event(&mut poller).await);
    assert!(matches!(app.feed(), FeedStatus::Stale { .. }));
    assert_eq!(app.feed().last_success(), last_success);
    assert_eq!(app.board().counts().get(StatusCategory::Open), 2);
    assert_eq!(app.board().open_len(), 2);

    poller.shutdown().await;
}

#[tokio::test]
async fn refresh_fetches_without_waiting_for_the_interval() {
    let server = MockServer::start().await;
    mount_tickets(&server, envelope(mixed_tickets())).await;

    let client = TicketClient::new(&api_config(&server)).unwrap();
    let mut poller = Poller::spawn(client, Duration::from_secs(3600));

    assert!(matches!(next_event(&mut poller).await, PollEvent::Updated { .. }));
    poller.refresh();
    assert!(matches!(next_event(&mut poller).await, PollEvent::Updated { .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    poller.shutdown().await;
}

#[tokio::test]
async fn app_polls_on_its_own() {
    let server = MockServer::start().await;
    mount_tickets(
        &server,
        envelope(vec![
            ticket_json(1, "Printer offline", Some((1, "Open"))),
            ticket_json(2, "Quota", Some((3, "Answered by customer"))),
        ]),
    )
    .await;

    let mut config = DashboardConfig::default();
    config.api = api_config(&server);
    let mut app = App::new(&config);
    app.start_polling(TicketClient::new(&config.api).unwrap());

    let deadline = tokio::time::Instant::now() + WAIT;
    while matches!(app.feed(), FeedStatus::Loading) {
        assert!(tokio::time::Instant::now() < deadline, "no poll arrived");
        tokio::time::sleep(Duration::from_millis(20)).await;
        app.process_poll_events();
    }

    assert!(matches!(app.feed(), FeedStatus::Live { .. }));
    assert_eq!(app.board().counts().get(StatusCategory::AnsweredByCustomer), 1);
    assert_eq!(app.board().open_len(), 1);

    app.shutdown().await;
}
