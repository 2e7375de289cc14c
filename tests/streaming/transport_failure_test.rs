use chatstream::prelude::*;

use crate::support::{ScriptedResponse, ScriptedTransport, client_with, delta_line};

#[tokio::test]
async fn mid_stream_failure_keeps_delivered_fragments() {
    let transport = ScriptedTransport::new([ScriptedResponse::sse([
        delta_line("partial"),
        delta_line(" answer"),
    ])
    .then_fail(ChatError::Transport("connection reset by peer".to_string()))]);
    let client = client_with(&transport);

    let mut seen = Vec::new();
    let err = client
        .send(&[user!("hi")], |f| seen.push(f.to_string()))
        .await
        .expect_err("body failure surfaces");

    assert!(err.is_transport());
    assert_eq!(seen, vec!["partial", " answer"]);
    assert!(!client.is_busy());
}

#[tokio::test]
async fn connection_failure_before_response() {
    // No scripted response: the transport itself fails.
    let transport = ScriptedTransport::default();
    let client = client_with(&transport);

    let mut count = 0;
    let err = client
        .send(&[user!("hi")], |_| count += 1)
        .await
        .expect_err("transport fails");
    assert_eq!(err.category(), ErrorCategory::Network);
    assert_eq!(count, 0);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn rate_limit_status_is_reported_and_client_recovers() {
    let transport = ScriptedTransport::new([
        ScriptedResponse::status(429),
        ScriptedResponse::sse([delta_line("ok"), "data: [DONE]\n".to_string()]),
    ]);
    let client = client_with(&transport);

    let mut count = 0;
    let err = client
        .send(&[user!("hi")], |_| count += 1)
        .await
        .expect_err("429");
    assert_eq!(err.category(), ErrorCategory::RateLimit);
    assert_eq!(count, 0);

    let text = client.send(&[user!("hi")], |_| {}).await.expect("retry ok");
    assert_eq!(text, "ok");
}
