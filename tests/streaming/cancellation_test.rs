use chatstream::prelude::*;
use std::time::Duration;

use crate::support::{ScriptedResponse, ScriptedTransport, client_with, delta_line};

#[tokio::test]
async fn cancel_from_callback_stops_a_hanging_stream() {
    let transport =
        ScriptedTransport::new([ScriptedResponse::sse([delta_line("first")]).then_hang()]);
    let client = client_with(&transport);
    let cancel = CancelHandle::new();

    let mut seen = Vec::new();
    let result = tokio::time::timeout(
        Duration::from_secs(2),
        client.send_cancellable(&[user!("hi")], &cancel, |f| {
            seen.push(f.to_string());
            cancel.cancel();
        }),
    )
    .await
    .expect("cancellation must not hang");

    assert_eq!(result, Err(ChatError::Cancelled));
    assert_eq!(seen, vec!["first"]);
    assert!(!client.is_busy());
}

#[tokio::test]
async fn cancel_before_send_delivers_nothing() {
    let transport = ScriptedTransport::new([ScriptedResponse::sse([delta_line("never")])]);
    let client = client_with(&transport);
    let cancel = CancelHandle::new();
    cancel.cancel();

    let mut count = 0;
    let result = client
        .send_cancellable(&[user!("hi")], &cancel, |_| count += 1)
        .await;
    assert_eq!(result, Err(ChatError::Cancelled));
    assert_eq!(count, 0);
}

#[tokio::test]
async fn cancel_from_another_task() {
    let transport = ScriptedTransport::new([ScriptedResponse::sse(Vec::<String>::new()).then_hang()]);
    let client = client_with(&transport);
    let cancel = CancelHandle::new();

    let remote = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        remote.cancel();
    });

    let result = client
        .send_cancellable(&[user!("hi")], &cancel, |_| {})
        .await;
    assert_eq!(result, Err(ChatError::Cancelled));
}

#[tokio::test]
async fn completed_send_ignores_later_cancel() {
    let transport = ScriptedTransport::new([ScriptedResponse::sse([
        delta_line("done"),
        "data: [DONE]\n".to_string(),
    ])]);
    let client = client_with(&transport);
    let cancel = CancelHandle::new();

    let text = client
        .send_cancellable(&[user!("hi")], &cancel, |_| {})
        .await
        .expect("completes");
    cancel.cancel();
    assert_eq!(text, "done");
}
