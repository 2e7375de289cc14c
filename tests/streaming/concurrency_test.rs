use chatstream::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use crate::support::{DONE_LINE, ScriptedResponse, ScriptedTransport, client_with, delta_line};

#[tokio::test]
async fn second_send_while_first_is_in_flight_is_rejected() {
    let transport = ScriptedTransport::new([
        ScriptedResponse::sse([delta_line("slow")]).then_hang(),
        ScriptedResponse::sse([delta_line("never sent")]),
    ]);
    let client = client_with(&transport);

    let one = [user!("one")];
    let first = client.send(&one, |_| {});
    tokio::pin!(first);
    let still_running = tokio::time::timeout(Duration::from_millis(50), &mut first).await;
    assert!(still_running.is_err(), "first send should be waiting on the body");
    assert!(client.is_busy());

    let mut count = 0;
    let second = client.send(&[user!("two")], |_| count += 1).await;
    assert_eq!(second, Err(ChatError::Busy));
    assert_eq!(count, 0);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn sequential_sends_reuse_the_client() {
    let transport = ScriptedTransport::new((0..3).map(|i| {
        ScriptedResponse::sse([delta_line(&format!("reply {i}")), DONE_LINE.to_string()])
    }));
    let client = client_with(&transport);

    for i in 0..3 {
        let text = client.send(&[user!("q")], |_| {}).await.expect("ok");
        assert_eq!(text, format!("reply {i}"));
    }
}

#[tokio::test]
async fn client_can_be_shared_across_tasks() {
    let transport = ScriptedTransport::new([ScriptedResponse::sse([
        delta_line("from task"),
        DONE_LINE.to_string(),
    ])]);
    let client = Arc::new(client_with(&transport));

    let shared = Arc::clone(&client);
    let text = tokio::spawn(async move {
        let history = vec![user!("hi")];
        shared.send(&history, |_| {}).await
    })
    .await
    .expect("task ok")
    .expect("send ok");

    assert_eq!(text, "from task");
    assert!(!client.is_busy());
}
