use chatstream::prelude::*;
use futures_util::StreamExt;

use crate::support::{DONE_LINE, ScriptedResponse, ScriptedTransport, client_with, delta_line};

#[tokio::test]
async fn stream_yields_fragments_then_ends() {
    let transport = ScriptedTransport::new([ScriptedResponse::sse([
        delta_line("a"),
        delta_line("b"),
        DONE_LINE.to_string(),
    ])]);
    let client = client_with(&transport);

    let handle = client.stream(&[user!("hi")]).await.expect("opened");
    let fragments: Vec<String> = handle
        .stream
        .map(|f| f.expect("fragment"))
        .collect()
        .await;
    assert_eq!(fragments, vec!["a", "b"]);
    assert!(!client.is_busy());
}

#[tokio::test]
async fn stream_reports_status_before_any_fragment() {
    let transport = ScriptedTransport::new([ScriptedResponse::status(401)]);
    let client = client_with(&transport);

    let err = client
        .stream(&[user!("hi")])
        .await
        .expect_err("status error is eager");
    assert_eq!(err, ChatError::HttpStatus { code: 401 });
    assert!(!client.is_busy());
}

#[tokio::test]
async fn cancelling_the_handle_ends_the_stream() {
    let transport =
        ScriptedTransport::new([ScriptedResponse::sse([delta_line("only")]).then_hang()]);
    let client = client_with(&transport);

    let mut handle = client.stream(&[user!("hi")]).await.expect("opened");
    let first = handle.stream.next().await.expect("one item").expect("ok");
    assert_eq!(first, "only");

    handle.cancel();
    assert!(handle.stream.next().await.is_none());
}

#[tokio::test]
async fn client_is_busy_while_a_stream_is_alive() {
    let transport = ScriptedTransport::new([
        ScriptedResponse::sse([delta_line("x")]).then_hang(),
        ScriptedResponse::sse([delta_line("y"), DONE_LINE.to_string()]),
    ]);
    let client = client_with(&transport);

    let handle = client.stream(&[user!("hi")]).await.expect("opened");
    assert!(client.is_busy());
    assert_eq!(
        client.send(&[user!("again")], |_| {}).await,
        Err(ChatError::Busy)
    );

    drop(handle);
    assert!(!client.is_busy());
    let text = client.send(&[user!("again")], |_| {}).await.expect("free again");
    assert_eq!(text, "y");
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn stream_surfaces_body_errors_as_items() {
    let transport = ScriptedTransport::new([ScriptedResponse::sse([delta_line("p")])
        .then_fail(ChatError::Transport("reset".to_string()))]);
    let client = client_with(&transport);

    let items: Vec<_> = client
        .stream(&[user!("hi")])
        .await
        .expect("opened")
        .stream
        .collect()
        .await;
    assert_eq!(
        items,
        vec![Ok("p".to_string()), Err(ChatError::Transport("reset".to_string()))]
    );
}
