use chatstream::prelude::*;

use crate::support::{
    DONE_LINE, ScriptedResponse, ScriptedTransport, client_with, delta_line, load_sse_fixture,
    split_every,
};

async fn reply_for(chunks: Vec<Vec<u8>>) -> (String, Vec<String>) {
    let transport = ScriptedTransport::new([ScriptedResponse::sse(chunks)]);
    let client = client_with(&transport);
    let mut seen = Vec::new();
    let text = client
        .send(&[user!("hi")], |f| seen.push(f.to_string()))
        .await
        .expect("stream ok");
    (text, seen)
}

#[tokio::test]
async fn line_split_across_two_chunks_is_reassembled() {
    let line = delta_line("Hello");
    let (head, tail) = line.split_at(line.len() / 2);

    let (text, seen) = reply_for(vec![
        head.as_bytes().to_vec(),
        tail.as_bytes().to_vec(),
        DONE_LINE.as_bytes().to_vec(),
    ])
    .await;

    assert_eq!(seen, vec!["Hello"]);
    assert_eq!(text, "Hello");
}

#[tokio::test]
async fn every_chunk_size_yields_the_same_fragments() {
    let body = load_sse_fixture("openai/chat_stream.sse");
    let (expected, expected_seen) = reply_for(vec![body.clone().into_bytes()]).await;

    for size in [1, 2, 3, 7, 64, 333] {
        let (text, seen) = reply_for(split_every(&body, size)).await;
        assert_eq!(text, expected, "chunk size {size}");
        assert_eq!(seen, expected_seen, "chunk size {size}");
    }
}

#[tokio::test]
async fn multibyte_character_split_between_chunks() {
    let line = delta_line("日本語");
    let bytes = line.as_bytes();
    let cut = line.find('本').expect("present") + 1;

    let (text, _) = reply_for(vec![bytes[..cut].to_vec(), bytes[cut..].to_vec()]).await;
    assert_eq!(text, "日本語");
}

#[tokio::test]
async fn crlf_line_endings_are_accepted() {
    let body = delta_line("crlf").replace('\n', "\r\n") + "data: [DONE]\r\n";
    let (text, _) = reply_for(vec![body.into_bytes()]).await;
    assert_eq!(text, "crlf");
}

#[tokio::test]
async fn final_line_without_newline_is_decoded() {
    let line = delta_line("tail");
    let (text, _) = reply_for(vec![line.trim_end().as_bytes().to_vec()]).await;
    assert_eq!(text, "tail");
}
