//! Remote Control client against an in-process line server.

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;

use serde_json::{Value, json};
use tilebot_browser_ctrl::{DelimitedCodec, RemoteControlClient};
use tilebot_protocols::{ControlError, ScriptExecutor};

/// Serve one connection: each received line is reported on the channel and
/// answered with `respond(line)`. `None` closes the connection.
async fn fake_remote_control<F>(respond: F) -> (u16, mpsc::UnboundedReceiver<String>)
where
    F: Fn(&str) -> Option<String> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = FramedRead::new(read_half, DelimitedCodec::newline());
        while let Some(Ok(line)) = lines.next().await {
            let line = String::from_utf8_lossy(&line).into_owned();
            let answer = respond(&line);
            let _ = seen_tx.send(line);
            match answer {
                Some(reply) => {
                    if write_half.write_all(reply.as_bytes()).await.is_err() {
                        return;
                    }
                }
                None => return,
            }
        }
    });
    (port, seen_rx)
}

fn expect_err(result: Result<Value, ControlError>) -> ControlError {
    match result {
        Ok(value) => panic!("expected an error, got {}", value),
        Err(e) => e,
    }
}

#[tokio::test]
async fn test_script_sent_as_one_line() {
    let (port, mut seen) = fake_remote_control(|_| Some("{\"result\": 5}\n".to_string())).await;
    let client = RemoteControlClient::connect("127.0.0.1", port).await.unwrap();

    assert_eq!(client.execute("1 +\n 4").await.unwrap(), json!(5));
    assert_eq!(seen.recv().await.unwrap(), "1 +  4\r");
}

#[tokio::test]
async fn test_error_reply() {
    let (port, _seen) = fake_remote_control(|_| {
        Some("{\"error\": \"ReferenceError: nope is not defined\"}\n".to_string())
    })
    .await;
    let client = RemoteControlClient::connect("127.0.0.1", port).await.unwrap();

    match expect_err(client.execute("nope").await) {
        ControlError::RemoteCommand { message, .. } => assert!(message.contains("nope")),
        other => panic!("expected RemoteCommand, got {:?}", other),
    }
    assert!(matches!(
        client.execute("again").await,
        Err(ControlError::RemoteCommand { .. })
    ));
}

#[tokio::test]
async fn test_empty_reply_is_null() {
    let (port, _seen) = fake_remote_control(|_| Some("{}\n".to_string())).await;
    let client = RemoteControlClient::connect("127.0.0.1", port).await.unwrap();
    assert_eq!(client.execute("void 0").await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_calls_are_serialized() {
    let (port, _seen) = fake_remote_control(|line| {
        let script = line.trim_end_matches('\r');
        Some(format!("{}\n", json!({"result": script})))
    })
    .await;
    let client = RemoteControlClient::connect("127.0.0.1", port).await.unwrap();

    let scripts: Vec<String> = (0..5).map(|i| format!("s{}", i)).collect();
    let results = futures::future::join_all(scripts.iter().map(|s| client.execute(s))).await;
    for (script, result) in scripts.iter().zip(results) {
        assert_eq!(result.unwrap(), json!(script));
    }
}

#[tokio::test]
async fn test_closed_connection() {
    let (port, _seen) = fake_remote_control(|_| None).await;
    let client = RemoteControlClient::connect("127.0.0.1", port).await.unwrap();
    let err = expect_err(client.execute("1").await);
    assert!(matches!(err, ControlError::ConnectionClosed(_)), "{:?}", err);
}
