//! postern integration test harness.
//!
//! Tests drive the full delivery workflow in-process against a scripted
//! fake agent: a TCP listener that speaks the agent wire protocol,
//! answers each client frame according to its script, and records every
//! frame it receives in arrival order. No real overlay is involved —
//! the point is the client's sequencing, error mapping, and wire shape.

mod probe;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use postern_core::inputs::DeliveryInputs;

// ── Fake agent ────────────────────────────────────────────────────────────────

/// What the fake agent answers at each stage of the workflow.
#[derive(Clone)]
pub struct AgentScript {
    /// Code carried in the ready completion.
    pub ready_code: i32,
    /// Status carried in the probe completion.
    pub probe_status: i32,
    /// Handle carried in the open completion. Negative = open rejected.
    pub open_handle: i64,
    /// Frames emitted right after the open completion, before any body
    /// frame arrives from the client.
    pub after_open: Vec<Value>,
    /// Frames emitted once the client's send frame arrives.
    pub after_send: Vec<Value>,
    /// Drop the connection after the `after_send` frames went out.
    pub close_after_send: bool,
}

impl AgentScript {
    /// Ready, service available, open accepted, send acked, clean EOF.
    pub fn happy() -> Self {
        Self {
            ready_code: 0,
            probe_status: 0,
            open_handle: 7,
            after_open: vec![json!({"ev": "response", "code": 200, "status": "200 OK"})],
            after_send: vec![
                json!({"ev": "sent", "status": 0}),
                json!({"ev": "body", "len": -4095}),
            ],
            close_after_send: false,
        }
    }
}

/// One scripted agent listening on a loopback port.
pub struct FakeAgent {
    pub addr: String,
    frames: Arc<Mutex<Vec<Value>>>,
}

impl FakeAgent {
    pub async fn spawn(script: AgentScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let frames = Arc::new(Mutex::new(Vec::new()));

        let seen = frames.clone();
        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();
            let mut opened = false;

            while let Ok(Some(line)) = lines.next_line().await {
                let frame: Value = serde_json::from_str(&line).expect("client sent invalid JSON");
                let op = frame["op"].as_str().unwrap_or("").to_string();
                seen.lock().unwrap().push(frame);

                let replies = match op.as_str() {
                    "hello" => vec![json!({"ev": "ready", "code": script.ready_code})],
                    "probe" => {
                        vec![json!({"ev": "probe_result", "status": script.probe_status})]
                    }
                    "open" => {
                        opened = true;
                        let mut replies =
                            vec![json!({"ev": "opened", "handle": script.open_handle})];
                        replies.extend(script.after_open.clone());
                        replies
                    }
                    "send" => {
                        assert!(opened, "send frame arrived before open completed");
                        script.after_send.clone()
                    }
                    other => panic!("unexpected op from client: {other:?}"),
                };

                for reply in replies {
                    let line = format!("{reply}\n");
                    if write_half.write_all(line.as_bytes()).await.is_err() {
                        return;
                    }
                }

                if op == "send" && script.close_after_send {
                    return;
                }
            }
        });

        Self { addr, frames }
    }

    /// Every frame received so far, in arrival order.
    pub fn frames(&self) -> Vec<Value> {
        self.frames.lock().unwrap().clone()
    }

    /// Just the op names, in arrival order.
    pub fn ops(&self) -> Vec<String> {
        self.frames()
            .iter()
            .map(|f| f["op"].as_str().unwrap_or("").to_string())
            .collect()
    }
}

// ── Input helpers ─────────────────────────────────────────────────────────────

/// A scratch directory for one test, removed by the caller.
pub fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("postern-it-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Inputs wired to a fake agent at `agent_addr`.
pub fn test_inputs(agent_addr: &str, dir: &Path) -> DeliveryInputs {
    DeliveryInputs {
        identity: format!(r#"{{"agent":"{agent_addr}","token":"test-token"}}"#),
        identity_path: dir.join("identity.json"),
        webhook_url: "https://example.org/hook".to_string(),
        webhook_secret: "s3cr3t".to_string(),
        event_name: "push".to_string(),
        event: json!({"a": 1}),
    }
}
