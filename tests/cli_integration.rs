//! Integration tests for the `crmb` CLI.
//!
//! Offline commands run against snapshot files in a temp directory; network
//! commands run against a loopback stub server that records each request.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;

const BOARD_JSON: &str = r#"{
  "title": "Leads",
  "columns": [
    { "status": "New", "cards": [
      { "model": "lead", "id": 7, "label": "Acme Corp" },
      { "model": "lead", "id": 8, "label": "Initech" } ] },
    { "status": "Won", "cards": [] }
  ]
}"#;

const RECORD_JSON: &str = r#"{"_sa_instance_state":"<state>","id":7,"name":"Acme Corp","email":null,"phone":"555-0100","revenue":1500.0}"#;

/// Run `crmb` in `dir`, returning (stdout, stderr, success).
fn run_crmb(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_crmb"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run crmb");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `crmb` expecting success, return stdout.
fn run_crmb_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_crmb(dir, args);
    if !success {
        panic!(
            "crmb {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// Stub server
// ---------------------------------------------------------------------------

/// One request as seen by the stub: "METHOD /path?query" and the body
#[derive(Debug, Clone)]
struct Seen {
    target: String,
    body: String,
}

struct StubServer {
    base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl StubServer {
    fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

/// Answers the three board endpoints with canned data
fn route(target: &str) -> (u16, String) {
    match target {
        "POST /api/update_status" => (200, String::new()),
        "GET /api/record/lead/7" => (200, RECORD_JSON.to_string()),
        t if t.starts_with("GET /api/users?q=al") => (200, r#"{"users":["alice","alan"]}"#.to_string()),
        t if t.starts_with("GET /api/users") => (200, r#"{"users":[]}"#.to_string()),
        _ => (404, "not found".to_string()),
    }
}

fn start_stub() -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            serve_one(stream, &log);
        }
    });

    StubServer { base_url, seen }
}

/// Record the request before answering, so it is logged by the time the
/// client sees a response
fn serve_one(mut stream: TcpStream, log: &Mutex<Vec<Seen>>) -> Option<()> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let target = format!("{} {}", parts.next()?, parts.next()?);

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;

    let (status, payload) = route(&target);
    log.lock().unwrap().push(Seen {
        target,
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    stream.write_all(response.as_bytes()).ok()?;
    stream.flush().ok()
}

// ---------------------------------------------------------------------------
// Offline commands
// ---------------------------------------------------------------------------

#[test]
fn test_columns_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("board.json"), BOARD_JSON).unwrap();

    let out = run_crmb_ok(tmp.path(), &["columns", "board.json"]);
    assert_eq!(
        out,
        "Leads\nNew (2)\n  lead 7  Acme Corp\n  lead 8  Initech\nWon (0)\n"
    );
}

#[test]
fn test_columns_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("board.json"), BOARD_JSON).unwrap();

    let out = run_crmb_ok(tmp.path(), &["columns", "board.json", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["title"], "Leads");
    assert_eq!(json["columns"][0]["cards"][0]["id"], "7");
    assert_eq!(json["columns"][1]["status"], "Won");
}

#[test]
fn test_columns_missing_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_crmb(tmp.path(), &["columns", "nope.json"]);
    assert!(!success);
    assert!(stderr.contains("error:"), "stderr: {}", stderr);
    assert!(stderr.contains("nope.json"), "stderr: {}", stderr);
}

#[test]
fn test_columns_duplicate_card() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("board.json"),
        r#"{"columns": [{"status": "a", "cards": [{"model": "lead", "id": 1}, {"model": "lead", "id": 1}]}]}"#,
    )
    .unwrap();
    let (_, stderr, success) = run_crmb(tmp.path(), &["columns", "board.json"]);
    assert!(!success);
    assert!(stderr.contains("more than once"), "stderr: {}", stderr);
}

#[test]
fn test_bad_config_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("board.json"), BOARD_JSON).unwrap();
    fs::write(tmp.path().join("crmboard.toml"), "[server\n").unwrap();
    let (_, stderr, success) = run_crmb(tmp.path(), &["columns", "board.json"]);
    assert!(!success);
    assert!(stderr.contains("crmboard.toml"), "stderr: {}", stderr);
}

// ---------------------------------------------------------------------------
// Server commands
// ---------------------------------------------------------------------------

#[test]
fn test_move_posts_status_update() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stub = start_stub();

    let out = run_crmb_ok(
        tmp.path(),
        &["--server", &stub.base_url, "move", "lead", "7", "Won"],
    );
    assert_eq!(out, "lead 7 -> Won\n");

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].target, "POST /api/update_status");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"model": "lead", "id": "7", "status": "Won"})
    );
}

#[test]
fn test_show_renders_visible_fields_in_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stub = start_stub();

    let out = run_crmb_ok(tmp.path(), &["--server", &stub.base_url, "show", "lead", "7"]);
    assert_eq!(
        out,
        "Acme Corp\nid: 7\nname: Acme Corp\nphone: 555-0100\nrevenue: 1500\n"
    );
    assert_eq!(stub.requests()[0].target, "GET /api/record/lead/7");
}

#[test]
fn test_show_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stub = start_stub();

    let out = run_crmb_ok(
        tmp.path(),
        &["show", "lead", "7", "--json", "--server", &stub.base_url],
    );
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["title"], "Acme Corp");
    assert_eq!(json["fields"]["phone"], "555-0100");
    assert!(json["fields"].get("email").is_none());
    assert!(json["fields"].get("_sa_instance_state").is_none());
}

#[test]
fn test_show_missing_record_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stub = start_stub();

    let (_, stderr, success) = run_crmb(
        tmp.path(),
        &["--server", &stub.base_url, "show", "lead", "404"],
    );
    assert!(!success);
    assert!(stderr.contains("404"), "stderr: {}", stderr);
}

#[test]
fn test_users_prints_suggestions() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stub = start_stub();

    let out = run_crmb_ok(tmp.path(), &["--server", &stub.base_url, "users", "al"]);
    assert_eq!(out, "alice\nalan\n");
    assert_eq!(stub.requests()[0].target, "GET /api/users?q=al");
}

#[test]
fn test_config_file_sets_server() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stub = start_stub();
    fs::write(
        tmp.path().join("crmboard.toml"),
        format!("[server]\nbase_url = \"{}\"\n", stub.base_url),
    )
    .unwrap();

    let out = run_crmb_ok(tmp.path(), &["users", "zz"]);
    assert_eq!(out, "");
    assert_eq!(stub.requests()[0].target, "GET /api/users?q=zz");
}

#[test]
fn test_unreachable_server_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    // Bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();

    let (_, stderr, success) = run_crmb(
        tmp.path(),
        &["--server", &format!("http://{}", addr), "move", "lead", "7", "Won"],
    );
    assert!(!success);
    assert!(stderr.contains("error:"), "stderr: {}", stderr);
}
