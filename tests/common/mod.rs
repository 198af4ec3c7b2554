#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;

use assert_cmd::prelude::*;
use tempfile::TempDir;

pub fn caja_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("caja"));
    // The stub backend listens on loopback; never route it through a proxy.
    for var in ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A request seen by the stub backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub target: String,
    pub body: String,
}

pub struct Route {
    method: &'static str,
    path: String,
    status: u16,
    body: String,
}

impl Route {
    pub fn get(path: &str, body: &str) -> Self {
        Self::new("GET", path, 200, body)
    }

    pub fn post(path: &str, body: &str) -> Self {
        Self::new("POST", path, 200, body)
    }

    pub fn new(method: &'static str, path: &str, status: u16, body: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

/// Minimal HTTP/1.1 backend serving canned JSON on 127.0.0.1.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle(stream, &routes, &log);
            }
        });

        Self {
            base_url: format!("http://{addr}/api"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }
}

fn handle(stream: TcpStream, routes: &[Route], log: &Mutex<Vec<Recorded>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
        if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
            chunked = true;
        }
    }

    let body = if chunked {
        read_chunked(&mut reader)
    } else {
        let mut buf = vec![0u8; content_length];
        reader.read_exact(&mut buf).unwrap_or_default();
        String::from_utf8_lossy(&buf).to_string()
    };

    let path = target.split('?').next().unwrap_or_default().to_string();
    log.lock().unwrap().push(Recorded {
        method: method.clone(),
        target: target.clone(),
        body,
    });

    let (status, body) = routes
        .iter()
        .find(|r| r.method == method && r.path == path)
        .map(|r| (r.status, r.body.clone()))
        .unwrap_or((404, r#"{"message":"not found"}"#.to_string()));

    let mut stream = stream;
    let response = format!(
        "HTTP/1.1 {status} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn read_chunked(reader: &mut BufReader<TcpStream>) -> String {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        if reader.read_line(&mut size_line).unwrap_or(0) == 0 {
            break;
        }
        let size = usize::from_str_radix(size_line.trim(), 16).unwrap_or(0);
        let mut chunk = vec![0u8; size + 2];
        if reader.read_exact(&mut chunk).is_err() {
            break;
        }
        if size == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..size]);
    }
    String::from_utf8_lossy(&body).to_string()
}

/// Initialized config dir with a logged-in user.
pub struct Workspace {
    _temp: TempDir,
    pub config_path: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("caja-config");

        caja_cmd()
            .args(["-C", config_path.to_str().unwrap(), "init"])
            .assert()
            .success();

        Self {
            _temp: temp,
            config_path,
        }
    }

    pub fn logged_in(user: &str, name: &str, role: &str) -> Self {
        let ws = Self::new();
        ws.cmd()
            .args(["login", "--user", user, "--name", name, "--role", role])
            .assert()
            .success();
        ws
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = caja_cmd();
        cmd.args(["-C", self.config_path.to_str().unwrap()]);
        cmd
    }

    /// Command pointed at a stub backend.
    pub fn api_cmd(&self, server: &StubServer) -> Command {
        let mut cmd = self.cmd();
        cmd.args(["--api-url", &server.base_url]);
        cmd
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

pub const SCENARIO_SESSION: &str = r#"{
    "id": 12,
    "estado": "OPEN",
    "usuario": { "id": 7, "nombre": "Rosa" },
    "fecha_apertura": "2026-10-16T13:00:00Z",
    "monto_inicial": 200,
    "desglose": {"EFECTIVO":120.5,"TARJETA":300,"YAPE":40,"PLIN":10,"TRANSFERENCIA":0},
    "resumen": {"cantidad_ventas": 0, "ticket_promedio": 0, "cantidad_devoluciones": 0, "monto_devoluciones": 0}
}"#;

pub const CLOSED_SESSION: &str = r#"{
    "id": 12,
    "estado": "CLOSED",
    "usuario": { "id": 7, "nombre": "Rosa" },
    "fecha_apertura": "2026-10-16T13:00:00Z",
    "fecha_cierre": "2026-10-16T23:00:00Z",
    "monto_inicial": 200,
    "desglose": {"EFECTIVO":120.5,"TARJETA":300,"YAPE":40,"PLIN":10,"TRANSFERENCIA":0},
    "resumen": {"cantidad_ventas": 9, "ticket_promedio": 52.28}
}"#;

pub const CLOSURE_RECORD: &str = r#"{
    "caja_id": 12,
    "usuario": { "id": 7, "nombre": "Rosa" },
    "tipo_cierre": "NORMAL",
    "monto_esperado": 320.5,
    "monto_contado": 318,
    "diferencia": -2.5
}"#;
