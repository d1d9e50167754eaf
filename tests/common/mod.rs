//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cep_race::source::{SourceId, SourceKind};
use cep_race::{Endpoint, FetchError, FetchOutcome, Fetcher};

/// Start a programmable HTTP backend on an ephemeral port.
///
/// The handler receives the request path and returns `(status, body)`.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let path = match read_request_path(&mut socket).await {
                            Some(path) => path,
                            None => return,
                        };
                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that waits `delay` and then answers 200 with `body`.
#[allow(dead_code)]
pub async fn start_json_backend(delay: Duration, body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_| async move {
        tokio::time::sleep(delay).await;
        (200, body.to_string())
    })
    .await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 512];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
}

#[allow(dead_code)]
pub const BRASIL_API_BODY: &str = r#"{"cep":"79021210","state":"MS","city":"Campo Grande","neighborhood":"Jardim dos Estados","street":"Rua Antônio Maria Coelho","service":"open-cep"}"#;

#[allow(dead_code)]
pub const VIA_CEP_BODY: &str = r#"{"cep":"79021-210","logradouro":"Rua Antônio Maria Coelho","complemento":"","bairro":"Jardim dos Estados","localidade":"Campo Grande","uf":"MS","ibge":"5002704","ddd":"67"}"#;

/// What a scripted source does.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Succeed(Duration, &'static str),
    Fail(Duration),
}

/// Fetcher that follows a per-source script instead of doing I/O.
///
/// Records the name of every source whose script ran to completion.
#[allow(dead_code)]
pub struct ScriptedFetcher {
    script: HashMap<String, Step>,
    completed: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedFetcher {
    pub fn new(steps: &[(&str, Step)]) -> Self {
        Self {
            script: steps.iter().map(|(name, step)| (name.to_string(), *step)).collect(),
            completed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn endpoints(&self, names: &[&str]) -> Vec<Endpoint> {
        names
            .iter()
            .map(|name| Endpoint {
                source: SourceId::new(name),
                kind: SourceKind::BrasilApi,
                url: url::Url::parse(&format!("http://{}.invalid/", name)).unwrap(),
                timeout: Duration::from_secs(5),
            })
            .collect()
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    type Payload = String;

    async fn fetch(&self, endpoint: &Endpoint) -> FetchOutcome<String> {
        let step = self
            .script
            .get(endpoint.source.as_str())
            .copied()
            .unwrap_or(Step::Fail(Duration::ZERO));

        let outcome = match step {
            Step::Succeed(delay, payload) => {
                tokio::time::sleep(delay).await;
                Ok(payload.to_string())
            }
            Step::Fail(delay) => {
                tokio::time::sleep(delay).await;
                Err(FetchError::Status(503))
            }
        };
        self.completed
            .lock()
            .unwrap()
            .push(endpoint.source.as_str().to_string());
        outcome
    }
}
