#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use vela_build_summary::config::{BuildConfig, ClientConfig, PluginConfig, RepoConfig};
use vela_build_summary::logging::LogLevel;

/// A request the fake server received.
#[derive(Debug, Clone)]
pub struct Captured {
    pub target: String,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
}

/// Minimal HTTP server answering `GET <path?query>` with canned responses.
/// Unknown targets get a 404 with a Vela-style error body.
pub struct FakeVela {
    pub url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl FakeVela {
    pub fn start(routes: HashMap<String, (u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind fake server");
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let mut stream = stream.expect("stream error");
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
                    continue;
                }
                let target = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();

                let mut headers = HashMap::new();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                    }
                }

                seen.lock().unwrap().push(Captured {
                    target: target.clone(),
                    authorization: headers.get("authorization").cloned(),
                    user_agent: headers.get("user-agent").cloned(),
                });

                let (status, body) = routes
                    .get(&target)
                    .cloned()
                    .unwrap_or_else(|| (404, r#"{"error":"not found"}"#.to_string()));
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        FakeVela { url, requests }
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

pub const BUILD_PATH: &str = "/api/v1/repos/octocat/hello-world/builds/1";

pub fn page(resource: &str, page: usize) -> String {
    format!("{BUILD_PATH}/{resource}?page={page}&per_page=100")
}

pub fn config(server: &str) -> PluginConfig {
    PluginConfig {
        log_level: LogLevel::Info,
        max_col_width: 50,
        build: BuildConfig { number: 1 },
        client: ClientConfig {
            app_name: "vela-build-summary".to_string(),
            app_version: "0.1.0".to_string(),
            server: server.to_string(),
            token: "superSecretToken".to_string(),
        },
        repo: RepoConfig {
            org: "octocat".to_string(),
            name: "hello-world".to_string(),
        },
    }
}
