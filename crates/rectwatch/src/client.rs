//! Blocking HTTP client behind `rectwatch submit` and `rectwatch list`.

use std::time::Duration;

use rectwatch_core::Rectangle;
use rectwatch_core::wire::Response;
use reqwest::blocking;
use reqwest::header::CONTENT_TYPE;

/// Why a request to the server produced no rectangles.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("could not build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),

    #[error("could not reach rectwatch at {addr}: {source}")]
    Unreachable {
        addr: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server replied {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected reply from {addr}: {source}")]
    BadReply {
        addr: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Talks to one rectwatch server.
#[derive(Debug)]
pub struct Client {
    http: blocking::Client,
    addr: String,
    url: String,
}

impl Client {
    /// `addr` is a `host:port` pair or a full `http://` URL.
    pub fn new(addr: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Setup)?;
        let url = if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.to_string()
        } else {
            format!("http://{addr}/")
        };
        Ok(Self {
            http,
            addr: addr.to_string(),
            url,
        })
    }

    /// Posts a query document and returns the matches the server stored.
    pub fn submit(&self, query: Vec<u8>) -> Result<Vec<Rectangle>, ClientError> {
        let reply = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(query)
            .send()
            .map_err(|source| self.unreachable(source))?;
        self.rectangles(reply)
    }

    /// Returns every stored match, oldest first.
    pub fn list(&self) -> Result<Vec<Rectangle>, ClientError> {
        let reply = self
            .http
            .get(&self.url)
            .send()
            .map_err(|source| self.unreachable(source))?;
        self.rectangles(reply)
    }

    fn rectangles(&self, reply: blocking::Response) -> Result<Vec<Rectangle>, ClientError> {
        let status = reply.status();
        if !status.is_success() {
            let body = reply.text().unwrap_or_default();
            let message = serde_json::from_str::<Response>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or(body);
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        reply.json().map_err(|source| ClientError::BadReply {
            addr: self.addr.clone(),
            source,
        })
    }

    fn unreachable(&self, source: reqwest::Error) -> ClientError {
        ClientError::Unreachable {
            addr: self.addr.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use rectwatch_core::config::ServerConfig;
    use rectwatch_core::{FixedClock, MemoryStore};
    use rectwatch_server::{QueryService, Server};

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn start_server() -> String {
        let service = QueryService::new(MemoryStore::new(), FixedClock(Default::default()));
        let settings = ServerConfig {
            bind: "127.0.0.1:0".into(),
            workers: 2,
            ..Default::default()
        };
        let server = Server::bind(&settings, service).unwrap();
        let addr = server.local_addr().unwrap().to_string();
        thread::spawn(move || server.run());
        addr
    }

    /// Answers a single request with a fixed raw HTTP reply.
    fn serve_once(reply: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            stream.write_all(reply.as_bytes()).unwrap();
        });
        addr
    }

    #[test]
    fn submit_then_list_returns_stored_matches() {
        // Arrange
        let client = Client::new(&start_server(), TIMEOUT).unwrap();
        let query = br#"{"Main":{"X":0,"Y":0,"Width":4,"Height":4},"Input":[{"X":1,"Y":1,"Width":1,"Height":1}]}"#;

        // Act
        let stored = client.submit(query.to_vec()).unwrap();
        let listed = client.list().unwrap();

        // Assert
        assert_eq!(stored.len(), 1);
        assert_eq!(listed, stored);
    }

    #[test]
    fn rejection_carries_the_server_message() {
        // Arrange
        let client = Client::new(&start_server(), TIMEOUT).unwrap();

        // Act
        let err = client.submit(b"{\"Main\":".to_vec()).unwrap_err();

        // Assert
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("malformed input"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn success_status_with_non_array_body_is_an_error() {
        // Arrange
        let addr = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 10\r\nConnection: close\r\n\r\n{\"oops\":1}",
        );
        let client = Client::new(&addr, TIMEOUT).unwrap();

        // Act
        let err = client.list().unwrap_err();

        // Assert
        assert!(matches!(err, ClientError::BadReply { .. }));
    }

    #[test]
    fn closed_port_is_unreachable() {
        let port = TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .unwrap()
            .port();
        let client = Client::new(&format!("127.0.0.1:{port}"), TIMEOUT).unwrap();

        let err = client.list().unwrap_err();

        assert!(err.to_string().starts_with("could not reach rectwatch"));
    }
}
