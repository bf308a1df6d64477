pub mod init;
pub mod list;
pub mod serve;
pub mod status;
pub mod submit;

use std::time::Duration;

use crate::client::{Client, ClientError};

/// How long client commands wait on the server.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds a client for the explicit address, or the configured one.
pub(crate) fn connect(addr: Option<String>) -> Client {
    let addr = addr.unwrap_or_else(|| rectwatch_core::config::load().server.bind);
    Client::new(&addr, CLIENT_TIMEOUT).unwrap_or_else(|e| fail(&e))
}

/// Prints the error and exits with status 1.
pub(crate) fn fail(e: &ClientError) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

/// Prints each rectangle as one JSON object per line.
pub(crate) fn print_rectangles(rectangles: &[rectwatch_core::Rectangle]) {
    for rect in rectangles {
        if let Ok(line) = serde_json::to_string(rect) {
            println!("{line}");
        }
    }
}
