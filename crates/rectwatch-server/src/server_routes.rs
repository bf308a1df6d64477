use std::io::BufReader;
use std::net::TcpStream;

use rectwatch_core::wire::{METHOD_NOT_ALLOWED, Response};
use rectwatch_core::{Clock, Error, RectangleStore, Result, log_debug, log_error, log_warn};

use crate::http::{self, Request};
use crate::service::QueryService;

const JSON: &str = "application/json";

/// Serves exactly one request on `stream`.
pub(super) fn handle_connection<S, C>(
    stream: &TcpStream,
    service: &QueryService<S, C>,
    max_body: usize,
) where
    S: RectangleStore,
    C: Clock,
{
    let (status, body) = match http::read_request(&mut BufReader::new(stream), max_body) {
        Ok(request) => {
            log_debug!("{} {}", request.method, request.path);
            route(&request, service)
        }
        Err(e) => error_reply(&e),
    };

    let mut writer = stream;
    if let Err(e) = http::write_response(&mut writer, status, JSON, &body) {
        log_warn!("could not write response: {e}");
    }
}

/// Dispatches on the method; every path is served the same way.
pub(super) fn route<S, C>(request: &Request, service: &QueryService<S, C>) -> (u16, Vec<u8>)
where
    S: RectangleStore,
    C: Clock,
{
    let result = match request.method.as_str() {
        "GET" => service.list_results().and_then(to_json),
        "POST" => service
            .submit_body(&request.body)
            .and_then(|matches| to_json(matches.into_inner())),
        _ => return (405, encode(&Response::error(METHOD_NOT_ALLOWED))),
    };
    match result {
        Ok(body) => (200, body),
        Err(e) => error_reply(&e),
    }
}

fn to_json(rectangles: Vec<rectwatch_core::Rectangle>) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&rectangles)?)
}

fn error_reply(e: &Error) -> (u16, Vec<u8>) {
    let status = e.status_code();
    if status >= 500 {
        log_error!("request failed: {e}");
    } else {
        log_warn!("rejected request: {e}");
    }
    (status, encode(&Response::from(e)))
}

fn encode(response: &Response) -> Vec<u8> {
    serde_json::to_vec(response).unwrap_or_default()
}
