//! Server-side HTTP/1.1 framing: one request and one response per connection.
//!
//! Only what the two endpoints need: a request line, headers, and a body
//! sized by `Content-Length`. Every response closes the connection.

use std::io::{self, BufRead, Read, Write};

use rectwatch_core::{Error, Result};

/// Upper bound on the request line plus headers.
const MAX_HEAD_BYTES: usize = 16 * 1024;

/// A parsed HTTP request.
#[derive(Debug)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

/// Reads one request. Bodies longer than `max_body` are refused.
pub fn read_request(reader: &mut impl BufRead, max_body: usize) -> Result<Request> {
    let mut head_bytes = 0;
    let request_line = read_head_line(reader, &mut head_bytes)?;
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(path), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::malformed(format!(
            "bad request line: {request_line:?}"
        )));
    };
    if !version.starts_with("HTTP/1.") {
        return Err(Error::malformed(format!("unsupported version {version}")));
    }

    let content_length = match read_content_length(reader, &mut head_bytes)? {
        Some(len) => len,
        None if method == "POST" => {
            return Err(Error::malformed("POST request without Content-Length"));
        }
        None => 0,
    };
    if content_length > max_body {
        return Err(Error::malformed(format!(
            "body of {content_length} bytes exceeds the {max_body} byte limit"
        )));
    }
    let mut body = vec![0; content_length];
    reader
        .read_exact(&mut body)
        .map_err(|e| Error::malformed(format!("truncated body: {e}")))?;

    Ok(Request {
        method: method.to_string(),
        path: path.to_string(),
        body,
    })
}

/// Writes a complete response and flushes it.
pub fn write_response(
    writer: &mut impl Write,
    status: u16,
    content_type: &str,
    body: &[u8],
) -> io::Result<()> {
    write!(
        writer,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n",
        reason = reason_phrase(status),
        len = body.len(),
    )?;
    writer.write_all(body)?;
    writer.flush()
}

/// Consumes the header block and returns the `Content-Length`, if sent.
fn read_content_length(
    reader: &mut impl BufRead,
    head_bytes: &mut usize,
) -> Result<Option<usize>> {
    let mut content_length = None;
    loop {
        let line = read_head_line(reader, head_bytes)?;
        if line.is_empty() {
            return Ok(content_length);
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(Error::malformed(format!("bad header: {line:?}")));
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            let len = value
                .trim()
                .parse()
                .map_err(|_| Error::malformed(format!("bad content length: {value:?}")))?;
            content_length = Some(len);
        }
    }
}

/// Reads one CRLF- or LF-terminated line of the message head.
fn read_head_line(reader: &mut impl BufRead, head_bytes: &mut usize) -> Result<String> {
    let mut line = String::new();
    let remaining = MAX_HEAD_BYTES.saturating_sub(*head_bytes) as u64;
    let read = reader
        .by_ref()
        .take(remaining)
        .read_line(&mut line)
        .map_err(|e| Error::malformed(format!("could not read request: {e}")))?;
    *head_bytes += read;
    if read == 0 || !line.ends_with('\n') {
        return Err(Error::malformed(if *head_bytes >= MAX_HEAD_BYTES {
            "request head too large"
        } else {
            "connection closed mid-request"
        }));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
