//! Minimal HTTP/1.1 framing over a blocking `TcpStream`.
//!
//! One request per connection. Responses always close the connection.

use std::io::{self, BufRead, Read, Write};

use serde_json::Value;
use thiserror::Error;

/// Upper bound for a request body. Evaluate payloads are a few hundred bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum HttpReadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Malformed(&'static str),
    #[error("request body of {0} bytes exceeds {MAX_BODY_BYTES}")]
    BodyTooLarge(usize),
}

impl HttpReadError {
    /// The peer went quiet or hung up before a full request arrived.
    pub fn is_disconnect(&self) -> bool {
        match self {
            Self::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::WouldBlock
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: &str, target: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            path: strip_query(target).to_string(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn json(status: u16, value: Value) -> Self {
        let body = serde_json::to_vec(&value).unwrap_or_else(|_| b"{}".to_vec());
        Self {
            status,
            content_type: "application/json",
            headers: Vec::new(),
            body,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 307,
            content_type: "text/plain; charset=utf-8",
            headers: vec![("Location", location.to_string())],
            body: Vec::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

pub fn read_http_request<R: Read>(stream: R) -> Result<Option<HttpRequest>, HttpReadError> {
    let mut reader = io::BufReader::new(stream);
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let first = line.trim_end_matches(['\r', '\n']);
    if first.is_empty() {
        return Ok(None);
    }

    let mut parts = first.split_whitespace();
    let Some(method) = parts.next() else {
        return Err(HttpReadError::Malformed(
            "invalid http request line (missing method)",
        ));
    };
    let Some(target) = parts.next() else {
        return Err(HttpReadError::Malformed(
            "invalid http request line (missing path)",
        ));
    };

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| HttpReadError::Malformed("invalid content-length header"))?;
            }
        }
    }

    if content_length > MAX_BODY_BYTES {
        return Err(HttpReadError::BodyTooLarge(content_length));
    }

    let mut body = vec![0_u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body)?;
    }
    Ok(Some(HttpRequest::new(method, target, body)))
}

pub fn write_http_response<W: Write>(stream: &mut W, response: &HttpResponse) -> io::Result<()> {
    let reason = http_reason_phrase(response.status);
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
        response.status,
        reason,
        response.content_type,
        response.body.len()
    );
    for (name, value) in &response.headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("Connection: close\r\n\r\n");
    stream.write_all(head.as_bytes())?;
    stream.write_all(&response.body)?;
    stream.flush()
}

pub fn http_reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        307 => "Temporary Redirect",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

fn strip_query(target: &str) -> &str {
    target.split_once('?').map_or(target, |(path, _)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_request_line_and_body() {
        let raw = b"post /api/evaluate?dry=1 HTTP/1.1\r\nHost: x\r\nContent-Length: 2\r\n\r\n{}";
        let req = read_http_request(&raw[..])
            .expect("read")
            .expect("request");
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/api/evaluate");
        assert_eq!(req.body, b"{}");
    }

    #[test]
    fn empty_stream_yields_no_request() {
        assert!(read_http_request(&b""[..]).expect("read").is_none());
    }

    #[test]
    fn oversized_and_malformed_lengths_are_told_apart() {
        let big = format!(
            "POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_BYTES + 1
        );
        let err = read_http_request(big.as_bytes()).unwrap_err();
        assert!(matches!(err, HttpReadError::BodyTooLarge(n) if n == MAX_BODY_BYTES + 1));

        let bad = b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n";
        let err = read_http_request(&bad[..]).unwrap_err();
        assert!(matches!(err, HttpReadError::Malformed(_)));
    }

    #[test]
    fn truncated_body_counts_as_disconnect() {
        let short = b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\n{}";
        let err = read_http_request(&short[..]).unwrap_err();
        assert!(err.is_disconnect());
        assert!(!HttpReadError::BodyTooLarge(1).is_disconnect());
    }

    #[test]
    fn writes_status_headers_and_body() {
        let mut out = Vec::new();
        write_http_response(&mut out, &HttpResponse::json(422, json!({"detail": "x"})))
            .expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("HTTP/1.1 422 Unprocessable Entity\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("{\"detail\":\"x\"}"));

        let mut out = Vec::new();
        write_http_response(&mut out, &HttpResponse::redirect("/docs")).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("HTTP/1.1 307 Temporary Redirect\r\n"));
        assert!(text.contains("Location: /docs\r\n"));
    }
}
