// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Output sinks for streamed rendering.
//!
//! [`Renderer::render_to_stream`](crate::Renderer::render_to_stream) writes
//! into any [`PageSink`]. Besides accepting bytes, a sink can be told that
//! rendering failed so it can turn itself into an error response.
//!
//! [`PageResponse`] is a platform-agnostic buffered response. Adapters convert
//! it into their server's response type once rendering is done.

use std::io::{self, Write};

/// Content type of a successfully rendered page.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content type of an error body.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// A writable destination for rendered pages.
pub trait PageSink: Write {
    /// Signals that rendering failed with the given status.
    ///
    /// This is best-effort: a sink that has already flushed output to its
    /// client may be unable to change the status.
    fn report_error(&mut self, status: u16, message: &str);
}

/// A buffered HTTP-style response.
///
/// # Example
///
/// ```rust
/// use pageset::{PageResponse, PageSink};
/// use std::io::Write;
///
/// let mut response = PageResponse::new();
/// write!(response, "<h1>partial output").unwrap();
/// response.report_error(500, "boom");
///
/// assert_eq!(response.status(), 500);
/// assert_eq!(response.body_string(), "boom\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Default for PageResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl PageResponse {
    /// Creates an empty `200 OK` HTML response.
    pub fn new() -> Self {
        Self {
            status: 200,
            content_type: HTML_CONTENT_TYPE,
            body: Vec::new(),
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Value for the `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Returns true if no error was reported.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Consumes the response, returning status, content type and body.
    pub fn into_parts(self) -> (u16, &'static str, Vec<u8>) {
        (self.status, self.content_type, self.body)
    }
}

impl Write for PageResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl PageSink for PageResponse {
    fn report_error(&mut self, status: u16, message: &str) {
        // Nothing has been sent yet, so the partial page can be discarded.
        self.status = status;
        self.content_type = TEXT_CONTENT_TYPE;
        self.body.clear();
        self.body.extend_from_slice(message.as_bytes());
        self.body.push(b'\n');
    }
}
