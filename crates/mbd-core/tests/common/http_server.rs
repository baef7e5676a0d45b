//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one static body on every GET. Options cover the cases the
//! downloader has to handle: a missing Content-Length (indeterminate
//! progress) and throttled chunked writes (so a cancel can land mid-body).

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    /// If false, the response omits Content-Length and closes the
    /// connection to delimit the body.
    pub content_length: bool,
    /// Write the body in chunks of this size with a short pause between
    /// them; `None` writes it in one go.
    pub throttle_chunk: Option<usize>,
    /// HTTP status line to respond with.
    pub status: &'static str,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            content_length: true,
            throttle_chunk: None,
            status: "200 OK",
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the base
/// URL. The server runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, ServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, &body, opts));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }

    let header = if opts.content_length {
        format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            opts.status,
            body.len()
        )
    } else {
        format!("HTTP/1.1 {}\r\nConnection: close\r\n\r\n", opts.status)
    };
    if stream.write_all(header.as_bytes()).is_err() {
        return;
    }

    match opts.throttle_chunk {
        None => {
            let _ = stream.write_all(body);
        }
        Some(chunk) => {
            for part in body.chunks(chunk.max(1)) {
                if stream.write_all(part).is_err() {
                    return;
                }
                let _ = stream.flush();
                thread::sleep(Duration::from_millis(20));
            }
        }
    }
    let _ = stream.flush();
}
