//! One-shot HTTP server for exercising the clients against a real socket.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// A request as it arrived on the wire.
pub(crate) struct Captured {
    /// Request line and headers, without the blank line.
    pub head: String,
    pub body: String,
}

impl Captured {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    /// Value of header `name`, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

/// Accept one connection, answer it with `status` and `body`, and hand back
/// what the client sent.
pub(crate) fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];

        let split = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before headers ended");
            raw.extend_from_slice(&chunk[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos;
            }
        };

        let head = String::from_utf8_lossy(&raw[..split]).into_owned();
        let mut captured = Captured {
            head,
            body: String::new(),
        };
        let length: usize = captured
            .header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        while raw.len() < split + 4 + length {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before body ended");
            raw.extend_from_slice(&chunk[..n]);
        }
        captured.body = String::from_utf8_lossy(&raw[split + 4..split + 4 + length]).into_owned();

        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(reply.as_bytes()).unwrap();
        captured
    });

    (base, handle)
}
