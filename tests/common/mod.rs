#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use http::header::CONTENT_TYPE;
use http::Method;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use wren::host::PassThrough;
use wren::{Bindings, Body, ConnInfo, Context, Request, Response};

pub fn request(method: Method, uri: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn request_with_body(
    method: Method,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, content_type)
        .body(body.into())
        .unwrap()
}

pub fn context() -> Context {
    Context::new(None, Bindings::new(), Arc::new(PassThrough))
}

pub fn conn_info() -> ConnInfo {
    let local: SocketAddr = "127.0.0.1:8000".parse().unwrap();
    let remote: SocketAddr = "10.0.0.7:51234".parse().unwrap();
    ConnInfo {
        local_addr: local,
        remote_addr: remote,
    }
}

pub async fn body_string(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// In-memory sink for `tracing` output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Capture log output on the current thread until the guard is dropped.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}
