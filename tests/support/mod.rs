//! Shared helpers for the browser-backed tests.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use roadtest::driver::Backend;

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Practice Login</title></head>
<body>
<h2>Login</h2>
<form action="/" method="get">
  <input id="email" name="email" type="text">
  <input id="password" name="password" type="password">
  <input type="submit" value="Login">
</form>
<p></p>
<a href="/register">Register</a>
</body>
</html>
"#;

const REGISTER_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Practice Register</title></head>
<body>
<h2>Register</h2>
<form action="/" method="get">
  <input id="firstName" name="firstName" type="text">
  <input id="lastName" name="lastName" type="text">
  <input id="email" name="email" type="text">
  <input id="password" name="password" type="password">
  <input id="phoneNumber" name="phoneNumber" type="text">
  <input id="address" name="address" type="text">
  <input name="gender" type="radio" value="female">
  <input name="gender" type="radio" value="male">
  <input type="submit" value="Register">
</form>
</body>
</html>
"#;

/// Tiny blocking HTTP server hosting the login and register pages the
/// scenarios drive. Binds an ephemeral port; shuts down on drop.
pub struct FixtureServer {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl FixtureServer {
    pub fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let thread = std::thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let _ = serve_request(stream);
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });
        Ok(Self {
            addr,
            shutdown,
            thread: Some(thread),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn serve_request(mut stream: TcpStream) -> std::io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(Duration::from_secs(2)))?;

    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    // Drain headers; the response never depends on them.
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }

    let target = request_line.split_whitespace().nth(1).unwrap_or("/");
    let path = target.split(['?', '#']).next().unwrap_or("/");
    let body = match path {
        "/register" => REGISTER_PAGE,
        _ => LOGIN_PAGE,
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes())
}

/// Write a config file pointing at `base_url`, with the fixture log
/// kept inside `dir` so each test run starts from an empty log.
pub fn write_config(dir: &Path, base_url: &str, backend: Backend) -> PathBuf {
    let path = dir.join("roadtest.conf");
    let fixtures = dir.join("users.json");
    let content = format!(
        "browser={}\nbaseUrl={}\nfixturesFile={}\n",
        backend,
        base_url,
        fixtures.display()
    );
    std::fs::write(&path, content).unwrap();
    path
}
