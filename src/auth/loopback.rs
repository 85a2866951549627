//! A one-shot HTTP listener on the loopback interface that waits for the authorization redirect.

use std::{
    io::{self, BufRead, BufReader, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    thread,
    time::{Duration, Instant},
};

use log::{debug, trace, warn};
use reqwest::Url;

use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const SUCCESS_PAGE: &str = "<!DOCTYPE html><html><body><h1>Authorization complete</h1>\
                            <p>You may close this window and return to the application.</p></body></html>";
const NOT_FOUND_PAGE: &str = "<!DOCTYPE html><html><body><h1>Not found</h1></body></html>";

/// Listens on the address of a loopback redirect URI until the redirect arrives at its path.
#[derive(Debug)]
pub(super) struct CallbackListener {
    listener: TcpListener,
    addr: SocketAddr,
    path: String,
    timeout: Duration,
}

impl CallbackListener {
    /// Binds to the host and port of `redirect_uri`. The URI must be a plain `http` URI on `127.0.0.1` or `localhost`
    /// with an explicit port.
    pub(super) fn bind(redirect_uri: &str, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::Configuration("timeout must be greater than zero".to_owned()));
        }

        let url = Url::parse(redirect_uri)
            .map_err(|e| Error::Configuration(format!("invalid redirect URI {redirect_uri}: {e}")))?;

        if url.scheme() != "http" {
            return Err(Error::Configuration(format!(
                "local authorization requires an http redirect URI, got {redirect_uri}"
            )));
        }

        let host = match url.host_str() {
            Some(host @ ("127.0.0.1" | "localhost")) => host,
            _ => {
                return Err(Error::Configuration(format!(
                    "local authorization requires a redirect URI on 127.0.0.1 or localhost, got {redirect_uri}"
                )))
            }
        };

        let port = url.port().ok_or_else(|| {
            Error::Configuration(format!(
                "local authorization requires a redirect URI with an explicit port, got {redirect_uri}"
            ))
        })?;

        let listener = TcpListener::bind((host, port))
            .and_then(|listener| listener.set_nonblocking(true).map(|_| listener))
            .map_err(|e| Error::Configuration(format!("couldn't listen on {host}:{port}: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| Error::Configuration(format!("couldn't listen on {host}:{port}: {e}")))?;

        Ok(Self {
            listener,
            addr,
            path: url.path().to_owned(),
            timeout,
        })
    }

    /// Blocks until a request for the callback path arrives and returns its target, the path with the query. Requests
    /// for other paths get a 404. Returns an [Authentication](Error::Authentication) error on timeout.
    pub(super) fn wait(self) -> Result<String> {
        debug!("Waiting for the authorization callback on http://{}{}", self.addr, self.path);
        let deadline = Instant::now() + self.timeout;

        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    trace!("Accepted connection from {peer}");

                    match self.handle(stream, deadline) {
                        Ok(Some(target)) => return Ok(target),
                        Ok(None) => {}
                        Err(e) => warn!("Failed to handle a request on the callback listener: {e}"),
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        warn!("No authorization callback within {:?}", self.timeout);
                        return Err(Error::authentication("Timed out waiting for the authorization callback."));
                    }

                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(Error::authentication(format!(
                        "Failed to accept the authorization callback: {e}"
                    )))
                }
            }
        }
    }

    /// Waits on a separate thread so the executor isn't blocked.
    #[cfg(feature = "async")]
    pub(super) async fn wait_async(self) -> Result<String> {
        let (sender, receiver) = futures::channel::oneshot::channel();

        thread::spawn(move || {
            // the receiver is gone if the awaiting future was dropped
            let _ = sender.send(self.wait());
        });

        receiver
            .await
            .map_err(|_| Error::authentication("The authorization callback listener stopped unexpectedly."))?
    }

    fn handle(&self, stream: TcpStream, deadline: Instant) -> io::Result<Option<String>> {
        // accepted sockets inherit non-blocking mode on some platforms
        stream.set_nonblocking(false)?;
        let remaining = deadline.saturating_duration_since(Instant::now()).max(POLL_INTERVAL);
        stream.set_read_timeout(Some(remaining))?;

        let mut reader = BufReader::new(&stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line)?;

        let mut header = String::new();
        while reader.read_line(&mut header)? > 0 && !header.trim_end().is_empty() {
            header.clear();
        }

        let target = request_line.split_whitespace().nth(1).unwrap_or_default();
        let path = target.split('?').next().unwrap_or_default();

        if path != self.path {
            trace!("Ignoring request for {target}");
            respond(&stream, "404 Not Found", NOT_FOUND_PAGE)?;
            return Ok(None);
        }

        respond(&stream, "200 OK", SUCCESS_PAGE)?;
        Ok(Some(target.to_owned()))
    }
}

fn respond(mut stream: &TcpStream, status: &str, body: &str) -> io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n\
         {body}",
        body.len()
    )?;
    stream.flush()
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::{SocketAddr, TcpStream},
        thread,
        time::{Duration, Instant},
    };

    use super::CallbackListener;
    use crate::error::Error;

    fn get(addr: SocketAddr, target: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(stream, "GET {target} HTTP/1.1\r\nHost: {addr}\r\nAccept: text/html\r\n\r\n").unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn only_loopback_redirects_with_a_port() {
        for redirect_uri in [
            "https://127.0.0.1:8888/callback",
            "http://example.com:8888/callback",
            "http://127.0.0.1/callback",
            "not a url",
        ] {
            assert!(matches!(
                CallbackListener::bind(redirect_uri, Duration::from_secs(1)),
                Err(Error::Configuration(_))
            ));
        }

        assert!(matches!(
            CallbackListener::bind("http://127.0.0.1:0/callback", Duration::ZERO),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn returns_the_callback_target() {
        let listener = CallbackListener::bind("http://127.0.0.1:0/callback", Duration::from_secs(10)).unwrap();
        let addr = listener.addr;

        let browser = thread::spawn(move || (get(addr, "/favicon.ico"), get(addr, "/callback?code=abc&state=xyz")));

        assert_eq!(listener.wait().unwrap(), "/callback?code=abc&state=xyz");

        let (not_found, success) = browser.join().unwrap();
        assert!(not_found.starts_with("HTTP/1.1 404"));
        assert!(success.starts_with("HTTP/1.1 200"));
        assert!(success.contains("Authorization complete"));
    }

    #[test]
    fn times_out_without_a_callback() {
        let listener = CallbackListener::bind("http://127.0.0.1:0/callback", Duration::from_millis(200)).unwrap();
        let start = Instant::now();

        let err = listener.wait().unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert_eq!(err.message(), "Timed out waiting for the authorization callback.");
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
