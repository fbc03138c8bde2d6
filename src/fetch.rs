//! Page fetching for the lookup lenses.
//!
//! All lookups go through [`PageFetcher`], so the lenses never build their own
//! HTTP client. [`UreqFetcher`] holds one shared `ureq` agent (connection pool
//! and global timeout) for the whole run.

use std::fmt;
use std::time::Duration;

use tracing::debug;

/// Browser user agent sent with every request; both lookup sites block the
/// default library agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";

/// Why a single page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a non-success status code
    Status(u16),
    /// Request could not be built or sent
    Transport(String),
    /// Response body could not be read
    Body(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "status code {}", code),
            FetchError::Transport(e) => write!(f, "transport error: {}", e),
            FetchError::Body(e) => write!(f, "unreadable body: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

/// Something that can GET a page and return its body as text.
pub trait PageFetcher: Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a shared `ureq` agent
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl PageFetcher for UreqFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("fetching {}", url);
        let mut resp = match self.agent.get(url).header("User-Agent", USER_AGENT).call() {
            Ok(resp) => resp,
            Err(ureq::Error::StatusCode(code)) => return Err(FetchError::Status(code)),
            Err(e) => return Err(FetchError::Transport(e.to_string())),
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        resp.body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a local port, returning the url and
    /// a handle yielding the raw request the server received
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/cidr/1.2.3.0-24", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (url, handle)
    }

    #[test]
    fn test_ureq_fetcher_ok_sends_user_agent() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\nConnection: close\r\n\r\n<html></html>",
        );
        let fetcher = UreqFetcher::new(Duration::from_secs(5));

        assert_eq!(fetcher.fetch(&url).unwrap(), "<html></html>");

        let request = server.join().unwrap().to_lowercase();
        assert!(request.starts_with("get /cidr/1.2.3.0-24 "));
        assert!(request.contains(&format!("user-agent: {}", USER_AGENT.to_lowercase())));
    }

    #[test]
    fn test_ureq_fetcher_error_status() {
        let (url, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let fetcher = UreqFetcher::new(Duration::from_secs(5));

        assert_eq!(fetcher.fetch(&url), Err(FetchError::Status(500)));
        server.join().unwrap();
    }

    #[test]
    fn test_ureq_fetcher_connection_refused() {
        // grab a free port, then close it again
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let fetcher = UreqFetcher::new(Duration::from_secs(5));

        let res = fetcher.fetch(&format!("http://{}/", addr));
        assert!(matches!(res, Err(FetchError::Transport(_))), "{:?}", res);
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::Status(500).to_string(), "status code 500");
        assert_eq!(
            FetchError::Transport("dns failure".to_string()).to_string(),
            "transport error: dns failure"
        );
    }

    #[test]
    fn test_static_fetcher() {
        let fetcher = testing::StaticFetcher::new()
            .page("https://a.test/", "<html></html>")
            .status("https://b.test/", 503);

        assert_eq!(fetcher.fetch("https://a.test/").unwrap(), "<html></html>");
        assert_eq!(
            fetcher.fetch("https://b.test/"),
            Err(FetchError::Status(503))
        );
        assert!(matches!(
            fetcher.fetch("https://c.test/"),
            Err(FetchError::Transport(_))
        ));
        assert_eq!(fetcher.requested().len(), 3);
    }
}
