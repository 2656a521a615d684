//! # pkgstat-fetch
//!
//! Retrieves the directory index page and `Contents-<arch>.gz` files of a
//! repository component (for example `http://ftp.uk.debian.org/debian/dists/stable/main`).
//!
//! Every request uses a single whole-request timeout and is not retried. Non
//! successful HTTP statuses are reported as errors.

use std::time::Duration;

use bon::bon;
use reqwest::{Client, ClientBuilder, Response};
use tracing::debug;

pub const DEFAULT_MIRROR: &str = "http://ftp.uk.debian.org/debian/dists/stable/main";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to create HTTP client")]
    BuildClient(#[source] reqwest::Error),
    #[error("Failed to fetch {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid architecture name: {0:?}")]
    InvalidArch(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Request { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base_url: String,
}

#[bon]
impl Fetcher {
    #[builder]
    pub fn new(
        #[builder(into, default = DEFAULT_MIRROR.to_string())] base_url: String,
        #[builder(default = DEFAULT_TIMEOUT)] timeout: Duration,
    ) -> FetchResult<Self> {
        let client = ClientBuilder::new()
            .user_agent(concat!("pkgstat/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(FetchError::BuildClient)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the Contents index for `arch`
    pub fn contents_url(&self, arch: &str) -> FetchResult<String> {
        if arch.is_empty() || arch.chars().any(|c| c.is_control()) {
            return Err(FetchError::InvalidArch(arch.to_string()));
        }

        Ok(format!(
            "{}/Contents-{arch}.gz",
            self.base_url.trim_end_matches('/')
        ))
    }

    /// Fetch the directory index page of the mirror component
    pub async fn fetch_listing(&self) -> FetchResult<String> {
        let url = &self.base_url;
        let resp = self.get(url).await?;

        resp.text().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })
    }

    /// Fetch the raw (still compressed) Contents index for `arch`
    pub async fn fetch_contents(&self, arch: &str) -> FetchResult<Vec<u8>> {
        let url = self.contents_url(arch)?;
        let resp = self.get(&url).await?;

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Request { url, source: e })?;

        debug!("Got {} bytes", bytes.len());

        Ok(bytes.to_vec())
    }

    async fn get(&self, url: &str) -> FetchResult<Response> {
        debug!("GET {url}");

        self.client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })
    }
}

#[cfg(test)]
mod test {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        sync::oneshot,
    };

    use super::*;

    /// Answer one request with `status` and `body`, reporting the request line back
    async fn serve_once(
        status: &'static str,
        body: &'static [u8],
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut req = vec![];
            let mut buf = [0u8; 1024];
            while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                req.extend_from_slice(&buf[..n]);
            }

            let req = String::from_utf8_lossy(&req);
            let line = req.lines().next().unwrap_or_default().to_string();
            tx.send(line).ok();

            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).await.unwrap();
            stream.write_all(body).await.unwrap();
            stream.shutdown().await.ok();
        });

        (format!("http://{addr}/debian/dists/stable/main"), rx)
    }

    #[test]
    fn test_contents_url() {
        let fetcher = Fetcher::builder()
            .base_url("http://localhost/debian/dists/stable/main/")
            .build()
            .unwrap();

        assert_eq!(
            fetcher.contents_url("amd64").unwrap(),
            "http://localhost/debian/dists/stable/main/Contents-amd64.gz"
        );
        assert!(matches!(
            fetcher.contents_url(""),
            Err(FetchError::InvalidArch(_))
        ));
        assert!(matches!(
            fetcher.contents_url("amd\n64"),
            Err(FetchError::InvalidArch(_))
        ));
    }

    #[test]
    fn test_default_mirror() {
        let fetcher = Fetcher::builder().build().unwrap();
        assert_eq!(fetcher.base_url(), DEFAULT_MIRROR);
    }

    #[tokio::test]
    async fn test_fetch_contents() {
        let (url, rx) = serve_once("200 OK", b"\x1f\x8b\x08\x00").await;
        let fetcher = Fetcher::builder().base_url(url).build().unwrap();

        let bytes = fetcher.fetch_contents("arm64").await.unwrap();
        assert_eq!(bytes, b"\x1f\x8b\x08\x00");
        assert_eq!(
            rx.await.unwrap(),
            "GET /debian/dists/stable/main/Contents-arm64.gz HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_fetch_listing() {
        let (url, rx) = serve_once("200 OK", b"<a href=\"Contents-amd64.gz\">").await;
        let fetcher = Fetcher::builder().base_url(url).build().unwrap();

        assert_eq!(
            fetcher.fetch_listing().await.unwrap(),
            "<a href=\"Contents-amd64.gz\">"
        );
        assert_eq!(rx.await.unwrap(), "GET /debian/dists/stable/main HTTP/1.1");
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let (url, _rx) = serve_once("404 Not Found", b"").await;
        let fetcher = Fetcher::builder().base_url(url).build().unwrap();

        let err = fetcher.fetch_contents("hurd-amd64").await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let fetcher = Fetcher::builder()
            .base_url(format!("http://{addr}"))
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        assert!(fetcher.fetch_listing().await.unwrap_err().is_timeout());
    }
}
