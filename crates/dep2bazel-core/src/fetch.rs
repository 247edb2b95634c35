//! Blocking HTTP GET via libcurl (the `curl` crate).
//!
//! Every transfer follows redirects and is bounded by the connect timeout,
//! the overall timeout and the low-speed abort from [`HttpConfig`], so a
//! stalled server can delay a run but never hang it.

use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::time::Duration;
use thiserror::Error;

use crate::config::{Dep2BazelConfig, HttpConfig};
use crate::retry::{classify_curl_error, classify_http_status, ErrorKind, RetryPolicy};

const USER_AGENT: &str = concat!("dep2bazel/", env!("CARGO_PKG_VERSION"));

/// Upper bound for text responses (go-get discovery pages).
const MAX_TEXT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
    #[error("write download: {0}")]
    Io(#[from] io::Error),
    #[error("response from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Curl(e) => classify_curl_error(e),
            FetchError::Http { code, .. } => classify_http_status(*code),
            FetchError::Io(_) | FetchError::TooLarge { .. } => ErrorKind::Permanent,
        }
    }
}

/// Source of archive bytes. The resolver only sees this trait, so tests can
/// serve archives from memory.
pub trait ArchiveDownloader {
    /// Write the body of `url` into `dest` (which starts empty) and return the byte count.
    fn download(&self, url: &str, dest: &mut File) -> Result<u64, FetchError>;
}

/// Production downloader backed by curl's easy interface.
#[derive(Debug, Clone)]
pub struct CurlDownloader {
    http: HttpConfig,
    retry: RetryPolicy,
}

impl CurlDownloader {
    pub fn new(http: HttpConfig, retry: RetryPolicy) -> Self {
        Self { http, retry }
    }

    pub fn from_config(cfg: &Dep2BazelConfig) -> Self {
        Self::new(cfg.http.clone(), cfg.retry_policy())
    }

    /// GET `url` and return the body as (lossy) UTF-8.
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let body = self.retry.run(
            |_| {
                let mut body = Vec::new();
                self.get_once(url, |data| {
                    if body.len() + data.len() > MAX_TEXT_BYTES {
                        return Err(io::Error::new(io::ErrorKind::Other, "response too large"));
                    }
                    body.extend_from_slice(data);
                    Ok(())
                })
                .map_err(|e| match e {
                    FetchError::Io(_) => FetchError::TooLarge {
                        url: url.to_string(),
                        limit: MAX_TEXT_BYTES,
                    },
                    other => other,
                })?;
                Ok(body)
            },
            FetchError::kind,
        )?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// One GET attempt, feeding body chunks to `sink`.
    fn get_once<S>(&self, url: &str, mut sink: S) -> Result<u64, FetchError>
    where
        S: FnMut(&[u8]) -> io::Result<()>,
    {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.useragent(USER_AGENT)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(Duration::from_secs(self.http.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.http.timeout_secs))?;
        easy.low_speed_limit(self.http.low_speed_limit_bytes)?;
        easy.low_speed_time(Duration::from_secs(self.http.low_speed_time_secs))?;

        let mut written = 0u64;
        let mut sink_err: Option<io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    sink_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };
        if let Some(e) = sink_err {
            return Err(FetchError::Io(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http {
                url: url.to_string(),
                code,
            });
        }
        Ok(written)
    }
}

impl ArchiveDownloader for CurlDownloader {
    fn download(&self, url: &str, dest: &mut File) -> Result<u64, FetchError> {
        tracing::info!("downloading {}", url);
        self.retry.run(
            |attempt| {
                if attempt > 1 {
                    dest.set_len(0)?;
                    dest.seek(SeekFrom::Start(0))?;
                }
                let mut out = &*dest;
                self.get_once(url, |data| out.write_all(data))
            },
            FetchError::kind,
        )
    }
}
