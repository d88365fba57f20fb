//! Render surfaces: the single, reusable place where pages get loaded.
//!
//! Lifecycle per page: `load(page)` clears what was there and loads the new
//! page, then [`settle`] polls `snapshot()` until rows show up or the wait
//! runs out. `release()` is called once when the walk is over.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::rows::count_rows;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("nothing loaded on the surface")]
    NotLoaded,

    #[error("page {0} did not load in time")]
    Timeout(u32),

    #[error("invalid url: {0}")]
    Url(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait RenderSurface: Send {
    /// Drop the current page and load `page` (1-based).
    async fn load(&mut self, page: u32) -> Result<(), SurfaceError>;

    /// Markup of the loaded page as it looks right now.
    async fn snapshot(&mut self) -> Result<String, SurfaceError>;

    /// Free whatever the surface holds.
    async fn release(&mut self) {}
}

/// Poll `surface` until it shows rows or `wait` elapses.
///
/// Always returns the last snapshot; deciding whether it is usable is left to
/// the page aggregator.
pub async fn settle<S>(surface: &mut S, wait: Duration, poll: Duration) -> Result<String, SurfaceError>
where
    S: RenderSurface + ?Sized,
{
    let deadline = Instant::now() + wait;
    loop {
        let markup = surface.snapshot().await?;
        let now = Instant::now();
        if count_rows(&markup) > 0 || now >= deadline {
            return Ok(markup);
        }
        sleep(poll.min(deadline - now)).await;
    }
}

/// Fetches pages over HTTP by setting `page=N` on a base URL.
pub struct HttpSurface {
    client: reqwest::Client,
    base: Url,
    cookie: Option<String>,
    body: Option<String>,
}

impl HttpSurface {
    pub fn new(base_url: &str, cookie: Option<String>, timeout: Duration) -> Result<Self, SurfaceError> {
        let base = Url::parse(base_url).map_err(|e| SurfaceError::Url(format!("{base_url}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base,
            cookie,
            body: None,
        })
    }

    /// `base` with its `page` parameter replaced.
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.base.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "page")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("page", &page.to_string());
        url
    }
}

#[async_trait]
impl RenderSurface for HttpSurface {
    async fn load(&mut self, page: u32) -> Result<(), SurfaceError> {
        self.body = None;
        let url = self.page_url(page);
        debug!(%url, "fetching page");

        let mut req = self.client.get(url).header(reqwest::header::ACCEPT, "text/html");
        if let Some(cookie) = &self.cookie {
            req = req.header(reqwest::header::COOKIE, cookie);
        }
        let resp = req.send().await?.error_for_status()?;
        self.body = Some(resp.text().await?);
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<String, SurfaceError> {
        self.body.clone().ok_or(SurfaceError::NotLoaded)
    }

    async fn release(&mut self) {
        self.body = None;
    }
}

/// Reads saved pages `page-1.html`, `page-2.html`, ... from a directory.
pub struct DirSurface {
    dir: PathBuf,
    body: Option<String>,
}

impl DirSurface {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            body: None,
        }
    }

    pub fn page_path(&self, page: u32) -> PathBuf {
        self.dir.join(format!("page-{page}.html"))
    }
}

#[async_trait]
impl RenderSurface for DirSurface {
    async fn load(&mut self, page: u32) -> Result<(), SurfaceError> {
        self.body = None;
        let path = self.page_path(page);
        debug!(path = %path.display(), "reading page");
        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SurfaceError::Io { path, source })?;
        self.body = Some(body);
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<String, SurfaceError> {
        self.body.clone().ok_or(SurfaceError::NotLoaded)
    }

    async fn release(&mut self) {
        self.body = None;
    }
}
