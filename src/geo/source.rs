//! Where region geometry comes from.
//!
//! A source is asked exactly once per mounted map, on a background thread. The
//! HTTP source mirrors a small, polite client: timeouts, capped redirects, a user
//! agent and a short retry with backoff on 5xx and network errors.
//!
//! ```no_run
//! # use gapviz::geo::{GeometrySource, HttpSource};
//! let regions = HttpSource::default().load()?;
//! println!("{} regions", regions.len());
//! # Ok::<(), gapviz::VizError>(())
//! ```

use super::Region;
use super::topology::parse_regions;
use crate::error::{Result, VizError};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Country boundaries at 1:110m, keyed by ISO numeric ids.
pub const WORLD_ATLAS_URL: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// A one-shot provider of region polygons.
pub trait GeometrySource: Send + Sync {
    /// Human readable origin, used in logs.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<Region>>;

    /// Like [`load`](Self::load), but gives up with [`VizError::Cancelled`]
    /// once `cancelled` is set. Sources with several steps check it in between.
    fn load_until(&self, cancelled: &AtomicBool) -> Result<Vec<Region>> {
        if cancelled.load(Ordering::Relaxed) {
            return Err(VizError::Cancelled);
        }
        self.load()
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    pub url: String,
    http: HttpClient,
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(WORLD_ATLAS_URL)
    }
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("gapviz/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("falling back to default http client: {e}");
                HttpClient::new()
            });
        Self {
            url: url.into(),
            http,
        }
    }

    fn get_bytes(&self, cancelled: &AtomicBool) -> Result<Vec<u8>> {
        let mut last_err: Option<VizError> = None;
        for backoff_ms in [100u64, 300, 700] {
            if cancelled.load(Ordering::Relaxed) {
                log::debug!("fetch of {} cancelled", self.url);
                return Err(VizError::Cancelled);
            }
            match self.http.get(&self.url).send() {
                Ok(r) if r.status().is_success() => {
                    return Ok(r.bytes()?.to_vec());
                }
                Ok(r) if r.status().is_server_error() => {
                    last_err = Some(VizError::Status(r.status().as_u16()));
                }
                Ok(r) => return Err(VizError::Status(r.status().as_u16())),
                Err(e) => last_err = Some(e.into()),
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(last_err.unwrap_or_else(|| VizError::Http("no response".into())))
    }
}

impl GeometrySource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<Vec<Region>> {
        self.load_until(&AtomicBool::new(false))
    }

    fn load_until(&self, cancelled: &AtomicBool) -> Result<Vec<Region>> {
        parse_regions(&self.get_bytes(cancelled)?)
    }
}

/// A TopoJSON/GeoJSON document on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GeometrySource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Region>> {
        parse_regions(&std::fs::read(&self.path)?)
    }
}

/// Regions already in memory; also handy for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub regions: Vec<Region>,
}

impl StaticSource {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }
}

impl GeometrySource for StaticSource {
    fn describe(&self) -> String {
        format!("{} in-memory regions", self.regions.len())
    }

    fn load(&self) -> Result<Vec<Region>> {
        Ok(self.regions.clone())
    }
}
