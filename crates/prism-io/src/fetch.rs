// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turning asset locations into bytes.

use crate::AssetLoadError;
use prism_core::asset::AssetLocation;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reads asset bytes, and the external resources an asset references.
pub trait AssetFetcher: Send + Sync {
    /// Reads the asset at `location`.
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>, AssetLoadError>;

    /// Reads a resource referenced by `uri`, relative to the asset at `base`.
    fn fetch_relative(&self, base: &AssetLocation, uri: &str) -> Result<Vec<u8>, AssetLoadError>;
}

/// Reads assets from the local file system.
///
/// Relative paths are resolved against the asset root.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    /// Creates a fetcher rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The asset root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read(path: &Path) -> Result<Vec<u8>, AssetLoadError> {
        std::fs::read(path).map_err(|e| AssetLoadError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl AssetFetcher for FileFetcher {
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>, AssetLoadError> {
        match location {
            AssetLocation::Path(path) => {
                let path = self.resolve(path);
                log::debug!("Reading asset from {:?}", path);
                Self::read(&path)
            }
            AssetLocation::Url(url) => Err(AssetLoadError::Network {
                url: url.clone(),
                reason: "the file fetcher cannot read URLs".into(),
            }),
        }
    }

    fn fetch_relative(&self, base: &AssetLocation, uri: &str) -> Result<Vec<u8>, AssetLoadError> {
        let base = self.resolve(base.key());
        let dir = base.parent().unwrap_or(&self.root);
        Self::read(&dir.join(uri))
    }
}

/// Downloads assets over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, AssetLoadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssetLoadError::Network {
                url: String::new(),
                reason: format!("failed to build the HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, AssetLoadError> {
        let network = |reason: String| AssetLoadError::Network {
            url: url.to_owned(),
            reason,
        };
        log::debug!("Downloading asset from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| network(e.to_string()))?
            .error_for_status()
            .map_err(|e| network(e.to_string()))?;
        let bytes = response.bytes().map_err(|e| network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>, AssetLoadError> {
        match location {
            AssetLocation::Url(url) => self.get(url),
            AssetLocation::Path(path) => Err(AssetLoadError::Io {
                path: path.clone(),
                reason: "the HTTP fetcher cannot read local paths".into(),
            }),
        }
    }

    fn fetch_relative(&self, base: &AssetLocation, uri: &str) -> Result<Vec<u8>, AssetLoadError> {
        let joined = reqwest::Url::parse(base.key())
            .and_then(|base| base.join(uri))
            .map_err(|e| AssetLoadError::Network {
                url: format!("{}/{}", base.key(), uri),
                reason: e.to_string(),
            })?;
        self.get(joined.as_str())
    }
}

/// Routes paths to a [`FileFetcher`] and URLs to an [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    files: FileFetcher,
    http: HttpFetcher,
}

impl DefaultFetcher {
    /// Creates a fetcher reading local files under `asset_root` and
    /// downloading with the given timeout.
    pub fn new(asset_root: impl AsRef<Path>, http_timeout: Duration) -> Result<Self, AssetLoadError> {
        Ok(Self {
            files: FileFetcher::new(asset_root),
            http: HttpFetcher::new(http_timeout)?,
        })
    }

    fn route(&self, location: &AssetLocation) -> &dyn AssetFetcher {
        match location {
            AssetLocation::Path(_) => &self.files,
            AssetLocation::Url(_) => &self.http,
        }
    }
}

impl AssetFetcher for DefaultFetcher {
    fn fetch(&self, location: &AssetLocation) -> Result<Vec<u8>, AssetLoadError> {
        self.route(location).fetch(location)
    }

    fn fetch_relative(&self, base: &AssetLocation, uri: &str) -> Result<Vec<u8>, AssetLoadError> {
        self.route(base).fetch_relative(base, uri)
    }
}
