use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{ChallengeLoader, LoadedAsset, LoadedChallenge};
use crate::cards::{AssetRef, ChallengeDescriptor};
use crate::core::AssetLoadError;

/// Loads images over HTTP.
///
/// `AssetRef::Url` is fetched as-is; `AssetRef::Path` is appended to the
/// base URL, if one was given.
pub struct HttpLoader {
    client: Client,
    base_url: Option<String>,
}

impl HttpLoader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    /// Resolve relative asset paths against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into().trim_end_matches('/').to_string()),
        }
    }

    fn url_for(&self, asset: &AssetRef) -> Option<String> {
        match asset {
            AssetRef::Url(url) => Some(url.clone()),
            AssetRef::Path(path) => {
                let base = self.base_url.as_ref()?;
                let relative: Vec<_> = path
                    .components()
                    .filter_map(|c| c.as_os_str().to_str())
                    .collect();
                Some(format!("{}/{}", base, relative.join("/")))
            }
        }
    }
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChallengeLoader for HttpLoader {
    async fn resolve(&self, descriptor: ChallengeDescriptor) -> Result<LoadedChallenge, AssetLoadError> {
        let asset_name = descriptor.asset.to_string();
        let url = self
            .url_for(&descriptor.asset)
            .ok_or_else(|| AssetLoadError::Unsupported {
                asset: asset_name.clone(),
            })?;

        let http_err = |message: String| AssetLoadError::Http {
            asset: asset_name.clone(),
            message,
        };

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| http_err(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(http_err(format!("status {}", status)));
        }
        let data = resp.bytes().await.map_err(|e| http_err(e.to_string()))?;
        debug!("fetched {} ({} bytes) for {}", url, data.len(), descriptor.id);

        let asset = LoadedAsset::decode(&asset_name, data)?;
        Ok(LoadedChallenge::new(descriptor, asset))
    }
}
