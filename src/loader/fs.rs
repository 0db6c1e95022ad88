use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::{ChallengeLoader, LoadedAsset, LoadedChallenge};
use crate::cards::{AssetRef, ChallengeDescriptor};
use crate::core::AssetLoadError;

/// Loads images from a local asset tree.
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    /// `AssetRef::Path` values are resolved relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl ChallengeLoader for FsLoader {
    async fn resolve(&self, descriptor: ChallengeDescriptor) -> Result<LoadedChallenge, AssetLoadError> {
        let relative = match &descriptor.asset {
            AssetRef::Path(path) => path,
            AssetRef::Url(url) => {
                return Err(AssetLoadError::Unsupported { asset: url.clone() });
            }
        };
        let path = self.root.join(relative);

        let data = tokio::fs::read(&path)
            .await
            .map_err(|source| AssetLoadError::Io {
                path: path.clone(),
                source,
            })?;
        debug!("read {} ({} bytes) for {}", path.display(), data.len(), descriptor.id);

        let asset = LoadedAsset::decode(&descriptor.asset.to_string(), Bytes::from(data))?;
        Ok(LoadedChallenge::new(descriptor, asset))
    }
}
