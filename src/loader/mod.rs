//! Challenge loading: descriptor in, displayable challenge out.
//!
//! Loading is the only part of a play-through that touches storage or the
//! network. Failures are reported as `AssetLoadError` and recovered by the
//! session engine, which skips the descriptor and deals a replacement.

pub mod detect;
pub mod fs;
pub mod http;

pub use detect::{detect_image, ImageFormat};
pub use fs::FsLoader;
pub use http::HttpLoader;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use crate::cards::{ChallengeDescriptor, ChallengeId};
use crate::core::AssetLoadError;

/// Decoded image payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadedAsset {
    pub format: ImageFormat,
    #[serde(skip)]
    pub data: Bytes,
}

impl LoadedAsset {
    /// Validate `data` as a supported image.
    pub fn decode(asset: &str, data: Bytes) -> Result<Self, AssetLoadError> {
        let format = detect_image(&data).ok_or_else(|| AssetLoadError::Decode {
            asset: asset.to_string(),
        })?;
        Ok(Self { format, data })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A descriptor together with its resolved image.
///
/// Cloning is cheap: the image bytes are reference counted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadedChallenge {
    pub descriptor: ChallengeDescriptor,
    pub asset: LoadedAsset,
}

impl LoadedChallenge {
    #[must_use]
    pub fn new(descriptor: ChallengeDescriptor, asset: LoadedAsset) -> Self {
        Self { descriptor, asset }
    }

    #[must_use]
    pub fn id(&self) -> ChallengeId {
        self.descriptor.id
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.descriptor.is_positive
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.descriptor.description
    }
}

/// Resolves descriptors into loaded challenges.
#[async_trait]
pub trait ChallengeLoader: Send + Sync {
    async fn resolve(&self, descriptor: ChallengeDescriptor) -> Result<LoadedChallenge, AssetLoadError>;
}
