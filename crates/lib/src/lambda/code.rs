use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// Build options for an image built from a local directory.
#[derive(Debug, Default, Clone)]
pub struct AssetImageCodeProps {
  /// Platform passed to `docker build --platform`. Defaults to the
  /// function's architecture.
  pub platform: Option<Platform>,
}

/// Source of a container-image function.
///
/// The directory is only fingerprinted once the code is bound to a function,
/// so a bad path surfaces as a construction error of that function.
#[derive(Debug, Clone)]
pub struct DockerImageCode {
  pub(crate) directory: PathBuf,
  pub(crate) props: AssetImageCodeProps,
}

impl DockerImageCode {
  /// Image built from the Dockerfile in `directory`.
  pub fn from_image_asset(directory: impl AsRef<Path>, props: AssetImageCodeProps) -> Self {
    Self {
      directory: directory.as_ref().to_path_buf(),
      props,
    }
  }

  pub fn directory(&self) -> &Path {
    &self.directory
  }

  pub fn platform(&self) -> Option<Platform> {
    self.props.platform
  }
}
