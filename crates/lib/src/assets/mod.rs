//! Container image assets.
//!
//! A [`DockerImageAsset`] is a local build context that the deploy tooling
//! builds with `docker build --platform <platform>` and pushes to the
//! bootstrap container repository. Synthesis never runs docker; it only
//! fingerprints the context and stages a copy of it into the assembly.
//!
//! The fingerprint is the SHA-256 of the directory hash together with the
//! build options, so the image tag changes whenever either one does.

mod staging;

pub use staging::stage;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::consts::{ASSET_DEFAULT_EXCLUDES, DOCKERFILE_NAME};
use crate::platform::Platform;
use crate::template::intrinsic;
use crate::util::hash::{ContentHash, DirHashError, hash_bytes, hash_directory};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
  #[error("cannot find image directory at {0}")]
  DirectoryNotFound(PathBuf),

  #[error("image asset path is not a directory: {0}")]
  NotADirectory(PathBuf),

  #[error("cannot find file at {0}")]
  MissingDockerfile(PathBuf),

  #[error("failed to fingerprint {path}: {source}")]
  Fingerprint {
    path: PathBuf,
    #[source]
    source: DirHashError,
  },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to stage asset into {path}: {source}")]
  Stage {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DockerImageAsset {
  /// Canonical path of the build context.
  pub directory: PathBuf,
  pub platform: Platform,
  pub fingerprint: ContentHash,
  /// Names skipped when fingerprinting and staging.
  pub excludes: Vec<String>,
}

impl DockerImageAsset {
  /// Fingerprint the build context at `directory`.
  ///
  /// The directory must exist and contain a `Dockerfile`.
  pub fn new(directory: &Path, platform: Platform) -> Result<Self, AssetError> {
    if !directory.exists() {
      return Err(AssetError::DirectoryNotFound(directory.to_path_buf()));
    }
    if !directory.is_dir() {
      return Err(AssetError::NotADirectory(directory.to_path_buf()));
    }
    let directory = dunce::canonicalize(directory).map_err(|source| AssetError::Read {
      path: directory.to_path_buf(),
      source,
    })?;

    let dockerfile = directory.join(DOCKERFILE_NAME);
    if !dockerfile.is_file() {
      return Err(AssetError::MissingDockerfile(dockerfile));
    }

    let excludes = load_excludes(&directory)?;
    let source = hash_directory(&directory, &excludes).map_err(|source| AssetError::Fingerprint {
      path: directory.clone(),
      source,
    })?;

    let build_options = format!("source:{}\nplatform:{}\nfile:{}\n", source, platform, DOCKERFILE_NAME);
    let fingerprint = hash_bytes(build_options.as_bytes());

    debug!(
      directory = %directory.display(),
      %platform,
      fingerprint = %fingerprint,
      "fingerprinted image asset"
    );

    Ok(Self {
      directory,
      platform,
      fingerprint,
      excludes,
    })
  }

  /// Directory name of the staged copy inside the assembly.
  pub fn staged_dir_name(&self) -> String {
    format!("asset.{}", self.fingerprint)
  }

  /// Bootstrap repository images are pushed to.
  pub fn repository_name(qualifier: &str) -> String {
    format!(
      "cdk-{}-container-assets-${{{}}}-${{{}}}",
      qualifier,
      intrinsic::ACCOUNT_ID,
      intrinsic::REGION
    )
  }

  /// Image URI token for a function's `Code.ImageUri`.
  pub fn image_uri(&self, qualifier: &str) -> Value {
    intrinsic::sub(format!(
      "${{{}}}.dkr.ecr.${{{}}}.${{{}}}/{}:{}",
      intrinsic::ACCOUNT_ID,
      intrinsic::REGION,
      intrinsic::URL_SUFFIX,
      Self::repository_name(qualifier),
      self.fingerprint
    ))
  }
}

/// Default exclusions plus the plain top-level names listed in `.dockerignore`.
///
/// Wildcard and nested patterns are not interpreted; docker still applies
/// them when it builds the staged copy.
fn load_excludes(directory: &Path) -> Result<Vec<String>, AssetError> {
  let mut excludes: Vec<String> = ASSET_DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();

  let ignore_path = directory.join(".dockerignore");
  let content = match fs::read_to_string(&ignore_path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(excludes),
    Err(source) => {
      return Err(AssetError::Read {
        path: ignore_path,
        source,
      });
    }
  };

  for line in content.lines() {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
      continue;
    }
    let name = line.trim_start_matches('/').trim_end_matches('/');
    if name.is_empty() || name.contains(['*', '?', '[', '/']) {
      debug!(pattern = line, "ignoring .dockerignore pattern for fingerprinting");
      continue;
    }
    if !excludes.iter().any(|e| e == name) {
      excludes.push(name.to_string());
    }
  }

  Ok(excludes)
}
