use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{AssetError, DockerImageAsset};
use crate::util::fs::copy_dir;

/// Copy the asset's build context into `outdir/asset.<fingerprint>`.
///
/// The staged name contains the fingerprint, so an existing directory
/// already holds identical content and is left untouched.
pub fn stage(asset: &DockerImageAsset, outdir: &Path) -> Result<PathBuf, AssetError> {
  let target = outdir.join(asset.staged_dir_name());
  if target.is_dir() {
    debug!(path = %target.display(), "asset already staged");
    return Ok(target);
  }

  let stage_err = |source: std::io::Error| AssetError::Stage {
    path: target.clone(),
    source,
  };

  let temp = outdir.join(format!("{}.tmp", asset.staged_dir_name()));
  if temp.exists() {
    fs::remove_dir_all(&temp).map_err(stage_err)?;
  }
  let files = copy_dir(&asset.directory, &temp, &asset.excludes).map_err(stage_err)?;
  fs::rename(&temp, &target).map_err(stage_err)?;

  info!(
    source = %asset.directory.display(),
    path = %target.display(),
    files,
    "staged image asset"
  );
  Ok(target)
}
