//! Filesystem helpers for writing the cloud assembly.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Write `content` to `path` by writing a sibling temp file and renaming it over the target.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
  let file_name = path
    .file_name()
    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
  let mut temp_name = file_name.to_os_string();
  temp_name.push(".tmp");
  let temp_path = path.with_file_name(temp_name);

  fs::write(&temp_path, content)?;
  fs::rename(&temp_path, path)
}

/// Recursively copy `src` into `dst`, skipping top-level entries whose name is in `exclude`.
///
/// Symlinks are copied as links on unix and dereferenced elsewhere.
pub fn copy_dir<S: AsRef<str>>(src: &Path, dst: &Path, exclude: &[S]) -> io::Result<u64> {
  let mut copied = 0;
  fs::create_dir_all(dst)?;

  let walker = WalkDir::new(src).sort_by_file_name().into_iter().filter_entry(|e| {
    e.depth() != 1
      || e
        .file_name()
        .to_str()
        .map(|name| !exclude.iter().any(|x| x.as_ref() == name))
        .unwrap_or(true)
  });

  for entry in walker {
    let entry = entry.map_err(io::Error::other)?;
    if entry.depth() == 0 {
      continue;
    }
    let rel = entry.path().strip_prefix(src).map_err(io::Error::other)?;
    let target = dst.join(rel);
    let file_type = entry.file_type();

    if file_type.is_dir() {
      fs::create_dir_all(&target)?;
    } else if file_type.is_symlink() {
      copy_symlink(entry.path(), &target)?;
      copied += 1;
    } else if file_type.is_file() {
      fs::copy(entry.path(), &target)?;
      copied += 1;
    }
  }

  Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
  let link = fs::read_link(src)?;
  std::os::unix::fs::symlink(link, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
  fs::copy(src, dst).map(|_| ())
}
