//! Test helpers for hello-lambda-lib.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::app::{App, AppProps};

/// A temporary image build context containing a Dockerfile.
pub fn image_context() -> TempDir {
  let temp = TempDir::new().unwrap();
  write_image_context(temp.path());
  temp
}

/// Populate `dir` with a minimal Dockerfile and handler source.
pub fn write_image_context(dir: &Path) {
  fs::create_dir_all(dir.join("src")).unwrap();
  fs::write(
    dir.join("Dockerfile"),
    "FROM public.ecr.aws/lambda/provided:al2023-arm64\nCOPY bootstrap ${LAMBDA_RUNTIME_DIR}/bootstrap\nCMD [\"handler\"]\n",
  )
  .unwrap();
  fs::write(dir.join("src/main.rs"), "fn main() {}\n").unwrap();
}

/// An app writing into a fresh temporary output directory.
///
/// The returned `TempDir` must be kept alive for as long as the app is used.
pub fn temp_app() -> (App, TempDir) {
  let out = TempDir::new().unwrap();
  let app = App::new(AppProps {
    outdir: Some(out.path().join("cdk.out")),
    ..AppProps::default()
  });
  (app, out)
}

/// Read a file from the assembly directory as JSON.
pub fn read_json(path: PathBuf) -> serde_json::Value {
  let content = fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
  serde_json::from_str(&content).unwrap()
}
