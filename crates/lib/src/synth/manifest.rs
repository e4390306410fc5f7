//! On-disk formats of the cloud assembly.
//!
//! ```text
//! cdk.out/
//! ├── cdk.out                        # { "version": ... }
//! ├── manifest.json                  # AssemblyManifest
//! ├── <Stack>.template.json          # Template
//! ├── <Stack>.assets.json            # AssetManifest
//! └── asset.<fingerprint>/           # staged image build context
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const STACK_ARTIFACT_TYPE: &str = "aws:cloudformation:stack";
pub const ASSET_MANIFEST_ARTIFACT_TYPE: &str = "cdk:asset-manifest";

/// Destination key used when the target environment is resolved at deploy time.
pub const CURRENT_ENV_DESTINATION: &str = "current_account-current_region";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionMarker {
  pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyManifest {
  pub version: String,
  pub artifacts: BTreeMap<String, Artifact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
  #[serde(rename = "type")]
  pub artifact_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub environment: Option<String>,
  pub properties: ArtifactProperties,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dependencies: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactProperties {
  Stack(StackProperties),
  AssetManifest(AssetManifestProperties),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackProperties {
  pub template_file: String,
  pub validate_on_synth: bool,
  pub assume_role_arn: String,
  pub cloud_formation_execution_role_arn: String,
  pub stack_template_asset_object_url: String,
  pub requires_bootstrap_stack_version: u32,
  pub bootstrap_stack_version_ssm_parameter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifestProperties {
  pub file: String,
  pub requires_bootstrap_stack_version: u32,
  pub bootstrap_stack_version_ssm_parameter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
  pub version: String,
  pub files: BTreeMap<String, FileAsset>,
  pub docker_images: BTreeMap<String, DockerImageAssetEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAsset {
  pub source: FileSource,
  pub destinations: BTreeMap<String, FileDestination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSource {
  pub path: String,
  pub packaging: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDestination {
  pub bucket_name: String,
  pub object_key: String,
  pub assume_role_arn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerImageAssetEntry {
  pub source: DockerImageSource,
  pub destinations: BTreeMap<String, DockerImageDestination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerImageSource {
  pub directory: String,
  pub platform: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerImageDestination {
  pub repository_name: String,
  pub image_tag: String,
  pub assume_role_arn: String,
}
