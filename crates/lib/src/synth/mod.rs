//! Synthesis: turning an [`App`] into a cloud assembly on disk.
//!
//! Synthesis runs in a fixed order:
//! 1. Run every stack's validations; any failure aborts before touching disk
//! 2. Create the output directory
//! 3. Stage image assets into `asset.<fingerprint>/`
//! 4. Write each stack's template and asset manifest
//! 5. Write `manifest.json` and the `cdk.out` version marker
//!
//! Every file is written atomically and every map is ordered, so running
//! synthesis twice over unchanged inputs leaves byte-identical files.

pub mod manifest;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::app::App;
use crate::assets::{self, AssetError, DockerImageAsset};
use crate::consts::{ASSEMBLY_SCHEMA_VERSION, MIN_BOOTSTRAP_VERSION};
use crate::stack::{Environment, Stack, ValidationError};
use crate::template::Template;
use crate::util::fs::write_atomic;
use crate::util::hash::{ContentHash, hash_bytes};

use manifest::{
  ASSET_MANIFEST_ARTIFACT_TYPE, Artifact, ArtifactProperties, AssemblyManifest, AssetManifest, AssetManifestProperties,
  CURRENT_ENV_DESTINATION, DockerImageAssetEntry, DockerImageDestination, DockerImageSource, FileAsset, FileDestination,
  FileSource, STACK_ARTIFACT_TYPE, StackProperties, VersionMarker,
};

pub const MANIFEST_FILENAME: &str = "manifest.json";
pub const VERSION_MARKER_FILENAME: &str = "cdk.out";

#[derive(Debug, thiserror::Error)]
pub enum SynthError {
  #[error("validation failed with {} error(s):\n{}", .0.len(), format_validation_errors(.0))]
  Validation(Vec<ValidationError>),

  #[error("failed to create output directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to serialize {what}: {source}")]
  Serialize {
    what: String,
    #[source]
    source: serde_json::Error,
  },

  #[error(transparent)]
  Asset(#[from] AssetError),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
  errors
    .iter()
    .map(|e| format!("  {}", e))
    .collect::<Vec<_>>()
    .join("\n")
}

/// One synthesized stack.
#[derive(Debug, Clone)]
pub struct StackArtifact {
  pub id: String,
  pub environment: Environment,
  pub template: Template,
  pub template_path: PathBuf,
  pub assets_path: PathBuf,
  pub staged_assets: Vec<PathBuf>,
}

/// The result of synthesis: the assembly directory and what was written to it.
#[derive(Debug, Clone)]
pub struct CloudAssembly {
  pub directory: PathBuf,
  pub manifest: AssemblyManifest,
  pub stacks: Vec<StackArtifact>,
}

impl CloudAssembly {
  pub fn stack(&self, id: &str) -> Option<&StackArtifact> {
    self.stacks.iter().find(|s| s.id == id)
  }
}

/// Synthesize every stack of `app` into [`App::outdir`].
pub fn synthesize(app: &App) -> Result<CloudAssembly, SynthError> {
  let errors: Vec<ValidationError> = app.stacks().iter().flat_map(Stack::validate).collect();
  if !errors.is_empty() {
    for error in &errors {
      warn!(path = %error.path, "{}", error.message);
    }
    return Err(SynthError::Validation(errors));
  }

  let outdir = app.outdir().to_path_buf();
  fs::create_dir_all(&outdir).map_err(|source| SynthError::CreateDir {
    path: outdir.clone(),
    source,
  })?;

  let mut artifacts = BTreeMap::new();
  let mut stacks = Vec::with_capacity(app.stacks().len());

  for stack in app.stacks() {
    let artifact = synthesize_stack(stack, &outdir, &mut artifacts)?;
    stacks.push(artifact);
  }

  let manifest = AssemblyManifest {
    version: ASSEMBLY_SCHEMA_VERSION.to_string(),
    artifacts,
  };
  write_json(&outdir.join(MANIFEST_FILENAME), &manifest, "assembly manifest")?;
  write_json(
    &outdir.join(VERSION_MARKER_FILENAME),
    &VersionMarker {
      version: ASSEMBLY_SCHEMA_VERSION.to_string(),
    },
    "version marker",
  )?;

  info!(
    outdir = %outdir.display(),
    stacks = stacks.len(),
    "synthesized cloud assembly"
  );

  Ok(CloudAssembly {
    directory: outdir,
    manifest,
    stacks,
  })
}

fn synthesize_stack(
  stack: &Stack,
  outdir: &Path,
  artifacts: &mut BTreeMap<String, Artifact>,
) -> Result<StackArtifact, SynthError> {
  let template = stack.template();
  let template_json = template.to_json_string().map_err(|source| SynthError::Serialize {
    what: stack.template_file_name(),
    source,
  })?;
  let template_hash = hash_bytes(template_json.as_bytes());

  let staged_assets = stack
    .assets()
    .map(|asset| assets::stage(asset, outdir))
    .collect::<Result<Vec<_>, _>>()?;

  let template_path = outdir.join(stack.template_file_name());
  write_atomic(&template_path, template_json.as_bytes()).map_err(|source| SynthError::Write {
    path: template_path.clone(),
    source,
  })?;

  let roles = BootstrapRoles::new(stack);
  let asset_manifest = asset_manifest(stack, &template_hash, &roles);
  let assets_path = outdir.join(stack.assets_file_name());
  write_json(&assets_path, &asset_manifest, &stack.assets_file_name())?;

  let assets_artifact_id = format!("{}.assets", stack.id());
  let ssm_parameter = format!("/cdk-bootstrap/{}/version", stack.qualifier());
  artifacts.insert(
    assets_artifact_id.clone(),
    Artifact {
      artifact_type: ASSET_MANIFEST_ARTIFACT_TYPE.to_string(),
      environment: None,
      properties: ArtifactProperties::AssetManifest(AssetManifestProperties {
        file: stack.assets_file_name(),
        requires_bootstrap_stack_version: MIN_BOOTSTRAP_VERSION,
        bootstrap_stack_version_ssm_parameter: ssm_parameter.clone(),
      }),
      dependencies: Vec::new(),
      display_name: None,
    },
  );
  artifacts.insert(
    stack.id().to_string(),
    Artifact {
      artifact_type: STACK_ARTIFACT_TYPE.to_string(),
      environment: Some(stack.environment().to_string()),
      properties: ArtifactProperties::Stack(StackProperties {
        template_file: stack.template_file_name(),
        validate_on_synth: false,
        assume_role_arn: roles.deploy,
        cloud_formation_execution_role_arn: roles.cfn_exec,
        stack_template_asset_object_url: format!("s3://{}/{}.json", roles.bucket, template_hash),
        requires_bootstrap_stack_version: MIN_BOOTSTRAP_VERSION,
        bootstrap_stack_version_ssm_parameter: ssm_parameter,
      }),
      dependencies: vec![assets_artifact_id],
      display_name: Some(stack.id().to_string()),
    },
  );

  info!(
    stack = stack.id(),
    resources = template.resources.len(),
    outputs = template.outputs.len(),
    template = %template_path.display(),
    "synthesized stack"
  );

  Ok(StackArtifact {
    id: stack.id().to_string(),
    environment: stack.environment().clone(),
    template,
    template_path,
    assets_path,
    staged_assets,
  })
}

/// Names of the bootstrap resources a stack deploys through.
struct BootstrapRoles {
  destination: String,
  bucket: String,
  deploy: String,
  cfn_exec: String,
  file_publishing: String,
  image_publishing: String,
}

impl BootstrapRoles {
  fn new(stack: &Stack) -> Self {
    let env = stack.environment();
    let account = env.account_or_placeholder();
    let region = env.region_or_placeholder();
    let q = stack.qualifier();
    let role = |name: &str| {
      format!(
        "arn:${{AWS::Partition}}:iam::{}:role/cdk-{}-{}-role-{}-{}",
        account, q, name, account, region
      )
    };

    let destination = match (&env.account, &env.region) {
      (Some(account), Some(region)) => format!("{}-{}", account, region),
      _ => CURRENT_ENV_DESTINATION.to_string(),
    };

    Self {
      destination,
      bucket: format!("cdk-{}-assets-{}-{}", q, account, region),
      deploy: role("deploy"),
      cfn_exec: role("cfn-exec"),
      file_publishing: role("file-publishing"),
      image_publishing: role("image-publishing"),
    }
  }
}

fn asset_manifest(stack: &Stack, template_hash: &ContentHash, roles: &BootstrapRoles) -> AssetManifest {
  let mut files = BTreeMap::new();
  files.insert(
    template_hash.0.clone(),
    FileAsset {
      source: FileSource {
        path: stack.template_file_name(),
        packaging: "file".to_string(),
      },
      destinations: BTreeMap::from([(
        roles.destination.clone(),
        FileDestination {
          bucket_name: roles.bucket.clone(),
          object_key: format!("{}.json", template_hash),
          assume_role_arn: roles.file_publishing.clone(),
        },
      )]),
    },
  );

  let docker_images = stack
    .assets()
    .map(|asset| (asset.fingerprint.0.clone(), docker_image_entry(stack, asset, roles)))
    .collect();

  AssetManifest {
    version: ASSEMBLY_SCHEMA_VERSION.to_string(),
    files,
    docker_images,
  }
}

fn docker_image_entry(stack: &Stack, asset: &DockerImageAsset, roles: &BootstrapRoles) -> DockerImageAssetEntry {
  DockerImageAssetEntry {
    source: DockerImageSource {
      directory: asset.staged_dir_name(),
      platform: asset.platform.to_string(),
    },
    destinations: BTreeMap::from([(
      roles.destination.clone(),
      DockerImageDestination {
        repository_name: DockerImageAsset::repository_name(stack.qualifier()),
        image_tag: asset.fingerprint.0.clone(),
        assume_role_arn: roles.image_publishing.clone(),
      },
    )]),
  }
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), SynthError> {
  let mut content = serde_json::to_string_pretty(value).map_err(|source| SynthError::Serialize {
    what: what.to_string(),
    source,
  })?;
  content.push('\n');
  write_atomic(path, content.as_bytes()).map_err(|source| SynthError::Write {
    path: path.to_path_buf(),
    source,
  })
}

/// Load the template a previous synthesis left in `outdir`, if any.
pub fn load_template(outdir: &Path, stack_id: &str) -> Result<Option<Template>, SynthError> {
  let path = outdir.join(format!("{}.template.json", stack_id));
  let content = match fs::read_to_string(&path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(source) => return Err(SynthError::Read { path, source }),
  };
  let template = serde_json::from_str(&content).map_err(|source| SynthError::Parse { path, source })?;
  Ok(Some(template))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  use serde_json::json;
  use tracing_test::traced_test;

  use crate::app::{App, AppProps};
  use crate::lambda::{AssetImageCodeProps, DockerImageCode, DockerImageFunction, FunctionProps, FunctionUrlOptions};
  use crate::output::{CfnOutput, CfnOutputProps};
  use crate::platform::{Architecture, Platform};
  use crate::stack::StackProps;
  use crate::util::testutil::{image_context, read_json, temp_app};

  fn declare(app: &mut App, id: &str, dir: &Path, architecture: Architecture) {
    let stack = app.add_stack(id, StackProps::default()).unwrap();
    let props = FunctionProps {
      architecture,
      memory_size: Some(128),
      timeout: Some(Duration::from_secs(10)),
      ..FunctionProps::new(DockerImageCode::from_image_asset(
        dir,
        AssetImageCodeProps {
          platform: Some(Platform::LINUX_ARM64),
        },
      ))
    };
    let mut function = DockerImageFunction::new(stack, "Fn", props).unwrap();
    let url = function.add_function_url(stack, FunctionUrlOptions::default()).unwrap();
    CfnOutput::new(stack, "FunctionUrl", CfnOutputProps::new(url.url())).unwrap();
  }

  #[test]
  fn writes_assembly_layout() {
    let ctx = image_context();
    let (mut app, _out) = temp_app();
    declare(&mut app, "S", ctx.path(), Architecture::Arm64);

    let assembly = app.synth().unwrap();
    let dir = &assembly.directory;

    let artifact = assembly.stack("S").unwrap();
    assert!(artifact.template_path.is_file());
    assert!(artifact.assets_path.is_file());
    assert_eq!(artifact.staged_assets.len(), 1);
    assert!(artifact.staged_assets[0].join("Dockerfile").is_file());

    let manifest = read_json(dir.join(MANIFEST_FILENAME));
    assert_eq!(manifest["version"], ASSEMBLY_SCHEMA_VERSION);
    assert_eq!(manifest["artifacts"]["S"]["type"], STACK_ARTIFACT_TYPE);
    assert_eq!(manifest["artifacts"]["S"]["environment"], "aws://unknown-account/unknown-region");
    assert_eq!(manifest["artifacts"]["S"]["properties"]["templateFile"], "S.template.json");
    assert_eq!(manifest["artifacts"]["S"]["dependencies"], json!(["S.assets"]));
    assert_eq!(manifest["artifacts"]["S.assets"]["type"], ASSET_MANIFEST_ARTIFACT_TYPE);

    let marker = read_json(dir.join(VERSION_MARKER_FILENAME));
    assert_eq!(marker, json!({ "version": ASSEMBLY_SCHEMA_VERSION }));
  }

  #[test]
  fn asset_manifest_describes_image_build() {
    let ctx = image_context();
    let (mut app, _out) = temp_app();
    declare(&mut app, "S", ctx.path(), Architecture::Arm64);

    let assembly = app.synth().unwrap();
    let assets = read_json(assembly.stack("S").unwrap().assets_path.clone());
    let images = assets["dockerImages"].as_object().unwrap();
    assert_eq!(images.len(), 1);

    let (fingerprint, image) = images.iter().next().unwrap();
    assert_eq!(image["source"]["platform"], "linux/arm64");
    assert_eq!(image["source"]["directory"], format!("asset.{}", fingerprint));
    let destination = &image["destinations"][CURRENT_ENV_DESTINATION];
    assert_eq!(destination["imageTag"], fingerprint.as_str());
    assert_eq!(
      destination["repositoryName"],
      "cdk-hnb659fds-container-assets-${AWS::AccountId}-${AWS::Region}"
    );

    assert_eq!(assets["files"].as_object().unwrap().len(), 1);
  }

  #[test]
  fn pinned_environment_is_written_into_role_arns() {
    let ctx = image_context();
    let out = tempfile::TempDir::new().unwrap();
    let mut app = App::new(AppProps {
      outdir: Some(out.path().to_path_buf()),
      default_env: Some(Environment::new("123456789012", "eu-west-1")),
      ..AppProps::default()
    });
    declare(&mut app, "S", ctx.path(), Architecture::Arm64);

    let assembly = app.synth().unwrap();
    let ArtifactProperties::Stack(props) = &assembly.manifest.artifacts["S"].properties else {
      panic!("stack artifact expected");
    };
    assert_eq!(
      props.assume_role_arn,
      "arn:${AWS::Partition}:iam::123456789012:role/cdk-hnb659fds-deploy-role-123456789012-eu-west-1"
    );
    let assets = read_json(assembly.stack("S").unwrap().assets_path.clone());
    assert!(assets["files"].as_object().unwrap().values().all(|f| f["destinations"]
      .get("123456789012-eu-west-1")
      .is_some()));
  }

  #[test]
  #[traced_test]
  fn validation_failure_writes_nothing() {
    let ctx = image_context();
    let (mut app, _out) = temp_app();
    declare(&mut app, "S", ctx.path(), Architecture::X86_64);

    let err = app.synth().unwrap_err();
    match &err {
      SynthError::Validation(errors) => {
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "S/Fn");
      }
      other => panic!("expected validation error, got {other}"),
    }
    assert!(err.to_string().contains("[S/Fn] image platform linux/arm64 does not match"));
    assert!(!app.outdir().exists());
    assert!(logs_contain("does not match function architecture"));
  }

  #[test]
  fn resynthesis_is_byte_identical() {
    let ctx = image_context();
    let (mut app, _out) = temp_app();
    declare(&mut app, "S", ctx.path(), Architecture::Arm64);

    let first = app.synth().unwrap();
    let files = ["S.template.json", "S.assets.json", MANIFEST_FILENAME, VERSION_MARKER_FILENAME];
    let before: Vec<String> = files
      .iter()
      .map(|f| fs::read_to_string(first.directory.join(f)).unwrap())
      .collect();

    let second = app.synth().unwrap();
    let after: Vec<String> = files
      .iter()
      .map(|f| fs::read_to_string(second.directory.join(f)).unwrap())
      .collect();

    assert_eq!(before, after);
    assert_eq!(first.stack("S").unwrap().template, second.stack("S").unwrap().template);
  }

  #[test]
  fn load_template_reads_previous_synthesis() {
    let ctx = image_context();
    let (mut app, _out) = temp_app();
    declare(&mut app, "S", ctx.path(), Architecture::Arm64);

    assert!(load_template(app.outdir(), "S").unwrap().is_none());
    let assembly = app.synth().unwrap();
    let loaded = load_template(app.outdir(), "S").unwrap().unwrap();
    assert_eq!(loaded, assembly.stack("S").unwrap().template);
  }
}
