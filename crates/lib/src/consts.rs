//! Shared constants.

/// Length of the truncated object hashes used for assembly artifact keys.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Cloud assembly schema version written to `manifest.json` and `cdk.out`.
pub const ASSEMBLY_SCHEMA_VERSION: &str = "36.0.0";

/// Default output directory for the cloud assembly.
pub const DEFAULT_OUTDIR: &str = "cdk.out";

/// Default bootstrap qualifier used by the default stack synthesizer.
pub const DEFAULT_QUALIFIER: &str = "hnb659fds";

/// Context key that overrides [`DEFAULT_QUALIFIER`].
pub const QUALIFIER_CONTEXT_KEY: &str = "@aws-cdk/core:bootstrapQualifier";

/// Lowest bootstrap stack version the generated templates accept.
pub const MIN_BOOTSTRAP_VERSION: u32 = 6;

/// Environment variable names read by [`crate::config::AppConfig::from_env`].
pub const ENV_OUTDIR: &str = "CDK_OUTDIR";
pub const ENV_DEFAULT_ACCOUNT: &str = "CDK_DEFAULT_ACCOUNT";
pub const ENV_DEFAULT_REGION: &str = "CDK_DEFAULT_REGION";
pub const ENV_CONTEXT_JSON: &str = "CDK_CONTEXT_JSON";

/// Directory and file names never fingerprinted or staged as part of an image asset.
pub const ASSET_DEFAULT_EXCLUDES: &[&str] = &[".git", "target", "cdk.out"];

/// Name of the build file required at the root of an image asset directory.
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// Lambda limits enforced at synthesis.
pub const LAMBDA_MIN_MEMORY_MB: u32 = 128;
pub const LAMBDA_MAX_MEMORY_MB: u32 = 10_240;
pub const LAMBDA_MAX_TIMEOUT_SECS: u64 = 900;

/// Maximum length of a stack identifier.
pub const MAX_STACK_ID_LEN: usize = 128;

/// Maximum length of the human-readable part of a logical id.
pub const MAX_LOGICAL_ID_HUMAN_LEN: usize = 255 - 8;
