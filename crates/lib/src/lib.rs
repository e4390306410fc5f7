//! hello-lambda-lib: a small construct library that synthesizes CloudFormation
//!
//! Infrastructure is declared as a tree of constructs and rendered into a
//! cloud assembly the deploy tooling consumes:
//! - `App`: root of the tree, owns stacks and drives synthesis
//! - `Stack`: one deployable unit, rendered as a `Template`
//! - `DockerImageFunction` / `FunctionUrl`: a container-image Lambda and its endpoint
//! - `DockerImageAsset`: a fingerprinted, staged image build context
//! - `CloudAssembly`: the synthesized output directory

pub mod app;
pub mod assets;
pub mod config;
pub mod consts;
pub mod lambda;
pub mod output;
pub mod platform;
pub mod stack;
pub mod synth;
pub mod template;
pub mod util;

pub use app::{App, AppProps};
pub use stack::{ConstructError, Environment, Stack, StackProps};
pub use synth::{CloudAssembly, SynthError};
