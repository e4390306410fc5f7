//! Lambda constructs: container-image functions and function URLs.

mod code;
mod function;
mod url;

pub use code::{AssetImageCodeProps, DockerImageCode};
pub use function::{DockerImageFunction, FunctionProps};
pub use url::{FunctionUrl, FunctionUrlAuthType, FunctionUrlOptions, InvokeMode};
