//! backlog CLI wrapper module
//!
//! Validation, escaping, executable discovery and process execution for
//! the `backlog` command.

pub mod error;
pub mod escape;
pub mod invocation;
pub mod resolver;
pub mod runner;
pub mod validate;
pub mod version;

pub use error::{BacklogError, BacklogResult};
pub use escape::{escape, ShellFlavor};
pub use invocation::InvocationMode;
pub use resolver::{ExecutableResolver, ProbeCommands, Resolution, Strategy};
pub use runner::{is_initialized, project_dir_from_env, CommandRunner};
pub use validate::{validate, validate_basic, FieldKind, Rejection};
pub use version::{compare_versions, VersionCompatibility, SUPPORTED_VERSION};
