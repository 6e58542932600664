//! Build environment input.
//!
//! Describes what the toolchain exposes about the target. An environment
//! comes from one of:
//!
//! 1. An environment file (YAML or JSON)
//! 2. Cargo's `CARGO_CFG_TARGET_*` build-script variables
//! 3. The builder methods on [`BuildEnvironment`]

pub mod cargo;
pub mod loader;
pub mod overrides;
pub mod schema;
pub mod triple;

pub use cargo::print_rerun_directives;
pub use loader::{load_environment, parse_environment, EnvironmentFormat};
pub use overrides::Overrides;
pub use schema::{parse_truthy, BuildEnvironment, MacroValue, QueryBuiltin, TargetQuery};
pub use triple::TargetTriple;
