//! targetcond - Build-time resolution of target platform conditionals.
//!
//! Inspects what the build toolchain exposes about its target (target query
//! builtins, predefined compiler macros, or manual pre-declarations) and
//! resolves it into a complete, consistent set of boolean flags:
//! `TARGET_CPU_*` (one-hot instruction set), `TARGET_OS_*` (hierarchical OS
//! platform), and `TARGET_RT_*` (runtime ABI).
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`emit`] - Output encodings (text, JSON, C header, Cargo directives)
//! - [`environment`] - Build environment input and loading
//! - [`error`] - Error types and result aliases
//! - [`flags`] - Flag registry, hierarchy, and flag sets
//! - [`resolver`] - Strategy selection and normalization
//! - [`strategy`] - Detection strategies
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use targetcond::{resolve, BuildEnvironment, Flag};
//!
//! let env = BuildEnvironment::new()
//!     .with_macro("__GNUC__", "4")
//!     .with_macro("__APPLE_CC__", "5658")
//!     .with_macro("__ppc__", "1")
//!     .with_macro("__BYTE_ORDER__", "__ORDER_BIG_ENDIAN__");
//!
//! let target = resolve(&env).unwrap();
//! assert!(target.get(Flag::CpuPpc));
//! assert!(target.get(Flag::OsOsx));
//! assert!(target.get(Flag::RtBigEndian));
//! ```
//!
//! In a build script, [`activate`] resolves the target being compiled for
//! and exposes every flag as a `cfg`:
//!
//! ```no_run
//! fn main() {
//!     targetcond::activate().unwrap();
//! }
//! ```

pub mod cli;
pub mod emit;
pub mod environment;
pub mod error;
pub mod flags;
pub mod resolver;
pub mod strategy;
pub mod ui;

use emit::{CargoFormatter, TargetFormatter};

pub use environment::BuildEnvironment;
pub use error::{Result, TargetError};
pub use flags::{Flag, FlagRegistry, FlagSet, Namespace};
pub use resolver::{resolve, ResolvedTarget, Resolver};
pub use strategy::Strategy;

/// Resolve the target Cargo is compiling for and print the Cargo encoding.
///
/// Intended for `build.rs`. Every flag becomes a checked `cfg` with its name
/// lower-cased (`TARGET_OS_MAC` -> `target_os_mac`), set when the flag is
/// true.
///
/// # Errors
///
/// Returns `MissingCargoVar` outside a build script, or any fatal
/// resolution error.
pub fn activate() -> Result<ResolvedTarget> {
    environment::print_rerun_directives();

    let env = BuildEnvironment::from_cargo_env()?;
    let target = resolve(&env)?;

    let stdout = std::io::stdout();
    CargoFormatter::new().format(&target, &mut stdout.lock())?;

    Ok(target)
}
