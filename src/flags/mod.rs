//! Flag registry, consistency rules, and flag sets.
//!
//! - [`registry`] - the closed flag vocabulary and its namespaces
//! - [`hierarchy`] - implication, guard, and alias tables
//! - [`set`] - partial assignments and the frozen [`FlagSet`]

pub mod hierarchy;
pub mod registry;
pub mod set;

pub use hierarchy::{Derivation, GuardRule, Signal, ALIASES, GUARDS, HIERARCHY};
pub use registry::{Flag, FlagRegistry, Namespace};
pub use set::{Assignment, FlagSet};
