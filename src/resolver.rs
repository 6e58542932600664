//! Target resolution.
//!
//! Resolves a [`BuildEnvironment`] into a complete [`FlagSet`]:
//!
//! 1. Select the first applicable strategy
//! 2. Apply its canonical OS assignment
//! 3. Force ancestors of true OS flags (hierarchy)
//! 4. Apply guard rules (simulator)
//! 5. Synthesize aliases
//! 6. Default every remaining OS flag to false
//! 7. Project the strategy's CPU and runtime ABI

use serde::Serialize;

use crate::environment::BuildEnvironment;
use crate::error::{Result, TargetError};
use crate::flags::{hierarchy, Assignment, Flag, FlagSet, Namespace};
use crate::strategy::{Detection, Strategy};

/// A resolved target: the flag snapshot plus how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    /// The complete flag set.
    pub flags: FlagSet,
    /// Strategy that matched.
    pub strategy: Strategy,
    /// Human-readable detection notes.
    pub details: Vec<String>,
}

impl ResolvedTarget {
    /// Value of a flag.
    pub fn get(&self, flag: Flag) -> bool {
        self.flags.get(flag)
    }
}

/// Resolves build environments into flag sets.
///
/// # Example
///
/// ```
/// use targetcond::environment::BuildEnvironment;
/// use targetcond::flags::Flag;
/// use targetcond::resolver::Resolver;
///
/// let env = BuildEnvironment::new()
///     .with_triple("arm64-apple-ios14.0-macabi".parse().unwrap())
///     .with_macro("__BYTE_ORDER__", "__ORDER_LITTLE_ENDIAN__")
///     .with_macro("__LP64__", "1");
///
/// let target = Resolver::new().resolve(&env).unwrap();
/// assert!(target.get(Flag::OsMacCatalyst));
/// assert!(target.get(Flag::OsMac));
/// assert!(target.get(Flag::CpuArm64));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Resolver;

impl Resolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve an environment.
    ///
    /// # Errors
    ///
    /// Returns `UnknownToolchain` when no strategy applies, `UnknownFlag`
    /// for an override name outside the registry, and whatever the selected
    /// strategy reports (`UnsupportedArchitecture`, `UnrecognizedByteOrder`,
    /// `ConflictingOverrides`).
    pub fn resolve(&self, env: &BuildEnvironment) -> Result<ResolvedTarget> {
        let overrides = env.overrides()?;

        let strategy = Strategy::select(env, &overrides).ok_or(TargetError::UnknownToolchain)?;
        tracing::debug!("Selected strategy: {}", strategy);

        if strategy != Strategy::ManualOverride && !overrides.is_empty() {
            let names: Vec<&str> = overrides.iter().map(|(flag, _)| flag.name()).collect();
            tracing::warn!(
                "Ignoring overrides {} because the {} strategy applies",
                names.join(", "),
                strategy
            );
        }

        let detection = strategy.detect(env, &overrides)?;
        for detail in &detection.details {
            tracing::trace!("{}: {}", strategy, detail);
        }

        let flags = normalize(&detection);
        Ok(ResolvedTarget {
            flags,
            strategy,
            details: detection.details,
        })
    }
}

/// Resolve an environment with the default resolver.
pub fn resolve(env: &BuildEnvironment) -> Result<ResolvedTarget> {
    Resolver::new().resolve(env)
}

fn normalize(detection: &Detection) -> FlagSet {
    let mut assignment = Assignment::new();

    for (flag, value) in &detection.os {
        assignment.assign(*flag, *value);
    }
    hierarchy::apply_implications(&mut assignment);
    hierarchy::apply_guards(&mut assignment, &detection.signals);
    hierarchy::apply_aliases(&mut assignment);
    assignment.fill_defaults(Namespace::OsPlatform);

    assignment.assign(detection.cpu, true);
    assignment.fill_defaults(Namespace::CpuArch);
    for (flag, value) in detection.abi.flags() {
        assignment.assign(flag, value);
    }

    assignment.into_flag_set()
}
