//! Detection strategies.
//!
//! Each strategy consumes a different shape of build-environment input and
//! produces a partial assignment. Strategies are tried in [`Strategy::PRIORITY`]
//! order and the first applicable one wins:
//!
//! 1. Target query builtins (`__is_target_*`)
//! 2. Apple GNU predefined macros
//! 3. Metrowerks CodeWarrior
//! 4. Manual `TARGET_CPU_*` override

pub mod abi;
pub mod apple_gnu;
pub mod arch;
pub mod manual;
pub mod metrowerks;
pub mod target_query;

use std::fmt;

use serde::Serialize;

use crate::environment::{BuildEnvironment, Overrides};
use crate::error::Result;
use crate::flags::{Flag, Signal};

pub use abi::{BinaryFormat, ByteOrder, RuntimeAbi};
pub use arch::Arch;

/// Trait for strategy implementations.
pub trait Detector {
    /// Check the strategy's preconditions.
    fn is_applicable(&self, env: &BuildEnvironment, overrides: &Overrides) -> bool;

    /// Produce the strategy's canonical assignment.
    fn detect(&self, env: &BuildEnvironment, overrides: &Overrides) -> Result<Detection>;
}

/// A detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    TargetQuery,
    AppleGnu,
    Metrowerks,
    ManualOverride,
}

impl Strategy {
    /// Strategies in the order they are tried.
    pub const PRIORITY: [Strategy; 4] = [
        Strategy::TargetQuery,
        Strategy::AppleGnu,
        Strategy::Metrowerks,
        Strategy::ManualOverride,
    ];

    /// Machine-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TargetQuery => "target_query",
            Self::AppleGnu => "apple_gnu",
            Self::Metrowerks => "metrowerks",
            Self::ManualOverride => "manual_override",
        }
    }

    fn detector(&self) -> &'static dyn Detector {
        match self {
            Self::TargetQuery => &target_query::TargetQueryDetector,
            Self::AppleGnu => &apple_gnu::AppleGnuDetector,
            Self::Metrowerks => &metrowerks::MetrowerksDetector,
            Self::ManualOverride => &manual::ManualOverrideDetector,
        }
    }

    /// Whether this strategy's preconditions hold.
    pub fn is_applicable(&self, env: &BuildEnvironment, overrides: &Overrides) -> bool {
        self.detector().is_applicable(env, overrides)
    }

    /// Run the strategy.
    pub fn detect(&self, env: &BuildEnvironment, overrides: &Overrides) -> Result<Detection> {
        self.detector().detect(env, overrides)
    }

    /// First applicable strategy, if any.
    pub fn select(env: &BuildEnvironment, overrides: &Overrides) -> Option<Strategy> {
        Self::PRIORITY
            .into_iter()
            .find(|strategy| strategy.is_applicable(env, overrides))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetQuery => write!(f, "target query"),
            Self::AppleGnu => write!(f, "Apple GNU C"),
            Self::Metrowerks => write!(f, "Metrowerks CodeWarrior"),
            Self::ManualOverride => write!(f, "manual override"),
        }
    }
}

/// Partial assignment produced by a strategy.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Strategy that produced this detection.
    pub strategy: Strategy,

    /// Canonical OS flag values, leaves only.
    pub os: Vec<(Flag, bool)>,

    /// Raw signals for the guard rules.
    pub signals: Vec<Signal>,

    /// The single true CPU flag.
    pub cpu: Flag,

    /// Runtime ABI characteristics.
    pub abi: RuntimeAbi,

    /// Human-readable notes on what was observed.
    pub details: Vec<String>,
}

impl Detection {
    /// Create a detection with no OS assignment.
    pub fn new(strategy: Strategy, cpu: Flag, abi: RuntimeAbi) -> Self {
        Self {
            strategy,
            os: Vec::new(),
            signals: Vec::new(),
            cpu,
            abi,
            details: Vec::new(),
        }
    }

    /// Assert an OS flag.
    pub fn with_os(self, flag: Flag) -> Self {
        self.with_os_value(flag, true)
    }

    /// Pin an OS flag to a value.
    pub fn with_os_value(mut self, flag: Flag, value: bool) -> Self {
        self.os.push((flag, value));
        self
    }

    /// Raise a guard signal.
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    /// Add a detail.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> Overrides {
        Overrides::default()
    }

    #[test]
    fn nothing_applies_to_empty_environment() {
        assert_eq!(Strategy::select(&BuildEnvironment::new(), &no_overrides()), None);
    }

    #[test]
    fn target_query_beats_gnu_macros() {
        let env = BuildEnvironment::new()
            .with_triple("x86_64-apple-macos".parse().unwrap())
            .with_macro("__GNUC__", "4")
            .with_macro("__APPLE_CC__", "6000");
        assert_eq!(
            Strategy::select(&env, &no_overrides()),
            Some(Strategy::TargetQuery)
        );
    }

    #[test]
    fn gnu_beats_metrowerks() {
        let env = BuildEnvironment::new()
            .with_macro("__GNUC__", "4")
            .with_macro("__APPLE_CPP__", "1")
            .with_macro("__MWERKS__", "1");
        assert_eq!(
            Strategy::select(&env, &no_overrides()),
            Some(Strategy::AppleGnu)
        );
    }

    #[test]
    fn manual_override_is_last_resort() {
        let env = BuildEnvironment::new()
            .with_macro("__MWERKS__", "1")
            .with_override("TARGET_CPU_MIPS", true);
        let overrides = env.overrides().unwrap();
        assert_eq!(Strategy::select(&env, &overrides), Some(Strategy::Metrowerks));

        let env = BuildEnvironment::new().with_override("TARGET_CPU_MIPS", true);
        let overrides = env.overrides().unwrap();
        assert_eq!(
            Strategy::select(&env, &overrides),
            Some(Strategy::ManualOverride)
        );
    }

    #[test]
    fn names_are_snake_case() {
        for strategy in Strategy::PRIORITY {
            let json = serde_json::to_value(strategy).unwrap();
            assert_eq!(json, strategy.name());
        }
    }

    #[test]
    fn detection_builder() {
        let abi = RuntimeAbi {
            byte_order: ByteOrder::Little,
            pointer_64: true,
            format: BinaryFormat::MachO,
        };
        let detection = Detection::new(Strategy::TargetQuery, Flag::CpuArm64, abi)
            .with_os(Flag::OsIos)
            .with_os_value(Flag::OsTv, false)
            .with_signal(Signal::SimulatorEnvironment)
            .with_detail("os ios");

        assert_eq!(detection.os, vec![(Flag::OsIos, true), (Flag::OsTv, false)]);
        assert_eq!(detection.signals, vec![Signal::SimulatorEnvironment]);
        assert_eq!(detection.details, vec!["os ios"]);
    }
}
