//! Consistency rules between flags.
//!
//! Three tables drive normalization:
//!
//! - [`HIERARCHY`]: `child -> parent` edges of the OS platform tree. A true
//!   child forces every ancestor true.
//! - [`GUARDS`]: cross-axis flags synthesized from a detection [`Signal`]
//!   unless one of the listed OS flags is true.
//! - [`ALIASES`]: deprecated names that mirror a canonical flag.

use serde::Serialize;

use super::registry::Flag;
use super::set::Assignment;

/// Raw observation from the execution-environment axis that does not map
/// onto a flag by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// The toolchain targets a simulator environment.
    SimulatorEnvironment,
}

/// A flag synthesized from a signal, vetoed by any of `unless`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardRule {
    pub flag: Flag,
    pub signal: Signal,
    pub unless: &'static [Flag],
}

/// How a derived flag is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// Always equal to the canonical flag.
    Alias(Flag),
    /// Produced by a guard rule.
    Guarded(GuardRule),
}

/// OS platform tree as `(child, parent)` edges.
pub const HIERARCHY: &[(Flag, Flag)] = &[
    (Flag::OsOsx, Flag::OsMac),
    (Flag::OsIphone, Flag::OsMac),
    (Flag::OsDriverKit, Flag::OsMac),
    (Flag::OsExclaveCore, Flag::OsMac),
    (Flag::OsExclaveKit, Flag::OsMac),
    (Flag::OsIos, Flag::OsIphone),
    (Flag::OsTv, Flag::OsIphone),
    (Flag::OsWatch, Flag::OsIphone),
    (Flag::OsBridge, Flag::OsIphone),
    (Flag::OsVision, Flag::OsIos),
    (Flag::OsMacCatalyst, Flag::OsIos),
    (Flag::OsWin32, Flag::OsWindows),
    (Flag::OsEfi, Flag::OsWindows),
    (Flag::OsAndroid, Flag::OsLinux),
    (Flag::OsCygwin, Flag::OsLinux),
];

// A macOS or DriverKit simulator does not exist.
pub const GUARDS: &[GuardRule] = &[GuardRule {
    flag: Flag::OsSimulator,
    signal: Signal::SimulatorEnvironment,
    unless: &[Flag::OsOsx, Flag::OsDriverKit],
}];

/// `(alias, canonical)` pairs.
pub const ALIASES: &[(Flag, Flag)] = &[
    (Flag::OsEmbedded, Flag::OsIphone),
    (Flag::OsNano, Flag::OsWatch),
    (Flag::IphoneSimulator, Flag::OsSimulator),
    (Flag::OsUikitForMac, Flag::OsMacCatalyst),
];

/// Direct parents of a flag.
pub fn parents_of(flag: Flag) -> impl Iterator<Item = Flag> {
    HIERARCHY
        .iter()
        .filter(move |(child, _)| *child == flag)
        .map(|(_, parent)| *parent)
}

/// Every ancestor of a flag, nearest first, without duplicates.
pub fn ancestors_of(flag: Flag) -> Vec<Flag> {
    let mut ancestors = Vec::new();
    let mut frontier: Vec<Flag> = parents_of(flag).collect();

    while let Some(next) = frontier.pop() {
        if ancestors.contains(&next) {
            continue;
        }
        ancestors.push(next);
        frontier.extend(parents_of(next));
    }

    ancestors
}

pub(crate) fn derivation_of(flag: Flag) -> Option<Derivation> {
    if let Some((_, canonical)) = ALIASES.iter().find(|(alias, _)| *alias == flag) {
        return Some(Derivation::Alias(*canonical));
    }
    GUARDS
        .iter()
        .find(|rule| rule.flag == flag)
        .map(|rule| Derivation::Guarded(*rule))
}

/// Force every ancestor of each true flag to true. Never clears a flag.
pub fn apply_implications(assignment: &mut Assignment) {
    let asserted: Vec<Flag> = assignment.true_flags().collect();

    for flag in asserted {
        for ancestor in ancestors_of(flag) {
            if assignment.get(ancestor) != Some(true) {
                tracing::trace!("{} implies {}", flag, ancestor);
                assignment.assign(ancestor, true);
            }
        }
    }
}

/// Synthesize guarded flags from raw signals. Must run after
/// [`apply_implications`] so the vetoes see final OS values.
pub fn apply_guards(assignment: &mut Assignment, signals: &[Signal]) {
    for rule in GUARDS {
        if !signals.contains(&rule.signal) {
            continue;
        }
        match rule.unless.iter().find(|veto| assignment.is_true(**veto)) {
            Some(veto) => {
                tracing::debug!("{:?} ignored for {}: {} is set", rule.signal, rule.flag, veto);
            }
            None => assignment.assign(rule.flag, true),
        }
    }
}

/// Assign every alias the current value of its canonical flag.
pub fn apply_aliases(assignment: &mut Assignment) {
    for (alias, canonical) in ALIASES {
        let value = assignment.is_true(*canonical);
        assignment.assign(*alias, value);
    }
}
