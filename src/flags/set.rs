//! Partial assignments and the resolved flag snapshot.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;

use super::registry::{Flag, FlagRegistry, Namespace};

/// A partial assignment built up while resolving.
///
/// Reassigning a flag to a different value is a defect in a strategy or rule
/// table and trips a debug assertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<Flag, bool>,
}

impl Assignment {
    /// Create an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a value to a flag.
    pub fn assign(&mut self, flag: Flag, value: bool) {
        let previous = self.values.insert(flag, value);
        debug_assert!(
            previous.is_none() || previous == Some(value),
            "{} reassigned from {:?} to {}",
            flag,
            previous,
            value
        );
    }

    /// Current value, if assigned.
    pub fn get(&self, flag: Flag) -> Option<bool> {
        self.values.get(&flag).copied()
    }

    /// Whether the flag is assigned and true.
    pub fn is_true(&self, flag: Flag) -> bool {
        self.get(flag) == Some(true)
    }

    /// Flags currently assigned true.
    pub fn true_flags(&self) -> impl Iterator<Item = Flag> + '_ {
        self.values
            .iter()
            .filter(|(_, value)| **value)
            .map(|(flag, _)| *flag)
    }

    /// Assign the registry default to every unassigned flag of a namespace.
    pub fn fill_defaults(&mut self, namespace: Namespace) {
        for flag in FlagRegistry::list_flags(namespace) {
            self.values
                .entry(flag)
                .or_insert_with(|| FlagRegistry::default_of(flag));
        }
    }

    /// Freeze into a complete [`FlagSet`].
    pub fn into_flag_set(mut self) -> FlagSet {
        for namespace in Namespace::ALL {
            self.fill_defaults(namespace);
        }
        FlagSet {
            values: self.values,
        }
    }
}

/// The complete, read-only set of resolved flags for one target.
///
/// Every registered flag has a value. Serializes as a map of wire name to
/// boolean in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagSet {
    values: BTreeMap<Flag, bool>,
}

impl FlagSet {
    /// Value of a flag.
    pub fn get(&self, flag: Flag) -> bool {
        self.values
            .get(&flag)
            .copied()
            .unwrap_or_else(|| FlagRegistry::default_of(flag))
    }

    /// Value of a flag by wire name.
    pub fn get_by_name(&self, name: &str) -> Result<bool> {
        Ok(self.get(FlagRegistry::lookup(name)?))
    }

    /// All flags with their values, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Flag, bool)> + '_ {
        self.values.iter().map(|(flag, value)| (*flag, *value))
    }

    /// Flags of one namespace with their values.
    pub fn namespace(&self, namespace: Namespace) -> impl Iterator<Item = (Flag, bool)> + '_ {
        self.iter().filter(move |(flag, _)| flag.namespace() == namespace)
    }

    /// Flags that are true.
    pub fn enabled(&self) -> Vec<Flag> {
        self.iter()
            .filter(|(_, value)| *value)
            .map(|(flag, _)| flag)
            .collect()
    }

    /// The single true CPU flag, if any.
    pub fn cpu_arch(&self) -> Option<Flag> {
        self.namespace(Namespace::CpuArch)
            .find(|(_, value)| *value)
            .map(|(flag, _)| flag)
    }
}

impl Serialize for FlagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (flag, value) in &self.values {
            map.serialize_entry(flag.name(), value)?;
        }
        map.end()
    }
}
