//! Manual flag pre-declarations.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::flags::{Flag, FlagRegistry, Namespace};

use super::schema::BuildEnvironment;

/// Validated manual overrides, keyed by flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    values: BTreeMap<Flag, bool>,
}

impl Overrides {
    /// Validate raw overrides by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFlag` for any name outside the registry.
    pub fn parse(raw: &BTreeMap<String, bool>) -> Result<Self> {
        let values = raw
            .iter()
            .map(|(name, value)| Ok((FlagRegistry::lookup(name)?, *value)))
            .collect::<Result<_>>()?;
        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pre-declared value of a flag.
    pub fn get(&self, flag: Flag) -> Option<bool> {
        self.values.get(&flag).copied()
    }

    /// CPU flags pre-declared true.
    pub fn cpu_arches(&self) -> Vec<Flag> {
        self.in_namespace(Namespace::CpuArch)
            .filter(|(_, value)| *value)
            .map(|(flag, _)| flag)
            .collect()
    }

    /// Pre-declared OS flags with their values.
    pub fn os_flags(&self) -> impl Iterator<Item = (Flag, bool)> + '_ {
        self.in_namespace(Namespace::OsPlatform)
    }

    /// Pre-declared runtime ABI value for a flag.
    pub fn rt(&self, flag: Flag) -> Option<bool> {
        debug_assert_eq!(flag.namespace(), Namespace::RuntimeAbi);
        self.get(flag)
    }

    /// All pre-declared flags.
    pub fn iter(&self) -> impl Iterator<Item = (Flag, bool)> + '_ {
        self.values.iter().map(|(flag, value)| (*flag, *value))
    }

    fn in_namespace(&self, namespace: Namespace) -> impl Iterator<Item = (Flag, bool)> + '_ {
        self.iter().filter(move |(flag, _)| flag.namespace() == namespace)
    }
}

impl BuildEnvironment {
    /// Validated overrides.
    pub fn overrides(&self) -> Result<Overrides> {
        Overrides::parse(&self.overrides)
    }
}
