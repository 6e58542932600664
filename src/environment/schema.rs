//! Build environment description.
//!
//! A [`BuildEnvironment`] is everything the toolchain exposes about the
//! target: target query builtins, predefined macros, and the manual
//! overrides passed on the command line.
//!
//! ```yaml
//! query:
//!   triple: arm64-apple-ios14.0-macabi
//! macros:
//!   __clang__: 1
//!   __BYTE_ORDER__: __ORDER_LITTLE_ENDIAN__
//!   __LP64__: 1
//! overrides:
//!   TARGET_CPU_MIPS: 1
//! ```

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::triple::TargetTriple;

/// Target query builtin exposed by the compiler.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum QueryBuiltin {
    #[serde(rename = "__is_target_vendor")]
    Vendor,
    #[serde(rename = "__is_target_os")]
    Os,
    #[serde(rename = "__is_target_arch")]
    Arch,
    #[serde(rename = "__is_target_environment")]
    Environment,
}

impl QueryBuiltin {
    /// All four query builtins.
    pub fn all() -> BTreeSet<QueryBuiltin> {
        [Self::Vendor, Self::Os, Self::Arch, Self::Environment]
            .into_iter()
            .collect()
    }
}

/// Target query capability: the triple the builtins evaluate against and
/// which builtins the compiler has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TargetQuery {
    /// Triple the `__is_target_*` builtins answer for.
    #[schemars(with = "String")]
    pub triple: TargetTriple,

    /// Builtins available. Defaults to all four.
    #[serde(default = "QueryBuiltin::all")]
    pub builtins: BTreeSet<QueryBuiltin>,
}

impl TargetQuery {
    /// A query exposing all four builtins.
    pub fn new(triple: TargetTriple) -> Self {
        Self {
            triple,
            builtins: QueryBuiltin::all(),
        }
    }

    /// Whether every builtin is available.
    pub fn is_complete(&self) -> bool {
        self.builtins.len() == QueryBuiltin::all().len()
    }
}

/// Everything the build toolchain exposes about the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BuildEnvironment {
    /// Target query builtins, when the compiler has them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<TargetQuery>,

    /// Predefined compiler macros. Values may be strings, numbers, booleans
    /// or empty.
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_macros"
    )]
    #[schemars(with = "BTreeMap<String, Option<MacroValue>>")]
    pub macros: BTreeMap<String, String>,

    /// Manual pre-declarations by flag name.
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_overrides"
    )]
    #[schemars(with = "BTreeMap<String, MacroValue>")]
    pub overrides: BTreeMap<String, bool>,
}

impl BuildEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target query over the given triple.
    pub fn with_triple(mut self, triple: TargetTriple) -> Self {
        self.query = Some(TargetQuery::new(triple));
        self
    }

    /// Define a macro.
    pub fn with_macro(mut self, name: &str, value: &str) -> Self {
        self.macros.insert(name.to_string(), value.to_string());
        self
    }

    /// Pre-declare a flag value by name.
    pub fn with_override(mut self, name: &str, value: bool) -> Self {
        self.overrides.insert(name.to_string(), value);
        self
    }

    /// `defined(NAME)`.
    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Raw macro value.
    pub fn macro_value(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(String::as_str)
    }

    /// `#if NAME`: defined with a non-zero value. An empty definition counts
    /// as zero.
    pub fn is_truthy(&self, name: &str) -> bool {
        match self.macro_value(name).map(str::trim) {
            None | Some("") => false,
            Some(value) => value.parse::<i64>().map(|n| n != 0).unwrap_or(true),
        }
    }
}

/// Scalar accepted for macro and override values.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MacroValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl MacroValue {
    fn into_macro_string(self) -> String {
        match self {
            Self::Bool(true) => "1".to_string(),
            Self::Bool(false) => "0".to_string(),
            Self::Int(n) => n.to_string(),
            Self::Str(s) => s,
        }
    }

    fn truthiness(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(n) => Some(*n != 0),
            Self::Str(s) => parse_truthy(s),
        }
    }
}

/// Parse `1`/`0`/`true`/`false`/`yes`/`no`.
pub fn parse_truthy(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn deserialize_macros<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<MacroValue>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let value = value.map(MacroValue::into_macro_string).unwrap_or_default();
            (name, value)
        })
        .collect())
}

fn deserialize_overrides<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, MacroValue>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, value)| match value.truthiness() {
            Some(b) => Ok((name, b)),
            None => Err(serde::de::Error::custom(format!(
                "override {} must be 0/1 or true/false",
                name
            ))),
        })
        .collect()
}
