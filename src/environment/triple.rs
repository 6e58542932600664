//! Target triples as seen by the compiler's target query builtins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// OS names that may stand in the vendor position of a three-part triple,
/// as in `x86_64-linux-gnu` or `aarch64-linux-android21`.
const VENDORLESS_OS: &[&str] = &[
    "linux",
    "windows",
    "freebsd",
    "kfreebsd",
    "netbsd",
    "openbsd",
    "uefi",
    "wasi",
];

/// An `arch-vendor-os[-environment]` target triple.
///
/// Version suffixes on the OS and environment components (`ios14.0`,
/// `android24`) are kept for display but ignored by the predicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetTriple {
    arch: String,
    vendor: String,
    os: String,
    environment: Option<String>,
}

impl TargetTriple {
    /// Build a triple from its components.
    pub fn new(arch: &str, vendor: &str, os: &str, environment: Option<&str>) -> Self {
        Self {
            arch: arch.to_string(),
            vendor: vendor.to_string(),
            os: os.to_string(),
            environment: environment
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        }
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// OS name without its version suffix.
    pub fn os(&self) -> &str {
        strip_version(&self.os)
    }

    /// Environment name without its version suffix.
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref().map(strip_version)
    }

    /// `__is_target_vendor(name)`.
    pub fn is_vendor(&self, name: &str) -> bool {
        self.vendor == name
    }

    /// `__is_target_os(name)`. Accepts the usual spellings of the same OS.
    pub fn is_os(&self, name: &str) -> bool {
        let os = self.os();
        match name {
            "macos" => matches!(os, "macos" | "macosx" | "darwin"),
            "xros" => matches!(os, "xros" | "visionos"),
            _ => os == name,
        }
    }

    /// `__is_target_arch(name)`, compared literally.
    pub fn is_arch(&self, name: &str) -> bool {
        self.arch == name
    }

    /// `__is_target_environment(name)`.
    pub fn is_environment(&self, name: &str) -> bool {
        match (self.environment(), name) {
            (Some(env), "android") => env.starts_with("android"),
            (Some(env), "cygwin") => matches!(env, "cygwin" | "cygnus"),
            (Some(env), "simulator") => matches!(env, "simulator" | "sim"),
            (Some(env), _) => env == name,
            (None, _) => false,
        }
    }
}

fn strip_version(component: &str) -> &str {
    let end = component
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(component.len());
    // Nothing to strip down to.
    if end == 0 {
        component
    } else {
        &component[..end]
    }
}

impl FromStr for TargetTriple {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |message: &str| TargetError::InvalidTriple {
            triple: s.to_string(),
            message: message.to_string(),
        };

        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty component"));
        }

        match parts.as_slice() {
            // `wasm32-wasi` style: no vendor component.
            [arch, os] => Ok(Self::new(arch, "unknown", os, None)),
            [arch, os, env] if VENDORLESS_OS.contains(&strip_version(os)) => {
                Ok(Self::new(arch, "unknown", os, Some(env)))
            }
            [arch, vendor, os] => Ok(Self::new(arch, vendor, os, None)),
            [arch, vendor, os, env] => Ok(Self::new(arch, vendor, os, Some(env))),
            [_] => Err(invalid("expected at least arch-os")),
            _ => Err(invalid("too many components")),
        }
    }
}

impl TryFrom<String> for TargetTriple {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TargetTriple> for String {
    fn from(triple: TargetTriple) -> Self {
        triple.to_string()
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.vendor, self.os)?;
        if let Some(env) = &self.environment {
            write!(f, "-{}", env)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_components() {
        let triple: TargetTriple = "arm64-apple-ios14.0-macabi".parse().unwrap();
        assert_eq!(triple.arch(), "arm64");
        assert_eq!(triple.vendor(), "apple");
        assert_eq!(triple.os(), "ios");
        assert_eq!(triple.environment(), Some("macabi"));
    }

    #[test]
    fn parses_three_components() {
        let triple: TargetTriple = "x86_64-apple-macosx10.15".parse().unwrap();
        assert!(triple.is_os("macos"));
        assert_eq!(triple.environment(), None);
    }

    #[test]
    fn two_components_default_vendor() {
        let triple: TargetTriple = "wasm32-wasi".parse().unwrap();
        assert_eq!(triple.vendor(), "unknown");
        assert_eq!(triple.os(), "wasi");
    }

    #[test]
    fn rejects_malformed() {
        assert!("x86_64".parse::<TargetTriple>().is_err());
        assert!("a-b-c-d-e".parse::<TargetTriple>().is_err());
        assert!("x86_64--linux".parse::<TargetTriple>().is_err());
    }

    #[test]
    fn os_spellings() {
        let darwin: TargetTriple = "x86_64-apple-darwin".parse().unwrap();
        assert!(darwin.is_os("macos"));
        let vision: TargetTriple = "arm64-apple-visionos1.0".parse().unwrap();
        assert!(vision.is_os("xros"));
        assert!(!vision.is_os("ios"));
    }

    #[test]
    fn environment_predicates() {
        let android: TargetTriple = "armv7-pc-linux-androideabi".parse().unwrap();
        assert!(android.is_environment("android"));
        let cygwin: TargetTriple = "x86_64-pc-linux-cygnus".parse().unwrap();
        assert!(cygwin.is_environment("cygwin"));
        let plain: TargetTriple = "x86_64-pc-linux".parse().unwrap();
        assert!(!plain.is_environment("gnu"));
    }

    #[test]
    fn vendorless_three_components() {
        let gnu: TargetTriple = "x86_64-linux-gnu".parse().unwrap();
        assert!(gnu.is_vendor("unknown"));
        assert!(gnu.is_os("linux"));
        assert!(gnu.is_environment("gnu"));

        let ndk: TargetTriple = "aarch64-linux-android21".parse().unwrap();
        assert!(ndk.is_os("linux"));
        assert!(ndk.is_environment("android"));

        let apple: TargetTriple = "x86_64-apple-darwin".parse().unwrap();
        assert!(apple.is_vendor("apple"));
        assert_eq!(apple.environment(), None);
    }

    #[test]
    fn rust_sim_suffix_is_simulator() {
        let sim: TargetTriple = "aarch64-apple-ios-sim".parse().unwrap();
        assert!(sim.is_environment("simulator"));
        let device: TargetTriple = "aarch64-apple-ios".parse().unwrap();
        assert!(!device.is_environment("simulator"));
    }

    #[test]
    fn display_keeps_versions() {
        let triple: TargetTriple = "arm64-apple-ios17.2-simulator".parse().unwrap();
        assert_eq!(triple.to_string(), "arm64-apple-ios17.2-simulator");
    }

    #[test]
    fn arch_with_digits_is_not_stripped() {
        let triple: TargetTriple = "arm64_32-apple-watchos".parse().unwrap();
        assert!(triple.is_arch("arm64_32"));
    }
}
