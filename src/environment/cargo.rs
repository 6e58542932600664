//! Build environment from Cargo's build-script variables.
//!
//! Cargo describes the target through `CARGO_CFG_TARGET_*` variables using
//! Rust's own spellings. These are mapped onto the spellings the target
//! query builtins use so that a build script resolves exactly like a C
//! compiler targeting the same triple.

use std::env::VarError;

use crate::error::{Result, TargetError};

use super::schema::BuildEnvironment;
use super::triple::TargetTriple;

const ARCH: &str = "CARGO_CFG_TARGET_ARCH";
const VENDOR: &str = "CARGO_CFG_TARGET_VENDOR";
const OS: &str = "CARGO_CFG_TARGET_OS";
const ENV: &str = "CARGO_CFG_TARGET_ENV";
const ABI: &str = "CARGO_CFG_TARGET_ABI";
const ENDIAN: &str = "CARGO_CFG_TARGET_ENDIAN";
const POINTER_WIDTH: &str = "CARGO_CFG_TARGET_POINTER_WIDTH";

impl BuildEnvironment {
    /// Describe the current build-script target.
    pub fn from_cargo_env() -> Result<Self> {
        Self::from_cargo_env_with(|key| std::env::var(key))
    }

    /// Describe a target with a custom env var lookup (for testing).
    pub fn from_cargo_env_with<F>(env_fn: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let required = |name: &str| {
            env_fn(name).map_err(|_| TargetError::MissingCargoVar {
                name: name.to_string(),
            })
        };
        let optional = |name: &str| env_fn(name).ok().filter(|v| !v.is_empty());

        let rust_arch = required(ARCH)?;
        let rust_os = required(OS)?;
        let endian = required(ENDIAN)?;
        let pointer_width = required(POINTER_WIDTH)?;
        let vendor = optional(VENDOR).unwrap_or_else(|| "unknown".to_string());

        let arch = query_arch(&rust_arch, &pointer_width);
        let (os, implied_env) = query_os(&rust_os);
        let environment = implied_env
            .map(str::to_string)
            .or_else(|| query_environment(optional(ABI), optional(ENV)));

        let triple = TargetTriple::new(arch, &vendor, os, environment.as_deref());
        tracing::debug!("Cargo target {} described as {}", rust_arch, triple);

        let byte_order = match endian.as_str() {
            "little" => "__ORDER_LITTLE_ENDIAN__",
            "big" => "__ORDER_BIG_ENDIAN__",
            // Passed through so resolution reports it.
            other => other,
        };

        let mut env = Self::new()
            .with_triple(triple)
            .with_macro("__BYTE_ORDER__", byte_order)
            .with_macro("__ORDER_LITTLE_ENDIAN__", "1234")
            .with_macro("__ORDER_BIG_ENDIAN__", "4321");
        if pointer_width == "64" {
            env = env.with_macro("__LP64__", "1");
        }
        if vendor == "apple" {
            env = env.with_macro("__MACH__", "1");
        }
        Ok(env)
    }
}

fn query_arch<'a>(rust_arch: &'a str, pointer_width: &str) -> &'a str {
    match rust_arch {
        // 64-bit instructions with 32-bit pointers (watchOS).
        "aarch64" if pointer_width == "32" => "arm64_32",
        "aarch64" => "arm64",
        "x86" => "i386",
        "powerpc" => "ppc",
        "powerpc64" => "ppc64",
        "s390x" => "s390",
        "sparc64" => "sparc",
        other => other,
    }
}

fn query_os(rust_os: &str) -> (&str, Option<&'static str>) {
    match rust_os {
        "visionos" => ("xros", None),
        "android" => ("linux", Some("android")),
        "cygwin" => ("linux", Some("cygwin")),
        other => (other, None),
    }
}

fn query_environment(abi: Option<String>, env: Option<String>) -> Option<String> {
    let normalize = |value: String| match value.as_str() {
        "sim" => "simulator".to_string(),
        _ => value,
    };
    // The ABI carries the Apple variants (`sim`, `macabi`); older toolchains
    // reported them through target_env.
    match (abi, env) {
        (Some(abi), _) if matches!(abi.as_str(), "sim" | "macabi") => Some(normalize(abi)),
        (_, Some(env)) => Some(normalize(env)),
        (abi, None) => abi.map(normalize),
    }
}

/// Print the `rerun-if-env-changed` lines for every variable read.
pub fn print_rerun_directives() {
    for name in [ARCH, VENDOR, OS, ENV, ABI, ENDIAN, POINTER_WIDTH] {
        println!("cargo:rerun-if-env-changed={}", name);
    }
}
