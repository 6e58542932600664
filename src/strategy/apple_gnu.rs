//! Apple's GCC-derived compilers, identified by their predefined macros.

use crate::environment::{BuildEnvironment, Overrides};
use crate::error::{Result, TargetError};
use crate::flags::Flag;

use super::{Arch, Detection, Detector, RuntimeAbi, Strategy};

const TOOLCHAIN: &str = "Apple GNU C";

/// Any of these next to `__GNUC__` marks an Apple GNU compiler.
const APPLE_MARKERS: &[&str] = &["__APPLE_CPP__", "__APPLE_CC__", "__MACOS_CLASSIC__"];

/// CPU macros, checked in order.
const CPU_MACROS: &[(&str, Arch)] = &[
    ("__ppc__", Arch::Ppc),
    ("__ppc64__", Arch::Ppc64),
    ("__i386__", Arch::X86),
    ("__x86_64__", Arch::X86_64),
    ("__arm__", Arch::Arm),
    ("__arm64__", Arch::Arm64),
    ("__mips64__", Arch::Mips64),
    ("__mips__", Arch::Mips),
    ("__s390x__", Arch::S390x),
    ("__wasm32__", Arch::Wasm32),
];

/// Deployment target macros and the OS leaf each one selects.
const OS_MACROS: &[(&str, Flag)] = &[
    ("__ENVIRONMENT_IPHONE_OS_VERSION_MIN_REQUIRED__", Flag::OsIos),
    ("__ENVIRONMENT_TV_OS_VERSION_MIN_REQUIRED__", Flag::OsTv),
    ("__ENVIRONMENT_WATCH_OS_VERSION_MIN_REQUIRED__", Flag::OsWatch),
];

pub struct AppleGnuDetector;

impl Detector for AppleGnuDetector {
    fn is_applicable(&self, env: &BuildEnvironment, _overrides: &Overrides) -> bool {
        env.is_defined("__GNUC__") && APPLE_MARKERS.iter().any(|m| env.is_defined(m))
    }

    fn detect(&self, env: &BuildEnvironment, _overrides: &Overrides) -> Result<Detection> {
        let (cpu_macro, arch) = CPU_MACROS
            .iter()
            .find(|(name, _)| env.is_defined(name))
            .copied()
            .ok_or_else(|| TargetError::UnsupportedArchitecture {
                toolchain: TOOLCHAIN.to_string(),
                arch: format!(
                    "none of {} defined",
                    CPU_MACROS
                        .iter()
                        .map(|(name, _)| *name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })?;
        let abi = RuntimeAbi::from_gnu_macros(env, TOOLCHAIN)?;

        let os = OS_MACROS
            .iter()
            .find(|(name, _)| env.is_defined(name))
            .map(|(name, flag)| (*name, *flag));
        let (os_source, os_flag) = os.unwrap_or(("no deployment target macro", Flag::OsOsx));

        Ok(Detection::new(Strategy::AppleGnu, arch.flag(), abi)
            .with_os(os_flag)
            .with_detail(format!("{} -> {}", cpu_macro, arch.flag()))
            .with_detail(format!("{} -> {}", os_source, os_flag)))
    }
}
