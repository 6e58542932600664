//! Fine-grained detection through the `__is_target_*` builtins.

use crate::environment::{BuildEnvironment, Overrides, TargetTriple};
use crate::error::{Result, TargetError};
use crate::flags::{Flag, Signal};

use super::{Arch, Detection, Detector, RuntimeAbi, Strategy};

const TOOLCHAIN: &str = "target query";

/// Apple OS predicates and the leaf flag each one asserts.
const APPLE_OS: &[(&str, Flag)] = &[
    ("driverkit", Flag::OsDriverKit),
    ("ios", Flag::OsIos),
    ("macos", Flag::OsOsx),
    ("bridgeos", Flag::OsBridge),
    ("tvos", Flag::OsTv),
    ("watchos", Flag::OsWatch),
    ("xros", Flag::OsVision),
];

const APPLE_ENVIRONMENT: &[(&str, Flag)] = &[
    ("exclavecore", Flag::OsExclaveCore),
    ("exclavekit", Flag::OsExclaveKit),
];

const BSD_OS: &[&str] = &["freebsd", "kfreebsd", "netbsd", "openbsd"];

/// Vendors whose triples use the non-Apple OS table.
const GENERIC_VENDORS: &[&str] = &["pc", "unknown"];

pub struct TargetQueryDetector;

impl Detector for TargetQueryDetector {
    fn is_applicable(&self, env: &BuildEnvironment, _overrides: &Overrides) -> bool {
        env.query.as_ref().is_some_and(|query| query.is_complete())
    }

    fn detect(&self, env: &BuildEnvironment, _overrides: &Overrides) -> Result<Detection> {
        let Some(query) = env.query.as_ref() else {
            return Err(TargetError::UnknownToolchain);
        };
        let triple = &query.triple;

        let arch =
            Arch::from_query_name(triple.arch()).ok_or_else(|| TargetError::UnsupportedArchitecture {
                toolchain: TOOLCHAIN.to_string(),
                arch: triple.arch().to_string(),
            })?;
        let abi = RuntimeAbi::from_gnu_macros(env, TOOLCHAIN)?;

        let detection = Detection::new(Strategy::TargetQuery, arch.flag(), abi)
            .with_detail(format!("triple {}", triple))
            .with_detail(format!("arch {} -> {}", triple.arch(), arch.flag()));

        let detection = if triple.is_vendor("apple") {
            detect_apple_os(triple, detection)
        } else if GENERIC_VENDORS.iter().any(|vendor| triple.is_vendor(vendor)) {
            detect_generic_os(triple, arch, detection)
        } else {
            tracing::debug!("Vendor {} has no OS table", triple.vendor());
            detection.with_detail(format!("vendor {} not recognized", triple.vendor()))
        };

        if detection.os.is_empty() {
            tracing::debug!("No OS flag matches {}", triple);
        }
        Ok(detection)
    }
}

fn detect_apple_os(triple: &TargetTriple, mut detection: Detection) -> Detection {
    if triple.is_os("ios") && triple.is_environment("macabi") {
        detection = detection
            .with_os(Flag::OsMacCatalyst)
            .with_detail("os ios with environment macabi");
    }

    for (os, flag) in APPLE_OS {
        if triple.is_os(os) {
            detection = detection
                .with_os(*flag)
                .with_detail(format!("os {} -> {}", os, flag));
        }
    }

    for (environment, flag) in APPLE_ENVIRONMENT {
        if triple.is_environment(environment) {
            detection = detection
                .with_os(*flag)
                .with_detail(format!("environment {} -> {}", environment, flag));
        }
    }

    if triple.is_environment("simulator") {
        detection = detection
            .with_signal(Signal::SimulatorEnvironment)
            .with_detail("environment simulator");
    }

    detection
}

fn detect_generic_os(triple: &TargetTriple, arch: Arch, mut detection: Detection) -> Detection {
    if triple.is_os("linux") {
        detection = detection.with_os(Flag::OsLinux).with_detail("os linux");
        if triple.is_environment("android") {
            detection = detection.with_os(Flag::OsAndroid);
        }
        if triple.is_environment("cygwin") {
            detection = detection.with_os(Flag::OsCygwin);
        }
    }

    if triple.is_os("windows") || triple.is_os("uefi") {
        detection = detection
            .with_os(Flag::OsWindows)
            .with_detail(format!("os {}", triple.os()));
        if triple.is_os("uefi") {
            detection = detection.with_os(Flag::OsEfi);
        }
        if arch == Arch::X86 {
            detection = detection.with_os(Flag::OsWin32);
        }
    }

    if BSD_OS.iter().any(|os| triple.is_os(os)) {
        detection = detection
            .with_os(Flag::OsBsd)
            .with_detail(format!("os {} -> {}", triple.os(), Flag::OsBsd));
    }

    detection
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(triple: &str) -> Result<Detection> {
        let env = BuildEnvironment::new()
            .with_triple(triple.parse().unwrap())
            .with_macro("__BYTE_ORDER__", "__ORDER_LITTLE_ENDIAN__")
            .with_macro("__LP64__", "1");
        TargetQueryDetector.detect(&env, &Overrides::default())
    }

    fn os_flags(detection: &Detection) -> Vec<Flag> {
        detection
            .os
            .iter()
            .filter(|(_, value)| *value)
            .map(|(flag, _)| *flag)
            .collect()
    }

    #[test]
    fn needs_every_builtin() {
        let yaml = "query:\n  triple: x86_64-apple-macos\n  builtins: [__is_target_os, __is_target_arch]\n";
        let env: BuildEnvironment = serde_yaml::from_str(yaml).unwrap();
        assert!(!TargetQueryDetector.is_applicable(&env, &Overrides::default()));
    }

    #[test]
    fn catalyst() {
        let detection = detect("arm64-apple-ios14.0-macabi").unwrap();
        assert_eq!(os_flags(&detection), vec![Flag::OsMacCatalyst, Flag::OsIos]);
        assert_eq!(detection.cpu, Flag::CpuArm64);
    }

    #[test]
    fn ios_simulator_raises_signal() {
        let detection = detect("x86_64-apple-ios17.0-simulator").unwrap();
        assert_eq!(os_flags(&detection), vec![Flag::OsIos]);
        assert_eq!(detection.signals, vec![Signal::SimulatorEnvironment]);
    }

    #[test]
    fn macos_simulator_still_raises_signal() {
        // The guard rule, not the strategy, drops it.
        let detection = detect("arm64-apple-macos-simulator").unwrap();
        assert_eq!(os_flags(&detection), vec![Flag::OsOsx]);
        assert_eq!(detection.signals, vec![Signal::SimulatorEnvironment]);
    }

    #[test]
    fn apple_leaves() {
        assert_eq!(os_flags(&detect("arm64-apple-tvos").unwrap()), vec![Flag::OsTv]);
        assert_eq!(
            os_flags(&detect("arm64_32-apple-watchos").unwrap()),
            vec![Flag::OsWatch]
        );
        assert_eq!(
            os_flags(&detect("arm64-apple-xros1.0").unwrap()),
            vec![Flag::OsVision]
        );
        assert_eq!(
            os_flags(&detect("arm64-apple-bridgeos").unwrap()),
            vec![Flag::OsBridge]
        );
        assert_eq!(
            os_flags(&detect("arm64-apple-driverkit").unwrap()),
            vec![Flag::OsDriverKit]
        );
    }

    #[test]
    fn exclave_environments() {
        let detection = detect("arm64-apple-ios-exclavekit").unwrap();
        assert_eq!(os_flags(&detection), vec![Flag::OsIos, Flag::OsExclaveKit]);
    }

    #[test]
    fn linux_variants() {
        assert_eq!(
            os_flags(&detect("x86_64-pc-linux-gnu").unwrap()),
            vec![Flag::OsLinux]
        );
        assert_eq!(
            os_flags(&detect("arm-unknown-linux-androideabi").unwrap()),
            vec![Flag::OsLinux, Flag::OsAndroid]
        );
        assert_eq!(
            os_flags(&detect("x86_64-pc-linux-cygnus").unwrap()),
            vec![Flag::OsLinux, Flag::OsCygwin]
        );
    }

    #[test]
    fn windows_variants() {
        assert_eq!(
            os_flags(&detect("x86_64-pc-windows-msvc").unwrap()),
            vec![Flag::OsWindows]
        );
        assert_eq!(
            os_flags(&detect("i686-pc-windows-msvc").unwrap()),
            vec![Flag::OsWindows, Flag::OsWin32]
        );
        assert_eq!(
            os_flags(&detect("i386-unknown-uefi").unwrap()),
            vec![Flag::OsWindows, Flag::OsEfi, Flag::OsWin32]
        );
    }

    #[test]
    fn bsd_family() {
        for triple in [
            "x86_64-unknown-freebsd14",
            "x86_64-pc-kfreebsd",
            "arm64-unknown-netbsd",
            "x86_64-unknown-openbsd",
        ] {
            assert_eq!(os_flags(&detect(triple).unwrap()), vec![Flag::OsBsd]);
        }
    }

    #[test]
    fn unmatched_os_is_not_an_error() {
        let detection = detect("x86_64-unknown-haiku").unwrap();
        assert!(detection.os.is_empty());
        assert_eq!(detection.cpu, Flag::CpuX86_64);
    }

    #[test]
    fn apple_table_ignores_other_vendors() {
        let detection = detect("arm64-nintendo-ios").unwrap();
        assert!(detection.os.is_empty());
    }

    #[test]
    fn unknown_arch_is_fatal() {
        let err = detect("riscv64-unknown-linux-gnu").unwrap_err();
        assert!(matches!(
            err,
            TargetError::UnsupportedArchitecture { arch, .. } if arch == "riscv64"
        ));
    }

    #[test]
    fn byte_order_is_required() {
        let env = BuildEnvironment::new().with_triple("x86_64-pc-linux-gnu".parse().unwrap());
        let err = TargetQueryDetector
            .detect(&env, &Overrides::default())
            .unwrap_err();
        assert!(matches!(err, TargetError::UnrecognizedByteOrder { .. }));
    }
}
