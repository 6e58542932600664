//! Manual pre-declaration, for toolchains no other strategy recognizes.
//!
//! Applies when at least one `TARGET_CPU_*` flag is declared true, e.g.
//! `-D TARGET_CPU_MIPS=1 -D TARGET_OS_UNIX=1`. Declared values are pinned;
//! everything else is filled in from the architecture.

use crate::environment::{BuildEnvironment, Overrides};
use crate::error::{Result, TargetError};
use crate::flags::{hierarchy, Flag, FlagRegistry};

use super::{Arch, BinaryFormat, ByteOrder, Detection, Detector, RuntimeAbi, Strategy};

/// OS leaves assumed when no OS flag is declared true.
const DEFAULT_OS: &[Flag] = &[Flag::OsMac, Flag::OsOsx];

pub struct ManualOverrideDetector;

impl Detector for ManualOverrideDetector {
    fn is_applicable(&self, _env: &BuildEnvironment, overrides: &Overrides) -> bool {
        !overrides.cpu_arches().is_empty()
    }

    fn detect(&self, env: &BuildEnvironment, overrides: &Overrides) -> Result<Detection> {
        let cpu = single_cpu(overrides)?;
        check_os_pins(overrides)?;
        let abi = runtime_abi(env, overrides, cpu)?;

        let mut detection = Detection::new(Strategy::ManualOverride, cpu, abi)
            .with_detail(format!("{} declared", cpu));

        let mut any_os = false;
        for (flag, value) in overrides.os_flags() {
            any_os |= value;
            detection = detection
                .with_os_value(flag, value)
                .with_detail(format!("{}={} declared", flag, u8::from(value)));
        }

        if !any_os {
            for flag in DEFAULT_OS {
                let blocked = overrides.get(*flag) == Some(false)
                    || hierarchy::ancestors_of(*flag)
                        .into_iter()
                        .any(|ancestor| overrides.get(ancestor) == Some(false));
                if !blocked {
                    detection = detection
                        .with_os(*flag)
                        .with_detail(format!("{} assumed", flag));
                }
            }
        }

        Ok(detection)
    }
}

fn single_cpu(overrides: &Overrides) -> Result<Flag> {
    match overrides.cpu_arches().as_slice() {
        [cpu] => Ok(*cpu),
        [] => Err(TargetError::UnknownToolchain),
        many => Err(TargetError::ConflictingOverrides {
            message: format!(
                "more than one CPU declared: {}",
                many.iter()
                    .map(|flag| flag.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }),
    }
}

/// Reject pins the normalization rules would have to contradict.
fn check_os_pins(overrides: &Overrides) -> Result<()> {
    for (flag, value) in overrides.os_flags() {
        if let Some(derivation) = FlagRegistry::derivation(flag) {
            return Err(TargetError::ConflictingOverrides {
                message: format!("{} is derived ({:?}) and cannot be declared", flag, derivation),
            });
        }
        if !value {
            continue;
        }
        for ancestor in hierarchy::ancestors_of(flag) {
            if overrides.get(ancestor) == Some(false) {
                return Err(TargetError::ConflictingOverrides {
                    message: format!("{}=1 requires {}=1", flag, ancestor),
                });
            }
        }
    }
    Ok(())
}

fn runtime_abi(env: &BuildEnvironment, overrides: &Overrides, cpu: Flag) -> Result<RuntimeAbi> {
    // Alpha is the only CPU flag without a table entry: little endian, 64-bit.
    let (big_endian, is_64_bit) = Arch::from_flag(cpu)
        .map(|arch| (arch.is_big_endian(), arch.is_64_bit()))
        .unwrap_or((false, true));

    let big = pinned_pair(overrides, Flag::RtBigEndian, Flag::RtLittleEndian)?;
    let byte_order = if big.unwrap_or(big_endian) {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };

    let cfm = pinned_pair(overrides, Flag::RtMacCfm, Flag::RtMacMacho)?;
    let format = match cfm {
        Some(true) => BinaryFormat::Cfm,
        Some(false) => BinaryFormat::MachO,
        None => BinaryFormat::from_mach_macro(env),
    };

    Ok(RuntimeAbi {
        byte_order,
        pointer_64: overrides.rt(Flag::Rt64Bit).unwrap_or(is_64_bit),
        format,
    })
}

/// Value of `first` implied by pins on a complementary pair of flags.
fn pinned_pair(overrides: &Overrides, first: Flag, second: Flag) -> Result<Option<bool>> {
    match (overrides.rt(first), overrides.rt(second)) {
        (Some(a), Some(b)) if a == b => Err(TargetError::ConflictingOverrides {
            message: format!(
                "{} and {} are both declared {}",
                first,
                second,
                u8::from(a)
            ),
        }),
        (Some(a), _) => Ok(Some(a)),
        (None, Some(b)) => Ok(Some(!b)),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(env: BuildEnvironment) -> Result<Detection> {
        let overrides = env.overrides()?;
        ManualOverrideDetector.detect(&env, &overrides)
    }

    fn os_true(detection: &Detection) -> Vec<Flag> {
        detection
            .os
            .iter()
            .filter(|(_, value)| *value)
            .map(|(flag, _)| *flag)
            .collect()
    }

    #[test]
    fn needs_a_true_cpu() {
        let env = BuildEnvironment::new().with_override("TARGET_CPU_ARM", false);
        let overrides = env.overrides().unwrap();
        assert!(!ManualOverrideDetector.is_applicable(&env, &overrides));
    }

    #[test]
    fn assumes_macos_without_os_pins() {
        let detection =
            detect(BuildEnvironment::new().with_override("TARGET_CPU_MIPS", true)).unwrap();
        assert_eq!(detection.cpu, Flag::CpuMips);
        assert_eq!(os_true(&detection), vec![Flag::OsMac, Flag::OsOsx]);
        assert_eq!(detection.abi.byte_order, ByteOrder::Little);
        assert!(!detection.abi.pointer_64);
        assert_eq!(detection.abi.format, BinaryFormat::Cfm);
    }

    #[test]
    fn os_pins_replace_default() {
        let detection = detect(
            BuildEnvironment::new()
                .with_override("TARGET_CPU_MIPS", true)
                .with_override("TARGET_OS_UNIX", true),
        )
        .unwrap();
        assert_eq!(os_true(&detection), vec![Flag::OsUnix]);
    }

    #[test]
    fn false_pin_blocks_default() {
        let detection = detect(
            BuildEnvironment::new()
                .with_override("TARGET_CPU_X86_64", true)
                .with_override("TARGET_OS_OSX", false),
        )
        .unwrap();
        assert_eq!(os_true(&detection), vec![Flag::OsMac]);
        assert!(detection.os.contains(&(Flag::OsOsx, false)));
    }

    #[test]
    fn arch_defaults_for_runtime_abi() {
        let detection = detect(
            BuildEnvironment::new()
                .with_override("TARGET_CPU_PPC64", true)
                .with_macro("__MACH__", "1"),
        )
        .unwrap();
        assert_eq!(detection.abi.byte_order, ByteOrder::Big);
        assert!(detection.abi.pointer_64);
        assert_eq!(detection.abi.format, BinaryFormat::MachO);
    }

    #[test]
    fn runtime_pins_win() {
        let detection = detect(
            BuildEnvironment::new()
                .with_override("TARGET_CPU_PPC", true)
                .with_override("TARGET_RT_LITTLE_ENDIAN", true)
                .with_override("TARGET_RT_64_BIT", true)
                .with_override("TARGET_RT_MAC_MACHO", true),
        )
        .unwrap();
        assert_eq!(detection.abi.byte_order, ByteOrder::Little);
        assert!(detection.abi.pointer_64);
        assert_eq!(detection.abi.format, BinaryFormat::MachO);
    }

    #[test]
    fn alpha_is_accepted() {
        let detection =
            detect(BuildEnvironment::new().with_override("TARGET_CPU_ALPHA", true)).unwrap();
        assert_eq!(detection.cpu, Flag::CpuAlpha);
        assert!(detection.abi.pointer_64);
    }

    #[test]
    fn two_cpus_conflict() {
        let err = detect(
            BuildEnvironment::new()
                .with_override("TARGET_CPU_ARM", true)
                .with_override("TARGET_CPU_X86", true),
        )
        .unwrap_err();
        assert!(matches!(err, TargetError::ConflictingOverrides { .. }));
        assert!(err.to_string().contains("TARGET_CPU_ARM"));
    }

    #[test]
    fn contradictory_byte_order_conflicts() {
        let err = detect(
            BuildEnvironment::new()
                .with_override("TARGET_CPU_ARM", true)
                .with_override("TARGET_RT_LITTLE_ENDIAN", true)
                .with_override("TARGET_RT_BIG_ENDIAN", true),
        )
        .unwrap_err();
        assert!(matches!(err, TargetError::ConflictingOverrides { .. }));
    }

    #[test]
    fn child_without_parent_conflicts() {
        let err = detect(
            BuildEnvironment::new()
                .with_override("TARGET_CPU_ARM64", true)
                .with_override("TARGET_OS_IOS", true)
                .with_override("TARGET_OS_MAC", false),
        )
        .unwrap_err();
        assert!(err.to_string().contains("TARGET_OS_IOS=1 requires TARGET_OS_MAC=1"));
    }

    #[test]
    fn derived_flags_cannot_be_pinned() {
        for name in ["TARGET_OS_NANO", "TARGET_OS_SIMULATOR"] {
            let err = detect(
                BuildEnvironment::new()
                    .with_override("TARGET_CPU_ARM64", true)
                    .with_override(name, true),
            )
            .unwrap_err();
            assert!(matches!(err, TargetError::ConflictingOverrides { .. }));
        }
    }
}
