//! Metrowerks CodeWarrior.
//!
//! Only ever targeted classic Mac OS and early Mac OS X, so the OS is fixed
//! and the runtime ABI follows from the CPU.

use crate::environment::{BuildEnvironment, Overrides};
use crate::error::{Result, TargetError};
use crate::flags::Flag;

use super::{Arch, BinaryFormat, ByteOrder, Detection, Detector, RuntimeAbi, Strategy};

pub struct MetrowerksDetector;

impl Detector for MetrowerksDetector {
    fn is_applicable(&self, env: &BuildEnvironment, _overrides: &Overrides) -> bool {
        env.is_defined("__MWERKS__")
    }

    fn detect(&self, env: &BuildEnvironment, _overrides: &Overrides) -> Result<Detection> {
        let (arch, byte_order) = if env.is_defined("__POWERPC__") {
            (Arch::Ppc, ByteOrder::Big)
        } else if env.is_defined("__INTEL__") {
            (Arch::X86, ByteOrder::Little)
        } else {
            return Err(TargetError::UnsupportedArchitecture {
                toolchain: Strategy::Metrowerks.to_string(),
                arch: "none of __POWERPC__, __INTEL__ defined".to_string(),
            });
        };

        let format = BinaryFormat::from_mach_macro(env);
        let abi = RuntimeAbi {
            byte_order,
            pointer_64: false,
            format,
        };

        Ok(Detection::new(Strategy::Metrowerks, arch.flag(), abi)
            .with_os(Flag::OsMac)
            .with_detail(format!("CPU {}", arch.flag()))
            .with_detail(match format {
                BinaryFormat::MachO => "__MACH__ defined: Mach-O",
                BinaryFormat::Cfm => "__MACH__ undefined: CFM",
            }))
    }
}
