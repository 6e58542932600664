//! Runtime ABI characteristics.

use serde::Serialize;

use crate::environment::BuildEnvironment;
use crate::error::{Result, TargetError};
use crate::flags::Flag;

/// Integer byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Read `__BYTE_ORDER__`.
    ///
    /// The value may name one of the `__ORDER_*_ENDIAN__` macros, carry their
    /// numeric value, or match the value those macros are defined to.
    pub fn from_macros(env: &BuildEnvironment, toolchain: &str) -> Result<Self> {
        let unrecognized = |value: &str| TargetError::UnrecognizedByteOrder {
            toolchain: toolchain.to_string(),
            value: value.to_string(),
        };

        let value = env
            .macro_value("__BYTE_ORDER__")
            .map(str::trim)
            .ok_or_else(|| unrecognized("__BYTE_ORDER__ is not defined"))?;

        let matches_order = |name: &str, number: &str| {
            value == name
                || value == number
                || env
                    .macro_value(name)
                    .is_some_and(|defined| !value.is_empty() && defined.trim() == value)
        };

        if matches_order("__ORDER_LITTLE_ENDIAN__", "1234") {
            Ok(Self::Little)
        } else if matches_order("__ORDER_BIG_ENDIAN__", "4321") {
            Ok(Self::Big)
        } else {
            Err(unrecognized(value))
        }
    }
}

/// Binary interface flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryFormat {
    MachO,
    /// Code Fragment Manager (classic Mac OS).
    Cfm,
}

impl BinaryFormat {
    /// Mach-O when `__MACH__` is defined, CFM otherwise.
    pub fn from_mach_macro(env: &BuildEnvironment) -> Self {
        if env.is_defined("__MACH__") {
            Self::MachO
        } else {
            Self::Cfm
        }
    }
}

/// Everything the `TARGET_RT_*` flags describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuntimeAbi {
    pub byte_order: ByteOrder,
    pub pointer_64: bool,
    pub format: BinaryFormat,
}

impl RuntimeAbi {
    /// Derive the ABI from the clang/GNU predefined macros.
    pub fn from_gnu_macros(env: &BuildEnvironment, toolchain: &str) -> Result<Self> {
        let byte_order = ByteOrder::from_macros(env, toolchain)?;
        let format = if env.is_defined("__ppc__") && env.is_defined("__MACOS_CLASSIC__") {
            BinaryFormat::Cfm
        } else {
            BinaryFormat::MachO
        };

        Ok(Self {
            byte_order,
            pointer_64: env.is_truthy("__LP64__"),
            format,
        })
    }

    /// Values for every `TARGET_RT_*` flag.
    pub fn flags(&self) -> [(Flag, bool); 5] {
        [
            (Flag::RtLittleEndian, self.byte_order == ByteOrder::Little),
            (Flag::RtBigEndian, self.byte_order == ByteOrder::Big),
            (Flag::Rt64Bit, self.pointer_64),
            (Flag::RtMacCfm, self.format == BinaryFormat::Cfm),
            (Flag::RtMacMacho, self.format == BinaryFormat::MachO),
        ]
    }
}
