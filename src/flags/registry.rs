//! The closed vocabulary of target flags.
//!
//! Every flag belongs to exactly one [`Namespace`] and defaults to `false`.
//! The textual names returned by [`Flag::name`] are the contract with
//! downstream consumers: renaming one is a breaking change.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{Result, TargetError};

use super::hierarchy::{self, Derivation};

/// Flag namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Instruction set being generated (`TARGET_CPU_*`). One-hot.
    CpuArch,
    /// Operating system family and variant (`TARGET_OS_*`). Hierarchical.
    OsPlatform,
    /// Runtime ABI characteristics (`TARGET_RT_*`).
    RuntimeAbi,
}

impl Namespace {
    /// All namespaces in registry order.
    pub const ALL: [Namespace; 3] = [Self::CpuArch, Self::OsPlatform, Self::RuntimeAbi];

    /// Short name used on the command line.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::CpuArch => "cpu",
            Self::OsPlatform => "os",
            Self::RuntimeAbi => "rt",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CpuArch => write!(f, "CPU architecture"),
            Self::OsPlatform => write!(f, "OS platform"),
            Self::RuntimeAbi => write!(f, "runtime ABI"),
        }
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" | "cpu_arch" | "arch" => Ok(Self::CpuArch),
            "os" | "os_platform" | "platform" => Ok(Self::OsPlatform),
            "rt" | "runtime" | "runtime_abi" | "abi" => Ok(Self::RuntimeAbi),
            _ => Err(format!("unknown namespace: {}", s)),
        }
    }
}

/// A named boolean fact about the target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    CpuPpc,
    CpuPpc64,
    Cpu68k,
    CpuX86,
    CpuX86_64,
    CpuArm,
    CpuArm64,
    CpuMips,
    CpuMips64,
    CpuSparc,
    CpuS390x,
    CpuAlpha,
    CpuWasm32,

    OsMac,
    OsOsx,
    OsIphone,
    OsIos,
    OsTv,
    OsWatch,
    OsVision,
    OsBridge,
    OsMacCatalyst,
    OsUikitForMac,
    OsDriverKit,
    OsExclaveCore,
    OsExclaveKit,
    OsSimulator,
    OsEmbedded,
    OsNano,
    IphoneSimulator,
    OsWindows,
    OsWin32,
    OsEfi,
    OsUnix,
    OsLinux,
    OsAndroid,
    OsCygwin,
    OsWasi,
    OsBsd,

    RtLittleEndian,
    RtBigEndian,
    Rt64Bit,
    RtMacCfm,
    RtMacMacho,
}

impl Flag {
    /// Every registered flag, grouped by namespace.
    pub const ALL: [Flag; 44] = [
        Flag::CpuPpc,
        Flag::CpuPpc64,
        Flag::Cpu68k,
        Flag::CpuX86,
        Flag::CpuX86_64,
        Flag::CpuArm,
        Flag::CpuArm64,
        Flag::CpuMips,
        Flag::CpuMips64,
        Flag::CpuSparc,
        Flag::CpuS390x,
        Flag::CpuAlpha,
        Flag::CpuWasm32,
        Flag::OsMac,
        Flag::OsOsx,
        Flag::OsIphone,
        Flag::OsIos,
        Flag::OsTv,
        Flag::OsWatch,
        Flag::OsVision,
        Flag::OsBridge,
        Flag::OsMacCatalyst,
        Flag::OsUikitForMac,
        Flag::OsDriverKit,
        Flag::OsExclaveCore,
        Flag::OsExclaveKit,
        Flag::OsSimulator,
        Flag::OsEmbedded,
        Flag::OsNano,
        Flag::IphoneSimulator,
        Flag::OsWindows,
        Flag::OsWin32,
        Flag::OsEfi,
        Flag::OsUnix,
        Flag::OsLinux,
        Flag::OsAndroid,
        Flag::OsCygwin,
        Flag::OsWasi,
        Flag::OsBsd,
        Flag::RtLittleEndian,
        Flag::RtBigEndian,
        Flag::Rt64Bit,
        Flag::RtMacCfm,
        Flag::RtMacMacho,
    ];

    /// The flag's wire name, e.g. `TARGET_OS_MAC`.
    pub fn name(self) -> &'static str {
        match self {
            Flag::CpuPpc => "TARGET_CPU_PPC",
            Flag::CpuPpc64 => "TARGET_CPU_PPC64",
            Flag::Cpu68k => "TARGET_CPU_68K",
            Flag::CpuX86 => "TARGET_CPU_X86",
            Flag::CpuX86_64 => "TARGET_CPU_X86_64",
            Flag::CpuArm => "TARGET_CPU_ARM",
            Flag::CpuArm64 => "TARGET_CPU_ARM64",
            Flag::CpuMips => "TARGET_CPU_MIPS",
            Flag::CpuMips64 => "TARGET_CPU_MIPS64",
            Flag::CpuSparc => "TARGET_CPU_SPARC",
            Flag::CpuS390x => "TARGET_CPU_S390X",
            Flag::CpuAlpha => "TARGET_CPU_ALPHA",
            Flag::CpuWasm32 => "TARGET_CPU_WASM32",
            Flag::OsMac => "TARGET_OS_MAC",
            Flag::OsOsx => "TARGET_OS_OSX",
            Flag::OsIphone => "TARGET_OS_IPHONE",
            Flag::OsIos => "TARGET_OS_IOS",
            Flag::OsTv => "TARGET_OS_TV",
            Flag::OsWatch => "TARGET_OS_WATCH",
            Flag::OsVision => "TARGET_OS_VISION",
            Flag::OsBridge => "TARGET_OS_BRIDGE",
            Flag::OsMacCatalyst => "TARGET_OS_MACCATALYST",
            Flag::OsUikitForMac => "TARGET_OS_UIKITFORMAC",
            Flag::OsDriverKit => "TARGET_OS_DRIVERKIT",
            Flag::OsExclaveCore => "TARGET_OS_EXCLAVECORE",
            Flag::OsExclaveKit => "TARGET_OS_EXCLAVEKIT",
            Flag::OsSimulator => "TARGET_OS_SIMULATOR",
            Flag::OsEmbedded => "TARGET_OS_EMBEDDED",
            Flag::OsNano => "TARGET_OS_NANO",
            Flag::IphoneSimulator => "TARGET_IPHONE_SIMULATOR",
            Flag::OsWindows => "TARGET_OS_WINDOWS",
            Flag::OsWin32 => "TARGET_OS_WIN32",
            Flag::OsEfi => "TARGET_OS_EFI",
            Flag::OsUnix => "TARGET_OS_UNIX",
            Flag::OsLinux => "TARGET_OS_LINUX",
            Flag::OsAndroid => "TARGET_OS_ANDROID",
            Flag::OsCygwin => "TARGET_OS_CYGWIN",
            Flag::OsWasi => "TARGET_OS_WASI",
            Flag::OsBsd => "TARGET_OS_BSD",
            Flag::RtLittleEndian => "TARGET_RT_LITTLE_ENDIAN",
            Flag::RtBigEndian => "TARGET_RT_BIG_ENDIAN",
            Flag::Rt64Bit => "TARGET_RT_64_BIT",
            Flag::RtMacCfm => "TARGET_RT_MAC_CFM",
            Flag::RtMacMacho => "TARGET_RT_MAC_MACHO",
        }
    }

    /// The namespace this flag belongs to.
    pub fn namespace(self) -> Namespace {
        use Flag::*;
        match self {
            CpuPpc | CpuPpc64 | Cpu68k | CpuX86 | CpuX86_64 | CpuArm | CpuArm64 | CpuMips
            | CpuMips64 | CpuSparc | CpuS390x | CpuAlpha | CpuWasm32 => Namespace::CpuArch,
            RtLittleEndian | RtBigEndian | Rt64Bit | RtMacCfm | RtMacMacho => {
                Namespace::RuntimeAbi
            }
            _ => Namespace::OsPlatform,
        }
    }

    /// One-line description of what the flag claims when true.
    pub fn description(self) -> &'static str {
        match self {
            Flag::CpuPpc => "PowerPC instructions for 32-bit mode",
            Flag::CpuPpc64 => "PowerPC instructions for 64-bit mode",
            Flag::Cpu68k => "680x0 instructions",
            Flag::CpuX86 => "x86 instructions for 32-bit mode",
            Flag::CpuX86_64 => "x86 instructions for 64-bit mode",
            Flag::CpuArm => "ARM instructions for 32-bit mode",
            Flag::CpuArm64 => "ARM instructions for 64-bit mode",
            Flag::CpuMips => "MIPS instructions for 32-bit mode",
            Flag::CpuMips64 => "MIPS instructions for 64-bit mode",
            Flag::CpuSparc => "SPARC instructions",
            Flag::CpuS390x => "IBM z/Architecture instructions",
            Flag::CpuAlpha => "DEC Alpha instructions",
            Flag::CpuWasm32 => "WebAssembly instructions for 32-bit mode",
            Flag::OsMac => "any Darwin based OS (macOS, iOS, etc)",
            Flag::OsOsx => "macOS",
            Flag::OsIphone => "any embedded Apple OS",
            Flag::OsIos => "iOS/iPadOS (or variants)",
            Flag::OsTv => "tvOS",
            Flag::OsWatch => "watchOS",
            Flag::OsVision => "visionOS",
            Flag::OsBridge => "bridgeOS",
            Flag::OsMacCatalyst => "iOS code running on macOS through Mac Catalyst",
            Flag::OsUikitForMac => "deprecated name for TARGET_OS_MACCATALYST",
            Flag::OsDriverKit => "the DriverKit runtime",
            Flag::OsExclaveCore => "the ExclaveCore runtime",
            Flag::OsExclaveKit => "the ExclaveKit runtime",
            Flag::OsSimulator => "any simulator platform (iPhone, watchOS, ...)",
            Flag::OsEmbedded => "deprecated name for TARGET_OS_IPHONE",
            Flag::OsNano => "deprecated name for TARGET_OS_WATCH",
            Flag::IphoneSimulator => "deprecated name for TARGET_OS_SIMULATOR",
            Flag::OsWindows => "a Windows NT based OS",
            Flag::OsWin32 => "a 32-bit Windows environment",
            Flag::OsEfi => "a UEFI environment",
            Flag::OsUnix => "a non-Darwin UNIX OS",
            Flag::OsLinux => "a Linux system, GNU or musl",
            Flag::OsAndroid => "an Android based OS",
            Flag::OsCygwin => "a Cygwin environment",
            Flag::OsWasi => "a WebAssembly System Interface environment",
            Flag::OsBsd => "a BSD based OS that is not Darwin",
            Flag::RtLittleEndian => "little endian integers",
            Flag::RtBigEndian => "big endian integers",
            Flag::Rt64Bit => "64-bit pointers",
            Flag::RtMacCfm => "CFM68K or PowerPC CFM (TVectors) runtime",
            Flag::RtMacMacho => "Mach-O/dyld runtime",
        }
    }

    /// Lower-case name suitable for a `rustc-cfg` key.
    pub fn cfg_name(self) -> String {
        self.name().to_lowercase()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flag {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self> {
        Flag::ALL
            .iter()
            .copied()
            .find(|flag| flag.name() == s)
            .ok_or_else(|| TargetError::UnknownFlag {
                name: s.to_string(),
            })
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Read-only queries over the flag vocabulary.
pub struct FlagRegistry;

impl FlagRegistry {
    /// Flags of one namespace, in registry order.
    pub fn list_flags(namespace: Namespace) -> Vec<Flag> {
        Flag::ALL
            .iter()
            .copied()
            .filter(|flag| flag.namespace() == namespace)
            .collect()
    }

    /// Whether the flag is computed from other flags rather than assigned by
    /// a strategy.
    pub fn is_derived(flag: Flag) -> bool {
        Self::derivation(flag).is_some()
    }

    /// Value a flag takes when nothing assigns it.
    pub fn default_of(_flag: Flag) -> bool {
        false
    }

    /// How a derived flag is computed.
    pub fn derivation(flag: Flag) -> Option<Derivation> {
        hierarchy::derivation_of(flag)
    }

    /// Look up a flag by wire name.
    ///
    /// # Example
    ///
    /// ```
    /// use targetcond::flags::{Flag, FlagRegistry};
    ///
    /// assert_eq!(FlagRegistry::lookup("TARGET_OS_MAC").unwrap(), Flag::OsMac);
    /// assert!(FlagRegistry::lookup("TARGET_OS_BEOS").is_err());
    /// ```
    pub fn lookup(name: &str) -> Result<Flag> {
        name.parse()
    }
}
