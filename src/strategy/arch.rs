//! CPU architectures known to the strategy table.

use std::fmt;

use crate::flags::Flag;

/// A CPU architecture some strategy can detect.
///
/// `TARGET_CPU_ALPHA` has no entry: no strategy produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Ppc,
    Ppc64,
    M68k,
    X86,
    X86_64,
    Arm,
    Arm64,
    Mips,
    Mips64,
    Sparc,
    S390x,
    Wasm32,
}

impl Arch {
    pub const ALL: [Arch; 12] = [
        Arch::Ppc,
        Arch::Ppc64,
        Arch::M68k,
        Arch::X86,
        Arch::X86_64,
        Arch::Arm,
        Arch::Arm64,
        Arch::Mips,
        Arch::Mips64,
        Arch::Sparc,
        Arch::S390x,
        Arch::Wasm32,
    ];

    /// The `TARGET_CPU_*` flag for this architecture.
    pub fn flag(self) -> Flag {
        match self {
            Arch::Ppc => Flag::CpuPpc,
            Arch::Ppc64 => Flag::CpuPpc64,
            Arch::M68k => Flag::Cpu68k,
            Arch::X86 => Flag::CpuX86,
            Arch::X86_64 => Flag::CpuX86_64,
            Arch::Arm => Flag::CpuArm,
            Arch::Arm64 => Flag::CpuArm64,
            Arch::Mips => Flag::CpuMips,
            Arch::Mips64 => Flag::CpuMips64,
            Arch::Sparc => Flag::CpuSparc,
            Arch::S390x => Flag::CpuS390x,
            Arch::Wasm32 => Flag::CpuWasm32,
        }
    }

    /// Reverse of [`Arch::flag`].
    pub fn from_flag(flag: Flag) -> Option<Arch> {
        Self::ALL.into_iter().find(|arch| arch.flag() == flag)
    }

    /// Map a target query arch name onto the table.
    ///
    /// Accepts the spellings the arch predicate answers to, plus common
    /// triple spellings of the same instruction sets (`aarch64`, `i686`,
    /// `powerpc`, `thumbv7`).
    pub fn from_query_name(name: &str) -> Option<Arch> {
        let arch = match name {
            "arm64" | "arm64e" | "arm64_32" | "aarch64" | "aarch64_be" | "aarch64_32" => {
                Arch::Arm64
            }
            "i386" | "i486" | "i586" | "i686" | "x86" => Arch::X86,
            "x86_64" | "x86_64h" | "amd64" => Arch::X86_64,
            "ppc" | "powerpc" | "powerpcle" => Arch::Ppc,
            "ppc64" | "ppc64le" | "powerpc64" | "powerpc64le" => Arch::Ppc64,
            "m68k" => Arch::M68k,
            "mips" | "mipsel" => Arch::Mips,
            "mips64" | "mips64el" => Arch::Mips64,
            "s390" | "s390x" | "systemz" => Arch::S390x,
            "sparc" | "sparcel" | "sparc64" | "sparcv9" => Arch::Sparc,
            "wasm32" => Arch::Wasm32,
            other if other.starts_with("armv") || other.starts_with("thumb") || other == "arm" => {
                Arch::Arm
            }
            _ => return None,
        };
        Some(arch)
    }

    /// Whether the architecture is 64-bit by default.
    pub fn is_64_bit(self) -> bool {
        matches!(
            self,
            Arch::Ppc64 | Arch::X86_64 | Arch::Arm64 | Arch::Mips64 | Arch::S390x
        )
    }

    /// Whether the architecture is big endian by default.
    pub fn is_big_endian(self) -> bool {
        matches!(
            self,
            Arch::Ppc | Arch::Ppc64 | Arch::M68k | Arch::Sparc | Arch::S390x
        )
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Arch::Ppc => "ppc",
            Arch::Ppc64 => "ppc64",
            Arch::M68k => "m68k",
            Arch::X86 => "i386",
            Arch::X86_64 => "x86_64",
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
            Arch::Mips => "mips",
            Arch::Mips64 => "mips64",
            Arch::Sparc => "sparc",
            Arch::S390x => "s390x",
            Arch::Wasm32 => "wasm32",
        };
        f.write_str(name)
    }
}
