//! Cargo build-script directives.
//!
//! Every flag is declared with `rustc-check-cfg` so `#[cfg(target_os_mac)]`
//! never trips the `unexpected_cfgs` lint; only true flags are enabled.

use std::io::Write;

use super::TargetFormatter;
use crate::resolver::ResolvedTarget;

/// Formats a target as `cargo:` directives.
pub struct CargoFormatter;

impl CargoFormatter {
    /// Create a new Cargo formatter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for CargoFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetFormatter for CargoFormatter {
    fn format<W: Write>(&self, target: &ResolvedTarget, writer: &mut W) -> std::io::Result<()> {
        for (flag, value) in target.flags.iter() {
            writeln!(writer, "cargo:rustc-check-cfg=cfg({})", flag.cfg_name())?;
            if value {
                writeln!(writer, "cargo:rustc-cfg={}", flag.cfg_name())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::test_support::ios_simulator;
    use crate::flags::Flag;

    #[test]
    fn declares_every_flag_and_enables_true_ones() {
        let target = ios_simulator();
        let mut output = Vec::new();
        CargoFormatter::new().format(&target, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        let checks = output
            .lines()
            .filter(|l| l.starts_with("cargo:rustc-check-cfg="))
            .count();
        assert_eq!(checks, Flag::ALL.len());

        let enabled: Vec<&str> = output
            .lines()
            .filter_map(|l| l.strip_prefix("cargo:rustc-cfg="))
            .collect();
        assert_eq!(enabled.len(), target.flags.enabled().len());
        assert!(enabled.contains(&"target_os_simulator"));
        assert!(enabled.contains(&"target_cpu_arm64"));
        assert!(!enabled.contains(&"target_os_osx"));
    }
}
