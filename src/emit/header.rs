//! C header output.

use std::io::Write;

use super::TargetFormatter;
use crate::flags::{Flag, Namespace};
use crate::resolver::ResolvedTarget;

/// Formats a target as a self-contained C header.
pub struct HeaderFormatter {
    /// Include guard macro.
    pub guard: String,
}

impl HeaderFormatter {
    /// Create a formatter with a custom include guard.
    pub fn new(guard: &str) -> Self {
        Self {
            guard: guard.to_string(),
        }
    }
}

impl Default for HeaderFormatter {
    fn default() -> Self {
        Self::new("__TARGETCONDITIONALS__")
    }
}

impl TargetFormatter for HeaderFormatter {
    fn format<W: Write>(&self, target: &ResolvedTarget, writer: &mut W) -> std::io::Result<()> {
        let width = Flag::ALL
            .iter()
            .map(|flag| flag.name().len())
            .max()
            .unwrap_or(0);

        writeln!(
            writer,
            "/* Generated by targetcond ({} strategy). Do not edit. */",
            target.strategy.name()
        )?;
        writeln!(writer, "#ifndef {}", self.guard)?;
        writeln!(writer, "#define {}", self.guard)?;

        for namespace in Namespace::ALL {
            writeln!(writer)?;
            writeln!(writer, "/* {} */", namespace)?;
            for (flag, value) in target.flags.namespace(namespace) {
                writeln!(
                    writer,
                    "#define {:<width$} {}",
                    flag.name(),
                    u8::from(value),
                    width = width
                )?;
            }
        }

        writeln!(writer)?;
        writeln!(writer, "#endif /* {} */", self.guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::BuildEnvironment;
    use crate::resolver::resolve;

    fn render(target: &ResolvedTarget, formatter: HeaderFormatter) -> String {
        let mut output = Vec::new();
        formatter.format(target, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn metrowerks_header() {
        let env = BuildEnvironment::new()
            .with_macro("__MWERKS__", "1")
            .with_macro("__INTEL__", "1");
        let target = resolve(&env).unwrap();
        let header = render(&target, HeaderFormatter::default());

        let defines: Vec<&str> = header
            .lines()
            .filter(|line| line.starts_with("#define TARGET_"))
            .collect();
        assert_eq!(defines.len(), Flag::ALL.len());

        let enabled: Vec<&str> = defines
            .iter()
            .filter(|line| line.ends_with(" 1"))
            .map(|line| line.split_whitespace().nth(1).unwrap())
            .collect();
        insta::assert_snapshot!(enabled.join("\n"), @r"
        TARGET_CPU_X86
        TARGET_OS_MAC
        TARGET_RT_LITTLE_ENDIAN
        TARGET_RT_MAC_CFM
        ");
    }

    #[test]
    fn include_guard() {
        let target = crate::emit::test_support::ios_simulator();
        let header = render(&target, HeaderFormatter::new("MY_TARGET_H"));
        assert!(header.contains("#ifndef MY_TARGET_H\n#define MY_TARGET_H\n"));
        assert!(header.trim_end().ends_with("#endif /* MY_TARGET_H */"));
        assert!(header.starts_with("/* Generated by targetcond (target_query strategy)"));
    }
}
