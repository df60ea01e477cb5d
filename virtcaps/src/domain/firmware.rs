//! Firmware path classification.

use std::sync::LazyLock;

use regex::Regex;

use crate::connection::CapsConfig;

/// Known UEFI firmware path patterns per guest architecture, tried in order.
static UEFI_ARCH_PATTERNS: &[(&str, &[&str])] = &[
    (
        "i686",
        &[
            r".*edk2-i386-.*\.fd", // upstream qemu
            r".*ovmf-ia32.*",      // fedora, firmware repos
        ],
    ),
    (
        "x86_64",
        &[
            r".*edk2-x86_64-.*\.fd",    // upstream qemu
            r".*OVMF_CODE\.fd",         // rhel
            r".*ovmf-x64/OVMF.*\.fd",   // firmware repos
            r".*ovmf-x86_64-.*",        // suse
            r".*ovmf.*",
            r".*OVMF.*",
        ],
    ),
    (
        "aarch64",
        &[
            r".*AAVMF_CODE\.fd",
            r".*aarch64/QEMU_EFI.*",
            r".*aarch64.*",
            r".*edk2-aarch64-code\.fd",
        ],
    ),
    (
        "armv7l",
        &[r".*arm/QEMU_EFI.*", r".*edk2-arm-code\.fd"],
    ),
];

/// Architectures that boot from a legacy BIOS when no loader is set.
static BIOS_ARCHES: &[&str] = &["i686", "x86_64"];

static BUILTIN: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    UEFI_ARCH_PATTERNS
        .iter()
        .flat_map(|(arch, patterns)| patterns.iter().map(move |p| (*arch, *p)))
        .filter_map(|(arch, p)| anchored(p).ok().map(|re| (arch, re)))
        .collect()
});

/// Patterns match from the start of the path.
fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})"))
}

/// UEFI path matcher: built-in patterns followed by configured ones.
#[derive(Debug, Clone, Default)]
pub struct FirmwareMatcher {
    extra: Vec<(String, Regex)>,
}

impl FirmwareMatcher {
    /// Build a matcher, compiling configured patterns. Invalid patterns are
    /// logged and skipped.
    pub fn new(config: &CapsConfig) -> Self {
        let extra = config
            .uefi_patterns
            .iter()
            .filter_map(|p| match anchored(&p.pattern) {
                Ok(re) => Some((p.arch.clone(), re)),
                Err(e) => {
                    tracing::warn!(arch = %p.arch, pattern = %p.pattern, error = %e,
                        "ignoring invalid UEFI firmware pattern");
                    None
                }
            })
            .collect();
        Self { extra }
    }

    fn patterns(&self) -> impl Iterator<Item = (&str, &Regex)> {
        BUILTIN
            .iter()
            .map(|(arch, re)| (*arch, re))
            .chain(self.extra.iter().map(|(arch, re)| (arch.as_str(), re)))
    }

    /// Architecture whose UEFI patterns match `path`, if any.
    pub fn uefi_arch_for_path(&self, path: &str) -> Option<&str> {
        self.patterns()
            .find(|(_, re)| re.is_match(path))
            .map(|(arch, _)| arch)
    }

    /// Check if `path` matches a UEFI pattern for `arch`.
    pub fn is_uefi_path_for_arch(&self, arch: &str, path: &str) -> bool {
        self.patterns()
            .any(|(a, re)| a == arch && re.is_match(path))
    }

    /// Check if any UEFI pattern is known for `arch`.
    pub fn arch_can_uefi(&self, arch: &str) -> bool {
        self.patterns().any(|(a, _)| a == arch)
    }

    /// Human label for a firmware path on a guest of `arch`.
    ///
    /// No path means the platform default: BIOS on x86, nothing elsewhere.
    pub fn label_for_path(&self, arch: &str, path: Option<&str>) -> String {
        match path.filter(|p| !p.is_empty()) {
            None if BIOS_ARCHES.iter().any(|a| *a == arch) => "BIOS".to_string(),
            None => "None".to_string(),
            Some(path) => match self.uefi_arch_for_path(path) {
                Some(uefi_arch) => format!("UEFI {uefi_arch}: {path}"),
                None => format!("Custom: {path}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_patterns_compile() {
        let total: usize = UEFI_ARCH_PATTERNS.iter().map(|(_, p)| p.len()).sum();
        assert_eq!(BUILTIN.len(), total);
    }

    #[test]
    fn test_label_three_way() {
        let m = FirmwareMatcher::default();
        assert_eq!(m.label_for_path("x86_64", None), "BIOS");
        assert_eq!(m.label_for_path("i686", Some("")), "BIOS");
        assert_eq!(m.label_for_path("aarch64", None), "None");
        assert_eq!(m.label_for_path("x86_64", Some("OVMF")), "UEFI x86_64: OVMF");
        assert_eq!(m.label_for_path("x86_64", Some("/foobar")), "Custom: /foobar");
    }

    #[test]
    fn test_uefi_arch_for_path() {
        let m = FirmwareMatcher::default();
        assert_eq!(
            m.uefi_arch_for_path("/usr/share/edk2/ovmf/OVMF_CODE.fd"),
            Some("x86_64")
        );
        assert_eq!(
            m.uefi_arch_for_path("/usr/share/AAVMF/AAVMF_CODE.fd"),
            Some("aarch64")
        );
        assert_eq!(
            m.uefi_arch_for_path("/usr/share/edk2/ovmf-ia32/OVMF_CODE.fd"),
            Some("i686")
        );
        assert_eq!(m.uefi_arch_for_path("/usr/share/seabios/bios.bin"), None);
    }

    #[test]
    fn test_arch_checks() {
        let m = FirmwareMatcher::default();
        assert!(m.arch_can_uefi("x86_64"));
        assert!(m.arch_can_uefi("armv7l"));
        assert!(!m.arch_can_uefi("ppc64le"));
        assert!(m.is_uefi_path_for_arch("aarch64", "/usr/share/AAVMF/AAVMF_CODE.fd"));
        assert!(!m.is_uefi_path_for_arch("x86_64", "/usr/share/AAVMF/AAVMF_CODE.fd"));
    }

    #[test]
    fn test_configured_patterns() {
        let config = CapsConfig::default()
            .with_uefi_pattern("riscv64", r".*RISCV_VIRT_CODE\.fd")
            .with_uefi_pattern("riscv64", r"(unclosed");
        let m = FirmwareMatcher::new(&config);
        assert!(m.arch_can_uefi("riscv64"));
        assert_eq!(
            m.label_for_path("riscv64", Some("/usr/share/edk2/RISCV_VIRT_CODE.fd")),
            "UEFI riscv64: /usr/share/edk2/RISCV_VIRT_CODE.fd"
        );
        assert_eq!(m.label_for_path("riscv64", None), "None");
    }
}
