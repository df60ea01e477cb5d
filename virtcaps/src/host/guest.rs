//! Guest capabilities advertised by the host.

use serde::Serialize;

use crate::xml::Element;

/// Domain type preference when a lookup does not name one. Types not listed
/// lose to every listed type.
const DOMAIN_TYPE_PRIORITY: &[&str] = &["kvm", "xen", "hvf", "qemu", "kqemu"];

/// One `<domain type=..>` entry of a guest architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuestDomain {
    /// Virtualization technology, e.g. `qemu` or `kvm`.
    pub domain_type: String,
    /// Emulator override for this domain type.
    pub emulator: Option<String>,
    /// Machine overrides for this domain type.
    pub machines: Vec<String>,
}

impl GuestDomain {
    fn parse(el: Element<'_, '_>) -> Self {
        Self {
            domain_type: el.attr_or_empty("type"),
            emulator: el.child_text_opt("emulator"),
            machines: el.child_texts("machine"),
        }
    }

    /// Emulator for this domain type, falling back to the architecture's.
    pub fn effective_emulator<'a>(&'a self, arch: &'a ArchCapability) -> &'a str {
        self.emulator.as_deref().unwrap_or(&arch.emulator_path)
    }

    /// Machines for this domain type, falling back to the architecture's.
    pub fn effective_machines<'a>(&'a self, arch: &'a ArchCapability) -> &'a [String] {
        if self.machines.is_empty() {
            &arch.machines
        } else {
            &self.machines
        }
    }
}

/// One architecture a guest OS type can run on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchCapability {
    pub name: String,
    pub wordsize: Option<u32>,
    pub emulator_path: String,
    /// Machine types in document order.
    pub machines: Vec<String>,
    /// Domain types in document order.
    pub domains: Vec<GuestDomain>,
}

impl ArchCapability {
    fn parse(el: Element<'_, '_>) -> Self {
        Self {
            name: el.attr_or_empty("name"),
            wordsize: el.child_u32("wordsize"),
            emulator_path: el.child_text("emulator"),
            machines: el.child_texts("machine"),
            domains: el.children_named("domain").map(GuestDomain::parse).collect(),
        }
    }

    /// Domain type names in document order.
    pub fn domain_types(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|d| d.domain_type.as_str())
    }

    pub fn has_domain_type(&self, domain_type: &str) -> bool {
        self.domain_types().any(|t| t == domain_type)
    }

    /// Pick the best domain among those accepted by `filter`.
    pub(crate) fn best_domain(
        &self,
        filter: impl Fn(&GuestDomain) -> bool,
    ) -> Option<&GuestDomain> {
        let candidates: Vec<&GuestDomain> = self.domains.iter().filter(|&d| filter(d)).collect();
        DOMAIN_TYPE_PRIORITY
            .iter()
            .find_map(|t| candidates.iter().find(|d| d.domain_type == *t))
            .or(candidates.last())
            .copied()
    }
}

/// Everything the host offers for one guest OS type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuestCapability {
    /// e.g. `hvm`, `xen`, `exe`.
    pub os_type: String,
    /// Architectures in document order.
    pub archs: Vec<ArchCapability>,
    /// Guest feature names (`pae`, `acpi`, ...), unique.
    pub features: Vec<String>,
}

impl GuestCapability {
    /// Parse every `<guest>` block, grouping blocks that share an OS type.
    pub(crate) fn parse_all<'a, 'input>(
        guests: impl Iterator<Item = Element<'a, 'input>>,
    ) -> Vec<Self>
    where
        'input: 'a,
    {
        let mut grouped: Vec<Self> = Vec::new();
        for el in guests {
            let os_type = el.child_text("os_type");
            let index = match grouped.iter().position(|g| g.os_type == os_type) {
                Some(index) => index,
                None => {
                    grouped.push(Self {
                        os_type,
                        ..Self::default()
                    });
                    grouped.len() - 1
                }
            };
            let guest = &mut grouped[index];
            if let Some(arch) = el.child("arch") {
                guest.archs.push(ArchCapability::parse(arch));
            }
            if let Some(features) = el.child("features") {
                for feature in features.elements() {
                    if !guest.features.iter().any(|f| f == feature.name()) {
                        guest.features.push(feature.name().to_string());
                    }
                }
            }
        }
        grouped
    }

    /// Check if hardware-accelerated KVM is offered for any architecture.
    pub fn is_kvm_available(&self) -> bool {
        self.archs.iter().any(|a| a.has_domain_type("kvm"))
    }

    pub fn get_arch(&self, name: &str) -> Option<&ArchCapability> {
        self.archs.iter().find(|a| a.name == name)
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f == name)
    }
}
