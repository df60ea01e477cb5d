//! Host capabilities document model and guest lookup.

use serde::Serialize;

use super::cpu::HostCpu;
use super::guest::{ArchCapability, GuestCapability, GuestDomain};
use super::topology::HostTopology;
use crate::connection::{CapabilitySource, ConnectionContext};
use crate::error::{Error, Result};
use crate::xml::{self, Element};

const ROOT: &str = "capabilities";

/// Legacy OS type aliases accepted by [`HostCapabilities::guest_lookup`].
fn normalize_os_type(os_type: &str) -> &str {
    match os_type {
        // Xen paravirt guests were historically requested as "linux".
        "linux" => "xen",
        other => other,
    }
}

/// Host security driver (`<secmodel>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecurityModel {
    pub model: String,
    pub doi: String,
}

/// Parsed host capabilities document. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostCapabilities {
    pub uuid: String,
    pub cpu: HostCpu,
    /// NUMA topology.
    pub topology: HostTopology,
    pub secmodels: Vec<SecurityModel>,
    /// Guest capabilities grouped by OS type, in document order.
    pub guests: Vec<GuestCapability>,
}

/// Guest selection criteria. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestQuery {
    pub os_type: Option<String>,
    pub arch: Option<String>,
    pub domain_type: Option<String>,
    pub machine: Option<String>,
}

impl GuestQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn os_type(mut self, os_type: impl Into<String>) -> Self {
        self.os_type = Some(os_type.into());
        self
    }

    pub fn arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn domain_type(mut self, domain_type: impl Into<String>) -> Self {
        self.domain_type = Some(domain_type.into().to_lowercase());
        self
    }

    pub fn machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = Some(machine.into());
        self
    }
}

/// Result of a guest lookup: the guest, the chosen architecture and the
/// preferred domain type for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestMatch<'a> {
    pub guest: &'a GuestCapability,
    pub arch: &'a ArchCapability,
    /// `None` only when the architecture lists no domain types.
    pub domain: Option<&'a GuestDomain>,
}

impl<'a> GuestMatch<'a> {
    pub fn os_type(&self) -> &'a str {
        &self.guest.os_type
    }

    pub fn arch_name(&self) -> &'a str {
        &self.arch.name
    }

    pub fn domain_type(&self) -> Option<&'a str> {
        self.domain.map(|d| d.domain_type.as_str())
    }

    /// Emulator for the chosen domain type.
    pub fn emulator(&self) -> &'a str {
        match self.domain {
            Some(domain) => domain.effective_emulator(self.arch),
            None => &self.arch.emulator_path,
        }
    }

    /// Machine types for the chosen domain type.
    pub fn machines(&self) -> &'a [String] {
        match self.domain {
            Some(domain) => domain.effective_machines(self.arch),
            None => &self.arch.machines,
        }
    }

    pub fn is_kvm(&self) -> bool {
        self.domain_type() == Some("kvm")
    }
}

impl HostCapabilities {
    /// Build the model from a host capabilities document.
    ///
    /// Only text that is not XML, or XML of another document flavor, is
    /// rejected. Missing sections yield empty defaults.
    pub fn new(ctx: &ConnectionContext, document: &str) -> Result<Self> {
        let doc = xml::parse_document(document, ROOT)?;
        let root = Element::root(&doc);
        let host = root.child("host");

        let caps = Self {
            uuid: host.map(|h| h.child_text("uuid")).unwrap_or_default(),
            cpu: HostCpu::parse(host.and_then(|h| h.child("cpu"))),
            topology: HostTopology::parse(host.and_then(|h| h.child("topology"))),
            secmodels: host
                .map(|h| {
                    h.children_named("secmodel")
                        .map(|s| SecurityModel {
                            model: s.child_text("model"),
                            doi: s.child_text("doi"),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            guests: GuestCapability::parse_all(root.children_named("guest")),
        };

        tracing::debug!(
            uri = %ctx.uri,
            arch = %caps.cpu.arch,
            cells = caps.topology.cell_count(),
            guests = caps.guests.len(),
            "parsed host capabilities"
        );
        Ok(caps)
    }

    /// Fetch the host document from `source` and build the model.
    pub fn fetch(ctx: &ConnectionContext, source: &impl CapabilitySource) -> Result<Self> {
        let document = source.capabilities(ctx)?;
        Self::new(ctx, &document)
    }

    /// Check if the host can install any guest at all.
    pub fn has_install_options(&self) -> bool {
        !self.guests.is_empty()
    }

    /// Check if any guest offers KVM.
    pub fn is_kvm_available(&self) -> bool {
        self.guests.iter().any(GuestCapability::is_kvm_available)
    }

    /// Get the guest capability for an OS type.
    pub fn get_guest(&self, os_type: &str) -> Option<&GuestCapability> {
        let os_type = normalize_os_type(os_type);
        self.guests.iter().find(|g| g.os_type == os_type)
    }

    /// Select the best guest for an OS type and architecture.
    pub fn guest_lookup(&self, os_type: Option<&str>, arch: Option<&str>) -> Result<GuestMatch<'_>> {
        let mut query = GuestQuery::new();
        query.os_type = os_type.map(str::to_string);
        query.arch = arch.map(str::to_string);
        self.guest_lookup_with(&query)
    }

    /// Select the best guest for a full [`GuestQuery`].
    ///
    /// Guests are tried in document order. Without an explicit architecture
    /// the host CPU architecture is preferred inside a guest, then its first
    /// architecture.
    pub fn guest_lookup_with(&self, query: &GuestQuery) -> Result<GuestMatch<'_>> {
        let requested = query.os_type.as_deref();
        let virt_type = requested.map(normalize_os_type);
        let arch = query.arch.as_deref();

        let unsupported_type = |arch: Option<&str>| Error::UnsupportedVirtType {
            virt_type: virt_type.unwrap_or_default().to_string(),
            requested: requested.unwrap_or_default().to_string(),
            arch: arch.map(str::to_string),
        };

        if virt_type.is_none() && self.guests.is_empty() {
            return Err(Error::NoGuestCapability);
        }

        let mut candidates = self
            .guests
            .iter()
            .filter(|g| virt_type.is_none_or(|t| g.os_type == t))
            .peekable();
        if candidates.peek().is_none() {
            return Err(unsupported_type(None));
        }

        let found = candidates.find_map(|guest| {
            let chosen = match arch {
                Some(name) => guest.get_arch(name),
                None => guest
                    .get_arch(&self.cpu.arch)
                    .or_else(|| guest.archs.first()),
            };
            chosen.map(|a| (guest, a))
        });

        let Some((guest, chosen_arch)) = found else {
            return Err(match (virt_type, arch) {
                (Some(_), arch) => unsupported_type(arch),
                (None, Some(arch)) => Error::UnsupportedArch {
                    arch: arch.to_string(),
                },
                (None, None) => Error::NoGuestCapability,
            });
        };

        let domain_type = query.domain_type.as_deref();
        let machine = query.machine.as_deref();
        let domain = chosen_arch.best_domain(|d| {
            domain_type.is_none_or(|t| d.domain_type == t)
                && machine.is_none_or(|m| d.effective_machines(chosen_arch).iter().any(|x| x == m))
        });

        if domain.is_none() && (domain_type.is_some() || machine.is_some()) {
            return Err(Error::UnsupportedDomainType {
                domain_type: domain_type.unwrap_or("any").to_string(),
                machine: machine.map(str::to_string),
                virt_type: guest.os_type.clone(),
                arch: chosen_arch.name.clone(),
            });
        }

        tracing::debug!(
            os_type = %guest.os_type,
            arch = %chosen_arch.name,
            domain = domain.map(|d| d.domain_type.as_str()).unwrap_or("none"),
            "guest lookup matched"
        );
        Ok(GuestMatch {
            guest,
            arch: chosen_arch,
            domain,
        })
    }
}
