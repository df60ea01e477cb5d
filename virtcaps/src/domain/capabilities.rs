//! Domain capabilities document model.

use std::collections::HashSet;

use serde::Serialize;

use super::cpu::CpuCapabilities;
use super::firmware::FirmwareMatcher;
use crate::connection::{CapabilitySource, ConnectionContext, DomainCapsQuery};
use crate::enumeration::{EnumNode, OptionGroup};
use crate::error::Result;
use crate::xml::{self, Element};

const ROOT: &str = "domainCapabilities";

/// The `<os>` block: boot firmware configurability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OsCapabilities {
    pub supported: bool,
    /// Loader paths as values, with `type`, `readonly`, `secure`... enums.
    pub loader: EnumNode,
    /// `<enum name='firmware'>` directly under `<os>` (`bios`, `efi`).
    pub firmware: EnumNode,
}

impl OsCapabilities {
    fn parse(el: Option<Element<'_, '_>>) -> Self {
        let Some(el) = el else {
            return Self {
                loader: EnumNode::unsupported("loader"),
                firmware: EnumNode::unsupported("firmware"),
                ..Self::default()
            };
        };
        let supported = el.yes_no("supported").unwrap_or(false);
        let firmware = if supported {
            EnumNode::parse_enum_opt("firmware", el.child_where("enum", "name", "firmware"))
        } else {
            EnumNode::unsupported("firmware")
        };
        Self {
            supported,
            loader: EnumNode::parse_opt("loader", el.child("loader")),
            firmware,
        }
    }
}

/// Parsed domain capabilities for one (emulator, arch, machine, domain type).
/// Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct DomainCapabilities {
    /// Emulator binary path.
    pub path: String,
    /// Domain type, e.g. `kvm`.
    pub domain: String,
    pub machine: String,
    pub arch: String,
    pub vcpu_max: Option<u32>,
    pub iothreads: bool,
    pub os: OsCapabilities,
    pub cpu: CpuCapabilities,
    /// Device options (`disk`, `graphics`, `video`, `hostdev`, ...).
    pub devices: OptionGroup,
    /// Feature options (`gic`, `vmcoreinfo`, `genid`, `sev`, ...).
    pub features: OptionGroup,
    #[serde(skip)]
    firmware: FirmwareMatcher,
}

impl DomainCapabilities {
    /// Build the model from a domain capabilities document.
    pub fn new(ctx: &ConnectionContext, document: &str) -> Result<Self> {
        let doc = xml::parse_document(document, ROOT)?;
        let root = Element::root(&doc);

        let caps = Self {
            path: root.child_text("path"),
            domain: root.child_text("domain"),
            machine: root.child_text("machine"),
            arch: root.child_text("arch"),
            vcpu_max: root.child("vcpu").and_then(|v| v.u32_attr("max")),
            iothreads: root
                .child("iothreads")
                .and_then(|i| i.yes_no("supported"))
                .unwrap_or(false),
            os: OsCapabilities::parse(root.child("os")),
            cpu: CpuCapabilities::parse(root.child("cpu"), ctx.config.cpu_usable_default),
            devices: OptionGroup::parse_children(root.child("devices")),
            features: OptionGroup::parse_children(root.child("features")),
            firmware: FirmwareMatcher::new(&ctx.config),
        };

        tracing::debug!(
            uri = %ctx.uri,
            path = %caps.path,
            arch = %caps.arch,
            machine = %caps.machine,
            domain = %caps.domain,
            modes = caps.cpu.modes.len(),
            "parsed domain capabilities"
        );
        Ok(caps)
    }

    /// Fetch the document for `query` from `source` and build the model.
    pub fn fetch(
        ctx: &ConnectionContext,
        source: &impl CapabilitySource,
        query: &DomainCapsQuery,
    ) -> Result<Self> {
        let document = source.domain_capabilities(ctx, query)?;
        Self::new(ctx, &document)
    }

    /// Union of model names across all CPU modes, first occurrence order.
    pub fn get_cpu_models(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.cpu
            .modes
            .iter()
            .flat_map(|m| m.model_names())
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }

    /// Usable models of the `custom` mode, document order.
    pub fn usable_cpu_models(&self) -> Vec<String> {
        self.cpu
            .get_mode("custom")
            .filter(|m| m.supported)
            .map(|m| {
                m.models
                    .iter()
                    .filter(|model| model.usable)
                    .map(|model| model.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Human label for a firmware path.
    ///
    /// No path yields `BIOS` on x86 and `None` elsewhere; a recognized UEFI
    /// build yields `UEFI <arch>: <path>`; anything else `Custom: <path>`.
    pub fn label_for_firmware_path(&self, path: Option<&str>) -> String {
        self.firmware.label_for_path(&self.arch, path)
    }

    /// Check if UEFI builds are known for this architecture.
    pub fn arch_can_uefi(&self) -> bool {
        self.firmware.arch_can_uefi(&self.arch)
    }

    /// First advertised loader path that is a UEFI build for this arch.
    pub fn find_uefi_path_for_arch(&self) -> Option<&str> {
        self.os
            .loader
            .get_values()
            .iter()
            .map(String::as_str)
            .find(|p| self.firmware.is_uefi_path_for_arch(&self.arch, p))
    }

    /// Check if a pflash UEFI loader can be configured.
    pub fn supports_uefi_loader(&self) -> bool {
        self.arch_can_uefi()
            && self.os.loader.supported
            && self.os.loader.enum_has_value("type", "pflash")
    }

    /// Check if firmware auto-selection offers `efi`.
    pub fn supports_firmware_efi(&self) -> bool {
        self.os.firmware.has_value("efi")
    }

    /// Check a value of an enum under a device option.
    pub fn supports_device_value(&self, device: &str, enum_name: &str, value: &str) -> bool {
        let node = self.devices.get(device);
        node.supported && node.enum_has_value(enum_name, value)
    }

    pub fn supports_graphics_type(&self, graphics_type: &str) -> bool {
        self.supports_device_value("graphics", "type", graphics_type)
    }

    pub fn supports_video_type(&self, model_type: &str) -> bool {
        self.supports_device_value("video", "modelType", model_type)
    }

    /// Check if a feature option is present and supported.
    pub fn supports_feature(&self, name: &str) -> bool {
        self.features.get(name).supported
    }
}
