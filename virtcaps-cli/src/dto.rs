//! Data Transfer Objects printed by the commands

use serde::{Deserialize, Serialize};

use virtcaps::{DomainCapabilities, GuestCapability, GuestMatch, HostCapabilities};

// =============================================================================
// Host DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HostCpuDto {
    pub arch: String,
    pub model: String,
    pub vendor: String,
    pub topology: String,
    pub features: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuestDto {
    pub os_type: String,
    pub archs: Vec<String>,
    pub kvm: bool,
}

impl From<&GuestCapability> for GuestDto {
    fn from(guest: &GuestCapability) -> Self {
        Self {
            os_type: guest.os_type.clone(),
            archs: guest.archs.iter().map(|a| a.name.clone()).collect(),
            kvm: guest.is_kvm_available(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuestMatchDto {
    pub os_type: String,
    pub arch: String,
    pub domain_type: Option<String>,
    pub emulator: String,
    pub machines: Vec<String>,
    pub kvm: bool,
}

impl From<GuestMatch<'_>> for GuestMatchDto {
    fn from(m: GuestMatch<'_>) -> Self {
        Self {
            os_type: m.os_type().to_string(),
            arch: m.arch_name().to_string(),
            domain_type: m.domain_type().map(str::to_string),
            emulator: m.emulator().to_string(),
            machines: m.machines().to_vec(),
            kvm: m.is_kvm(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HostDto {
    pub uuid: String,
    pub cpu: HostCpuDto,
    pub numa_cells: usize,
    pub numa_cpus: usize,
    pub has_install_options: bool,
    pub kvm_available: bool,
    pub guests: Vec<GuestDto>,
    /// Resolved install target, absent when the host offers no guests.
    pub lookup: Option<GuestMatchDto>,
}

impl HostDto {
    pub fn new(caps: &HostCapabilities, lookup: Option<GuestMatchDto>) -> Self {
        Self {
            uuid: caps.uuid.clone(),
            cpu: HostCpuDto {
                arch: caps.cpu.arch.clone(),
                model: caps.cpu.model.clone(),
                vendor: caps.cpu.vendor.clone(),
                topology: caps.cpu.topology.to_string(),
                features: caps.cpu.features.len(),
            },
            numa_cells: caps.topology.cell_count(),
            numa_cpus: caps.topology.cpu_count(),
            has_install_options: caps.has_install_options(),
            kvm_available: caps.is_kvm_available(),
            guests: caps.guests.iter().map(GuestDto::from).collect(),
            lookup,
        }
    }
}

// =============================================================================
// Domain DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct FirmwareDto {
    pub path: Option<String>,
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DomainDto {
    pub path: String,
    pub domain: String,
    pub machine: String,
    pub arch: String,
    pub vcpu_max: Option<u32>,
    pub cpu_modes: Vec<String>,
    pub cpu_models: Vec<String>,
    pub usable_cpu_models: Vec<String>,
    pub loaders: Vec<FirmwareDto>,
    pub uefi_loader: bool,
    pub uefi_path: Option<String>,
    pub firmware_efi: bool,
    pub devices: Vec<String>,
    pub features: Vec<String>,
}

impl From<&DomainCapabilities> for DomainDto {
    fn from(caps: &DomainCapabilities) -> Self {
        Self {
            path: caps.path.clone(),
            domain: caps.domain.clone(),
            machine: caps.machine.clone(),
            arch: caps.arch.clone(),
            vcpu_max: caps.vcpu_max,
            cpu_modes: caps
                .cpu
                .modes
                .iter()
                .filter(|m| m.supported)
                .map(|m| m.name.clone())
                .collect(),
            cpu_models: caps.get_cpu_models(),
            usable_cpu_models: caps.usable_cpu_models(),
            loaders: firmware_labels(caps, None),
            uefi_loader: caps.supports_uefi_loader(),
            uefi_path: caps.find_uefi_path_for_arch().map(str::to_string),
            firmware_efi: caps.supports_firmware_efi(),
            devices: supported_names(&caps.devices),
            features: supported_names(&caps.features),
        }
    }
}

fn supported_names(group: &virtcaps::OptionGroup) -> Vec<String> {
    group
        .iter()
        .filter(|node| node.supported)
        .map(|node| node.name.clone())
        .collect()
}

/// Label `path`, or the default firmware plus every advertised loader.
pub fn firmware_labels(caps: &DomainCapabilities, path: Option<&str>) -> Vec<FirmwareDto> {
    let paths: Vec<Option<&str>> = match path {
        Some(p) => vec![Some(p)],
        None => std::iter::once(None)
            .chain(caps.os.loader.get_values().iter().map(|v| Some(v.as_str())))
            .collect(),
    };
    paths
        .into_iter()
        .map(|p| FirmwareDto {
            path: p.map(str::to_string),
            label: caps.label_for_firmware_path(p),
        })
        .collect()
}
