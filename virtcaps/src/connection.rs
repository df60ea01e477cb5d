//! Connection context and the capability document source seam.
//!
//! Parsers never talk to the virtualization daemon. Callers fetch raw
//! document text through a [`CapabilitySource`] and hand it to the model
//! constructors together with the [`ConnectionContext`] it came from.

use serde::Deserialize;

use crate::error::Result;

/// Default daemon URI.
pub const DEFAULT_URI: &str = "qemu:///system";

/// Extra UEFI firmware path pattern for one architecture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UefiPattern {
    /// Guest architecture, e.g. `x86_64`.
    pub arch: String,
    /// Regular expression matched against the firmware path.
    pub pattern: String,
}

/// Connection-dependent parsing and labelling defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CapsConfig {
    /// Usability assumed for CPU models whose `usable` attribute is missing
    /// or unrecognized.
    pub cpu_usable_default: bool,
    /// Patterns tried after the built-in UEFI firmware patterns.
    pub uefi_patterns: Vec<UefiPattern>,
}

impl CapsConfig {
    /// Set the assumed usability of CPU models with unknown usability.
    pub fn with_cpu_usable_default(mut self, usable: bool) -> Self {
        self.cpu_usable_default = usable;
        self
    }

    /// Add a UEFI firmware path pattern for `arch`.
    pub fn with_uefi_pattern(mut self, arch: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.uefi_patterns.push(UefiPattern {
            arch: arch.into(),
            pattern: pattern.into(),
        });
        self
    }
}

/// Explicit per-connection context passed to every model constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    /// Daemon URI, e.g. `qemu:///system`.
    pub uri: String,
    /// Parsing and labelling defaults.
    pub config: CapsConfig,
}

impl Default for ConnectionContext {
    fn default() -> Self {
        Self::new(DEFAULT_URI)
    }
}

impl ConnectionContext {
    /// Create a context with default configuration.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            config: CapsConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: CapsConfig) -> Self {
        self.config = config;
        self
    }

    /// Driver name from the URI scheme (`qemu`, `lxc`, `xen`, `test`, ...).
    pub fn driver(&self) -> &str {
        let scheme = self.uri.split(':').next().unwrap_or_default();
        scheme.split('+').next().unwrap_or_default()
    }

    /// Check if the URI names a remote host.
    pub fn is_remote(&self) -> bool {
        self.uri
            .split_once("://")
            .map(|(scheme, rest)| {
                let host = rest.split('/').next().unwrap_or_default();
                let remote_transport = scheme
                    .split_once('+')
                    .is_some_and(|(_, transport)| transport != "unix");
                remote_transport || !(host.is_empty() || host == "localhost")
            })
            .unwrap_or(false)
    }
}

/// Arguments identifying one domain capabilities document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainCapsQuery {
    pub emulator: Option<String>,
    pub arch: Option<String>,
    pub machine: Option<String>,
    pub domain_type: Option<String>,
}

impl DomainCapsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emulator(mut self, emulator: impl Into<String>) -> Self {
        self.emulator = Some(emulator.into());
        self
    }

    pub fn arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = Some(machine.into());
        self
    }

    pub fn domain_type(mut self, domain_type: impl Into<String>) -> Self {
        self.domain_type = Some(domain_type.into());
        self
    }
}

/// Producer of raw capability document text for a connection.
pub trait CapabilitySource {
    /// Fetch the host capabilities document.
    fn capabilities(&self, ctx: &ConnectionContext) -> Result<String>;

    /// Fetch the domain capabilities document for one emulator.
    fn domain_capabilities(&self, ctx: &ConnectionContext, query: &DomainCapsQuery)
        -> Result<String>;
}
