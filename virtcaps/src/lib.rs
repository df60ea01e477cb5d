//! # virtcaps
//!
//! Typed models of the capability documents a virtualization daemon
//! advertises, and the queries built on them.
//!
//! Two document flavors are supported:
//!
//! - **Host capabilities** (`<capabilities>`): host CPU, NUMA cells and the
//!   guest OS types, architectures and domain types the host can run.
//! - **Domain capabilities** (`<domainCapabilities>`): for one emulator,
//!   which firmware loaders, CPU modes and models, devices and features a
//!   guest may use.
//!
//! Documents are parsed once into immutable models. Missing or malformed
//! fields degrade to empty defaults; only queries naming an entity that must
//! exist return errors.
//!
//! ## Example
//!
//! ```
//! use virtcaps::{ConnectionContext, HostCapabilities};
//!
//! let ctx = ConnectionContext::new("qemu:///system");
//! let caps = HostCapabilities::new(&ctx, "<capabilities/>")?;
//!
//! assert!(!caps.has_install_options());
//! assert!(caps.guest_lookup(None, None).is_err());
//! # Ok::<(), virtcaps::Error>(())
//! ```

pub mod connection;
pub mod domain;
pub mod enumeration;
pub mod error;
pub mod host;
mod xml;

// Re-export main types at crate root
pub use connection::{CapabilitySource, CapsConfig, ConnectionContext, DomainCapsQuery, UefiPattern};
pub use enumeration::{EnumNode, OptionGroup};
pub use error::{Error, ErrorKind, Result};

// Host types
pub use host::{
    ArchCapability, CpuTopology, GuestCapability, GuestDomain, GuestMatch, GuestQuery,
    HostCapabilities, HostCpu, HostTopology, NumaCell, NumaCpu, SecurityModel,
};

// Domain types
pub use domain::{
    CpuCapabilities, CpuMode, CpuModel, DomainCapabilities, FirmwareMatcher, OsCapabilities,
};
