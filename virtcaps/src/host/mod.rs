//! Host capabilities: CPU, NUMA topology and the guest types the host can run.
//!
//! # Example
//!
//! ```
//! use virtcaps::{ConnectionContext, HostCapabilities};
//!
//! let xml = r#"<capabilities>
//!   <host><cpu><arch>x86_64</arch></cpu></host>
//!   <guest>
//!     <os_type>hvm</os_type>
//!     <arch name='x86_64'><domain type='kvm'/></arch>
//!   </guest>
//! </capabilities>"#;
//!
//! let caps = HostCapabilities::new(&ConnectionContext::default(), xml)?;
//! assert!(caps.has_install_options());
//! assert!(caps.guest_lookup(Some("hvm"), None)?.is_kvm());
//! # Ok::<(), virtcaps::Error>(())
//! ```

mod capabilities;
mod cpu;
mod guest;
mod topology;

pub use capabilities::{GuestMatch, GuestQuery, HostCapabilities, SecurityModel};
pub use cpu::{CpuTopology, HostCpu};
pub use guest::{ArchCapability, GuestCapability, GuestDomain};
pub use topology::{HostTopology, NumaCell, NumaCpu};
