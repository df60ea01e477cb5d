//! Domain capabilities: what one emulator lets a guest configuration use.
//!
//! # Example
//!
//! ```
//! use virtcaps::{ConnectionContext, DomainCapabilities};
//!
//! let xml = r#"<domainCapabilities>
//!   <arch>x86_64</arch>
//!   <cpu>
//!     <mode name='custom' supported='yes'>
//!       <model usable='yes'>SandyBridge</model>
//!     </mode>
//!   </cpu>
//! </domainCapabilities>"#;
//!
//! let caps = DomainCapabilities::new(&ConnectionContext::default(), xml)?;
//! match caps.cpu.get_mode("custom").and_then(|m| m.get_model("SandyBridge")) {
//!     Some(model) => assert!(model.usable),
//!     None => unreachable!(),
//! }
//! assert_eq!(caps.label_for_firmware_path(None), "BIOS");
//! # Ok::<(), virtcaps::Error>(())
//! ```

mod capabilities;
mod cpu;
mod firmware;

pub use capabilities::{DomainCapabilities, OsCapabilities};
pub use cpu::{CpuCapabilities, CpuMode, CpuModel};
pub use firmware::FirmwareMatcher;
