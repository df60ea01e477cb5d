//! Command execution against capability documents stored on disk

use std::path::{Path, PathBuf};

use serde_json::Value;
use virtcaps::{
    CapabilitySource, ConnectionContext, DomainCapabilities, DomainCapsQuery, Error,
    HostCapabilities, Result,
};

use crate::args::Command;
use crate::dto::{firmware_labels, DomainDto, GuestMatchDto, HostDto};

/// Serves capability documents saved from a daemon, e.g. with
/// `virsh capabilities > caps.xml`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read(&self, what: &'static str) -> Result<String> {
        tracing::debug!(path = %self.path.display(), "reading {what}");
        std::fs::read_to_string(&self.path)
            .map_err(|e| Error::source_failed(what, format!("{}: {e}", self.path.display())))
    }
}

impl CapabilitySource for FileSource {
    fn capabilities(&self, _ctx: &ConnectionContext) -> Result<String> {
        self.read("host capabilities")
    }

    fn domain_capabilities(
        &self,
        _ctx: &ConnectionContext,
        _query: &DomainCapsQuery,
    ) -> Result<String> {
        self.read("domain capabilities")
    }
}

/// Run `command` and return its JSON payload.
pub fn run(ctx: &ConnectionContext, command: &Command) -> Result<Value> {
    let value = match command {
        Command::Host {
            file,
            os_type,
            arch,
        } => {
            let caps = HostCapabilities::fetch(ctx, &FileSource::new(file))?;
            // An explicit request must resolve; otherwise only resolve when there is something to pick.
            let lookup = if os_type.is_some() || arch.is_some() || caps.has_install_options() {
                let found = caps.guest_lookup(os_type.as_deref(), arch.as_deref())?;
                Some(GuestMatchDto::from(found))
            } else {
                None
            };
            to_value(&HostDto::new(&caps, lookup))?
        }
        Command::Domain { file } => {
            let caps = DomainCapabilities::fetch(ctx, &FileSource::new(file), &DomainCapsQuery::new())?;
            to_value(&DomainDto::from(&caps))?
        }
        Command::Firmware { file, path } => {
            let caps = DomainCapabilities::fetch(ctx, &FileSource::new(file), &DomainCapsQuery::new())?;
            to_value(&firmware_labels(&caps, path.as_deref()))?
        }
    };
    Ok(value)
}

/// Serialization failures surface as errors rather than empty successes.
pub(crate) fn to_value<T: serde::Serialize>(data: &T) -> Result<Value> {
    serde_json::to_value(data).map_err(|e| Error::source_failed("report", e.to_string()))
}
