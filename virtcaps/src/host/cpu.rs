//! Host CPU description.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::xml::Element;

/// Socket/die/core/thread counts of the host CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpuTopology {
    pub sockets: u32,
    pub dies: u32,
    pub cores: u32,
    pub threads: u32,
}

impl Default for CpuTopology {
    fn default() -> Self {
        Self {
            sockets: 1,
            dies: 1,
            cores: 1,
            threads: 1,
        }
    }
}

impl CpuTopology {
    fn parse(el: Option<Element<'_, '_>>) -> Self {
        let Some(el) = el else {
            return Self::default();
        };
        Self {
            sockets: el.u32_attr_or("sockets", 1),
            dies: el.u32_attr_or("dies", 1),
            cores: el.u32_attr_or("cores", 1),
            threads: el.u32_attr_or("threads", 1),
        }
    }

    /// Total logical processors described by the topology.
    pub fn total_threads(&self) -> u32 {
        self.sockets
            .saturating_mul(self.dies)
            .saturating_mul(self.cores)
            .saturating_mul(self.threads)
    }
}

impl fmt::Display for CpuTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sockets, {} cores, {} threads",
            self.sockets, self.cores, self.threads
        )
    }
}

/// The `<host><cpu>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostCpu {
    pub arch: String,
    pub model: String,
    pub vendor: String,
    pub topology: CpuTopology,
    /// Feature names, unique, first occurrence order.
    pub features: Vec<String>,
}

impl HostCpu {
    pub(crate) fn parse(el: Option<Element<'_, '_>>) -> Self {
        let Some(el) = el else {
            return Self::default();
        };

        // Older daemons list features as bare child elements.
        let legacy = el
            .child("features")
            .into_iter()
            .flat_map(|f| f.elements())
            .map(|f| f.name());
        let mut seen = HashSet::new();
        let features = el
            .children_named("feature")
            .map(|f| f.attr("name").unwrap_or_default())
            .chain(legacy)
            .filter(|name| !name.is_empty() && seen.insert(*name))
            .map(str::to_string)
            .collect();

        Self {
            arch: el.child_text("arch"),
            model: el.child_text("model"),
            vendor: el.child_text("vendor"),
            topology: CpuTopology::parse(el.child("topology")),
            features,
        }
    }

    /// Check if the host CPU advertises `name`.
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f == name)
    }
}
