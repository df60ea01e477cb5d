//! Host NUMA topology.

use std::fmt;

use serde::Serialize;

use crate::xml::Element;

/// One host CPU inside a NUMA cell. Identifiers are kept as document text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumaCpu {
    pub id: String,
    pub socket_id: String,
    pub core_id: String,
    pub siblings: String,
}

impl NumaCpu {
    fn parse(el: Element<'_, '_>) -> Self {
        Self {
            id: el.attr_or_empty("id"),
            socket_id: el.attr_or_empty("socket_id"),
            core_id: el.attr_or_empty("core_id"),
            siblings: el.attr_or_empty("siblings"),
        }
    }
}

/// NUMA cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumaCell {
    pub id: String,
    /// Cell memory in KiB, when advertised.
    pub memory_kib: Option<u64>,
    /// CPUs in document order.
    pub cpus: Vec<NumaCpu>,
}

impl NumaCell {
    fn parse(el: Element<'_, '_>) -> Self {
        let cpus = el
            .child("cpus")
            .map(|c| c.children_named("cpu").map(NumaCpu::parse).collect())
            .unwrap_or_default();
        Self {
            id: el.attr_or_empty("id"),
            memory_kib: el.child_u64("memory"),
            cpus,
        }
    }
}

impl fmt::Display for NumaCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell {}: {} CPUs", self.id, self.cpus.len())?;
        if let Some(kib) = self.memory_kib {
            write!(f, ", {} KiB", kib)?;
        }
        Ok(())
    }
}

/// The `<host><topology>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostTopology {
    /// Cells in document order.
    pub cells: Vec<NumaCell>,
}

impl HostTopology {
    pub(crate) fn parse(el: Option<Element<'_, '_>>) -> Self {
        let cells = el
            .and_then(|t| t.child("cells"))
            .map(|c| c.children_named("cell").map(NumaCell::parse).collect())
            .unwrap_or_default();
        Self { cells }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total CPUs across all cells.
    pub fn cpu_count(&self) -> usize {
        self.cells.iter().map(|c| c.cpus.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for HostTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} NUMA cells, {} total CPUs",
            self.cell_count(),
            self.cpu_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    const TOPOLOGY: &str = r#"
        <topology>
          <cells num='2'>
            <cell id='0'>
              <memory unit='KiB'>4096</memory>
              <cpus num='2'>
                <cpu id='0' socket_id='0' core_id='0' siblings='0,2'/>
                <cpu id='02'/>
              </cpus>
            </cell>
            <cell id='1'>
              <cpus num='1'>
                <cpu id='1'/>
              </cpus>
            </cell>
          </cells>
        </topology>"#;

    fn parse(xml: &str) -> HostTopology {
        let doc = parse_document(xml, "topology").unwrap();
        HostTopology::parse(Some(Element::root(&doc)))
    }

    #[test]
    fn test_cells_in_document_order() {
        let topo = parse(TOPOLOGY);
        assert_eq!(topo.cell_count(), 2);
        assert_eq!(topo.cpu_count(), 3);
        assert_eq!(topo.cells[0].id, "0");
        assert_eq!(topo.cells[0].memory_kib, Some(4096));
        assert_eq!(topo.cells[0].cpus[0].siblings, "0,2");
        assert_eq!(topo.cells[1].memory_kib, None);
    }

    #[test]
    fn test_cpu_id_kept_verbatim() {
        let topo = parse(TOPOLOGY);
        assert_eq!(topo.cells[0].cpus[1].id, "02");
        assert_eq!(topo.cells[0].cpus[1].socket_id, "");
    }

    #[test]
    fn test_empty_topology() {
        let topo = HostTopology::parse(None);
        assert!(topo.is_empty());
        assert_eq!(topo.cpu_count(), 0);
        assert!(parse("<topology/>").is_empty());
    }

    #[test]
    fn test_display() {
        let topo = parse(TOPOLOGY);
        assert_eq!(topo.to_string(), "2 NUMA cells, 3 total CPUs");
        assert_eq!(topo.cells[0].to_string(), "Cell 0: 2 CPUs, 4096 KiB");
        assert_eq!(topo.cells[1].to_string(), "Cell 1: 1 CPUs");
    }
}
