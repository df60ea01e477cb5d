//! CPU configurability from domain capabilities.

use serde::Serialize;

use crate::xml::Element;

/// A CPU model offered by one CPU mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CpuModel {
    pub name: String,
    /// Whether the model can run on this host with this emulator.
    pub usable: bool,
    /// `fallback` policy on host-model entries.
    pub fallback: Option<String>,
    pub vendor: Option<String>,
}

impl CpuModel {
    fn parse(el: Element<'_, '_>, usable_default: bool) -> Self {
        let name = el.text();
        let usable = match el.attr("usable") {
            Some("yes") => true,
            Some("no") => false,
            Some(other) => {
                tracing::warn!(model = %name, usable = other, "CPU model usability not stated");
                usable_default
            }
            None => usable_default,
        };
        Self {
            usable,
            fallback: el.attr("fallback").map(str::to_string),
            vendor: el.attr("vendor").map(str::to_string),
            name,
        }
    }
}

/// One `<mode>` of the domain capabilities `<cpu>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CpuMode {
    /// `host-passthrough`, `host-model`, `custom`, `maximum`, ...
    pub name: String,
    pub supported: bool,
    /// Vendor reported for host-model.
    pub vendor: Option<String>,
    /// Models in document order.
    pub models: Vec<CpuModel>,
}

impl CpuMode {
    fn parse(el: Element<'_, '_>, usable_default: bool) -> Self {
        let name = el.attr_or_empty("name");
        let supported = el.yes_no("supported").unwrap_or(false);
        if !supported {
            return Self {
                name,
                ..Self::default()
            };
        }
        Self {
            name,
            supported,
            vendor: el.child_text_opt("vendor"),
            models: el
                .children_named("model")
                .map(|m| CpuModel::parse(m, usable_default))
                .filter(|m| !m.name.is_empty())
                .collect(),
        }
    }

    /// Find a model by name.
    pub fn get_model(&self, name: &str) -> Option<&CpuModel> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Model names in document order.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }
}

/// The domain capabilities `<cpu>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CpuCapabilities {
    /// Modes in document order.
    pub modes: Vec<CpuMode>,
}

impl CpuCapabilities {
    pub(crate) fn parse(el: Option<Element<'_, '_>>, usable_default: bool) -> Self {
        let modes = el
            .map(|cpu| {
                cpu.children_named("mode")
                    .map(|m| CpuMode::parse(m, usable_default))
                    .collect()
            })
            .unwrap_or_default();
        Self { modes }
    }

    /// Find a mode by name.
    pub fn get_mode(&self, name: &str) -> Option<&CpuMode> {
        self.modes.iter().find(|m| m.name == name)
    }

    /// Check if a mode is present and supported.
    pub fn supports_mode(&self, name: &str) -> bool {
        self.get_mode(name).is_some_and(|m| m.supported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    const CPU: &str = r#"
        <cpu>
          <mode name='host-passthrough' supported='yes'/>
          <mode name='maximum' supported='no'>
            <model>ignored</model>
          </mode>
          <mode name='host-model' supported='yes'>
            <model fallback='forbid'>Skylake-Client-IBRS</model>
            <vendor>Intel</vendor>
            <feature policy='require' name='ss'/>
          </mode>
          <mode name='custom' supported='yes'>
            <model usable='yes' vendor='AMD'>Opteron_G4</model>
            <model usable='no'>EPYC</model>
            <model usable='unknown'>Haswell</model>
            <model>Nehalem</model>
          </mode>
        </cpu>"#;

    fn parse(usable_default: bool) -> CpuCapabilities {
        let doc = parse_document(CPU, "cpu").unwrap();
        CpuCapabilities::parse(Some(Element::root(&doc)), usable_default)
    }

    #[test]
    fn test_modes_in_document_order() {
        let cpu = parse(false);
        let names: Vec<&str> = cpu.modes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["host-passthrough", "maximum", "host-model", "custom"]);
        assert!(cpu.supports_mode("host-passthrough"));
        assert!(!cpu.supports_mode("maximum"));
        assert!(!cpu.supports_mode("host-passthrough-migratable"));
    }

    #[test]
    fn test_unsupported_mode_has_no_models() {
        let cpu = parse(false);
        let maximum = cpu.get_mode("maximum").unwrap();
        assert!(maximum.models.is_empty());
    }

    #[test]
    fn test_model_attributes() {
        let cpu = parse(false);
        let host_model = cpu.get_mode("host-model").unwrap();
        assert_eq!(host_model.vendor.as_deref(), Some("Intel"));
        let model = host_model.get_model("Skylake-Client-IBRS").unwrap();
        assert_eq!(model.fallback.as_deref(), Some("forbid"));

        let custom = cpu.get_mode("custom").unwrap();
        let opteron = custom.get_model("Opteron_G4").unwrap();
        assert!(opteron.usable);
        assert_eq!(opteron.vendor.as_deref(), Some("AMD"));
        assert!(!custom.get_model("EPYC").unwrap().usable);
        assert_eq!(
            custom.model_names().collect::<Vec<_>>(),
            vec!["Opteron_G4", "EPYC", "Haswell", "Nehalem"]
        );
    }

    #[test]
    fn test_unknown_usability_follows_default() {
        let strict = parse(false);
        let custom = strict.get_mode("custom").unwrap();
        assert!(!custom.get_model("Haswell").unwrap().usable);
        assert!(!custom.get_model("Nehalem").unwrap().usable);

        let lenient = parse(true);
        let custom = lenient.get_mode("custom").unwrap();
        assert!(custom.get_model("Haswell").unwrap().usable);
        assert!(custom.get_model("Nehalem").unwrap().usable);
        assert!(!custom.get_model("EPYC").unwrap().usable);
    }

    #[test]
    fn test_mode_without_marker_is_unsupported() {
        let doc = parse_document(
            "<cpu><mode name='custom'><model usable='yes'>qemu64</model></mode></cpu>",
            "cpu",
        )
        .unwrap();
        let cpu = CpuCapabilities::parse(Some(Element::root(&doc)), false);
        let custom = cpu.get_mode("custom").unwrap();
        assert!(!custom.supported);
        assert!(custom.models.is_empty());
    }

    #[test]
    fn test_missing_lookups() {
        let cpu = parse(false);
        assert!(cpu.get_mode("bogus").is_none());
        assert!(cpu.get_mode("custom").unwrap().get_model("bogus").is_none());
        assert!(CpuCapabilities::parse(None, false).modes.is_empty());
    }
}
