use crate::config::ExtractorConfig;
use crate::docs::extract_docs;
use crate::error::Result;
use crate::reconcile::reconcile;
use crate::structural::{StructuralExtractor, StructuralModel};
use salt2type_model::ClassRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The fused model handed to the renderer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciledModel {
    pub assembly_name: String,
    pub classes: ClassRegistry,
    pub globals: Vec<String>,
}

impl ReconciledModel {
    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|(_, class)| class.methods.len()).sum()
    }

    pub fn property_count(&self) -> usize {
        self.classes
            .iter()
            .map(|(_, class)| class.properties.len())
            .sum()
    }

    /// Links that resolve to no class of this model
    pub fn unresolved_links(&self) -> Vec<(String, String)> {
        self.classes
            .ids()
            .flat_map(|id| {
                let owner = self
                    .classes
                    .get(id)
                    .map(|class| class.qualified_name())
                    .unwrap_or_default();
                self.classes
                    .linked_classes(id)
                    .into_iter()
                    .filter(|(_, target)| target.is_none())
                    .map(move |(link, _)| (owner.clone(), link.to_string()))
            })
            .collect()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Structural extraction, documentation extraction and reconciliation in one pass
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ExtractorConfig,
}

impl Pipeline {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run over in-memory inputs; `docs` is the Doxygen XML text, if any
    pub fn run(&self, source: &str, docs: Option<&str>) -> Result<ReconciledModel> {
        self.config.validate()?;
        let extractor = StructuralExtractor::from_config(&self.config)?;
        let StructuralModel {
            assembly_name,
            mut classes,
            globals,
        } = extractor.extract_str(source)?;

        match docs {
            Some(xml) => {
                let documented = extract_docs(xml)?;
                reconcile(&mut classes, &documented);
            }
            None => log::info!("No documentation given; types stay unknown"),
        }
        classes.rebuild_indexes();

        let model = ReconciledModel {
            assembly_name,
            classes,
            globals,
        };
        for (owner, link) in model.unresolved_links() {
            log::debug!("{owner} links to unknown type {link}");
        }
        log::info!(
            "Fused model: {} classes, {} methods, {} properties",
            model.classes.len(),
            model.method_count(),
            model.property_count()
        );

        Ok(model)
    }

    /// Read the inputs from disk and run
    pub fn run_files(&self, source: &Path, docs: Option<&Path>) -> Result<ReconciledModel> {
        log::debug!("Reading dump {}", source.display());
        let source = std::fs::read_to_string(source)?;
        let docs = match docs {
            Some(path) => {
                log::debug!("Reading documentation {}", path.display());
                Some(std::fs::read_to_string(path)?)
            }
            None => None,
        };

        self.run(&source, docs.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    const DUMP: &str = "(function() {
\t'use strict';
\tvar $asm = {};
\tglobal.Ns = global.Ns || {};
\tss.initAssembly($asm, 'Widgets');
\t// Ns.Widget
\tvar $Ns_Widget = function() {
\t};
\tss.initClass($Ns_Widget, $asm, { $count: 0 });
})();
";

    const DOCS: &str = r#"<doxygen>
  <compounddef id="class_widget" kind="class" prot="public">
    <compoundname>Ns::Widget</compoundname>
    <sectiondef kind="public-attrib">
      <memberdef kind="property" prot="public" static="no">
        <type><ref refid="class_gone">Gone</ref></type>
        <name>count</name>
      </memberdef>
    </sectiondef>
  </compounddef>
</doxygen>"#;

    #[test]
    fn run_without_docs_keeps_structure() {
        let model = Pipeline::default().run(DUMP, None).unwrap();
        assert_eq!(model.assembly_name, "Widgets");
        assert_eq!(model.classes.len(), 1);
        assert_eq!(model.globals, vec!["\tglobal.Ns = global.Ns || {};"]);
        assert_eq!(model.method_count(), 1);
        assert_eq!(model.property_count(), 1);
    }

    #[test]
    fn run_with_docs_reconciles_and_reports_dangling_links() {
        let model = Pipeline::default().run(DUMP, Some(DOCS)).unwrap();
        let (_, widget) = model.classes.iter().next().unwrap();
        assert_eq!(widget.doc_id.as_deref(), Some("class_widget"));
        assert_eq!(widget.properties[0].type_name.as_deref(), Some("Gone | undefined"));
        assert_eq!(
            model.unresolved_links(),
            vec![("Ns.Widget".to_string(), "class_gone".to_string())]
        );
    }

    #[test]
    fn json_round_trip_keeps_indexes_usable() {
        let model = Pipeline::default().run(DUMP, Some(DOCS)).unwrap();
        let back = ReconciledModel::from_json(&model.to_json(false).unwrap()).unwrap();
        assert!(back.classes.find_by_doc_id("class_widget").is_some());
        assert_eq!(back.globals, model.globals);
    }

    #[test]
    fn run_files_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = Pipeline::default()
            .run_files(&dir.path().join("missing.js"), None)
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
