//! Template loading, application and validation.
//!
//! Templates are opaque replacement content for target files. They may hold
//! deliberately broken code; only the annotations are inspected.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::metadata::TemplateMetadata;
use crate::error::{ChaosError, Result};
use crate::io::file_store::FileStore;

/// A loaded template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Path as requested (usually relative to the project root).
    pub path: PathBuf,
    pub content: String,
    pub metadata: TemplateMetadata,
}

impl Template {
    /// Validation problems: missing required annotations or blank content.
    pub fn problems(&self) -> Vec<String> {
        let mut errors: Vec<String> = self
            .metadata
            .missing_required()
            .into_iter()
            .map(|key| format!("missing @{} annotation", annotation_name(key)))
            .collect();
        if self.content.trim().is_empty() {
            errors.push("template content is empty".to_string());
        }
        errors
    }
}

/// Outcome of validating one template path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateValidation {
    pub path: PathBuf,
    pub valid: bool,
    pub errors: Vec<String>,
    pub template: Option<Template>,
}

pub struct TemplateLoader<'a> {
    store: &'a FileStore,
    templates_dir: &'a Path,
}

impl<'a> TemplateLoader<'a> {
    pub fn new(store: &'a FileStore, templates_dir: &'a Path) -> Self {
        Self {
            store,
            templates_dir,
        }
    }

    /// Read a template and parse its annotations. Fails with `NotFound` if absent.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Template> {
        let path = path.as_ref();
        if !self.store.resolve(path).is_file() {
            return Err(ChaosError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = self.store.read(path)?;
        let metadata = TemplateMetadata::parse(&content);
        debug!(path = %path.display(), annotations = metadata.iter().count(), "template loaded");
        Ok(Template {
            path: path.to_path_buf(),
            content,
            metadata,
        })
    }

    /// Replace `target` with the template content verbatim.
    pub fn apply(&self, template: &Template, target: impl AsRef<Path>) -> Result<()> {
        let target = target.as_ref();
        debug!(template = %template.path.display(), target = %target.display(), "applying template");
        self.store.write(target, &template.content)
    }

    /// Check that `path` loads, carries the required annotations and is not blank.
    ///
    /// Never fails: load errors are reported as validation errors.
    pub fn validate(&self, path: impl AsRef<Path>) -> TemplateValidation {
        let path = path.as_ref().to_path_buf();
        match self.load(&path) {
            Ok(template) => {
                let errors = template.problems();
                TemplateValidation {
                    path,
                    valid: errors.is_empty(),
                    errors,
                    template: Some(template),
                }
            }
            Err(err) => TemplateValidation {
                path,
                valid: false,
                errors: vec![err.to_string()],
                template: None,
            },
        }
    }

    /// Every `*.template.*` file under the templates directory.
    ///
    /// Templates that cannot be read are logged and skipped.
    pub fn list(&self) -> Result<Vec<Template>> {
        let mut templates = Vec::new();
        for path in self.store.list(self.templates_dir, true)? {
            if !is_template_file(&path) {
                continue;
            }
            match self.load(&path) {
                Ok(template) => templates.push(template),
                Err(err) => warn!(path = %path.display(), error = %err, "cannot load template"),
            }
        }
        Ok(templates)
    }
}

fn is_template_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(".template."))
}

/// `faultType` -> `fault-type`, for messages that quote the annotation.
fn annotation_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "/**\n * @fault-type: syntax-error\n * @category: build-errors\n * @description: Missing closing tag\n */\nexport default function Home() { return <div>; }\n";

    fn setup() -> (tempfile::TempDir, FileStore) {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(temp.path());
        (temp, store)
    }

    #[test]
    fn load_missing_template_is_not_found() {
        let (_temp, store) = setup();
        let loader = TemplateLoader::new(&store, Path::new("chaos-templates"));
        let err = loader.load("chaos-templates/missing.template.js").unwrap_err();
        assert!(matches!(err, ChaosError::NotFound { .. }));
    }

    #[test]
    fn load_parses_metadata() {
        let (_temp, store) = setup();
        store.write("t/syntax.template.jsx", VALID).expect("write");
        let loader = TemplateLoader::new(&store, Path::new("t"));

        let template = loader.load("t/syntax.template.jsx").expect("load");
        assert_eq!(template.content, VALID);
        assert_eq!(template.metadata.fault_type(), Some("syntax-error"));
    }

    #[test]
    fn apply_replaces_target_verbatim() {
        let (_temp, store) = setup();
        store.write("t/syntax.template.jsx", VALID).expect("write");
        store.write("src/pages/Home.jsx", "original").expect("write");
        let loader = TemplateLoader::new(&store, Path::new("t"));

        let template = loader.load("t/syntax.template.jsx").expect("load");
        loader.apply(&template, "src/pages/Home.jsx").expect("apply");
        loader.apply(&template, "src/pages/Home.jsx").expect("apply twice");
        assert_eq!(store.read("src/pages/Home.jsx").expect("read"), VALID);
    }

    #[test]
    fn validate_reports_missing_annotations_and_empty_content() {
        let (_temp, store) = setup();
        store.write("t/blank.template.js", "  \n").expect("write");
        let loader = TemplateLoader::new(&store, Path::new("t"));

        let result = loader.validate("t/blank.template.js");
        assert!(!result.valid);
        assert!(result.errors.contains(&"missing @fault-type annotation".to_string()));
        assert!(result.errors.contains(&"template content is empty".to_string()));
    }

    #[test]
    fn validate_missing_file_is_invalid_not_error() {
        let (_temp, store) = setup();
        let loader = TemplateLoader::new(&store, Path::new("t"));
        let result = loader.validate("t/none.template.js");
        assert!(!result.valid);
        assert!(result.template.is_none());
        assert!(result.errors[0].contains("not found"));
    }

    #[test]
    fn list_finds_templates_recursively() {
        let (_temp, store) = setup();
        store.write("t/build/a.template.js", VALID).expect("write");
        store.write("t/runtime/b.template.jsx", VALID).expect("write");
        store.write("t/README.md", "docs").expect("write");
        let loader = TemplateLoader::new(&store, Path::new("t"));

        let paths: Vec<PathBuf> = loader
            .list()
            .expect("list")
            .into_iter()
            .map(|t| t.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("t/build/a.template.js"),
                PathBuf::from("t/runtime/b.template.jsx"),
            ]
        );
    }

    #[test]
    fn annotation_name_reverses_camel_case() {
        assert_eq!(annotation_name("faultType"), "fault-type");
        assert_eq!(annotation_name("category"), "category");
    }
}
