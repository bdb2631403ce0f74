//! Template annotation parsing.
//!
//! Templates carry `@key: value` annotations, usually in a leading comment
//! block:
//!
//! ```text
//! /**
//!  * @fault-type: circular-dependency
//!  * @category: build-errors
//!  */
//! ```
//!
//! Hyphenated keys are normalized to lower camel case (`fault-type` becomes
//! `faultType`).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([A-Za-z][A-Za-z0-9_]*(?:-[A-Za-z0-9_]+)*):\s*(.+)$")
        .expect("annotation regex compiles")
});

/// Keys a template must declare to pass validation.
pub const REQUIRED_KEYS: [&str; 3] = ["faultType", "category", "description"];

/// Parsed template annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateMetadata {
    entries: BTreeMap<String, String>,
}

impl TemplateMetadata {
    /// Scan every line of `content` for annotations. Later duplicates win.
    pub fn parse(content: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in content.lines() {
            let Some(caps) = ANNOTATION.captures(line) else {
                continue;
            };
            let value = strip_comment_terminator(&caps[2]);
            if value.is_empty() {
                continue;
            }
            entries.insert(camel_case(&caps[1]), value.to_string());
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn fault_type(&self) -> Option<&str> {
        self.get("faultType")
    }

    pub fn category(&self) -> Option<&str> {
        self.get("category")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    pub fn expected_error(&self) -> Option<&str> {
        self.get("expectedError")
    }

    pub fn target_file(&self) -> Option<&str> {
        self.get("targetFile")
    }

    /// Required keys that are absent.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| self.get(key).is_none())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `fault-type` -> `faultType`; keys without hyphens pass through.
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn strip_comment_terminator(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_suffix("*/")
        .or_else(|| trimmed.strip_suffix("-->"))
        .unwrap_or(trimmed);
    trimmed.trim_end()
}
