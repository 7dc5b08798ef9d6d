//! Structured metadata document emitted by the tool with `--json`.

use serde::Deserialize;

/// The fields the preview pane shows.
///
/// Only `name` is required; anything else the tool omits is left out of
/// the summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileReport {
    pub name: String,
    #[serde(default, alias = "path", alias = "absolute_path")]
    pub abs_path: Option<String>,
    #[serde(default, alias = "relative_path")]
    pub rel_path: Option<String>,
    #[serde(default, alias = "size")]
    pub size_bytes: Option<u64>,
    #[serde(default, alias = "human_size")]
    pub size_human: Option<String>,
    #[serde(default, rename = "type", alias = "type_desc", alias = "kind")]
    pub type_desc: Option<String>,
    #[serde(default, alias = "security_verdict")]
    pub verdict: Option<String>,
}

impl FileReport {
    /// Parse the tool's structured output.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw.trim())
    }

    /// Human-readable size, derived from the byte count when the tool left
    /// it out.
    pub fn display_size(&self) -> Option<String> {
        match (&self.size_human, self.size_bytes) {
            (Some(human), Some(bytes)) => Some(format!("{human} ({bytes} bytes)")),
            (Some(human), None) => Some(human.clone()),
            (None, Some(bytes)) => Some(format!(
                "{} ({bytes} bytes)",
                humansize::format_size(bytes, humansize::BINARY)
            )),
            (None, None) => None,
        }
    }

    /// Label/value rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        if let Some(kind) = &self.type_desc {
            rows.push(("Type", kind.clone()));
        }
        if let Some(size) = self.display_size() {
            rows.push(("Size", size));
        }
        if let Some(verdict) = &self.verdict {
            rows.push(("Verdict", verdict.clone()));
        }
        if let Some(path) = &self.abs_path {
            rows.push(("Path", path.clone()));
        }
        if let Some(rel) = &self.rel_path {
            rows.push(("Relative", rel.clone()));
        }
        rows
    }
}
