//! Metadata preview for the focused item.
//!
//! The external tool is asked for structured output first and for a plain
//! rendering when that cannot be parsed.

mod report;
mod state;
mod tool;

pub use report::FileReport;
pub use state::{PreviewContent, PreviewState, PreviewStep};
pub use tool::{resolve_tool, MetadataTool, PreviewError, PreviewFormat, PreviewRequest, ProcessTool};
