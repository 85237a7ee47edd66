//! `[output]`: how CLI commands print their results.
//!
//! Only the one-shot commands (`vote`, `status`, `accept`, `reconcile`,
//! `import`) print results; `serve` writes logs only.

use ledger_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// `json` prints the same camelCase bodies the HTTP API returns.
    /// Unset means text.
    pub format: Option<OutputFormat>,
    /// Colorize text results. Ignored for JSON.
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// The `--output` flag wins over the configured format.
    pub fn resolve_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }

    /// Whether text results may be colorized, given `--no-color`.
    pub fn use_color(&self, no_color_flag: bool) -> bool {
        self.color && !no_color_flag
    }
}
