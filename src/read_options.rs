//! Options for controlled catalog reading into a [`crate::Codec`].

use crate::formats::FormatType;

/// Read behavior options for [`crate::Codec`] file-loading APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Format to use instead of inferring one from the file extension.
    pub format_hint: Option<FormatType>,
    /// Skip entries equal (by source and target) to one already loaded.
    pub dedupe: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            format_hint: None,
            dedupe: true,
        }
    }
}

impl ReadOptions {
    /// Creates default read options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a format hint.
    pub fn with_format_hint(mut self, format_hint: Option<FormatType>) -> Self {
        self.format_hint = format_hint;
        self
    }

    /// Enables/disables content deduplication.
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }
}
