//! Parsing options and configuration.

/// Options for parsing resumes.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode for per-page decode failures
    pub error_mode: ErrorMode,

    /// Whether to decode PDF pages in parallel
    pub parallel: bool,

    /// Vertical tolerance for page-level line grouping
    pub line_tolerance: f32,

    /// Tighter vertical tolerance used when regrouping education lines
    pub statement_tolerance: f32,

    /// Minimum font size for a non-bold heading line
    pub heading_min_font_size: f32,

    /// Lines longer than this (in characters) are never headings
    pub max_heading_chars: usize,

    /// How many leading blocks are considered when picking the name
    pub name_block_window: usize,

    /// Token count the opening lines must exceed to count as a summary
    pub summary_token_threshold: usize,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages that fail to decode).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel page decoding.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the page-level line tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the education statement tolerance.
    pub fn with_statement_tolerance(mut self, tolerance: f32) -> Self {
        self.statement_tolerance = tolerance;
        self
    }

    /// Set the minimum heading font size.
    pub fn with_heading_min_font_size(mut self, size: f32) -> Self {
        self.heading_min_font_size = size;
        self
    }

    /// Set the maximum heading length.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Set the summary token threshold.
    pub fn with_summary_token_threshold(mut self, tokens: usize) -> Self {
        self.summary_token_threshold = tokens;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            line_tolerance: 5.0,
            statement_tolerance: 1.5,
            heading_min_font_size: 12.0,
            max_heading_chars: 50,
            name_block_window: 10,
            summary_token_threshold: 50,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    #[default]
    Strict,
    /// Skip pages that fail to decode and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .lenient()
            .sequential()
            .with_line_tolerance(4.0)
            .with_statement_tolerance(1.0)
            .with_max_heading_chars(30);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.parallel);
        assert_eq!(options.line_tolerance, 4.0);
        assert_eq!(options.statement_tolerance, 1.0);
        assert_eq!(options.max_heading_chars, 30);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.parallel);
        assert_eq!(options.line_tolerance, 5.0);
        assert_eq!(options.statement_tolerance, 1.5);
        assert_eq!(options.heading_min_font_size, 12.0);
        assert_eq!(options.name_block_window, 10);
        assert_eq!(options.summary_token_threshold, 50);
    }
}
