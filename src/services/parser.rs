//! Extracts `(title, reason)` pairs from numbered-list model output.

use regex::Regex;

use crate::models::Suggestion;

/// `N. **Title**: Reason`, the digits and colon being optional
pub const DEFAULT_LINE_PATTERN: &str = r"^\d*\.\s*\*\*(.*?)\*\*:?\s+(.*)$";

/// Most suggestions kept from a single response
pub const MAX_SUGGESTIONS: usize = 6;

/// Lenient line matcher for generated suggestion lists
#[derive(Debug, Clone)]
pub struct SuggestionParser {
    line_pattern: Regex,
    max_suggestions: usize,
}

impl Default for SuggestionParser {
    fn default() -> Self {
        Self {
            line_pattern: Regex::new(DEFAULT_LINE_PATTERN).expect("Invalid DEFAULT_LINE_PATTERN"),
            max_suggestions: MAX_SUGGESTIONS,
        }
    }
}

impl SuggestionParser {
    /// Parser with a custom line pattern
    ///
    /// The pattern must have two capture groups: the title, then the reason.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            line_pattern: Regex::new(pattern)?,
            max_suggestions: MAX_SUGGESTIONS,
        })
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Parse suggestions in order of appearance, dropping non-matching lines
    pub fn parse(&self, text: &str) -> Vec<Suggestion> {
        text.lines()
            .filter_map(|line| {
                let caps = self.line_pattern.captures(line)?;
                Some(Suggestion {
                    title: caps.get(1)?.as_str().trim().to_string(),
                    reason: caps.get(2)?.as_str().trim().to_string(),
                })
            })
            .take(self.max_suggestions)
            .collect()
    }
}
