use regex::Regex;
use serde::Serialize;

use super::redactor::{rewrite_spans, MaskedEntity, Span};
use crate::common::error::{PipelineError, PipelineResult};

/// Category of PII that was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Person names, found by the entity model only
    FullName,
    Email,
    PhoneNumber,
    Dob,
    CreditDebitNo,
    AadharNum,
    CvvNo,
    ExpiryNo,
}

impl Category {
    /// Regex categories in the order their passes run.
    pub const REGEX_PASS_ORDER: [Category; 7] = [
        Category::Email,
        Category::PhoneNumber,
        Category::Dob,
        Category::CreditDebitNo,
        Category::AadharNum,
        Category::CvvNo,
        Category::ExpiryNo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FullName => "full_name",
            Category::Email => "email",
            Category::PhoneNumber => "phone_number",
            Category::Dob => "dob",
            Category::CreditDebitNo => "credit_debit_no",
            Category::AadharNum => "aadhar_num",
            Category::CvvNo => "cvv_no",
            Category::ExpiryNo => "expiry_no",
        }
    }

    /// Literal token written in place of a masked span.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Category::FullName => "[full_name]",
            Category::Email => "[email]",
            Category::PhoneNumber => "[phone_number]",
            Category::Dob => "[dob]",
            Category::CreditDebitNo => "[credit_debit_no]",
            Category::AadharNum => "[aadhar_num]",
            Category::CvvNo => "[cvv_no]",
            Category::ExpiryNo => "[expiry_no]",
        }
    }

    /// Built-in pattern, `None` for categories only the entity model finds.
    pub fn default_pattern(&self) -> Option<&'static str> {
        match self {
            Category::FullName => None,
            Category::Email => Some(r"\b[\w.-]+?@\w+?\.\w+?\b"),
            // A digit can never follow the trailing \b here, so no lookahead is needed
            Category::PhoneNumber => Some(r"\b(?:(?:\+|0)91[\s.-]?)?\d{10}\b"),
            Category::Dob => Some(r"\b\d{2}[-/]\d{2}[-/]\d{4}\b|\b\d{4}[-/]\d{2}[-/]\d{2}\b"),
            Category::CreditDebitNo => Some(r"\b(?:\d[ -]*?){13,19}\b"),
            Category::AadharNum => Some(r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}\b"),
            Category::CvvNo => Some(r"\b\d{3}\b"),
            Category::ExpiryNo => Some(r"\b(0[1-9]|1[0-2])/?([0-9]{2}|[0-9]{4})\b"),
        }
    }

    /// Suffix of the `PII_PATTERN_*` environment override for this category.
    pub fn env_suffix(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What each regex category scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskingMode {
    /// Each category scans the output of the previous one, placeholders included
    #[default]
    Cumulative,
    /// Every category scans the same snapshot; overlaps resolve in pass order
    OriginalText,
}

impl std::str::FromStr for MaskingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cumulative" => Ok(MaskingMode::Cumulative),
            "original_text" | "original" => Ok(MaskingMode::OriginalText),
            other => Err(format!("unknown masking mode: {}", other)),
        }
    }
}

/// Compiled pattern battery, one matcher per regex category, in pass order.
///
/// Built once at startup and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct RegexBank {
    patterns: Vec<(Category, Regex)>,
}

impl RegexBank {
    /// Compile the built-in patterns.
    pub fn compile() -> PipelineResult<Self> {
        Self::with_overrides(&[])
    }

    /// Compile the built-in patterns, replacing any category listed in `overrides`.
    pub fn with_overrides(overrides: &[(Category, String)]) -> PipelineResult<Self> {
        let mut patterns = Vec::with_capacity(Category::REGEX_PASS_ORDER.len());

        for category in Category::REGEX_PASS_ORDER {
            let source = overrides
                .iter()
                .rev()
                .find(|(c, _)| *c == category)
                .map(|(_, p)| p.as_str())
                .or_else(|| category.default_pattern());

            if let Some(source) = source {
                let regex = Regex::new(source)
                    .map_err(|source| PipelineError::RegexCompilation { category, source })?;
                patterns.push((category, regex));
            }
        }

        Ok(Self { patterns })
    }

    /// Matcher for a category, if it has one.
    pub fn pattern(&self, category: Category) -> Option<&Regex> {
        self.patterns
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, r)| r)
    }

    /// All non-empty, non-overlapping matches of one category in `text`.
    pub fn find_spans(&self, text: &str, category: Category) -> Vec<Span> {
        let Some(regex) = self.pattern(category) else {
            return Vec::new();
        };

        regex
            .find_iter(text)
            .filter(|m| m.start() < m.end())
            .map(|m| Span::new(m.start(), m.end(), category))
            .collect()
    }

    /// Mask every match of one category in `text`.
    ///
    /// Entities come back rightmost first, positions relative to `text`.
    pub fn detect_and_mask(
        &self,
        text: &str,
        category: Category,
    ) -> PipelineResult<(String, Vec<MaskedEntity>)> {
        rewrite_spans(text, self.find_spans(text, category))
    }

    /// Run every regex category over `text` in pass order.
    pub fn mask_with_regex(
        &self,
        text: &str,
        mode: MaskingMode,
    ) -> PipelineResult<(String, Vec<MaskedEntity>)> {
        match mode {
            MaskingMode::Cumulative => self.mask_cumulative(text),
            MaskingMode::OriginalText => self.mask_against_snapshot(text),
        }
    }

    fn mask_cumulative(&self, text: &str) -> PipelineResult<(String, Vec<MaskedEntity>)> {
        let mut current = text.to_string();
        let mut entities = Vec::new();

        for category in Category::REGEX_PASS_ORDER {
            let (next, found) = self.detect_and_mask(&current, category)?;
            if !found.is_empty() {
                tracing::debug!(category = %category, count = found.len(), "Masked regex matches");
            }
            current = next;
            entities.extend(found);
        }

        Ok((current, entities))
    }

    fn mask_against_snapshot(&self, text: &str) -> PipelineResult<(String, Vec<MaskedEntity>)> {
        let mut accepted: Vec<Span> = Vec::new();

        for category in Category::REGEX_PASS_ORDER {
            for span in self.find_spans(text, category) {
                let overlaps = accepted
                    .iter()
                    .any(|existing| span.start < existing.end && existing.start < span.end);

                if overlaps {
                    tracing::debug!(category = %category, "Dropped match overlapping an earlier category");
                    continue;
                }
                accepted.push(span);
            }
        }

        let (masked, mut entities) = rewrite_spans(text, accepted)?;

        // Regroup by pass order; the stable sort keeps each group rightmost first
        entities.sort_by_key(|e| pass_index(e.classification));

        Ok((masked, entities))
    }
}

fn pass_index(category: Category) -> usize {
    Category::REGEX_PASS_ORDER
        .iter()
        .position(|c| *c == category)
        .unwrap_or(usize::MAX)
}
