use serde::Serialize;

use super::detector::Category;
use crate::common::error::{PipelineError, PipelineResult};

/// A detected span of sensitive text.
///
/// Offsets are half-open byte offsets into the exact text the detector scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub category: Category,
}

impl Span {
    pub fn new(start: usize, end: usize, category: Category) -> Self {
        Self {
            start,
            end,
            category,
        }
    }

    fn malformed(&self, text: &str, reason: &'static str) -> PipelineError {
        PipelineError::MalformedEntitySpan {
            start: self.start,
            end: self.end,
            len: text.len(),
            reason,
        }
    }

    /// Reject spans that cannot be spliced into `text`.
    pub fn validate(&self, text: &str) -> PipelineResult<()> {
        if self.end <= self.start {
            return Err(self.malformed(text, "end must be greater than start"));
        }
        if self.end > text.len() {
            return Err(self.malformed(text, "span extends past end of text"));
        }
        if !text.is_char_boundary(self.start) || !text.is_char_boundary(self.end) {
            return Err(self.malformed(text, "span splits a character"));
        }
        Ok(())
    }
}

/// One masked piece of PII as reported to callers.
///
/// `position` is a `[start, end]` pair of character offsets into the text the
/// detector scanned, and `entity` is the substring that was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedEntity {
    pub position: [usize; 2],
    pub classification: Category,
    pub entity: String,
}

/// Character offset of a byte offset that lies on a character boundary.
pub fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

/// Byte offset of the `char_offset`-th character, or `None` past the end.
pub fn byte_offset(text: &str, char_offset: usize) -> Option<usize> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
}

/// Replace every span with its category placeholder.
///
/// Spans are applied in descending order of `start`, so an edit never moves a
/// span that has not been applied yet. Entities are returned in application
/// order (rightmost first). Nothing is applied unless every span is valid and
/// no two spans overlap.
pub fn rewrite_spans(text: &str, mut spans: Vec<Span>) -> PipelineResult<(String, Vec<MaskedEntity>)> {
    if spans.is_empty() {
        return Ok((text.to_string(), Vec::new()));
    }

    for span in &spans {
        span.validate(text)?;
    }

    spans.sort_by(|a, b| b.start.cmp(&a.start));

    // After the sort, pair[1] starts at or before pair[0]
    for pair in spans.windows(2) {
        if pair[1].end > pair[0].start {
            return Err(pair[1].malformed(text, "span overlaps another span in the same pass"));
        }
    }

    let mut result = text.to_string();
    let mut entities = Vec::with_capacity(spans.len());

    for span in &spans {
        entities.push(MaskedEntity {
            position: [char_offset(text, span.start), char_offset(text, span.end)],
            classification: span.category,
            entity: text[span.start..span.end].to_string(),
        });
        result.replace_range(span.start..span.end, span.category.placeholder());
    }

    Ok((result, entities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_right_to_left() {
        let text = "a@b.co and c@d.co";
        let spans = vec![
            Span::new(0, 6, Category::Email),
            Span::new(11, 17, Category::Email),
        ];

        let (masked, entities) = rewrite_spans(text, spans).unwrap();

        assert_eq!(masked, "[email] and [email]");
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].position, [11, 17]);
        assert_eq!(entities[0].entity, "c@d.co");
        assert_eq!(entities[1].position, [0, 6]);
        assert_eq!(entities[1].entity, "a@b.co");
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let text = "x 111 y 222 z 333";
        let ascending = vec![
            Span::new(2, 5, Category::CvvNo),
            Span::new(8, 11, Category::CvvNo),
            Span::new(14, 17, Category::CvvNo),
        ];
        let mut shuffled = ascending.clone();
        shuffled.swap(0, 2);
        shuffled.swap(1, 2);

        let a = rewrite_spans(text, ascending).unwrap();
        let b = rewrite_spans(text, shuffled).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.0, "x [cvv_no] y [cvv_no] z [cvv_no]");
    }

    #[test]
    fn test_length_accounting() {
        let text = "call 9876543210 or 9123456780 today";
        let spans = vec![
            Span::new(5, 15, Category::PhoneNumber),
            Span::new(19, 29, Category::PhoneNumber),
        ];
        let removed: usize = spans.iter().map(|s| s.end - s.start).sum();
        let added: usize = spans.iter().map(|s| s.category.placeholder().len()).sum();

        let (masked, _) = rewrite_spans(text, spans).unwrap();

        assert_eq!(masked.len(), text.len() - removed + added);
    }

    #[test]
    fn test_entity_splices_back() {
        let text = "id 1234 5678 9012 end";
        let (masked, entities) =
            rewrite_spans(text, vec![Span::new(3, 17, Category::AadharNum)]).unwrap();

        let entity = &entities[0];
        let placeholder = entity.classification.placeholder();
        let start = entity.position[0];
        let restored = format!(
            "{}{}{}",
            &masked[..start],
            entity.entity,
            &masked[start + placeholder.len()..]
        );
        assert_eq!(restored, text);
    }

    #[test]
    fn test_rejects_inverted_span() {
        let err = rewrite_spans("hello", vec![Span::new(3, 3, Category::CvvNo)]).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedEntitySpan { .. }));
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let err = rewrite_spans("hello", vec![Span::new(2, 9, Category::CvvNo)]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedEntitySpan { len: 5, end: 9, .. }
        ));
    }

    #[test]
    fn test_rejects_overlap_without_partial_edit() {
        let spans = vec![
            Span::new(0, 4, Category::FullName),
            Span::new(2, 6, Category::FullName),
        ];
        let err = rewrite_spans("abcdefgh", spans).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedEntitySpan { .. }));
    }

    #[test]
    fn test_rejects_split_character() {
        // "é" is two bytes
        let err = rewrite_spans("é123", vec![Span::new(1, 4, Category::CvvNo)]).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedEntitySpan { .. }));
    }

    #[test]
    fn test_positions_are_character_offsets() {
        let text = "Zoë: 123";
        let start = text.find("123").unwrap();
        let (masked, entities) =
            rewrite_spans(text, vec![Span::new(start, start + 3, Category::CvvNo)]).unwrap();

        assert_eq!(masked, "Zoë: [cvv_no]");
        assert_eq!(entities[0].position, [5, 8]);
    }

    #[test]
    fn test_offset_conversion() {
        let text = "añb";
        assert_eq!(byte_offset(text, 0), Some(0));
        assert_eq!(byte_offset(text, 2), Some(3));
        assert_eq!(byte_offset(text, 3), Some(4));
        assert_eq!(byte_offset(text, 4), None);
        assert_eq!(char_offset(text, 3), 2);
    }

    #[test]
    fn test_no_spans() {
        let (masked, entities) = rewrite_spans("nothing here", Vec::new()).unwrap();
        assert_eq!(masked, "nothing here");
        assert!(entities.is_empty());
    }
}
