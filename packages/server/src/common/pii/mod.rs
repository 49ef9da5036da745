//! PII (Personally Identifiable Information) detection and masking
//!
//! Email bodies are scrubbed before classification. Each detected span is
//! replaced with a bracketed category placeholder and reported back as a
//! [`MaskedEntity`].
//!
//! # Detection Methods
//!
//! - **Entity model**: person names, tagged by an external NER model (`full_name`)
//! - **Regex bank**: structured PII, one pattern per category, run in a fixed order
//!   (email, phone_number, dob, credit_debit_no, aadhar_num, cvv_no, expiry_no)
//!
//! # Masking Modes
//!
//! - `Cumulative`: each regex category scans the previous category's output,
//!   placeholders included
//! - `OriginalText`: every regex category scans the same snapshot
//!
//! # Examples
//!
//! ```rust
//! use triage_core::common::pii::{MaskingMode, RegexBank};
//!
//! let bank = RegexBank::compile().unwrap();
//! let (masked, entities) = bank
//!     .mask_with_regex("My email is alice@example.com", MaskingMode::Cumulative)
//!     .unwrap();
//!
//! assert_eq!(masked, "My email is [email]");
//! assert_eq!(entities[0].position, [12, 29]);
//! ```

pub mod detector;
pub mod ner_detector;
pub mod redactor;

// Re-export main types and functions
pub use detector::{Category, MaskingMode, RegexBank};
pub use ner_detector::{mask_full_names, person_spans, TaggedSpan, PERSON_LABELS};
pub use redactor::{byte_offset, char_offset, rewrite_spans, MaskedEntity, Span};
