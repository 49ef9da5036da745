//! End-to-end masking behaviour: entity model first, then the regex bank.

mod common;

use common::{init_tracing, unmask};
use triage_core::common::pii::{Category, MaskingMode, RegexBank, TaggedSpan};
use triage_core::common::PipelineError;
use triage_core::kernel::test_dependencies::MockEntityTagger;
use triage_core::kernel::{mask_pii, TestDependencies};

const MIXED: &str = "Mail a.b@corp.com or call 9876543210. DOB 1990/01/15. \
Card 4111 1111 1111 1111, cvv 737, exp 12/27. Aadhar 1234-5678-9012.";

const MIXED_MASKED: &str = "Mail [email] or call [phone_number]. DOB [dob]. \
Card [credit_debit_no], cvv [cvv_no], exp [expiry_no]. Aadhar [aadhar_num].";

#[tokio::test]
async fn email_is_masked() {
    init_tracing();
    let deps = TestDependencies::new().into_deps();

    let result = mask_pii("My email is alice@example.com", &deps).await.unwrap();

    assert_eq!(result.masked_text, "My email is [email]");
    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].position, [12, 29]);
    assert_eq!(result.entities[0].classification, Category::Email);
    assert_eq!(result.entities[0].entity, "alice@example.com");
}

#[tokio::test]
async fn phone_number_is_masked() {
    let deps = TestDependencies::new().into_deps();

    let result = mask_pii("Call 9876543210 now", &deps).await.unwrap();

    assert_eq!(result.masked_text, "Call [phone_number] now");
    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].classification, Category::PhoneNumber);
    assert_eq!(result.entities[0].entity, "9876543210");
    assert_eq!(result.entities[0].position, [5, 15]);
}

#[tokio::test]
async fn dob_and_phone_keep_reading_order() {
    let deps = TestDependencies::new().into_deps();

    let result = mask_pii("DOB 15-01-1990, phone 9876543210", &deps)
        .await
        .unwrap();

    assert_eq!(result.masked_text, "DOB [dob], phone [phone_number]");

    // phone pass runs before the dob pass
    assert_eq!(result.entities[0].classification, Category::PhoneNumber);
    assert_eq!(result.entities[0].position, [22, 32]);
    assert_eq!(result.entities[1].classification, Category::Dob);
    assert_eq!(result.entities[1].entity, "15-01-1990");
    assert_eq!(result.entities[1].position, [4, 14]);
}

#[tokio::test]
async fn text_without_pii_is_unchanged() {
    let deps = TestDependencies::new().into_deps();
    let body = "Hi team, the VPN is down again. Can someone take a look?";

    let result = mask_pii(body, &deps).await.unwrap();

    assert_eq!(result.masked_text, body);
    assert!(result.entities.is_empty());
}

#[tokio::test]
async fn cvv_next_to_card_does_not_corrupt_offsets() {
    let deps = TestDependencies::new().into_deps();

    let result = mask_pii("CVV is 123 for card 1234567890123", &deps)
        .await
        .unwrap();

    assert_eq!(result.masked_text, "CVV is [cvv_no] for card [credit_debit_no]");
    let categories: Vec<Category> = result.entities.iter().map(|e| e.classification).collect();
    assert_eq!(categories, vec![Category::CreditDebitNo, Category::CvvNo]);
    assert_eq!(result.entities[0].position, [20, 33]);
    assert_eq!(result.entities[1].position, [7, 10]);
    assert_eq!(unmask(&result.masked_text, &result.entities), "CVV is 123 for card 1234567890123");
}

#[tokio::test]
async fn every_category_in_one_body() {
    let deps = TestDependencies::new().into_deps();

    let result = mask_pii(MIXED, &deps).await.unwrap();

    assert_eq!(result.masked_text, MIXED_MASKED);
    let categories: Vec<Category> = result.entities.iter().map(|e| e.classification).collect();
    assert_eq!(categories, Category::REGEX_PASS_ORDER.to_vec());
}

#[tokio::test]
async fn names_come_before_pattern_matches() {
    let deps = TestDependencies::new()
        .mock_tagger(MockEntityTagger::new().with_person("Priya Sharma"))
        .into_deps();

    let result = mask_pii("Reach me at p@x.io or 9876543210. Thanks, Priya Sharma", &deps)
        .await
        .unwrap();

    assert_eq!(
        result.masked_text,
        "Reach me at [email] or [phone_number]. Thanks, [full_name]"
    );
    assert_eq!(result.entities[0].classification, Category::FullName);
    assert!(result.entities[1..]
        .iter()
        .all(|e| e.classification != Category::FullName));
}

#[tokio::test]
async fn unmasking_restores_the_original() {
    let body = format!("From Anita Rao: {} Regards, Anita Rao", MIXED);
    let deps = TestDependencies::new()
        .mock_tagger(MockEntityTagger::new().with_person("Anita Rao"))
        .into_deps();

    let result = mask_pii(&body, &deps).await.unwrap();

    assert_eq!(result.entities.len(), 9);
    assert_eq!(unmask(&result.masked_text, &result.entities), body);
}

#[test]
fn length_accounting_per_category() {
    let bank = RegexBank::compile().unwrap();
    let mut text = MIXED.to_string();

    for category in Category::REGEX_PASS_ORDER {
        let spans = bank.find_spans(&text, category);
        let removed: usize = spans.iter().map(|s| s.end - s.start).sum();
        let added = spans.len() * category.placeholder().len();

        let (masked, _) = bank.detect_and_mask(&text, category).unwrap();

        assert_eq!(masked.len(), text.len() - removed + added, "{}", category);
        text = masked;
    }
}

#[test]
fn each_pass_is_idempotent() {
    let bank = RegexBank::compile().unwrap();
    let mut text = MIXED.to_string();

    for category in Category::REGEX_PASS_ORDER {
        let (masked, entities) = bank.detect_and_mask(&text, category).unwrap();
        assert!(!entities.is_empty(), "{}", category);
        assert!(bank.find_spans(&masked, category).is_empty(), "{}", category);

        // each entity splices back into this pass's output
        assert_eq!(unmask(&masked, &entities), text);
        text = masked;
    }
}

#[tokio::test]
async fn original_text_mode_skips_cross_category_overlaps() {
    let deps = TestDependencies::new()
        .masking_mode(MaskingMode::OriginalText)
        .into_deps();

    let result = mask_pii("card 1234 567 890 1234", &deps).await.unwrap();

    assert_eq!(result.masked_text, "card [credit_debit_no]");
    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].position, [5, 22]);
}

#[tokio::test]
async fn tagger_failure_leaks_nothing() {
    let deps = TestDependencies::new()
        .mock_tagger(MockEntityTagger::failing())
        .into_deps();

    let err = mask_pii("alice@example.com", &deps).await.unwrap_err();
    assert!(matches!(err, PipelineError::InferenceFailure { .. }));
}

#[tokio::test]
async fn malformed_tagger_span_fails_the_request() {
    let deps = TestDependencies::new()
        .mock_tagger(MockEntityTagger::new().with_spans(vec![TaggedSpan::new("PER", 3, 500)]))
        .into_deps();

    let err = mask_pii("Hi Bob", &deps).await.unwrap_err();
    assert!(matches!(err, PipelineError::MalformedEntitySpan { .. }));
}
