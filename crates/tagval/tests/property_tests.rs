//! Property-based tests for the tag language and the validator.

use nebula_tagval::funcs::builtin_funcs;
use nebula_tagval::tag::{TagParser, TagScanner, Token};
use nebula_tagval::{Validator, validate_value};
use proptest::prelude::*;

const RULES: &[&str] = &["required", "alpha", "numeric", "min(1)", "max(9)", "len(2|5)"];

fn rule() -> impl Strategy<Value = String> {
    prop::sample::select(RULES).prop_map(str::to_owned)
}

/// Well-formed tags: up to three chunks of comma-joined rules and or-groups.
fn tag() -> impl Strategy<Value = String> {
    let group = prop::collection::vec(rule(), 1..3).prop_map(|alts| alts.join("|"));
    let chunk = prop::collection::vec(group, 0..3).prop_map(|rules| rules.join(","));
    prop::collection::vec(chunk, 1..4).prop_map(|chunks| chunks.join(" ; "))
}

// ============================================================================
// SCANNER AND PARSER NEVER PANIC
// ============================================================================

proptest! {
    #[test]
    fn scanner_terminates(raw in ".{0,64}") {
        let tokens: Vec<(Token, String)> = TagScanner::new(&raw).collect();
        let last = tokens.last().map(|(token, _)| *token);
        prop_assert!(matches!(last, Some(Token::EndOfInput | Token::Illegal)));
        prop_assert!(tokens.len() <= raw.chars().count() + 1);
    }

    #[test]
    fn parser_accepts_or_rejects(raw in "[a-z(),|; 0-9-]{0,48}") {
        let funcs = builtin_funcs();
        let _ = TagParser::new(&funcs).parse(&raw);
    }

    #[test]
    fn parse_is_deterministic(raw in tag()) {
        let funcs = builtin_funcs();
        let parser = TagParser::new(&funcs);
        let first = parser.parse(&raw);
        let second = parser.parse(&raw);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn well_formed_tags_parse(raw in tag()) {
        let funcs = builtin_funcs();
        let chunk = TagParser::new(&funcs).parse(&raw);
        prop_assert!(chunk.is_ok(), "{raw}: {chunk:?}");
        prop_assert_eq!(chunk.map(|c| c.depth()).ok(), Some(raw.matches(';').count() + 1));
    }
}

// ============================================================================
// VALIDATION PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn validation_is_repeatable(value in ".{0,20}", raw in tag()) {
        let first = validate_value(&value, &raw).map(|e| e.to_string());
        let second = validate_value(&value, &raw).map(|e| e.to_string());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn optional_skips_empty_values(raw in tag()) {
        let tagged = format!("optional,{raw}");
        prop_assert!(validate_value(&"", &tagged).unwrap().is_empty());
    }

    #[test]
    fn required_matches_emptiness(value in ".{0,8}") {
        let errors = validate_value(&value, "required").unwrap();
        prop_assert_eq!(errors.is_empty(), !value.is_empty());
    }

    #[test]
    fn len_counts_bytes(value in "\\PC{0,12}", lo in 0usize..6, span in 0usize..6) {
        let hi = lo + span;
        let errors = Validator::new()
            .validate_value(&value, &format!("len({lo}|{hi})"))
            .unwrap();
        prop_assert_eq!(errors.is_empty(), (lo..=hi).contains(&value.len()));
    }

    #[test]
    fn element_rules_report_each_failing_index(items in prop::collection::vec("[a-z0-9]{1,4}", 0..8)) {
        let errors = validate_value(&items, "; alpha").unwrap();
        let failing: Vec<String> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.chars().any(|c| c.is_ascii_digit()))
            .map(|(index, _)| format!("[{index}]"))
            .collect();
        let reported: Vec<String> = errors.iter().map(|e| e.path().to_owned()).collect();
        prop_assert_eq!(reported, failing);
    }
}
