// Integration tests for the Pattern Compiler
// Query validation, regex construction and highlighting of compiled matches

use corpus_search::{
    compile_query, parse_query, pattern_to_regex, Highlighter, QueryRejection, WildcardClass,
};

fn matched<'t>(query: &str, case_sensitive: bool, text: &'t str) -> Vec<&'t str> {
    let pattern = compile_query(query, case_sensitive, &WildcardClass::default()).unwrap();
    pattern.find_iter(text).map(|m| m.as_str()).collect()
}

// ============ Query Workflows ============

#[test]
fn test_plain_word_workflow() {
    let parsed = parse_query("cat").unwrap();
    assert!(!parsed.anchored);
    assert_eq!(parsed.alternatives, vec!["cat"]);

    let regex = pattern_to_regex(&parsed, &WildcardClass::default());
    assert_eq!(regex, r"\bcat\b");
}

#[test]
fn test_wildcard_workflow() {
    let parsed = parse_query("cat*").unwrap();
    let regex = pattern_to_regex(&parsed, &WildcardClass::word_chars());
    assert_eq!(regex, r"\bcat[\w]+\b");
}

#[test]
fn test_alternation_workflow() {
    let parsed = parse_query("cat | dog").unwrap();
    assert_eq!(parsed.alternatives, vec!["cat", "dog"]);

    let regex = pattern_to_regex(&parsed, &WildcardClass::default());
    assert_eq!(regex, r"(?:\bcat\b|\bdog\b)");
}

#[test]
fn test_anchored_workflow() {
    let parsed = parse_query("^What").unwrap();
    assert!(parsed.anchored);

    let regex = pattern_to_regex(&parsed, &WildcardClass::default());
    assert_eq!(regex, r"^What\b");
}

// ============ Whole-Token Matching ============

#[test]
fn test_plain_word_does_not_match_inside_tokens() {
    assert_eq!(matched("cat", false, "The cat sat."), vec!["cat"]);
    assert!(matched("cat", false, "The cats sat on cats.").is_empty());
    assert!(matched("cat", false, "A concatenated list").is_empty());
}

#[test]
fn test_wildcard_needs_at_least_one_character() {
    assert!(matched("cat*", false, "The cat sat.").is_empty());
    assert_eq!(matched("cat*", false, "The cats sat on cats."), vec!["cats", "cats"]);
}

#[test]
fn test_wildcard_covers_apostrophes_and_hyphens() {
    assert_eq!(matched("cat*", false, "the cat's toy"), vec!["cat's"]);
    assert_eq!(matched("well*", false, "a well-known fact"), vec!["well-known"]);
    assert_eq!(matched("cat*", false, "the cat’s toy"), vec!["cat’s"]);
}

#[test]
fn test_leading_and_trailing_wildcard() {
    assert_eq!(matched("*cat*", false, "bobcats and concatenation"), vec!["bobcats", "concatenation"]);
}

#[test]
fn test_period_is_literal() {
    assert_eq!(matched("U.S.", true, "Born in the U.S. in 1990"), vec!["U.S."]);
    assert!(matched("U.S.", true, "Born in the USA").is_empty());
    assert!(matched("a.b", false, "axb").is_empty());
}

#[test]
fn test_anchor_matches_entry_opening_only() {
    assert_eq!(matched("^what", false, "What is it?"), vec!["What"]);
    assert!(matched("^what", false, "So what is it?").is_empty());
    assert_eq!(matched("^*", false, "Which river?"), vec!["Which"]);
}

#[test]
fn test_caret_inside_query_is_literal() {
    assert_eq!(matched("x^2", true, "solve x^2 now"), vec!["x^2"]);
}

#[test]
fn test_case_flag() {
    assert_eq!(matched("the", false, "The end of the road"), vec!["The", "the"]);
    assert_eq!(matched("the", true, "The end of the road"), vec!["the"]);
    assert_eq!(matched("The", true, "The end of the road"), vec!["The"]);
}

#[test]
fn test_alternatives_each_whole_token() {
    assert_eq!(matched("cat|cats", false, "cat and cats"), vec!["cat", "cats"]);
}

#[test]
fn test_custom_wildcard_class() {
    let letters = WildcardClass::new("a-z").unwrap();
    let pattern = compile_query("cat*", false, &letters).unwrap();
    let found: Vec<&str> = pattern.find_iter("cats cat9").map(|m| m.as_str()).collect();
    assert_eq!(found, vec!["cats"]);
}

// ============ Rejections ============

#[test]
fn test_forbidden_characters_rejected() {
    for query in ["a(b", "a)b", "[ab]", "a?", "end$", "a+", r"a\b"] {
        let err = compile_query(query, false, &WildcardClass::default()).unwrap_err();
        assert!(
            matches!(err, QueryRejection::ForbiddenCharacter { .. }),
            "{} should be rejected, got {:?}",
            query,
            err
        );
    }
}

#[test]
fn test_bare_symbols_rejected() {
    assert_eq!(
        compile_query("*", false, &WildcardClass::default()).unwrap_err(),
        QueryRejection::BareWildcard { symbol: '*' }
    );
    assert_eq!(
        compile_query(" ^ ", false, &WildcardClass::default()).unwrap_err(),
        QueryRejection::BareWildcard { symbol: '^' }
    );
    assert_eq!(
        compile_query("cat|*", false, &WildcardClass::default()).unwrap_err(),
        QueryRejection::BareWildcard { symbol: '*' }
    );
}

#[test]
fn test_empty_queries_rejected() {
    assert_eq!(parse_query("   ").unwrap_err(), QueryRejection::Empty);
    assert_eq!(parse_query("cat||dog").unwrap_err(), QueryRejection::EmptyAlternative);
    assert_eq!(parse_query("^|cat").unwrap_err(), QueryRejection::EmptyAlternative);
}

#[test]
fn test_rejection_messages_are_user_facing() {
    let err = parse_query("a(b").unwrap_err();
    assert!(err.to_string().contains("'('"));

    let err = parse_query("*").unwrap_err();
    assert!(err.to_string().contains("vocabulary table"));
}

#[test]
fn test_invalid_wildcard_class_rejected() {
    let err = WildcardClass::new("z-a").unwrap_err();
    assert!(matches!(err, QueryRejection::InvalidWildcardClass { .. }));
}

// ============ Highlighting Compiled Matches ============

#[test]
fn test_highlight_wildcard_matches() {
    let text = "The cats sat on cats.";
    let tokens: Vec<String> = matched("cat*", false, text).into_iter().map(String::from).collect();

    let rendered = Highlighter::default().render(text, &tokens);
    assert_eq!(rendered, "The **cats** sat on **cats**.");
}

#[test]
fn test_highlight_overlapping_alternatives_stays_well_formed() {
    let text = "cat and cats";
    let tokens: Vec<String> = matched("cat|cats", false, text).into_iter().map(String::from).collect();

    let rendered = Highlighter::default().render(text, &tokens);
    assert_eq!(rendered, "**cat** and **cats**");
}
