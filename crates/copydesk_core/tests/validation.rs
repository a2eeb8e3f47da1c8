use copydesk_core::{
    clamp_progress, display_progress, is_title_valid, normalize_secondary_intents,
    parse_keywords, sanitize_title, Intent, JobStatus, MAX_TITLE_LENGTH,
};

#[test]
fn title_length_bounds() {
    assert!(!is_title_valid(""));
    assert!(!is_title_valid("   \t "));
    assert!(is_title_valid("a"));

    let exact: String = "标".repeat(MAX_TITLE_LENGTH);
    assert!(is_title_valid(&exact));

    let over: String = "x".repeat(MAX_TITLE_LENGTH + 1);
    assert!(!is_title_valid(&over));
}

#[test]
fn sanitize_collapses_whitespace() {
    assert_eq!(sanitize_title("  焦虑   与\n睡眠  "), "焦虑 与 睡眠");
    assert_eq!(sanitize_title("\t\n"), "");
}

#[test]
fn keywords_skip_blank_lines() {
    let keywords = parse_keywords(" 焦虑 \n\n睡眠\n   \n");
    assert_eq!(keywords, vec!["焦虑".to_string(), "睡眠".to_string()]);
    assert!(parse_keywords("\n  \n").is_empty());
}

#[test]
fn secondary_intents_exclude_primary_and_duplicates() {
    let secondary = [
        Intent::Howto,
        Intent::Decision,
        Intent::Howto,
        Intent::Decision,
        Intent::Editorial,
    ];
    let normalized = normalize_secondary_intents(Intent::Howto, &secondary);
    assert_eq!(normalized, vec![Intent::Decision, Intent::Editorial]);

    // Idempotent.
    assert_eq!(
        normalize_secondary_intents(Intent::Howto, &normalized),
        normalized
    );
}

#[test]
fn intent_keys_parse_back() {
    for intent in Intent::ALL {
        assert_eq!(intent.key().parse::<Intent>(), Ok(intent));
    }
    assert!("poetry".parse::<Intent>().is_err());
}

#[test]
fn progress_is_clamped() {
    assert_eq!(clamp_progress(-5.0), 0.0);
    assert_eq!(clamp_progress(140.0), 100.0);
    assert_eq!(clamp_progress(42.0), 42.0);
    assert_eq!(clamp_progress(f64::NAN), 0.0);
    assert_eq!(display_progress(JobStatus::Running, Some(-5.0), None), 0);
    assert_eq!(display_progress(JobStatus::Running, Some(140.0), None), 100);
}

#[test]
fn progress_falls_back_to_last_known_then_heuristic() {
    assert_eq!(display_progress(JobStatus::Running, None, Some(33.0)), 33);
    assert_eq!(display_progress(JobStatus::Pending, None, None), 5);
    assert_eq!(display_progress(JobStatus::Running, None, None), 60);
    assert_eq!(display_progress(JobStatus::Done, None, None), 100);
}
