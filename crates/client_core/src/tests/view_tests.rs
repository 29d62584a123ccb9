use super::*;

use crate::{
    outcome::Failure,
    query::SearchReport,
    test_support::result,
};

fn report(results: Vec<SearchResult>, search: Option<f64>, total: Option<f64>) -> SearchOutcome {
    Outcome::Success(SearchReport {
        results,
        search_time_ms: search,
        total_time_ms: total,
    })
}

#[test]
fn idle_search_view() {
    let view = search_view(&Query::default(), &Outcome::Idle);
    assert_eq!(view.submit_label, "Search");
    assert!(!view.submit_enabled, "blank text cannot be submitted");
    assert_eq!(view.timing, None);
    assert_eq!(view.error, None);
    assert_eq!(view.empty_notice, Some(NO_RESULTS));
}

#[test]
fn loading_search_view_disables_submit() {
    let view = search_view(&Query::new("fever", 10), &Outcome::Loading);
    assert_eq!(view.submit_label, "Searching...");
    assert!(!view.submit_enabled);
    assert_eq!(view.empty_notice, None);
}

#[test]
fn timing_line_shows_only_known_parts() {
    let pending = Query::new("fever", 10);

    let both = search_view(&pending, &report(Vec::new(), Some(1.234), Some(4.5)));
    assert_eq!(
        both.timing.as_deref(),
        Some("Search: 1.23 ms • Backend total: 4.50 ms")
    );

    let total_only = search_view(&pending, &report(Vec::new(), None, Some(0.0)));
    assert_eq!(total_only.timing.as_deref(), Some("Backend total: 0.00 ms"));

    let neither = search_view(&pending, &report(Vec::new(), None, None));
    assert_eq!(neither.timing, None);
}

#[test]
fn transport_failure_view_carries_hint() {
    let view = search_view(
        &Query::new("fever", 10),
        &Outcome::Failure(Failure::transport("index unavailable")),
    );
    assert_eq!(
        view.error,
        Some(ErrorBanner {
            message: "index unavailable".into(),
            hint: Some(BACKEND_HINT),
        })
    );
    assert!(view.submit_enabled);
}

#[test]
fn validation_failure_view_has_no_backend_hint() {
    let view = search_view(
        &Query::new("fever", 0),
        &Outcome::Failure(Failure::validation("Top K must be between 1 and 200.")),
    );
    assert_eq!(
        view.error,
        Some(ErrorBanner {
            message: "Top K must be between 1 and 200.".into(),
            hint: None,
        })
    );
}

#[test]
fn result_cards_follow_backend_order() {
    let mut first = result("7", 12.345678);
    first.url = Some("https://doi.org/10.1/x".into());
    first.author = Some("Madani, Tariq A".into());
    first.publish_time = Some("2001-07-04".into());
    let mut second = result("3", 0.5);
    second.title = "  ".into();

    let view = search_view(&Query::new("fever", 10), &report(vec![first, second], None, None));

    assert_eq!(view.empty_notice, None);
    assert_eq!(view.results.len(), 2);
    assert_eq!(view.results[0].title, "Document 7");
    assert_eq!(view.results[0].link.as_deref(), Some("https://doi.org/10.1/x"));
    assert_eq!(view.results[0].score, "12.3457");
    assert_eq!(
        view.results[0].locator,
        "docId: 7 • segment: seg_000 • cord_uid: uid-7"
    );
    assert_eq!(
        view.results[0].byline.as_deref(),
        Some("Madani, Tariq A • 2001-07-04")
    );
    assert_eq!(view.results[1].title, "(untitled)");
    assert_eq!(view.results[1].link, None);
    assert_eq!(view.results[1].byline, None);
}

#[test]
fn ingestion_view_states() {
    let idle = ingestion_view(&Outcome::Idle);
    assert_eq!(idle.submit_label, "Add");
    assert!(idle.submit_enabled);
    assert_eq!(idle.confirmation, None);

    let loading = ingestion_view(&Outcome::Loading);
    assert_eq!(loading.submit_label, "Adding...");
    assert!(!loading.submit_enabled);

    let done = ingestion_view(&Outcome::Success(IngestReport {
        segment: "seg-3".into(),
        reloaded: true,
        total_time_ms: Some(12.5),
    }));
    assert_eq!(
        done.confirmation.as_deref(),
        Some("Added: seg-3 (reloaded=true) time=12.50ms")
    );
    assert_eq!(done.error, None);

    let untimed = ingestion_view(&Outcome::Success(IngestReport {
        segment: "seg-4".into(),
        reloaded: false,
        total_time_ms: None,
    }));
    assert_eq!(
        untimed.confirmation.as_deref(),
        Some("Added: seg-4 (reloaded=false)")
    );

    let failed = ingestion_view(&Outcome::Failure(Failure::validation(
        "All fields are required.",
    )));
    assert_eq!(
        failed.error,
        Some(ErrorBanner {
            message: "All fields are required.".into(),
            hint: None,
        })
    );

    let rejected = ingestion_view(&Outcome::Failure(Failure::transport("disk full")));
    assert_eq!(
        rejected.error.and_then(|banner| banner.hint),
        Some(BACKEND_HINT)
    );
}
