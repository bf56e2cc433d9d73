mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use compat_core::corrections::{CorrectionTable, PartialSupportAllowance};
use compat_core::{BrowserId, ComparisonOperator, QueryClause, SupportError, Threshold, Version};

use common::{fixture_known, fixture_resolver, rendered, resolver_with, ExpandingResolver};

#[test]
fn supporting_query_lists_floors_and_unreleased_versions() {
    let resolver = fixture_resolver();
    let clauses = resolver.supporting(&["fetch"]).expect("known feature");

    assert_eq!(
        rendered(&clauses),
        vec![
            "chrome >= 42",
            "edge >= 14",
            "firefox >= 50",
            "ios_saf >= 10.3",
            "safari >= 10.1",
            "unreleased chrome versions",
            "unreleased edge versions",
            "unreleased firefox versions",
            "unreleased ios_saf versions",
            "unreleased safari versions",
        ]
    );
}

#[test]
fn not_supporting_query_includes_never_supported_browsers() {
    let resolver = fixture_resolver();
    let clauses = resolver.not_supporting(&["fetch"]).expect("known feature");

    assert_eq!(
        rendered(&clauses),
        vec![
            "android >= 4.4",
            "unreleased android versions",
            "chrome < 42",
            "edge < 14",
            "firefox < 50",
            "ie >= 9",
            "unreleased ie versions",
            "ios_saf < 10.3",
            "op_mini all",
            "unreleased op_mini versions",
            "safari < 10.1",
        ]
    );
}

#[test]
fn zero_support_is_absent_from_positive_and_present_in_negative() {
    let resolver = fixture_resolver();

    let positive = resolver.resolve(ComparisonOperator::GreaterOrEqual, &["fetch"]).expect("known");
    assert!(!positive.browsers.contains(&BrowserId::Ie));

    let negative = resolver.resolve(ComparisonOperator::Less, &["fetch"]).expect("known");
    assert!(negative.browsers.contains(&BrowserId::Ie));

    let thresholds = resolver.thresholds("fetch", ComparisonOperator::Less).expect("known");
    assert_eq!(thresholds[&BrowserId::Ie], Threshold::Never);
}

#[test]
fn combined_features_take_the_latest_threshold_of_shared_browsers() {
    let resolver = fixture_resolver();
    let query = resolver
        .resolve(ComparisonOperator::GreaterOrEqual, &["fetch", "es6-module"])
        .expect("known features");

    assert_eq!(
        rendered(&query.clauses),
        vec!["chrome >= 44", "firefox >= 55", "ios_saf >= 11.0", "safari >= 11"]
    );
    let expected: BTreeSet<BrowserId> = [BrowserId::Chrome, BrowserId::Firefox, BrowserId::IosSaf, BrowserId::Safari]
        .into_iter()
        .collect();
    assert_eq!(query.browsers, expected);
}

#[test]
fn resolution_ignores_feature_order_and_duplicates() {
    let resolver = fixture_resolver();
    let first = resolver
        .resolve(ComparisonOperator::Less, &["fetch", "es6-module"])
        .expect("known features");
    let second = resolver
        .resolve(ComparisonOperator::Less, &["es6-module", "fetch", "fetch"])
        .expect("known features");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.features, vec!["es6-module".to_string(), "fetch".to_string()]);
}

#[test]
fn preview_only_support_renders_sentinel_clauses() {
    let resolver = fixture_resolver();

    let supporting = resolver.supporting(&["css-has"]).expect("known feature");
    assert_eq!(rendered(&supporting), vec!["safari TP", "unreleased safari versions"]);

    let not_supporting = rendered(&resolver.not_supporting(&["css-has"]).expect("known feature"));
    assert_eq!(not_supporting.last().map(String::as_str), Some("not safari TP"));
    assert!(not_supporting.contains(&"safari <= 12".to_string()));
    assert!(not_supporting.contains(&"firefox >= 48".to_string()));
}

#[test]
fn all_sentinel_support_renders_an_exact_clause() {
    let resolver = fixture_resolver();
    let clauses = resolver.supporting(&["data-saver"]).expect("known feature");
    assert_eq!(rendered(&clauses), vec!["op_mini all", "unreleased op_mini versions"]);
}

#[test]
fn positive_renders_for_never_supported_exclude_every_known_version() {
    let known = fixture_known();
    let clauses = compat_core::support::render_threshold(
        &known,
        BrowserId::Ie,
        ComparisonOperator::GreaterOrEqual,
        &Threshold::Never,
    );
    assert_eq!(rendered(&clauses), vec!["ie > 11", "not unreleased ie versions"]);
}

#[test]
fn negations_always_come_last() {
    let resolver = fixture_resolver();
    for features in [vec!["css-has"], vec!["fetch", "shadowdomv1"], vec!["api.AbortController"]] {
        for operator in [ComparisonOperator::Less, ComparisonOperator::GreaterOrEqual] {
            let query = resolver.resolve(operator, &features).expect("known features");
            let first_negated = query.clauses.iter().position(QueryClause::is_negated);
            if let Some(index) = first_negated {
                assert!(query.clauses[index..].iter().all(QueryClause::is_negated));
            }
        }
    }
}

#[test]
fn positive_and_negative_results_are_complementary() {
    let resolver = fixture_resolver();
    let expander = ExpandingResolver::new(fixture_known());

    for feature in ["fetch", "es6-module", "shadowdomv1", "css-has", "data-saver"] {
        let positive = expander.expand_all(&resolver.supporting(&[feature]).expect("known"));
        let negative = expander.expand_all(&resolver.not_supporting(&[feature]).expect("known"));

        let matrix = resolver.feature_support(feature).expect("known");
        let universe = expander.universe(matrix.browsers.keys().copied());

        assert!(positive.is_disjoint(&negative), "{feature}: overlap");
        let union: BTreeSet<String> = positive.union(&negative).cloned().collect();
        assert_eq!(union, universe, "{feature}: gap");
    }
}

#[test]
fn partial_support_counts_only_when_allowed() {
    let allowed = fixture_resolver();
    let query = allowed
        .resolve(ComparisonOperator::GreaterOrEqual, &["shadowdomv1"])
        .expect("known feature");
    // Firefox 54 only ships a prefixed implementation.
    assert_eq!(
        rendered(&query.clauses),
        vec!["chrome >= 42", "firefox >= 55", "ios_saf >= 10.0", "safari >= 10"]
    );

    let strict = resolver_with(CorrectionTable::default());
    let query = strict
        .resolve(ComparisonOperator::GreaterOrEqual, &["shadowdomv1"])
        .expect("known feature");
    assert_eq!(
        rendered(&query.clauses),
        vec!["chrome >= 44", "firefox >= 55", "ios_saf >= 11.0", "safari >= 11"]
    );

    let mut table = CorrectionTable::default();
    table.partial_support.insert(
        "shadowdomv1".into(),
        PartialSupportAllowance::Browsers([BrowserId::Safari].into_iter().collect()),
    );
    let listed = resolver_with(table);
    let thresholds = listed
        .thresholds("shadowdomv1", ComparisonOperator::GreaterOrEqual)
        .expect("known feature");
    assert_eq!(thresholds[&BrowserId::Safari], Threshold::Version(Version::new("10")));
    assert_eq!(thresholds[&BrowserId::Chrome], Threshold::Version(Version::new("44")));
}

#[test]
fn secondary_features_resolve_like_primary_ones() {
    let resolver = fixture_resolver();
    let clauses = rendered(&resolver.supporting(&["api.AbortController"]).expect("known feature"));

    for expected in [
        "and_chr >= 120",
        "android >= 120",
        "chrome >= 43",
        "edge >= 16",
        "firefox >= 48",
        "ios_saf >= 11.3",
        "safari >= 11.1",
    ] {
        assert!(clauses.contains(&expected.to_string()), "missing {expected}");
    }
    assert!(!clauses.iter().any(|c| c.starts_with("ie ")));
}

#[test]
fn unknown_and_empty_feature_lists_are_rejected() {
    let resolver = fixture_resolver();

    assert_eq!(
        resolver.resolve(ComparisonOperator::Less, &["fetch", "teleportation"]).unwrap_err(),
        SupportError::UnknownFeature("teleportation".into())
    );
    let none: [&str; 0] = [];
    assert_eq!(
        resolver.resolve(ComparisonOperator::Less, &none).unwrap_err(),
        SupportError::EmptyFeatureList
    );
    assert_eq!(
        resolver.feature_support("teleportation").unwrap_err(),
        SupportError::UnknownFeature("teleportation".into())
    );
}

#[test]
fn query_clauses_round_trip_through_text() {
    for text in ["chrome >= 42", "safari TP", "not safari TP", "unreleased ie versions", "op_mini all"] {
        let clause: QueryClause = text.parse().expect("valid clause");
        assert_eq!(clause.to_string(), text);
    }
    let aliased: QueryClause = "FF > 54".parse().expect("alias");
    assert_eq!(aliased.to_string(), "firefox > 54");
}
