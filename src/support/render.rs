use crate::support::Threshold;
use crate::types::{BrowserId, ComparisonOperator, QueryClause};
use crate::version::KnownVersions;

/// Query clauses selecting the versions of `browser` on the `operator` side
/// of `threshold`.
pub fn render_threshold(
	known: &KnownVersions,
	browser: BrowserId,
	operator: ComparisonOperator,
	threshold: &Threshold,
) -> Vec<QueryClause> {
	match threshold {
		Threshold::Version(version) if !version.is_sentinel() => {
			vec![QueryClause::range(browser, operator, version.clone())]
		}
		Threshold::Version(sentinel) if operator.is_negative() => {
			let mut clauses = vec![QueryClause::exact(browser, sentinel.clone()).negate()];
			if let Some(previous) = known.previous_known_version(browser, sentinel) {
				clauses.push(QueryClause::range(browser, ComparisonOperator::LessOrEqual, previous));
			}
			clauses
		}
		Threshold::Version(sentinel) => {
			let mut clauses = vec![QueryClause::exact(browser, sentinel.clone())];
			if let Some(next) = known.next_known_version(browser, sentinel) {
				clauses.push(QueryClause::range(browser, ComparisonOperator::GreaterOrEqual, next));
			}
			clauses
		}
		Threshold::Never if operator.is_negative() => {
			let mut clauses = Vec::with_capacity(2);
			match known.oldest(browser) {
				Some(oldest) if oldest.is_sentinel() => {
					clauses.push(QueryClause::exact(browser, oldest.clone()));
				}
				Some(oldest) => {
					clauses.push(QueryClause::range(
						browser,
						ComparisonOperator::GreaterOrEqual,
						oldest.clone(),
					));
				}
				None => {}
			}
			clauses.push(QueryClause::unreleased(browser));
			clauses
		}
		Threshold::Never => {
			let mut clauses = Vec::with_capacity(2);
			if let Some(latest) = known.latest(browser) {
				clauses.push(QueryClause::range(browser, ComparisonOperator::Greater, latest.clone()));
			}
			clauses.push(QueryClause::unreleased(browser).negate());
			clauses
		}
	}
}

/// Stable-sort negated clauses after positive ones.
pub fn order_negations_last(clauses: &mut [QueryClause]) {
	clauses.sort_by_key(QueryClause::is_negated);
}
