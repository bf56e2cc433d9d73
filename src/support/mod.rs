pub mod render;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::corrections::{CorrectionTable, PartialSupportAllowance};
use crate::data::{NormalizationPolicy, ReferenceData, SupportDataNormalizer};
use crate::types::{BrowserId, BrowserSupport, ComparisonOperator, FeatureSupport, QueryClause, SupportKind};
use crate::version::{KnownVersions, Version};

pub use render::{order_negations_last, render_threshold};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SupportError {
	#[error("Unknown feature: {0}")]
	UnknownFeature(String),
	#[error("At least one feature is required")]
	EmptyFeatureList,
}

/// The version a browser must reach to support a feature set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Threshold {
	Version(Version),
	/// No release supports it; only recorded for negative operators.
	Never,
}

/// Result of a combined feature query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportQuery {
	pub operator: ComparisonOperator,
	pub features: Vec<String>,
	/// Negated clauses always come last.
	pub clauses: Vec<QueryClause>,
	/// Browsers that appear in the combined result.
	pub browsers: BTreeSet<BrowserId>,
}

type QueryKey = (ComparisonOperator, Vec<String>);

/// Resolves feature sets to query clauses.
///
/// Owns the per-feature matrix cache and the per-query cache. Entries are
/// inserted whole and never mutated, so racing writers at worst recompute an
/// equal value.
pub struct FeatureSupportResolver {
	data: Arc<ReferenceData>,
	known: Arc<KnownVersions>,
	policy: NormalizationPolicy,
	corrections: CorrectionTable,
	matrices: RwLock<HashMap<String, Arc<FeatureSupport>>>,
	queries: RwLock<HashMap<QueryKey, Arc<SupportQuery>>>,
}

impl FeatureSupportResolver {
	pub fn new(
		data: Arc<ReferenceData>,
		known: Arc<KnownVersions>,
		policy: NormalizationPolicy,
		corrections: CorrectionTable,
	) -> Self {
		Self {
			data,
			known,
			policy,
			corrections,
			matrices: RwLock::new(HashMap::new()),
			queries: RwLock::new(HashMap::new()),
		}
	}

	pub fn known_versions(&self) -> &KnownVersions {
		&self.known
	}

	pub fn corrections(&self) -> &CorrectionTable {
		&self.corrections
	}

	/// Normalized and corrected matrix of one feature, cached.
	pub fn feature_support(&self, feature: &str) -> Result<Arc<FeatureSupport>, SupportError> {
		if let Some(cached) = self
			.matrices
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(feature)
		{
			return Ok(Arc::clone(cached));
		}

		debug!(feature, "Normalizing feature support");
		let normalizer = SupportDataNormalizer::new(&self.data, &self.known, &self.policy, &self.corrections);
		let support = normalizer
			.normalize(feature)
			.map(Arc::new)
			.ok_or_else(|| SupportError::UnknownFeature(feature.to_string()))?;

		self.matrices
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(feature.to_string(), Arc::clone(&support));
		Ok(support)
	}

	/// Per-browser threshold of a single feature.
	///
	/// Browsers with no supporting release are omitted for positive
	/// operators and recorded as [`Threshold::Never`] for negative ones.
	pub fn thresholds(
		&self,
		feature: &str,
		operator: ComparisonOperator,
	) -> Result<BTreeMap<BrowserId, Threshold>, SupportError> {
		let support = self.feature_support(feature)?;
		let allowance = self.corrections.allowance(feature);

		let mut thresholds = BTreeMap::new();
		for (browser, versions) in &support.browsers {
			match self.required_version(*browser, versions, allowance) {
				Some(version) => {
					thresholds.insert(*browser, Threshold::Version(version));
				}
				None if operator.is_negative() => {
					thresholds.insert(*browser, Threshold::Never);
				}
				None => {}
			}
		}
		Ok(thresholds)
	}

	fn required_version(
		&self,
		browser: BrowserId,
		versions: &BrowserSupport,
		allowance: Option<&PartialSupportAllowance>,
	) -> Option<Version> {
		let mut ordered: Vec<(&Version, &SupportKind)> = versions.iter().collect();
		ordered.sort_by(|a, b| self.known.compare(browser, a.0, b.0));

		let first_with = |kind: SupportKind| {
			ordered
				.iter()
				.find(|(_, k)| **k == kind)
				.map(|(v, _)| (*v).clone())
		};
		let available = first_with(SupportKind::Available);
		let partial = first_with(SupportKind::Partial);

		let partial_allowed = allowance.is_some_and(|a| a.covers(browser));
		match (available, partial) {
			(available, Some(partial))
				if partial_allowed
					&& available
						.as_ref()
						.map_or(true, |a| self.known.compare(browser, &partial, a) == Ordering::Less) =>
			{
				Some(partial)
			}
			(available, _) => available,
		}
	}

	/// Browsers and versions on the `operator` side of the point where every
	/// feature in `features` is supported.
	pub fn resolve<S: AsRef<str>>(
		&self,
		operator: ComparisonOperator,
		features: &[S],
	) -> Result<Arc<SupportQuery>, SupportError> {
		let mut features: Vec<String> = features.iter().map(|f| f.as_ref().to_string()).collect();
		features.sort();
		features.dedup();

		if features.is_empty() {
			return Err(SupportError::EmptyFeatureList);
		}
		if let Some(unknown) = features.iter().find(|f| !self.data.contains(f)) {
			return Err(SupportError::UnknownFeature(unknown.clone()));
		}

		let key = (operator, features);
		if let Some(cached) = self
			.queries
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(&key)
		{
			return Ok(Arc::clone(cached));
		}

		debug!(operator = %operator, features = ?key.1, "Resolving feature query");
		let mut combined: Option<BTreeMap<BrowserId, Threshold>> = None;
		for feature in &key.1 {
			let thresholds = self.thresholds(feature, operator)?;
			combined = Some(match combined {
				None => thresholds,
				Some(previous) => self.intersect(previous, &thresholds),
			});
		}
		let combined = combined.unwrap_or_default();

		let mut clauses: Vec<QueryClause> = combined
			.iter()
			.flat_map(|(browser, threshold)| render_threshold(&self.known, *browser, operator, threshold))
			.collect();
		order_negations_last(&mut clauses);

		let query = Arc::new(SupportQuery {
			operator,
			features: key.1.clone(),
			clauses,
			browsers: combined.keys().copied().collect(),
		});

		self.queries
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(key, Arc::clone(&query));
		Ok(query)
	}

	/// Keep browsers present on both sides, at the later of the two thresholds.
	fn intersect(
		&self,
		previous: BTreeMap<BrowserId, Threshold>,
		next: &BTreeMap<BrowserId, Threshold>,
	) -> BTreeMap<BrowserId, Threshold> {
		previous
			.into_iter()
			.filter_map(|(browser, threshold)| {
				let other = next.get(&browser)?;
				let later = match (threshold, other) {
					(Threshold::Never, _) | (_, Threshold::Never) => Threshold::Never,
					(Threshold::Version(a), Threshold::Version(b)) => {
						if self.known.compare(browser, b, &a) == Ordering::Greater {
							Threshold::Version(b.clone())
						} else {
							Threshold::Version(a)
						}
					}
				};
				Some((browser, later))
			})
			.collect()
	}

	/// `>=` query extended with every result browser's unreleased versions,
	/// placed ahead of any negated clause.
	pub fn supporting<S: AsRef<str>>(&self, features: &[S]) -> Result<Vec<QueryClause>, SupportError> {
		let query = self.resolve(ComparisonOperator::GreaterOrEqual, features)?;
		let mut clauses = query.clauses.clone();
		let split = clauses
			.iter()
			.position(QueryClause::is_negated)
			.unwrap_or(clauses.len());
		let unreleased = query.browsers.iter().map(|b| QueryClause::unreleased(*b));
		clauses.splice(split..split, unreleased);
		Ok(clauses)
	}

	pub fn not_supporting<S: AsRef<str>>(&self, features: &[S]) -> Result<Vec<QueryClause>, SupportError> {
		let query = self.resolve(ComparisonOperator::Less, features)?;
		Ok(query.clauses.clone())
	}
}
