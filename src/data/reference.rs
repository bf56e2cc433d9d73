use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::data::policy::NormalizationPolicy;
use crate::data::primary::{PrimaryDataset, PrimaryFeature};
use crate::data::secondary::{AddedThreshold, SecondaryDataset, SecondaryFeature};
use crate::types::BrowserId;
use crate::version::{KnownVersions, Version};

#[derive(Debug, Error)]
pub enum DataError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Malformed dataset: {0}")]
	Json(#[from] serde_json::Error),
}

/// Both reference datasets, as loaded for the lifetime of an engine.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
	pub primary: PrimaryDataset,
	pub secondary: SecondaryDataset,
}

/// Where a feature identifier resolved to. Primary keys win over secondary paths.
#[derive(Debug, Clone, Copy)]
pub enum FeatureSource<'a> {
	Primary(&'a PrimaryFeature),
	Secondary(&'a SecondaryFeature),
}

impl ReferenceData {
	pub fn new(primary: PrimaryDataset, secondary: SecondaryDataset) -> Self {
		Self { primary, secondary }
	}

	pub fn from_json_strs(primary: &str, secondary: &str) -> Result<Self, DataError> {
		Ok(Self {
			primary: serde_json::from_str(primary)?,
			secondary: serde_json::from_str(secondary)?,
		})
	}

	pub fn load(primary_path: &Path, secondary_path: &Path) -> Result<Self, DataError> {
		let primary = fs::File::open(primary_path)?;
		let secondary = fs::File::open(secondary_path)?;
		Ok(Self {
			primary: serde_json::from_reader(std::io::BufReader::new(primary))?,
			secondary: serde_json::from_reader(std::io::BufReader::new(secondary))?,
		})
	}

	pub fn source(&self, feature: &str) -> Option<FeatureSource<'_>> {
		if let Some(primary) = self.primary.feature(feature) {
			return Some(FeatureSource::Primary(primary));
		}
		self.secondary.feature(feature).map(FeatureSource::Secondary)
	}

	pub fn contains(&self, feature: &str) -> bool {
		self.source(feature).is_some()
	}

	/// Known version lists of every browser.
	///
	/// Every label the primary dataset reports, trusted or not. A secondary
	/// string threshold older than a browser's first entry extends that list
	/// backwards by whole majors.
	pub fn known_versions(&self, policy: &NormalizationPolicy) -> KnownVersions {
		let mut raw: BTreeMap<BrowserId, BTreeSet<Version>> = BTreeMap::new();

		for (feature_id, feature) in &self.primary.data {
			for (browser_key, versions) in &feature.stats {
				let Ok(browser) = browser_key.parse::<BrowserId>() else {
					continue;
				};
				for label in versions.keys() {
					let Some(version) = Version::from_label(label) else {
						warn!(feature = %feature_id, browser = %browser, label = %label, "Skipping unparseable version label");
						continue;
					};
					raw.entry(browser).or_default().insert(version);
				}
			}
		}

		let mut known = KnownVersions::from_lists(
			raw.into_iter()
				.map(|(browser, versions)| (browser, versions.into_iter().collect())),
		);

		for (_, feature) in self.secondary.iter() {
			for browser in BrowserId::ALL {
				let Some(key) = policy.secondary_key(browser) else {
					continue;
				};
				if let Some(AddedThreshold::Since(version)) = feature.support.get(key).map(|s| s.threshold()) {
					known.extend_backwards(browser, &version);
				}
			}
		}

		known
	}
}
