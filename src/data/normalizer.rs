use std::cmp::Ordering;

use tracing::warn;

use crate::corrections::{self, CorrectionTable};
use crate::data::policy::NormalizationPolicy;
use crate::data::primary::PrimaryFeature;
use crate::data::reference::{FeatureSource, ReferenceData};
use crate::data::secondary::{AddedThreshold, SecondaryFeature};
use crate::types::{BrowserId, BrowserSupport, FeatureSupport, SupportKind};
use crate::version::{KnownVersions, Version};

/// Turns either dataset's raw records for a feature into one corrected
/// support matrix.
pub struct SupportDataNormalizer<'a> {
	data: &'a ReferenceData,
	known: &'a KnownVersions,
	policy: &'a NormalizationPolicy,
	corrections: &'a CorrectionTable,
}

impl<'a> SupportDataNormalizer<'a> {
	pub fn new(
		data: &'a ReferenceData,
		known: &'a KnownVersions,
		policy: &'a NormalizationPolicy,
		corrections: &'a CorrectionTable,
	) -> Self {
		Self {
			data,
			known,
			policy,
			corrections,
		}
	}

	/// `None` when neither dataset knows the feature.
	pub fn normalize(&self, feature: &str) -> Option<FeatureSupport> {
		let support = match self.data.source(feature)? {
			FeatureSource::Primary(raw) => self.from_primary(feature, raw),
			FeatureSource::Secondary(raw) => self.from_secondary(feature, raw),
		};

		Some(match self.corrections.rules(feature) {
			Some(rules) => corrections::apply(support, &corrections::compile(feature, rules, self.known)),
			None => support,
		})
	}

	fn from_primary(&self, feature: &str, raw: &PrimaryFeature) -> FeatureSupport {
		let mut support = FeatureSupport::new(feature);

		for (browser_key, versions) in &raw.stats {
			let Ok(browser) = browser_key.parse::<BrowserId>() else {
				warn!(feature, browser = %browser_key, "Skipping unknown browser key");
				continue;
			};
			if self.policy.latest_only.contains(&browser) {
				continue;
			}

			let entry = support.browsers.entry(browser).or_default();
			for (label, code) in versions {
				let Some(version) = Version::from_label(label) else {
					continue;
				};
				if self.policy.keeps_primary(browser, &version) {
					entry.insert(version, SupportKind::from_code(code));
				}
			}
		}

		support
	}

	fn from_secondary(&self, feature: &str, raw: &SecondaryFeature) -> FeatureSupport {
		let mut support = FeatureSupport::new(feature);

		for browser in BrowserId::ALL {
			let mut entry = BrowserSupport::new();

			if let Some(key) = self.policy.secondary_key(browser) {
				let threshold = match raw.support.get(key).map(|s| s.threshold()) {
					Some(AddedThreshold::Oldest) => self.known.oldest(browser).cloned(),
					Some(AddedThreshold::Since(version)) => Some(version),
					Some(AddedThreshold::Never) | None => None,
				};

				for version in self.known.versions(browser) {
					let available = threshold
						.as_ref()
						.is_some_and(|t| self.known.compare(browser, version, t) != Ordering::Less);
					let kind = if available {
						SupportKind::Available
					} else {
						SupportKind::Unavailable
					};
					entry.insert(version.clone(), kind);
				}
			}

			support.browsers.insert(browser, entry);
		}

		support
	}
}
