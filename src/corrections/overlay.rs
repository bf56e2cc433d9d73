use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::warn;

use crate::corrections::table::{CorrectionRule, FeatureCorrections};
use crate::types::{BrowserId, FeatureSupport, SupportKind};
use crate::version::{KnownVersions, Version};

/// A resolved override for one (browser, version).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
	pub version: Version,
	pub kind: SupportKind,
}

pub type BrowserCorrections = BTreeMap<BrowserId, Vec<Correction>>;

/// Every known version of `browser` inside the inclusive `[start, end]` bound.
///
/// The "all" sentinel is always included. The preview sentinel is included
/// when `end` is the preview sentinel, or when the range has a start and no end.
pub fn expand_range(
	known: &KnownVersions,
	browser: BrowserId,
	kind: SupportKind,
	start: Option<&Version>,
	end: Option<&Version>,
) -> Vec<Correction> {
	known
		.versions(browser)
		.iter()
		.filter(|version| {
			if version.is_all() {
				return true;
			}
			if version.is_preview() {
				return end.is_some_and(Version::is_preview) || (end.is_none() && start.is_some());
			}
			let after_start = start.map_or(true, |s| known.compare(browser, version, s) != Ordering::Less);
			let before_end = end.map_or(true, |e| known.compare(browser, version, e) != Ordering::Greater);
			after_start && before_end
		})
		.map(|version| Correction {
			version: version.clone(),
			kind,
		})
		.collect()
}

/// Resolve authored rules against the known version lists.
pub fn compile(feature: &str, rules: &FeatureCorrections, known: &KnownVersions) -> BrowserCorrections {
	let mut compiled = BrowserCorrections::new();
	for (browser, browser_rules) in rules {
		let mut list: Vec<Correction> = Vec::new();
		for rule in browser_rules {
			for correction in expand_rule(known, *browser, rule) {
				if list.iter().any(|c| c.version == correction.version) {
					warn!(feature, browser = %browser, version = %correction.version, "Overlapping corrections, last one wins");
				}
				list.push(correction);
			}
		}
		compiled.insert(*browser, list);
	}
	compiled
}

fn expand_rule(known: &KnownVersions, browser: BrowserId, rule: &CorrectionRule) -> Vec<Correction> {
	match &rule.version {
		Some(version) => vec![Correction {
			version: version.clone(),
			kind: rule.kind,
		}],
		None => expand_range(known, browser, rule.kind, rule.from.as_ref(), rule.to.as_ref()),
	}
}

/// Patch a normalized matrix. Corrections apply in declaration order and may
/// introduce versions the matrix did not have.
pub fn apply(mut support: FeatureSupport, corrections: &BrowserCorrections) -> FeatureSupport {
	for (browser, list) in corrections {
		for correction in list {
			support.set(*browser, correction.version.clone(), correction.kind);
		}
	}
	support
}
