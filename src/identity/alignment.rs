use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::identity::parsed::ParsedUserAgent;
use crate::types::BrowserId;
use crate::version::{compare_components, Version};

/// A fixed upstream version assigned to every fork release below `below`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EarlySegment {
	pub below: Version,
	pub version: Version,
}

/// A fixed upstream version for fork releases up to and including `until`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlateauSegment {
	pub until: Version,
	pub version: Version,
}

/// Maps a forked browser's own version numbers onto its upstream browser.
///
/// Four segments, in ascending order of the fork's version:
///
/// ```text
///   < early.below            -> early.version
///   <= direct_until          -> same number
///   <= plateau.until         -> plateau.version
///   otherwise                -> beyond
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForkAlignment {
	/// Browser or engine names identifying the fork, case-insensitive.
	pub names: Vec<String>,
	pub upstream: BrowserId,
	pub early: EarlySegment,
	pub direct_until: Version,
	pub plateau: PlateauSegment,
	pub beyond: Version,
}

impl ForkAlignment {
	pub fn matches(&self, parsed: &ParsedUserAgent) -> bool {
		self.names
			.iter()
			.any(|name| parsed.browser.is(name) || parsed.engine.is(name))
	}

	/// Upstream version for a fork release.
	pub fn align(&self, version: &Version) -> Version {
		let cmp = |bound: &Version| compare_components(&version.components(), &bound.components());

		if cmp(&self.early.below) == Ordering::Less {
			self.early.version.clone()
		} else if cmp(&self.direct_until) != Ordering::Greater {
			version.clone()
		} else if cmp(&self.plateau.until) != Ordering::Greater {
			self.plateau.version.clone()
		} else {
			self.beyond.clone()
		}
	}

	/// Segment bounds must ascend.
	pub(crate) fn validate(&self) -> Result<(), String> {
		if self.names.iter().all(|n| n.trim().is_empty()) {
			return Err("fork alignment needs at least one name".into());
		}
		let bounds = [&self.early.below, &self.direct_until, &self.plateau.until];
		if bounds.iter().any(|b| b.is_sentinel()) {
			return Err("fork alignment bounds must be numeric".into());
		}
		let ascending = bounds
			.windows(2)
			.all(|pair| compare_components(&pair[0].components(), &pair[1].components()) != Ordering::Greater);
		if !ascending {
			return Err(format!(
				"fork alignment bounds for {:?} are not ascending",
				self.names
			));
		}
		Ok(())
	}
}
