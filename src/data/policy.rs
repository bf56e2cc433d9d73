use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::types::BrowserId;
use crate::version::{compare_components, Version};

/// Which dataset reports to trust, and how canonical browsers map onto the
/// secondary dataset's browser keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizationPolicy {
	/// Browsers the primary dataset only reports with their latest release.
	#[serde(default)]
	pub latest_only: BTreeSet<BrowserId>,
	/// Browsers that switch to another engine's numbering above the ceiling.
	#[serde(default)]
	pub rebased: BTreeMap<BrowserId, Version>,
	#[serde(default)]
	pub secondary_browsers: BTreeMap<BrowserId, String>,
}

impl NormalizationPolicy {
	pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
		let policy: NormalizationPolicy = serde_yaml::from_str(yaml)?;
		policy.validate()?;
		Ok(policy)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		for (browser, ceiling) in &self.rebased {
			if ceiling.is_sentinel() || Version::from_label(ceiling.as_str()).as_ref() != Some(ceiling) {
				return Err(ConfigError::InvalidPolicy(format!(
					"rebase ceiling for {browser} must be numeric, got {ceiling}"
				)));
			}
		}
		for (browser, key) in &self.secondary_browsers {
			if key.trim().is_empty() {
				return Err(ConfigError::InvalidPolicy(format!(
					"empty secondary browser key for {browser}"
				)));
			}
		}
		Ok(())
	}

	/// Whether a primary-dataset report for `browser` at `version` is trusted.
	pub fn keeps_primary(&self, browser: BrowserId, version: &Version) -> bool {
		if self.latest_only.contains(&browser) {
			return false;
		}
		match self.rebased.get(&browser) {
			Some(ceiling) if !version.is_sentinel() => {
				compare_components(&version.components(), &ceiling.components()) != Ordering::Greater
			}
			_ => true,
		}
	}

	pub fn secondary_key(&self, browser: BrowserId) -> Option<&str> {
		self.secondary_browsers.get(&browser).map(String::as_str)
	}
}
