use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::ConfigError;
use crate::types::{BrowserId, SupportKind};
use crate::version::{compare_components, Version};

/// One authored override: a single version, a range, or (neither given)
/// every known version of the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrectionRule {
	pub kind: SupportKind,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<Version>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<Version>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to: Option<Version>,
}

impl CorrectionRule {
	pub fn at(kind: SupportKind, version: impl Into<Version>) -> Self {
		Self {
			kind,
			version: Some(version.into()),
			from: None,
			to: None,
		}
	}

	pub fn range(kind: SupportKind, from: Option<Version>, to: Option<Version>) -> Self {
		Self {
			kind,
			version: None,
			from,
			to,
		}
	}
}

/// Browsers for which "partial" support of a feature counts as support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AllowanceRepr", into = "AllowanceRepr")]
pub enum PartialSupportAllowance {
	AllBrowsers,
	Browsers(BTreeSet<BrowserId>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AllowanceRepr {
	Wildcard(String),
	Browsers(BTreeSet<BrowserId>),
}

impl TryFrom<AllowanceRepr> for PartialSupportAllowance {
	type Error = String;

	fn try_from(repr: AllowanceRepr) -> Result<Self, Self::Error> {
		match repr {
			AllowanceRepr::Wildcard(s) if s == "*" => Ok(PartialSupportAllowance::AllBrowsers),
			AllowanceRepr::Wildcard(s) => Err(format!("expected \"*\" or a browser list, got {s:?}")),
			AllowanceRepr::Browsers(set) => Ok(PartialSupportAllowance::Browsers(set)),
		}
	}
}

impl From<PartialSupportAllowance> for AllowanceRepr {
	fn from(allowance: PartialSupportAllowance) -> Self {
		match allowance {
			PartialSupportAllowance::AllBrowsers => AllowanceRepr::Wildcard("*".to_string()),
			PartialSupportAllowance::Browsers(set) => AllowanceRepr::Browsers(set),
		}
	}
}

impl PartialSupportAllowance {
	pub fn covers(&self, browser: BrowserId) -> bool {
		match self {
			PartialSupportAllowance::AllBrowsers => true,
			PartialSupportAllowance::Browsers(set) => set.contains(&browser),
		}
	}
}

pub type FeatureCorrections = BTreeMap<BrowserId, Vec<CorrectionRule>>;

/// Manual corrections and partial-support allowances, keyed by feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrectionTable {
	pub version: u32,
	#[serde(default)]
	pub corrections: BTreeMap<String, FeatureCorrections>,
	#[serde(default)]
	pub partial_support: BTreeMap<String, PartialSupportAllowance>,
}

impl Default for CorrectionTable {
	fn default() -> Self {
		Self {
			version: 1,
			corrections: BTreeMap::new(),
			partial_support: BTreeMap::new(),
		}
	}
}

impl CorrectionTable {
	pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
		let table: CorrectionTable = serde_yaml::from_str(yaml)?;
		table.validate()?;
		Ok(table)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		for (feature, browsers) in &self.corrections {
			if feature.trim().is_empty() {
				return Err(ConfigError::InvalidTable("empty feature key in corrections".into()));
			}
			for (browser, rules) in browsers {
				validate_rules(feature, *browser, rules)?;
			}
		}
		if self.partial_support.keys().any(|f| f.trim().is_empty()) {
			return Err(ConfigError::InvalidTable("empty feature key in partial_support".into()));
		}
		Ok(())
	}

	pub fn rules(&self, feature: &str) -> Option<&FeatureCorrections> {
		self.corrections.get(feature)
	}

	pub fn allowance(&self, feature: &str) -> Option<&PartialSupportAllowance> {
		self.partial_support.get(feature)
	}

	/// Content hash of the table, `sha256:<hex>` over its canonical JSON form.
	pub fn content_version(&self) -> Result<String, serde_json::Error> {
		let canonical = serde_json::to_vec(self)?;
		let mut hasher = Sha256::new();
		hasher.update(&canonical);
		Ok(format!("sha256:{}", hex::encode(hasher.finalize())))
	}
}

fn validate_rules(feature: &str, browser: BrowserId, rules: &[CorrectionRule]) -> Result<(), ConfigError> {
	let invalid = |reason: String| ConfigError::InvalidCorrection {
		feature: feature.to_string(),
		browser,
		reason,
	};

	let mut seen = BTreeSet::new();
	for rule in rules {
		for bound in [&rule.version, &rule.from, &rule.to].into_iter().flatten() {
			if Version::from_label(bound.as_str()).as_ref() != Some(bound) {
				return Err(invalid(format!("unparseable version {bound:?}")));
			}
		}

		if let Some(version) = &rule.version {
			if rule.from.is_some() || rule.to.is_some() {
				return Err(invalid("a rule takes either `version` or `from`/`to`".into()));
			}
			if !seen.insert(version.clone()) {
				return Err(ConfigError::DuplicateCorrection {
					feature: feature.to_string(),
					browser,
					version: version.clone(),
				});
			}
		}

		if let (Some(from), Some(to)) = (&rule.from, &rule.to) {
			let numeric = !from.is_sentinel() && !to.is_sentinel();
			if numeric && compare_components(&from.components(), &to.components()).is_gt() {
				return Err(invalid(format!("range start {from} is after its end {to}")));
			}
		}
	}
	Ok(())
}
