use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::browser::BrowserId;
use crate::version::Version;

/// Support status of one feature in one browser release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportKind {
	Available,
	Unavailable,
	Partial,
	Prefixed,
}

impl SupportKind {
	/// Interpret a primary-dataset support code.
	///
	/// Codes are either a canonical kind name or shorthand: `y`, `n` or `a`,
	/// optionally followed by note references (`#1`) and flags. Anything
	/// else, including any code flagged `x`, counts as prefixed support.
	pub fn from_code(code: &str) -> Self {
		let code = code.trim();
		match code {
			"available" => return SupportKind::Available,
			"unavailable" => return SupportKind::Unavailable,
			"partial" => return SupportKind::Partial,
			"prefixed" => return SupportKind::Prefixed,
			_ => {}
		}

		let mut tokens = code.split_whitespace().filter(|t| !t.starts_with('#'));
		let head = tokens.next();
		if tokens.any(|flag| flag == "x") {
			return SupportKind::Prefixed;
		}
		match head {
			Some("y") => SupportKind::Available,
			Some("n") => SupportKind::Unavailable,
			Some("a") => SupportKind::Partial,
			_ => SupportKind::Prefixed,
		}
	}
}

/// Support kinds of one browser, keyed by version.
pub type BrowserSupport = BTreeMap<Version, SupportKind>;

/// The normalized support matrix of a single feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSupport {
	pub feature: String,
	pub browsers: BTreeMap<BrowserId, BrowserSupport>,
}

impl FeatureSupport {
	pub fn new(feature: impl Into<String>) -> Self {
		Self {
			feature: feature.into(),
			browsers: BTreeMap::new(),
		}
	}

	pub fn kind(&self, browser: BrowserId, version: &Version) -> Option<SupportKind> {
		self.browsers.get(&browser)?.get(version).copied()
	}

	pub fn set(&mut self, browser: BrowserId, version: Version, kind: SupportKind) {
		self.browsers.entry(browser).or_default().insert(version, kind);
	}
}
