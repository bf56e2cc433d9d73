use std::cmp::Ordering;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label of the pre-release channel (Safari Technology Preview).
pub const PREVIEW_LABEL: &str = "TP";

/// Label of browsers that are only reported as one undifferentiated release.
pub const ALL_LABEL: &str = "all";

lazy_static! {
	/// First dotted-numeric run of a raw label: `≤37` → `37`, `4.4.3-4.4.4` → `4.4.3`.
	static ref VERSION_LABEL: Regex = Regex::new(r"(\d+(?:\.\d+)*)").unwrap();
}

/// A browser version token.
///
/// Either a dotted numeric sequence or one of the two sentinels
/// ([`PREVIEW_LABEL`], [`ALL_LABEL`]). Ordering between tokens depends on the
/// browser and lives in [`KnownVersions`](crate::version::KnownVersions);
/// the derived `Ord` is only a storage order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Version(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKind {
	Numeric(Vec<u64>),
	Preview,
	All,
}

impl Version {
	/// Wrap a token as-is. Sentinel spellings are canonicalized.
	pub fn new(raw: impl Into<String>) -> Self {
		let raw = raw.into();
		let trimmed = raw.trim();
		if trimmed.eq_ignore_ascii_case(PREVIEW_LABEL) {
			Version::preview()
		} else if trimmed.eq_ignore_ascii_case(ALL_LABEL) {
			Version::all()
		} else {
			Version(trimmed.to_string())
		}
	}

	pub fn preview() -> Self {
		Version(PREVIEW_LABEL.to_string())
	}

	pub fn all() -> Self {
		Version(ALL_LABEL.to_string())
	}

	/// Extract a version from a raw dataset label, dropping decorative
	/// prefixes and range tails. Returns `None` when no version is present.
	pub fn from_label(label: &str) -> Option<Self> {
		let trimmed = label.trim();
		if trimmed.eq_ignore_ascii_case(PREVIEW_LABEL) {
			return Some(Version::preview());
		}
		if trimmed.eq_ignore_ascii_case(ALL_LABEL) {
			return Some(Version::all());
		}
		VERSION_LABEL
			.captures(trimmed)
			.and_then(|caps| caps.get(1))
			.map(|m| Version(m.as_str().to_string()))
	}

	/// Build a numeric version from components.
	pub fn from_components(components: &[u64]) -> Self {
		let parts: Vec<String> = components.iter().map(|c| c.to_string()).collect();
		Version(parts.join("."))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn kind(&self) -> VersionKind {
		if self.is_preview() {
			VersionKind::Preview
		} else if self.is_all() {
			VersionKind::All
		} else {
			VersionKind::Numeric(self.components())
		}
	}

	pub fn is_preview(&self) -> bool {
		self.0 == PREVIEW_LABEL
	}

	pub fn is_all(&self) -> bool {
		self.0 == ALL_LABEL
	}

	pub fn is_sentinel(&self) -> bool {
		self.is_preview() || self.is_all()
	}

	/// Numeric components. Malformed parts coerce to 0; sentinels read as `[0]`.
	pub fn components(&self) -> Vec<u64> {
		if self.is_sentinel() {
			return vec![0];
		}
		self.0.split('.').map(leading_number).collect()
	}

	pub fn major(&self) -> u64 {
		self.components().first().copied().unwrap_or(0)
	}

	/// Keep the first `len` components, padding missing ones with zero.
	pub fn truncated(&self, len: usize) -> Version {
		let mut components = self.components();
		components.resize(len.max(1), 0);
		Version::from_components(&components)
	}
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Version {
	fn from(raw: &str) -> Self {
		Version::new(raw)
	}
}

impl From<String> for Version {
	fn from(raw: String) -> Self {
		Version::new(raw)
	}
}

impl From<Version> for String {
	fn from(version: Version) -> Self {
		version.0
	}
}

fn leading_number(part: &str) -> u64 {
	let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
	digits.parse().unwrap_or(0)
}

/// Compare component lists, treating missing trailing components as zero.
pub fn compare_components(a: &[u64], b: &[u64]) -> Ordering {
	let len = a.len().max(b.len());
	for i in 0..len {
		let left = a.get(i).copied().unwrap_or(0);
		let right = b.get(i).copied().unwrap_or(0);
		match left.cmp(&right) {
			Ordering::Equal => continue,
			other => return other,
		}
	}
	Ordering::Equal
}

/// Display ordering of raw version labels.
///
/// Numeric comparison when both labels are fully numeric; otherwise every
/// non-numeric label sorts after every numeric one, and sentinels sort last
/// among non-numeric labels.
pub fn compare_version_labels(a: &str, b: &str) -> Ordering {
	match (parse_numeric(a), parse_numeric(b)) {
		(Some(left), Some(right)) => compare_components(&left, &right),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => {
			let left_sentinel = Version::new(a).is_sentinel();
			let right_sentinel = Version::new(b).is_sentinel();
			left_sentinel.cmp(&right_sentinel).then_with(|| a.cmp(b))
		}
	}
}

fn parse_numeric(label: &str) -> Option<Vec<u64>> {
	let label = label.trim();
	if label.is_empty() {
		return None;
	}
	label.split('.').map(|part| part.parse::<u64>().ok()).collect()
}
