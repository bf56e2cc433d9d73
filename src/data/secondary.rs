use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::version::Version;

const COMPAT_KEY: &str = "__compat";
const META_KEY: &str = "__meta";

/// The secondary compatibility dataset: "version added / removed" records per
/// browser, keyed by dotted capability path (`api.fetch`,
/// `javascript.builtins.Array.flat`, ...).
///
/// Accepts either the nested tree the upstream project publishes, where each
/// capability carries a `__compat` node, or a flat map of path → record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct SecondaryDataset {
	features: BTreeMap<String, SecondaryFeature>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryFeature {
	/// secondary browser key → support statement
	#[serde(default)]
	pub support: BTreeMap<String, SupportStatement>,
}

/// A single record, or a history of records where at most one is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupportStatement {
	Single(SupportRecord),
	History(Vec<SupportRecord>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportRecord {
	#[serde(default)]
	pub version_added: Option<VersionValue>,
	#[serde(default)]
	pub version_removed: Option<VersionValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionValue {
	Flag(bool),
	Text(String),
}

/// First version a browser shipped a capability in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddedThreshold {
	/// Supported since the oldest known release.
	Oldest,
	Never,
	Since(Version),
}

impl SupportRecord {
	pub fn added(version: &str) -> Self {
		Self {
			version_added: Some(VersionValue::Text(version.to_string())),
			version_removed: None,
		}
	}

	pub fn is_removed(&self) -> bool {
		match &self.version_removed {
			None | Some(VersionValue::Flag(false)) => false,
			Some(_) => true,
		}
	}

	pub fn threshold(&self) -> AddedThreshold {
		match &self.version_added {
			None | Some(VersionValue::Flag(false)) => AddedThreshold::Never,
			Some(VersionValue::Flag(true)) => AddedThreshold::Oldest,
			Some(VersionValue::Text(text)) if text.eq_ignore_ascii_case("preview") => AddedThreshold::Never,
			Some(VersionValue::Text(text)) => match Version::from_label(text) {
				Some(version) => AddedThreshold::Since(version),
				None => AddedThreshold::Never,
			},
		}
	}
}

impl SupportStatement {
	/// The record describing current support: the only record, or the
	/// history entry that has not been removed.
	pub fn current(&self) -> Option<&SupportRecord> {
		match self {
			SupportStatement::Single(record) => Some(record),
			SupportStatement::History(records) => records.iter().find(|r| !r.is_removed()),
		}
	}

	pub fn threshold(&self) -> AddedThreshold {
		self.current()
			.map(SupportRecord::threshold)
			.unwrap_or(AddedThreshold::Never)
	}
}

impl SecondaryDataset {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn feature(&self, path: &str) -> Option<&SecondaryFeature> {
		self.features.get(path)
	}

	pub fn insert(&mut self, path: impl Into<String>, feature: SecondaryFeature) {
		self.features.insert(path.into(), feature);
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &SecondaryFeature)> {
		self.features.iter()
	}

	pub fn len(&self) -> usize {
		self.features.len()
	}

	pub fn is_empty(&self) -> bool {
		self.features.is_empty()
	}
}

impl TryFrom<Value> for SecondaryDataset {
	type Error = serde_json::Error;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		let mut dataset = SecondaryDataset::new();
		if let Value::Object(map) = value {
			for (key, child) in map {
				if key == META_KEY {
					continue;
				}
				flatten_into(&mut dataset, key, child)?;
			}
		}
		Ok(dataset)
	}
}

fn flatten_into(dataset: &mut SecondaryDataset, path: String, node: Value) -> Result<(), serde_json::Error> {
	let Value::Object(mut map) = node else {
		return Ok(());
	};

	// Flat form: the record sits directly under its dotted path.
	if map.contains_key("support") && !map.contains_key(COMPAT_KEY) {
		let feature: SecondaryFeature = serde_json::from_value(Value::Object(map))?;
		dataset.insert(path, feature);
		return Ok(());
	}

	if let Some(compat) = map.remove(COMPAT_KEY) {
		let feature: SecondaryFeature = serde_json::from_value(compat)?;
		dataset.insert(path.clone(), feature);
	}

	for (key, child) in map {
		flatten_into(dataset, format!("{path}.{key}"), child)?;
	}
	Ok(())
}
