use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The primary compatibility dataset: per-feature, per-browser, per-version
/// support codes (`"y"`, `"n"`, `"a x #2"`, ...).
///
/// Only the `data` section is read; other top-level sections are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryDataset {
	#[serde(default)]
	pub data: BTreeMap<String, PrimaryFeature>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryFeature {
	#[serde(default)]
	pub title: String,
	/// browser key → raw version label → support code
	#[serde(default)]
	pub stats: BTreeMap<String, BTreeMap<String, String>>,
}

impl PrimaryDataset {
	pub fn feature(&self, id: &str) -> Option<&PrimaryFeature> {
		self.data.get(id)
	}

	pub fn insert(&mut self, id: impl Into<String>, feature: PrimaryFeature) {
		self.data.insert(id.into(), feature);
	}
}
