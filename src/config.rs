//! Declarative tables: normalization policy, corrections and identity rules.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::corrections::CorrectionTable;
use crate::data::NormalizationPolicy;
use crate::identity::IdentityConfig;
use crate::types::BrowserId;
use crate::version::Version;

pub const NORMALIZATION_FILE: &str = "normalization.yaml";
pub const CORRECTIONS_FILE: &str = "corrections.yaml";
pub const IDENTITY_FILE: &str = "identity.yaml";

const BUNDLED_NORMALIZATION: &str = include_str!("../data/normalization.yaml");
const BUNDLED_CORRECTIONS: &str = include_str!("../data/corrections.yaml");
const BUNDLED_IDENTITY: &str = include_str!("../data/identity.yaml");

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Malformed YAML: {0}")]
	Yaml(#[from] serde_yaml::Error),
	#[error("Invalid correction table: {0}")]
	InvalidTable(String),
	#[error("Invalid correction for {feature} on {browser}: {reason}")]
	InvalidCorrection {
		feature: String,
		browser: BrowserId,
		reason: String,
	},
	#[error("Duplicate correction for {feature} on {browser} {version}")]
	DuplicateCorrection {
		feature: String,
		browser: BrowserId,
		version: Version,
	},
	#[error("Invalid identity table: {0}")]
	InvalidIdentityTable(String),
	#[error("Invalid normalization policy: {0}")]
	InvalidPolicy(String),
}

/// Every table an engine needs, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatConfig {
	pub normalization: NormalizationPolicy,
	pub corrections: CorrectionTable,
	pub identity: IdentityConfig,
}

impl CompatConfig {
	/// The tables shipped with the crate.
	pub fn bundled() -> Result<Self, ConfigError> {
		Self::from_yaml_strs(BUNDLED_NORMALIZATION, BUNDLED_CORRECTIONS, BUNDLED_IDENTITY)
	}

	pub fn from_yaml_strs(normalization: &str, corrections: &str, identity: &str) -> Result<Self, ConfigError> {
		Ok(Self {
			normalization: NormalizationPolicy::from_yaml(normalization)?,
			corrections: CorrectionTable::from_yaml(corrections)?,
			identity: IdentityConfig::from_yaml(identity)?,
		})
	}

	/// Load from a directory. Missing files fall back to the bundled table.
	pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
		let normalization = read_or(dir, NORMALIZATION_FILE, BUNDLED_NORMALIZATION)?;
		let corrections = read_or(dir, CORRECTIONS_FILE, BUNDLED_CORRECTIONS)?;
		let identity = read_or(dir, IDENTITY_FILE, BUNDLED_IDENTITY)?;
		Self::from_yaml_strs(&normalization, &corrections, &identity)
	}
}

fn read_or(dir: &Path, file: &str, bundled: &str) -> Result<String, ConfigError> {
	let path = dir.join(file);
	if path.exists() {
		Ok(fs::read_to_string(path)?)
	} else {
		Ok(bundled.to_string())
	}
}
