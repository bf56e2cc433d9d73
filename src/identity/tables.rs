use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::identity::alignment::ForkAlignment;
use crate::identity::parsed::ParsedUserAgent;
use crate::identity::UserAgentIdentity;
use crate::types::BrowserId;
use crate::version::Version;

/// A fixed (browser, version) pair as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityEntry {
	pub browser: BrowserId,
	pub version: Version,
}

impl IdentityEntry {
	pub fn new(browser: BrowserId, version: impl Into<Version>) -> Self {
		Self {
			browser,
			version: version.into(),
		}
	}

	pub fn identity(&self) -> UserAgentIdentity {
		UserAgentIdentity::new(self.browser, self.version.clone())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotOverrides {
	/// Crawlers that render like an evergreen browser.
	pub friendly: Vec<String>,
	pub friendly_identity: IdentityEntry,
	pub default_identity: IdentityEntry,
	/// Parsed browser names never overridden, even when flagged.
	#[serde(default)]
	pub excluded_browsers: Vec<String>,
}

/// A vendor in-app browser on Android that reports no engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InAppRule {
	pub browser: String,
	pub majors: BTreeSet<u64>,
	pub identity: IdentityEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
	pub version: u32,
	pub fallback: IdentityEntry,
	pub bots: BotOverrides,
	#[serde(default)]
	pub forks: Vec<ForkAlignment>,
	#[serde(default)]
	pub in_app: Vec<InAppRule>,
}

impl IdentityConfig {
	pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
		let config: IdentityConfig = serde_yaml::from_str(yaml)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		let fixed = [
			&self.fallback,
			&self.bots.friendly_identity,
			&self.bots.default_identity,
		];
		for identity in fixed.into_iter().chain(self.in_app.iter().map(|rule| &rule.identity)) {
			let parseable = identity.version.is_sentinel()
				|| Version::from_label(identity.version.as_str()).as_ref() == Some(&identity.version);
			if !parseable {
				return Err(ConfigError::InvalidIdentityTable(format!(
					"unparseable version {} for {}",
					identity.version, identity.browser
				)));
			}
		}

		if self.bots.friendly.iter().any(|name| name.trim().is_empty()) {
			return Err(ConfigError::InvalidIdentityTable("empty friendly crawler name".into()));
		}
		for fork in &self.forks {
			fork.validate().map_err(ConfigError::InvalidIdentityTable)?;
		}
		for rule in &self.in_app {
			if rule.browser.trim().is_empty() || rule.majors.is_empty() {
				return Err(ConfigError::InvalidIdentityTable(format!(
					"in-app rule {:?} needs a browser name and at least one major",
					rule.browser
				)));
			}
		}
		Ok(())
	}

	pub fn fork_for(&self, parsed: &ParsedUserAgent) -> Option<&ForkAlignment> {
		self.forks.iter().find(|fork| fork.matches(parsed))
	}

	pub fn in_app_for(&self, parsed: &ParsedUserAgent) -> Option<&InAppRule> {
		if !parsed.is_android() || parsed.engine.name.is_some() {
			return None;
		}
		let major = parsed.browser.version()?.major();
		self.in_app
			.iter()
			.find(|rule| parsed.browser.is(&rule.browser) && rule.majors.contains(&major))
	}
}
