use serde::{Deserialize, Serialize};

use crate::version::Version;

/// A name and version pair as reported by the identification-string parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedVersion {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub version: Option<String>,
}

impl NamedVersion {
	pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			version: Some(version.into()),
		}
	}

	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			version: None,
		}
	}

	/// Case-insensitive name comparison; `false` when no name was reported.
	pub fn is(&self, name: &str) -> bool {
		self.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name))
	}

	pub fn version(&self) -> Option<Version> {
		self.version.as_deref().and_then(Version::from_label)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
	#[serde(default)]
	pub vendor: Option<String>,
	#[serde(default)]
	pub model: Option<String>,
	#[serde(default)]
	pub kind: Option<String>,
}

/// Structured fields of a raw identification string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUserAgent {
	pub ua: String,
	#[serde(default)]
	pub browser: NamedVersion,
	#[serde(default)]
	pub engine: NamedVersion,
	#[serde(default)]
	pub os: NamedVersion,
	#[serde(default)]
	pub device: DeviceInfo,
}

impl ParsedUserAgent {
	pub fn new(ua: impl Into<String>) -> Self {
		Self {
			ua: ua.into(),
			..Self::default()
		}
	}

	pub fn with_browser(mut self, name: &str, version: &str) -> Self {
		self.browser = NamedVersion::new(name, version);
		self
	}

	pub fn with_engine(mut self, name: &str, version: &str) -> Self {
		self.engine = NamedVersion::new(name, version);
		self
	}

	pub fn with_os(mut self, name: &str, version: &str) -> Self {
		self.os = NamedVersion::new(name, version);
		self
	}

	pub fn with_device_vendor(mut self, vendor: &str) -> Self {
		self.device.vendor = Some(vendor.to_string());
		self
	}

	pub fn is_android(&self) -> bool {
		self.os.is("Android")
	}

	pub fn is_ios(&self) -> bool {
		self.os.is("iOS") || self.os.is("iPadOS")
	}

	/// Lowercased browser name, if any.
	pub(crate) fn browser_key(&self) -> Option<String> {
		self.browser.name.as_deref().map(|n| n.trim().to_ascii_lowercase())
	}

	pub(crate) fn ua_contains(&self, needle: &str) -> bool {
		self.ua.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
	}
}

/// The generic identification-string parser.
pub trait UserAgentParser {
	fn parse(&self, raw: &str) -> ParsedUserAgent;
}

impl<F> UserAgentParser for F
where
	F: Fn(&str) -> ParsedUserAgent,
{
	fn parse(&self, raw: &str) -> ParsedUserAgent {
		self(raw)
	}
}
