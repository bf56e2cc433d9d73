use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical runtime identifiers, named the way the clause syntax names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserId {
	AndChr,
	AndFf,
	AndQq,
	AndUc,
	Android,
	Baidu,
	Bb,
	Chrome,
	Edge,
	Firefox,
	Ie,
	IeMob,
	IosSaf,
	Kaios,
	OpMini,
	OpMob,
	Opera,
	Safari,
	Samsung,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown browser: {0}")]
pub struct UnknownBrowser(pub String);

impl BrowserId {
	pub const ALL: [BrowserId; 19] = [
		BrowserId::AndChr,
		BrowserId::AndFf,
		BrowserId::AndQq,
		BrowserId::AndUc,
		BrowserId::Android,
		BrowserId::Baidu,
		BrowserId::Bb,
		BrowserId::Chrome,
		BrowserId::Edge,
		BrowserId::Firefox,
		BrowserId::Ie,
		BrowserId::IeMob,
		BrowserId::IosSaf,
		BrowserId::Kaios,
		BrowserId::OpMini,
		BrowserId::OpMob,
		BrowserId::Opera,
		BrowserId::Safari,
		BrowserId::Samsung,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			BrowserId::AndChr => "and_chr",
			BrowserId::AndFf => "and_ff",
			BrowserId::AndQq => "and_qq",
			BrowserId::AndUc => "and_uc",
			BrowserId::Android => "android",
			BrowserId::Baidu => "baidu",
			BrowserId::Bb => "bb",
			BrowserId::Chrome => "chrome",
			BrowserId::Edge => "edge",
			BrowserId::Firefox => "firefox",
			BrowserId::Ie => "ie",
			BrowserId::IeMob => "ie_mob",
			BrowserId::IosSaf => "ios_saf",
			BrowserId::Kaios => "kaios",
			BrowserId::OpMini => "op_mini",
			BrowserId::OpMob => "op_mob",
			BrowserId::Opera => "opera",
			BrowserId::Safari => "safari",
			BrowserId::Samsung => "samsung",
		}
	}
}

impl fmt::Display for BrowserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for BrowserId {
	type Err = UnknownBrowser;

	/// Case-insensitive; accepts canonical ids and the usual query aliases.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lowered = s.trim().to_lowercase();
		if let Some(id) = BrowserId::ALL.iter().find(|b| b.as_str() == lowered) {
			return Ok(*id);
		}

		let id = match lowered.as_str() {
			"fx" | "ff" => BrowserId::Firefox,
			"explorer" => BrowserId::Ie,
			"explorermobile" => BrowserId::IeMob,
			"ios" => BrowserId::IosSaf,
			"blackberry" => BrowserId::Bb,
			"chromeandroid" => BrowserId::AndChr,
			"firefoxandroid" => BrowserId::AndFf,
			"operamini" => BrowserId::OpMini,
			"operamobile" => BrowserId::OpMob,
			"ucandroid" => BrowserId::AndUc,
			"qqandroid" => BrowserId::AndQq,
			_ => return Err(UnknownBrowser(s.to_string())),
		};
		Ok(id)
	}
}
