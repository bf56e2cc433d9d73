use crate::types::BrowserId;
use crate::version::Version;

/// How many version components the support matrix tracks for a browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionGranularity {
	Major,
	MajorMinor,
	/// major.minor[.patch] below major 5, major from 5 on.
	Android,
	/// Only ever reported as the "all" sentinel.
	All,
}

impl VersionGranularity {
	pub fn of(browser: BrowserId) -> Self {
		match browser {
			BrowserId::Chrome
			| BrowserId::AndChr
			| BrowserId::Firefox
			| BrowserId::AndFf
			| BrowserId::Edge
			| BrowserId::Opera
			| BrowserId::OpMob
			| BrowserId::Ie
			| BrowserId::IeMob
			| BrowserId::Bb => VersionGranularity::Major,
			BrowserId::Safari
			| BrowserId::IosSaf
			| BrowserId::Samsung
			| BrowserId::AndUc
			| BrowserId::AndQq
			| BrowserId::Baidu
			| BrowserId::Kaios => VersionGranularity::MajorMinor,
			BrowserId::Android => VersionGranularity::Android,
			BrowserId::OpMini => VersionGranularity::All,
		}
	}
}

/// Trim a resolved version to the granularity of `browser`. Sentinels pass
/// through except for browsers tracked only as "all".
pub fn canonicalize(browser: BrowserId, version: &Version) -> Version {
	let granularity = VersionGranularity::of(browser);
	if granularity == VersionGranularity::All {
		return Version::all();
	}
	if version.is_sentinel() {
		return version.clone();
	}

	match granularity {
		VersionGranularity::Major => version.truncated(1),
		VersionGranularity::MajorMinor => version.truncated(2),
		VersionGranularity::Android if version.major() >= 5 => version.truncated(1),
		VersionGranularity::Android => {
			let len = version.components().len().clamp(2, 3);
			version.truncated(len)
		}
		VersionGranularity::All => Version::all(),
	}
}
