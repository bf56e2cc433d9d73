use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::BrowserId;
use crate::version::token::{compare_components, Version, VersionKind};

/// Sorted, deduplicated version list of every browser, plus the total order
/// over version tokens that the list defines.
#[derive(Debug, Clone, Default)]
pub struct KnownVersions {
	browsers: BTreeMap<BrowserId, VersionList>,
}

#[derive(Debug, Clone, Default)]
struct VersionList {
	versions: Vec<Version>,
	/// Numeric position of the preview sentinel, when the list has one.
	preview_rank: Option<Vec<u64>>,
}

impl VersionList {
	fn build(raw: Vec<Version>) -> Self {
		let mut numeric: Vec<Version> = Vec::with_capacity(raw.len());
		let mut has_all = false;
		let mut has_preview = false;

		for version in raw {
			match version.kind() {
				VersionKind::All => has_all = true,
				VersionKind::Preview => has_preview = true,
				VersionKind::Numeric(_) => numeric.push(version),
			}
		}

		numeric.sort_by(|a, b| compare_components(&a.components(), &b.components()));
		numeric.dedup_by(|a, b| compare_components(&a.components(), &b.components()) == Ordering::Equal);

		let preview_rank = if has_preview {
			numeric.last().map(|latest| advance(&latest.components()))
		} else {
			None
		};

		let mut versions = Vec::with_capacity(numeric.len() + 2);
		if has_all {
			versions.push(Version::all());
		}
		versions.extend(numeric);
		if has_preview {
			versions.push(Version::preview());
		}

		Self {
			versions,
			preview_rank,
		}
	}

	/// Sort key: numeric position first, then all < numeric < preview.
	fn rank(&self, version: &Version) -> (Vec<u64>, u8) {
		match version.kind() {
			VersionKind::All => (vec![0], 0),
			VersionKind::Numeric(components) => (components, 1),
			VersionKind::Preview => (
				self.preview_rank.clone().unwrap_or_else(|| vec![u64::MAX]),
				2,
			),
		}
	}

	fn compare(&self, a: &Version, b: &Version) -> Ordering {
		let (left, left_tier) = self.rank(a);
		let (right, right_tier) = self.rank(b);
		compare_components(&left, &right).then(left_tier.cmp(&right_tier))
	}

	fn latest_stable(&self) -> Option<&Version> {
		self.versions.iter().rev().find(|v| !v.is_sentinel())
	}

	fn position(&self, version: &Version) -> Option<usize> {
		self.versions
			.iter()
			.position(|known| self.compare(known, version) == Ordering::Equal)
	}
}

/// One step past the newest stable release: a minor of 9 rolls the major.
fn advance(latest: &[u64]) -> Vec<u64> {
	let major = latest.first().copied().unwrap_or(0);
	let minor = latest.get(1).copied().unwrap_or(0);
	if minor == 9 {
		vec![major + 1, 0]
	} else {
		vec![major, minor + 1]
	}
}

fn major_minor(version: &Version) -> Vec<u64> {
	let mut components = version.components();
	components.resize(2, 0);
	components
}

impl KnownVersions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from raw per-browser version lists; lists are sorted and deduplicated.
	pub fn from_lists<I>(lists: I) -> Self
	where
		I: IntoIterator<Item = (BrowserId, Vec<Version>)>,
	{
		let mut known = KnownVersions::new();
		for (browser, versions) in lists {
			known.merge(browser, versions);
		}
		known
	}

	/// Add versions to a browser's list, re-sorting it once.
	pub(crate) fn merge<I>(&mut self, browser: BrowserId, versions: I)
	where
		I: IntoIterator<Item = Version>,
	{
		let list = self.browsers.entry(browser).or_default();
		let mut raw = std::mem::take(&mut list.versions);
		raw.extend(versions);
		*list = VersionList::build(raw);
	}

	pub(crate) fn insert(&mut self, browser: BrowserId, version: Version) {
		let present = self
			.browsers
			.get(&browser)
			.and_then(|list| list.position(&version))
			.is_some();
		if !present {
			self.merge(browser, [version]);
		}
	}

	/// Prepend whole major versions until the first numeric entry no longer
	/// follows `threshold`. Lists without numeric entries are left alone.
	pub(crate) fn extend_backwards(&mut self, browser: BrowserId, threshold: &Version) {
		if threshold.is_sentinel() {
			return;
		}
		let target = threshold.components();

		loop {
			let first = self
				.browsers
				.get(&browser)
				.and_then(|list| list.versions.iter().find(|v| !v.is_sentinel()).cloned());

			let Some(first) = first else {
				return;
			};

			let first_major = first.major();
			if compare_components(&target, &first.components()) != Ordering::Less || first_major == 0 {
				return;
			}
			self.insert(browser, Version::from_components(&[first_major - 1]));
		}
	}

	pub fn browsers(&self) -> impl Iterator<Item = BrowserId> + '_ {
		self.browsers.keys().copied()
	}

	/// Known versions of `browser`, ascending.
	pub fn versions(&self, browser: BrowserId) -> &[Version] {
		self.browsers
			.get(&browser)
			.map(|list| list.versions.as_slice())
			.unwrap_or(&[])
	}

	pub fn compare(&self, browser: BrowserId, a: &Version, b: &Version) -> Ordering {
		match self.browsers.get(&browser) {
			Some(list) => list.compare(a, b),
			None => VersionList::default().compare(a, b),
		}
	}

	pub fn contains(&self, browser: BrowserId, version: &Version) -> bool {
		self.browsers
			.get(&browser)
			.and_then(|list| list.position(version))
			.is_some()
	}

	pub fn oldest(&self, browser: BrowserId) -> Option<&Version> {
		self.versions(browser).first()
	}

	pub fn latest(&self, browser: BrowserId) -> Option<&Version> {
		self.versions(browser).last()
	}

	pub fn latest_stable(&self, browser: BrowserId) -> Option<&Version> {
		self.browsers.get(&browser)?.latest_stable()
	}

	/// Floor match against the known list.
	///
	/// Sentinel inputs pass through. On browsers with a preview channel, an
	/// input whose major.minor is newer than the newest stable release maps to
	/// the preview sentinel. Inputs older than every known version yield `None`.
	pub fn closest_known_version(&self, browser: BrowserId, version: &Version) -> Option<Version> {
		if version.is_sentinel() {
			return Some(version.clone());
		}

		let list = self.browsers.get(&browser)?;
		if let [only] = list.versions.as_slice() {
			if only.is_all() {
				return Some(only.clone());
			}
		}

		let has_preview = list.versions.last().is_some_and(Version::is_preview);
		if has_preview {
			if let Some(stable) = list.latest_stable() {
				if compare_components(&major_minor(version), &major_minor(stable)) == Ordering::Greater {
					return Some(Version::preview());
				}
			}
		}

		list.versions
			.iter()
			.rev()
			.find(|known| list.compare(known, version) != Ordering::Greater)
			.cloned()
	}

	/// Clamp inputs newer than the newest known version to it; otherwise
	/// behave like [`closest_known_version`](Self::closest_known_version).
	pub fn normalize_to_latest_known(&self, browser: BrowserId, version: &Version) -> Option<Version> {
		let latest = self.latest(browser)?;
		if self.compare(browser, version, latest) == Ordering::Greater {
			return Some(latest.clone());
		}
		self.closest_known_version(browser, version)
	}

	pub fn previous_known_version(&self, browser: BrowserId, version: &Version) -> Option<Version> {
		let (list, index) = self.neighbor_base(browser, version)?;
		if index == 0 {
			return None;
		}
		list.versions.get(index - 1).cloned()
	}

	pub fn next_known_version(&self, browser: BrowserId, version: &Version) -> Option<Version> {
		let (list, index) = self.neighbor_base(browser, version)?;
		list.versions.get(index + 1).cloned()
	}

	fn neighbor_base(&self, browser: BrowserId, version: &Version) -> Option<(&VersionList, usize)> {
		let list = self.browsers.get(&browser)?;
		let closest = self.closest_known_version(browser, version)?;
		let index = list.position(&closest)?;
		Some((list, index))
	}
}
