use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::CompatConfig;
use crate::data::ReferenceData;
use crate::error::CompatError;
use crate::identity::{BotClassifier, ClientIdentityResolver, SignatureBotClassifier, UserAgentIdentity, UserAgentParser};
use crate::support::{FeatureSupportResolver, SupportQuery};
use crate::types::{BrowserId, ComparisonOperator, FeatureSupport, QueryClause};
use crate::version::{KnownVersions, Version};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Expands textual query clauses into literal `"<browser> <version>"` entries.
pub trait QueryResolver {
	fn resolve(&self, clauses: &[String]) -> Result<BTreeSet<String>, BoxError>;
}

impl<F> QueryResolver for F
where
	F: Fn(&[String]) -> Result<BTreeSet<String>, BoxError>,
{
	fn resolve(&self, clauses: &[String]) -> Result<BTreeSet<String>, BoxError> {
		self(clauses)
	}
}

/// Owns the version ordering, the feature resolver and the identity
/// resolver built over one snapshot of reference data.
pub struct CompatEngine<P, B = SignatureBotClassifier> {
	known: Arc<KnownVersions>,
	features: FeatureSupportResolver,
	identities: ClientIdentityResolver<P, B>,
}

impl<P: UserAgentParser> CompatEngine<P, SignatureBotClassifier> {
	pub fn with_default_bots(data: ReferenceData, config: CompatConfig, parser: P) -> Self {
		Self::new(data, config, parser, SignatureBotClassifier::default())
	}

	/// Read both datasets from JSON files.
	pub fn load(
		primary: &Path,
		secondary: &Path,
		config: CompatConfig,
		parser: P,
	) -> Result<Self, CompatError> {
		let data = ReferenceData::load(primary, secondary)?;
		Ok(Self::with_default_bots(data, config, parser))
	}
}

impl<P, B> CompatEngine<P, B>
where
	P: UserAgentParser,
	B: BotClassifier,
{
	pub fn new(data: ReferenceData, config: CompatConfig, parser: P, bots: B) -> Self {
		let CompatConfig {
			normalization,
			corrections,
			identity,
		} = config;

		let known = Arc::new(data.known_versions(&normalization));
		debug!(browsers = known.browsers().count(), "Built known version lists");

		let features = FeatureSupportResolver::new(Arc::new(data), Arc::clone(&known), normalization, corrections);
		let identities = ClientIdentityResolver::new(parser, bots, identity);
		Self {
			known,
			features,
			identities,
		}
	}

	pub fn known(&self) -> &KnownVersions {
		&self.known
	}

	pub fn known_versions(&self, browser: BrowserId) -> &[Version] {
		self.known.versions(browser)
	}

	pub fn closest_known_version(&self, browser: BrowserId, version: &Version) -> Option<Version> {
		self.known.closest_known_version(browser, version)
	}

	pub fn normalize_to_latest_known(&self, browser: BrowserId, version: &Version) -> Option<Version> {
		self.known.normalize_to_latest_known(browser, version)
	}

	pub fn previous_known_version(&self, browser: BrowserId, version: &Version) -> Option<Version> {
		self.known.previous_known_version(browser, version)
	}

	pub fn next_known_version(&self, browser: BrowserId, version: &Version) -> Option<Version> {
		self.known.next_known_version(browser, version)
	}

	pub fn feature_support(&self, feature: &str) -> Result<Arc<FeatureSupport>, CompatError> {
		Ok(self.features.feature_support(feature)?)
	}

	pub fn resolve_features<S: AsRef<str>>(
		&self,
		operator: ComparisonOperator,
		features: &[S],
	) -> Result<Arc<SupportQuery>, CompatError> {
		Ok(self.features.resolve(operator, features)?)
	}

	pub fn browserslist_supporting_features<S: AsRef<str>>(
		&self,
		features: &[S],
	) -> Result<Vec<QueryClause>, CompatError> {
		Ok(self.features.supporting(features)?)
	}

	pub fn browserslist_not_supporting_features<S: AsRef<str>>(
		&self,
		features: &[S],
	) -> Result<Vec<QueryClause>, CompatError> {
		Ok(self.features.not_supporting(features)?)
	}

	pub fn resolve_user_agent(&self, raw: &str) -> Result<UserAgentIdentity, CompatError> {
		Ok(self.identities.resolve(raw)?)
	}

	pub fn resolve_user_agent_or_fallback(&self, raw: &str) -> UserAgentIdentity {
		self.identities.resolve_or_fallback(raw)
	}

	/// Whether the client is one of the versions `clauses` expand to.
	pub fn user_agent_matches_clauses<R>(
		&self,
		raw: &str,
		clauses: &[QueryClause],
		resolver: &R,
	) -> Result<bool, CompatError>
	where
		R: QueryResolver + ?Sized,
	{
		let identity = self.identities.resolve(raw)?;
		let version = self
			.known
			.normalize_to_latest_known(identity.browser, &identity.version)
			.unwrap_or(identity.version);

		let textual: Vec<String> = clauses.iter().map(ToString::to_string).collect();
		let expanded = resolver
			.resolve(&textual)
			.map_err(|e| CompatError::QueryResolution(e.to_string()))?;

		for literal in &expanded {
			if let QueryClause::Exact { browser, version: listed } = literal.parse::<QueryClause>()? {
				if browser == identity.browser
					&& self.known.compare(browser, &listed, &version) == Ordering::Equal
				{
					return Ok(true);
				}
			}
		}
		Ok(false)
	}

	pub fn user_agent_supports_features<S, R>(&self, raw: &str, features: &[S], resolver: &R) -> Result<bool, CompatError>
	where
		S: AsRef<str>,
		R: QueryResolver + ?Sized,
	{
		let clauses = self.browserslist_supporting_features(features)?;
		self.user_agent_matches_clauses(raw, &clauses, resolver)
	}
}
