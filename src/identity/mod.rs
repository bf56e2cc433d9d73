//! Client identity resolution.
//!
//! A raw identification string is parsed by a [`UserAgentParser`], run
//! through the ordered rule cascade in [`rules`], overridden for flagged
//! automation, and finally trimmed to the version granularity the support
//! matrix tracks.

pub mod alignment;
pub mod bots;
pub mod canonical;
pub mod parsed;
pub mod rules;
pub mod tables;

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::types::BrowserId;
use crate::version::Version;

pub use alignment::{EarlySegment, ForkAlignment, PlateauSegment};
pub use bots::{BotClassifier, SignatureBotClassifier, DEFAULT_BOT_SIGNATURES};
pub use canonical::{canonicalize, VersionGranularity};
pub use parsed::{DeviceInfo, NamedVersion, ParsedUserAgent, UserAgentParser};
pub use rules::{bot_override, IdentityRule, RuleContext, RULES};
pub use tables::{BotOverrides, IdentityConfig, IdentityEntry, InAppRule};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
	#[error("Unable to resolve a browser identity for: {0}")]
	UnresolvedIdentity(String),
}

/// Canonical (browser, version) pair of a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserAgentIdentity {
	pub browser: BrowserId,
	pub version: Version,
}

impl UserAgentIdentity {
	pub fn new(browser: BrowserId, version: Version) -> Self {
		Self { browser, version }
	}
}

impl fmt::Display for UserAgentIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.browser, self.version)
	}
}

pub struct ClientIdentityResolver<P, B = SignatureBotClassifier> {
	parser: P,
	bots: B,
	config: IdentityConfig,
	identities: RwLock<HashMap<String, UserAgentIdentity>>,
}

impl<P: UserAgentParser> ClientIdentityResolver<P, SignatureBotClassifier> {
	pub fn with_default_bots(parser: P, config: IdentityConfig) -> Self {
		Self::new(parser, SignatureBotClassifier::default(), config)
	}
}

impl<P, B> ClientIdentityResolver<P, B>
where
	P: UserAgentParser,
	B: BotClassifier,
{
	pub fn new(parser: P, bots: B, config: IdentityConfig) -> Self {
		Self {
			parser,
			bots,
			config,
			identities: RwLock::new(HashMap::new()),
		}
	}

	pub fn config(&self) -> &IdentityConfig {
		&self.config
	}

	/// Resolve and cache. Failures are not cached.
	pub fn resolve(&self, raw: &str) -> Result<UserAgentIdentity, IdentityError> {
		if let Some(cached) = self
			.identities
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(raw)
		{
			return Ok(cached.clone());
		}

		debug!(ua = raw, "Resolving client identity");
		let parsed = self.parser.parse(raw);
		let identity = self.resolve_parsed(&parsed)?;

		self.identities
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(raw.to_string(), identity.clone());
		Ok(identity)
	}

	/// [`resolve`](Self::resolve), or the configured fallback identity.
	pub fn resolve_or_fallback(&self, raw: &str) -> UserAgentIdentity {
		self.resolve(raw)
			.unwrap_or_else(|_| self.config.fallback.identity())
	}

	/// Uncached resolution of an already parsed string.
	pub fn resolve_parsed(&self, parsed: &ParsedUserAgent) -> Result<UserAgentIdentity, IdentityError> {
		let ctx = RuleContext {
			parsed,
			config: &self.config,
		};

		let cascade = rules::evaluate(&ctx).map(|(rule, identity)| {
			trace!(rule, identity = %identity, "Identity rule matched");
			identity
		});

		let identity = match bot_override(parsed, &self.config, &self.bots) {
			Some(bot) => {
				trace!(identity = %bot, "Automation override");
				bot
			}
			None => cascade.ok_or_else(|| IdentityError::UnresolvedIdentity(parsed.ua.clone()))?,
		};

		let version = canonicalize(identity.browser, &identity.version);
		Ok(UserAgentIdentity::new(identity.browser, version))
	}
}
