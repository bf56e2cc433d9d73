//! Feature-support and client-identity resolution over browser compatibility data.
//!
//! `compat-core` normalizes a caniuse-style primary dataset and an MDN-style
//! secondary dataset into per-feature support matrices, patches them with a
//! declarative correction table, and answers two questions: which browser
//! versions support a set of features (as textual query clauses), and which
//! canonical browser version a raw identification string belongs to.
//!
//! Everything is computed in memory and cached for the lifetime of a
//! [`CompatEngine`]; nothing is fetched or persisted.

pub mod config;
pub mod corrections;
pub mod data;
pub mod engine;
pub mod error;
pub mod identity;
pub mod support;
pub mod types;
pub mod version;

pub use config::{CompatConfig, ConfigError};
pub use engine::{BoxError, CompatEngine, QueryResolver};
pub use error::CompatError;
pub use identity::{ClientIdentityResolver, IdentityError, ParsedUserAgent, UserAgentIdentity, UserAgentParser};
pub use support::{FeatureSupportResolver, SupportError, SupportQuery, Threshold};
pub use types::{BrowserId, ComparisonOperator, FeatureSupport, QueryClause, SupportKind};
pub use version::{KnownVersions, Version};
