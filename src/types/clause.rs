use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::browser::{BrowserId, UnknownBrowser};
use crate::version::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
	#[serde(rename = "<")]
	Less,
	#[serde(rename = "<=")]
	LessOrEqual,
	#[serde(rename = ">")]
	Greater,
	#[serde(rename = ">=")]
	GreaterOrEqual,
}

impl ComparisonOperator {
	/// `<` and `<=` ask for browsers that do not support a feature set.
	pub fn is_negative(&self) -> bool {
		matches!(self, ComparisonOperator::Less | ComparisonOperator::LessOrEqual)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ComparisonOperator::Less => "<",
			ComparisonOperator::LessOrEqual => "<=",
			ComparisonOperator::Greater => ">",
			ComparisonOperator::GreaterOrEqual => ">=",
		}
	}
}

impl fmt::Display for ComparisonOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ComparisonOperator {
	type Err = ClauseParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"<" => Ok(ComparisonOperator::Less),
			"<=" => Ok(ComparisonOperator::LessOrEqual),
			">" => Ok(ComparisonOperator::Greater),
			">=" => Ok(ComparisonOperator::GreaterOrEqual),
			other => Err(ClauseParseError::InvalidOperator(other.to_string())),
		}
	}
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClauseParseError {
	#[error("Empty query clause")]
	Empty,
	#[error("Invalid comparison operator: {0}")]
	InvalidOperator(String),
	#[error(transparent)]
	UnknownBrowser(#[from] UnknownBrowser),
	#[error("Unrecognized query clause: {0}")]
	Unrecognized(String),
}

/// One clause of the textual query language shared with the external
/// query-resolution collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum QueryClause {
	/// `<browser> <op> <version>`
	Range {
		browser: BrowserId,
		operator: ComparisonOperator,
		version: Version,
	},
	/// `<browser> <version>`
	Exact { browser: BrowserId, version: Version },
	/// `unreleased <browser> versions`
	Unreleased { browser: BrowserId },
	/// `not <clause>`
	Not(Box<QueryClause>),
}

impl QueryClause {
	pub fn range(browser: BrowserId, operator: ComparisonOperator, version: Version) -> Self {
		QueryClause::Range {
			browser,
			operator,
			version,
		}
	}

	pub fn exact(browser: BrowserId, version: Version) -> Self {
		QueryClause::Exact { browser, version }
	}

	pub fn unreleased(browser: BrowserId) -> Self {
		QueryClause::Unreleased { browser }
	}

	pub fn negate(self) -> Self {
		QueryClause::Not(Box::new(self))
	}

	pub fn is_negated(&self) -> bool {
		matches!(self, QueryClause::Not(_))
	}

	pub fn browser(&self) -> BrowserId {
		match self {
			QueryClause::Range { browser, .. }
			| QueryClause::Exact { browser, .. }
			| QueryClause::Unreleased { browser } => *browser,
			QueryClause::Not(inner) => inner.browser(),
		}
	}
}

impl fmt::Display for QueryClause {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			QueryClause::Range {
				browser,
				operator,
				version,
			} => write!(f, "{browser} {operator} {version}"),
			QueryClause::Exact { browser, version } => write!(f, "{browser} {version}"),
			QueryClause::Unreleased { browser } => write!(f, "unreleased {browser} versions"),
			QueryClause::Not(inner) => write!(f, "not {inner}"),
		}
	}
}

impl FromStr for QueryClause {
	type Err = ClauseParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let words: Vec<&str> = s.split_whitespace().collect();
		match words.as_slice() {
			[] => Err(ClauseParseError::Empty),
			[not, rest @ ..] if not.eq_ignore_ascii_case("not") => {
				let inner: QueryClause = rest.join(" ").parse()?;
				Ok(inner.negate())
			}
			[unreleased, browser, versions]
				if unreleased.eq_ignore_ascii_case("unreleased")
					&& versions.eq_ignore_ascii_case("versions") =>
			{
				Ok(QueryClause::unreleased(browser.parse()?))
			}
			[browser, operator, version] => Ok(QueryClause::range(
				browser.parse()?,
				operator.parse()?,
				Version::new(*version),
			)),
			[browser, version] => Ok(QueryClause::exact(browser.parse()?, Version::new(*version))),
			_ => Err(ClauseParseError::Unrecognized(s.to_string())),
		}
	}
}

impl From<QueryClause> for String {
	fn from(clause: QueryClause) -> Self {
		clause.to_string()
	}
}

impl TryFrom<String> for QueryClause {
	type Error = ClauseParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
