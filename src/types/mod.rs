pub mod browser;
pub mod clause;
pub mod support;

pub use browser::{BrowserId, UnknownBrowser};
pub use clause::{ClauseParseError, ComparisonOperator, QueryClause};
pub use support::{BrowserSupport, FeatureSupport, SupportKind};
