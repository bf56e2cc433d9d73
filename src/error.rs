use thiserror::Error;

use crate::config::ConfigError;
use crate::data::DataError;
use crate::identity::IdentityError;
use crate::support::SupportError;
use crate::types::ClauseParseError;

#[derive(Debug, Error)]
pub enum CompatError {
	#[error(transparent)]
	Support(#[from] SupportError),
	#[error(transparent)]
	Identity(#[from] IdentityError),
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Data(#[from] DataError),
	#[error(transparent)]
	Clause(#[from] ClauseParseError),
	#[error("Query resolution failed: {0}")]
	QueryResolution(String),
}
