//! Reader configuration
use serde::Deserialize;
use smartstring::{LazyCompact, SmartString};
use thiserror::Error;

/// The prefix of every environment variable we read options from
pub const ENV_PREFIX: &str = "FLACSCOPE_";

/// An error we encounter while loading options from the environment
#[derive(Debug, Error)]
pub enum OptionsLoadError {
	/// A required variable is missing
	#[error("missing value {0}")]
	MissingValue(SmartString<LazyCompact>),

	/// A variable has an invalid value
	#[error("parse error: {0}")]
	OtherParseError(String),
}

impl From<envy::Error> for OptionsLoadError {
	fn from(value: envy::Error) -> Self {
		match value {
			envy::Error::MissingValue(value) => Self::MissingValue(value.into()),
			envy::Error::Custom(message) => Self::OtherParseError(message),
		}
	}
}

/// Options that control how a flac file is read
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlacReadOptions {
	/// If true, refuse files whose first metablock isn't streaminfo.
	/// Otherwise, streaminfo may appear anywhere.
	pub require_streaminfo_first: bool,

	/// If true, decode pictures stored in `METADATA_BLOCK_PICTURE` vorbis comments
	pub decode_comment_pictures: bool,
}

impl Default for FlacReadOptions {
	fn default() -> Self {
		Self {
			require_streaminfo_first: false,
			decode_comment_pictures: true,
		}
	}
}

impl FlacReadOptions {
	/// Load options from `FLACSCOPE_*` environment variables.
	/// Options that aren't set keep their default value.
	pub fn from_env() -> Result<Self, OptionsLoadError> {
		Self::from_vars(std::env::vars())
	}

	/// Load options from the given `(name, value)` pairs,
	/// named as they would be in the environment.
	pub fn from_vars(
		vars: impl IntoIterator<Item = (String, String)>,
	) -> Result<Self, OptionsLoadError> {
		Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
	}
}
