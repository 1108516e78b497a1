//! Errors produced while building or inspecting test requests.

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in testrequest.
///
/// Malformed input is otherwise passed through untouched; these errors only
/// appear where a value cannot be represented at all.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The value given to `set_json_from_value` could not be encoded.
	#[error("failed to encode JSON body: {0}")]
	Json(#[from] serde_json::Error),
	/// The method, target or a header cannot be represented in an HTTP request.
	#[error("invalid request: {0}")]
	Http(#[from] hyper::http::Error),
	/// Reading a request body failed.
	#[error("failed to read body: {0}")]
	Body(#[from] hyper::Error),
	/// Reading a body source or a config file failed.
	#[error(transparent)]
	Io(#[from] std::io::Error),
	/// A config file is not valid TOML for [`crate::files::config::Config`].
	#[error("invalid config: {0}")]
	Config(#[from] toml::de::Error),
}

impl Error {
	/// Returns whether this is a JSON encoding failure, which always points
	/// at a bug in test setup.
	#[must_use]
	pub fn is_json(&self) -> bool {
		matches!(self, Error::Json(_))
	}
}

pub(crate) fn http_error<E>(err: E) -> Error
where
	hyper::http::Error: From<E>,
{
	Error::Http(hyper::http::Error::from(err))
}
