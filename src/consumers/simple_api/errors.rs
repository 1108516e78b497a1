use hyper::StatusCode;

/// Errors returned by the book API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	/// Missing or rejected credentials.
	#[error("unauthorized")]
	Unauthorized,
	/// The request could not be decoded or failed validation.
	#[error("bad request")]
	BadRequest,
	/// The request body is neither a form nor JSON.
	#[error("unsupported media type")]
	UnsupportedMediaType,
	/// A collaborator such as the store or token introspection failed.
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ApiError {
	/// The status code a client should see for this error.
	#[must_use]
	pub fn status_code(&self) -> StatusCode {
		match self {
			ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
			ApiError::BadRequest => StatusCode::BAD_REQUEST,
			ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
			ApiError::Other(err) => err
				.chain()
				.find_map(|e| e.downcast_ref::<ApiError>())
				.map_or(StatusCode::INTERNAL_SERVER_ERROR, ApiError::status_code),
		}
	}
}

/// Maps any error to a status code by looking for an [`ApiError`] in its
/// source chain. Anything else is a 500.
#[must_use]
pub fn error_status_code(err: &(dyn std::error::Error + 'static)) -> StatusCode {
	std::iter::successors(Some(err), |e| e.source())
		.find_map(|e| e.downcast_ref::<ApiError>())
		.map_or(StatusCode::INTERNAL_SERVER_ERROR, ApiError::status_code)
}
