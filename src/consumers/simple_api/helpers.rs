use hyper::{
	header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
	Request, StatusCode,
};
use serde::Serialize;

use super::ApiError;
use crate::traits::ResponseWriter;

/// The access token of a `Bearer` Authorization header.
/// An empty token counts as no token.
pub fn bearer_auth<B>(req: &Request<B>) -> Option<String> {
	let auth = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
	let mut parts = auth.split_whitespace();
	match (parts.next(), parts.next(), parts.next()) {
		(Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
			Some(token.to_string())
		}
		_ => None,
	}
}

/// Writes `resp` as a JSON 201 response.
///
/// # Errors
/// Fails if `resp` cannot be encoded or the writer rejects the body.
pub fn created<T>(w: &mut dyn ResponseWriter, resp: &T) -> Result<(), ApiError>
where
	T: Serialize + ?Sized,
{
	let data = serde_json::to_vec(resp).map_err(anyhow::Error::from)?;
	w.header().insert(
		CONTENT_TYPE,
		HeaderValue::from_static("application/json;charset=UTF-8"),
	);
	w.write_header(StatusCode::CREATED);
	w.write(&data).map_err(anyhow::Error::from)?;
	Ok(())
}
