//! Decoding form bodies out of a request, the way a handler under test would.

use hyper::{header::CONTENT_TYPE, Body, HeaderMap, Method, Request};

use crate::{builder::FORM_URLENCODED, error::Result, structures::Values, traits::RequestExt};

/// The decoded form of a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedForm {
	/// Body fields followed by query parameters.
	pub form: Values,
	/// Body fields only.
	pub post_form: Values,
}

impl ParsedForm {
	/// The first value of `key` in the body or query, or `""`.
	#[must_use]
	pub fn value(&self, key: &str) -> &str {
		self.form.get(key).unwrap_or_default()
	}

	/// The first value of `key` in the body, or `""`.
	#[must_use]
	pub fn post_value(&self, key: &str) -> &str {
		self.post_form.get(key).unwrap_or_default()
	}
}

/// Returns whether the Content-Type header names a urlencoded form.
#[must_use]
pub fn is_form_encoded(headers: &HeaderMap) -> bool {
	headers
		.get(CONTENT_TYPE)
		.and_then(|v| v.to_str().ok())
		.and_then(|v| v.split(';').next())
		.map_or(false, |mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

/// Decodes the form of `req`.
///
/// The body is only read for POST, PUT and PATCH requests carrying a
/// urlencoded form. It is put back afterwards, and the result is cached in
/// the request's extensions so later calls do not read it again.
///
/// # Errors
/// Fails if the body cannot be read.
pub async fn parse_form(req: &mut Request<Body>) -> Result<ParsedForm> {
	if let Some(parsed) = req.extensions().get::<ParsedForm>() {
		return Ok(parsed.clone());
	}

	let mut post_form = Values::new();
	let has_body = matches!(*req.method(), Method::POST | Method::PUT | Method::PATCH);
	if has_body && is_form_encoded(req.headers()) {
		let body = std::mem::take(req.body_mut());
		let bytes = hyper::body::to_bytes(body).await?;
		post_form = Values::parse(&bytes);
		*req.body_mut() = Body::from(bytes);
	}

	let mut form = post_form.clone();
	form.extend_from(&req.query());
	let parsed = ParsedForm { form, post_form };
	req.extensions_mut().insert(parsed.clone());
	Ok(parsed)
}
