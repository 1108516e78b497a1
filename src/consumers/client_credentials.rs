//! OAuth-style client authentication, read from Basic auth or a form body.

use hyper::{Body, Method, Request};

use crate::{
	form::{is_form_encoded, parse_form},
	traits::RequestExt,
};

/// Extracts a client id and secret from `req`.
///
/// Basic auth is tried first. Otherwise a POST form that carries
/// `client_secret` yields `client_id` (body or query) and `client_secret`
/// (body only).
pub async fn basic_credentials(req: &mut Request<Body>) -> Option<(String, String)> {
	if let Some(credentials) = req.basic_auth() {
		return Some(credentials);
	}
	if req.method() != Method::POST || !is_form_encoded(req.headers()) {
		return None;
	}
	let form = parse_form(req).await.ok()?;
	if !form.post_form.contains_key("client_secret") {
		return None;
	}
	Some((
		form.value("client_id").to_string(),
		form.post_value("client_secret").to_string(),
	))
}
