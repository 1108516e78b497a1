use cookie::Cookie;
use hyper::{
	header::{AUTHORIZATION, COOKIE, USER_AGENT},
	Request,
};

use crate::structures::{Context, Values};

/// Read-only views of a request, the way a handler under test sees it.
pub trait RequestExt {
	/// The username and password of an HTTP Basic Authorization header.
	fn basic_auth(&self) -> Option<(String, String)>;

	/// Every cookie sent in the Cookie headers, in order.
	fn cookies(&self) -> Vec<Cookie<'static>>;

	/// The attached context, or [`Context::background`] if there is none.
	fn context(&self) -> Context;

	/// The decoded query string.
	fn query(&self) -> Values;

	/// The User-Agent header, if it is valid text.
	fn user_agent(&self) -> Option<&str>;
}

impl<B> RequestExt for Request<B> {
	fn basic_auth(&self) -> Option<(String, String)> {
		let auth = self.headers().get(AUTHORIZATION)?.to_str().ok()?;
		parse_basic_auth(auth)
	}

	fn cookies(&self) -> Vec<Cookie<'static>> {
		self.headers()
			.get_all(COOKIE)
			.iter()
			.filter_map(|v| v.to_str().ok())
			.flat_map(|line| line.split(';'))
			.map(str::trim)
			.filter(|pair| !pair.is_empty())
			.filter_map(|pair| Cookie::parse(pair.to_string()).ok())
			.collect()
	}

	fn context(&self) -> Context {
		self.extensions()
			.get::<Context>()
			.cloned()
			.unwrap_or_else(Context::background)
	}

	fn query(&self) -> Values {
		self.uri()
			.query()
			.map(|q| Values::parse(q.as_bytes()))
			.unwrap_or_default()
	}

	fn user_agent(&self) -> Option<&str> {
		self.headers().get(USER_AGENT)?.to_str().ok()
	}
}

/// Decodes a `Basic` Authorization header value into a username and password.
/// The scheme is matched without regard to case.
#[must_use]
pub fn parse_basic_auth(auth: &str) -> Option<(String, String)> {
	const PREFIX: &str = "Basic ";
	let scheme = auth.get(..PREFIX.len())?;
	if !scheme.eq_ignore_ascii_case(PREFIX) {
		return None;
	}
	let decoded = base64::decode(&auth[PREFIX.len()..]).ok()?;
	let decoded = String::from_utf8(decoded).ok()?;
	let (username, password) = decoded.split_once(':')?;
	Some((username.to_string(), password.to_string()))
}
