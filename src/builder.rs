//! The request builder.

use std::any::Any;

use cookie::Cookie;
use hyper::{
	body::Bytes,
	header::{HeaderName, HeaderValue, COOKIE},
	http::uri::PathAndQuery,
	Body, HeaderMap, Method, Request, Uri,
};
use tracing::{debug, trace, warn};

use crate::{
	error::{http_error, Result},
	files::config::Config,
	structures::{Context, Values},
	traits::RequestBuilder,
};

/// The `charset=UTF-8` content type parameter.
pub const CHARSET_UTF8: &str = "charset=UTF-8";
/// The media type of form bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
/// The media type of JSON bodies.
pub const APPLICATION_JSON: &str = "application/json";

const CONTENT_TYPE: &str = "Content-Type";

/// Returns a new [`Builder`] with the default config. The method is GET.
#[must_use]
pub fn builder() -> Builder {
	Builder::new()
}

/// Builds an incoming server request for testing a handler.
#[derive(Clone, Debug)]
pub struct Builder {
	target: String,
	method: String,
	headers: Vec<(String, Vec<String>)>,
	query: Values,
	body: Option<Bytes>,
	post_form: Option<Values>,
	context: Option<Context>,
	cookies: Vec<Cookie<'static>>,
}

impl Default for Builder {
	fn default() -> Self {
		Builder::new()
	}
}

impl Builder {
	/// Creates a builder targeting [`crate::files::config::DEFAULT_TARGET`].
	#[must_use]
	pub fn new() -> Builder {
		Builder::with_config(&Config::default())
	}

	/// Creates a builder with the target and default headers of `config`.
	#[must_use]
	pub fn with_config(config: &Config) -> Builder {
		let mut builder = Builder {
			target: config.target().to_string(),
			method: Method::GET.to_string(),
			headers: Vec::new(),
			query: Values::new(),
			body: None,
			post_form: None,
			context: None,
			cookies: Vec::new(),
		};
		for (key, value) in config.headers.iter().flatten() {
			builder.put_header(key.clone(), vec![value.clone()]);
		}
		builder
	}

	/// The current target.
	#[must_use]
	pub fn target(&self) -> &str {
		&self.target
	}

	/// The current method.
	#[must_use]
	pub fn method(&self) -> &str {
		&self.method
	}

	/// The current query.
	#[must_use]
	pub fn query(&self) -> &Values {
		&self.query
	}

	/// The values of a header, looked up without regard to case.
	#[must_use]
	pub fn header(&self, key: &str) -> Option<&[String]> {
		self.headers
			.iter()
			.find(|(k, _)| k.eq_ignore_ascii_case(key))
			.map(|(_, v)| v.as_slice())
	}

	/// The current cookies.
	#[must_use]
	pub fn cookies(&self) -> &[Cookie<'static>] {
		&self.cookies
	}

	/// The form body, if one is set.
	#[must_use]
	pub fn post_form(&self) -> Option<&Values> {
		self.post_form.as_ref()
	}

	/// The context, if one is set.
	#[must_use]
	pub fn context(&self) -> Option<&Context> {
		self.context.as_ref()
	}

	// A replaced header keeps the position it was first set at.
	fn put_header(&mut self, key: String, values: Vec<String>) {
		match self
			.headers
			.iter_mut()
			.find(|(k, _)| k.eq_ignore_ascii_case(&key))
		{
			Some(entry) => *entry = (key, values),
			None => self.headers.push((key, values)),
		}
	}

	fn body(&self) -> (Body, &'static str) {
		match (&self.post_form, &self.body) {
			(Some(form), _) => (Body::from(form.encode()), "form"),
			(None, Some(bytes)) => (Body::from(bytes.clone()), "raw"),
			(None, None) => (Body::empty(), "empty"),
		}
	}
}

impl RequestBuilder for Builder {
	fn set_target(mut self, target: impl Into<String>) -> Self {
		self.target = target.into();
		self
	}

	fn set_method(mut self, method: impl Into<String>) -> Self {
		self.method = method.into();
		self
	}

	fn set_query(mut self, query: Values) -> Self {
		self.query = query;
		self
	}

	fn set_query_value<I, V>(mut self, key: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<String>,
	{
		self.query.set(key, values);
		self
	}

	fn set_header<I, V>(mut self, key: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<String>,
	{
		self.put_header(key.into(), values.into_iter().map(Into::into).collect());
		self
	}

	fn has_header(&self, key: &str) -> bool {
		self.header(key).is_some()
	}

	fn set_cookies<I>(mut self, cookies: I) -> Self
	where
		I: IntoIterator<Item = Cookie<'static>>,
	{
		self.cookies = cookies.into_iter().collect();
		self
	}

	fn set_context(mut self, context: Context) -> Self {
		self.context = Some(context);
		self
	}

	fn set_context_value<V>(mut self, key: impl Into<String>, value: V) -> Self
	where
		V: Any + Send + Sync,
	{
		let context = self.context.take().unwrap_or_else(Context::background);
		self.context = Some(context.with_value(key, value));
		self
	}

	fn set_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = Some(body.into());
		self
	}

	fn set_post_form(mut self, form: Values) -> Self {
		self.post_form = Some(form);
		if !self.has_header(CONTENT_TYPE) {
			trace!("defaulting content type to {}", FORM_URLENCODED);
			self.put_header(
				CONTENT_TYPE.to_string(),
				vec![format!("{};{}", FORM_URLENCODED, CHARSET_UTF8)],
			);
		}
		self.set_method(Method::POST.as_str())
	}

	fn set_post_form_value<I, V>(mut self, key: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<String>,
	{
		if self.post_form.is_none() {
			self = self.set_post_form(Values::new());
		}
		if let Some(form) = self.post_form.as_mut() {
			form.set(key, values);
		}
		self
	}

	fn set_json(mut self, data: impl Into<Bytes>) -> Self {
		if self.method == Method::GET.as_str() || self.method == Method::DELETE.as_str() {
			trace!(from = %self.method, "JSON body forces POST");
			self.method = Method::POST.to_string();
		}
		if !self.has_header(CONTENT_TYPE) {
			trace!("defaulting content type to {}", APPLICATION_JSON);
			self.put_header(
				CONTENT_TYPE.to_string(),
				vec![format!("{};{}", APPLICATION_JSON, CHARSET_UTF8)],
			);
		}
		self.set_body(data)
	}

	fn request(&self) -> Result<Request<Body>> {
		let (body, kind) = self.body();
		debug!(method = %self.method, target = %self.target, body = kind, "building test request");

		let mut req = Request::new(body);
		*req.method_mut() = Method::from_bytes(self.method.as_bytes()).map_err(http_error)?;
		*req.uri_mut() = resolve_uri(&self.target, &self.query)?;

		let headers = req.headers_mut();
		for (key, values) in &self.headers {
			let name = HeaderName::from_bytes(key.as_bytes()).map_err(http_error)?;
			for value in values {
				headers.append(
					name.clone(),
					HeaderValue::from_str(value).map_err(http_error)?,
				);
			}
		}
		if !self.cookies.is_empty() {
			let value = cookie_header(headers, &self.cookies);
			headers.insert(COOKIE, HeaderValue::from_bytes(&value).map_err(http_error)?);
		}

		if let Some(context) = &self.context {
			req.extensions_mut().insert(context.clone());
		}
		Ok(req)
	}
}

/// Parses `target` and replaces its query with the encoded `query`.
/// An empty query leaves no query string behind. Authority-form targets
/// (`host:port`) have no path, so they are used as given.
fn resolve_uri(target: &str, query: &Values) -> Result<Uri> {
	let uri = target.parse::<Uri>().map_err(http_error)?;
	if uri.scheme().is_none() && uri.authority().is_some() {
		if !query.is_empty() {
			trace!(target, "authority-form target keeps no query");
		}
		return Ok(uri);
	}
	let mut parts = uri.into_parts();
	let encoded = query.encode();
	if parts.path_and_query.is_none() && encoded.is_empty() {
		return Uri::from_parts(parts).map_err(http_error);
	}
	let path = parts
		.path_and_query
		.as_ref()
		.map_or("/", PathAndQuery::path)
		.to_string();
	let path_and_query = if encoded.is_empty() {
		path
	} else {
		format!("{}?{}", path, encoded)
	};
	parts.path_and_query = Some(
		path_and_query
			.parse::<PathAndQuery>()
			.map_err(http_error)?,
	);
	Uri::from_parts(parts).map_err(http_error)
}

/// Joins any Cookie header already set with the `name=value` pair of each
/// cookie, in order, into a single header value.
fn cookie_header(headers: &HeaderMap, cookies: &[Cookie<'_>]) -> Vec<u8> {
	let pairs = cookies.iter().map(|cookie| {
		format!(
			"{}={}",
			sanitize_cookie_name(cookie.name()),
			sanitize_cookie_value(cookie.value())
		)
		.into_bytes()
	});
	let parts: Vec<Vec<u8>> = headers
		.get_all(COOKIE)
		.iter()
		.map(|v| v.as_bytes().to_vec())
		.filter(|v| !v.is_empty())
		.chain(pairs)
		.collect();
	parts.join(&b"; "[..])
}

fn sanitize_cookie_name(name: &str) -> String {
	name.replace(['\r', '\n'], "-")
}

/// Drops bytes a cookie value cannot carry and quotes values with a space or
/// comma.
fn sanitize_cookie_value(value: &str) -> String {
	let kept: String = value
		.bytes()
		.filter(|&b| (0x20..0x7f).contains(&b) && !matches!(b, b'"' | b';' | b'\\'))
		.map(char::from)
		.collect();
	if kept.len() != value.len() {
		warn!(value, "dropping invalid bytes in cookie value");
	}
	if kept.contains([' ', ',']) {
		format!("\"{}\"", kept)
	} else {
		kept
	}
}
