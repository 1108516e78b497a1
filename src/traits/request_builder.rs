use std::{any::Any, io::Read};

use cookie::Cookie;
use hyper::{body::Bytes, Body, Request};
use serde::Serialize;

use crate::{
	error::Result,
	structures::{Context, Values},
};

/// The operations for assembling a test request.
///
/// Every setter consumes the builder and hands it back, so calls chain:
///
/// ```
/// use testrequest::{builder, traits::RequestBuilder};
///
/// let req = builder()
/// 	.set_method("PATCH")
/// 	.set_bearer_auth("token")
/// 	.set_json("{}")
/// 	.request()
/// 	.unwrap();
/// assert_eq!(req.method(), "PATCH");
/// ```
pub trait RequestBuilder: Sized {
	/// Sets the request's target.
	#[must_use]
	fn set_target(self, target: impl Into<String>) -> Self;

	/// Sets the request's HTTP method. The token is not validated.
	#[must_use]
	fn set_method(self, method: impl Into<String>) -> Self;

	/// Replaces the whole query.
	#[must_use]
	fn set_query(self, query: Values) -> Self;

	/// Replaces the values of one query parameter.
	#[must_use]
	fn set_query_value<I, V>(self, key: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<String>;

	/// Replaces the values of one header.
	/// Header names are matched without regard to case.
	#[must_use]
	fn set_header<I, V>(self, key: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<String>;

	/// Returns whether a header has been set, ignoring case.
	fn has_header(&self, key: &str) -> bool;

	/// Replaces the request's cookies.
	#[must_use]
	fn set_cookies<I>(self, cookies: I) -> Self
	where
		I: IntoIterator<Item = Cookie<'static>>;

	/// Replaces the request's context.
	#[must_use]
	fn set_context(self, context: Context) -> Self;

	/// Layers a value onto the request's context,
	/// starting from [`Context::background`] if none was set.
	#[must_use]
	fn set_context_value<V>(self, key: impl Into<String>, value: V) -> Self
	where
		V: Any + Send + Sync;

	/// Sets the raw body. Method and content type are left alone.
	#[must_use]
	fn set_body(self, body: impl Into<Bytes>) -> Self;

	/// Sets the body as a form.
	/// The method becomes POST, and the content type becomes
	/// `application/x-www-form-urlencoded;charset=UTF-8` unless one was set.
	/// A form body always wins over a raw one.
	#[must_use]
	fn set_post_form(self, form: Values) -> Self;

	/// Replaces one field of the form body, creating the form with
	/// [`RequestBuilder::set_post_form`] if needed.
	#[must_use]
	fn set_post_form_value<I, V>(self, key: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<String>;

	/// Sets JSON-encoded data as the body.
	///
	/// A GET or DELETE method becomes POST.
	/// The content type becomes `application/json;charset=UTF-8` unless one was set.
	#[must_use]
	fn set_json(self, data: impl Into<Bytes>) -> Self;

	/// Builds the request from the current state.
	///
	/// If a form body is set, it is encoded and any raw body is ignored.
	/// The builder is left untouched, so calling this twice gives equal requests.
	///
	/// # Errors
	/// Fails if the method, target or a header cannot be represented in an
	/// HTTP request at all.
	fn request(&self) -> Result<Request<Body>>;

	/// Reads `reader` to the end and sets the result as the raw body.
	///
	/// # Errors
	/// Returns any error raised while reading.
	fn set_body_reader(self, mut reader: impl Read) -> Result<Self> {
		let mut buf = Vec::new();
		reader.read_to_end(&mut buf)?;
		Ok(self.set_body(buf))
	}

	/// Sets the request's Content-Type header.
	///
	/// Example of a value: `application/json; charset=UTF-8`.
	///
	/// See RFC 7231, Section 3.1.1.5.
	#[must_use]
	fn set_content_type(self, value: impl Into<String>) -> Self {
		self.set_header("Content-Type", [value])
	}

	/// Sets the Content-Type header to `mime_type;param`.
	#[must_use]
	fn set_content_type_with_param(self, mime_type: &str, param: &str) -> Self {
		self.set_content_type(format!("{};{}", mime_type, param))
	}

	/// Sets the Accept header.
	#[must_use]
	fn set_accept(self, value: impl Into<String>) -> Self {
		self.set_header("Accept", [value])
	}

	/// Sets the Accept-Language header.
	#[must_use]
	fn set_accept_language(self, value: impl Into<String>) -> Self {
		self.set_header("Accept-Language", [value])
	}

	/// Sets the User-Agent header.
	#[must_use]
	fn set_user_agent(self, value: impl Into<String>) -> Self {
		self.set_header("User-Agent", [value])
	}

	/// Sets the Authorization header to `scheme credential`.
	#[must_use]
	fn set_auth(self, scheme: &str, credential: &str) -> Self {
		self.set_header("Authorization", [format!("{} {}", scheme, credential)])
	}

	/// Sets the Authorization header for HTTP Basic Authentication.
	/// See RFC 2617, Section 2.
	#[must_use]
	fn set_basic_auth(self, username: &str, password: &str) -> Self {
		let credential = base64::encode(format!("{}:{}", username, password));
		self.set_auth("basic", &credential)
	}

	/// Sets the Authorization header for HTTP Bearer Authentication.
	/// See RFC 6750.
	#[must_use]
	fn set_bearer_auth(self, token: &str) -> Self {
		self.set_auth("bearer", token)
	}

	/// Encodes `value` as JSON and sets it with [`RequestBuilder::set_json`].
	///
	/// # Errors
	/// Returns [`crate::Error::Json`] if the value cannot be encoded. That is
	/// a bug in the test, not something to recover from.
	fn set_json_from_value<T>(self, value: &T) -> Result<Self>
	where
		T: Serialize + ?Sized,
	{
		let data = serde_json::to_vec(value)?;
		Ok(self.set_json(data))
	}
}
