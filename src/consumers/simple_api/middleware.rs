use hyper::{Body, Request};

use super::{bearer_auth, ApiError, RequestHandler};
use crate::traits::ResponseWriter;

/// Signature of the callback that reports whether an access token is active.
pub type IntrospectToken = Box<dyn Fn(&str) -> anyhow::Result<bool> + Send + Sync>;

/// Lets a request through only if it carries an active bearer token.
pub struct BearerAuthMiddleware {
	introspect_token: IntrospectToken,
}

impl BearerAuthMiddleware {
	/// Creates a middleware that checks tokens with `introspect_token`.
	pub fn new<F>(introspect_token: F) -> BearerAuthMiddleware
	where
		F: Fn(&str) -> anyhow::Result<bool> + Send + Sync + 'static,
	{
		BearerAuthMiddleware {
			introspect_token: Box::new(introspect_token),
		}
	}

	/// Checks the bearer token, then hands the request to `next`.
	///
	/// # Errors
	/// [`ApiError::Unauthorized`] for a missing or inactive token, the
	/// introspection error if it fails, or whatever `next` returns.
	pub async fn handle_request(
		&self,
		w: &mut dyn ResponseWriter,
		req: Request<Body>,
		next: &dyn RequestHandler,
	) -> Result<(), ApiError> {
		let token = bearer_auth(&req).ok_or(ApiError::Unauthorized)?;
		if !(self.introspect_token)(&token)? {
			return Err(ApiError::Unauthorized);
		}
		next.handle(w, req).await
	}
}

#[cfg(test)]
mod tests {
	use anyhow::anyhow;
	use async_trait::async_trait;
	use hyper::{Body, Request};
	use std::sync::atomic::{AtomicBool, Ordering};

	use super::BearerAuthMiddleware;
	use crate::{
		builder,
		consumers::simple_api::{ApiError, RequestHandler},
		structures::NopResponseWriter,
		traits::{RequestBuilder, ResponseWriter},
	};

	const TOKEN: &str = "CA7eaHjIHz5NxeIJoFK9krqaeZrPLwmMmgI_XiQiIkQ";

	#[derive(Default)]
	struct Next {
		called: AtomicBool,
	}

	#[async_trait]
	impl RequestHandler for Next {
		async fn handle(&self, _w: &mut dyn ResponseWriter, _req: Request<Body>) -> Result<(), ApiError> {
			self.called.store(true, Ordering::SeqCst);
			Ok(())
		}
	}

	#[tokio::test]
	async fn invalid_auth() {
		let middleware = BearerAuthMiddleware::new(|_| panic!("no token to introspect"));
		let next = Next::default();
		let err = middleware
			.handle_request(&mut NopResponseWriter::new(), builder().request().unwrap(), &next)
			.await
			.unwrap_err();
		assert!(matches!(err, ApiError::Unauthorized));
		assert!(!next.called.load(Ordering::SeqCst));
	}

	#[tokio::test]
	async fn token_introspection_error() {
		let middleware = BearerAuthMiddleware::new(|_| Err(anyhow!("failed to verify the token")));
		let req = builder().set_bearer_auth(TOKEN).request().unwrap();
		let err = middleware
			.handle_request(&mut NopResponseWriter::new(), req, &Next::default())
			.await
			.unwrap_err();
		assert!(matches!(err, ApiError::Other(_)));
		assert_eq!(err.to_string(), "failed to verify the token");
	}

	#[tokio::test]
	async fn token_not_active() {
		let middleware = BearerAuthMiddleware::new(|_| Ok(false));
		let req = builder().set_bearer_auth(TOKEN).request().unwrap();
		let err = middleware
			.handle_request(&mut NopResponseWriter::new(), req, &Next::default())
			.await
			.unwrap_err();
		assert!(matches!(err, ApiError::Unauthorized));
	}

	#[tokio::test]
	async fn next_handler() {
		let middleware = BearerAuthMiddleware::new(|token| Ok(token == TOKEN));
		let next = Next::default();
		let req = builder().set_bearer_auth(TOKEN).request().unwrap();
		middleware
			.handle_request(&mut NopResponseWriter::new(), req, &next)
			.await
			.unwrap();
		assert!(next.called.load(Ordering::SeqCst));
	}
}
