//! A small book API: a JSON/form handler behind a bearer-token middleware.

use async_trait::async_trait;
use hyper::{Body, Request};
use tracing::warn;

use crate::traits::ResponseWriter;

mod books;
pub use books::*;
mod errors;
pub use errors::*;
mod helpers;
pub use helpers::*;
mod middleware;
pub use middleware::*;

/// An endpoint that answers through a [`ResponseWriter`] and may fail.
#[async_trait]
pub trait RequestHandler: Send + Sync {
	/// Handles one request.
	async fn handle(&self, w: &mut dyn ResponseWriter, req: Request<Body>) -> Result<(), ApiError>;
}

/// Adapts a [`RequestHandler`] so failures become error statuses.
pub struct Handler<H>(pub H);

impl<H: RequestHandler> Handler<H> {
	/// Runs the handler, writing the matching status if it fails.
	pub async fn serve(&self, w: &mut dyn ResponseWriter, req: Request<Body>) {
		if let Err(err) = self.0.handle(&mut *w, req).await {
			let status = err.status_code();
			warn!(%status, error = %err, "handler failed");
			w.write_header(status);
		}
	}
}

#[cfg(test)]
mod tests {
	use anyhow::anyhow;
	use hyper::StatusCode;
	use serde_json::json;

	use super::{BooksHandler, Handler};
	use crate::{builder, structures::Recorder, traits::RequestBuilder};

	#[tokio::test]
	async fn serve_writes_error_status() {
		let handler = Handler(BooksHandler::new(|_| Ok("1".to_string())));
		let mut w = Recorder::new();
		handler.serve(&mut w, builder().request().unwrap()).await;
		assert_eq!(w.code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
	}

	#[tokio::test]
	async fn serve_maps_store_failure_to_500() {
		let handler = Handler(BooksHandler::new(|_| Err(anyhow!("store down"))));
		let req = builder()
			.set_json_from_value(&json!({
				"title": "Rust",
				"isbn": "1",
				"authors": ["Ferris"],
			}))
			.unwrap()
			.request()
			.unwrap();
		let mut w = Recorder::new();
		handler.serve(&mut w, req).await;
		assert_eq!(w.code(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[tokio::test]
	async fn serve_passes_success_through() {
		let handler = Handler(BooksHandler::new(|_| Ok("7".to_string())));
		let req = builder()
			.set_post_form_value("title", ["Rust"])
			.set_post_form_value("isbn", ["1"])
			.set_post_form_value("authors", ["Ferris"])
			.request()
			.unwrap();
		let mut w = Recorder::new();
		handler.serve(&mut w, req).await;
		assert_eq!(w.code(), StatusCode::CREATED);
		assert_eq!(w.body_string(), r#"{"id":"7"}"#);
	}
}
