use async_trait::async_trait;
use hyper::{header::CONTENT_TYPE, Body, Request};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{created, ApiError, RequestHandler};
use crate::{
	builder::{APPLICATION_JSON, FORM_URLENCODED},
	form::parse_form,
	traits::ResponseWriter,
};

/// A request to add a book.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BookRequest {
	/// The book's title.
	pub title: String,
	/// The book's ISBN.
	pub isbn: String,
	/// The book's authors, in order.
	pub authors: Vec<String>,
}

impl BookRequest {
	/// Every field must be filled in, and there must be at least one author.
	#[must_use]
	pub fn is_valid(&self) -> bool {
		!self.title.is_empty()
			&& !self.isbn.is_empty()
			&& !self.authors.is_empty()
			&& self.authors.iter().all(|a| !a.is_empty())
	}

	/// Decodes a book from a form or JSON body.
	///
	/// # Errors
	/// [`ApiError::BadRequest`] for unreadable JSON,
	/// [`ApiError::UnsupportedMediaType`] for any other content type.
	pub async fn from_request(mut req: Request<Body>) -> Result<BookRequest, ApiError> {
		let content_type = req
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.unwrap_or_default()
			.to_string();

		if content_type.starts_with(FORM_URLENCODED) {
			let form = parse_form(&mut req).await.unwrap_or_default();
			return Ok(BookRequest {
				title: form.post_value("title").to_string(),
				isbn: form.post_value("isbn").to_string(),
				authors: form.post_form.get_all("authors").to_vec(),
			});
		}
		if content_type.starts_with(APPLICATION_JSON) {
			let body = hyper::body::to_bytes(req.into_body())
				.await
				.map_err(|_| ApiError::BadRequest)?;
			// Only the first value is decoded; anything after it is ignored.
			return serde_json::Deserializer::from_slice(&body)
				.into_iter::<BookRequest>()
				.next()
				.and_then(Result::ok)
				.ok_or(ApiError::BadRequest);
		}
		Err(ApiError::UnsupportedMediaType)
	}
}

/// Signature of the store callback that saves a book and returns its id.
pub type AddBook = Box<dyn Fn(&BookRequest) -> anyhow::Result<String> + Send + Sync>;

/// Handles `POST /books`.
pub struct BooksHandler {
	add_book: AddBook,
}

impl BooksHandler {
	/// Creates a handler that saves books with `add_book`.
	pub fn new<F>(add_book: F) -> BooksHandler
	where
		F: Fn(&BookRequest) -> anyhow::Result<String> + Send + Sync + 'static,
	{
		BooksHandler {
			add_book: Box::new(add_book),
		}
	}

	/// Decodes, validates and stores a book, then answers 201 with its id.
	///
	/// # Errors
	/// Decoding and validation failures, or whatever the store returns.
	pub async fn post(&self, w: &mut dyn ResponseWriter, req: Request<Body>) -> Result<(), ApiError> {
		let book = BookRequest::from_request(req).await?;
		if !book.is_valid() {
			return Err(ApiError::BadRequest);
		}
		let id = (self.add_book)(&book)?;
		created(w, &json!({ "id": id }))
	}
}

#[async_trait]
impl RequestHandler for BooksHandler {
	async fn handle(&self, w: &mut dyn ResponseWriter, req: Request<Body>) -> Result<(), ApiError> {
		self.post(w, req).await
	}
}

#[cfg(test)]
mod tests {
	use anyhow::anyhow;
	use hyper::StatusCode;
	use serde_json::json;

	use super::{BookRequest, BooksHandler};
	use crate::{
		builder,
		consumers::simple_api::ApiError,
		structures::{NopResponseWriter, Recorder},
		traits::RequestBuilder,
	};

	fn sample_book() -> BookRequest {
		BookRequest {
			title: "The Go Programming Language".to_string(),
			isbn: "978-0134190440".to_string(),
			authors: vec![
				"Alan A. A. Donovan".to_string(),
				"Brian W. Kernighan".to_string(),
			],
		}
	}

	#[test]
	fn is_valid() {
		let mut book = sample_book();
		assert!(book.is_valid());
		book.authors.push(String::new());
		assert!(!book.is_valid());
		book.authors.clear();
		assert!(!book.is_valid());
		assert!(!BookRequest {
			title: String::new(),
			..sample_book()
		}
		.is_valid());
		assert!(!BookRequest {
			isbn: String::new(),
			..sample_book()
		}
		.is_valid());
	}

	#[tokio::test]
	async fn from_empty_body() {
		let req = builder().request().unwrap();
		let err = BookRequest::from_request(req).await.unwrap_err();
		assert!(matches!(err, ApiError::UnsupportedMediaType));
	}

	#[tokio::test]
	async fn from_post_form() {
		let req = builder()
			.set_post_form_value("title", ["The Go Programming Language"])
			.set_post_form_value("isbn", ["978-0134190440"])
			.set_post_form_value("authors", ["Alan A. A. Donovan", "Brian W. Kernighan"])
			.request()
			.unwrap();
		assert_eq!(BookRequest::from_request(req).await.unwrap(), sample_book());
	}

	#[tokio::test]
	async fn from_invalid_json() {
		let req = builder().set_json("{").request().unwrap();
		let err = BookRequest::from_request(req).await.unwrap_err();
		assert!(matches!(err, ApiError::BadRequest));
	}

	#[tokio::test]
	async fn from_json() {
		let req = builder()
			.set_json_from_value(&json!({
				"title": "The Go Programming Language",
				"isbn": "978-0134190440",
				"authors": ["Alan A. A. Donovan", "Brian W. Kernighan"],
			}))
			.unwrap()
			.request()
			.unwrap();
		assert_eq!(BookRequest::from_request(req).await.unwrap(), sample_book());
	}

	#[tokio::test]
	async fn from_json_ignores_trailing_data() {
		let body = format!("{} trailing", serde_json::to_string(&sample_book()).unwrap());
		let req = builder().set_json(body).request().unwrap();
		assert_eq!(BookRequest::from_request(req).await.unwrap(), sample_book());

		let req = builder().set_json("").request().unwrap();
		let err = BookRequest::from_request(req).await.unwrap_err();
		assert!(matches!(err, ApiError::BadRequest));
	}

	#[tokio::test]
	async fn post_rejects_bad_content() {
		let handler = BooksHandler::new(|_| panic!("store must not be called"));
		let mut w = NopResponseWriter::new();
		let err = handler
			.post(&mut w, builder().request().unwrap())
			.await
			.unwrap_err();
		assert!(matches!(err, ApiError::UnsupportedMediaType));
	}

	#[tokio::test]
	async fn post_rejects_invalid_book() {
		let handler = BooksHandler::new(|_| panic!("store must not be called"));
		let req = builder()
			.set_json_from_value(&json!({ "title": "" }))
			.unwrap()
			.request()
			.unwrap();
		let err = handler
			.post(&mut NopResponseWriter::new(), req)
			.await
			.unwrap_err();
		assert!(matches!(err, ApiError::BadRequest));
		assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn post_surfaces_store_failure() {
		let handler = BooksHandler::new(|_| Err(anyhow!("failed to create book in store")));
		let req = builder().set_json_from_value(&sample_book()).unwrap().request().unwrap();
		let err = handler
			.post(&mut NopResponseWriter::new(), req)
			.await
			.unwrap_err();
		assert_eq!(err.to_string(), "failed to create book in store");
		assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[tokio::test]
	async fn post_success() {
		let handler = BooksHandler::new(|book| {
			assert_eq!(book.title, "The Go Programming Language");
			Ok("1".to_string())
		});
		let req = builder().set_json_from_value(&sample_book()).unwrap().request().unwrap();
		let mut w = Recorder::new();
		handler.post(&mut w, req).await.unwrap();
		assert_eq!(w.code(), StatusCode::CREATED);
		assert_eq!(w.body_string(), r#"{"id":"1"}"#);
	}
}
