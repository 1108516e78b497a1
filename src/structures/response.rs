use hyper::{HeaderMap, StatusCode};

use crate::traits::ResponseWriter;

/// A response writer that records everything a handler sends.
#[derive(Default, Clone, Debug)]
#[non_exhaustive]
pub struct Recorder {
	/// The status code of the response.
	/// `None` until the handler writes a status or a body.
	pub status: Option<StatusCode>,
	/// The headers of the response.
	pub headers: HeaderMap,
	/// The body of the response.
	pub body: Vec<u8>,
}

impl Recorder {
	/// Creates an empty recorder.
	#[must_use]
	pub fn new() -> Recorder {
		Recorder::default()
	}

	/// The recorded status, or 200 if the handler never wrote one.
	#[must_use]
	pub fn code(&self) -> StatusCode {
		self.status.unwrap_or(StatusCode::OK)
	}

	/// Returns whether the recorded response is OK.
	#[must_use]
	pub fn is_ok(&self) -> bool {
		self.code().is_success()
	}

	/// The body interpreted as UTF-8, lossily.
	#[must_use]
	pub fn body_string(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl ResponseWriter for Recorder {
	fn header(&mut self) -> &mut HeaderMap {
		&mut self.headers
	}

	fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
		if self.status.is_none() {
			self.status = Some(StatusCode::OK);
		}
		self.body.extend_from_slice(data);
		Ok(data.len())
	}

	fn write_header(&mut self, status: StatusCode) {
		// Only the first status counts, like a real connection.
		if self.status.is_none() {
			self.status = Some(status);
		}
	}
}

/// A response writer whose `write` and `write_header` do nothing.
///
/// The header map is kept between calls, so a handler that sets a header and
/// reads it back sees its own write.
#[derive(Default, Clone, Debug)]
pub struct NopResponseWriter {
	header: HeaderMap,
}

impl NopResponseWriter {
	/// Creates a writer with an empty header map.
	#[must_use]
	pub fn new() -> NopResponseWriter {
		NopResponseWriter::default()
	}
}

impl ResponseWriter for NopResponseWriter {
	fn header(&mut self) -> &mut HeaderMap {
		&mut self.header
	}

	fn write(&mut self, _data: &[u8]) -> std::io::Result<usize> {
		Ok(0)
	}

	fn write_header(&mut self, _status: StatusCode) {}
}
