use hyper::{HeaderMap, StatusCode};

/// The response half of a handler under test.
///
/// Handlers write their status, headers and body through this trait so tests
/// can swap in a [`crate::structures::Recorder`] or a
/// [`crate::structures::NopResponseWriter`].
pub trait ResponseWriter: Send {
	/// The header map that will be sent with the response.
	/// Changes made through it must be visible on the next call.
	fn header(&mut self) -> &mut HeaderMap;

	/// Writes part of the body, returning the number of bytes accepted.
	///
	/// # Errors
	/// Returns an error if the sink cannot accept the data.
	fn write(&mut self, data: &[u8]) -> std::io::Result<usize>;

	/// Sends the status line.
	fn write_header(&mut self, status: StatusCode);
}
