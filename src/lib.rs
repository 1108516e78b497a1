#![warn(missing_docs)]
#![warn(clippy::pedantic)]
//! testrequest builds in-memory HTTP requests for unit testing handlers.
//!
//! ```
//! use testrequest::{builder, traits::{RequestBuilder, RequestExt}};
//!
//! let req = builder()
//! 	.set_basic_auth("admin", "p@ssw0rd")
//! 	.set_query_value("page", ["2"])
//! 	.request()
//! 	.unwrap();
//! assert_eq!(req.basic_auth(), Some(("admin".into(), "p@ssw0rd".into())));
//! assert_eq!(req.uri().query(), Some("page=2"));
//! ```

/// Definitions for the configuration file syntax used by testrequest.
pub mod files {
	/// Structures used in testrequest.toml.
	pub mod config;
}

/// Trait definitions for building requests and for the handler side of a test.
pub mod traits {
	mod request_builder;
	pub use request_builder::*;
	mod request_ext;
	pub use request_ext::*;
	mod writer;
	pub use writer::*;
}

/// Data structures used in testrequest.
pub mod structures {
	mod context;
	pub use context::*;
	mod response;
	pub use response::*;
	mod values;
	pub use values::*;
}

pub mod builder;
pub mod error;
pub mod form;

/// Example handlers that take their input from built requests.
pub mod consumers {
	pub mod client_credentials;
	pub mod simple_api;
}

pub use builder::{builder, Builder};
pub use error::{Error, Result};
