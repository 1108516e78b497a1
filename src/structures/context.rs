use std::{any::Any, fmt, sync::Arc};

/// A layered bag of values attached to a test request.
///
/// Every call to [`Context::with_value`] pushes a new binding on top of the
/// chain. Lookups walk from the newest binding to the oldest, so a later
/// binding for the same key shadows the earlier ones without removing them.
#[derive(Clone, Default)]
pub struct Context {
	bindings: Vec<Binding>,
}

#[derive(Clone)]
struct Binding {
	key: String,
	value: Arc<dyn Any + Send + Sync>,
}

impl Context {
	/// The empty base context that layered values are built on.
	#[must_use]
	pub fn background() -> Context {
		Context::default()
	}

	/// Returns a copy of this context with `key` bound to `value`.
	#[must_use]
	pub fn with_value<V>(mut self, key: impl Into<String>, value: V) -> Context
	where
		V: Any + Send + Sync,
	{
		self.bindings.push(Binding {
			key: key.into(),
			value: Arc::new(value),
		});
		self
	}

	/// Looks up the newest binding for `key`.
	/// Returns `None` if the key is unbound or its newest value is not a `V`.
	#[must_use]
	pub fn value<V: Any>(&self, key: &str) -> Option<&V> {
		self.bindings
			.iter()
			.rev()
			.find(|b| b.key == key)
			.and_then(|b| b.value.downcast_ref())
	}

	/// Keys of every binding, oldest first. Shadowed keys appear more than once.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.bindings.iter().map(|b| b.key.as_str())
	}

	/// Returns whether nothing has been layered on this context.
	#[must_use]
	pub fn is_background(&self) -> bool {
		self.bindings.is_empty()
	}
}

impl fmt::Debug for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("keys", &self.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::Context;

	#[test]
	fn later_bindings_shadow_earlier_ones() {
		let ctx = Context::background()
			.with_value("user", "alice".to_string())
			.with_value("user", "bob".to_string());
		assert_eq!(ctx.value::<String>("user").map(String::as_str), Some("bob"));
		assert_eq!(ctx.keys().collect::<Vec<_>>(), ["user", "user"]);
	}

	#[test]
	fn lookup_is_typed() {
		let ctx = Context::background().with_value("id", 7_u32);
		assert_eq!(ctx.value::<u32>("id"), Some(&7));
		assert_eq!(ctx.value::<String>("id"), None);
		assert_eq!(ctx.value::<u32>("missing"), None);
	}

	#[test]
	fn background_is_empty() {
		assert!(Context::background().is_background());
		assert!(!Context::background().with_value("k", ()).is_background());
	}
}
