use std::collections::{btree_map, BTreeMap};

use url::form_urlencoded;

/// A multi-valued string map used for query strings and form bodies.
///
/// Keys are kept sorted so that encoding is deterministic.
/// Values for a key keep the order they were added in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Values(BTreeMap<String, Vec<String>>);

impl Values {
	/// Creates an empty set of values.
	#[must_use]
	pub fn new() -> Values {
		Values::default()
	}

	/// Decodes `application/x-www-form-urlencoded` data.
	#[must_use]
	pub fn parse(input: &[u8]) -> Values {
		form_urlencoded::parse(input).collect()
	}

	/// Replaces every value stored under `key`.
	pub fn set<K, I, V>(&mut self, key: K, values: I)
	where
		K: Into<String>,
		I: IntoIterator<Item = V>,
		V: Into<String>,
	{
		self.0
			.insert(key.into(), values.into_iter().map(Into::into).collect());
	}

	/// Appends a value to the ones stored under `key`.
	pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.entry(key.into()).or_default().push(value.into());
	}

	/// Appends every value of `other` after the ones already present.
	pub fn extend_from(&mut self, other: &Values) {
		for (key, values) in other.iter() {
			self.0
				.entry(key.to_string())
				.or_default()
				.extend(values.iter().cloned());
		}
	}

	/// Returns the first value stored under `key`.
	#[must_use]
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).and_then(|v| v.first()).map(String::as_str)
	}

	/// Returns every value stored under `key`, or an empty slice.
	#[must_use]
	pub fn get_all(&self, key: &str) -> &[String] {
		self.0.get(key).map_or(&[][..], Vec::as_slice)
	}

	/// Returns whether `key` is present, even with no values.
	#[must_use]
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Removes `key` and its values.
	pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
		self.0.remove(key)
	}

	/// Returns whether no keys are present.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the number of keys.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Iterates over keys and their values in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}

	/// Encodes the values as `key=value&key=value` in key order.
	#[must_use]
	pub fn encode(&self) -> String {
		let mut serializer = form_urlencoded::Serializer::new(String::new());
		for (key, values) in &self.0 {
			for value in values {
				serializer.append_pair(key, value);
			}
		}
		serializer.finish()
	}
}

impl<K, V> FromIterator<(K, V)> for Values
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut values = Values::new();
		for (k, v) in iter {
			values.add(k, v);
		}
		values
	}
}

impl IntoIterator for Values {
	type Item = (String, Vec<String>);
	type IntoIter = btree_map::IntoIter<String, Vec<String>>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::Values;

	#[test]
	fn encode_sorts_keys_and_keeps_value_order() {
		let mut values = Values::new();
		values.set("b", ["2", "1"]);
		values.set("a", ["x y"]);
		assert_eq!(values.encode(), "a=x+y&b=2&b=1");
	}

	#[test]
	fn parse_collects_repeated_keys() {
		let values = Values::parse(b"tag=a&tag=b&name=caf%C3%A9");
		assert_eq!(values.get_all("tag"), ["a", "b"]);
		assert_eq!(values.get("name"), Some("café"));
		assert_eq!(values.get("missing"), None);
		assert!(values.get_all("missing").is_empty());
	}

	#[test]
	fn set_replaces_while_add_appends() {
		let mut values: Values = [("k", "1")].into_iter().collect();
		values.add("k", "2");
		assert_eq!(values.get_all("k"), ["1", "2"]);
		values.set("k", ["3"]);
		assert_eq!(values.get_all("k"), ["3"]);
	}

	#[test]
	fn extend_from_appends_after_existing() {
		let mut post: Values = [("id", "post")].into_iter().collect();
		let query: Values = [("id", "query"), ("page", "1")].into_iter().collect();
		post.extend_from(&query);
		assert_eq!(post.get_all("id"), ["post", "query"]);
		assert_eq!(post.get("page"), Some("1"));
	}

	#[test]
	fn empty_values_encode_to_empty_string() {
		assert_eq!(Values::new().encode(), "");
	}
}
