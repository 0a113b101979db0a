//! Minimal request view and protocol parameter map consumed by signers.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	signature::{
		encoding,
		params::{self, ParamTree},
	},
};

/// Media type whose body parameters take part in the signature.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// `oauth_callback` value announcing an out-of-band (PIN) verifier (RFC 5849 §2.1).
pub const OUT_OF_BAND_CALLBACK: &str = "oob";

/// The slice of an HTTP request needed to compute a base string.
///
/// Query and body pairs are stored in their wire (percent-encoded) form exactly as they will
/// be sent, so signing and dispatch observe the same bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
	/// HTTP method.
	pub method: Method,
	/// Request URI without query or fragment.
	pub uri: Url,
	/// Raw query pairs.
	pub query: Vec<(String, String)>,
	/// Raw body pairs, only meaningful when the body is form encoded.
	pub body: Vec<(String, String)>,
	/// Value of the `Content-Type` header, if any.
	pub content_type: Option<String>,
}
impl RequestDescriptor {
	/// Builds a descriptor from a method and a full URL, splitting off its query.
	pub fn new(method: Method, url: &Url) -> Self {
		let query = url.query().map(encoding::split_pairs).unwrap_or_default();
		let mut uri = url.clone();

		uri.set_query(None);
		uri.set_fragment(None);

		Self { method, uri, query, body: Vec::new(), content_type: None }
	}

	/// Appends a query parameter given in decoded form.
	pub fn with_query_param(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
		self.query.push((encoding::encode(key.as_ref()), encoding::encode(value.as_ref())));

		self
	}

	/// Appends a form body parameter given in decoded form and marks the body as form encoded.
	pub fn with_form_param(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
		self.body.push((encoding::encode(key.as_ref()), encoding::encode(value.as_ref())));
		self.content_type = Some(FORM_CONTENT_TYPE.to_owned());

		self
	}

	/// Appends nested form parameters, flattening them into bracketed key paths.
	pub fn with_form_tree(mut self, tree: &BTreeMap<String, ParamTree>) -> Self {
		for (key, value) in params::flatten_params(tree) {
			self = self.with_form_param(key, value);
		}

		self.content_type = Some(FORM_CONTENT_TYPE.to_owned());

		self
	}

	/// Replaces the body with a raw `application/x-www-form-urlencoded` payload.
	pub fn with_form_body(mut self, raw: &str) -> Self {
		self.body = encoding::split_pairs(raw);
		self.content_type = Some(FORM_CONTENT_TYPE.to_owned());

		self
	}

	/// Overrides the content type. Non-form content types exclude the body from signing.
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());

		self
	}

	/// Returns true when the declared content type is `application/x-www-form-urlencoded`.
	pub fn is_form_encoded(&self) -> bool {
		self.content_type.as_deref().is_some_and(is_form_content_type)
	}

	/// Serializes the raw query pairs.
	pub fn query_string(&self) -> String {
		encoding::join_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
	}

	/// Serializes the raw body pairs.
	pub fn body_string(&self) -> String {
		encoding::join_pairs(self.body.iter().map(|(k, v)| (k.as_str(), v.as_str())))
	}
}

/// Returns true when `content_type` names the form media type, ignoring parameters and case.
pub fn is_form_content_type(content_type: &str) -> bool {
	content_type
		.split(';')
		.next()
		.is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Ordered `oauth_*` protocol parameters (plus extras such as `realm`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParameters(BTreeMap<String, String>);
impl ProtocolParameters {
	/// `oauth_callback`
	pub const CALLBACK: &'static str = "oauth_callback";
	/// `oauth_consumer_key`
	pub const CONSUMER_KEY: &'static str = "oauth_consumer_key";
	/// `oauth_nonce`
	pub const NONCE: &'static str = "oauth_nonce";
	/// `realm`, sent in the header but never signed.
	pub const REALM: &'static str = "realm";
	/// `oauth_signature`
	pub const SIGNATURE: &'static str = "oauth_signature";
	/// `oauth_signature_method`
	pub const SIGNATURE_METHOD: &'static str = "oauth_signature_method";
	/// `oauth_timestamp`
	pub const TIMESTAMP: &'static str = "oauth_timestamp";
	/// `oauth_token`
	pub const TOKEN: &'static str = "oauth_token";
	/// `oauth_verifier`
	pub const VERIFIER: &'static str = "oauth_verifier";
	/// `oauth_version`
	pub const VERSION: &'static str = "oauth_version";

	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces a parameter.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(key.into(), value.into())
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(key, value);

		self
	}

	/// Looks up a parameter.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Removes a parameter.
	pub fn remove(&mut self, key: &str) -> Option<String> {
		self.0.remove(key)
	}

	/// Returns true when the parameter is present.
	pub fn contains(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Iterates parameters in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Iterates the parameters that take part in the base string.
	pub fn signable(&self) -> impl Iterator<Item = (&str, &str)> {
		self.iter().filter(|(key, _)| *key != Self::SIGNATURE && *key != Self::REALM)
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no parameters are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for ProtocolParameters
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}
