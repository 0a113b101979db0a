//! Identity resolution hooks for the identify step.
//!
//! Mapping provider-specific identity payloads into domain objects is left to callers;
//! the broker only hands over the authenticated response.

// std
use std::marker::PhantomData;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ProtocolError, http::HttpResponse};

/// Turns a successful identify response into a caller-defined identity.
pub trait IdentityResolver
where
	Self: Send + Sync,
{
	/// Identity value produced by the resolver.
	type Identity;

	/// Interprets the identify endpoint response.
	fn resolve(&self, response: &HttpResponse) -> Result<Self::Identity>;
}

/// Resolver that decodes JSON bodies into `T`, reporting the failing path on errors.
pub struct JsonIdentity<T>(PhantomData<fn() -> T>);
impl<T> JsonIdentity<T> {
	/// Creates the resolver.
	pub fn new() -> Self {
		Self(PhantomData)
	}
}
impl<T> Default for JsonIdentity<T> {
	fn default() -> Self {
		Self::new()
	}
}
impl<T> Clone for JsonIdentity<T> {
	fn clone(&self) -> Self {
		Self::new()
	}
}
impl<T> Debug for JsonIdentity<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("JsonIdentity")
	}
}
impl<T> IdentityResolver for JsonIdentity<T>
where
	T: DeserializeOwned,
{
	type Identity = T;

	fn resolve(&self, response: &HttpResponse) -> Result<Self::Identity> {
		let mut deserializer = serde_json::Deserializer::from_slice(response.body());

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ProtocolError::IdentityParse { source }.into())
	}
}
