//! Storage contract and built-in store for temporary credentials pending authorization.
//!
//! Between [`handshake`](crate::flows::Broker::handshake) and
//! [`exchange`](crate::flows::Broker::exchange) the resource owner leaves the application,
//! so the temporary secret has to live somewhere keyed by its `oauth_token`. The broker never
//! persists anything on its own; callers opt in by passing a [`CredentialStore`] to
//! [`Broker::exchange_stored`](crate::flows::Broker::exchange_stored).

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::Credentials};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for temporary credentials, keyed by token identifier.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the credentials stored under their identifier.
	fn save(&self, credentials: Credentials) -> StoreFuture<'_, ()>;

	/// Fetches the credentials stored under `token`, if present.
	fn fetch<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<Credentials>>;

	/// Removes and returns the credentials stored under `token`.
	///
	/// Temporary credentials are single use, so the exchange path consumes them.
	fn take<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<Credentials>>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
