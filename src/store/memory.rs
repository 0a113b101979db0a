//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	store::{CredentialStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<String, Credentials>>>;

/// Thread-safe storage backend that keeps temporary credentials in-process.
///
/// Entries live until they are taken; a process restart loses every pending handshake.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of pending entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when nothing is pending.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn save_now(map: StoreMap, credentials: Credentials) -> Result<(), StoreError> {
		map.write().insert(credentials.id().to_owned(), credentials);

		Ok(())
	}

	fn fetch_now(map: StoreMap, token: &str) -> Option<Credentials> {
		map.read().get(token).cloned()
	}

	fn take_now(map: StoreMap, token: &str) -> Option<Credentials> {
		map.write().remove(token)
	}
}
impl CredentialStore for MemoryStore {
	fn save(&self, credentials: Credentials) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::save_now(map, credentials) })
	}

	fn fetch<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<Credentials>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::fetch_now(map, token)) })
	}

	fn take<'a>(&'a self, token: &'a str) -> StoreFuture<'a, Option<Credentials>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::take_now(map, token)) })
	}
}
