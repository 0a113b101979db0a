// std
use std::sync::Arc;
// self
use oauth1_broker::{
	auth::Credentials,
	store::{CredentialStore, MemoryStore},
};

fn temporary(id: &str) -> Credentials {
	Credentials::new(id, format!("{id}-secret"))
}

#[tokio::test]
async fn save_fetch_and_take_round_trip() {
	let store = MemoryStore::default();

	store.save(temporary("hh5s93j4hdidpola")).await.expect("Saving should succeed.");

	let fetched = store
		.fetch("hh5s93j4hdidpola")
		.await
		.expect("Fetching should succeed.")
		.expect("Saved credentials should be present.");

	assert_eq!(fetched.secret().expose(), "hh5s93j4hdidpola-secret");
	assert_eq!(store.len(), 1);

	let taken = store.take("hh5s93j4hdidpola").await.expect("Taking should succeed.");

	assert_eq!(taken, Some(fetched));
	assert!(store.is_empty());
	assert!(store.take("hh5s93j4hdidpola").await.expect("Taking should succeed.").is_none());
}

#[tokio::test]
async fn save_replaces_entries_with_the_same_token() {
	let store = MemoryStore::default();

	store.save(Credentials::new("token", "first")).await.expect("Saving should succeed.");
	store.save(Credentials::new("token", "second")).await.expect("Saving should succeed.");

	let fetched = store.fetch("token").await.expect("Fetching should succeed.");

	assert_eq!(fetched.map(|c| c.secret().expose().to_owned()), Some("second".into()));
	assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn concurrent_takes_hand_out_each_entry_once() {
	let store = Arc::new(MemoryStore::default());

	store.save(temporary("shared")).await.expect("Saving should succeed.");

	let handles = (0..8)
		.map(|_| {
			let store = Arc::clone(&store);

			tokio::spawn(async move {
				let store: Arc<dyn CredentialStore> = store;

				store.take("shared").await.expect("Taking should succeed.")
			})
		})
		.collect::<Vec<_>>();
	let mut winners = 0;

	for handle in handles {
		if handle.await.expect("Take task should not panic.").is_some() {
			winners += 1;
		}
	}

	assert_eq!(winners, 1);
}
