//! Identifier + secret pairs shared by client, temporary, and token credentials.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Immutable identifier/secret pair.
///
/// RFC 5849 uses the same shape for client credentials (consumer key + secret),
/// temporary credentials (request token + secret), and token credentials (access
/// token + secret); only the role differs. Rotating a secret means building a new value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	id: String,
	secret: TokenSecret,
}
impl Credentials {
	/// Builds a credential pair.
	pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { id: id.into(), secret: TokenSecret::new(secret) }
	}

	/// Public identifier (`oauth_consumer_key` or `oauth_token`).
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Shared secret used to derive the signing key.
	pub fn secret(&self) -> &TokenSecret {
		&self.secret
	}
}

/// Client (consumer) credentials plus the callback URI registered for the application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
	/// Consumer key + consumer secret.
	pub credentials: Credentials,
	/// Registered redirect URI sent as `oauth_callback` when a flow requests it.
	pub redirect_uri: Option<Url>,
}
impl ClientCredentials {
	/// Builds client credentials without a registered redirect URI.
	pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { credentials: Credentials::new(id, secret), redirect_uri: None }
	}

	/// Attaches the redirect URI used to derive `oauth_callback`.
	pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Consumer key.
	pub fn id(&self) -> &str {
		self.credentials.id()
	}

	/// Consumer secret.
	pub fn secret(&self) -> &TokenSecret {
		self.credentials.secret()
	}
}
impl AsRef<Credentials> for ClientCredentials {
	fn as_ref(&self) -> &Credentials {
		&self.credentials
	}
}
impl From<Credentials> for ClientCredentials {
	fn from(credentials: Credentials) -> Self {
		Self { credentials, redirect_uri: None }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_redacts_secret() {
		let credentials = Credentials::new("consumer", "top-secret");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("consumer"));
		assert!(!rendered.contains("top-secret"));
		assert_eq!(credentials.secret().expose(), "top-secret");
	}

	#[test]
	fn client_credentials_carry_redirect_uri() {
		let redirect =
			Url::parse("https://app.example.com/callback").expect("Redirect URI should parse.");
		let client = ClientCredentials::new("key", "secret").with_redirect_uri(redirect.clone());

		assert_eq!(client.id(), "key");
		assert_eq!(client.secret().expose(), "secret");
		assert_eq!(client.redirect_uri, Some(redirect));
		assert_eq!(ClientCredentials::from(Credentials::new("a", "b")).redirect_uri, None);
	}
}
