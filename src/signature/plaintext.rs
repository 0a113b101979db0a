//! `PLAINTEXT` signer (RFC 5849 §3.4.4).

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	signature::{self, ProtocolParameters, RequestDescriptor, Signer},
};

/// Sends the signing key itself as the signature.
///
/// The secrets travel in the clear, so descriptors only accept this method when every
/// endpoint uses HTTPS.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaintextSigner;
impl Signer for PlaintextSigner {
	fn method(&self) -> &str {
		"PLAINTEXT"
	}

	fn sign(
		&self,
		_request: &RequestDescriptor,
		_params: &ProtocolParameters,
		client: &Credentials,
		token: Option<&Credentials>,
	) -> Result<String> {
		signature::require_client_secret("PLAINTEXT", client)?;

		Ok(signature::signing_key(client, token))
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::Method;
	// self
	use super::*;

	#[test]
	fn plaintext_returns_signing_key() {
		let url = Url::parse("https://example.com/resource").expect("URL fixture should parse.");
		let request = RequestDescriptor::new(Method::GET, &url);
		let client = Credentials::new("key", "secret");
		let token = Credentials::new("token", "token secret");

		assert_eq!(
			PlaintextSigner
				.sign(&request, &ProtocolParameters::new(), &client, None)
				.expect("PLAINTEXT should sign."),
			"secret&"
		);
		assert_eq!(
			PlaintextSigner
				.sign(&request, &ProtocolParameters::new(), &client, Some(&token))
				.expect("PLAINTEXT should sign."),
			"secret&token%20secret"
		);
	}
}
