//! `RSA-SHA1` signer (RFC 5849 §3.4.3), enabled by the `rsa` feature.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rsa::{
	Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey, pkcs1::DecodeRsaPrivateKey,
	pkcs8::DecodePrivateKey,
};
use sha1::{Digest, Sha1};
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::ConfigError,
	signature::{self, ProtocolParameters, RequestDescriptor, Signer},
};

/// Signs the base string with an RSA private key using PKCS#1 v1.5 over SHA-1.
///
/// Client and token secrets are not used; the provider verifies with the public key
/// registered for the consumer.
#[derive(Clone)]
pub struct RsaSha1Signer {
	key: RsaPrivateKey,
}
impl RsaSha1Signer {
	/// Wraps an already-parsed private key.
	pub fn new(key: RsaPrivateKey) -> Self {
		Self { key }
	}

	/// Parses a PEM encoded PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1 (`BEGIN RSA PRIVATE KEY`) key.
	pub fn from_pem(pem: &str) -> Result<Self> {
		let key = RsaPrivateKey::from_pkcs8_pem(pem)
			.or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
			.map_err(|_| ConfigError::InvalidPrivateKey)?;

		Ok(Self::new(key))
	}

	/// Public half of the key, for registering with the provider or verifying in tests.
	pub fn public_key(&self) -> RsaPublicKey {
		self.key.to_public_key()
	}
}
impl Debug for RsaSha1Signer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RsaSha1Signer").field("key", &"<redacted>").finish()
	}
}
impl Signer for RsaSha1Signer {
	fn method(&self) -> &str {
		"RSA-SHA1"
	}

	fn sign(
		&self,
		request: &RequestDescriptor,
		params: &ProtocolParameters,
		_client: &Credentials,
		_token: Option<&Credentials>,
	) -> Result<String> {
		let digest = Sha1::digest(signature::base_string(request, params).as_bytes());
		let raw = self
			.key
			.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)
			.map_err(ConfigError::signing)?;

		Ok(STANDARD.encode(raw))
	}
}
