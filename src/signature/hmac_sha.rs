//! Shared-secret HMAC signers.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::ConfigError,
	signature::{self, ProtocolParameters, RequestDescriptor, Signer},
};

/// `HMAC-SHA1` signer: `base64(HMAC-SHA1(signing_key, base_string))`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSha1Signer;
impl Signer for HmacSha1Signer {
	fn method(&self) -> &str {
		"HMAC-SHA1"
	}

	fn sign(
		&self,
		request: &RequestDescriptor,
		params: &ProtocolParameters,
		client: &Credentials,
		token: Option<&Credentials>,
	) -> Result<String> {
		hmac_sign::<Hmac<Sha1>>("HMAC-SHA1", request, params, client, token)
	}
}

/// `HMAC-SHA256` signer, identical to [`HmacSha1Signer`] apart from the digest.
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSha256Signer;
impl Signer for HmacSha256Signer {
	fn method(&self) -> &str {
		"HMAC-SHA256"
	}

	fn sign(
		&self,
		request: &RequestDescriptor,
		params: &ProtocolParameters,
		client: &Credentials,
		token: Option<&Credentials>,
	) -> Result<String> {
		hmac_sign::<Hmac<Sha256>>("HMAC-SHA256", request, params, client, token)
	}
}

fn hmac_sign<M>(
	method: &'static str,
	request: &RequestDescriptor,
	params: &ProtocolParameters,
	client: &Credentials,
	token: Option<&Credentials>,
) -> Result<String>
where
	M: Mac + hmac::digest::KeyInit,
{
	signature::require_client_secret(method, client)?;

	let key = signature::signing_key(client, token);
	let mut mac =
		<M as Mac>::new_from_slice(key.as_bytes()).map_err(|_| ConfigError::InvalidSigningKey)?;

	mac.update(signature::base_string(request, params).as_bytes());

	Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
