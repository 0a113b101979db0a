//! RFC 5849 request signing.
//!
//! Every signer shares the same pipeline: the [`RequestDescriptor`] and
//! [`ProtocolParameters`] are collapsed into a base string ([`base_string`]), then the
//! method-specific primitive turns it into the `oauth_signature` value. Signers are pure
//! and hold no per-call state, so one instance may sign for any number of concurrent
//! flows.

pub mod base_string;
pub mod encoding;
pub mod hmac_sha;
pub mod params;
pub mod plaintext;
pub mod request;
#[cfg(feature = "rsa")] pub mod rsa_sha1;

pub use self::{base_string::*, hmac_sha::*, params::*, plaintext::*, request::*};
#[cfg(feature = "rsa")] pub use self::rsa_sha1::*;

// self
use crate::{_prelude::*, auth::Credentials, error::ConfigError};

/// Signature methods understood by provider descriptors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
	/// `HMAC-SHA1` (RFC 5849 §3.4.2).
	#[default]
	#[serde(rename = "HMAC-SHA1")]
	HmacSha1,
	/// `HMAC-SHA256`, a common provider extension.
	#[serde(rename = "HMAC-SHA256")]
	HmacSha256,
	/// `RSA-SHA1` (RFC 5849 §3.4.3); requires a private key.
	#[serde(rename = "RSA-SHA1")]
	RsaSha1,
	/// `PLAINTEXT` (RFC 5849 §3.4.4); only safe over TLS.
	#[serde(rename = "PLAINTEXT")]
	Plaintext,
}
impl SignatureMethod {
	/// Returns the `oauth_signature_method` identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
			SignatureMethod::HmacSha256 => "HMAC-SHA256",
			SignatureMethod::RsaSha1 => "RSA-SHA1",
			SignatureMethod::Plaintext => "PLAINTEXT",
		}
	}

	/// Builds the keyless signer for this method.
	///
	/// `RSA-SHA1` needs a private key and therefore has no default signer.
	pub fn default_signer(self) -> Option<Arc<dyn Signer>> {
		match self {
			SignatureMethod::HmacSha1 => Some(Arc::new(HmacSha1Signer)),
			SignatureMethod::HmacSha256 => Some(Arc::new(HmacSha256Signer)),
			SignatureMethod::Plaintext => Some(Arc::new(PlaintextSigner)),
			SignatureMethod::RsaSha1 => None,
		}
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Computes `oauth_signature` values.
///
/// Implementations must be deterministic: the same request, parameters, and credentials
/// always yield the same signature. Add asymmetric or provider-specific methods by
/// implementing this trait and handing the signer to the
/// [`Assembler`](crate::assembler::Assembler).
pub trait Signer
where
	Self: Send + Sync,
{
	/// Value sent as `oauth_signature_method`.
	fn method(&self) -> &str;

	/// Signs the request. `params` must not contain `oauth_signature`; it is ignored if present.
	fn sign(
		&self,
		request: &RequestDescriptor,
		params: &ProtocolParameters,
		client: &Credentials,
		token: Option<&Credentials>,
	) -> Result<String>;
}
impl Debug for dyn Signer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Signer").field(&self.method()).finish()
	}
}

/// Derives the shared signing key `pct(client_secret)&pct(token_secret)`.
pub fn signing_key(client: &Credentials, token: Option<&Credentials>) -> String {
	let token_secret = token.map(|t| t.secret().expose()).unwrap_or_default();

	format!("{}&{}", encoding::encode(client.secret().expose()), encoding::encode(token_secret))
}

/// Shared-secret methods refuse to sign without a client secret.
pub(crate) fn require_client_secret(method: &'static str, client: &Credentials) -> Result<()> {
	if client.secret().is_empty() {
		Err(ConfigError::MissingClientSecret { method }.into())
	} else {
		Ok(())
	}
}
