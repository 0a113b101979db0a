//! Three-legged handshake orchestration powered by the broker facade.

pub mod common;
pub mod exchange;
pub mod handshake;
pub mod identify;
pub mod state;

pub use common::FormResponse;
pub use state::*;

// self
use crate::{
	_prelude::*,
	assembler::{Assembler, SignOptions, SignedRequest},
	auth::{ClientCredentials, Credentials},
	error::TransportError,
	http::{HttpResponse, OAuthHttpClient},
	obs::FlowStep,
	provider::ProviderDescriptor,
	signature::{ProtocolParameters, RequestDescriptor, Signer},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport stack.
pub type ReqwestBroker = Broker<ReqwestHttpClient>;

/// Coordinates OAuth 1.0a handshakes against a single provider descriptor.
///
/// The broker owns the HTTP client, provider descriptor, client credentials, and the
/// [`Assembler`] used to sign every request it issues. It keeps no per-flow state: the
/// temporary and token credentials travel through the caller (or a
/// [`CredentialStore`](crate::store::CredentialStore)), so one broker can be shared behind
/// an [`Arc`] by any number of concurrent flows.
pub struct Broker<C>
where
	C: ?Sized + OAuthHttpClient,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Provider descriptor that defines endpoints and quirks.
	pub descriptor: ProviderDescriptor,
	/// Consumer key, consumer secret, and registered callback.
	pub client: ClientCredentials,
	assembler: Assembler,
}
impl<C> Broker<C>
where
	C: ?Sized + OAuthHttpClient,
{
	/// Creates a broker that reuses the caller-provided transport.
	///
	/// The signer is derived from the descriptor's signature method. `RSA-SHA1` has no keyless
	/// signer; attach one with [`Broker::with_signer`] or every signed call fails with
	/// [`ConfigError::MissingSigner`](crate::error::ConfigError::MissingSigner) before any I/O.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		client: ClientCredentials,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		let mut assembler =
			Assembler::new().with_client(client.clone()).with_placement(descriptor.placement);

		if let Some(signer) = descriptor.signature_method.default_signer() {
			assembler = assembler.with_signer(signer);
		}

		Self { http_client: http_client.into(), descriptor, client, assembler }
	}

	/// Replaces the signer used for every request.
	pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
		self.assembler = self.assembler.with_signer(signer);

		self
	}

	/// Assembler holding the broker's signing defaults.
	pub fn assembler(&self) -> &Assembler {
		&self.assembler
	}

	/// Signs an arbitrary request with the broker defaults.
	///
	/// Pass token credentials for protected-resource calls; `None` signs with the client
	/// credentials only (two-legged requests).
	pub fn signed_request(
		&self,
		request: RequestDescriptor,
		token: Option<&Credentials>,
	) -> Result<SignedRequest> {
		let mut options = self.sign_options();

		if let Some(token) = token {
			options = options.with_token(token.clone());
		}

		self.assembler.sign(request, options)
	}

	/// Baseline options for broker-issued requests (provider realm included).
	pub(crate) fn sign_options(&self) -> SignOptions {
		match &self.descriptor.quirks.realm {
			Some(realm) => SignOptions::default().with_param(ProtocolParameters::REALM, realm),
			None => SignOptions::default(),
		}
	}

	/// Sends a signed request, tagging transport failures with `step`.
	pub(crate) async fn dispatch(&self, step: FlowStep, signed: SignedRequest) -> Result<HttpResponse> {
		let request = signed.into_http_request()?;

		<C as OAuthHttpClient>::perform(self.http_client.as_ref(), request)
			.await
			.map_err(|e| TransportError::new(step, e).into())
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestHttpClient> {
	/// Creates a new broker for the provided descriptor and client credentials.
	///
	/// The broker provisions its own reqwest-backed transport (redirects disabled) so callers do
	/// not need to pass HTTP handles explicitly.
	pub fn new(descriptor: ProviderDescriptor, client: ClientCredentials) -> Result<Self> {
		Ok(Self::with_http_client(descriptor, client, ReqwestHttpClient::new()?))
	}
}
impl<C> Clone for Broker<C>
where
	C: ?Sized + OAuthHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			client: self.client.clone(),
			assembler: self.assembler.clone(),
		}
	}
}
impl<C> Debug for Broker<C>
where
	C: ?Sized + OAuthHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client.id())
			.field("client_secret_set", &!self.client.secret().is_empty())
			.field("signer", &self.assembler.signer())
			.finish()
	}
}
