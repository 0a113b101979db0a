//! Temporary credential request and resource-owner authorization redirect.
//!
//! [`Broker::handshake`] performs the first leg (RFC 5849 §2.1) and [`Broker::authorize`]
//! builds the second-leg redirect (§2.2), running the handshake first unless the caller
//! resumes with an `oauth_token` it already holds.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	flows::{Broker, HandshakeState, common},
	http::OAuthHttpClient,
	obs::{self, FlowStep},
	signature::{OUT_OF_BAND_CALLBACK, ProtocolParameters, RequestDescriptor},
};

impl<C> Broker<C>
where
	C: ?Sized + OAuthHttpClient,
{
	/// Requests temporary credentials from the provider.
	///
	/// The request is a signed POST carrying `oauth_callback` derived from the client's
	/// redirect URI, signed with client credentials only. Clients without a redirect URI
	/// announce the out-of-band flow (`oauth_callback=oob`); the provider then shows the
	/// verifier to the resource owner instead of redirecting. The response must be form encoded
	/// and contain `oauth_token` and `oauth_token_secret`, plus
	/// `oauth_callback_confirmed=true` unless the descriptor's quirks waive it.
	pub async fn handshake(&self) -> Result<Credentials> {
		const STEP: FlowStep = FlowStep::Handshake;

		obs::observe(STEP, "handshake", async move {
			let request =
				RequestDescriptor::new(Method::POST, &self.descriptor.endpoints.temporary_credentials);
			let options = match self.client.redirect_uri {
				Some(_) => self.sign_options().with_callback(true),
				None =>
					self.sign_options().with_param(ProtocolParameters::CALLBACK, OUT_OF_BAND_CALLBACK),
			};
			let signed = self.assembler.sign(request, options)?;
			let response = self.dispatch(STEP, signed).await?;
			let form = common::parse_credentials_response(
				STEP,
				&response,
				self.descriptor.quirks.lenient_content_type,
			)?;

			if self.descriptor.quirks.callback_confirmed_required {
				common::ensure_callback_confirmed(&form)?;
			}

			common::credentials_from(STEP, &form)
		})
		.await
	}

	/// Runs the handshake for a caller-held [`HandshakeState`], returning the next state.
	pub async fn start(&self, state: &HandshakeState) -> Result<HandshakeState> {
		if !matches!(state, HandshakeState::Initial) {
			return Err(state.invalid(FlowStep::Handshake));
		}

		let temporary = self.handshake().await?;

		state.with_temporary(temporary)
	}

	/// Prepares the resource-owner redirect and hands it to `redirect_callback`.
	///
	/// When `parameters` lacks `oauth_token` the handshake runs first and the callback
	/// receives the fresh temporary credentials, which the caller must keep (for instance
	/// in a [`CredentialStore`](crate::store::CredentialStore)) until the exchange. When
	/// `parameters` already carries `oauth_token` no request is made and the callback receives
	/// `None`. Every other entry in `parameters` is appended to the authorization URL.
	pub async fn authorize<F, R>(
		&self,
		redirect_callback: F,
		parameters: BTreeMap<String, String>,
	) -> Result<R>
	where
		F: FnOnce(Url, Option<Credentials>, &BTreeMap<String, String>) -> R,
	{
		let (token, temporary) = match parameters.get(ProtocolParameters::TOKEN) {
			Some(token) => (token.clone(), None),
			None => {
				let temporary = self.handshake().await?;

				(temporary.id().to_owned(), Some(temporary))
			},
		};

		obs::observe(FlowStep::Authorize, "authorize", async move {
			let url = self.authorize_url(&token, &parameters);

			Ok(redirect_callback(url, temporary, &parameters))
		})
		.await
	}

	/// Builds the authorization endpoint URL for `token`, appending extra `parameters`.
	pub fn authorize_url(&self, token: &str, parameters: &BTreeMap<String, String>) -> Url {
		let mut url = self.descriptor.endpoints.authorization.clone();

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair(ProtocolParameters::TOKEN, token);

			for (key, value) in
				parameters.iter().filter(|(key, _)| key.as_str() != ProtocolParameters::TOKEN)
			{
				pairs.append_pair(key, value);
			}
		}

		url
	}
}
