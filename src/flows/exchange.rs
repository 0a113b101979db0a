//! Token credential exchange (RFC 5849 §2.3).

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::{ConfigError, ProtocolError},
	flows::{Broker, HandshakeState, common},
	http::OAuthHttpClient,
	obs::{self, FlowStep},
	signature::{ProtocolParameters, RequestDescriptor},
	store::CredentialStore,
};

impl<C> Broker<C>
where
	C: ?Sized + OAuthHttpClient,
{
	/// Exchanges approved temporary credentials plus `verifier` for token credentials.
	///
	/// The temporary secret may be empty when the caller resumes without having kept it;
	/// the signing key then carries an empty token half and the provider decides whether to
	/// accept it.
	pub async fn exchange(&self, temporary: &Credentials, verifier: &str) -> Result<Credentials> {
		const STEP: FlowStep = FlowStep::Exchange;

		obs::observe(STEP, "exchange", async move {
			if verifier.is_empty() {
				return Err(Error::from(ConfigError::EmptyVerifier));
			}

			let request = RequestDescriptor::new(Method::POST, &self.descriptor.endpoints.token);
			let options = self
				.sign_options()
				.with_token(temporary.clone())
				.with_param(ProtocolParameters::VERIFIER, verifier);
			let signed = self.assembler.sign(request, options)?;
			let response = self.dispatch(STEP, signed).await?;
			let form = common::parse_credentials_response(
				STEP,
				&response,
				self.descriptor.quirks.lenient_content_type,
			)?;

			common::credentials_from(STEP, &form)
		})
		.await
	}

	/// Exchanges temporary credentials previously saved in `store` under `token`.
	///
	/// The stored entry is only consumed once the exchange succeeds, so a failed attempt can be
	/// retried with the same token and verifier.
	pub async fn exchange_stored<S>(
		&self,
		store: &S,
		token: &str,
		verifier: &str,
	) -> Result<Credentials>
	where
		S: ?Sized + CredentialStore,
	{
		let temporary = store
			.fetch(token)
			.await?
			.ok_or_else(|| ProtocolError::UnknownTemporaryToken { token: token.to_owned() })?;
		let credentials = self.exchange(&temporary, verifier).await?;

		store.take(token).await?;

		Ok(credentials)
	}

	/// Runs the exchange for a caller-held [`HandshakeState`], returning the next state.
	pub async fn complete(&self, state: &HandshakeState) -> Result<HandshakeState> {
		let HandshakeState::AwaitingExchange { temporary, verifier } = state else {
			return Err(state.invalid(FlowStep::Exchange));
		};
		let token = self.exchange(temporary, verifier).await?;

		state.with_token(token)
	}
}
