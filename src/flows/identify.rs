//! Authenticated calls made with token credentials.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::ConfigError,
	flows::{Broker, common},
	http::{HttpResponse, OAuthHttpClient},
	obs::{self, FlowStep},
	provider::IdentityResolver,
	signature::RequestDescriptor,
};

impl<C> Broker<C>
where
	C: ?Sized + OAuthHttpClient,
{
	/// Fetches the authenticated identity and hands the response to `resolver`.
	///
	/// Issues a signed GET to the descriptor's identify endpoint. Non-success statuses fail
	/// before the resolver runs.
	pub async fn identify<R>(&self, token: &Credentials, resolver: &R) -> Result<R::Identity>
	where
		R: ?Sized + IdentityResolver,
	{
		const STEP: FlowStep = FlowStep::Identify;

		let endpoint = self.descriptor.endpoints.identify.as_ref().ok_or_else(|| {
			ConfigError::MissingIdentifyEndpoint { descriptor: self.descriptor.id.to_string() }
		})?;

		obs::observe(STEP, "identify", async move {
			let request = RequestDescriptor::new(Method::GET, endpoint);
			let signed = self.signed_request(request, Some(token))?;
			let response = self.dispatch(STEP, signed).await?;

			common::ensure_success(STEP, &response)?;

			resolver.resolve(&response)
		})
		.await
	}

	/// Signs and sends an arbitrary protected-resource request.
	///
	/// The response is returned as-is, whatever its status; only transport failures and
	/// signing problems are errors.
	pub async fn perform_signed(
		&self,
		request: RequestDescriptor,
		token: &Credentials,
	) -> Result<HttpResponse> {
		const STEP: FlowStep = FlowStep::Request;

		obs::observe(STEP, "perform_signed", async move {
			let signed = self.signed_request(request, Some(token))?;

			self.dispatch(STEP, signed).await
		})
		.await
	}
}
