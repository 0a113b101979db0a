//! Transport primitives for signed OAuth 1.0a requests.
//!
//! The module exposes [`OAuthHttpClient`], the broker's only dependency on an HTTP stack.
//! Requests and responses are plain [`http`] types so custom transports (test doubles,
//! proxies, non-reqwest clients) can plug in without adapters. The broker finishes signing
//! before it hands a request over; transports must send it unchanged.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;

/// Outgoing request handed to transports.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Response returned by transports.
pub type HttpResponse = http::Response<Vec<u8>>;
/// Boxed future returned by [`OAuthHttpClient::perform`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing signed requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back many brokers
/// and many concurrent flows. Timeouts, retries, and cancellation belong to the
/// transport; the broker never retries and forwards every failure as a
/// [`TransportError`](crate::error::TransportError) tagged with the step in flight.
pub trait OAuthHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Submits the request and resolves with the provider's response.
	///
	/// Non-success statuses are responses, not errors; only failures to obtain a response
	/// belong in [`Self::TransportError`].
	fn perform(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Credential endpoints should not follow redirects because a redirected POST would be
/// re-sent with a signature computed for the original URI. Configure any custom
/// [`ReqwestClient`] with [`reqwest::redirect::Policy::none`]; [`ReqwestHttpClient::new`]
/// does so.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client that never follows redirects.
	pub fn new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl OAuthHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn perform(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(reqwest::Request::try_from(request)?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
