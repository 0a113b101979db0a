//! Broker-level error types shared across signers, the assembler, and handshake steps.

// self
use crate::{_prelude::*, obs::FlowStep};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected before any network I/O.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider response could not be interpreted as the expected credentials.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Transport failure forwarded untouched from the HTTP client.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Credential store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),

	/// Provider answered with an explicit `error` (or `oauth_problem`) field.
	#[error("Provider rejected the {step} request: {reason}.")]
	ProviderRejected {
		/// Step whose request was rejected.
		step: FlowStep,
		/// Provider-supplied reason string.
		reason: String,
		/// HTTP status code of the rejection.
		status: Option<u16>,
	},
}

/// Configuration and validation failures raised before a request leaves the process.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Neither the call nor the assembler supplied a signer.
	#[error("No signer was supplied and no default signer is configured.")]
	MissingSigner,
	/// Neither the call nor the assembler supplied client credentials.
	#[error("No client credentials were supplied and no default client is configured.")]
	MissingClientCredentials,
	/// Client credentials carry an empty consumer key.
	#[error("Client credentials must carry a non-empty consumer key.")]
	EmptyConsumerKey,
	/// Shared-secret signature method invoked without a client secret.
	#[error("The {method} signature method requires a client secret.")]
	MissingClientSecret {
		/// Signature method label.
		method: &'static str,
	},
	/// `oauth_callback` was requested but the client has no redirect URI.
	#[error("An oauth_callback was requested but the client has no redirect URI.")]
	MissingRedirectUri,
	/// `exchange()` was called with an empty `oauth_verifier`.
	#[error("The token exchange requires a non-empty oauth_verifier.")]
	EmptyVerifier,
	/// `identify()` was called on a descriptor without an identify endpoint.
	#[error("Descriptor `{descriptor}` does not declare an identify endpoint.")]
	MissingIdentifyEndpoint {
		/// Provider identifier string.
		descriptor: String,
	},
	/// A handshake step was invoked from a state that cannot perform it.
	#[error("Cannot run the {step} step from the {state} state.")]
	InvalidTransition {
		/// Step that was attempted.
		step: FlowStep,
		/// Label of the current state.
		state: &'static str,
	},
	/// HMAC key could not be initialized.
	#[error("Signing key is invalid.")]
	InvalidSigningKey,
	/// RSA private key could not be parsed.
	#[error("RSA private key could not be parsed.")]
	InvalidPrivateKey,
	/// Asymmetric signing primitive failed.
	#[error("Signing primitive failed.")]
	Signing {
		/// Underlying failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a signing primitive failure.
	pub fn signing(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Signing { source: Box::new(src) }
	}

	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Responses that completed the round trip but do not have the expected shape.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Provider answered with a non-success status and no explicit error field.
	#[error("The {step} endpoint returned HTTP {status}.")]
	UnexpectedStatus {
		/// Step whose response failed.
		step: FlowStep,
		/// HTTP status code.
		status: u16,
	},
	/// Response was not `application/x-www-form-urlencoded`.
	#[error("The {step} endpoint returned an unexpected content type: {content_type:?}.")]
	UnexpectedContentType {
		/// Step whose response failed.
		step: FlowStep,
		/// Returned content type, if any.
		content_type: Option<String>,
	},
	/// Response body was empty or not valid form data.
	#[error("The {step} endpoint returned a malformed body.")]
	MalformedBody {
		/// Step whose response failed.
		step: FlowStep,
	},
	/// A required field was absent or empty.
	#[error("The {step} response is missing `{field}`.")]
	MissingField {
		/// Step whose response failed.
		step: FlowStep,
		/// Missing field name.
		field: &'static str,
	},
	/// Temporary credential response did not confirm the callback.
	#[error("The handshake response did not set oauth_callback_confirmed=true.")]
	CallbackNotConfirmed,
	/// Authorization redirect carried a token other than the pending temporary token.
	#[error("Authorization callback returned token `{returned}`, expected `{expected}`.")]
	TokenMismatch {
		/// Pending temporary token identifier.
		expected: String,
		/// Identifier carried by the redirect.
		returned: String,
	},
	/// Authorization redirect did not carry a verifier.
	#[error("Authorization callback is missing oauth_verifier.")]
	MissingVerifier,
	/// No persisted temporary credentials match the returned token.
	#[error("No pending temporary credentials match token `{token}`.")]
	UnknownTemporaryToken {
		/// Identifier carried by the redirect.
		token: String,
	},
	/// Identity payload could not be decoded.
	#[error("Identity payload could not be decoded.")]
	IdentityParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
}

/// Transport-level failure tagged with the step that was in flight.
#[derive(Debug, ThisError)]
#[error("Transport failed during the {step} step.")]
pub struct TransportError {
	/// Step whose request failed.
	pub step: FlowStep,
	/// Transport-specific failure.
	#[source]
	pub source: BoxError,
}
impl TransportError {
	/// Wraps a transport-specific failure.
	pub fn new(step: FlowStep, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self { step, source: Box::new(src) }
	}
}
