//! Caller-owned handshake state machine.
//!
//! `Initial -> AwaitingAuthorization -> AwaitingExchange -> Authorized`. Each transition
//! borrows the current state and returns the next one only when it succeeds, so a failed or
//! abandoned step leaves the caller holding the previous state.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::{ConfigError, ProtocolError},
	obs::FlowStep,
	signature::{ProtocolParameters, encoding},
};

/// Progress of one three-legged authorization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HandshakeState {
	/// Nothing requested yet.
	#[default]
	Initial,
	/// Temporary credentials issued; the resource owner has to approve them.
	AwaitingAuthorization {
		/// Temporary credentials returned by the handshake.
		temporary: Credentials,
	},
	/// The resource owner approved; the verifier is ready to be exchanged.
	AwaitingExchange {
		/// Temporary credentials returned by the handshake.
		temporary: Credentials,
		/// `oauth_verifier` carried by the authorization callback.
		verifier: String,
	},
	/// Token credentials obtained.
	Authorized {
		/// Token credentials returned by the exchange.
		token: Credentials,
	},
}
impl HandshakeState {
	/// Stable label used in errors and logs.
	pub const fn label(&self) -> &'static str {
		match self {
			HandshakeState::Initial => "initial",
			HandshakeState::AwaitingAuthorization { .. } => "awaiting_authorization",
			HandshakeState::AwaitingExchange { .. } => "awaiting_exchange",
			HandshakeState::Authorized { .. } => "authorized",
		}
	}

	/// Records the temporary credentials returned by the handshake.
	pub fn with_temporary(&self, temporary: Credentials) -> Result<Self> {
		match self {
			HandshakeState::Initial => Ok(HandshakeState::AwaitingAuthorization { temporary }),
			_ => Err(self.invalid(FlowStep::Handshake)),
		}
	}

	/// Validates the authorization callback against the pending temporary token.
	pub fn with_callback(&self, callback: &AuthorizationCallback) -> Result<Self> {
		let HandshakeState::AwaitingAuthorization { temporary } = self else {
			return Err(self.invalid(FlowStep::Authorize));
		};

		if callback.token != temporary.id() {
			return Err(ProtocolError::TokenMismatch {
				expected: temporary.id().to_owned(),
				returned: callback.token.clone(),
			}
			.into());
		}

		let verifier = callback
			.verifier
			.clone()
			.filter(|verifier| !verifier.is_empty())
			.ok_or(ProtocolError::MissingVerifier)?;

		Ok(HandshakeState::AwaitingExchange { temporary: temporary.clone(), verifier })
	}

	/// Records the token credentials returned by the exchange.
	pub fn with_token(&self, token: Credentials) -> Result<Self> {
		match self {
			HandshakeState::AwaitingExchange { .. } => Ok(HandshakeState::Authorized { token }),
			_ => Err(self.invalid(FlowStep::Exchange)),
		}
	}

	/// Temporary credentials, while they exist.
	pub fn temporary(&self) -> Option<&Credentials> {
		match self {
			HandshakeState::AwaitingAuthorization { temporary }
			| HandshakeState::AwaitingExchange { temporary, .. } => Some(temporary),
			_ => None,
		}
	}

	/// Token credentials, once authorized.
	pub fn token(&self) -> Option<&Credentials> {
		match self {
			HandshakeState::Authorized { token } => Some(token),
			_ => None,
		}
	}

	/// Returns true once token credentials are held.
	pub fn is_authorized(&self) -> bool {
		matches!(self, HandshakeState::Authorized { .. })
	}

	pub(crate) fn invalid(&self, step: FlowStep) -> Error {
		ConfigError::InvalidTransition { step, state: self.label() }.into()
	}
}

/// Parameters carried by the provider's redirect back to the application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCallback {
	/// `oauth_token` echoed by the provider.
	pub token: String,
	/// `oauth_verifier`, absent when the resource owner denied access on some providers.
	pub verifier: Option<String>,
}
impl AuthorizationCallback {
	/// Builds a callback from already decoded values.
	pub fn new(token: impl Into<String>, verifier: impl Into<String>) -> Self {
		Self { token: token.into(), verifier: Some(verifier.into()) }
	}

	/// Extracts the callback parameters from a raw query string.
	///
	/// Returns `None` when `oauth_token` is absent.
	pub fn from_query(query: &str) -> Option<Self> {
		let mut token = None;
		let mut verifier = None;

		for (key, value) in encoding::split_pairs(query) {
			match encoding::decode_form(&key).as_str() {
				ProtocolParameters::TOKEN => token = Some(encoding::decode_form(&value)),
				ProtocolParameters::VERIFIER => verifier = Some(encoding::decode_form(&value)),
				_ => {},
			}
		}

		Some(Self { token: token?, verifier })
	}

	/// Extracts the callback parameters from the redirect URL.
	pub fn from_url(url: &Url) -> Option<Self> {
		Self::from_query(url.query()?)
	}
}
