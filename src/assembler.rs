//! Authorization assembly: protocol parameters, signing, and placement.
//!
//! [`Assembler::sign`] is the single entry point used for every signed request the broker
//! issues. It resolves the signer and client credentials (per-call value first, then the
//! assembler default, otherwise [`ConfigError`]), generates a fresh nonce and timestamp,
//! signs, and attaches the result according to [`Placement`]. The assembler only keeps
//! read-only defaults, so one instance can serve unrelated requests concurrently.

// crates.io
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, Credentials},
	error::ConfigError,
	http::HttpRequest,
	signature::{ProtocolParameters, RequestDescriptor, Signer, encoding},
};

const NONCE_LEN: usize = 32;
const OAUTH_VERSION: &str = "1.0";

/// Where the signed protocol parameters are attached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
	/// `Authorization: OAuth ...` header (RFC 5849 §3.5.1).
	#[default]
	Header,
	/// Appended to the request URI query (RFC 5849 §3.5.3).
	Query,
}

/// Per-call overrides for [`Assembler::sign`].
///
/// Every field is optional; unset signer, client, and placement fall back to the
/// assembler defaults.
#[derive(Clone, Debug, Default)]
pub struct SignOptions {
	/// Signer overriding the assembler default.
	pub signer: Option<Arc<dyn Signer>>,
	/// Client credentials overriding the assembler default.
	pub client: Option<ClientCredentials>,
	/// Temporary or token credentials; sets `oauth_token` and the token half of the key.
	pub token: Option<Credentials>,
	/// Derives `oauth_callback` from the client's redirect URI.
	pub callback: bool,
	/// Extra parameters merged before signing (`realm`, `oauth_verifier`, ...).
	pub params: BTreeMap<String, String>,
	/// Placement overriding the assembler default.
	pub placement: Option<Placement>,
}
impl SignOptions {
	/// Uses `signer` for this call.
	pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
		self.signer = Some(signer);

		self
	}

	/// Uses `client` for this call.
	pub fn with_client(mut self, client: ClientCredentials) -> Self {
		self.client = Some(client);

		self
	}

	/// Signs with temporary or token credentials.
	pub fn with_token(mut self, token: Credentials) -> Self {
		self.token = Some(token);

		self
	}

	/// Requests `oauth_callback` derivation.
	pub fn with_callback(mut self, callback: bool) -> Self {
		self.callback = callback;

		self
	}

	/// Adds an extra protocol parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());

		self
	}

	/// Sets the `realm` sent with the header.
	pub fn with_realm(self, realm: impl Into<String>) -> Self {
		self.with_param(ProtocolParameters::REALM, realm)
	}

	/// Overrides the placement for this call.
	pub fn with_placement(mut self, placement: Placement) -> Self {
		self.placement = Some(placement);

		self
	}
}

/// Builds and signs protocol parameters for outgoing requests.
#[derive(Clone, Debug, Default)]
pub struct Assembler {
	signer: Option<Arc<dyn Signer>>,
	client: Option<ClientCredentials>,
	placement: Placement,
}
impl Assembler {
	/// Creates an assembler without defaults; every call must then supply a signer and client.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the default signer.
	pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
		self.signer = Some(signer);

		self
	}

	/// Sets the default client credentials.
	pub fn with_client(mut self, client: ClientCredentials) -> Self {
		self.client = Some(client);

		self
	}

	/// Sets the default placement.
	pub fn with_placement(mut self, placement: Placement) -> Self {
		self.placement = placement;

		self
	}

	/// Default signer, if configured.
	pub fn signer(&self) -> Option<&Arc<dyn Signer>> {
		self.signer.as_ref()
	}

	/// Default client credentials, if configured.
	pub fn client(&self) -> Option<&ClientCredentials> {
		self.client.as_ref()
	}

	/// Default placement.
	pub fn placement(&self) -> Placement {
		self.placement
	}

	/// Signs `request` and attaches the protocol parameters.
	///
	/// Caller-supplied parameters override the defaults (`oauth_version`, `oauth_callback`),
	/// while `oauth_consumer_key`, `oauth_signature_method`, `oauth_nonce`,
	/// `oauth_timestamp`, and `oauth_token` (when a token is supplied) are always computed
	/// for this call. Configuration problems fail before anything is signed.
	pub fn sign(&self, request: RequestDescriptor, options: SignOptions) -> Result<SignedRequest> {
		let SignOptions { signer, client, token, callback, params: extra, placement } = options;
		let signer = signer.or_else(|| self.signer.clone()).ok_or(ConfigError::MissingSigner)?;
		let client =
			client.or_else(|| self.client.clone()).ok_or(ConfigError::MissingClientCredentials)?;

		if client.id().is_empty() {
			return Err(ConfigError::EmptyConsumerKey.into());
		}

		let placement = placement.unwrap_or(self.placement);
		let mut params = ProtocolParameters::new().with(ProtocolParameters::VERSION, OAUTH_VERSION);

		for (key, value) in extra {
			params.insert(key, value);
		}

		if callback && !params.contains(ProtocolParameters::CALLBACK) {
			let redirect = client.redirect_uri.as_ref().ok_or(ConfigError::MissingRedirectUri)?;

			params.insert(ProtocolParameters::CALLBACK, redirect.as_str());
		}

		params.insert(ProtocolParameters::CONSUMER_KEY, client.id());
		params.insert(ProtocolParameters::SIGNATURE_METHOD, signer.method());
		params.insert(ProtocolParameters::NONCE, generate_nonce());
		params.insert(ProtocolParameters::TIMESTAMP, current_timestamp());

		if let Some(token) = &token {
			params.insert(ProtocolParameters::TOKEN, token.id());
		}

		params.remove(ProtocolParameters::SIGNATURE);

		let signature = signer.sign(&request, &params, &client.credentials, token.as_ref())?;

		params.insert(ProtocolParameters::SIGNATURE, signature);

		Ok(SignedRequest::attach(request, params, placement))
	}
}

/// A request carrying its signed protocol parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// Request to dispatch; includes the protocol parameters in its query for
	/// [`Placement::Query`].
	pub request: RequestDescriptor,
	/// Every protocol parameter sent, `oauth_signature` included.
	pub parameters: ProtocolParameters,
	/// `Authorization` header value for [`Placement::Header`].
	pub authorization: Option<String>,
}
impl SignedRequest {
	fn attach(mut request: RequestDescriptor, parameters: ProtocolParameters, placement: Placement) -> Self {
		let authorization = match placement {
			Placement::Header => Some(authorization_header(&parameters)),
			Placement::Query => {
				request.query.extend(
					parameters
						.iter()
						.filter(|(key, _)| *key != ProtocolParameters::REALM)
						.map(|(k, v)| (encoding::encode(k), encoding::encode(v))),
				);

				None
			},
		};

		Self { request, parameters, authorization }
	}

	/// The computed `oauth_signature`.
	pub fn signature(&self) -> Option<&str> {
		self.parameters.get(ProtocolParameters::SIGNATURE)
	}

	/// Full request URL, query included.
	pub fn url(&self) -> Url {
		let mut url = self.request.uri.clone();

		if !self.request.query.is_empty() {
			url.set_query(Some(&self.request.query_string()));
		}

		url
	}

	/// Converts into an [`HttpRequest`], sending the form body when one is present.
	pub fn into_http_request(self) -> Result<HttpRequest> {
		let body = if self.request.is_form_encoded() {
			self.request.body_string().into_bytes()
		} else {
			Vec::new()
		};

		self.into_http_request_with_body(body)
	}

	/// Converts into an [`HttpRequest`] carrying a caller-provided (unsigned) payload.
	pub fn into_http_request_with_body(self, body: Vec<u8>) -> Result<HttpRequest> {
		let mut builder =
			http::Request::builder().method(self.request.method.clone()).uri(self.url().as_str());

		if let Some(authorization) = &self.authorization {
			builder = builder.header(AUTHORIZATION, authorization);
		}
		if let Some(content_type) = &self.request.content_type {
			builder = builder.header(CONTENT_TYPE, content_type);
		}

		builder.body(body).map_err(|e| ConfigError::from(e).into())
	}
}

/// Renders `OAuth realm="..", key="pct-value", ...` with `realm` first.
pub fn authorization_header(parameters: &ProtocolParameters) -> String {
	let mut parts = Vec::with_capacity(parameters.len());

	if let Some(realm) = parameters.get(ProtocolParameters::REALM) {
		parts.push(format!("realm={}", encoding::quote_header_value(realm)));
	}

	for (key, value) in parameters.iter().filter(|(key, _)| *key != ProtocolParameters::REALM) {
		parts.push(format!(
			"{}={}",
			encoding::encode(key),
			encoding::quote_header_value(&encoding::encode(value))
		));
	}

	format!("OAuth {}", parts.join(", "))
}

/// Parses an `Authorization: OAuth ...` value back into decoded protocol parameters.
///
/// Returns `None` when the scheme is not `OAuth` or a parameter is not a quoted string.
pub fn parse_authorization_header(value: &str) -> Option<ProtocolParameters> {
	let (scheme, rest) = value.trim().split_once(' ')?;

	if !scheme.eq_ignore_ascii_case("OAuth") {
		return None;
	}

	let mut params = ProtocolParameters::new();
	let mut chars = rest.chars().peekable();

	loop {
		while chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}

		if chars.peek().is_none() {
			return Some(params);
		}

		let key: String = chars.by_ref().take_while(|c| *c != '=').collect();

		if chars.next() != Some('"') {
			return None;
		}

		let mut raw = String::new();

		loop {
			match chars.next()? {
				'\\' => raw.push(chars.next()?),
				'"' => break,
				c => raw.push(c),
			}
		}

		let key = encoding::decode(key.trim());
		let value = if key == ProtocolParameters::REALM { raw } else { encoding::decode(&raw) };

		params.insert(key, value);
	}
}

fn generate_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

fn current_timestamp() -> String {
	OffsetDateTime::now_utc().unix_timestamp().to_string()
}
