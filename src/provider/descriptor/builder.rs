// self
use crate::{
	_prelude::*,
	assembler::Placement,
	auth::ProviderId,
	provider::{ProviderDescriptor, ProviderEndpoints, ProviderQuirks},
	signature::SignatureMethod,
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Temporary credential endpoint is mandatory.
	#[error("Missing temporary credentials endpoint.")]
	MissingTemporaryCredentialsEndpoint,
	/// Authorization endpoint is mandatory.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Endpoints must be HTTP(S) URLs.
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// PLAINTEXT sends secrets in the clear and therefore demands HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS with PLAINTEXT signatures: {url}.")]
	InsecurePlaintext {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Temporary credential request endpoint.
	pub temporary_credentials_endpoint: Option<Url>,
	/// Resource-owner authorization endpoint.
	pub authorization_endpoint: Option<Url>,
	/// Token credential exchange endpoint.
	pub token_endpoint: Option<Url>,
	/// Optional identify endpoint.
	pub identify_endpoint: Option<Url>,
	/// Signature method used for signed requests.
	pub signature_method: SignatureMethod,
	/// Protocol parameter placement.
	pub placement: Placement,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			temporary_credentials_endpoint: None,
			authorization_endpoint: None,
			token_endpoint: None,
			identify_endpoint: None,
			signature_method: SignatureMethod::default(),
			placement: Placement::default(),
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the temporary credential request endpoint.
	pub fn temporary_credentials_endpoint(mut self, url: Url) -> Self {
		self.temporary_credentials_endpoint = Some(url);

		self
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token credential endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the optional identify endpoint.
	pub fn identify_endpoint(mut self, url: Url) -> Self {
		self.identify_endpoint = Some(url);

		self
	}

	/// Overrides the signature method (defaults to `HMAC-SHA1`).
	pub fn signature_method(mut self, method: SignatureMethod) -> Self {
		self.signature_method = method;

		self
	}

	/// Overrides the parameter placement (defaults to the `Authorization` header).
	pub fn placement(mut self, placement: Placement) -> Self {
		self.placement = placement;

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let temporary_credentials = self
			.temporary_credentials_endpoint
			.ok_or(ProviderDescriptorError::MissingTemporaryCredentialsEndpoint)?;
		let authorization = self
			.authorization_endpoint
			.ok_or(ProviderDescriptorError::MissingAuthorizationEndpoint)?;
		let token = self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let endpoints = ProviderEndpoints {
			temporary_credentials,
			authorization,
			token,
			identify: self.identify_endpoint,
		};
		let descriptor = ProviderDescriptor {
			id: self.id,
			endpoints,
			signature_method: self.signature_method,
			placement: self.placement,
			quirks: self.quirks,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	pub fn validate(&self) -> Result<(), ProviderDescriptorError> {
		let require_tls = matches!(self.signature_method, SignatureMethod::Plaintext);
		let endpoints = [
			("temporary_credentials", Some(&self.endpoints.temporary_credentials)),
			("authorization", Some(&self.endpoints.authorization)),
			("token", Some(&self.endpoints.token)),
			("identify", self.endpoints.identify.as_ref()),
		];

		for (name, url) in endpoints.into_iter().filter_map(|(name, url)| Some((name, url?))) {
			validate_endpoint(name, url, require_tls)?;
		}

		Ok(())
	}
}

fn validate_endpoint(
	name: &'static str,
	url: &Url,
	require_tls: bool,
) -> Result<(), ProviderDescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if require_tls =>
			Err(ProviderDescriptorError::InsecurePlaintext { endpoint: name, url: url.to_string() }),
		"http" => Ok(()),
		_ => Err(ProviderDescriptorError::UnsupportedScheme { endpoint: name, url: url.to_string() }),
	}
}
