//! Provider descriptor data structures shared by every handshake step.
//!
//! The module exposes validated metadata and the builder used to assemble it so
//! providers can describe their OAuth 1.0a endpoints in a transport-agnostic way.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// self
use crate::{_prelude::*, assembler::Placement, auth::ProviderId, signature::SignatureMethod};

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Temporary credential request endpoint (a.k.a. request token URL).
	pub temporary_credentials: Url,
	/// Resource-owner authorization endpoint the browser is redirected to.
	pub authorization: Url,
	/// Token credential exchange endpoint (a.k.a. access token URL).
	pub token: Url,
	/// Optional endpoint returning the authenticated identity.
	pub identify: Option<Url>,
}

/// Immutable provider descriptor consumed by the broker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Signature method used for every signed request.
	pub signature_method: SignatureMethod,
	/// Where protocol parameters are attached.
	pub placement: Placement,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}
}
