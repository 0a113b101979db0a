// self
use crate::_prelude::*;

/// Provider-specific quirks that influence how handshake steps behave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Requires `oauth_callback_confirmed=true` in the temporary credential response.
	pub callback_confirmed_required: bool,
	/// Parses credential responses as form data regardless of the declared content type.
	///
	/// Several providers answer with `text/html` or `text/plain` bodies that are still
	/// form encoded.
	pub lenient_content_type: bool,
	/// Optional `realm` sent in the `Authorization` header (never signed).
	pub realm: Option<String>,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self { callback_confirmed_required: true, lenient_content_type: false, realm: None }
	}
}
