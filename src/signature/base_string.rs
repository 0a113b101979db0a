//! Signature base string construction (RFC 5849 §3.4.1).

// self
use crate::signature::{
	encoding,
	request::{ProtocolParameters, RequestDescriptor},
};

/// Builds the normalized parameter string (RFC 5849 §3.4.1.3.2).
///
/// Protocol parameters (minus `oauth_signature` and `realm`), query pairs, and form body
/// pairs are canonicalized, then sorted by encoded key and, for repeated keys, by
/// encoded value.
pub fn normalized_parameters(request: &RequestDescriptor, params: &ProtocolParameters) -> String {
	let mut pairs = Vec::with_capacity(params.len() + request.query.len() + request.body.len());

	pairs.extend(params.signable().map(|(k, v)| (encoding::encode(k), encoding::encode(v))));
	pairs.extend(
		request
			.query
			.iter()
			.map(|(k, v)| (encoding::canonicalize(k), encoding::canonicalize(v))),
	);

	if request.is_form_encoded() {
		pairs.extend(
			request
				.body
				.iter()
				.map(|(k, v)| (encoding::canonicalize(k), encoding::canonicalize(v))),
		);
	}

	pairs.sort_unstable();

	encoding::join_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

/// Builds the signature base string: `METHOD&pct(base_uri)&pct(normalized_params)`.
pub fn base_string(request: &RequestDescriptor, params: &ProtocolParameters) -> String {
	let method = request.method.as_str().to_ascii_uppercase();
	let uri = encoding::encode(request.uri.as_str());
	let normalized = encoding::encode(&normalized_parameters(request, params));

	format!("{method}&{uri}&{normalized}")
}
