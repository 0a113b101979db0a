//! Shared helpers for handshake steps (response validation and credential extraction).

// crates.io
use http::header::CONTENT_TYPE;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::ProtocolError,
	http::HttpResponse,
	obs::FlowStep,
	signature::{encoding, is_form_content_type},
};

const ERROR_FIELDS: [&str; 2] = ["error", "oauth_problem"];
const TOKEN_FIELD: &str = "oauth_token";
const TOKEN_SECRET_FIELD: &str = "oauth_token_secret";
const CALLBACK_CONFIRMED_FIELD: &str = "oauth_callback_confirmed";

/// Decoded `application/x-www-form-urlencoded` credential response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormResponse(BTreeMap<String, String>);
impl FormResponse {
	/// Parses a form body, decoding `+` and percent escapes. Repeated keys keep the first value.
	pub fn parse(body: &str) -> Self {
		let mut fields = BTreeMap::new();

		for (key, value) in encoding::split_pairs(body) {
			fields.entry(encoding::decode_form(&key)).or_insert_with(|| encoding::decode_form(&value));
		}

		Self(fields)
	}

	/// Looks up a field.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Consumes the response, returning every field.
	pub fn into_inner(self) -> BTreeMap<String, String> {
		self.0
	}

	fn rejection(&self) -> Option<&str> {
		ERROR_FIELDS.iter().find_map(|field| self.get(field)).filter(|reason| !reason.is_empty())
	}

	fn required(&self, step: FlowStep, field: &'static str) -> Result<&str> {
		self.get(field).ok_or_else(|| ProtocolError::MissingField { step, field }.into())
	}
}

/// Validates a handshake or exchange response and returns its decoded fields.
///
/// Order of checks: explicit provider error field, HTTP status, content type, body shape.
pub(crate) fn parse_credentials_response(
	step: FlowStep,
	response: &HttpResponse,
	lenient_content_type: bool,
) -> Result<FormResponse> {
	let content_type = response
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.map(ToOwned::to_owned);
	let is_form = content_type.as_deref().is_some_and(is_form_content_type);
	let body = std::str::from_utf8(response.body()).ok();
	let status = response.status();

	if is_form || lenient_content_type || !status.is_success() {
		let form = body.map(FormResponse::parse).unwrap_or_default();

		if let Some(reason) = form.rejection() {
			return Err(Error::ProviderRejected {
				step,
				reason: reason.to_owned(),
				status: Some(status.as_u16()),
			});
		}
	}
	if !status.is_success() {
		return Err(ProtocolError::UnexpectedStatus { step, status: status.as_u16() }.into());
	}
	if !is_form && !lenient_content_type {
		return Err(ProtocolError::UnexpectedContentType { step, content_type }.into());
	}

	let body = body.map(str::trim).filter(|body| body.contains('='));
	let Some(body) = body else {
		return Err(ProtocolError::MalformedBody { step }.into());
	};

	Ok(FormResponse::parse(body))
}

/// Extracts `oauth_token` + `oauth_token_secret`; the token must be non-empty.
pub(crate) fn credentials_from(step: FlowStep, form: &FormResponse) -> Result<Credentials> {
	let token = form.required(step, TOKEN_FIELD)?;

	if token.is_empty() {
		return Err(ProtocolError::MissingField { step, field: TOKEN_FIELD }.into());
	}

	let secret = form.required(step, TOKEN_SECRET_FIELD)?;

	Ok(Credentials::new(token, secret))
}

/// Requires `oauth_callback_confirmed=true` on temporary credential responses.
pub(crate) fn ensure_callback_confirmed(form: &FormResponse) -> Result<()> {
	match form.get(CALLBACK_CONFIRMED_FIELD) {
		Some(value) if value.eq_ignore_ascii_case("true") => Ok(()),
		_ => Err(ProtocolError::CallbackNotConfirmed.into()),
	}
}

/// Fails on non-success statuses, surfacing explicit provider errors when the body is a form.
pub(crate) fn ensure_success(step: FlowStep, response: &HttpResponse) -> Result<()> {
	let status = response.status();

	if status.is_success() {
		return Ok(());
	}

	let reason = std::str::from_utf8(response.body())
		.ok()
		.map(FormResponse::parse)
		.and_then(|form| form.rejection().map(ToOwned::to_owned));

	match reason {
		Some(reason) => Err(Error::ProviderRejected { step, reason, status: Some(status.as_u16()) }),
		None => Err(ProtocolError::UnexpectedStatus { step, status: status.as_u16() }.into()),
	}
}
