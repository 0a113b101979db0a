#![cfg(all(feature = "reqwest", feature = "test"))]

// std
use std::collections::BTreeMap;
// crates.io
use httpmock::prelude::*;
use serde::Deserialize;
// self
use oauth1_broker::{
	_preludet::build_reqwest_test_broker,
	auth::{ClientCredentials, Credentials, ProviderId},
	error::{ConfigError, Error, ProtocolError},
	flows::{AuthorizationCallback, HandshakeState, ReqwestBroker},
	obs::FlowStep,
	provider::{JsonIdentity, ProviderDescriptor, ProviderQuirks},
	signature::SignatureMethod,
	store::{CredentialStore, MemoryStore},
	url::Url,
};

const CLIENT_ID: &str = "dpf43f3p2l4k3l03";
const CLIENT_SECRET: &str = "kd94hf93k423kf44";
const FORM: &str = "application/x-www-form-urlencoded";
const TEMPORARY_BODY: &str =
	"oauth_token=hh5s93j4hdidpola&oauth_token_secret=hdhd0244k9j7ao03&oauth_callback_confirmed=true";
const TOKEN_BODY: &str = "oauth_token=nnch734d00sl2jdk&oauth_token_secret=pfkkdhi9sl3r4s00";

fn url(value: &str) -> Url {
	Url::parse(value).expect("Test URL should parse.")
}

fn descriptor_with(server: &MockServer, quirks: ProviderQuirks) -> ProviderDescriptor {
	let provider_id = ProviderId::new("mock-oauth1").expect("Provider identifier should be valid.");

	ProviderDescriptor::builder(provider_id)
		.temporary_credentials_endpoint(url(&server.url("/request_token")))
		.authorization_endpoint(url(&server.url("/authorize")))
		.token_endpoint(url(&server.url("/access_token")))
		.identify_endpoint(url(&server.url("/account")))
		.quirks(quirks)
		.build()
		.expect("Provider descriptor should build successfully.")
}

fn client() -> ClientCredentials {
	ClientCredentials::new(CLIENT_ID, CLIENT_SECRET)
		.with_redirect_uri(url("https://printer.example.com/ready"))
}

fn build_broker(descriptor: ProviderDescriptor) -> ReqwestBroker {
	build_reqwest_test_broker(descriptor, client())
}

#[tokio::test]
async fn handshake_returns_temporary_credentials() {
	let server = MockServer::start_async().await;
	let broker = build_broker(descriptor_with(&server, ProviderQuirks::default()));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/request_token").header_exists("authorization");
			then.status(200).header("content-type", FORM).body(TEMPORARY_BODY);
		})
		.await;
	let temporary = broker.handshake().await.expect("Handshake should succeed.");

	mock.assert_async().await;

	assert_eq!(temporary.id(), "hh5s93j4hdidpola");
	assert_eq!(temporary.secret().expose(), "hdhd0244k9j7ao03");
}

#[tokio::test]
async fn handshake_requires_callback_confirmation_unless_waived() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/request_token");
			then.status(200)
				.header("content-type", FORM)
				.body("oauth_token=hh5s93j4hdidpola&oauth_token_secret=hdhd0244k9j7ao03");
		})
		.await;
	let strict = build_broker(descriptor_with(&server, ProviderQuirks::default()));
	let err = strict.handshake().await.expect_err("Unconfirmed callbacks must be rejected.");

	assert!(matches!(err, Error::Protocol(ProtocolError::CallbackNotConfirmed)));

	let lenient = build_broker(descriptor_with(
		&server,
		ProviderQuirks { callback_confirmed_required: false, ..ProviderQuirks::default() },
	));
	let temporary =
		lenient.handshake().await.expect("Waived confirmation should accept the response.");

	assert_eq!(temporary.id(), "hh5s93j4hdidpola");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn handshake_surfaces_provider_rejections_and_protocol_errors() {
	let server = MockServer::start_async().await;
	let broker = build_broker(descriptor_with(&server, ProviderQuirks::default()));
	let rejected = server
		.mock_async(|when, then| {
			when.method(POST).path("/request_token");
			then.status(401).header("content-type", FORM).body("oauth_problem=signature_invalid");
		})
		.await;
	let err = broker.handshake().await.expect_err("Rejected handshakes must fail.");

	rejected.assert_async().await;

	assert!(matches!(
		err,
		Error::ProviderRejected { step: FlowStep::Handshake, ref reason, status: Some(401) }
			if reason == "signature_invalid"
	));

	rejected.delete_async().await;

	let missing = server
		.mock_async(|when, then| {
			when.method(POST).path("/request_token");
			then.status(200)
				.header("content-type", FORM)
				.body("oauth_token_secret=hdhd0244k9j7ao03&oauth_callback_confirmed=true");
		})
		.await;
	let err = broker.handshake().await.expect_err("Responses without oauth_token must fail.");

	missing.assert_async().await;

	assert!(matches!(
		err,
		Error::Protocol(ProtocolError::MissingField { step: FlowStep::Handshake, field: "oauth_token" })
	));
}

#[tokio::test]
async fn authorize_runs_the_handshake_when_no_token_is_supplied() {
	let server = MockServer::start_async().await;
	let broker = build_broker(descriptor_with(&server, ProviderQuirks::default()));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/request_token");
			then.status(200).header("content-type", FORM).body(TEMPORARY_BODY);
		})
		.await;
	let mut parameters = BTreeMap::new();

	parameters.insert("force_login".to_owned(), "true".to_owned());

	let (authorize_url, temporary, extra) = broker
		.authorize(|url, temporary, params| (url, temporary, params.len()), parameters)
		.await
		.expect("Authorize should succeed.");

	mock.assert_async().await;

	let pairs: BTreeMap<_, _> = authorize_url.query_pairs().into_owned().collect();

	assert_eq!(authorize_url.path(), "/authorize");
	assert_eq!(pairs.get("oauth_token").map(String::as_str), Some("hh5s93j4hdidpola"));
	assert_eq!(pairs.get("force_login").map(String::as_str), Some("true"));
	assert_eq!(temporary.map(|c| c.secret().expose().to_owned()), Some("hdhd0244k9j7ao03".into()));
	assert_eq!(extra, 1);
}

#[tokio::test]
async fn authorize_resume_path_skips_the_handshake() {
	let server = MockServer::start_async().await;
	let broker = build_broker(descriptor_with(&server, ProviderQuirks::default()));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/request_token");
			then.status(200).header("content-type", FORM).body(TEMPORARY_BODY);
		})
		.await;
	let parameters = BTreeMap::from([("oauth_token".to_owned(), "resumed-token".to_owned())]);
	let (authorize_url, temporary) = broker
		.authorize(|url, temporary, _| (url, temporary), parameters)
		.await
		.expect("Resumed authorize should succeed.");

	mock.assert_calls_async(0).await;

	assert!(temporary.is_none());
	assert_eq!(authorize_url.query(), Some("oauth_token=resumed-token"));
}

#[tokio::test]
async fn exchange_accepts_temporary_credentials_with_or_without_secret() {
	let server = MockServer::start_async().await;
	let broker = build_broker(descriptor_with(&server, ProviderQuirks::default()));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token").header_exists("authorization");
			then.status(200).header("content-type", FORM).body(TOKEN_BODY);
		})
		.await;
	let with_secret = broker
		.exchange(&Credentials::new("hh5s93j4hdidpola", "hdhd0244k9j7ao03"), "hfdp7dh39dks9884")
		.await
		.expect("Exchange with the temporary secret should succeed.");
	let without_secret = broker
		.exchange(&Credentials::new("hh5s93j4hdidpola", ""), "hfdp7dh39dks9884")
		.await
		.expect("Exchange without the temporary secret should succeed.");

	mock.assert_calls_async(2).await;

	assert_eq!(with_secret, without_secret);
	assert_eq!(with_secret.id(), "nnch734d00sl2jdk");
	assert_eq!(with_secret.secret().expose(), "pfkkdhi9sl3r4s00");

	let err = broker
		.exchange(&Credentials::new("hh5s93j4hdidpola", ""), "")
		.await
		.expect_err("Empty verifiers must fail before any request.");

	assert!(matches!(err, Error::Config(ConfigError::EmptyVerifier)));

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn exchange_stored_consumes_persisted_temporary_credentials() {
	let server = MockServer::start_async().await;
	let broker = build_broker(descriptor_with(&server, ProviderQuirks::default()));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(200).header("content-type", FORM).body(TOKEN_BODY);
		})
		.await;
	let store = MemoryStore::default();

	store
		.save(Credentials::new("hh5s93j4hdidpola", "hdhd0244k9j7ao03"))
		.await
		.expect("Saving temporary credentials should succeed.");

	let token = broker
		.exchange_stored(&store, "hh5s93j4hdidpola", "hfdp7dh39dks9884")
		.await
		.expect("Stored exchange should succeed.");

	assert_eq!(token.id(), "nnch734d00sl2jdk");
	assert!(store.is_empty());

	let err = broker
		.exchange_stored(&store, "hh5s93j4hdidpola", "hfdp7dh39dks9884")
		.await
		.expect_err("Temporary credentials are single use.");

	assert!(matches!(
		err,
		Error::Protocol(ProtocolError::UnknownTemporaryToken { ref token }) if token == "hh5s93j4hdidpola"
	));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn exchange_stored_keeps_temporary_credentials_after_a_transport_failure() {
	let provider_id = ProviderId::new("flaky").expect("Provider identifier should be valid.");
	let unreachable = ProviderDescriptor::builder(provider_id)
		.temporary_credentials_endpoint(url("http://127.0.0.1:1/request_token"))
		.authorization_endpoint(url("http://127.0.0.1:1/authorize"))
		.token_endpoint(url("http://127.0.0.1:1/access_token"))
		.build()
		.expect("Descriptor should build.");
	let store = MemoryStore::default();

	store
		.save(Credentials::new("hh5s93j4hdidpola", "hdhd0244k9j7ao03"))
		.await
		.expect("Saving temporary credentials should succeed.");

	let err = build_broker(unreachable)
		.exchange_stored(&store, "hh5s93j4hdidpola", "hfdp7dh39dks9884")
		.await
		.expect_err("Unreachable token endpoints must fail.");

	assert!(matches!(err, Error::Transport(ref transport) if transport.step == FlowStep::Exchange));
	assert_eq!(store.len(), 1);

	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(200).header("content-type", FORM).body(TOKEN_BODY);
		})
		.await;
	let token = build_broker(descriptor_with(&server, ProviderQuirks::default()))
		.exchange_stored(&store, "hh5s93j4hdidpola", "hfdp7dh39dks9884")
		.await
		.expect("Retrying the stored exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(token.id(), "nnch734d00sl2jdk");
	assert!(store.is_empty());
}

#[tokio::test]
async fn state_machine_drives_the_full_handshake() {
	let server = MockServer::start_async().await;
	let broker = build_broker(descriptor_with(&server, ProviderQuirks::default()));
	let temporary_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/request_token");
			then.status(200).header("content-type", FORM).body(TEMPORARY_BODY);
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(200).header("content-type", FORM).body(TOKEN_BODY);
		})
		.await;
	let state = broker.start(&HandshakeState::Initial).await.expect("Handshake should succeed.");
	let redirect = url(
		"https://printer.example.com/ready?oauth_token=hh5s93j4hdidpola&oauth_verifier=hfdp7dh39dks9884",
	);
	let callback = AuthorizationCallback::from_url(&redirect).expect("Redirect should carry a token.");
	let state = state.with_callback(&callback).expect("Callback should match the handshake.");
	let state = broker.complete(&state).await.expect("Exchange should succeed.");

	temporary_mock.assert_async().await;
	token_mock.assert_async().await;

	assert_eq!(state.token().map(Credentials::id), Some("nnch734d00sl2jdk"));

	let err = broker.complete(&state).await.expect_err("Authorized flows cannot exchange again.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidTransition { .. })));

	token_mock.assert_calls_async(1).await;
}

#[derive(Debug, Deserialize)]
struct Account {
	id: u64,
	screen_name: String,
}

#[tokio::test]
async fn identify_hands_the_response_to_the_resolver() {
	let server = MockServer::start_async().await;
	let broker = build_broker(descriptor_with(&server, ProviderQuirks::default()));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/account").header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":42,"screen_name":"ada"}"#);
		})
		.await;
	let token = Credentials::new("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
	let account = broker
		.identify(&token, &JsonIdentity::<Account>::new())
		.await
		.expect("Identify should succeed.");

	mock.assert_async().await;

	assert_eq!(account.id, 42);
	assert_eq!(account.screen_name, "ada");
}

#[tokio::test]
async fn identify_without_endpoint_fails_before_any_request() {
	let provider_id = ProviderId::new("no-identify").expect("Provider identifier should be valid.");
	let server = MockServer::start_async().await;
	let descriptor = ProviderDescriptor::builder(provider_id)
		.temporary_credentials_endpoint(url(&server.url("/request_token")))
		.authorization_endpoint(url(&server.url("/authorize")))
		.token_endpoint(url(&server.url("/access_token")))
		.build()
		.expect("Descriptor should build.");
	let broker = build_broker(descriptor);
	let err = broker
		.identify(&Credentials::new("t", "s"), &JsonIdentity::<Account>::new())
		.await
		.expect_err("Missing identify endpoints must fail.");

	assert!(matches!(err, Error::Config(ConfigError::MissingIdentifyEndpoint { .. })));
}

#[tokio::test]
async fn rsa_descriptor_without_signer_fails_without_network() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/request_token");
			then.status(200).header("content-type", FORM).body(TEMPORARY_BODY);
		})
		.await;
	let provider_id = ProviderId::new("rsa-provider").expect("Provider identifier should be valid.");
	let descriptor = ProviderDescriptor::builder(provider_id)
		.temporary_credentials_endpoint(url(&server.url("/request_token")))
		.authorization_endpoint(url(&server.url("/authorize")))
		.token_endpoint(url(&server.url("/access_token")))
		.signature_method(SignatureMethod::RsaSha1)
		.build()
		.expect("Descriptor should build.");
	let err = build_broker(descriptor).handshake().await.expect_err("Missing signer must fail.");

	assert!(matches!(err, Error::Config(ConfigError::MissingSigner)));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn transport_failures_are_tagged_with_the_step() {
	let provider_id = ProviderId::new("unreachable").expect("Provider identifier should be valid.");
	let descriptor = ProviderDescriptor::builder(provider_id)
		.temporary_credentials_endpoint(url("http://127.0.0.1:1/request_token"))
		.authorization_endpoint(url("http://127.0.0.1:1/authorize"))
		.token_endpoint(url("http://127.0.0.1:1/access_token"))
		.build()
		.expect("Descriptor should build.");
	let broker = build_broker(descriptor);
	let err = broker.handshake().await.expect_err("Unreachable providers must fail.");
	let Error::Transport(transport) = err else {
		panic!("Expected a transport error.");
	};

	assert_eq!(transport.step, FlowStep::Handshake);

	let err = broker
		.exchange(&Credentials::new("t", "s"), "v")
		.await
		.expect_err("Unreachable providers must fail.");

	assert!(matches!(err, Error::Transport(ref transport) if transport.step == FlowStep::Exchange));
}
