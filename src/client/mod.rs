//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    Login, Originator, Password, SendMode, SendReport, SendRequest, UnixTimestamp, ValidationError,
};

const DEFAULT_ENDPOINT: &str = "https://www.textapp.net/webservice/httpservice.aspx";
const DEFAULT_ORIGINATOR: &str = "7city";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Transaction description the gateway uses for an accepted batch.
const TRANSACTION_OK: &str = "transaction ok";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// TextAnywhere account credentials, supplied once at client construction.
pub struct Credentials {
    login: Login,
    password: Password,
}

impl Credentials {
    /// Create credentials and validate that both parts are non-empty.
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            login: Login::new(login)?,
            password: Password::new(password)?,
        })
    }

    /// Assemble credentials from already-validated parts.
    pub fn from_parts(login: Login, password: Password) -> Self {
        Self { login, password }
    }

    fn push_form_params(&self, params: &mut Vec<(String, String)>) {
        params.push((Login::FIELD.to_owned(), self.login.as_str().to_owned()));
        params.push((Password::FIELD.to_owned(), self.password.as_str().to_owned()));
    }
}

#[derive(Debug, thiserror::Error)]
/// Non-2xx HTTP status returned by the gateway.
///
/// Carried as the source of [`TextAnywhereError::Transport`]; downcast to
/// inspect the status and body.
#[error("unexpected HTTP status: {status}")]
pub struct UnexpectedStatus {
    pub status: u16,
    pub body: Option<String>,
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TextAnywhereClient`].
///
/// Exactly one of these is raised per failed call; there is no partial
/// failure at the transaction level. A successful call can still carry
/// per-destination failures inside the report.
pub enum TextAnywhereError {
    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP transport failure: connection errors, timeouts, or a non-2xx
    /// status (see [`UnexpectedStatus`]).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Response body could not be parsed as XML. Keeps the parser
    /// diagnostics and the raw body for debugging.
    #[error("error parsing XML: {source} ... {body}")]
    Parse {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
        body: String,
    },

    /// The gateway rejected the whole transaction.
    #[error("gateway rejected transaction: {description}")]
    Provider { description: String },
}

#[derive(Debug, Clone)]
/// Builder for [`TextAnywhereClient`].
///
/// Use this when you need to customize the endpoint, originator, timeouts,
/// or user-agent.
pub struct TextAnywhereClientBuilder {
    credentials: Credentials,
    endpoint: String,
    originator: Option<Originator>,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
}

impl TextAnywhereClientBuilder {
    /// Create a builder with the default endpoint, originator, and timeouts.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            originator: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Override the gateway endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the originator sent with every message.
    pub fn originator(mut self, originator: Originator) -> Self {
        self.originator = Some(originator);
        self
    }

    /// Set the total timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`TextAnywhereClient`].
    pub fn build(self) -> Result<TextAnywhereClient, TextAnywhereError> {
        let originator = match self.originator {
            Some(originator) => originator,
            None => Originator::new(DEFAULT_ORIGINATOR)?,
        };

        // The gateway is called once per send with no connection reuse, so
        // keep-alive pooling is disabled.
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(0);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| TextAnywhereError::Transport(Box::new(err)))?;

        Ok(TextAnywhereClient {
            credentials: self.credentials,
            endpoint: self.endpoint,
            originator,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level TextAnywhere bulk SMS client.
///
/// This type orchestrates request validation, form encoding, and XML
/// response parsing. By default it posts to
/// `https://www.textapp.net/webservice/httpservice.aspx` with a 20 second
/// connect and total timeout and a fresh connection per call.
///
/// The client holds no mutable state beyond its read-only credentials and
/// configuration, so it can be cloned and shared across tasks freely.
pub struct TextAnywhereClient {
    credentials: Credentials,
    endpoint: String,
    originator: Originator,
    http: Arc<dyn HttpTransport>,
}

impl TextAnywhereClient {
    /// Create a client using the default endpoint, originator, and timeouts.
    ///
    /// For more customization, use [`TextAnywhereClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, TextAnywhereError> {
        Self::builder(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> TextAnywhereClientBuilder {
        TextAnywhereClientBuilder::new(credentials)
    }

    /// Send a batch in the gateway's test mode.
    ///
    /// The gateway delivers nothing but still returns a simulated
    /// per-destination result set.
    pub async fn send_test(&self, request: SendRequest) -> Result<SendReport, TextAnywhereError> {
        self.send(&request, SendMode::Test).await
    }

    /// Send a batch for real delivery.
    pub async fn send_live(&self, request: SendRequest) -> Result<SendReport, TextAnywhereError> {
        self.send(&request, SendMode::Live).await
    }

    /// One gateway transaction: encode, POST, decode, aggregate.
    ///
    /// Errors:
    /// - [`TextAnywhereError::Transport`] for connection failures, timeouts,
    ///   and non-2xx statuses,
    /// - [`TextAnywhereError::Parse`] for malformed XML bodies,
    /// - [`TextAnywhereError::Provider`] when the gateway rejects the
    ///   transaction.
    async fn send(
        &self,
        request: &SendRequest,
        mode: SendMode,
    ) -> Result<SendReport, TextAnywhereError> {
        let mut params = Vec::<(String, String)>::new();
        self.credentials.push_form_params(&mut params);

        // Billing and message references share one clock read per call.
        let reference = UnixTimestamp::now();
        params.extend(crate::transport::encode_send_form(
            request,
            mode,
            reference,
            &self.originator,
        ));

        let response = self
            .http
            .post_form(&self.endpoint, params)
            .await
            .map_err(TextAnywhereError::Transport)?;

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(TextAnywhereError::Transport(Box::new(UnexpectedStatus {
                status: response.status,
                body,
            })));
        }

        let decoded = crate::transport::decode_send_response(&response.body).map_err(|err| {
            TextAnywhereError::Parse {
                source: Box::new(err),
                body: response.body.clone(),
            }
        })?;

        if decoded.description.trim() != TRANSACTION_OK {
            return Err(TextAnywhereError::Provider {
                description: decoded.description,
            });
        }

        Ok(decoded.report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::domain::{DestinationNumber, MessageText, SendSummary};

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        requests: Vec<(String, Vec<(String, String)>)>,
        response_status: u16,
        response_body: String,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    requests: Vec::new(),
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.state.lock().unwrap().requests.clone()
        }

        fn last_request(&self) -> (String, Vec<(String, String)>) {
            self.requests().last().cloned().expect("no request made")
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_form<'a>(
            &'a self,
            url: &'a str,
            params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, body) = {
                    let mut state = self.state.lock().unwrap();
                    state.requests.push((url.to_owned(), params));
                    (state.response_status, state.response_body.clone())
                };
                Ok(HttpResponse { status, body })
            })
        }
    }

    const OK_BODY: &str = r#"
    <response>
      <transaction><code>1</code><description>transaction ok</description></transaction>
      <destinations>
        <destination><number>447700900001</number><code>1</code></destination>
        <destination><number>447700900002</number><code>0</code></destination>
        <destination><number>447700900003</number><code>1</code></destination>
      </destinations>
    </response>
    "#;

    fn assert_param(params: &[(String, String)], key: &str, value: &str) {
        assert!(
            params.iter().any(|(k, v)| k == key && v == value),
            "missing param {key}={value}; got: {params:?}"
        );
    }

    fn param(params: &[(String, String)], key: &str) -> String {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| panic!("missing param {key}; got: {params:?}"))
    }

    fn make_client(transport: FakeTransport) -> TextAnywhereClient {
        TextAnywhereClient {
            credentials: Credentials::new("user", "pass").unwrap(),
            endpoint: "https://example.invalid/httpservice".to_owned(),
            originator: Originator::new("7city").unwrap(),
            http: Arc::new(transport),
        }
    }

    fn make_request(numbers: &[&str], msg: &str) -> SendRequest {
        let destinations = numbers
            .iter()
            .map(|n| DestinationNumber::new(*n).unwrap())
            .collect();
        SendRequest::new(destinations, MessageText::new(msg).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn send_live_posts_form_and_aggregates_report() {
        let transport = FakeTransport::new(200, OK_BODY);
        let client = make_client(transport.clone());
        let request = make_request(&[" 555 123 4567", "447700900123"], "hello");

        let report = client.send_live(request).await.unwrap();
        assert_eq!(report.summary, SendSummary { pass: 2, fail: 1 });
        assert_eq!(report.breakdown.len(), 3);
        assert_eq!(report.breakdown[0].number, "447700900001");
        assert!(report.breakdown[0].pass);
        assert!(!report.breakdown[1].pass);

        let (url, params) = transport.last_request();
        assert_eq!(url, "https://example.invalid/httpservice");
        assert_param(&params, "externallogin", "user");
        assert_param(&params, "password", "pass");
        assert_param(&params, "originator", "7city");
        assert_param(&params, "replymethodid", "1");
        assert_param(&params, "returncsvstring", "false");
        assert_param(&params, "destinations", "5551234567,447700900123");
        assert_param(&params, "body", "hello");
        assert_param(&params, "validity", "1");
        assert_param(&params, "charactersetid", "2");
        assert_param(&params, "method", "sendsms");
    }

    #[tokio::test]
    async fn references_are_fresh_timestamps_shared_within_a_call() {
        let transport = FakeTransport::new(200, OK_BODY);
        let client = make_client(transport.clone());

        client
            .send_live(make_request(&["447700900123"], "hello"))
            .await
            .unwrap();

        let (_, params) = transport.last_request();
        let billing = param(&params, "clientbillingreference");
        let message = param(&params, "clientmessagereference");
        assert_eq!(billing, message);

        // Drawn from the clock at call time, not a fixed value.
        let seconds: u64 = billing.parse().unwrap();
        assert!(seconds > 1_672_531_200);
    }

    #[tokio::test]
    async fn test_and_live_modes_differ_only_in_method() {
        let transport = FakeTransport::new(200, OK_BODY);
        let client = make_client(transport.clone());

        client
            .send_test(make_request(&["447700900123"], "hello"))
            .await
            .unwrap();
        client
            .send_live(make_request(&["447700900123"], "hello"))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        let (_, test_params) = &requests[0];
        let (_, live_params) = &requests[1];

        assert_eq!(param(test_params, "method"), "testsendsms");
        assert_eq!(param(live_params, "method"), "sendsms");

        // References are clock-drawn per call, so compare everything else.
        let strip = |params: &[(String, String)]| {
            params
                .iter()
                .filter(|(k, _)| {
                    k != "method" && k != "clientbillingreference" && k != "clientmessagereference"
                })
                .cloned()
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(test_params), strip(live_params));
    }

    #[tokio::test]
    async fn rejected_transaction_maps_to_provider_error() {
        let body = r#"
        <response>
          <transaction><description>Transaction Failed</description></transaction>
        </response>
        "#;
        let transport = FakeTransport::new(200, body);
        let client = make_client(transport);

        let err = client
            .send_live(make_request(&["447700900123"], "hello"))
            .await
            .unwrap_err();
        match err {
            TextAnywhereError::Provider { description } => {
                assert_eq!(description, "transaction failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse_error_with_raw_body() {
        let transport = FakeTransport::new(200, "this is not xml");
        let client = make_client(transport);

        let err = client
            .send_live(make_request(&["447700900123"], "hello"))
            .await
            .unwrap_err();
        match err {
            TextAnywhereError::Parse { body, .. } => {
                assert_eq!(body, "this is not xml");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn truncated_body_maps_to_parse_error() {
        let transport = FakeTransport::new(200, "<response><transaction>");
        let client = make_client(transport);

        let err = client
            .send_live(make_request(&["447700900123"], "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, TextAnywhereError::Parse { .. }));
    }

    #[tokio::test]
    async fn non_success_http_status_maps_to_transport_error() {
        let transport = FakeTransport::new(500, "oops");
        let client = make_client(transport);

        let err = client
            .send_live(make_request(&["447700900123"], "hello"))
            .await
            .unwrap_err();
        match err {
            TextAnywhereError::Transport(source) => {
                let status = source
                    .downcast_ref::<UnexpectedStatus>()
                    .expect("source should be UnexpectedStatus");
                assert_eq!(status.status, 500);
                assert_eq!(status.body.as_deref(), Some("oops"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_http_error_body_maps_to_none() {
        let transport = FakeTransport::new(503, "   ");
        let client = make_client(transport);

        let err = client
            .send_live(make_request(&["447700900123"], "hello"))
            .await
            .unwrap_err();
        match err {
            TextAnywhereError::Transport(source) => {
                let status = source
                    .downcast_ref::<UnexpectedStatus>()
                    .expect("source should be UnexpectedStatus");
                assert_eq!(status.status, 503);
                assert_eq!(status.body, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn overlong_message_fails_validation_before_any_call() {
        let err = MessageText::new("a".repeat(161)).unwrap_err();
        assert!(matches!(err, ValidationError::MessageTooLong { .. }));

        // No client (and therefore no transport) is ever involved: the
        // request cannot be constructed.
        let mapped: TextAnywhereError = err.into();
        assert!(matches!(mapped, TextAnywhereError::Validation(_)));
    }

    #[test]
    fn credentials_constructors_validate_inputs() {
        assert!(Credentials::new("   ", "pass").is_err());
        assert!(Credentials::new("user", "").is_err());
        assert!(Credentials::new("user", "pass").is_ok());
    }

    #[tokio::test]
    async fn builder_overrides_endpoint_and_originator() {
        let client = TextAnywhereClient::builder(Credentials::new("user", "pass").unwrap())
            .endpoint("https://example.invalid/gateway")
            .originator(Originator::new("acme").unwrap())
            .build()
            .unwrap();
        assert_eq!(client.endpoint, "https://example.invalid/gateway");
        assert_eq!(client.originator.as_str(), "acme");

        // Swap in a fake transport to observe the originator on the wire.
        let transport = FakeTransport::new(200, OK_BODY);
        let client = TextAnywhereClient {
            http: Arc::new(transport.clone()),
            ..client
        };
        client
            .send_test(make_request(&["447700900123"], "hello"))
            .await
            .unwrap();
        let (url, params) = transport.last_request();
        assert_eq!(url, "https://example.invalid/gateway");
        assert_param(&params, "originator", "acme");
    }

    #[test]
    fn default_builder_uses_gateway_endpoint_and_originator() {
        let client = TextAnywhereClient::new(Credentials::new("user", "pass").unwrap()).unwrap();
        assert_eq!(
            client.endpoint,
            "https://www.textapp.net/webservice/httpservice.aspx"
        );
        assert_eq!(client.originator.as_str(), "7city");
    }
}
