//! Main USDA client implementation.

use crate::context::Context;
use crate::convenience::Presets;
use crate::error::{Error, Result};
use crate::options::{add_query_options, QueryOptions};
use crate::types::*;
use crate::version::build_user_agent;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/ndb/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport shared by every client built without a custom timeout or client.
static DEFAULT_HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Builder for constructing a [`Client`].
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
    user_agent_suffix: Option<String>,
    presets: Presets,
}

impl ClientBuilder {
    /// Create a new client builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            http_client: None,
            user_agent_suffix: None,
            presets: Presets::default(),
        }
    }

    /// Set the API base URL. A trailing `/` is added if missing.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    /// Set the request timeout of the HTTP client.
    ///
    /// Without this, clients share one process-wide connection pool with a
    /// 30 second timeout; with it, the built client gets a pool of its own.
    /// Ignored when a client is supplied with [`http_client`](Self::http_client).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send requests through the given HTTP client instead of a new one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set a custom User-Agent suffix.
    pub fn user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Override the query options and parameters used by the convenience
    /// methods.
    pub fn presets(mut self, presets: Presets) -> Self {
        self.presets = presets;
        self
    }

    /// Build the client.
    ///
    /// The API key is embedded as the user-info of the base URL, so it must
    /// only contain characters RFC 3986 allows there.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(Error::Config("API key is required".into()));
        }
        if let Some(c) = self.api_key.chars().find(|c| !is_userinfo_char(*c)) {
            return Err(Error::Config(format!(
                "API key contains {:?}, which is not allowed in a URL",
                c
            )));
        }
        if !valid_percent_escapes(&self.api_key) {
            return Err(Error::Config(
                "API key contains a malformed percent escape".into(),
            ));
        }

        let mut base_url = Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!("invalid base URL {:?}: {}", self.base_url, e))
        })?;
        base_url.set_username(&self.api_key).map_err(|_| {
            Error::Config(format!(
                "base URL {:?} cannot carry credentials",
                self.base_url
            ))
        })?;

        // Warn about insecure connections
        if base_url.scheme() != "https" {
            warn!(
                base_url = %redacted(&base_url),
                "API base URL is not using HTTPS. The API key will be sent in clear text."
            );
        }

        let user_agent = build_user_agent(self.user_agent_suffix.as_deref());
        let user_agent = HeaderValue::from_str(&user_agent)
            .map_err(|_| Error::Config(format!("invalid User-Agent {:?}", user_agent)))?;

        let http_client = match (self.http_client, self.timeout) {
            (Some(client), _) => client,
            (None, Some(timeout)) => build_http_client(timeout)?,
            (None, None) => default_http_client()?,
        };

        Ok(Client {
            base_url,
            http_client,
            user_agent,
            presets: self.presets,
        })
    }
}

/// Client for the USDA Food Composition Databases API.
///
/// Cloning is cheap; clones share the HTTP connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use usda::{Client, Context, QueryOptions, SearchParams};
///
/// #[tokio::main]
/// async fn main() -> Result<(), usda::Error> {
///     let client = Client::builder("your-api-key").build()?;
///     let ctx = Context::new();
///
///     let params = SearchParams {
///         q: Some("butter".into()),
///         ..Default::default()
///     };
///     let opts = QueryOptions::new().with_max(25).with_sort("r");
///     let results = client.search(&ctx, &params, Some(&opts)).await?;
///
///     for item in results.list.item {
///         println!("{} {}", item.ndbno, item.name);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    http_client: reqwest::Client,
    user_agent: HeaderValue,
    pub(crate) presets: Presets,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &redacted(&self.base_url).as_str())
            .field("user_agent", &self.user_agent)
            .field("presets", &self.presets)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new client builder.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Create a client with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the API key cannot be embedded in the base URL. Use
    /// [`Client::builder`] to handle that as an error instead.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::expect_valid(Self::builder(api_key).build())
    }

    /// Create a client that sends requests through `http_client`.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Client::new`].
    pub fn with_http_client(api_key: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self::expect_valid(Self::builder(api_key).http_client(http_client).build())
    }

    fn expect_valid(result: Result<Client>) -> Self {
        match result {
            Ok(client) => client,
            Err(err) => panic!("unusable USDA client configuration: {}", err),
        }
    }

    /// The base URL requests are resolved against, without the API key.
    pub fn base_url(&self) -> Url {
        redacted(&self.base_url)
    }

    /// The presets used by the convenience methods.
    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    // === Operations ===

    /// Fetch a list of foods, nutrients or food groups.
    pub async fn list(
        &self,
        ctx: &Context,
        params: &ListParams,
        opts: Option<&QueryOptions>,
    ) -> Result<ListResponse> {
        self.post(ctx, "list", params, opts).await
    }

    /// Fetch nutrient values for a set of foods.
    pub async fn nutrient_report(
        &self,
        ctx: &Context,
        params: &NutrientReportParams,
        opts: Option<&QueryOptions>,
    ) -> Result<NutrientReportResponse> {
        self.post(ctx, "nutrients", params, opts).await
    }

    /// Fetch V2 food reports. This endpoint takes no query options.
    pub async fn foods_report(
        &self,
        ctx: &Context,
        params: &FoodsReportParams,
    ) -> Result<FoodsReportResponse> {
        self.post(ctx, "V2/reports", params, None).await
    }

    /// Search foods by name.
    pub async fn search(
        &self,
        ctx: &Context,
        params: &SearchParams,
        opts: Option<&QueryOptions>,
    ) -> Result<SearchResponse> {
        self.post(ctx, "search", params, opts).await
    }

    // === Internal methods ===

    async fn post<T, B>(
        &self,
        ctx: &Context,
        path: &str,
        body: &B,
        opts: Option<&QueryOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let path = add_query_options(path, opts)?;
        let request = self.build_request(&path, body)?;
        self.dispatch(ctx, request).await
    }

    /// Build a JSON POST request for `path` relative to the base URL.
    ///
    /// reqwest moves the user-info key into a Basic `Authorization` header.
    pub(crate) fn build_request<B>(&self, path: &str, payload: &B) -> Result<reqwest::Request>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload)?;

        let url = self.base_url.join(path).map_err(|e| Error::InvalidPath {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        self.http_client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(USER_AGENT, self.user_agent.clone())
            .body(body)
            .build()
            .map_err(Error::Http)
    }

    /// Send `request` under `ctx` and decode the JSON body into `T`.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        request: reqwest::Request,
    ) -> Result<T> {
        let method = request.method().clone();
        let url = redacted(request.url());
        debug!(%method, %url, "Sending request");

        let exchange = async move {
            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(transport_error)?;

            if !response.status().is_success() {
                return Err(Error::from_response(response).await);
            }

            // Consumes the response; the connection is released here.
            let body = response.bytes().await.map_err(transport_error)?;
            Ok::<_, Error>(body)
        };

        let body = match ctx.run(exchange).await {
            Ok(body) => body,
            Err(err) => {
                debug!(%method, %url, error = %err, "Request failed");
                return Err(err);
            }
        };
        debug!(%method, %url, bytes = body.len(), "Received response");

        serde_json::from_slice(&body).map_err(Error::Json)
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(Error::Http)
}

fn default_http_client() -> Result<reqwest::Client> {
    if let Some(client) = DEFAULT_HTTP_CLIENT.get() {
        return Ok(client.clone());
    }
    let client = build_http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
    Ok(DEFAULT_HTTP_CLIENT.get_or_init(|| client).clone())
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Http(err)
    }
}

/// `url` with any credentials removed, for logging.
fn redacted(url: &Url) -> Url {
    let mut url = url.clone();
    // Only fails for URLs that cannot carry credentials in the first place.
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url
}

/// RFC 3986 `userinfo`: unreserved, sub-delims, `:` and percent escapes.
fn is_userinfo_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~!$&'()*+,;=:%".contains(c)
}

// `Url::set_username` passes `%` through unchecked.
fn valid_percent_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().all(|(i, b)| {
        *b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}
