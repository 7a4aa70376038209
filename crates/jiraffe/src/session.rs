//! Session bootstrap and shared client state.
//!
//! `connect` performs the login handshake, builds the base REST path and
//! populates the field-schema registry exactly once. Everything the
//! per-resource calls need afterwards (transport, worker pool, registry) is
//! read-only and shared behind one `Arc`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::dispatch::{Dispatcher, PendingOperation};
use crate::error::{Error, Result};
use crate::schema::{FieldDescriptor, FieldSchemaRegistry};
use crate::transport::{expect_json, interpret_status, RawResponse, Transport};

const BASE_REST_PATH: &str = "/rest/api/2";
const DEFAULT_WORKERS: usize = 8;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`JiraClient::connect`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Url,
    pub credentials: Credentials,
    pub proxy: Option<Url>,
    pub timeout: Duration,
    pub workers: usize,
}

impl ClientConfig {
    pub fn new(endpoint: Url, credentials: Credentials) -> Self {
        Self {
            endpoint,
            credentials,
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_proxy(mut self, proxy: Url) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

pub(crate) struct SessionState {
    pub(crate) base: Url,
    pub(crate) transport: Transport,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) registry: Arc<FieldSchemaRegistry>,
}

/// Handle to an authenticated session. Cheap to clone; all clones share the
/// transport, the worker pool and the field-schema snapshot.
#[derive(Clone)]
pub struct JiraClient {
    pub(crate) state: Arc<SessionState>,
}

impl JiraClient {
    /// Authenticate and bootstrap the field-schema registry.
    ///
    /// A 401 or 403 from the handshake is fatal to the session
    /// ([`Error::Auth`]); the caller must re-connect. A failed field listing
    /// is not: the session stays usable and every custom field degrades to
    /// an opaque value.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let transport = Transport::new(&config.credentials, config.proxy.clone(), config.timeout)?;
        let dispatcher = Dispatcher::new(config.workers);
        let base = build_base_url(&config.endpoint);

        let mut handshake = join_path(&base, &["user"])?;
        handshake
            .query_pairs_mut()
            .append_pair("username", config.credentials.username());
        let raw = transport.get(handshake).await?;
        interpret_handshake(raw)?;
        debug!(%base, "handshake complete");

        let registry = bootstrap_registry(&transport, &dispatcher, &base).await;

        Ok(Self {
            state: Arc::new(SessionState {
                base,
                transport,
                dispatcher,
                registry: Arc::new(registry),
            }),
        })
    }

    /// The field-schema snapshot this session decodes against.
    pub fn registry(&self) -> &FieldSchemaRegistry {
        &self.state.registry
    }

    /// Look up a field's declared schema. `None` for fields unknown to this
    /// session.
    pub fn lookup(&self, id: &str) -> Option<&FieldDescriptor> {
        self.state.registry.lookup(id)
    }

    /// Submit an arbitrary unit of work to the session's worker pool.
    pub fn submit<T, F>(&self, unit: F) -> PendingOperation<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.state.dispatcher.submit(unit)
    }
}

impl SessionState {
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        join_path(&self.base, segments)
    }
}

/// Endpoint path (trailing slash trimmed) + the REST base path.
fn build_base_url(endpoint: &Url) -> Url {
    let mut base = endpoint.clone();
    let path = endpoint.path().trim_end_matches('/');
    base.set_path(&format!("{path}{BASE_REST_PATH}"));
    base.set_query(None);
    base
}

pub(crate) fn join_path(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| Error::Config("endpoint URL cannot be a base".into()))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

/// Map the handshake response. 401 and 403 are authentication failures
/// fatal to the session; any other non-2xx surfaces as a plain REST error.
fn interpret_handshake(raw: RawResponse) -> Result<()> {
    match raw.status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth {
            status: raw.status.as_u16(),
        }),
        _ => interpret_status(raw).map(|_| ()),
    }
}

/// One dispatched field-listing call; its result becomes the session's
/// registry. Failure leaves the registry empty and the session alive.
async fn bootstrap_registry(
    transport: &Transport,
    dispatcher: &Dispatcher,
    base: &Url,
) -> FieldSchemaRegistry {
    let url = match join_path(base, &["field"]) {
        Ok(url) => url,
        Err(error) => {
            warn!(%error, "cannot build field listing URL");
            return FieldSchemaRegistry::empty();
        }
    };
    let transport = transport.clone();
    let pending = dispatcher.submit(async move {
        let raw = transport.get(url).await?;
        expect_json::<Vec<FieldDescriptor>>(raw)
    });
    registry_from_listing(pending.get().await)
}

/// Listing outcome → registry. The custom subset is kept; duplicates are
/// dropped with a warning. A failed listing leaves the registry empty so
/// the session stays usable with opaque custom fields.
fn registry_from_listing(listing: Result<Vec<FieldDescriptor>>) -> FieldSchemaRegistry {
    match listing {
        Ok(fields) => {
            let custom: Vec<FieldDescriptor> =
                fields.into_iter().filter(|field| field.custom).collect();
            let (registry, dropped) = FieldSchemaRegistry::build(custom);
            if !dropped.is_empty() {
                warn!(count = dropped.len(), "field listing contained duplicate ids");
            }
            debug!(fields = registry.len(), "field schema registry populated");
            registry
        }
        Err(error) => {
            warn!(%error, "field listing failed; custom fields will decode as opaque values");
            FieldSchemaRegistry::empty()
        }
    }
}
