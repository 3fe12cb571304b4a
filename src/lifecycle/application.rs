use crate::api::{routes, ApiData, ConfigError};
use crate::auth::Authenticator;
use crate::framework::{
    Find, HttpTransport, Remove, RequestConfig, ResponseBody, Save, Transport, Update,
};
use crate::model::{Credentials, Registration};
use crate::session::SharedSessionContext;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// The application root.
///
/// `ApplicationRoot` is responsible for:
/// - **Configuration**: the base API URL and default per-call [`RequestConfig`]
/// - **Transport**: one shared HTTP client, so session cookies set by one call reach every other
/// - **Session**: the [`SharedSessionContext`] handed to every screen
/// - **Factories**: operations and authenticators bound to paths under the base URL
///
/// Every factory call spawns a fresh actor on the current Tokio runtime. Operations stop when
/// their last handle is dropped, so there is no explicit shutdown.
///
/// # Example
///
/// ```ignore
/// let root = ApplicationRoot::from_env()?;
///
/// let movies = root.find::<Vec<Movie>>("/movies");
/// movies.find(Some(root.request_config()), None).await?;
///
/// match movies.settled().await? {
///     Ok(response) => render(response.data),
///     Err(error) => root.session().notify("Unexpected Error", Severity::Error),
/// }
/// ```
#[derive(Clone)]
pub struct ApplicationRoot {
    api: ApiData,
    transport: Arc<dyn Transport>,
    session: SharedSessionContext,
}

impl ApplicationRoot {
    pub fn new(api: ApiData, transport: Arc<dyn Transport>) -> Self {
        info!(api_url = %api.api_url, "Application root created");
        Self {
            api,
            transport,
            session: SharedSessionContext::new(),
        }
    }

    /// Reads [`ApiData`] from the environment and builds the `reqwest` transport for it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api = ApiData::from_env()?;
        let transport = HttpTransport::new()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(Self::new(api, Arc::new(transport)))
    }

    pub fn api(&self) -> &ApiData {
        &self.api
    }

    pub fn session(&self) -> &SharedSessionContext {
        &self.session
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// The default per-call configuration, to pass to triggers.
    pub fn request_config(&self) -> RequestConfig {
        self.api.request_config.clone()
    }

    pub fn find<R: ResponseBody>(&self, path: &str) -> Find<R> {
        Find::spawn(self.api.url(path), self.transport())
    }

    pub fn save<Q: Serialize, R: ResponseBody>(&self, path: &str) -> Save<Q, R> {
        Save::spawn(self.api.url(path), self.transport())
    }

    pub fn update<Q: Serialize, R: ResponseBody>(&self, path: &str) -> Update<Q, R> {
        Update::spawn(self.api.url(path), self.transport())
    }

    pub fn remove<R: ResponseBody>(&self, path: &str) -> Remove<R> {
        Remove::spawn(self.api.url(path), self.transport())
    }

    /// A new authenticator with its own ping and refresh operations.
    pub fn authenticator(&self) -> Authenticator {
        Authenticator::spawn(
            self.api.url(routes::PING),
            self.api.url(routes::REFRESH_ACCESS_TOKEN),
            self.request_config(),
            self.transport(),
        )
    }

    pub fn login(&self) -> Save<Credentials, Value> {
        self.save(routes::LOGIN)
    }

    pub fn register(&self) -> Save<Registration, Value> {
        self.save(routes::REGISTER)
    }

    pub fn logout(&self) -> Save<Value, Value> {
        self.save(routes::LOGOUT)
    }
}
