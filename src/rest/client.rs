/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::api::{API_ENDPOINT, ApiClient};
use crate::rest::creds::Creds;
use crate::rest::errors::FlickrError;
use crate::rest::retry::RetryPolicy;
use crate::rest::transport::{ReqwestTransport, Transport};
use std::sync::Arc;
use std::time::Duration;

/// Settings for the reqwest backed client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub endpoint: String,

    /// Per request deadline
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: API_ENDPOINT.to_string(),
            timeout: Duration::from_secs(15),
            retry: RetryPolicy::default(),
        }
    }
}

/// Entry point for the API.
///
/// Cloning is cheap and clones share the connection pool and license cache.
///
/// Example
/// ```no_run
///     use flickr_photos::rest::{Client, Creds};
///
///     async fn show_photo(api_key: &str) -> Result<(), flickr_photos::rest::FlickrError> {
///         let client = Client::new(Creds::from_api_key(api_key), "my-app/1.0")?;
///         let photo = client.get_single_photo("32812033543").await?;
///         println!("{:?} by {}", photo.info.title, photo.info.owner.username);
///         Ok(())
///     }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) api_client: Arc<ApiClient>,
}

impl Client {
    /// Creates a client for the public endpoint.
    ///
    /// `user_agent` should say who is calling, e.g. `"my-app/1.0 (me@example.org)"`.
    pub fn new(creds: Creds, user_agent: &str) -> Result<Self, FlickrError> {
        Self::with_config(creds, user_agent, ClientConfig::default())
    }

    pub fn with_config(
        creds: Creds,
        user_agent: &str,
        config: ClientConfig,
    ) -> Result<Self, FlickrError> {
        if creds.api_key().is_empty() {
            return Err(FlickrError::InvalidArgument(
                "Cannot create a client with an empty string as the API key".to_string(),
            ));
        }
        let transport = ReqwestTransport::new(&config.endpoint, creds, user_agent, config.timeout)?;
        Ok(Self::with_transport(Arc::new(transport), config.retry))
    }

    /// Creates a client sending requests through a custom transport
    pub fn with_transport(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self {
            api_client: Arc::new(ApiClient::new(transport, retry)),
        }
    }

    /// Lower level access for methods this library doesn't wrap
    pub fn api_client(&self) -> &ApiClient {
        &self.api_client
    }
}
