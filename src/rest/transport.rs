/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::HttpMethod;
use crate::rest::creds::Creds;
use crate::rest::errors::FlickrError;
use futures::future::BoxFuture;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::time::Duration;

/// One request to the REST endpoint, before authentication is added.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub http_method: HttpMethod,

    /// Every parameter including `method`
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Name of the API method being called
    pub fn method(&self) -> Option<&str> {
        self.param("method")
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response from the endpoint. Status checks happen in the call layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Performs a single HTTP round trip.
///
/// Implementations don't retry or interpret the body. They only map network
/// failures onto [`FlickrError::Timeout`], [`FlickrError::Disconnected`] or
/// [`FlickrError::Request`].
pub trait Transport: Send + Sync {
    fn send<'a>(&'a self, request: &'a ApiRequest) -> BoxFuture<'a, Result<HttpResponse, FlickrError>>;
}

/// Transport backed by a reqwest client.
pub struct ReqwestTransport {
    endpoint: String,
    creds: Creds,
    https_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(
        endpoint: &str,
        creds: Creds,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, FlickrError> {
        let https_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            creds,
            https_client,
        })
    }

    async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse, FlickrError> {
        let mut params = request.params.clone();
        self.creds
            .authenticate(request.http_method, &self.endpoint, &mut params)?;

        let builder = match request.http_method {
            HttpMethod::Get => {
                let req_url = url::Url::parse_with_params(&self.endpoint, &params)?;
                self.https_client.get(req_url)
            }
            HttpMethod::Post => {
                let body = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&params)
                    .finish();
                self.https_client
                    .post(self.endpoint.as_str())
                    .header(
                        CONTENT_TYPE,
                        HeaderValue::from_static("application/x-www-form-urlencoded"),
                    )
                    .body(body)
            }
        };

        let resp = builder.send().await.map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await.map_err(map_reqwest_error)?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(&'a self, request: &'a ApiRequest) -> BoxFuture<'a, Result<HttpResponse, FlickrError>> {
        Box::pin(self.execute(request))
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("endpoint", &self.endpoint)
            .field("creds", &self.creds)
            .finish()
    }
}

/// Splits reqwest failures into the kinds the retry logic cares about
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FlickrError {
    if err.is_timeout() {
        return FlickrError::Timeout(err.to_string());
    }
    // A body cut short is the server hanging up mid-response
    if err.is_body() || is_disconnect(&err) {
        return FlickrError::Disconnected(err.to_string());
    }
    FlickrError::Request(err)
}

fn is_disconnect(err: &(dyn std::error::Error + 'static)) -> bool {
    use std::io::ErrorKind;
    let mut source = Some(err);
    while let Some(e) = source {
        // Connection closed before (or while) the response head arrived
        if let Some(hyper_err) = e.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() || hyper_err.is_closed() {
                return true;
            }
        }
        if let Some(io_err) = e.downcast_ref::<std::io::Error>() {
            if matches!(
                io_err.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        source = e.source();
    }
    false
}
