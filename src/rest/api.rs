/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::{ErrorOverrides, FlickrError, classify_failure};
use crate::rest::retry::RetryPolicy;
use crate::rest::transport::{ApiRequest, HttpResponse, Transport};
use crate::rest::xml::XmlElement;
use crate::rest::{HttpMethod, License};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// Root Flickr REST API
pub const API_ENDPOINT: &str = "https://api.flickr.com/services/rest/";

/// Largest page the collection endpoints return
pub const MAX_PER_PAGE: u32 = 500;

pub(crate) type LicenseTable = Arc<BTreeMap<String, License>>;

/// Directly communicates with the API.
///
/// Each [`ApiClient::call`] is one logical API call: the request is sent,
/// the status and envelope are checked, and transient failures are retried
/// according to the client's [`RetryPolicy`].
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    licenses: Mutex<Option<LicenseTable>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            retry,
            licenses: Mutex::new(None),
        }
    }

    /// Performs a GET call and returns the root `<rsp>` element
    pub async fn call(
        &self,
        method: &str,
        params: &ApiParams<'_>,
        overrides: &ErrorOverrides,
    ) -> Result<XmlElement, FlickrError> {
        self.call_with(HttpMethod::Get, method, params, overrides).await
    }

    /// Performs a call with an explicit HTTP method
    pub async fn call_with(
        &self,
        http_method: HttpMethod,
        method: &str,
        params: &ApiParams<'_>,
        overrides: &ErrorOverrides,
    ) -> Result<XmlElement, FlickrError> {
        let mut all_params = vec![("method".to_string(), method.to_string())];
        all_params.extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        let request = ApiRequest {
            http_method,
            params: all_params,
        };

        self.retry
            .run(FlickrError::is_retryable, |attempt| {
                let request = &request;
                async move {
                    log::debug!("Calling {method} (attempt {attempt})");
                    let resp = self.transport.send(request).await?;
                    parse_response(resp, overrides)
                }
            })
            .await
    }

    pub(crate) fn cached_licenses(&self) -> Option<LicenseTable> {
        self.licenses.lock().ok().and_then(|guard| guard.clone())
    }

    pub(crate) fn store_licenses(&self, licenses: LicenseTable) {
        if let Ok(mut guard) = self.licenses.lock() {
            *guard = Some(licenses);
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("retry", &self.retry)
            .finish()
    }
}

/// Parameters the specific API method expects
pub type ApiParams<'a> = [(&'a str, &'a str)];

// Turns one HTTP response into the success envelope or the error it carries
fn parse_response(resp: HttpResponse, overrides: &ErrorOverrides) -> Result<XmlElement, FlickrError> {
    if resp.status >= 400 {
        return Err(FlickrError::HttpStatus {
            status: resp.status,
            body: resp.body,
        });
    }
    log::trace!("Response body: {}", resp.body);

    let root = XmlElement::parse(&resp.body)?;

    // Failures look like <rsp stat="fail"><err code="1" msg="..."/></rsp>
    if root.attr("stat") == Some("fail") {
        let err = root.required_descendant("err")?;
        let code = err.required_attr("code")?;
        let message = err.attr("msg").unwrap_or_default();
        return Err(classify_failure(code, message, overrides).into());
    }

    Ok(root)
}
