/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::HttpMethod;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Credentials used to talk to the API.
///
/// An API key is enough for read-only calls. Writes (like posting comments)
/// need the secret and an OAuth access token pair, which this library uses
/// for signing but doesn't obtain.
#[derive(Default, Clone)]
pub struct Creds {
    api_key: String,
    api_secret: Option<String>,
    access_token: Option<String>,
    token_secret: Option<String>,
}

impl Creds {
    pub fn from_api_key(api_key: &str) -> Self {
        Self::from_tokens(api_key, None, None, None)
    }

    pub fn from_tokens(
        api_key: &str,
        api_secret: Option<&str>,
        access_token: Option<&str>,
        token_secret: Option<&str>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.map(|v| v.into()),
            access_token: access_token.map(|v| v.into()),
            token_secret: token_secret.map(|v| v.into()),
        }
    }

    /// Reads `FLICKR_API_KEY` and the optional `FLICKR_API_SECRET`,
    /// `FLICKR_ACCESS_TOKEN` and `FLICKR_TOKEN_SECRET` variables
    pub fn from_env() -> Result<Self, FlickrError> {
        let api_key = std::env::var("FLICKR_API_KEY")
            .map_err(|_| FlickrError::InvalidArgument("FLICKR_API_KEY is not set".to_string()))?;
        let optional = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Ok(Self {
            api_key,
            api_secret: optional("FLICKR_API_SECRET"),
            access_token: optional("FLICKR_ACCESS_TOKEN"),
            token_secret: optional("FLICKR_TOKEN_SECRET"),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// True when there is a full token set to sign requests with
    pub fn can_sign(&self) -> bool {
        self.api_secret.is_some() && self.access_token.is_some() && self.token_secret.is_some()
    }

    /// Adds authentication to a set of request parameters.
    ///
    /// Signed requests get `oauth_*` parameters (query-string signature type),
    /// otherwise the API key is appended as `api_key`.
    pub(crate) fn authenticate(
        &self,
        http_method: HttpMethod,
        endpoint: &str,
        params: &mut Vec<(String, String)>,
    ) -> Result<(), FlickrError> {
        if !self.can_sign() {
            params.push(("api_key".to_string(), self.api_key.clone()));
            return Ok(());
        }
        let nonce = format!("{:016x}{:016x}", rand::random::<u64>(), rand::random::<u64>());
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.sign_with(http_method, endpoint, params, &nonce, &timestamp)
    }

    fn sign_with(
        &self,
        http_method: HttpMethod,
        endpoint: &str,
        params: &mut Vec<(String, String)>,
        nonce: &str,
        timestamp: &str,
    ) -> Result<(), FlickrError> {
        let (Some(api_secret), Some(access_token), Some(token_secret)) =
            (&self.api_secret, &self.access_token, &self.token_secret)
        else {
            return Err(FlickrError::Auth("Missing OAuth token or secret".to_string()));
        };

        params.extend([
            ("oauth_consumer_key".to_string(), self.api_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), access_token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ]);

        let mut encoded: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (encode(k), encode(v)))
            .collect();
        encoded.sort();
        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let method: &'static str = http_method.into();
        let base_string = format!("{}&{}&{}", method, encode(endpoint), encode(&param_string));
        let key = format!("{}&{}", encode(api_secret), encode(token_secret));

        let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
            .map_err(|e| FlickrError::Auth(e.to_string()))?;
        mac.update(base_string.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        params.push(("oauth_signature".to_string(), signature));
        Ok(())
    }
}

// RFC 3986 percent encoding, which is what the signature base string wants
fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("api_key", &"xxx")
            .field("api_secret", &self.api_secret.as_ref().map(|_| "xxx"))
            .field("access_token", &self.access_token.as_ref().map(|_| "xxx"))
            .field("token_secret", &self.token_secret.as_ref().map(|_| "xxx"))
            .finish()
    }
}
