//! HMAC-SHA256 request signing with a shared access key

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

use crate::TransportError;

type HmacSha256 = Hmac<Sha256>;

/// Signed headers included in the string to sign
pub const SIGNED_HEADERS: &str = "x-ms-date;host;x-ms-content-sha256";

/// Header values to attach to a signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequestHeaders {
    /// `x-ms-date`
    pub date: String,
    /// `x-ms-content-sha256`
    pub content_hash: String,
    /// `Authorization`
    pub authorization: String,
}

/// Access key credential
#[derive(Clone)]
pub struct AccessKeyCredential {
    mac: HmacSha256,
}

impl std::fmt::Debug for AccessKeyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeyCredential").finish_non_exhaustive()
    }
}

impl AccessKeyCredential {
    /// Build from the base64 key shown in the resource's key settings
    pub fn from_base64(access_key: &str) -> Result<Self, TransportError> {
        let key = STANDARD.decode(access_key.trim()).map_err(|e| {
            TransportError::Configuration(format!("access key is not valid base64: {}", e))
        })?;
        if key.is_empty() {
            return Err(TransportError::Configuration("access key is empty".to_string()));
        }
        let mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| TransportError::Configuration(format!("invalid access key: {}", e)))?;
        Ok(Self { mac })
    }

    /// Sign a request
    pub fn sign(&self, method: &str, url: &Url, body: &[u8], date: &str) -> SignedRequestHeaders {
        let content_hash = content_sha256(body);
        let string_to_sign = format!(
            "{}\n{}\n{};{};{}",
            method.to_uppercase(),
            path_and_query(url),
            date,
            host_header(url),
            content_hash
        );

        let mut mac = self.mac.clone();
        mac.update(string_to_sign.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        SignedRequestHeaders {
            date: date.to_string(),
            content_hash,
            authorization: format!(
                "HMAC-SHA256 SignedHeaders={}&Signature={}",
                SIGNED_HEADERS, signature
            ),
        }
    }
}

/// RFC 1123 date as expected by `x-ms-date`
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn content_sha256(body: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(body))
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
