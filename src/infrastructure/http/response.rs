use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{GatewayError, GatewayResult};

pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub body_bytes: Vec<u8>,
    pub headers: HashMap<String, String>,
}

impl ApiResponse {
    pub(crate) async fn from_response(response: reqwest::Response) -> GatewayResult<Self> {
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let body_bytes = response.bytes().await?.to_vec();

        let body = if !body_bytes.is_empty() {
            serde_json::from_slice(&body_bytes).ok()
        } else {
            None
        };

        Ok(Self {
            status,
            body,
            body_bytes,
            headers,
        })
    }

    pub fn json<T: DeserializeOwned>(&self) -> GatewayResult<T> {
        serde_json::from_slice(&self.body_bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    /// Error text the API returned, falling back to the raw body or status reason
    pub fn error_message(&self) -> String {
        if let Some(message) = self
            .body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        let text = String::from_utf8_lossy(&self.body_bytes).trim().to_string();
        if !text.is_empty() {
            return text;
        }

        self.status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    }

    pub(crate) fn into_status_error(self) -> GatewayError {
        GatewayError::Status {
            status: self.status,
            message: self.error_message(),
        }
    }
}
