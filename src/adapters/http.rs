//! HTTP client adapter for the telemetry heartbeat.
//!
//! Implements [`HttpTransport`]: one POST per call, no retries, no
//! keep-alive. A fresh connection per request keeps the adapter stateless
//! across Wi-Fi drops.
//!
//! - **`target_os = "espidf"`**: `embedded_svc` client over `EspHttpConnection`,
//!   with the ESP-IDF certificate bundle attached for `https://` URLs.
//! - **all other targets**: a scripted responder that records every request.

use crate::app::ports::{HttpResponse, HttpTransport, TransportError};

#[cfg(target_os = "espidf")]
use core::time::Duration;
#[cfg(target_os = "espidf")]
use embedded_svc::{
    http::{client::Client as HttpClient, Method, Status},
    io::{Read, Write},
};
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration as HttpClientConfiguration, EspHttpConnection};

/// Response bodies beyond this are truncated; only the first 4 bytes matter.
pub const MAX_RESPONSE_BODY: usize = 256;

fn check_url(url: &str) -> Result<(), TransportError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(TransportError::InvalidUrl)
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF client
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct HttpClientAdapter {
    timeout: Duration,
}

#[cfg(target_os = "espidf")]
impl HttpClientAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[cfg(target_os = "espidf")]
impl HttpTransport for HttpClientAdapter {
    fn post(
        &mut self,
        url: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        check_url(url)?;

        let http_conf = HttpClientConfiguration {
            timeout: Some(self.timeout),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let conn = EspHttpConnection::new(&http_conf).map_err(|e| {
            log::debug!("http: connection setup failed: {:?}", e);
            TransportError::Connect
        })?;
        let mut client = HttpClient::wrap(conn);

        let content_length = body.len().to_string();
        let headers = [
            ("Content-Type", content_type),
            ("Content-Length", content_length.as_str()),
        ];
        let mut request = client
            .request(Method::Post, url, &headers)
            .map_err(|_| TransportError::Connect)?;
        request.write_all(body).map_err(|_| TransportError::Send)?;
        request.flush().map_err(|_| TransportError::Send)?;
        let mut response = request.submit().map_err(|_| TransportError::Send)?;

        let status = response.status();
        let mut buf = [0u8; MAX_RESPONSE_BODY];
        let mut len = 0;
        while len < buf.len() {
            let n = response.read(&mut buf[len..]).map_err(|_| TransportError::Receive)?;
            if n == 0 {
                break;
            }
            len += n;
        }

        Ok(HttpResponse {
            status,
            body: buf[..len].to_vec(),
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation
// ───────────────────────────────────────────────────────────────

/// One request as seen by the simulated server.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Replies from a script, then falls back to `200` with an empty body.
#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct HttpClientAdapter {
    script: std::collections::VecDeque<Result<HttpResponse, TransportError>>,
    requests: Vec<RecordedRequest>,
}

#[cfg(not(target_os = "espidf"))]
impl HttpClientAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&mut self, reply: Result<HttpResponse, TransportError>) {
        self.script.push_back(reply);
    }

    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }
}

#[cfg(not(target_os = "espidf"))]
impl HttpTransport for HttpClientAdapter {
    fn post(
        &mut self,
        url: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        check_url(url)?;
        self.requests.push(RecordedRequest {
            url: url.to_owned(),
            content_type: content_type.to_owned(),
            body: body.to_vec(),
        });
        let mut reply = self.script.pop_front().unwrap_or(Ok(HttpResponse {
            status: 200,
            body: Vec::new(),
        }));
        if let Ok(response) = &mut reply {
            response.body.truncate(MAX_RESPONSE_BODY);
        }
        reply
    }
}
