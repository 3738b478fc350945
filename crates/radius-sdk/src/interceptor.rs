//! HTTP middleware that logs and optionally rewrites JSON-RPC traffic.
//!
//! Installed into the client's `reqwest_middleware` stack when a [`Logger`]
//! or an [`Interceptor`] is configured in [`ClientOptions`](crate::ClientOptions).

use async_trait::async_trait;
use bytes::Bytes;
use http::Extensions;
use reqwest::header::HeaderMap;
use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{Middleware, Next};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::SdkError;

/// Callback receiving a log message and structured data
pub type Logger = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Callback receiving the request body and the buffered response; returns
/// the response the client should see
pub type Interceptor =
    Arc<dyn Fn(&str, InterceptedResponse) -> Result<InterceptedResponse, SdkError> + Send + Sync>;

/// Fully buffered HTTP response handed to an [`Interceptor`]
#[derive(Debug, Clone)]
pub struct InterceptedResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl InterceptedResponse {
    /// Response with a JSON body and status 200
    pub fn json(body: &Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        Self {
            status: StatusCode::OK,
            headers,
            body: Bytes::from(body.to_string()),
        }
    }

    /// Body as lossy UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    async fn read(response: Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    fn into_response(self) -> Response {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        Response::from(response)
    }
}

/// Middleware invoking the configured logger and interceptor
#[derive(Clone, Default)]
pub struct InterceptingMiddleware {
    logger: Option<Logger>,
    interceptor: Option<Interceptor>,
}

impl InterceptingMiddleware {
    /// Create the middleware; either callback may be absent
    pub fn new(logger: Option<Logger>, interceptor: Option<Interceptor>) -> Self {
        Self {
            logger,
            interceptor,
        }
    }

    fn log(&self, message: String, data: Value) {
        tracing::trace!(%message, "http");
        if let Some(logger) = &self.logger {
            logger(&message, &data);
        }
    }
}

#[async_trait]
impl Middleware for InterceptingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let url = req.url().to_string();
        let request_body = req
            .body()
            .and_then(|body| body.as_bytes())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();

        self.log(
            format!("Request to {}: {}", url, request_body),
            json!({ "url": url, "body": request_body }),
        );

        let response = match next.run(req, extensions).await {
            Ok(response) => response,
            Err(e) => {
                self.log(
                    format!("Request to {} failed: {}", url, e),
                    json!({ "url": url, "error": e.to_string() }),
                );
                return Err(e);
            }
        };

        let buffered = InterceptedResponse::read(response)
            .await
            .map_err(reqwest_middleware::Error::Reqwest)?;
        let response_body = buffered.text();
        self.log(
            format!("Response from {}: {}", url, response_body),
            json!({ "url": url, "status": buffered.status.as_u16(), "body": response_body }),
        );

        let buffered = match &self.interceptor {
            Some(interceptor) => interceptor(&request_body, buffered)
                .map_err(|e| reqwest_middleware::Error::Middleware(anyhow::Error::new(e)))?,
            None => buffered,
        };

        Ok(buffered.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response_has_content_type() {
        let resp = InterceptedResponse::json(&json!({"result": "0x1"}));
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(
            resp.headers.get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(resp.text(), r#"{"result":"0x1"}"#);
    }

    #[tokio::test]
    async fn test_into_response_round_trip() {
        let resp = InterceptedResponse::json(&json!({"ok": true})).into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), r#"{"ok":true}"#);
    }
}
