//! Client configuration

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::fmt;
use std::time::Duration;

use crate::interceptor::{InterceptingMiddleware, Interceptor, Logger};

/// Default upper bound on waiting for a receipt
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between receipt polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Options applied when constructing a [`Client`](crate::Client)
#[derive(Clone)]
pub struct ClientOptions {
    /// Base HTTP client; a default `reqwest::Client` is used when absent
    pub http_client: Option<reqwest::Client>,
    /// Receives "Request to ..." / "Response from ..." messages
    pub logger: Option<Logger>,
    /// May replace each HTTP response before the client parses it
    pub interceptor: Option<Interceptor>,
    /// Upper bound on waiting for a receipt after broadcast
    pub receipt_timeout: Duration,
    /// Delay between receipt polls
    pub poll_interval: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            http_client: None,
            logger: None,
            interceptor: None,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ClientOptions {
    /// Use a caller-supplied HTTP client
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Install a logger callback
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Install an interceptor callback
    pub fn with_interceptor(mut self, interceptor: Interceptor) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Set the receipt timeout
    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    /// Set the receipt poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Build the HTTP client, wrapping it with the interceptor middleware
    /// when a logger or interceptor is configured.
    pub fn build_http_client(&self) -> ClientWithMiddleware {
        let base = self.http_client.clone().unwrap_or_default();
        let builder = ClientBuilder::new(base);
        if self.logger.is_some() || self.interceptor.is_some() {
            builder
                .with(InterceptingMiddleware::new(
                    self.logger.clone(),
                    self.interceptor.clone(),
                ))
                .build()
        } else {
            builder.build()
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("http_client", &self.http_client.is_some())
            .field("logger", &self.logger.is_some())
            .field("interceptor", &self.interceptor.is_some())
            .field("receipt_timeout", &self.receipt_timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert!(options.http_client.is_none());
        assert_eq!(options.receipt_timeout, DEFAULT_RECEIPT_TIMEOUT);
        assert_eq!(options.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_builder_methods() {
        let options = ClientOptions::default()
            .with_logger(Arc::new(|_: &str, _: &serde_json::Value| {}))
            .with_receipt_timeout(Duration::from_secs(5))
            .with_poll_interval(Duration::from_millis(10));
        assert!(options.logger.is_some());
        assert_eq!(options.receipt_timeout, Duration::from_secs(5));
        assert!(format!("{:?}", options).contains("logger: true"));
    }
}
