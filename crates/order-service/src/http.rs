use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::{BearerToken, OrderPayload, OrderService, OrderServiceError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_ORDERS_PATH: &str = "/api/orders/me";

/// Order Service client over REST. Every request carries the caller's token
/// as a bearer credential.
#[derive(Debug, Clone)]
pub struct HttpOrderService {
    inner: reqwest::Client,
    base_url: Url,
    orders_path: String,
}

impl HttpOrderService {
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url,
            orders_path: DEFAULT_ORDERS_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_orders_path(mut self, orders_path: impl Into<String>) -> Self {
        self.orders_path = orders_path.into();
        self
    }

    /// Rebuild the underlying client so that whole requests give up after `timeout`.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, OrderServiceError> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { inner, ..self })
    }

    /// `orders_path` appended to the base URL's own path, so a base behind a
    /// prefix such as `https://host/v1` keeps it. A `?query` on the orders
    /// path becomes the request query.
    pub fn orders_url(&self) -> Url {
        let (path, query) = match self.orders_path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (self.orders_path.as_str(), None),
        };

        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(query);
        url
    }
}

#[async_trait]
impl OrderService for HttpOrderService {
    async fn fetch_my_orders(&self, token: &BearerToken) -> Result<OrderPayload, OrderServiceError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))?;
        authorization.set_sensitive(true);

        let headers = [
            (header::AUTHORIZATION, authorization),
            (header::ACCEPT, HeaderValue::from_static("application/json")),
        ]
        .into_iter()
        .collect::<HeaderMap>();

        let url = self.orders_url();
        debug!("Fetching order history from {url}");

        let response = self.inner.get(url).headers(headers).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OrderServiceError::RequestFailed {
                action: "fetch order history".to_string(),
                status,
                body,
            });
        }

        let body = response.text().await?;
        debug!("Order history response received ({} bytes)", body.len());

        Ok(OrderPayload::from_body(&body))
    }
}
