use async_trait::async_trait;
use std::fmt::{Debug, Display};

pub mod error;
pub mod http;
pub mod order;

pub use error::OrderServiceError;
pub use http::HttpOrderService;
pub use order::{LineItem, Order, OrderPayload};
pub use test::TestOrderService;

/// Opaque credential presented as `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken(<redacted>)")
    }
}

impl Display for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<redacted>")
    }
}

#[async_trait]
pub trait OrderService: Send + Sync + 'static {
    /// Fetch the order history of the user identified by `token`.
    ///
    /// A 2xx response always yields an [`OrderPayload`], even when the body is
    /// not an order list. Transport failures and non-2xx statuses are errors.
    async fn fetch_my_orders(&self, token: &BearerToken) -> Result<OrderPayload, OrderServiceError>;
}
