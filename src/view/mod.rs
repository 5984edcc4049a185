//! Order history view: state, the fetch-on-mount effect and rendering.

use chrono_tz::Tz;
use order_service::{Order, OrderPayload, OrderService};
use std::sync::Arc;
use tracing::{error, info};

use crate::credentials::{CredentialStore, resolve_bearer_token};

pub mod format;
mod mount;
pub mod render;

pub use format::{DEFAULT_CURRENCY_SYMBOL, DEFAULT_DATE_FORMAT};
pub use mount::MountedView;
pub use render::{Element, Node, render};

pub const HEADING: &str = "Order History";
pub const LOADING_MESSAGE: &str = "Loading Order History...";
pub const EMPTY_MESSAGE: &str = "No Order History Available";
pub const UNAUTHENTICATED_MESSAGE: &str = "User not authenticated.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch order history. Please try again.";
pub const MALFORMED_MESSAGE: &str = "Order history response was malformed.";

/// What the view currently displays. Starts as `Loading` and changes once,
/// when the mount fetch completes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    Unauthenticated,
    FetchFailed,
    /// A 2xx response whose body was not a list of orders.
    MalformedPayload,
    Loaded(Vec<Order>),
}

impl ViewState {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Unauthenticated => Some(UNAUTHENTICATED_MESSAGE),
            Self::FetchFailed => Some(FETCH_FAILED_MESSAGE),
            Self::Loading | Self::MalformedPayload | Self::Loaded(_) => None,
        }
    }

    /// Records to display. Empty for every state but `Loaded`.
    pub fn orders(&self) -> &[Order] {
        match self {
            Self::Loaded(orders) => orders,
            _ => &[],
        }
    }
}

/// How a malformed success payload is shown.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPayloadDisplay {
    /// Same as a legitimately empty history.
    #[default]
    Empty,
    /// A distinct error message.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub timezone: Tz,
    pub date_format: String,
    pub currency_symbol: String,
    pub malformed_payload: MalformedPayloadDisplay,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            malformed_payload: MalformedPayloadDisplay::default(),
        }
    }
}

pub struct OrderHistoryView {
    credentials: Arc<dyn CredentialStore>,
    service: Arc<dyn OrderService>,
    options: RenderOptions,
}

impl OrderHistoryView {
    pub fn new(credentials: Arc<dyn CredentialStore>, service: Arc<dyn OrderService>) -> Self {
        Self {
            credentials,
            service,
            options: RenderOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The mount effect: read the token, fetch once, and settle on a final
    /// state. Never retries.
    pub async fn fetch_state(&self) -> ViewState {
        let token = match resolve_bearer_token(self.credentials.as_ref()) {
            Ok(Some(token)) => token,
            Ok(None) => {
                info!("No usable credential token, user not authenticated");
                return ViewState::Unauthenticated;
            }
            Err(e) => {
                error!("Failed to fetch order history: {e}");
                return ViewState::FetchFailed;
            }
        };

        match self.service.fetch_my_orders(&token).await {
            Ok(OrderPayload::Orders(orders)) => {
                info!("Fetched {} orders", orders.len());
                ViewState::Loaded(orders)
            }
            Ok(OrderPayload::Malformed { reason }) => {
                error!("Order history response is not an array: {reason}");
                ViewState::MalformedPayload
            }
            Err(e) => {
                error!("Failed to fetch order history: {e}");
                ViewState::FetchFailed
            }
        }
    }

    pub fn render(&self, state: &ViewState) -> Node {
        render(state, &self.options)
    }
}
