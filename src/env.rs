use chrono_tz::Tz;
use clap::Parser;
use order_service::http::{DEFAULT_BASE_URL, DEFAULT_ORDERS_PATH};
use order_service::{HttpOrderService, OrderServiceError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;
use url::Url;

use crate::credentials::{CredentialStore, FileCredentialStore, InMemoryCredentialStore};
use crate::view::format::is_valid_date_format;
use crate::view::{
    DEFAULT_CURRENCY_SYMBOL, DEFAULT_DATE_FORMAT, MalformedPayloadDisplay, OrderHistoryView,
    RenderOptions,
};

#[derive(clap::ValueEnum, Debug, Clone)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        (&log_level).into()
    }
}

impl From<&LogLevel> for Level {
    fn from(log_level: &LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Html,
}

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Invalid timezone {name}: {reason}")]
    InvalidTimezone { name: String, reason: String },
    #[error("Invalid date format: {format}")]
    InvalidDateFormat { format: String },
    #[error("Failed to build order service client: {0}")]
    OrderService(#[from] OrderServiceError),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "order-history")]
#[command(about = "Fetch and display the signed-in user's order history")]
#[command(version)]
pub struct Env {
    /// Origin of the Order Service
    #[clap(long, env = "ORDER_SERVICE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,
    /// Path of the "orders for the current user" endpoint
    #[clap(long, env, default_value = DEFAULT_ORDERS_PATH)]
    pub orders_path: String,
    /// Abort the order request after this many seconds
    #[clap(long, env)]
    pub request_timeout_secs: Option<u64>,
    /// JSON file holding the stored credentials
    #[clap(long, env, default_value = "credentials.json")]
    pub credentials_file: PathBuf,
    /// Bearer token to use instead of the credentials file
    #[clap(long, env = "ORDER_HISTORY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// IANA timezone used to display order dates
    #[clap(long, env = "DISPLAY_TIMEZONE", default_value = "UTC")]
    pub timezone: String,
    /// strftime pattern for order dates
    #[clap(long, env, default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,
    #[clap(long, env, default_value = DEFAULT_CURRENCY_SYMBOL)]
    pub currency_symbol: String,
    /// How to show a success response that is not an order list
    #[clap(
        long = "malformed-payload",
        env = "MALFORMED_PAYLOAD_DISPLAY",
        value_enum,
        default_value = "empty"
    )]
    pub malformed_payload: MalformedPayloadDisplay,
    #[clap(long, env = "OUTPUT_FORMAT", value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(long, env, default_value = "info")]
    pub log_level: LogLevel,
}

impl Env {
    pub fn render_options(&self) -> Result<RenderOptions, EnvError> {
        let timezone = self
            .timezone
            .parse::<Tz>()
            .map_err(|e| EnvError::InvalidTimezone {
                name: self.timezone.clone(),
                reason: e.to_string(),
            })?;

        if !is_valid_date_format(&self.date_format) {
            return Err(EnvError::InvalidDateFormat {
                format: self.date_format.clone(),
            });
        }

        Ok(RenderOptions {
            timezone,
            date_format: self.date_format.clone(),
            currency_symbol: self.currency_symbol.clone(),
            malformed_payload: self.malformed_payload,
        })
    }

    pub fn order_service(&self) -> Result<HttpOrderService, OrderServiceError> {
        let service =
            HttpOrderService::new(self.base_url.clone()).with_orders_path(&self.orders_path);

        match self.request_timeout_secs {
            Some(secs) => service.with_timeout(Duration::from_secs(secs)),
            None => Ok(service),
        }
    }

    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        match &self.token {
            Some(token) => Arc::new(InMemoryCredentialStore::with_token(token)),
            None => Arc::new(FileCredentialStore::new(&self.credentials_file)),
        }
    }

    pub fn build_view(&self) -> Result<OrderHistoryView, EnvError> {
        let options = self.render_options()?;
        let service = self.order_service()?;

        Ok(OrderHistoryView::new(self.credential_store(), Arc::new(service)).with_options(options))
    }
}

/// Console logging on stderr; stdout is reserved for the rendered view.
pub fn setup_tracing(log_level: &LogLevel) {
    let level: Level = log_level.into();
    let default_filter = format!("order_history={level},order_service={level}");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
