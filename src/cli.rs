use std::io::Write;
use tracing::info;

use crate::env::{Env, OutputFormat};

pub async fn run(env: Env) -> anyhow::Result<()> {
    run_with_writers(env, &mut std::io::stdout()).await
}

/// Mount the view once, wait for the fetch to settle and write the rendered
/// result. Every view state, errors included, is output rather than a
/// process failure.
pub async fn run_with_writers<W: Write>(env: Env, stdout: &mut W) -> anyhow::Result<()> {
    let view = env.build_view()?;
    info!(
        "Loading order history from {}{}",
        env.base_url.origin().ascii_serialization(),
        env.orders_path
    );

    let mut mounted = view.mount();
    let state = mounted.settled().await;
    let tree = mounted.render();
    mounted.unmount().await;

    info!("Order history view settled: {} orders", state.orders().len());

    match env.format {
        OutputFormat::Text => write!(stdout, "{}", tree.to_text())?,
        OutputFormat::Html => writeln!(stdout, "{}", tree.to_html())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::tests::create_test_env;
    use httpmock::prelude::*;
    use serde_json::json;
    use url::Url;

    fn create_test_env_with_mock_server(mock_server: &MockServer) -> Env {
        let mut env = create_test_env();
        env.base_url = Url::parse(&mock_server.base_url()).unwrap();
        env
    }

    async fn run_to_string(env: Env) -> String {
        let mut stdout = Vec::new();
        run_with_writers(env, &mut stdout).await.unwrap();
        String::from_utf8(stdout).unwrap()
    }

    #[tokio::test]
    async fn test_run_prints_orders_as_text() {
        let server = MockServer::start();
        let env = create_test_env_with_mock_server(&server);

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/orders/me")
                .header("authorization", "Bearer test_token");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{
                    "orderId": "A1",
                    "createdAt": "2024-01-01T00:00:00Z",
                    "totalAmount": 250,
                    "status": "Delivered",
                    "deliveryAddress": "12 MG Road",
                    "items": [{"name": "Widget", "price": 100}]
                }]));
        });

        let output = run_to_string(env).await;

        assert_eq!(
            output,
            "Order History\n\
             Order ID: A1\n\
             Date: 1/1/2024\n\
             Total: ₹250\n\
             Status: Delivered\n\
             Delivery Address: 12 MG Road\n\
             Items:\n  \
             - Widget - ₹100\n"
        );
        mock.assert();
    }

    #[tokio::test]
    async fn test_run_prints_html() {
        let server = MockServer::start();
        let mut env = create_test_env_with_mock_server(&server);
        env.format = OutputFormat::Html;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/orders/me");
            then.status(200).json_body(json!([]));
        });

        let output = run_to_string(env).await;

        assert_eq!(
            output,
            "<div class=\"text-center py-10\"><h2 class=\"text-2xl font-bold text-gray-800\">No Order History Available</h2></div>\n"
        );
        mock.assert();
    }

    #[tokio::test]
    async fn test_run_server_error_is_rendered_not_returned() {
        let server = MockServer::start();
        let env = create_test_env_with_mock_server(&server);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/orders/me");
            then.status(503);
        });

        let output = run_to_string(env).await;

        assert_eq!(output, "Failed to fetch order history. Please try again.\n");
        mock.assert();
    }

    #[tokio::test]
    async fn test_run_without_credentials() {
        let server = MockServer::start();
        let dir = tempfile::tempdir().unwrap();
        let mut env = create_test_env_with_mock_server(&server);
        env.token = None;
        env.credentials_file = dir.path().join("credentials.json");

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/orders/me");
            then.status(200).json_body(json!([]));
        });

        let output = run_to_string(env).await;

        assert_eq!(output, "User not authenticated.\n");
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_run_invalid_configuration_is_an_error() {
        let mut env = create_test_env();
        env.timezone = "Nowhere/Special".to_string();

        let mut stdout = Vec::new();
        let result = run_with_writers(env, &mut stdout).await;

        assert!(result.is_err());
        assert!(stdout.is_empty());
    }
}
