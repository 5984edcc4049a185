use clap::Parser;
use order_history::{Env, cli, setup_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    let env = Env::parse();
    setup_tracing(&env.log_level);

    cli::run(env).await
}
