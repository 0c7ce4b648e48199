use molerush::{MolerushError, MolerushServerBuilder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MolerushError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("MOLERUSH_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let server = MolerushServerBuilder::new().bind(&addr).build().await?;
    server.run().await
}
