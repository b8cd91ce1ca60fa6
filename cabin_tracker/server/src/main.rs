#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = cabin_tracker_server::config::Config::from_env()?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .init();
    cabin_tracker_server::web::start_web_server(config).await
}
