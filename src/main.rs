use songfeed::{audio::config::FeedConfig, ui::app::App, util::log::initialize_logging};

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> color_eyre::Result<()> {
    setup()?;

    let config = FeedConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, page_size = config.page_size, "songfeed_starting");

    let mut app = App::new(config)?;
    app.run().await
}

fn setup() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    initialize_logging()
}
