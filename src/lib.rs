pub mod api;
pub mod app;
pub mod config;
pub mod content;
pub mod error;
pub mod github;
pub mod store;

use std::env;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use app::App;
use config::Config;

pub async fn run() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("GITCMS_LOG"))
        .init();

    let path = config_path();
    let config = Config::load(&path).expect("failed to load config file");
    let app = App::new(config, path);

    api::run_server(app).await
}

fn config_path() -> String {
    env::var("GITCMS_CONFIG").unwrap_or_else(|_| "gitcms.toml".to_string())
}
