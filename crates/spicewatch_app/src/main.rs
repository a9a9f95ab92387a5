mod app;
mod commands;
mod config;
mod logging;
mod render;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from(config::DEFAULT_CONFIG_FILE));
    app::run_app(&config_path)
}
