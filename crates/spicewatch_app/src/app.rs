use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use spicewatch_core::StatusViewModel;
use spicewatch_engine::{
    MetadataResolver, ProviderChain, ReqwestStatusClient, StatusClient, StatusViewHandle,
};
use spicewatch_logging::{watch_error, watch_info, watch_warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{parse_command, Command, HELP};
use crate::config::{load_config, CATALOG_TOKEN_ENV};
use crate::{logging, render};

pub fn run_app(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path).with_env_token(std::env::var(CATALOG_TOKEN_ENV).ok());
    logging::initialize(config.log_destination, config.log_level());
    watch_info!(
        "Starting spicewatch against {} (config {:?})",
        config.service_url,
        config_path
    );

    let settings = config.engine_settings();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let outcome = runtime.block_on(async move {
        let client: Arc<dyn StatusClient> = Arc::new(
            ReqwestStatusClient::new(&settings.service_url, &settings.http)
                .context("invalid download service settings")?,
        );
        let resolver: Arc<dyn MetadataResolver> = Arc::new(
            ProviderChain::from_settings(&settings).context("failed to build metadata client")?,
        );

        let handle =
            StatusViewHandle::mount(settings.view_settings(config.filter), client, resolver);
        let result = drive(&handle).await;
        handle.unmount().await;
        watch_info!("Status view closed");
        result
    });
    if let Err(err) = &outcome {
        watch_error!("spicewatch stopped: {:#}", err);
    }
    outcome
}

async fn drive(handle: &StatusViewHandle) -> anyhow::Result<()> {
    let mut view_rx = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let initial = view_rx.borrow_and_update().clone();
    print_view(&initial)?;
    println!("{HELP}");

    loop {
        tokio::select! {
            changed = view_rx.changed() => {
                if changed.is_err() {
                    watch_warn!("Status view stopped publishing");
                    return Ok(());
                }
                let view = view_rx.borrow_and_update().clone();
                print_view(&view)?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => return Ok(()),
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Retry) => handle.retry(),
                    Ok(Command::Filter(filter)) => handle.set_filter(filter),
                    Ok(Command::Cancel(job_id)) => handle.cancel_job(job_id),
                    Ok(Command::Refresh(url)) => handle.invalidate(url),
                    Err(err) => println!("{err}. {HELP}"),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    watch_warn!("Failed to listen for ctrl-c: {}", err);
                }
                return Ok(());
            }
        }
    }
}

fn print_view(view: &StatusViewModel) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout)?;
    for line in render::render(view) {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()?;
    Ok(())
}
