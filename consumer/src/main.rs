use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use animals_consumer::{TerminalView, UreqTransport};
use animals_core::{AnimalsClient, FakeRepository, Presenter, Repository, Service, View, ViewState};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Fetch animals from the provider and print them.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Provider base URL.
    #[arg(long, env = "PROVIDER_BASE_URL", default_value = "http://localhost:9292")]
    base_url: String,

    /// Use the in-memory fake instead of the provider.
    #[arg(long)]
    fake: bool,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let repository: Arc<dyn Repository> = if args.fake {
        tracing::info!("using fake repository");
        Arc::new(FakeRepository::new())
    } else {
        tracing::info!(base_url = %args.base_url, "using provider");
        Arc::new(Service::new(
            AnimalsClient::new(&args.base_url),
            UreqTransport::new(Duration::from_secs(args.timeout_secs)),
        ))
    };

    let view = Arc::new(TerminalView::new(std::io::stdout()));
    let mut presenter = Presenter::new(repository, Arc::downgrade(&view) as std::sync::Weak<dyn View>);
    presenter.on_start();
    presenter.wait();
    presenter.on_stop();

    match view.last_state() {
        Some(ViewState::Loaded(_)) | Some(ViewState::Empty(_)) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
