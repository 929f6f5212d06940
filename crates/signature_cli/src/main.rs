use app::{AppBuilder, Application};
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use paths::PathContext;
use settings::FileStore;
use signature::APP_VERSION;
use signature_cli::cli::Cli;
use signature_cli::clipboard::native_exporter;
use signature_cli::commands::{self, Session};
use signature_cli::config::Config;

struct SignatureApp;

impl Application for SignatureApp {
    const APP_ID: &'static str = "signature";
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let paths = PathContext::new(
        SignatureApp::STUDIO,
        SignatureApp::PROJECT_ID,
        SignatureApp::APP_ID,
    );
    let config = Config::load(&paths, cli.config.as_deref())?;
    let app = AppBuilder::<SignatureApp>::with_path_context(
        paths,
        APP_VERSION,
        config.log_filter.as_deref(),
    )
    .map_err(|e| eyre!(e))?
    .build();

    let store_dir = cli
        .store_dir
        .clone()
        .unwrap_or_else(|| config.store_dir(app.path_context()));
    let mut session = Session::open(
        FileStore::new(store_dir),
        cli.query.as_deref(),
        config.branding.clone(),
    );

    let exporter = native_exporter();
    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr().lock();
    commands::run(cli.cmd, &mut session, &exporter, &mut out, &mut err).await
}
