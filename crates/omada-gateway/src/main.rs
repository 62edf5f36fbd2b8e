mod cli;
mod startup;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use omada_config::Config;
use omada_core::SsidUpdatePipeline;
use omada_gateway::{AppState, serve, shutdown_signal};

use crate::cli::{Cli, Command, ConfigCommand, GlobalOpts, LogFormat, ServeArgs};
use crate::startup::StartupError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.log_format);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, format: LogFormat) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .init(),
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let config = load(&cli.global)?;

    match cli.command {
        Some(Command::Config { command }) => {
            match command {
                ConfigCommand::Show => print!("{}", config.to_toml_redacted()?),
                ConfigCommand::Path => println!("{}", omada_config::config_path().display()),
            }
            Ok(())
        }
        Some(Command::Serve(args)) => serve_with(config, &args).await,
        None => serve_with(config, &ServeArgs::default()).await,
    }
}

fn load(global: &GlobalOpts) -> Result<Config, StartupError> {
    let mut config = omada_config::load_config(global.config.as_deref())?;
    global.apply(&mut config);
    Ok(config)
}

async fn serve_with(mut config: Config, args: &ServeArgs) -> Result<(), StartupError> {
    if let Some(listen) = &args.listen {
        config.listen.clone_from(listen);
    }
    let addr = config.listen_addr()?;
    let controller = config.controller_config()?;

    let client = controller
        .build_client()
        .map_err(|source| StartupError::Client { source })?;
    let pipeline = SsidUpdatePipeline::new(client).with_budget(controller.pipeline_timeout);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!(controller = %controller.url, "omada gateway starting");
    serve(listener, AppState::new(pipeline), shutdown_signal()).await?;
    Ok(())
}
