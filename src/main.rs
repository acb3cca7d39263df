use anyhow::Result;
use clap::Parser;
use tracing::{Instrument, info, info_span};

use nyooom::config::{Cli, Command, get_config, init_config};
use nyooom::errors::NyooomError;
use nyooom::runtime::modes;
use nyooom::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());
    let config = get_config();

    let result = match cli.command() {
        Command::ConfigGen { path } => modes::run_config_gen(&path),
        Command::ResetPassword { stdin } => {
            let _guard = init_logging(&config.logging)?;
            modes::run_reset_password(&config, stdin).await
        }
        Command::Serve => {
            // WorkerGuard 必须存活到进程退出
            let _guard = init_logging(&config.logging)?;
            let span = info_span!("nyooom", role = %config.logging.role);
            info!(parent: &span, "Starting nyooom v{}", env!("CARGO_PKG_VERSION"));
            modes::run_server(config).instrument(span).await
        }
    };

    if let Err(e) = &result
        && let Some(err) = e.downcast_ref::<NyooomError>()
    {
        eprintln!("{}", err.format_colored());
    }
    result
}
