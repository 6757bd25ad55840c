use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use qrstudio::cli::{run, Cli, Commands, LogoCommands};
use qrstudio::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(cli.config.clone())?;

    match cli.command {
        Commands::Compose { data_type, field } => run::compose(&config, &data_type, &field),
        Commands::Preview {
            data_type,
            field,
            out,
        } => run::preview(&config, &data_type, &field, out).await,
        Commands::Watch {
            data_type,
            field,
            out,
        } => run::watch(&config, &data_type, &field, out).await,
        Commands::Upload { kind, path } => run::upload(&config, kind, path).await,
        Commands::Logo { command } => match command {
            LogoCommands::Upload { path, qr_size } => {
                run::logo_upload(&config, path, qr_size).await
            }
            LogoCommands::Delete { name } => run::logo_delete(&config, &name).await,
        },
    }
}
