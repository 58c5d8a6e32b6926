mod catalog;
mod config;
mod error;
mod logging;
mod ports;
mod services;
mod spotify_rs;
#[cfg(test)]
mod test_utils;
mod tidal_rs;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config,
    error::{CatalogError, Service},
    logging::init_tracing,
    services::{
        migration::{CopiedPlaylist, MigrationOptions, MigrationReport, MigrationService},
        spotify::client::{SPOTIFY_SCOPES, SpotifyHttpAdapter},
        tidal::client::TidalHttpAdapter,
    },
};

/// Exit code when either service rejects the configured credentials.
const EXIT_AUTHENTICATION: u8 = 3;
/// Exit code when a catalog request fails after sign-in.
const EXIT_CATALOG: u8 = 4;

#[derive(Parser, Debug)]
#[command(author, version, about = "Copy TIDAL playlists to Spotify", long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_MIGRATOR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `playlist_migrator=debug`
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// Export spans to this OTLP/gRPC endpoint
    #[arg(long, global = true, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy every owned TIDAL playlist that is not on Spotify yet
    Migrate {
        /// Also copy playlists whose name already exists on Spotify
        #[arg(long)]
        include_migrated: bool,
    },
    /// List the playlists `migrate` would copy, without changing anything
    Plan {
        /// Also list playlists whose name already exists on Spotify
        #[arg(long)]
        include_migrated: bool,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracer_provider = init_tracing(&args.log_level, args.otlp_endpoint.as_deref())?;

    let result = run(args).await;

    if let Some(tracer_provider) = tracer_provider {
        if let Err(error) = tracer_provider.shutdown() {
            eprintln!("Failed to flush traces: {}", error);
        }
    }

    result
}

async fn run(args: Args) -> Result<ExitCode> {
    let (include_migrated, dry_run) = match args.command {
        Commands::Config(config_commands) => {
            match config_commands {
                ConfigCommands::CreateDefault => {
                    tracing::debug!("Creating default config");
                    let path = Config::create_default()?;
                    println!("Wrote {}", path.display());
                }
                ConfigCommands::Path => match Config::config_path() {
                    Some(path) => println!("{}", path.display()),
                    None => println!("No default config path found"),
                },
            }
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Migrate { include_migrated } => (include_migrated, false),
        Commands::Plan { include_migrated } => (include_migrated, true),
    };

    tracing::debug!("Loading configuration");
    let config = {
        if let Some(config) = args.config {
            Config::from_file(&config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load playlist-migrator config")?;

    let options = MigrationOptions {
        exclusions: config.exclusion_set(),
        include_migrated,
    };
    if options.exclusions.is_empty() {
        tracing::debug!("Loaded configuration, no playlists excluded");
    } else {
        tracing::debug!(excluded = options.exclusions.len(), "Loaded configuration");
    }

    match migrate(&config, &options, dry_run).await {
        Ok(()) => {
            println!("Finished execution.");
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::error!(%error, "Migration aborted");
            eprintln!("{}", error);
            if let CatalogError::Authentication {
                service: Service::Spotify,
                ..
            } = error
            {
                eprintln!(
                    "The Spotify refresh token needs these scopes: {}",
                    SPOTIFY_SCOPES.join(" ")
                );
            }
            Ok(ExitCode::from(exit_code_for(&error)))
        }
    }
}

async fn migrate(
    config: &Config,
    options: &MigrationOptions,
    dry_run: bool,
) -> Result<(), CatalogError> {
    let http = reqwest::Client::new();
    let destination = SpotifyHttpAdapter::connect(http.clone(), &config.spotify).await?;
    let source = TidalHttpAdapter::connect(http, &config.tidal).await?;

    let service = MigrationService::new(source, destination);
    let sessions = service.sign_in().await?;

    if dry_run {
        let planned = service.plan(&sessions, options).await?;
        for playlist in &planned {
            println!("{}", playlist.name);
        }
        println!("{} playlist(s) to migrate", planned.len());
    } else {
        let report = service.run(&sessions, options).await?;
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &MigrationReport) {
    for playlist in &report.playlists {
        println!("{}", playlist_summary(playlist));
        for track in &playlist.unmatched {
            println!("  - {} - {}", track.artist, track.title);
        }
    }
    println!(
        "{} playlist(s), {} track(s) added, {} not found",
        report.playlists.len(),
        report.attached_tracks(),
        report.unmatched_tracks()
    );
}

fn playlist_summary(playlist: &CopiedPlaylist) -> String {
    format!(
        "Copied \"{}\" ({} -> {}): {} track(s) added, {} not found",
        playlist.name,
        playlist.source_id,
        playlist.destination_id,
        playlist.attached,
        playlist.unmatched.len()
    )
}

fn exit_code_for(error: &CatalogError) -> u8 {
    if error.is_authentication() {
        EXIT_AUTHENTICATION
    } else {
        EXIT_CATALOG
    }
}
