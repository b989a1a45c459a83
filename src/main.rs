use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use echopulse::config::Config;
use echopulse::{build_router, DatabaseState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, short, default_value_t = 3)]
    verbosity: usize,
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
    #[arg(long, short, env = "ECHOPULSE_CONFIG")]
    config: String,
}

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Periodically drops expired sessions nobody came back for.
async fn sweep_expired_sessions(connection: DatabaseConnection) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_PERIOD);
    loop {
        interval.tick().await;
        match queries::delete_expired_sessions(&connection, Utc::now()).await {
            Ok(0) => {}
            Ok(swept) => info!("Removed {} expired sessions", swept),
            Err(err) => error!("Error removing expired sessions: {}", err),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    stderrlog::new()
        .verbosity(args.verbosity)
        .quiet(args.quiet)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()?;

    info!("Configuration path: {}", args.config);
    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return Err(err.into());
        }
    };

    let mut options = ConnectOptions::new(config.database.to_owned());
    options.max_connections(5).sqlx_logging(false);
    let connection = match Database::connect(options).await {
        Ok(connection) => connection,
        Err(err) => {
            error!("Error connecting to database: {}", err);
            return Err(err.into());
        }
    };

    info!("Running migrations");
    Migrator::up(&connection, None).await?;

    tokio::spawn(sweep_expired_sessions(connection.clone()));

    let state = DatabaseState::new(connection, config.session_age_seconds);
    let app = build_router(state, &config.static_dir);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on {}", address);
    info!("Welcome to EchoPulse!");
    axum::serve(listener, app).await?;
    Ok(())
}
