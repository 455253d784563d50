use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hackathon_portal::infrastructure::AppState;
use hackathon_portal::services::{admin_user_service, database_service};
use hackathon_portal::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hackathon_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // The remote store is optional; registrant writes fall back to the local file
    let db = match &config.database_url {
        Some(url) => match db::init_db(url).await {
            Ok(db) => Some(db),
            Err(e) => {
                tracing::error!("Database unavailable, continuing without it: {}", e);
                None
            }
        },
        None => {
            tracing::warn!("DATABASE_URL is not set; admin routes will answer 503");
            None
        }
    };

    if let Some(db) = &db {
        if std::env::var("SEED_DEMO").is_ok() {
            tracing::info!("Seeding demo data...");
            if let Err(e) = seed::seed_demo_data(db).await {
                tracing::error!("Failed to seed data: {}", e);
            }
        }

        if let Err(e) = admin_user_service::ensure_bootstrap_admin(db, &config).await {
            tracing::error!("Failed to create bootstrap admin: {}", e);
        }

        database_service::log_database_metrics(db).await;
    }

    let port = config.port;
    let state = match AppState::new(config, db) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::serve(state, port).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
