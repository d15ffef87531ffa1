use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use maintenance_be::config::{AppConfig, StorageBackend};
use maintenance_be::docs::ApiDoc;
use maintenance_be::handlers;
use maintenance_be::repository::{InMemoryRepository, PgRepository, Repository};
use maintenance_be::{seed, Database};

async fn connect(config: &AppConfig) -> anyhow::Result<Arc<dyn Repository>> {
    match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for postgres storage"))?;

            let db = Database::connect(database_url, config.database_max_connections).await?;
            db.ping().await?;
            db.verify_schema().await?;
            match db.stats().await {
                Ok(stats) => stats.log_stats(),
                Err(e) => log::warn!("⚠️  Could not read database statistics: {:#}", e),
            }

            Ok(Arc::new(PgRepository::new(db)))
        }
        StorageBackend::Memory => {
            log::warn!("⚠️  Using in-memory storage; data is lost on restart");
            Ok(Arc::new(InMemoryRepository::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables before the logger reads RUST_LOG
    dotenv::dotenv().ok();

    // Initialize logger
    env_logger::init();

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let repository = connect(&config).await.map_err(|e| {
        log::error!("Storage initialisation failed: {:#}", e);
        io::Error::other(e.to_string())
    })?;

    if std::env::args().any(|arg| arg == "--seed") {
        let mut rng = StdRng::from_entropy();
        seed::seed(repository.as_ref(), &mut rng)
            .await
            .map_err(|e| io::Error::other(e.to_string()))?;
    }

    if config.default_created_by.is_some() && !config.is_development() {
        log::warn!("⚠️  DEFAULT_CREATED_BY is set outside development; anonymous tasks get a placeholder author");
    }

    log::info!("🚀 Starting Maintenance Backend API on port {}", config.port);
    log::info!("📋 Allowed frontend URLs: {:?}", config.frontend_urls);
    log::info!("📚 API documentation at {}", config.docs_url);

    let port = config.port;
    let allowed_origins = config.frontend_urls.clone();
    let repository = web::Data::from(repository);
    let config = web::Data::new(config);
    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                "Authorization",
                "Content-Type",
                "Accept",
                "Origin",
                "X-Requested-With",
            ])
            .supports_credentials();

        // Add allowed origins
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .app_data(repository.clone())
            .app_data(config.clone())
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
            .configure(handlers::configure)
            .default_service(web::to(handlers::fallback::not_found))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
