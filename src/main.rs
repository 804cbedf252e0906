use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use resto_rank::config::Settings;
use resto_rank::core::Recommender;
use resto_rank::routes::{self, AppState};
use resto_rank::services::{PlacesClient, ZoneCache, ZoneHarvester};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Resto Rank recommendation service...");
    info!("Configuration loaded successfully ({} zones)", settings.search.zones.len());

    if settings.places.api_key.is_empty() {
        warn!("No places API key configured, every zone query will be rejected");
    }

    // Initialize places client
    let timeout = Duration::from_secs(settings.places.timeout_secs.unwrap_or(10));
    let client = PlacesClient::new(
        settings.places.endpoint.clone(),
        settings.places.api_key.clone(),
        timeout,
        settings.places.search_options(),
    )
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    info!("Places client initialized (timeout: {:?})", timeout);

    // Initialize zone cache (optional - every request hits the API without it)
    let cache = if settings.cache.enabled {
        let ttl = settings.cache.ttl_secs.unwrap_or(300);
        let capacity = settings.cache.capacity.unwrap_or(256);
        info!("Zone cache enabled ({} entries, TTL: {}s)", capacity, ttl);
        Some(ZoneCache::new(capacity, ttl))
    } else {
        None
    };

    let concurrency = settings.places.max_concurrency.unwrap_or(4);
    let harvester = Arc::new(ZoneHarvester::new(client, cache, concurrency));

    let recommender = Recommender::new(
        settings.scoring.bounds(),
        settings.outranking.params(),
        settings.scoring.top_n,
    );

    info!("Recommender initialized with {:?}", settings.outranking.params());

    // Build application state
    let app_state = AppState {
        harvester,
        recommender,
        zones: Arc::new(settings.search.zones.clone()),
        default_location: settings.search.user_location(),
        report_path: settings.report.output_path.as_ref().map(PathBuf::from),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
