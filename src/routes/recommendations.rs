use actix_web::{web, HttpResponse, Responder};
use std::path::PathBuf;
use std::sync::Arc;
use validator::Validate;

use crate::core::{Recommendation, RecommendError, RecommendationQuery, Recommender};
use crate::models::{
    ErrorResponse, GeoPoint, HealthResponse, RecommendRequest, RecommendResponse, Zone,
    ZonesResponse,
};
use crate::services::{report_to_csv, write_report_file, ZoneHarvester};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub harvester: Arc<ZoneHarvester>,
    pub recommender: Recommender,
    pub zones: Arc<Vec<Zone>>,
    pub default_location: GeoPoint,
    pub report_path: Option<PathBuf>,
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/zones", web::get().to(list_zones))
        .route("/recommendations", web::post().to(recommend))
        .route("/recommendations/export", web::post().to(export));
}

/// Health check endpoint, with zone cache statistics when caching is on
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.harvester.cache().map(|cache| cache.stats()),
    })
}

/// Configured search zones
///
/// GET /api/v1/zones
async fn list_zones(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ZonesResponse {
        zones: state.zones.as_ref().clone(),
        count: state.zones.len(),
    })
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// A finished recommendation with its collection counters
struct PipelineOutcome {
    recommendation: Recommendation,
    zones_queried: usize,
    failed_zones: usize,
    records_fetched: usize,
}

/// Validate the request, harvest every zone and run the pipeline
///
/// On failure the returned response is ready to be sent as is.
async fn run_pipeline(
    state: &AppState,
    req: &RecommendRequest,
) -> Result<PipelineOutcome, HttpResponse> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendation request: {:?}", errors);
        return Err(bad_request("validation_failed", errors.to_string()));
    }

    let profile = req
        .importance
        .to_profile()
        .map_err(|e| bad_request("invalid_preferences", e.to_string()))?;

    let user = match (req.latitude, req.longitude) {
        (Some(latitude), Some(longitude)) => GeoPoint::new(latitude, longitude),
        (None, None) => state.default_location,
        _ => {
            return Err(bad_request(
                "validation_failed",
                "latitude and longitude must be given together".to_string(),
            ))
        }
    };

    let query = RecommendationQuery {
        profile,
        method: req.method,
        user,
        limit: req.limit.map(usize::from),
        credibility_threshold: req.credibility_threshold,
    };

    tracing::info!(
        "Recommending with {} over {} zones from ({}, {})",
        query.method,
        state.zones.len(),
        user.latitude,
        user.longitude
    );

    let harvest = state.harvester.harvest(&state.zones).await;
    let records_fetched = harvest.records.len();

    match state.recommender.recommend(harvest.records, &query) {
        Ok(recommendation) => Ok(PipelineOutcome {
            recommendation,
            zones_queried: harvest.zones_queried,
            failed_zones: harvest.failed_zones,
            records_fetched,
        }),
        Err(e @ RecommendError::NoCandidates { .. }) => {
            tracing::warn!("{} ({} of {} zones failed)", e, harvest.failed_zones, harvest.zones_queried);
            Err(HttpResponse::NotFound().json(ErrorResponse {
                error: "no_candidates".to_string(),
                message: e.to_string(),
                status_code: 404,
            }))
        }
    }
}

/// Write the CSV copy when a report path is configured
async fn persist_report(state: &AppState, recommendation: &Recommendation) {
    if let Some(path) = &state.report_path {
        if let Err(e) = write_report_file(path, &recommendation.report).await {
            tracing::warn!("Failed to write report to {}: {}", path.display(), e);
        }
    }
}

/// Rank restaurants
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "importance": { "rating": 5, "price": 3, "distance": 4 },
///   "method": "outranking",
///   "credibilityThreshold": 0.9,
///   "includeMatrix": false
/// }
/// ```
async fn recommend(state: web::Data<AppState>, req: web::Json<RecommendRequest>) -> impl Responder {
    let outcome = match run_pipeline(&state, &req).await {
        Ok(outcome) => outcome,
        Err(response) => return response,
    };
    let recommendation = outcome.recommendation;

    persist_report(&state, &recommendation).await;

    let credibility = if req.include_matrix {
        recommendation.credibility.as_ref().map(|matrix| matrix.to_rows())
    } else {
        None
    };

    tracing::info!(
        "Report {} ready: {} rows out of {} candidates",
        recommendation.report.report_id,
        recommendation.report.rows.len(),
        recommendation.report.total_candidates
    );

    HttpResponse::Ok().json(RecommendResponse {
        zones_queried: outcome.zones_queried,
        failed_zones: outcome.failed_zones,
        records_fetched: outcome.records_fetched,
        dropped_records: recommendation.dropped_records,
        duplicates_removed: recommendation.duplicates_removed,
        credibility,
        report: recommendation.report,
    })
}

/// Rank restaurants and download the report as CSV
///
/// POST /api/v1/recommendations/export
async fn export(state: web::Data<AppState>, req: web::Json<RecommendRequest>) -> impl Responder {
    let recommendation = match run_pipeline(&state, &req).await {
        Ok(outcome) => outcome.recommendation,
        Err(response) => return response,
    };

    persist_report(&state, &recommendation).await;

    match report_to_csv(&recommendation.report).await {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"report-{}.csv\"", recommendation.report.report_id),
            ))
            .body(body),
        Err(e) => {
            tracing::error!("Failed to serialize report: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "export_failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
