// Integration tests for Resto Rank

use resto_rank::core::{RecommendError, RecommendationQuery, Recommender};
use resto_rank::core::preferences::{Importance, PreferenceProfile};
use resto_rank::models::{Criterion, GeoPoint, LatLng, LocalizedText, PlaceRecord, RankingMethod};
use resto_rank::services::report_to_csv;

const USER: GeoPoint = GeoPoint {
    latitude: 48.8566,
    longitude: 2.3522,
};

fn create_record(
    name: &str,
    address: &str,
    rating: f64,
    price_level: &str,
    lat: f64,
    lon: f64,
) -> PlaceRecord {
    PlaceRecord {
        display_name: Some(LocalizedText {
            text: Some(name.to_string()),
            language_code: Some("fr".to_string()),
        }),
        formatted_address: Some(address.to_string()),
        rating: Some(rating),
        price_level: Some(price_level.to_string()),
        location: Some(LatLng {
            latitude: Some(lat),
            longitude: Some(lon),
        }),
        ..PlaceRecord::default()
    }
}

fn create_records() -> Vec<PlaceRecord> {
    vec![
        create_record("Le Petit Zinc", "1 Rue A, Paris", 4.6, "PRICE_LEVEL_MODERATE", 48.8570, 2.3530),
        create_record("Bistrot Voltaire", "2 Rue B, Paris", 4.1, "PRICE_LEVEL_EXPENSIVE", 48.8580, 2.3800),
        create_record("Chez Nous", "3 Rue C, Paris", 3.8, "PRICE_LEVEL_INEXPENSIVE", 48.8400, 2.3200),
        // Same place returned by two overlapping zones
        create_record("Le Petit Zinc", "1 Rue A, Paris", 4.6, "PRICE_LEVEL_MODERATE", 48.8570, 2.3530),
        PlaceRecord {
            display_name: Some(LocalizedText {
                text: Some("Nowhere".to_string()),
                language_code: None,
            }),
            ..PlaceRecord::default()
        },
    ]
}

fn query(method: RankingMethod) -> RecommendationQuery {
    RecommendationQuery {
        profile: PreferenceProfile::uniform(Importance::try_from(3).unwrap()),
        method,
        user: USER,
        limit: None,
        credibility_threshold: None,
    }
}

#[test]
fn test_integration_weighted_sum_end_to_end() {
    let recommender = Recommender::with_defaults();
    let recommendation = recommender
        .recommend(create_records(), &query(RankingMethod::WeightedSum))
        .unwrap();

    assert_eq!(recommendation.dropped_records, 1);
    assert_eq!(recommendation.duplicates_removed, 1);
    assert!(recommendation.credibility.is_none());

    let report = &recommendation.report;
    assert_eq!(report.total_candidates, 3);
    assert_eq!(report.rows.len(), 3);

    // Sorted by score, every row scored and located
    let scores: Vec<f64> = report.rows.iter().map(|row| row.score.unwrap()).collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    assert!(report.rows.iter().all(|row| row.distance_km.is_some()));
}

#[test]
fn test_integration_weighted_sum_limit() {
    let recommender = Recommender::with_defaults();
    let mut query = query(RankingMethod::WeightedSum);
    query.limit = Some(2);

    let recommendation = recommender.recommend(create_records(), &query).unwrap();
    assert_eq!(recommendation.report.rows.len(), 2);
    assert_eq!(recommendation.report.total_candidates, 3);
}

#[test]
fn test_integration_outranking_end_to_end() {
    let recommender = Recommender::with_defaults();
    let recommendation = recommender
        .recommend(create_records(), &query(RankingMethod::Outranking))
        .unwrap();

    let credibility = recommendation.credibility.expect("outranking returns its matrix");
    assert_eq!(credibility.size(), 3);

    let report = &recommendation.report;
    assert_eq!(report.method, RankingMethod::Outranking);
    // Core rows are never scored
    assert!(report.rows.iter().all(|row| row.score.is_none()));

    // Core members are not outranked by anyone at the cut level
    let names = ["Le Petit Zinc", "Bistrot Voltaire", "Chez Nous"];
    for row in &report.rows {
        let i = names.iter().position(|name| *name == row.name).unwrap();
        for j in (0..3).filter(|&j| j != i) {
            assert!(credibility.get(j, i) < 0.90);
        }
    }
}

#[test]
fn test_integration_rating_only_profile_prefers_best_rating() {
    let mut values = [1u8; Criterion::COUNT];
    values[Criterion::Rating.index()] = 5;
    let profile = PreferenceProfile::new(Criterion::ALL.into_iter().zip(values)).unwrap();

    let recommender = Recommender::with_defaults();
    let query = RecommendationQuery {
        profile,
        method: RankingMethod::WeightedSum,
        user: USER,
        limit: Some(1),
        credibility_threshold: None,
    };

    let recommendation = recommender.recommend(create_records(), &query).unwrap();
    assert_eq!(recommendation.report.rows[0].name, "Le Petit Zinc");
}

#[test]
fn test_integration_no_records_is_no_candidates() {
    let recommender = Recommender::with_defaults();
    let err = recommender
        .recommend(Vec::new(), &query(RankingMethod::Outranking))
        .unwrap_err();
    assert_eq!(err, RecommendError::NoCandidates { dropped: 0 });
}

#[test]
fn test_integration_only_malformed_records() {
    let recommender = Recommender::with_defaults();
    let records = vec![PlaceRecord::default(), PlaceRecord::default()];
    let err = recommender
        .recommend(records, &query(RankingMethod::WeightedSum))
        .unwrap_err();
    assert_eq!(err, RecommendError::NoCandidates { dropped: 2 });
}

#[tokio::test]
async fn test_integration_report_exports_as_csv() {
    let recommender = Recommender::with_defaults();
    let recommendation = recommender
        .recommend(create_records(), &query(RankingMethod::WeightedSum))
        .unwrap();

    let csv = report_to_csv(&recommendation.report).await.unwrap();
    let text = String::from_utf8(csv).unwrap();
    let mut lines = text.lines();

    let header = lines.next().unwrap();
    assert!(header.starts_with("name,address,rating,priceTier"));
    assert_eq!(lines.count(), 3);
}
