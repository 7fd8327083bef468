//! Integration tests for the analysis pipeline using wiremock HTTP mocks.

use serde_json::json;
use siteline_analysis::{find_alternatives, run_site_analysis, GenAiClient, PipelineOptions};
use siteline_core::{Category, Coordinate, Level, Recommendation};
use siteline_maps::MapsClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn maps_client(base_url: &str) -> MapsClient {
    MapsClient::with_base_url("maps-key", 30, base_url).expect("maps client")
}

fn genai_client(base_url: &str) -> GenAiClient {
    GenAiClient::with_base_url("genai-key", "test-model", 30, base_url).expect("genai client")
}

fn nearby_place(id: &str, name: &str, reviews: i64) -> serde_json::Value {
    json!({
        "place_id": id,
        "name": name,
        "vicinity": "MG Road",
        "geometry": { "location": { "lat": 12.9712, "lng": 77.5941 } },
        "rating": 4.1,
        "user_ratings_total": reviews,
        "types": ["cafe", "food"]
    })
}

/// Mounts the geocoder: any address resolves to the reference coordinate.
async fn mount_geocode(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [ { "geometry": { "location": { "lat": 12.97, "lng": 77.59 } } } ]
        })))
        .mount(server)
        .await;
}

/// Mounts the primary nearby search (radius 1000) with three cafes whose
/// review counts are 10, 150, and 40.
async fn mount_primary_nearby(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("radius", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                nearby_place("ChIJten", "Quiet Corner", 10),
                nearby_place("ChIJbig", "Corner House", 150),
                nearby_place("ChIJmid", "Filter Stories", 40)
            ]
        })))
        .mount(server)
        .await;
}

/// Mounts the alternative probes (radius 2000) with no results.
async fn mount_empty_probes(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("radius", "2000"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(server)
        .await;
}

/// Mounts detail lookups that always miss, forcing summary-field fallback.
async fn mount_missing_details(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "NOT_FOUND" })))
        .mount(server)
        .await;
}

/// The reference scenario: three nearby cafes with review counts
/// [10, 150, 40], no alternatives, and an unreachable generation service.
/// The fallback tier must produce competition Medium and viability 76, and
/// the footfall proxy must sum to 200.
#[tokio::test]
async fn mg_road_scenario_falls_back_to_local_analysis() {
    let server = MockServer::start().await;
    mount_geocode(&server).await;
    mount_primary_nearby(&server).await;
    mount_empty_probes(&server).await;
    mount_missing_details(&server).await;
    // No generateContent mock: the generation call 404s and the pipeline
    // must recover with the local tier.

    let maps = maps_client(&server.uri());
    let genai = genai_client(&server.uri());

    let report = run_site_analysis(
        &maps,
        Some(&genai),
        "MG Road, Bangalore",
        Category::Cafe,
        PipelineOptions::default(),
    )
    .await
    .expect("pipeline must survive a dead generation service");

    assert!((report.coordinates.lat - 12.97).abs() < 1e-9);
    assert_eq!(report.metrics.footfall, 200);
    assert_eq!(report.metrics.competitor_count, 3);
    assert_eq!(report.metrics.competition_level, Level::Medium);
    // 85 - 3*5 + min(3*2, 20) = 76
    assert_eq!(report.metrics.viability_score, 76);
    assert_eq!(report.recommendation, Recommendation::HighlyRecommended);

    // Competitors ranked by review count descending, summary fields kept.
    let footfalls: Vec<i64> = report.competitors.iter().map(|c| c.footfall).collect();
    assert_eq!(footfalls, [150, 40, 10]);
    assert_eq!(report.competitors[0].place.name, "Corner House");
    assert!(report.competitors[0].website.is_none());

    assert!(report.alternatives.is_empty());
    assert!(!report.summary.is_empty());
    assert!(!report.id.is_empty());
    assert_eq!(report.location, "MG Road, Bangalore");
    assert_eq!(report.category, Category::Cafe);
}

#[tokio::test]
async fn strict_generation_json_drives_the_report_narrative() {
    let server = MockServer::start().await;
    mount_geocode(&server).await;
    mount_primary_nearby(&server).await;
    mount_empty_probes(&server).await;
    mount_missing_details(&server).await;

    let analysis = json!({
        "summary": "A promising cafe corridor with anchor offices.",
        "strengths": ["Anchor offices"],
        "weaknesses": ["High rents"],
        "opportunities": ["Evening crowd"],
        "threats": ["Chain expansion"],
        "metrics": {
            "viability_score": 81,
            "competition_level": "High",
            "market_saturation": "Low",
            "expected_revenue": 450000,
            "average_revenue": 300000,
            "total_addressable_market": 50000000
        },
        "recommendation": "Recommended",
        "key_insights": ["Review volume favors this block"],
        "action_items": ["Survey evenings"]
    });
    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "parts": [ { "text": analysis.to_string() } ] } }
            ]
        })))
        .mount(&server)
        .await;

    let maps = maps_client(&server.uri());
    let genai = genai_client(&server.uri());

    let report = run_site_analysis(
        &maps,
        Some(&genai),
        "MG Road, Bangalore",
        Category::Cafe,
        PipelineOptions::default(),
    )
    .await
    .expect("pipeline");

    assert_eq!(
        report.summary,
        "A promising cafe corridor with anchor offices."
    );
    assert_eq!(report.metrics.viability_score, 81);
    assert_eq!(report.metrics.competition_level, Level::High);
    assert_eq!(report.metrics.expected_revenue, 450_000);
    assert_eq!(report.recommendation, Recommendation::Recommended);
    // Locally derived metrics always win over anything the model claims.
    assert_eq!(report.metrics.footfall, 200);
    assert_eq!(report.metrics.competitor_count, 3);
}

#[tokio::test]
async fn geocode_failure_fails_the_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let maps = maps_client(&server.uri());
    let result = run_site_analysis(
        &maps,
        None,
        "nowhere at all",
        Category::Hostel,
        PipelineOptions::default(),
    )
    .await;
    assert!(result.is_err(), "no coordinate means no analysis");
}

#[tokio::test]
async fn nearby_failure_degrades_to_an_empty_market() {
    let server = MockServer::start().await;
    mount_geocode(&server).await;
    // Every nearby search (both radii) errors at the API level.
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "OVER_QUERY_LIMIT", "results": [] })),
        )
        .mount(&server)
        .await;

    let maps = maps_client(&server.uri());
    let report = run_site_analysis(
        &maps,
        None,
        "MG Road, Bangalore",
        Category::Cafe,
        PipelineOptions::default(),
    )
    .await
    .expect("places degradation must not fail the run");

    assert_eq!(report.metrics.footfall, 0);
    assert_eq!(report.metrics.competitor_count, 0);
    assert!(report.competitors.is_empty());
    assert!(report.alternatives.is_empty());
    // Fallback with zero signals: 85, competition Low.
    assert_eq!(report.metrics.viability_score, 85);
    assert_eq!(report.metrics.competition_level, Level::Low);
}

#[tokio::test]
async fn find_alternatives_stops_probing_once_limit_is_reached() {
    let server = MockServer::start().await;

    // One probe response is enough for a limit of 2; expect(1) asserts the
    // early exit: no second probe request may be issued.
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("radius", "2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "place_id": "ChIJalt1",
                    "name": "Corner Site",
                    "geometry": { "location": { "lat": 12.98, "lng": 77.59 } },
                    "rating": 4.6,
                    "user_ratings_total": 900,
                    "price_level": 2,
                    "types": ["cafe"]
                },
                {
                    "place_id": "ChIJalt2",
                    "name": "Side Street Site",
                    "geometry": { "location": { "lat": 12.981, "lng": 77.591 } },
                    "rating": 3.1,
                    "user_ratings_total": 12,
                    "types": ["store"]
                },
                {
                    "place_id": "ChIJalt3",
                    "name": "Should Never Be Taken",
                    "geometry": { "location": { "lat": 12.982, "lng": 77.592 } }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let maps = maps_client(&server.uri());
    let origin = Coordinate {
        lat: 12.97,
        lng: 77.59,
    };
    let candidates = find_alternatives(&maps, origin, Category::Cafe, 2).await;

    assert_eq!(candidates.len(), 2, "never more than the requested count");
    // Strictly descending by score; only the first two results per probe
    // are considered.
    assert_eq!(candidates[0].place.id, "ChIJalt1");
    assert_eq!(candidates[1].place.id, "ChIJalt2");
    assert!(candidates[0].score > candidates[1].score);
    assert!(candidates[0]
        .reasons
        .contains(&"High rating".to_string()));
}

#[tokio::test]
async fn find_alternatives_skips_failed_probes_and_dedupes() {
    let server = MockServer::start().await;

    // First probe fails at the HTTP layer; the pass must continue.
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Every later probe returns the same two places; dedup must collapse
    // them to a single pair of candidates.
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "place_id": "ChIJdup1",
                    "name": "Duplicate One",
                    "geometry": { "location": { "lat": 12.98, "lng": 77.59 } },
                    "rating": 4.0,
                    "user_ratings_total": 200,
                    "types": ["cafe"]
                },
                {
                    "place_id": "ChIJdup2",
                    "name": "Duplicate Two",
                    "geometry": { "location": { "lat": 12.981, "lng": 77.591 } },
                    "rating": 3.5,
                    "user_ratings_total": 20,
                    "types": ["cafe"]
                }
            ]
        })))
        .mount(&server)
        .await;

    let maps = maps_client(&server.uri());
    let origin = Coordinate {
        lat: 12.97,
        lng: 77.59,
    };
    let candidates = find_alternatives(&maps, origin, Category::Cafe, 5).await;

    assert_eq!(
        candidates.len(),
        2,
        "duplicates across probes collapse; the failed probe is skipped"
    );
    let mut scores: Vec<u8> = candidates.iter().map(|c| c.score).collect();
    let mut sorted = scores.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(scores, sorted, "results must be sorted descending");
    scores.dedup();
    assert_eq!(scores.len(), 2);
}

#[tokio::test]
async fn find_alternatives_returns_empty_when_all_probes_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let maps = maps_client(&server.uri());
    let origin = Coordinate {
        lat: 12.97,
        lng: 77.59,
    };
    let candidates = find_alternatives(&maps, origin, Category::Hotel, 5).await;
    assert!(candidates.is_empty(), "empty, not an error");
}
