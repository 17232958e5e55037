use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDateTime;
use home_ranker::error::AppError;
use home_ranker::listings::browse::format::{DistanceTier, PriorityTier};
use home_ranker::listings::browse::{DashboardSummary, FacetOptions, ListingFilter};
use home_ranker::listings::{
    ExcludedListing, Listing, PriorityEngine, PriorityWeights, ScoredListing, SnapshotLoader,
    WeightFactor,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::borrow::Cow;
use std::io::Cursor;
use std::sync::atomic::Ordering;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RankRequest {
    pub(crate) weights: Option<PriorityWeights>,
    pub(crate) normalize_weights: bool,
    pub(crate) filter: Option<ListingFilter>,
    pub(crate) listings: Option<Vec<Listing>>,
    pub(crate) listings_csv: Option<String>,
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankResponse {
    pub(crate) data_source: ListingSource,
    pub(crate) weights: PriorityWeights,
    /// Listings that passed the filter, before `limit` is applied.
    pub(crate) total_matches: usize,
    pub(crate) listings: Vec<RankedListingView>,
    pub(crate) excluded: Vec<ExcludedListing>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankedListingView {
    #[serde(flatten)]
    pub(crate) scored: ScoredListing,
    pub(crate) priority_tier: PriorityTier,
    pub(crate) distance_tier: DistanceTier,
}

impl From<ScoredListing> for RankedListingView {
    fn from(scored: ScoredListing) -> Self {
        let priority_tier = PriorityTier::for_score(scored.priority_score);
        let distance_tier = DistanceTier::for_distance_km(scored.listing.distance_to_destination);
        Self {
            scored,
            priority_tier,
            distance_tier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ListingSource {
    Snapshot,
    Inline,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DashboardRequest {
    pub(crate) weights: Option<PriorityWeights>,
    pub(crate) normalize_weights: bool,
    pub(crate) filter: Option<ListingFilter>,
    pub(crate) listings: Option<Vec<Listing>>,
    pub(crate) listings_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardResponse {
    pub(crate) data_source: ListingSource,
    #[serde(flatten)]
    pub(crate) summary: DashboardSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) latest_scraped_at: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NormalizeWeightsRequest {
    #[serde(default)]
    pub(crate) weights: PriorityWeights,
    #[serde(default)]
    pub(crate) adjust: Option<WeightAdjustment>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct WeightAdjustment {
    pub(crate) factor: WeightFactor,
    pub(crate) value: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct NormalizeWeightsResponse {
    pub(crate) weights: PriorityWeights,
    pub(crate) shares: Vec<WeightShare>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WeightShare {
    pub(crate) factor: WeightFactor,
    pub(crate) label: &'static str,
    pub(crate) percent: f64,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/listings/rank", post(rank_endpoint))
        .route("/api/v1/listings/facets", get(facets_endpoint))
        .route("/api/v1/listings/dashboard", post(dashboard_endpoint))
        .route("/api/v1/weights/normalize", post(normalize_weights_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "listings": state.snapshot.listings.len() })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn rank_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let RankRequest {
        weights,
        normalize_weights,
        filter,
        listings,
        listings_csv,
        limit,
    } = payload;

    let weights = resolve_weights(weights, normalize_weights);
    let (candidates, data_source) = resolve_listings(&state, listings, listings_csv)?;
    let outcome = PriorityEngine::new(weights).rank_with_exclusions(&candidates);

    let mut matches = filter.unwrap_or_default().apply(outcome.ranked);
    let total_matches = matches.len();
    if let Some(limit) = limit {
        matches.truncate(limit);
    }

    debug!(
        ?data_source,
        candidates = candidates.len(),
        total_matches,
        excluded = outcome.excluded.len(),
        "ranked listings"
    );

    Ok(Json(RankResponse {
        data_source,
        weights,
        total_matches,
        listings: matches.into_iter().map(RankedListingView::from).collect(),
        excluded: outcome.excluded,
    }))
}

pub(crate) async fn facets_endpoint(Extension(state): Extension<AppState>) -> Json<FacetOptions> {
    Json(FacetOptions::from_listings(&state.snapshot.listings))
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DashboardRequest>,
) -> Result<Json<DashboardResponse>, AppError> {
    let DashboardRequest {
        weights,
        normalize_weights,
        filter,
        listings,
        listings_csv,
    } = payload;

    let weights = resolve_weights(weights, normalize_weights);
    let (candidates, data_source) = resolve_listings(&state, listings, listings_csv)?;
    let ranked = filter
        .unwrap_or_default()
        .apply(PriorityEngine::new(weights).rank(&candidates));

    let latest_scraped_at = match data_source {
        ListingSource::Snapshot => state.snapshot.latest_scraped_at,
        ListingSource::Inline | ListingSource::Csv => None,
    };

    Ok(Json(DashboardResponse {
        data_source,
        summary: DashboardSummary::from_listings(&ranked),
        latest_scraped_at,
    }))
}

pub(crate) async fn normalize_weights_endpoint(
    Json(payload): Json<NormalizeWeightsRequest>,
) -> Json<NormalizeWeightsResponse> {
    let weights = match payload.adjust {
        Some(WeightAdjustment { factor, value }) => payload.weights.with_adjusted(factor, value),
        None => payload.weights.normalized(),
    };

    let shares = WeightFactor::ordered()
        .into_iter()
        .map(|factor| WeightShare {
            factor,
            label: factor.label(),
            percent: (weights.get(factor) * 1000.0).round() / 10.0,
        })
        .collect();

    Json(NormalizeWeightsResponse { weights, shares })
}

fn resolve_weights(weights: Option<PriorityWeights>, normalize: bool) -> PriorityWeights {
    let weights = weights.unwrap_or_default();
    if normalize {
        weights.normalized()
    } else {
        weights
    }
}

/// Inline CSV wins over inline listings, which win over the loaded snapshot.
fn resolve_listings(
    state: &AppState,
    listings: Option<Vec<Listing>>,
    listings_csv: Option<String>,
) -> Result<(Cow<'_, [Listing]>, ListingSource), AppError> {
    if let Some(csv) = listings_csv {
        let snapshot = SnapshotLoader::new().load_csv(Cursor::new(csv.into_bytes()))?;
        return Ok((Cow::Owned(snapshot.listings), ListingSource::Csv));
    }

    if let Some(listings) = listings {
        return Ok((Cow::Owned(listings), ListingSource::Inline));
    }

    Ok((
        Cow::Borrowed(state.snapshot.listings.as_slice()),
        ListingSource::Snapshot,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use home_ranker::listings::{ExclusionReason, Snapshot};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use tower::ServiceExt;

    fn walkable_terrace(property_id: &str) -> Listing {
        let mut listing = Listing::new(property_id, 100_000.0);
        listing.location = "14 Ormeau Road, Belfast".to_string();
        listing.calculated_monthly_payment = Some(500.0);
        listing.bedrooms = Some(3);
        listing.distance_to_destination = Some(0.5);
        listing.perplexity_rating = Some(8.0);
        listing.tenure = Some("Freehold".to_string());
        listing.heating = Some("Gas".to_string());
        listing.energy_rating = Some("B1".to_string());
        listing.property_type = Some("Terrace House".to_string());
        listing
    }

    fn sample_state() -> AppState {
        let mut distant = walkable_terrace("distant");
        distant.distance_to_destination = None;
        distant.heating = Some("Oil".to_string());
        let mut cash = walkable_terrace("cash");
        cash.description = Some("Cash offers only".to_string());

        let snapshot = Snapshot {
            listings: vec![distant, walkable_terrace("walkable"), cash],
            skipped: 0,
            latest_scraped_at: NaiveDateTime::parse_from_str(
                "2026-02-20 08:38:59",
                "%Y-%m-%d %H:%M:%S",
            )
            .ok(),
        };
        let handle = PrometheusBuilder::new().build_recorder().handle();
        AppState::new(handle, snapshot)
    }

    fn build_router(state: AppState) -> Router {
        router().layer(Extension(state))
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn rank_endpoint_orders_snapshot_and_reports_exclusions() {
        let Json(body) = rank_endpoint(Extension(sample_state()), Json(RankRequest::default()))
            .await
            .expect("ranking succeeds");

        assert_eq!(body.data_source, ListingSource::Snapshot);
        assert_eq!(body.total_matches, 2);
        assert_eq!(body.listings[0].scored.listing.property_id, "walkable");
        assert_eq!(body.listings[0].scored.priority_score, 80.4);
        assert_eq!(body.listings[0].priority_tier, PriorityTier::High);
        assert_eq!(body.listings[1].distance_tier, DistanceTier::Unknown);
        assert_eq!(body.excluded.len(), 1);
        assert_eq!(body.excluded[0].reason, ExclusionReason::CashOffersOnly);
    }

    #[tokio::test]
    async fn rank_endpoint_applies_limit_after_counting_matches() {
        let request = RankRequest {
            limit: Some(1),
            ..RankRequest::default()
        };

        let Json(body) = rank_endpoint(Extension(sample_state()), Json(request))
            .await
            .expect("ranking succeeds");

        assert_eq!(body.total_matches, 2);
        assert_eq!(body.listings.len(), 1);
    }

    #[tokio::test]
    async fn rank_endpoint_prefers_inline_listings() {
        let request = RankRequest {
            listings: Some(vec![walkable_terrace("inline")]),
            weights: Some(PriorityWeights {
                location: 1.2,
                price: 0.2,
                monthly: 0.4,
                rating: 0.2,
            }),
            normalize_weights: true,
            ..RankRequest::default()
        };

        let Json(body) = rank_endpoint(Extension(sample_state()), Json(request))
            .await
            .expect("ranking succeeds");

        assert_eq!(body.data_source, ListingSource::Inline);
        assert_eq!(body.listings.len(), 1);
        assert_eq!(body.listings[0].scored.priority_score, 80.4);
        assert!((body.weights.total() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn rank_endpoint_rejects_malformed_csv() {
        let request = RankRequest {
            listings_csv: Some("property_id,price\nbroken,not-a-number\n".to_string()),
            ..RankRequest::default()
        };

        let error = rank_endpoint(Extension(sample_state()), Json(request))
            .await
            .expect_err("csv is malformed");

        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_endpoint_summarises_filtered_snapshot() {
        let request = DashboardRequest {
            filter: Some(ListingFilter {
                heating: Some("Gas".to_string()),
                ..ListingFilter::default()
            }),
            ..DashboardRequest::default()
        };

        let Json(body) = dashboard_endpoint(Extension(sample_state()), Json(request))
            .await
            .expect("dashboard builds");

        assert_eq!(body.summary.stats.count, 1);
        assert_eq!(body.summary.stats.walking_distance_pct, 100);
        assert!(body.latest_scraped_at.is_some());
    }

    #[tokio::test]
    async fn normalize_endpoint_applies_slider_adjustment() {
        let request = NormalizeWeightsRequest {
            weights: PriorityWeights::default(),
            adjust: Some(WeightAdjustment {
                factor: WeightFactor::Location,
                value: 0.0,
            }),
        };

        let Json(body) = normalize_weights_endpoint(Json(request)).await;

        assert_eq!(body.weights.location, 0.0);
        assert!((body.weights.monthly - 0.5).abs() < 1e-9);
        let percents: Vec<_> = body.shares.iter().map(|share| share.percent).collect();
        assert_eq!(percents, [0.0, 25.0, 50.0, 25.0]);
        assert_eq!(body.shares[3].label, "AI Rating");
    }

    #[tokio::test]
    async fn ready_reports_initializing_until_flag_set() {
        let state = sample_state();
        let router = build_router(state.clone());

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload.get("listings"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn post_rank_accepts_partial_json_payload() {
        let router = build_router(sample_state());
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/listings/rank")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "weights": { "location": 0.0 }, "limit": 5 }).to_string(),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        let first = &payload["listings"][0];
        assert_eq!(first["property_id"], json!("walkable"));
        assert_eq!(first["priority_tier"], json!("low"));
        assert_eq!(payload["weights"]["price"], json!(0.1));
        assert_eq!(payload["excluded"][0]["reason"]["kind"], json!("cash_offers_only"));
    }

    #[tokio::test]
    async fn post_rank_excludes_inline_listing_with_fractional_short_lease() {
        let router = build_router(sample_state());
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/listings/rank")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "listings": [
                        {
                            "property_id": "half-year-short",
                            "price": 60000,
                            "tenure": "Leasehold",
                            "lease_years": 59.5
                        },
                        { "property_id": "long-lease", "price": 60000, "lease_years": "120" }
                    ]
                })
                .to_string(),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["data_source"], json!("inline"));
        assert_eq!(payload["listings"][0]["property_id"], json!("long-lease"));
        assert_eq!(payload["listings"][0]["lease_years"], json!(120));
        let excluded = &payload["excluded"][0];
        assert_eq!(excluded["property_id"], json!("half-year-short"));
        assert_eq!(excluded["reason"]["kind"], json!("short_lease"));
        assert_eq!(excluded["reason"]["years_remaining"], json!(59));
    }

    #[tokio::test]
    async fn get_facets_lists_snapshot_values() {
        let router = build_router(sample_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/listings/facets")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["heating"], json!(["Gas", "Oil"]));
        assert_eq!(payload["tenure"], json!(["Freehold"]));
    }
}
