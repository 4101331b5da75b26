//! # API REST
//!
//! REST API for the triage advisor.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! All decision logic stays in `triage-core`; handlers translate JSON to core types and back.

#![warn(rust_2018_idioms)]

pub mod dto;

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use triage_core::{SelectionSet, TagId, TriageService};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use dto::{
    AssessReq, AssessRes, ConditionRes, DiseaseRes, DiseaseSummaryRes, HealthRes, ListDiseasesRes,
    MatchReq, MatchRes, ScoreRes, TextMatchRes, TriageRes, VocabularyRes,
};

/// Default number of free-text matches when the request does not say.
const DEFAULT_TOP_K: usize = 3;

/// Application state for the REST API server
///
/// Holds the assessment service, which is built once at startup and shared read-only by every
/// request handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TriageService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_diseases,
        get_disease,
        vocabulary,
        assess,
        match_text,
    ),
    components(schemas(
        HealthRes,
        DiseaseSummaryRes,
        ListDiseasesRes,
        DiseaseRes,
        VocabularyRes,
        AssessReq,
        AssessRes,
        ConditionRes,
        ScoreRes,
        TriageRes,
        MatchReq,
        MatchRes,
        TextMatchRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/diseases", get(list_diseases))
        .route("/diseases/:name", get(get_disease))
        .route("/vocabulary", get(vocabulary))
        .route("/assess", post(assess))
        .route("/match", post(match_text))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Triage REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/diseases",
    responses(
        (status = 200, description = "Diseases in declaration order", body = ListDiseasesRes)
    )
)]
/// List every disease in the knowledge base with its aliases.
#[axum::debug_handler]
async fn list_diseases(State(state): State<AppState>) -> Json<ListDiseasesRes> {
    let diseases = state
        .service
        .knowledge_base()
        .records()
        .iter()
        .map(|record| DiseaseSummaryRes {
            name: record.name().to_string(),
            aliases: record.aliases.iter().map(|a| a.to_string()).collect(),
        })
        .collect();
    Json(ListDiseasesRes { diseases })
}

#[utoipa::path(
    get,
    path = "/diseases/{name}",
    params(
        ("name" = String, Path, description = "Canonical disease name or alias")
    ),
    responses(
        (status = 200, description = "Disease record", body = DiseaseRes),
        (status = 404, description = "No such disease")
    )
)]
/// Fetch one disease by canonical name or alias.
#[axum::debug_handler]
async fn get_disease(
    State(state): State<AppState>,
    AxumPath(name): AxumPath<String>,
) -> Result<Json<DiseaseRes>, (StatusCode, &'static str)> {
    match state.service.lookup(&name) {
        Some(record) => Ok(Json(DiseaseRes::from(record))),
        None => Err((StatusCode::NOT_FOUND, "Disease not found")),
    }
}

#[utoipa::path(
    get,
    path = "/vocabulary",
    responses(
        (status = 200, description = "Controlled vocabulary and safety notice", body = VocabularyRes)
    )
)]
/// Return the tag vocabulary, general red flags and disclaimer lines.
#[axum::debug_handler]
async fn vocabulary(State(state): State<AppState>) -> Json<VocabularyRes> {
    let kb = state.service.knowledge_base();
    let vocabulary = kb.vocabulary();

    fn labels<K: ToString, V: ToString>(section: &BTreeMap<K, V>) -> BTreeMap<String, String> {
        section
            .iter()
            .map(|(tag, label)| (tag.to_string(), label.to_string()))
            .collect()
    }

    Json(VocabularyRes {
        symptoms: labels(&vocabulary.symptoms),
        exposures: labels(&vocabulary.exposures),
        flags: labels(&vocabulary.flags),
        comorbidities: labels(&vocabulary.comorbidities),
        general_red_flags: kb.general_red_flags().to_vec(),
        disclaimer: kb.disclaimer().to_vec(),
    })
}

#[utoipa::path(
    post,
    path = "/assess",
    request_body = AssessReq,
    responses(
        (status = 200, description = "Ranked conditions and urgency band", body = AssessRes),
        (status = 400, description = "Invalid selection"),
        (status = 500, description = "Internal server error")
    )
)]
/// Score diseases and classify urgency for a selection.
///
/// # Errors
/// Returns `400 Bad Request` if a tag is malformed or, under the `reject` policy, not in the
/// vocabulary.
#[axum::debug_handler]
async fn assess(
    State(state): State<AppState>,
    Json(req): Json<AssessReq>,
) -> Result<Json<AssessRes>, (StatusCode, String)> {
    let selection = selection_from_request(req).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    match state.service.assess(&selection) {
        Ok(assessment) => Ok(Json(assessment.into())),
        Err(e) if e.is_invalid_input() => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            tracing::error!("Assess error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/match",
    request_body = MatchReq,
    responses(
        (status = 200, description = "Diseases ranked against free text", body = MatchRes)
    )
)]
/// Rank diseases against a free-text description.
#[axum::debug_handler]
async fn match_text(State(state): State<AppState>, Json(req): Json<MatchReq>) -> Json<MatchRes> {
    let top_k = req.top_k.unwrap_or(DEFAULT_TOP_K);
    let matches = state
        .service
        .match_text(&req.text, top_k)
        .into_iter()
        .map(|m| TextMatchRes {
            name: m.disease.name().to_string(),
            score: m.score,
        })
        .collect();
    Json(MatchRes { matches })
}

fn parse_tags(field: &str, values: Vec<String>) -> Result<BTreeSet<TagId>, String> {
    values
        .into_iter()
        .map(|v| TagId::new(&v).map_err(|e| format!("{field}: {e}")))
        .collect()
}

fn selection_from_request(req: AssessReq) -> Result<SelectionSet, String> {
    let flags = req
        .flags
        .into_iter()
        .map(|(name, value)| {
            TagId::new(&name)
                .map(|flag| (flag, value))
                .map_err(|e| format!("flags: {e}"))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(SelectionSet {
        symptoms: parse_tags("symptoms", req.symptoms)?,
        exposures: parse_tags("exposures", req.exposures)?,
        flags,
        age: req.age,
        days_sick: req.days_sick,
        comorbidities: parse_tags("comorbidities", req.comorbidities)?,
    })
}
