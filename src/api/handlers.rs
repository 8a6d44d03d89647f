//! REST API handlers for advisor operations

use crate::advisor::{
    AdvisorError, AmountTier, Distribution, DistributionReport, Key, Recommendation, Session,
    SessionManager, Summary, Threats,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for API handlers
#[derive(Clone, Default)]
pub struct ApiState {
    pub session_manager: Arc<RwLock<SessionManager>>,
}

impl ApiState {
    pub fn new(session_manager: SessionManager) -> Self {
        Self {
            session_manager: Arc::new(RwLock::new(session_manager)),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

fn api_error(status: StatusCode, error: impl ToString) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            error: error.to_string(),
        }),
    )
}

impl From<AdvisorError> for (StatusCode, Json<ApiError>) {
    fn from(e: AdvisorError) -> Self {
        let status = match e {
            AdvisorError::SessionNotFound(_) | AdvisorError::UnknownKey(_) => StatusCode::NOT_FOUND,
            AdvisorError::InvalidThreshold { .. }
            | AdvisorError::PracticalLimitExceeded { .. }
            | AdvisorError::InconsistentConfig(_) => StatusCode::BAD_REQUEST,
        };
        api_error(status, e)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub label: Option<String>,
    pub config: String,
    pub m: u32,
    pub n: u32,
    pub threats: Vec<&'static str>,
    pub keys: Vec<Key>,
    pub distribution: Distribution,
    pub signatures_collected: usize,
    pub can_authorize: bool,
    pub created_at: String,
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        let advisor = &session.advisor;
        let config = advisor.config();
        Self {
            id: session.id.clone(),
            label: session.label.clone(),
            config: config.description(),
            m: config.m,
            n: config.n,
            threats: config.threats.names(),
            keys: config.keys.clone(),
            distribution: config.distribution.clone(),
            signatures_collected: advisor.signatures_collected(),
            can_authorize: advisor.can_authorize(),
            created_at: session.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub config: String,
    pub security_score: u8,
}

#[derive(Debug, Serialize)]
pub struct SignResponse {
    pub key: String,
    pub signatures_collected: usize,
    pub required: u32,
    pub can_authorize: bool,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub threats: Vec<String>,
    pub amount: AmountTier,
}

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub label: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfigRequest {
    pub m: u32,
    pub n: u32,
    #[serde(default)]
    pub threats: Vec<String>,
}

#[derive(Deserialize)]
pub struct DistributionRequest {
    pub distribution: Distribution,
}

fn parse_threats(names: &[String]) -> Result<Threats, (StatusCode, Json<ApiError>)> {
    Threats::from_names(names).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/recommend - Stateless recommendation
pub async fn recommend(Json(req): Json<RecommendRequest>) -> ApiResult<Recommendation> {
    let threats = parse_threats(&req.threats)?;
    Ok(Json(crate::advisor::recommend(threats, req.amount)))
}

/// GET /api/sessions - List sessions
pub async fn list_sessions(State(state): State<ApiState>) -> Json<Vec<SessionInfo>> {
    let manager = state.session_manager.read().await;
    Json(manager.list().into_iter().map(SessionInfo::from).collect())
}

/// POST /api/sessions - Start a session
pub async fn create_session(
    State(state): State<ApiState>,
    Json(req): Json<CreateSessionRequest>,
) -> (StatusCode, Json<SessionInfo>) {
    let mut manager = state.session_manager.write().await;
    let session = manager.create_session(req.label);
    (StatusCode::CREATED, Json(SessionInfo::from(session)))
}

/// GET /api/sessions/{id} - Session details
pub async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<SessionInfo> {
    let manager = state.session_manager.read().await;
    Ok(Json(SessionInfo::from(manager.get(&id)?)))
}

/// DELETE /api/sessions/{id} - End a session
pub async fn delete_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let mut manager = state.session_manager.write().await;
    manager.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/sessions/{id}/config - Reset to a new M-of-N configuration
pub async fn set_config(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<ConfigRequest>,
) -> ApiResult<SessionInfo> {
    let threats = parse_threats(&req.threats)?;

    let mut manager = state.session_manager.write().await;
    let advisor = manager.advisor_mut(&id)?;
    advisor.set_config(req.m, req.n)?;
    advisor.set_threats(threats);

    Ok(Json(SessionInfo::from(manager.get(&id)?)))
}

/// PUT /api/sessions/{id}/distribution - Store the distribution used for scoring
pub async fn set_distribution(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<DistributionRequest>,
) -> ApiResult<DistributionReport> {
    let mut manager = state.session_manager.write().await;
    let advisor = manager.advisor_mut(&id)?;
    let report = advisor.validate_distribution(&req.distribution);
    advisor.set_distribution(req.distribution);
    Ok(Json(report))
}

/// POST /api/sessions/{id}/validate - Validate a proposed distribution
pub async fn validate_distribution(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<DistributionRequest>,
) -> ApiResult<DistributionReport> {
    let manager = state.session_manager.read().await;
    let advisor = manager.advisor(&id)?;
    Ok(Json(advisor.validate_distribution(&req.distribution)))
}

/// GET /api/sessions/{id}/score - Security score
pub async fn get_score(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ScoreResponse> {
    let manager = state.session_manager.read().await;
    let advisor = manager.advisor(&id)?;
    Ok(Json(ScoreResponse {
        config: advisor.config().description(),
        security_score: advisor.calculate_security_score(),
    }))
}

/// GET /api/sessions/{id}/summary - Configuration summary
pub async fn get_summary(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Summary> {
    let manager = state.session_manager.read().await;
    Ok(Json(manager.advisor(&id)?.get_summary()))
}

/// POST /api/sessions/{id}/keys/{key}/sign - Simulate a signature
pub async fn sign_key(
    State(state): State<ApiState>,
    Path((id, key)): Path<(String, String)>,
) -> ApiResult<SignResponse> {
    let mut manager = state.session_manager.write().await;
    let advisor = manager.advisor_mut(&id)?;
    advisor.sign_key(&key)?;

    Ok(Json(SignResponse {
        key,
        signatures_collected: advisor.signatures_collected(),
        required: advisor.config().m,
        can_authorize: advisor.can_authorize(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_locations() -> Distribution {
        ["home", "bank", "attorney"]
            .iter()
            .enumerate()
            .map(|(i, loc)| (loc.to_string(), vec![format!("key-{}", i + 1)]))
            .collect()
    }

    async fn new_session(state: &ApiState) -> String {
        let (status, Json(info)) = create_session(
            State(state.clone()),
            Json(CreateSessionRequest {
                label: Some("test".to_string()),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        info.id
    }

    #[tokio::test]
    async fn test_recommend_endpoint() {
        let Json(rec) = recommend(Json(RecommendRequest {
            threats: vec!["theft".to_string()],
            amount: AmountTier::Medium,
        }))
        .await
        .unwrap();
        assert_eq!((rec.m, rec.n), (2, 2));

        let err = recommend(Json(RecommendRequest {
            threats: vec!["fire".to_string()],
            amount: AmountTier::Small,
        }))
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_session_flow() {
        let state = ApiState::default();
        let id = new_session(&state).await;

        let Json(info) = set_config(
            State(state.clone()),
            Path(id.clone()),
            Json(ConfigRequest {
                m: 2,
                n: 3,
                threats: vec!["loss".to_string()],
            }),
        )
        .await
        .unwrap();
        assert_eq!(info.config, "2-of-3");
        assert_eq!(info.threats, vec!["loss"]);

        // Validation alone leaves the score untouched
        let Json(report) = validate_distribution(
            State(state.clone()),
            Path(id.clone()),
            Json(DistributionRequest {
                distribution: three_locations(),
            }),
        )
        .await
        .unwrap();
        assert!(report.valid);

        let Json(score) = get_score(State(state.clone()), Path(id.clone())).await.unwrap();
        assert_eq!(score.security_score, 50);

        set_distribution(
            State(state.clone()),
            Path(id.clone()),
            Json(DistributionRequest {
                distribution: three_locations(),
            }),
        )
        .await
        .unwrap();

        let Json(summary) = get_summary(State(state.clone()), Path(id.clone())).await.unwrap();
        assert_eq!(summary.security_score, 80);
        assert_eq!(summary.protected_from, 1);

        let Json(signed) = sign_key(
            State(state.clone()),
            Path((id.clone(), "key-2".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(signed.signatures_collected, 1);
        assert!(!signed.can_authorize);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let state = ApiState::default();
        let id = new_session(&state).await;

        let err = set_config(
            State(state.clone()),
            Path(id.clone()),
            Json(ConfigRequest {
                m: 3,
                n: 16,
                threats: vec![],
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let err = get_summary(State(state.clone()), Path("missing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);

        let err = sign_key(State(state.clone()), Path((id.clone(), "key-7".to_string())))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);

        assert_eq!(
            delete_session(State(state.clone()), Path(id.clone())).await.unwrap(),
            StatusCode::NO_CONTENT
        );
        let Json(sessions) = list_sessions(State(state)).await;
        assert!(sessions.is_empty());
    }
}
