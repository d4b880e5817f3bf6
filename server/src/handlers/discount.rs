use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::utils::validation::required;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ValidateCodeRequest {
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCodeResponse {
    pub valid: bool,
    pub discount_percent: Decimal,
}

/// `POST /api/validate-code`. Unknown and inactive codes share one 404.
pub async fn validate_code(
    State(state): State<AppState>,
    Json(payload): Json<ValidateCodeRequest>,
) -> AppResult<Json<ValidateCodeResponse>> {
    let code = required("code", payload.code.as_deref())?;

    let influencer = state
        .store
        .find_active_influencer(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid or inactive code".to_string()))?;

    Ok(Json(ValidateCodeResponse {
        valid: true,
        discount_percent: influencer.discount_percent,
    }))
}
