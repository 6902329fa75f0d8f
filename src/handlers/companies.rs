use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::company;
use crate::errors::ServiceError;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanySummary {
    pub id: i32,
    pub name: String,
    pub internal_transit_location_id: Option<i32>,
}

impl From<company::Model> for CompanySummary {
    fn from(model: company::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            internal_transit_location_id: model.internal_transit_location_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
}

pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Vec<CompanySummary>> {
    let companies = state.services.companies.list().await?;
    Ok(Json(ApiResponse::success(
        companies.into_iter().map(CompanySummary::from).collect(),
    )))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<CompanySummary> {
    let company = state.services.companies.get(id).await?;
    Ok(Json(ApiResponse::success(CompanySummary::from(company))))
}

pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> ApiResult<CompanySummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
    let company = state.services.companies.create(&payload.name).await?;
    Ok(Json(ApiResponse::success(CompanySummary::from(company))))
}
