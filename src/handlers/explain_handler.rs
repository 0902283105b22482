use actix_web::{post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState, errors::AppError, middleware::get_request_id,
    models::dto::request::ExplainRequest,
};

#[post("/api/explain")]
pub async fn explain(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<ExplainRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let request_id = get_request_id(&req);
    log::info!(
        "[{}] Explain request ({} chars)",
        request_id,
        request.discharge_text.chars().count()
    );

    let summary = state
        .explanation_service
        .explain(&request.discharge_text)
        .await
        .map_err(|err| {
            log::warn!("[{}] Explain failed: {}", request_id, err.error_code());
            err
        })?;
    Ok(HttpResponse::Ok().json(summary))
}
