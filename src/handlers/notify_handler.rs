use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState, errors::AppError, middleware::get_request_id,
    models::dto::request::SendQuizResultsRequest,
};

pub async fn send_quiz_results(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<SendQuizResultsRequest>,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req);
    log::info!("[{}] Quiz results email requested", request_id);

    let response = state
        .notification_service
        .send_quiz_results(&request.into_inner())
        .await
        .map_err(|err| {
            log::warn!("[{}] Quiz results email failed: {}", request_id, err.error_code());
            err
        })?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed(format!(
        "{} is not supported; use POST",
        req.method()
    )))
}
