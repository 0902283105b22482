use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    errors::AppError,
    models::dto::request::ExportPdfRequest,
    services::{
        http_helpers::{pdf_attachment, PDF_FILENAME},
        pdf_export::render_summary_pdf,
    },
};

#[post("/api/export/pdf")]
pub async fn export_pdf(request: web::Json<ExportPdfRequest>) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    // rendering is CPU-bound, keep it off the async workers
    let bytes = web::block(move || {
        render_summary_pdf(&request.summary, request.quiz_score, &request.quiz_results)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("PDF task failed: {}", e)))??;

    log::info!("Rendered summary PDF ({} bytes)", bytes.len());
    Ok(pdf_attachment(bytes, PDF_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use actix_web::{
        http::{header, StatusCode},
        test, App,
    };

    #[actix_web::test]
    async fn test_export_pdf() {
        let app = test::init_service(App::new().service(export_pdf)).await;

        let req = test::TestRequest::post()
            .uri("/api/export/pdf")
            .set_json(serde_json::json!({
                "summary": fixtures::summary(),
                "quizScore": 75.0,
                "quizResults": [
                    {"question": "How often?", "userAnswer": "Every 6 hours", "isCorrect": true}
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"%PDF"));
    }

    #[actix_web::test]
    async fn test_out_of_range_score_is_bad_request() {
        let app = test::init_service(App::new().service(export_pdf)).await;

        let req = test::TestRequest::post()
            .uri("/api/export/pdf")
            .set_json(serde_json::json!({ "summary": fixtures::summary(), "quizScore": 140.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
