pub mod explain_handler;
pub mod export_handler;
pub mod health_handler;
pub mod notify_handler;
pub mod quiz_handler;

use actix_web::web;

use crate::errors::AppError;

pub use explain_handler::explain;
pub use export_handler::export_pdf;
pub use health_handler::health_check;
pub use notify_handler::{method_not_allowed, send_quiz_results};
pub use quiz_handler::{check_answer, grade_answer, score_quiz};

/// Registers every route of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(explain)
        .service(grade_answer)
        .service(check_answer)
        .service(score_quiz)
        .service(export_pdf)
        .service(
            web::resource("/api/send-quiz-results")
                .route(web::post().to(send_quiz_results))
                .default_service(web::to(method_not_allowed)),
        );
}

/// JSON extractor settings: body size limit, and malformed bodies reported
/// as validation errors in the usual error shape.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            log::warn!("Rejected request body: {}", err);
            AppError::ValidationError(format!("Invalid JSON body: {}", err)).into()
        })
}
