use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{CheckAnswerRequest, GradeAnswerRequest, ScoreQuizRequest},
    services::quiz_attempt_service::QuizAttemptService,
};

/// Free-text grading. Always answers 200 once the request is valid.
#[post("/api/quiz/grade")]
pub async fn grade_answer(
    state: web::Data<AppState>,
    request: web::Json<GradeAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let answer = state.grading_service.grade_free_text(&request).await;
    log::info!(
        "Graded free-text answer: correct={}, by={:?}",
        answer.is_correct,
        answer.graded_by
    );
    Ok(HttpResponse::Ok().json(answer))
}

#[post("/api/quiz/check")]
pub async fn check_answer(request: web::Json<CheckAnswerRequest>) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let answer =
        QuizAttemptService::check_selection(&request.question, &request.selected_option_indexes)?;
    Ok(HttpResponse::Ok().json(answer))
}

#[post("/api/quiz/score")]
pub async fn score_quiz(request: web::Json<ScoreQuizRequest>) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let score = QuizAttemptService::score_quiz(&request.questions, &request.answers)?;
    Ok(HttpResponse::Ok().json(score))
}
