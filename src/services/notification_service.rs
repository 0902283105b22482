use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::dto::{request::SendQuizResultsRequest, response::SendQuizResultsResponse},
    services::mail_sender::MailSender,
};

pub const PHI_DISCLAIMER: &str = "CONFIDENTIAL: This message may contain protected health \
information intended only for the named clinician. If you received it in error, notify the \
sender and delete it. Do not forward or store it outside approved clinical systems.";

pub struct NotificationService {
    sender: Option<Arc<dyn MailSender>>,
}

impl NotificationService {
    pub fn new(sender: Option<Arc<dyn MailSender>>) -> Self {
        Self { sender }
    }

    pub async fn send_quiz_results(
        &self,
        request: &SendQuizResultsRequest,
    ) -> AppResult<SendQuizResultsResponse> {
        request.validate()?;

        let sender = self.sender.as_ref().ok_or_else(|| {
            log::error!("Quiz results email requested but Gmail credentials are not configured");
            AppError::MailConfiguration("Gmail credentials are not configured".to_string())
        })?;

        let subject = format!("Discharge quiz results for patient {}", request.patient_id.trim());
        let html = compose_results_html(request);

        log::info!(
            "Sending quiz results email ({} questions, {} bytes)",
            request.quiz_data.len(),
            html.len()
        );
        let message_id = sender
            .send(request.doctor_email.trim(), &subject, &html)
            .await?;

        Ok(SendQuizResultsResponse {
            message: "Quiz results sent successfully".to_string(),
            message_id,
        })
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn compose_results_html(request: &SendQuizResultsRequest) -> String {
    let mut html = String::new();
    let correct = request.quiz_data.iter().filter(|r| r.is_correct).count();

    // writing into a String cannot fail
    let _ = write!(
        html,
        "<html><body style=\"font-family: Arial, sans-serif;\">\
         <h2>Discharge Instructions Quiz Results</h2>\
         <p><strong>Patient ID:</strong> {}</p>\
         <p><strong>Score:</strong> {:.0}% ({} of {} correct)</p>\
         <p><strong>Sent:</strong> {}</p>",
        escape_html(request.patient_id.trim()),
        request.quiz_score,
        correct,
        request.quiz_data.len(),
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    );

    if let Some(summary) = &request.summary {
        let _ = write!(
            html,
            "<h3>Summary given to the family</h3><p>{}</p>",
            escape_html(&summary.simple_explanation)
        );
        if !summary.red_flags.is_empty() {
            html.push_str("<p><strong>Red flags explained:</strong></p><ul>");
            for flag in &summary.red_flags {
                let _ = write!(html, "<li>{}</li>", escape_html(flag));
            }
            html.push_str("</ul>");
        }
    }

    if !request.quiz_data.is_empty() {
        html.push_str(
            "<h3>Question Results</h3><table border=\"1\" cellpadding=\"6\" style=\"border-collapse: collapse;\">\
             <tr><th>#</th><th>Question</th><th>Answer given</th><th>Correct answer</th><th>Result</th></tr>",
        );
        for (i, result) in request.quiz_data.iter().enumerate() {
            let (label, color) = if result.is_correct {
                ("Correct", "#2e7d32")
            } else {
                ("Incorrect", "#c62828")
            };
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td style=\"color: {};\">{}</td></tr>",
                i + 1,
                escape_html(&result.question),
                escape_html(&result.user_answer),
                escape_html(result.correct_answer.as_deref().unwrap_or("")),
                color,
                label
            );
        }
        html.push_str("</table>");
    }

    let _ = write!(
        html,
        "<p style=\"font-size: 12px; color: #666;\"><em>{}</em></p></body></html>",
        escape_html(PHI_DISCLAIMER)
    );
    html
}
