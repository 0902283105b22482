pub mod completion_client;
pub mod explanation_service;
pub mod grading_service;
pub mod http_helpers;
pub mod json_extract;
pub mod mail_sender;
pub mod normalizer;
pub mod notification_service;
pub mod pdf_export;
pub mod prompt_builder;
pub mod quiz_attempt_service;
pub mod quiz_sanitizer;
