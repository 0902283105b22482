use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    services::{
        completion_client::{CompletionClient, GeminiClient},
        explanation_service::ExplanationService,
        grading_service::GradingService,
        mail_sender::{GmailSender, MailSender},
        notification_service::NotificationService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub explanation_service: Arc<ExplanationService>,
    pub grading_service: Arc<GradingService>,
    pub notification_service: Arc<NotificationService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let completion_client: Arc<dyn CompletionClient> = Arc::new(GeminiClient::new(&config)?);

        let mail_sender = match &config.gmail {
            Some(credentials) => {
                let sender: Arc<dyn MailSender> = Arc::new(GmailSender::new(
                    credentials.clone(),
                    config.llm_timeout_seconds,
                )?);
                Some(sender)
            }
            None => {
                log::warn!("Gmail credentials not set; quiz result emails are disabled");
                None
            }
        };

        Ok(Self::with_clients(config, completion_client, mail_sender))
    }

    /// Builds the state around caller-supplied clients.
    pub fn with_clients(
        config: Config,
        completion_client: Arc<dyn CompletionClient>,
        mail_sender: Option<Arc<dyn MailSender>>,
    ) -> Self {
        Self {
            explanation_service: Arc::new(ExplanationService::new(Arc::clone(&completion_client))),
            grading_service: Arc::new(GradingService::new(completion_client)),
            notification_service: Arc::new(NotificationService::new(mail_sender)),
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_new_without_gmail_credentials() {
        let state = AppState::new(Config::test_config()).unwrap();
        assert!(state.config.gmail.is_none());
    }
}
