use std::{path::PathBuf, sync::Arc};

use {
    async_trait::async_trait,
    chrono::Local,
    herald_channels::{ChannelDispatcher, DispatchOutcome},
    herald_config::EmailConfig,
    tracing::{error, info},
};

use crate::{
    error::Result,
    message::compose,
    smtp::MailSubmitter,
    template::{MailTemplateVars, TemplateCache},
};

/// Renders, composes and submits one email per dispatch. Not retried.
pub struct EmailDispatcher {
    templates: Arc<TemplateCache>,
    template_path: PathBuf,
    submitter: Arc<dyn MailSubmitter>,
}

impl EmailDispatcher {
    pub fn new(
        templates: Arc<TemplateCache>,
        template_path: impl Into<PathBuf>,
        submitter: Arc<dyn MailSubmitter>,
    ) -> Self {
        Self {
            templates,
            template_path: template_path.into(),
            submitter,
        }
    }

    async fn send(&self, config: &EmailConfig) -> Result<()> {
        let vars = MailTemplateVars {
            title: &config.subject,
            body: &config.body,
        };
        let rendered = self.templates.render(&self.template_path, &vars).await?;
        let message = compose(config, &rendered, Local::now().naive_local());
        self.submitter
            .submit(&config.smtp, &config.emails, message.as_bytes())
            .await
    }
}

#[async_trait]
impl ChannelDispatcher for EmailDispatcher {
    type Config = EmailConfig;

    async fn dispatch(&self, config: EmailConfig) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        match self.send(&config).await {
            Ok(()) => {
                info!(
                    server = %config.smtp.server,
                    recipients = config.emails.len(),
                    subject = %config.subject,
                    "email submitted"
                );
                outcome.record(true);
            },
            Err(e) => {
                error!(server = %config.smtp.server, error = %e, "email submission failed");
                outcome.record(false);
            },
        }
        outcome
    }
}
