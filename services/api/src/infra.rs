use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clinic_forms::config::AppConfig;
use clinic_forms::forms::consent::{
    ConsentFormService, ConsentLayout, ConsentRecipients, FsTemplateStore,
};
use clinic_forms::forms::contact::{ContactFormService, ContactRecipients};
use clinic_forms::forms::mail::EmailDispatcher;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn consent_recipients(config: &AppConfig) -> ConsentRecipients {
    ConsentRecipients {
        from: config.mail.from.clone(),
        to: config.recipients.consent_to.clone(),
        bcc: config.recipients.consent_bcc.clone(),
    }
}

pub(crate) fn contact_recipients(config: &AppConfig) -> ContactRecipients {
    ContactRecipients {
        from: config.mail.from.clone(),
        to: config.recipients.contact_to.clone(),
    }
}

/// Both form services sharing one outbound dispatcher.
pub(crate) fn form_services<D>(
    config: &AppConfig,
    dispatcher: Arc<D>,
) -> (
    Arc<ConsentFormService<FsTemplateStore, D>>,
    Arc<ContactFormService<D>>,
)
where
    D: EmailDispatcher + 'static,
{
    let templates = Arc::new(FsTemplateStore::from_config(&config.template));
    let consent = ConsentFormService::new(
        templates,
        Arc::clone(&dispatcher),
        ConsentLayout::standard(),
        consent_recipients(config),
    );
    let contact = ContactFormService::new(dispatcher, contact_recipients(config));
    (Arc::new(consent), Arc::new(contact))
}
