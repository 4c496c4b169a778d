mod common;

use std::sync::Arc;

use clinic_forms::forms::consent::{
    ConsentFormService, ConsentFormSubmission, ConsentLayout, ConsentRecipients, DeliveryStatus,
    FsTemplateStore,
};
use lopdf::Document;

use common::{shipped_template_dir, OfflineDispatcher, RecordingDispatcher};

fn recipients() -> ConsentRecipients {
    ConsentRecipients {
        from: "website@clinic.example".to_string(),
        to: vec!["reception@clinic.example".to_string()],
        bcc: vec!["records@clinic.example".to_string()],
    }
}

fn submission() -> ConsentFormSubmission {
    serde_json::from_value(serde_json::json!({
        "title": "Mr",
        "givenNames": "Tomás",
        "surname": "Ng",
        "dateOfBirth": "1975-02-28",
        "email": "tomas@example.com",
        "phone": "0400 111 222",
        "address": "3 Beach Road",
        "medicareNumber": "3123 45678 2",
        "referenceNumber": "2",
        "expiryDate": "2028-01",
        "smoker": true,
        "medications": [{ "name": "Metformin", "dosage": "500mg twice daily" }],
        "nonConsent": true,
        "signature": "Tomás Ng",
        "signatureDate": "2025-10-02"
    }))
    .expect("submission deserializes")
}

fn service<D>(dispatcher: Arc<D>) -> ConsentFormService<FsTemplateStore, D>
where
    D: clinic_forms::forms::mail::EmailDispatcher + 'static,
{
    let templates = FsTemplateStore::new(
        "Patient_Consent_Form.pdf",
        vec!["does/not/exist".into(), shipped_template_dir()],
    );
    ConsentFormService::new(
        Arc::new(templates),
        dispatcher,
        ConsentLayout::standard(),
        recipients(),
    )
}

#[test]
fn shipped_template_fills_and_emails() {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let outcome = service(Arc::clone(&dispatcher))
        .submit(submission())
        .expect("consent form generated");

    assert_eq!(outcome.delivery, DeliveryStatus::Sent);
    assert_eq!(outcome.document.page_count, 2);
    assert_eq!(outcome.document.filename, "Consent_Form_Tomás_Ng.pdf");

    let doc = Document::load_mem(&outcome.document.bytes).expect("filled form parses");
    assert_eq!(doc.get_pages().len(), 2);

    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "New Patient Consent Form - Tomás Ng");
    assert_eq!(sent[0].attachments[0].content, outcome.document.bytes);
}

#[test]
fn offline_relay_keeps_the_generated_form() {
    let outcome = service(Arc::new(OfflineDispatcher))
        .submit(submission())
        .expect("consent form generated");

    assert!(matches!(outcome.delivery, DeliveryStatus::Failed { .. }));
    assert!(outcome.document.bytes.starts_with(b"%PDF-"));
}
