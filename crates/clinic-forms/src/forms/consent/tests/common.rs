use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use crate::forms::consent::domain::{ConsentFormSubmission, Medication};
use crate::forms::consent::layout::ConsentLayout;
use crate::forms::consent::service::{ConsentFormService, ConsentRecipients};
use crate::forms::consent::template::{DocumentTemplateStore, TemplateError};
use crate::forms::mail::EmailDispatcher;

pub(super) fn submission() -> ConsentFormSubmission {
    ConsentFormSubmission {
        title: "Ms".to_string(),
        given_names: "Jane".to_string(),
        surname: "Doe".to_string(),
        preferred_name: "Janey".to_string(),
        date_of_birth: "1988-04-12".to_string(),
        gender: "Female".to_string(),
        email: "jane@example.com".to_string(),
        phone: "0412 345 678".to_string(),
        home_phone: String::new(),
        address: "12 Harbour Street".to_string(),
        suburb: "Woolloomooloo".to_string(),
        state: "NSW".to_string(),
        postcode: "2011".to_string(),
        medicare_number: "2123 45670 1".to_string(),
        reference_number: "1".to_string(),
        expiry_date: "2027-09".to_string(),
        dva_number: String::new(),
        health_fund: "Bupa".to_string(),
        health_fund_number: "88812345".to_string(),
        emergency_contact_name: "John Doe".to_string(),
        emergency_contact_phone: "0498 765 432".to_string(),
        emergency_contact_relationship: "Spouse".to_string(),
        allergies: "Penicillin".to_string(),
        medical_conditions: "Asthma".to_string(),
        previous_surgeries: "Appendectomy (2010)".to_string(),
        smoker: Some(false),
        medications: vec![
            Medication {
                name: "Ventolin".to_string(),
                dosage: "100mcg as needed".to_string(),
            },
            Medication {
                name: "Panadol".to_string(),
                dosage: "500mg".to_string(),
            },
        ],
        non_consent: false,
        signature: "Jane Doe".to_string(),
        signature_date: "2025-10-01".to_string(),
    }
}

pub(super) fn recipients() -> ConsentRecipients {
    ConsentRecipients {
        from: "website@clinic.example".to_string(),
        to: vec!["reception@clinic.example".to_string()],
        bcc: vec!["records@clinic.example".to_string()],
    }
}

/// A blank A4 template with one line of static text per page.
pub(super) fn blank_template(page_count: usize) -> Vec<u8> {
    build_template(page_count, false)
}

/// Same as [`blank_template`] but the font resources live on the page tree node.
pub(super) fn inherited_resources_template(page_count: usize) -> Vec<u8> {
    build_template(page_count, true)
}

fn build_template(page_count: usize, resources_on_parent: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources = dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    };

    let mut kids = Vec::new();
    for index in 0..page_count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(14)],
                ),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(800)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Consent form page {}", index + 1).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("content encodes"),
        ));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
            "Contents" => Object::Reference(content_id),
        };
        if !resources_on_parent {
            page.set("Resources", resources.clone());
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
    };
    if resources_on_parent {
        pages.set("Resources", resources);
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("template saves");
    bytes
}

/// `(x, y, text)` for every `Tj` on the page, in drawing order.
pub(super) fn text_runs(pdf: &[u8], page_index: usize) -> Vec<(f32, f32, String)> {
    let doc = Document::load_mem(pdf).expect("output parses");
    let page_id = *doc
        .get_pages()
        .values()
        .nth(page_index)
        .expect("page exists");
    let raw = doc.get_page_content(page_id).expect("page content");
    let content = Content::decode(&raw).expect("content decodes");

    let mut position = (0.0, 0.0);
    let mut runs = Vec::new();
    for operation in content.operations {
        match operation.operator.as_str() {
            "Td" => {
                position = (
                    operation.operands[0].as_float().expect("x operand"),
                    operation.operands[1].as_float().expect("y operand"),
                );
            }
            "Tj" => {
                let text = operation.operands[0].as_str().expect("string operand");
                runs.push((
                    position.0,
                    position.1,
                    String::from_utf8_lossy(text).into_owned(),
                ));
            }
            _ => {}
        }
    }
    runs
}

pub(super) fn texts(runs: &[(f32, f32, String)]) -> Vec<&str> {
    runs.iter().map(|(_, _, text)| text.as_str()).collect()
}

pub(super) struct MemoryTemplates(pub(super) Vec<u8>);

impl DocumentTemplateStore for MemoryTemplates {
    fn load(&self) -> Result<Vec<u8>, TemplateError> {
        Ok(self.0.clone())
    }
}

pub(super) struct MissingTemplates;

impl DocumentTemplateStore for MissingTemplates {
    fn load(&self) -> Result<Vec<u8>, TemplateError> {
        Err(TemplateError::NotFound {
            file_name: "Patient_Consent_Form.pdf".to_string(),
            searched: vec!["public/forms/Patient_Consent_Form.pdf".into()],
        })
    }
}

pub(super) fn build_service<T, D>(templates: T, mailbox: Arc<D>) -> ConsentFormService<T, D>
where
    T: DocumentTemplateStore + 'static,
    D: EmailDispatcher + 'static,
{
    ConsentFormService::new(
        Arc::new(templates),
        mailbox,
        ConsentLayout::standard(),
        recipients(),
    )
}
