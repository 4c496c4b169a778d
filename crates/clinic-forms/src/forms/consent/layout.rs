//! Where each consent field lands on the template.
//!
//! Coordinates are PDF points measured from the bottom-left corner of an A4
//! page (595 x 842). Page indices are zero-based.

use super::domain::ConsentFormSubmission;

pub const NON_CONSENT_STATEMENT: &str =
    "I do NOT consent to the collection and use of my health information as described above.";

/// Every scalar field the consent form prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsentField {
    Title,
    GivenNames,
    Surname,
    PreferredName,
    DateOfBirth,
    Gender,
    Email,
    Phone,
    HomePhone,
    Address,
    Suburb,
    State,
    Postcode,
    MedicareNumber,
    ReferenceNumber,
    ExpiryDate,
    DvaNumber,
    HealthFund,
    HealthFundNumber,
    EmergencyContactName,
    EmergencyContactPhone,
    EmergencyContactRelationship,
    Allergies,
    MedicalConditions,
    PreviousSurgeries,
    Smoker,
    Signature,
    SignatureDate,
}

impl ConsentField {
    /// The text drawn for this field. Absent optional values render empty.
    pub fn value(self, submission: &ConsentFormSubmission) -> String {
        let raw = match self {
            ConsentField::Title => &submission.title,
            ConsentField::GivenNames => &submission.given_names,
            ConsentField::Surname => &submission.surname,
            ConsentField::PreferredName => &submission.preferred_name,
            ConsentField::DateOfBirth => &submission.date_of_birth,
            ConsentField::Gender => &submission.gender,
            ConsentField::Email => &submission.email,
            ConsentField::Phone => &submission.phone,
            ConsentField::HomePhone => &submission.home_phone,
            ConsentField::Address => &submission.address,
            ConsentField::Suburb => &submission.suburb,
            ConsentField::State => &submission.state,
            ConsentField::Postcode => &submission.postcode,
            ConsentField::MedicareNumber => &submission.medicare_number,
            ConsentField::ReferenceNumber => &submission.reference_number,
            ConsentField::ExpiryDate => &submission.expiry_date,
            ConsentField::DvaNumber => &submission.dva_number,
            ConsentField::HealthFund => &submission.health_fund,
            ConsentField::HealthFundNumber => &submission.health_fund_number,
            ConsentField::EmergencyContactName => &submission.emergency_contact_name,
            ConsentField::EmergencyContactPhone => &submission.emergency_contact_phone,
            ConsentField::EmergencyContactRelationship => {
                &submission.emergency_contact_relationship
            }
            ConsentField::Allergies => &submission.allergies,
            ConsentField::MedicalConditions => &submission.medical_conditions,
            ConsentField::PreviousSurgeries => &submission.previous_surgeries,
            ConsentField::Smoker => {
                return match submission.smoker {
                    Some(true) => "Yes".to_string(),
                    Some(false) => "No".to_string(),
                    None => String::new(),
                }
            }
            ConsentField::Signature => &submission.signature,
            ConsentField::SignatureDate => &submission.signature_date,
        };
        raw.trim().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPlacement {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

impl FieldPlacement {
    pub const fn new(page: usize, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            page,
            x,
            y,
            font_size,
        }
    }
}

/// Medication rows step down from `base_y`; there is no page overflow handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedicationTable {
    pub page: usize,
    pub name_x: f32,
    pub dosage_x: f32,
    pub base_y: f32,
    pub row_step: f32,
    pub font_size: f32,
}

impl MedicationTable {
    pub fn row_y(&self, index: usize) -> f32 {
        self.base_y - self.row_step * index as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsentLayout {
    pub fields: Vec<(ConsentField, FieldPlacement)>,
    pub medications: MedicationTable,
    pub non_consent: FieldPlacement,
    pub non_consent_text: String,
}

const VALUE_X: f32 = 200.0;
const FIELD_SIZE: f32 = 11.0;

impl ConsentLayout {
    /// Placements matching the shipped `Patient_Consent_Form.pdf`.
    pub fn standard() -> Self {
        use ConsentField::*;

        let details = |y: f32| FieldPlacement::new(0, VALUE_X, y, FIELD_SIZE);
        let history = |y: f32| FieldPlacement::new(1, VALUE_X, y, FIELD_SIZE);

        let fields = vec![
            (Title, details(720.0)),
            (GivenNames, details(700.0)),
            (Surname, details(680.0)),
            (PreferredName, details(660.0)),
            (DateOfBirth, details(640.0)),
            (Gender, details(620.0)),
            (Email, details(580.0)),
            (Phone, details(560.0)),
            (HomePhone, details(540.0)),
            (Address, details(500.0)),
            (Suburb, details(480.0)),
            (State, details(460.0)),
            (Postcode, FieldPlacement::new(0, 420.0, 460.0, FIELD_SIZE)),
            (MedicareNumber, details(400.0)),
            (ReferenceNumber, details(380.0)),
            (ExpiryDate, details(360.0)),
            (DvaNumber, details(340.0)),
            (HealthFund, details(320.0)),
            (HealthFundNumber, details(300.0)),
            (EmergencyContactName, details(250.0)),
            (EmergencyContactPhone, details(230.0)),
            (EmergencyContactRelationship, details(210.0)),
            (Allergies, history(740.0)),
            (MedicalConditions, history(720.0)),
            (PreviousSurgeries, history(700.0)),
            (Smoker, history(680.0)),
            (Signature, history(200.0)),
            (SignatureDate, history(180.0)),
        ];

        Self {
            fields,
            medications: MedicationTable {
                page: 1,
                name_x: 72.0,
                dosage_x: 330.0,
                base_y: 620.0,
                row_step: 16.0,
                font_size: 10.0,
            },
            non_consent: FieldPlacement::new(1, 72.0, 270.0, 10.0),
            non_consent_text: NON_CONSENT_STATEMENT.to_string(),
        }
    }

    /// Highest page index any placement refers to.
    pub fn last_page(&self) -> usize {
        self.fields
            .iter()
            .map(|(_, placement)| placement.page)
            .chain([self.medications.page, self.non_consent.page])
            .max()
            .unwrap_or(0)
    }
}

impl Default for ConsentLayout {
    fn default() -> Self {
        Self::standard()
    }
}
