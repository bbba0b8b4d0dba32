use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use ts_rs::TS;

/// Minimum length accepted for a contact phone number.
pub const MIN_PHONE_NUMBER_LEN: usize = 10;

/// Summary stored in `information` when a profile carries no structured data.
pub const EMPTY_PROFILE_SUMMARY: &str = "No structured information provided";

/// One patient's structured intake profile (`user_information` row).
///
/// Every descriptive field is optional; an absent value is `None`, never an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientProfile {
    pub user_id: String,
    pub information: String,
    pub phone_number: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub relationship_status: Option<String>,
    pub living_situation: Option<String>,
    pub mental_health_diagnosis: Option<String>,
    pub therapy_history: Option<String>,
    pub psychiatric_medication: Option<String>,
    pub mental_health_hospitalization: Option<String>,
    pub past_self_harm_thoughts: Option<String>,
    pub current_self_harm_thoughts: Option<String>,
    pub additional_info: Option<String>,
    pub updated_at: jiff::Timestamp,
}

/// The writable part of a profile, as submitted by the profile editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub information: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub relationship_status: Option<String>,
    pub living_situation: Option<String>,
    pub mental_health_diagnosis: Option<String>,
    pub therapy_history: Option<String>,
    pub psychiatric_medication: Option<String>,
    pub mental_health_hospitalization: Option<String>,
    pub past_self_harm_thoughts: Option<String>,
    pub current_self_harm_thoughts: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Either information field or structured data is required")]
    Empty,

    #[error("Phone number must be a string")]
    PhoneNumberType,

    #[error("Phone number must be at least 10 characters long")]
    PhoneNumberTooShort,

    #[error("Invalid user information payload: {0} must be a string")]
    FieldType(&'static str),
}

/// Trim a submitted value; blank input is stored as null.
pub fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ProfileUpdate {
    /// Parse and validate a raw save request.
    ///
    /// Values are trimmed and blanks become `None` before validation, so a
    /// whitespace-only field counts as absent.
    pub fn from_value(body: &Value) -> Result<Self, ProfileError> {
        let object = body.as_object().ok_or(ProfileError::NotAnObject)?;

        let text = |name: &'static str| -> Result<Option<String>, ProfileError> {
            match object.get(name) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(blank_to_none(Some(s))),
                Some(_) => Err(ProfileError::FieldType(name)),
            }
        };

        let phone_number = match object.get("phone_number") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => blank_to_none(Some(s)),
            Some(_) => None,
        };

        let update = Self {
            information: text("information")?,
            phone_number,
            age: text("age")?,
            gender: text("gender")?,
            occupation: text("occupation")?,
            relationship_status: text("relationship_status")?,
            living_situation: text("living_situation")?,
            mental_health_diagnosis: text("mental_health_diagnosis")?,
            therapy_history: text("therapy_history")?,
            psychiatric_medication: text("psychiatric_medication")?,
            mental_health_hospitalization: text("mental_health_hospitalization")?,
            past_self_harm_thoughts: text("past_self_harm_thoughts")?,
            current_self_harm_thoughts: text("current_self_harm_thoughts")?,
            additional_info: text("additional_info")?,
        };

        if update.information.is_none() && !update.has_structured_data() {
            return Err(ProfileError::Empty);
        }

        if let Some(raw) = object.get("phone_number")
            && !raw.is_null()
            && !raw.is_string()
        {
            return Err(ProfileError::PhoneNumberType);
        }

        if let Some(phone) = &update.phone_number
            && phone.chars().count() < MIN_PHONE_NUMBER_LEN
        {
            return Err(ProfileError::PhoneNumberTooShort);
        }

        Ok(update)
    }

    /// Whether any demographic or clinical field is present. The phone
    /// number alone does not count.
    pub fn has_structured_data(&self) -> bool {
        [
            &self.age,
            &self.gender,
            &self.occupation,
            &self.relationship_status,
            &self.living_situation,
            &self.mental_health_diagnosis,
            &self.therapy_history,
            &self.psychiatric_medication,
            &self.mental_health_hospitalization,
            &self.past_self_harm_thoughts,
            &self.current_self_harm_thoughts,
            &self.additional_info,
        ]
        .iter()
        .any(|field| field.is_some())
    }

    /// Labelled one-line-per-field digest of the structured data.
    pub fn information_summary(&self) -> String {
        let labelled = [
            ("Age", &self.age),
            ("Gender", &self.gender),
            ("Occupation", &self.occupation),
            ("Relationship Status", &self.relationship_status),
            ("Living Situation", &self.living_situation),
            ("Phone", &self.phone_number),
            ("Mental Health Diagnosis", &self.mental_health_diagnosis),
            ("Therapy History", &self.therapy_history),
            ("Psychiatric Medication", &self.psychiatric_medication),
            ("Mental Health Hospitalization", &self.mental_health_hospitalization),
            ("Past Self-Harm Thoughts", &self.past_self_harm_thoughts),
            ("Current Self-Harm Thoughts", &self.current_self_harm_thoughts),
            ("Additional Info", &self.additional_info),
        ];

        let parts: Vec<String> = labelled
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
            .collect();

        if parts.is_empty() {
            EMPTY_PROFILE_SUMMARY.to_string()
        } else {
            parts.join("\n")
        }
    }

    /// The `information` text to persist: the submitted text if any,
    /// otherwise the structured summary.
    pub fn resolved_information(&self) -> String {
        self.information
            .clone()
            .unwrap_or_else(|| self.information_summary())
    }
}

/// Form-layer view of a profile. Every field is a plain string; the empty
/// string stands for "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfileForm {
    pub age: String,
    pub gender: String,
    pub occupation: String,
    pub relationship_status: String,
    pub living_situation: String,
    pub phone_number: String,
    pub mental_health_diagnosis: String,
    pub therapy_history: String,
    pub psychiatric_medication: String,
    pub mental_health_hospitalization: String,
    pub past_self_harm_thoughts: String,
    pub current_self_harm_thoughts: String,
    pub additional_info: String,
}

impl From<&PatientProfile> for ProfileForm {
    fn from(profile: &PatientProfile) -> Self {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            age: field(&profile.age),
            gender: field(&profile.gender),
            occupation: field(&profile.occupation),
            relationship_status: field(&profile.relationship_status),
            living_situation: field(&profile.living_situation),
            phone_number: field(&profile.phone_number),
            mental_health_diagnosis: field(&profile.mental_health_diagnosis),
            therapy_history: field(&profile.therapy_history),
            psychiatric_medication: field(&profile.psychiatric_medication),
            mental_health_hospitalization: field(&profile.mental_health_hospitalization),
            past_self_harm_thoughts: field(&profile.past_self_harm_thoughts),
            current_self_harm_thoughts: field(&profile.current_self_harm_thoughts),
            additional_info: field(&profile.additional_info),
        }
    }
}

impl ProfileForm {
    /// Convert the form into a save request, mapping blank fields to null.
    pub fn to_update(&self) -> ProfileUpdate {
        let field = |v: &String| blank_to_none(Some(v));
        ProfileUpdate {
            information: None,
            phone_number: field(&self.phone_number),
            age: field(&self.age),
            gender: field(&self.gender),
            occupation: field(&self.occupation),
            relationship_status: field(&self.relationship_status),
            living_situation: field(&self.living_situation),
            mental_health_diagnosis: field(&self.mental_health_diagnosis),
            therapy_history: field(&self.therapy_history),
            psychiatric_medication: field(&self.psychiatric_medication),
            mental_health_hospitalization: field(&self.mental_health_hospitalization),
            past_self_harm_thoughts: field(&self.past_self_harm_thoughts),
            current_self_harm_thoughts: field(&self.current_self_harm_thoughts),
            additional_info: field(&self.additional_info),
        }
    }
}
