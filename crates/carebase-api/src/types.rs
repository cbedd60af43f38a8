//! Request/Response DTOs

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

// ==================== Status Envelope ====================

/// Outcome indicator carried by every envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Empty payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoPayload {}

/// Generic status envelope
///
/// The payload's fields are flattened next to `status`, so
/// `StatusResponse::with_payload(forms)` serializes as
/// `{"status": "ok", "patientId": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse<T = NoPayload> {
    pub status: ResponseStatus,
    #[serde(flatten)]
    pub payload: T,
}

impl StatusResponse<NoPayload> {
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Ok,
            payload: NoPayload {},
        }
    }
}

impl<T> StatusResponse<T> {
    pub fn with_payload(payload: T) -> Self {
        Self {
            status: ResponseStatus::Ok,
            payload,
        }
    }

    /// Envelope for a failed request; `payload` describes the failure
    pub fn failure(payload: T) -> Self {
        Self {
            status: ResponseStatus::Error,
            payload,
        }
    }
}

impl<T: Serialize> IntoResponse for StatusResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

// ==================== Form Status Types ====================

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormStatusError {
    #[error("Form type {0} is both pending and completed")]
    ConflictingStatus(String),

    #[error("Form type {0} is listed more than once")]
    Duplicate(String),
}

/// Progress of one form type for one patient, as classified upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormProgress {
    NotStarted,
    Pending { missing_fields: Vec<String> },
    Completed,
}

/// A form that has been started but still lacks required fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingForm {
    pub form_type: String,
    pub missing_fields: Vec<String>,
}

/// Per-patient form status
///
/// A form type appears in at most one of `pending_forms` and
/// `completed_forms`. Forms that were never started appear in neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientFormsStatus {
    pub patient_id: i64,
    pub pending_forms: Vec<PendingForm>,
    pub completed_forms: Vec<String>,
}

impl PatientFormsStatus {
    /// Build the status from per-form progress, preserving input order
    ///
    /// A pending form with no missing fields counts as completed.
    pub fn from_progress<I, S>(patient_id: i64, forms: I) -> Result<Self, FormStatusError>
    where
        I: IntoIterator<Item = (S, FormProgress)>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut status = Self {
            patient_id,
            pending_forms: Vec::new(),
            completed_forms: Vec::new(),
        };

        for (form_type, progress) in forms {
            let form_type = form_type.into();
            if !seen.insert(form_type.clone()) {
                return Err(FormStatusError::Duplicate(form_type));
            }

            match progress {
                FormProgress::NotStarted => {}
                FormProgress::Pending { missing_fields } if !missing_fields.is_empty() => {
                    status.pending_forms.push(PendingForm {
                        form_type,
                        missing_fields,
                    });
                }
                FormProgress::Pending { .. } | FormProgress::Completed => {
                    status.completed_forms.push(form_type);
                }
            }
        }

        Ok(status)
    }

    /// Check that no form type is listed twice or in both lists
    pub fn validate(&self) -> Result<(), FormStatusError> {
        let mut pending = HashSet::new();
        for form in &self.pending_forms {
            if !pending.insert(form.form_type.as_str()) {
                return Err(FormStatusError::Duplicate(form.form_type.clone()));
            }
        }

        let mut completed = HashSet::new();
        for form_type in &self.completed_forms {
            if pending.contains(form_type.as_str()) {
                return Err(FormStatusError::ConflictingStatus(form_type.clone()));
            }
            if !completed.insert(form_type.as_str()) {
                return Err(FormStatusError::Duplicate(form_type.clone()));
            }
        }

        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.pending_forms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forms_status_classification() {
        let status = PatientFormsStatus::from_progress(
            9,
            [
                ("A", FormProgress::Completed),
                (
                    "B",
                    FormProgress::Pending {
                        missing_fields: vec!["signature".to_string()],
                    },
                ),
                ("C", FormProgress::NotStarted),
            ],
        )
        .unwrap();

        assert_eq!(status.completed_forms, vec!["A"]);
        assert_eq!(
            status.pending_forms,
            vec![PendingForm {
                form_type: "B".to_string(),
                missing_fields: vec!["signature".to_string()],
            }]
        );
        assert!(status.validate().is_ok());
        assert!(!status.is_complete());

        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({
                "patientId": 9,
                "pendingForms": [{"formType": "B", "missingFields": ["signature"]}],
                "completedForms": ["A"]
            })
        );
    }

    #[test]
    fn test_pending_without_missing_fields_is_completed() {
        let status = PatientFormsStatus::from_progress(
            1,
            [(
                "intake".to_string(),
                FormProgress::Pending {
                    missing_fields: vec![],
                },
            )],
        )
        .unwrap();

        assert_eq!(status.completed_forms, vec!["intake"]);
        assert!(status.is_complete());
    }

    #[test]
    fn test_duplicate_form_type_rejected() {
        let err = PatientFormsStatus::from_progress(
            1,
            [("A", FormProgress::Completed), ("A", FormProgress::NotStarted)],
        )
        .unwrap_err();
        assert_eq!(err, FormStatusError::Duplicate("A".to_string()));
    }

    #[test]
    fn test_validate_rejects_conflicting_status() {
        let status: PatientFormsStatus = serde_json::from_value(json!({
            "patientId": 3,
            "pendingForms": [{"formType": "A", "missingFields": ["dob"]}],
            "completedForms": ["A"]
        }))
        .unwrap();

        assert_eq!(
            status.validate().unwrap_err(),
            FormStatusError::ConflictingStatus("A".to_string())
        );

        let duplicated = PatientFormsStatus {
            patient_id: 3,
            pending_forms: vec![],
            completed_forms: vec!["consent".to_string(), "consent".to_string()],
        };
        assert_eq!(
            duplicated.validate().unwrap_err(),
            FormStatusError::Duplicate("consent".to_string())
        );
    }

    #[test]
    fn test_status_envelope() {
        assert_eq!(
            serde_json::to_value(StatusResponse::ok()).unwrap(),
            json!({"status": "ok"})
        );

        let status = PatientFormsStatus {
            patient_id: 5,
            pending_forms: vec![],
            completed_forms: vec!["consent".to_string()],
        };
        let envelope = StatusResponse::with_payload(status.clone());
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["completedForms"], json!(["consent"]));

        let parsed: StatusResponse<PatientFormsStatus> = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.status, ResponseStatus::Ok);
        assert_eq!(parsed.payload, status);

        let failed = StatusResponse::failure(NoPayload {});
        assert_eq!(failed.status, ResponseStatus::Error);
        assert_eq!(serde_json::to_value(&failed).unwrap(), json!({"status": "error"}));
    }
}
