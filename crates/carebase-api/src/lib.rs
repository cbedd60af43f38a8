//! Carebase API shapes
//!
//! Response envelopes, per-patient form status and the error type
//! handlers return.

pub mod error;
pub mod types;

pub use error::{ApiError, FieldError};
pub use types::{
    FormProgress, FormStatusError, NoPayload, PatientFormsStatus, PendingForm, ResponseStatus,
    StatusResponse,
};
