pub mod form_submissions;
pub mod salesforce_forms;

pub use form_submissions::SubmissionStatus;
