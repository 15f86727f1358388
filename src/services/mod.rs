pub mod export_service;
pub mod form_service;
pub mod submission_service;

pub use export_service::*;
pub use form_service::*;
pub use submission_service::*;
