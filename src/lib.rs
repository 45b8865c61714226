pub mod config;
pub mod dates;
pub mod directory;
mod error;
pub mod fonts;
pub mod forms;
pub mod model;
pub mod pdf;
pub mod portal;
pub mod records;
pub mod router;
pub mod submission;
pub mod validation;

pub use config::Settings;
pub use error::Error;
pub use forms::{
    generate_blank_form, generate_filled_document, generate_filled_document_at,
    generate_filled_document_bytes, generate_filled_document_bytes_at,
};
pub use model::OnboardingRecord;
pub use router::{Mount, Outcome, RouteOptions, Router, RouterError};
