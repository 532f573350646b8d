pub mod repository_name;

pub use repository_name::{NameValidation, sanitize_repository_name, validate_repository_name};
