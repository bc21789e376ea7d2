mod core;
mod links;
mod status;
mod submit;
mod types;

pub use self::core::ApiClient;
pub use links::status_url;
pub use types::SubmissionRequest;
