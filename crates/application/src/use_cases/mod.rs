//! Application use cases (business logic orchestration).

mod load_templates;
mod submit_source;

pub use load_templates::*;
pub use submit_source::*;
