//! Endpoint template domain types

mod body;
mod endpoint;
mod header;
mod method;
mod parameter;

pub use body::{TemplateBody, to_display_text, to_wire_value};
pub use endpoint::{EndpointTemplate, TemplateEdit};
pub use header::{TemplateHeader, TemplateHeaders};
pub use method::HttpMethod;
pub use parameter::{ParameterLocation, ParameterSpec, ParameterValues};
