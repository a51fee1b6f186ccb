//! Compiles entered parameter values into a concrete request URL.

use std::sync::LazyLock;

use regex::Regex;

use crate::template::{EndpointTemplate, ParameterLocation, ParameterValues};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}/?&]+\}").expect("valid regex"));

/// Builds the URL a parameter-driven test is sent to.
///
/// For every declared parameter that has a non-empty value:
/// - path parameters replace the first `{name}` and the first `{sample_name}`
///   in the URL with the value as entered;
/// - query parameters append `name=<percent-encoded value>`.
///
/// Query fragments are joined with `&` and attached with `?`, or with `&`
/// when the URL already has a query. Parameters without a value are
/// skipped, so their placeholders stay in the result. Header and cookie
/// parameters do not affect the URL.
#[must_use]
pub fn compile_url(template: &EndpointTemplate, values: &ParameterValues) -> String {
    let mut url = template.url.clone();
    let mut query = Vec::new();

    for parameter in &template.parameters {
        let Some(value) = values.filled(&parameter.name) else {
            continue;
        };
        match parameter.location {
            ParameterLocation::Path => {
                url = url
                    .replacen(&format!("{{{}}}", parameter.name), value, 1)
                    .replacen(&format!("{{sample_{}}}", parameter.name), value, 1);
            }
            ParameterLocation::Query => {
                query.push(format!("{}={}", parameter.name, urlencoding::encode(value)));
            }
            ParameterLocation::Header
            | ParameterLocation::Cookie
            | ParameterLocation::Other => {}
        }
    }

    if !query.is_empty() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&query.join("&"));
    }

    url
}

/// Lists `{...}` placeholders still present in a URL.
#[must_use]
pub fn unresolved_placeholders(url: &str) -> Vec<&str> {
    PLACEHOLDER.find_iter(url).map(|m| m.as_str()).collect()
}
