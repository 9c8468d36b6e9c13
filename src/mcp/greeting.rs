//! The `greeting://{name}` resource template.
//!
//! A pure text resource with no store access.

use percent_encoding::percent_decode_str;
use rmcp::model::{
    AnnotateAble, RawResourceTemplate, ReadResourceResult, ResourceContents, ResourceTemplate,
};

const GREETING_SCHEME: &str = "greeting://";

#[must_use]
pub fn greeting(name: &str) -> String {
    format!("Hello, {name}! How can I assist you with leave management today?")
}

#[must_use]
pub fn greeting_template() -> ResourceTemplate {
    RawResourceTemplate {
        uri_template: format!("{GREETING_SCHEME}{{name}}"),
        name: "greeting".to_string(),
        title: Some("Personalized Greeting".to_string()),
        description: Some("Get a personalized greeting".to_string()),
        mime_type: Some("text/plain".to_string()),
    }
    .no_annotation()
}

/// Resolves a `greeting://` URI, percent-decoding the name. `None` when the
/// URI is not a greeting, has no name, or the name is not valid UTF-8.
#[must_use]
pub fn read_greeting(uri: &str) -> Option<ReadResourceResult> {
    let raw = uri.strip_prefix(GREETING_SCHEME)?;
    let name = percent_decode_str(raw).decode_utf8().ok()?;
    if name.trim().is_empty() {
        return None;
    }
    Some(ReadResourceResult {
        contents: vec![ResourceContents::text(greeting(&name), uri)],
    })
}
