//! Request extractors that validate before a handler runs.

mod validated_json;
mod validated_path;
mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_path::ValidatedPath;
pub use validated_query::ValidatedQuery;

use validator::{ValidationErrors, ValidationErrorsKind};

/// Flatten validation errors, nested structs included, into one message.
///
/// Messages are sorted by field path so the output is stable.
pub(crate) fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, "", &mut messages);
    messages.sort();
    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join(", ")
}

fn collect_messages(errors: &ValidationErrors, prefix: &str, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", path));
                    out.push((path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}
