use validator::{ValidationErrors, ValidationErrorsKind};

/// Result of shape-level checks on an inbound payload: malformed JSON,
/// wrong types, out-of-bounds lengths declared on the DTO.
///
/// Kept separate from business validation; the two only meet in
/// [`shape`](super::shape).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StructuralOutcome {
    #[default]
    Valid,
    Invalid(Vec<String>),
}

impl StructuralOutcome {
    pub fn invalid(errors: Vec<String>) -> Self {
        StructuralOutcome::Invalid(errors)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, StructuralOutcome::Valid)
    }

    pub fn errors(&self) -> &[String] {
        match self {
            StructuralOutcome::Valid => &[],
            StructuralOutcome::Invalid(errors) => errors,
        }
    }
}

impl From<Result<(), ValidationErrors>> for StructuralOutcome {
    fn from(result: Result<(), ValidationErrors>) -> Self {
        match result {
            Ok(()) => StructuralOutcome::Valid,
            Err(errors) => StructuralOutcome::Invalid(flatten(&errors)),
        }
    }
}

// Field order from `validator` is a hash map; sort so responses are stable.
// Nested structs contribute their messages under a `parent.` prefix.
fn flatten(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    let mut fields: Vec<_> = errors
        .errors()
        .iter()
        .map(|(field, kind)| (format!("{}{}", prefix, field), kind))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid ({})", field, err.code),
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect(nested, &format!("{}.", field), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{}[{}].", field, index), out);
                }
            }
        }
    }
}
