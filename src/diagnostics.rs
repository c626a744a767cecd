//! Diagnostics collected during schema validation.
//!
//! Validation never throws: every rule violation becomes a [`Diagnostic`]
//! appended to the pass's accumulator, and the offending field, message, or
//! group member is excluded from codec emission. Each diagnostic carries a
//! stable code, the location of the offending declaration, and any related
//! locations (e.g. the first of two fields sharing an explicit order value).

use std::fmt;

use crate::schema::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
}

/// The fourteen diagnostic kinds the validator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticCode {
    GroupMustNotContainNonMessageTypes,
    MessageHasWrongShape,
    DuplicateFieldOrder,
    MultiPartTypeRequiresExplicitOrder,
    MixedImplicitAndExplicitOrder,
    OrderNotSupportedOnConstructorParameters,
    ConstructorParameterMustBeByValue,
    UnsupportedFieldType,
    MessagesMustBeInsideGroup,
    FieldsMustBeInsideMessage,
    TypeMayNotBeMessageAndGroup,
    GroupsMayNotBeNested,
    GroupsMustBeStaticContainers,
    GroupsMustBeMultiPart,
}

impl DiagnosticCode {
    pub fn code_str(self) -> &'static str {
        match self {
            DiagnosticCode::GroupMustNotContainNonMessageTypes => "PKT0001",
            DiagnosticCode::MessageHasWrongShape => "PKT0002",
            DiagnosticCode::DuplicateFieldOrder => "PKT0003",
            DiagnosticCode::MultiPartTypeRequiresExplicitOrder => "PKT0004",
            DiagnosticCode::MixedImplicitAndExplicitOrder => "PKT0005",
            DiagnosticCode::OrderNotSupportedOnConstructorParameters => "PKT0006",
            DiagnosticCode::ConstructorParameterMustBeByValue => "PKT0007",
            DiagnosticCode::UnsupportedFieldType => "PKT0008",
            DiagnosticCode::MessagesMustBeInsideGroup => "PKT0009",
            DiagnosticCode::FieldsMustBeInsideMessage => "PKT0010",
            DiagnosticCode::TypeMayNotBeMessageAndGroup => "PKT0011",
            DiagnosticCode::GroupsMayNotBeNested => "PKT0012",
            DiagnosticCode::GroupsMustBeStaticContainers => "PKT0013",
            DiagnosticCode::GroupsMustBeMultiPart => "PKT0014",
        }
    }

    /// Message template; `{0}`, `{1}`, ... are replaced by the arguments.
    pub fn message_template(self) -> &'static str {
        match self {
            DiagnosticCode::GroupMustNotContainNonMessageTypes => {
                "packet groups must not contain non-message types, but `{0}` has no message annotation"
            }
            DiagnosticCode::MessageHasWrongShape => {
                "message `{0}` does not have a supported shape (zero-argument, single-initializer, or value-type dual-initializer)"
            }
            DiagnosticCode::DuplicateFieldOrder => {
                "field `{0}` has the same explicit order value as field `{1}`"
            }
            DiagnosticCode::MultiPartTypeRequiresExplicitOrder => {
                "field `{0}` is declared in a multi-part type and must use explicit ordering"
            }
            DiagnosticCode::MixedImplicitAndExplicitOrder => {
                "message `{0}` mixes implicit and explicit field ordering"
            }
            DiagnosticCode::OrderNotSupportedOnConstructorParameters => {
                "explicit order is not supported on constructor parameter `{0}`"
            }
            DiagnosticCode::ConstructorParameterMustBeByValue => {
                "constructor parameter `{0}` must be passed by value, not `{1}`"
            }
            DiagnosticCode::UnsupportedFieldType => {
                "field `{0}` has unsupported type `{1}`"
            }
            DiagnosticCode::MessagesMustBeInsideGroup => {
                "message `{0}` must be declared inside a packet group"
            }
            DiagnosticCode::FieldsMustBeInsideMessage => {
                "member `{0}` carries a field annotation but its type is not a message"
            }
            DiagnosticCode::TypeMayNotBeMessageAndGroup => {
                "type `{0}` may not be a message and a packet group at once"
            }
            DiagnosticCode::GroupsMayNotBeNested => {
                "packet group `{0}` may not be nested inside packet group `{1}`"
            }
            DiagnosticCode::GroupsMustBeStaticContainers => {
                "packet group `{0}` must be a static class"
            }
            DiagnosticCode::GroupsMustBeMultiPart => {
                "packet group `{0}` must be declared multi-part"
            }
        }
    }
}

/// A single collected diagnostic. Purely informational: it carries no
/// control-flow meaning beyond "this unit is excluded from codec emission".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub location: Location,
    pub related: Vec<Location>,
    pub args: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, location: Location, args: Vec<String>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            location,
            related: Vec::new(),
            args,
        }
    }

    pub fn with_related(mut self, related: Location) -> Self {
        self.related.push(related);
        self
    }

    /// Message template with the arguments substituted in.
    pub fn message(&self) -> String {
        let mut out = self.code.message_template().to_string();
        for (i, arg) in self.args.iter().enumerate() {
            out = out.replace(&format!("{{{i}}}"), arg);
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: error: {} ({})",
            self.location,
            self.message(),
            self.code.code_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_substitutes_arguments() {
        let d = Diagnostic::error(
            DiagnosticCode::DuplicateFieldOrder,
            Location::new("chat.schema", 10, 20),
            vec!["Token".to_string(), "Name".to_string()],
        );
        assert_eq!(
            d.message(),
            "field `Token` has the same explicit order value as field `Name`"
        );
    }

    #[test]
    fn display_includes_code_and_location() {
        let d = Diagnostic::error(
            DiagnosticCode::GroupsMustBeStaticContainers,
            Location::new("chat.schema", 0, 5),
            vec!["ChatPackets".to_string()],
        );
        let rendered = d.to_string();
        assert!(rendered.contains("PKT0013"), "{rendered}");
        assert!(rendered.contains("chat.schema:0..5"), "{rendered}");
    }
}
