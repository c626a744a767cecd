//! Standalone type-centric checks, independent of the group pass.
//!
//! These catch stray annotations the group-centric validator never sees: a
//! message-annotated type with no enclosing group, and a field annotation on
//! a member of a type that is not a message. The extraction collaborator
//! feeds every annotated type through here regardless of whether it ended up
//! inside a group record.

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::schema::Location;

/// The facts about one type needed for the stray-message check.
#[derive(Debug, Clone)]
pub struct TypeFacts {
    pub name: String,
    pub location: Location,
    pub has_message_annotation: bool,
    /// Whether the immediately enclosing type is an annotated group.
    pub parent_is_group: bool,
}

/// The facts about one member needed for the stray-field check.
#[derive(Debug, Clone)]
pub struct MemberFacts {
    pub name: String,
    pub location: Location,
    pub has_field_annotation: bool,
    pub enclosing_is_message: bool,
    /// Abstract types are exempt: they cannot be messages themselves but may
    /// declare annotated members for concrete messages to inherit.
    pub enclosing_is_abstract: bool,
}

pub fn analyze_type(facts: &TypeFacts, diagnostics: &mut Vec<Diagnostic>) {
    if facts.has_message_annotation && !facts.parent_is_group {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::MessagesMustBeInsideGroup,
            facts.location.clone(),
            vec![facts.name.clone()],
        ));
    }
}

pub fn analyze_member(facts: &MemberFacts, diagnostics: &mut Vec<Diagnostic>) {
    if !facts.has_field_annotation {
        return;
    }
    if !facts.enclosing_is_abstract && !facts.enclosing_is_message {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::FieldsMustBeInsideMessage,
            facts.location.clone(),
            vec![facts.name.clone()],
        ));
    }
}
