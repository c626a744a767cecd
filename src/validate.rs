//! Schema validation and group compilation.
//!
//! The validator walks each group's candidates, classifies their shape,
//! resolves their fields, and accumulates diagnostics. It never
//! short-circuits: every diagnostic across every member of a group is
//! collected, and whatever subset of messages fully validated is kept. A
//! failure at field granularity excludes that message; a failure at member
//! granularity excludes that member; nothing aborts the group.
//!
//! Codec plans are all-or-nothing per group: a group's plans are emitted
//! only when its diagnostic list came out empty.

use crate::codec::GroupPlan;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::ordering::{self, FieldResolution};
use crate::schema::{
    CandidateRecord, CreationStrategy, FieldSchema, GroupRecord, GroupSchema, InitializerRecord,
    MessageSchema, ParamPassing,
};
use crate::shape::{self, Shape};

/// Result of one compilation pass over a set of group records.
#[derive(Debug)]
pub struct Compilation {
    /// Codec plans for every group whose diagnostic list was empty.
    pub plans: Vec<GroupPlan>,
    /// Every group's validated schema, including groups with diagnostics
    /// (those keep whatever messages survived, but emit no plans).
    pub schemas: Vec<GroupSchema>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Validate and compile a full pass worth of groups.
///
/// Pure: identical input produces identical plans and diagnostics, so a
/// caller may cache results per group.
pub fn compile(groups: &[GroupRecord]) -> Compilation {
    let mut plans = Vec::new();
    let mut schemas = Vec::new();
    let mut diagnostics = Vec::new();

    for group in groups {
        let (schema, group_diagnostics) = validate_group(group);
        if group_diagnostics.is_empty() {
            plans.push(GroupPlan::from_schema(&schema));
        }
        diagnostics.extend(group_diagnostics);
        schemas.push(schema);
    }

    Compilation {
        plans,
        schemas,
        diagnostics,
    }
}

/// Validate one group: group-level rules first, then every candidate.
pub fn validate_group(group: &GroupRecord) -> (GroupSchema, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    if group.has_message_annotation {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::TypeMayNotBeMessageAndGroup,
            group.location.clone(),
            vec![group.name.clone()],
        ));
    }
    if let Some((outer_name, outer_location)) = &group.enclosing_group {
        diagnostics.push(
            Diagnostic::error(
                DiagnosticCode::GroupsMayNotBeNested,
                group.location.clone(),
                vec![group.name.clone(), outer_name.clone()],
            )
            .with_related(outer_location.clone()),
        );
    }
    if !group.is_static {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::GroupsMustBeStaticContainers,
            group.location.clone(),
            vec![group.name.clone()],
        ));
    }
    if !group.is_multi_part {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::GroupsMustBeMultiPart,
            group.location.clone(),
            vec![group.name.clone()],
        ));
    }

    let mut messages = Vec::new();
    for candidate in &group.members {
        if let Some(message) = validate_candidate(candidate, &mut diagnostics) {
            messages.push(message);
        }
    }

    let schema = GroupSchema {
        name: group.name.clone(),
        namespace: group.namespace.clone(),
        modifiers: group.modifiers.clone(),
        hierarchy: group.hierarchy.clone(),
        messages,
    };
    (schema, diagnostics)
}

fn validate_candidate(
    candidate: &CandidateRecord,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<MessageSchema> {
    let Some(annotation) = candidate.message else {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::GroupMustNotContainNonMessageTypes,
            candidate.location.clone(),
            vec![candidate.name.clone()],
        ));
        return None;
    };

    if candidate.has_group_annotation {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::TypeMayNotBeMessageAndGroup,
            candidate.location.clone(),
            vec![candidate.name.clone()],
        ));
        return None;
    }

    // The identity tag is required upstream; a record without one cannot
    // come from valid input and is skipped without a diagnostic.
    let id = annotation.id?;

    match shape::classify(candidate) {
        Shape::Properties => from_properties(candidate, id, diagnostics),
        Shape::Constructor(ctor) => from_constructor(candidate, ctor, id, diagnostics),
        Shape::Mismatch => {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::MessageHasWrongShape,
                candidate.location.clone(),
                vec![candidate.name.clone()],
            ));
            None
        }
    }
}

fn from_properties(
    candidate: &CandidateRecord,
    id: i32,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<MessageSchema> {
    match ordering::resolve_property_fields(candidate, diagnostics) {
        FieldResolution::Skip => None,
        FieldResolution::Empty => Some(MessageSchema {
            name: candidate.name.clone(),
            qualified_name: candidate.qualified_name.clone(),
            id,
            strategy: CreationStrategy::EmptyBody,
            fields: Vec::new(),
        }),
        FieldResolution::Fields(fields) => Some(MessageSchema {
            name: candidate.name.clone(),
            qualified_name: candidate.qualified_name.clone(),
            id,
            strategy: CreationStrategy::PropertyInitialized,
            fields,
        }),
    }
}

fn from_constructor(
    candidate: &CandidateRecord,
    ctor: &InitializerRecord,
    id: i32,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<MessageSchema> {
    let mut fields = Vec::with_capacity(ctor.params.len());
    let mut skip = false;

    for (ordinal, param) in ctor.params.iter().enumerate() {
        if param.passing != ParamPassing::Value {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::ConstructorParameterMustBeByValue,
                param.location.clone(),
                vec![param.name.clone(), param.passing.mode_name().to_string()],
            ));
            skip = true;
            continue;
        }

        let Some(field) = ordering::field_info(
            &param.name,
            &param.location,
            &param.declared_type,
            param.annotation.as_ref(),
            diagnostics,
        ) else {
            skip = true;
            continue;
        };

        if field.order.is_some() {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::OrderNotSupportedOnConstructorParameters,
                param.location.clone(),
                vec![param.name.clone()],
            ));
            skip = true;
            continue;
        }

        fields.push(FieldSchema {
            order: Some(ordinal as i32),
            ..field
        });
    }

    if skip {
        return None;
    }

    Some(MessageSchema {
        name: candidate.name.clone(),
        qualified_name: candidate.qualified_name.clone(),
        id,
        strategy: CreationStrategy::ConstructorInitialized,
        fields,
    })
}
