//! Field discovery and order resolution for property-initialized messages.
//!
//! Two competing conventions decide the final linear order of a message's
//! fields: explicit order values from the field annotation, and implicit
//! declaration position. Explicit order is the programmer's authoritative
//! contract across fragments of a multi-part type, where source position is
//! meaningless; implicit order falls back to declaration position, the only
//! stable signal for single-fragment types. Mixing the two in one message is
//! an error.
//!
//! All ordering state lives in two maps scoped to a single call and is
//! discarded once the final field sequence is produced.

use std::collections::BTreeMap;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::schema::{CandidateRecord, DeclaredType, FieldAnnotation, FieldSchema, Location};
use crate::wire;

/// Outcome of resolving a candidate's assignable members into fields.
#[derive(Debug)]
pub(crate) enum FieldResolution {
    /// One or more rules failed; diagnostics were recorded and the message
    /// is excluded from emission.
    Skip,
    /// No assignable members at all: the message has an empty body.
    Empty,
    /// The final field sequence, in resolved order.
    Fields(Vec<FieldSchema>),
}

/// Build a field from one declaration, or diagnose its type and drop it.
pub(crate) fn field_info(
    name: &str,
    location: &Location,
    declared: &DeclaredType,
    annotation: Option<&FieldAnnotation>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<FieldSchema> {
    let order = annotation.and_then(|a| a.order);
    match wire::resolve(declared) {
        Some(wire) => Some(FieldSchema {
            name: name.to_string(),
            order,
            wire,
        }),
        None => {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::UnsupportedFieldType,
                location.clone(),
                vec![name.to_string(), declared.to_string()],
            ));
            None
        }
    }
}

/// Resolve the ordered field list of a property-initialized candidate.
///
/// Per-field failures exclude the field and mark the message skipped, but
/// iteration always continues so every diagnostic is collected.
pub(crate) fn resolve_property_fields(
    candidate: &CandidateRecord,
    diagnostics: &mut Vec<Diagnostic>,
) -> FieldResolution {
    let multi_part = candidate.is_multi_part;

    let mut skip = false;
    // Multi-part declarations commit to explicit ordering up front.
    let mut using_explicit = multi_part;
    let mut explicit: BTreeMap<i32, (FieldSchema, Location)> = BTreeMap::new();
    let mut implicit: BTreeMap<Location, FieldSchema> = BTreeMap::new();

    for member in &candidate.members {
        if !member.is_field_candidate() {
            continue;
        }

        let Some(field) = field_info(
            &member.name,
            &member.location,
            &member.declared_type,
            member.annotation.as_ref(),
            diagnostics,
        ) else {
            skip = true;
            continue;
        };

        match field.order {
            Some(order) => {
                using_explicit = true;
                if let Some((existing, existing_location)) = explicit.get(&order) {
                    skip = true;
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::DuplicateFieldOrder,
                            member.location.clone(),
                            vec![member.name.clone(), existing.name.clone()],
                        )
                        .with_related(existing_location.clone()),
                    );
                    continue;
                }
                explicit.insert(order, (field, member.location.clone()));
            }
            None if multi_part => {
                skip = true;
                diagnostics.push(Diagnostic::error(
                    DiagnosticCode::MultiPartTypeRequiresExplicitOrder,
                    member.location.clone(),
                    vec![member.name.clone()],
                ));
            }
            None => {
                implicit.insert(member.location.clone(), field);
            }
        }
    }

    // Mixing is judged on what actually landed in each set: a multi-part
    // member that merely *lacked* an order value was already diagnosed above
    // and must not count as implicit ordering here.
    if !explicit.is_empty() && !implicit.is_empty() {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::MixedImplicitAndExplicitOrder,
            candidate.location.clone(),
            vec![candidate.name.clone()],
        ));
        skip = true;
    }

    if skip {
        return FieldResolution::Skip;
    }

    if explicit.is_empty() && implicit.is_empty() {
        return FieldResolution::Empty;
    }

    let fields = if using_explicit {
        explicit.into_values().map(|(field, _)| field).collect()
    } else {
        implicit.into_values().collect()
    };
    FieldResolution::Fields(fields)
}
