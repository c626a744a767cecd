//! Shape classification: how a message candidate is constructed.
//!
//! Only initializers declared at public, internal, or protected-internal
//! visibility are counted; all others are ignored, not diagnosed. Value
//! types always implicitly possess a zero-argument initializer, so a struct
//! with exactly one real initializer plus the implicit one still classifies
//! as constructor-initialized instead of being rejected as ambiguous.

use crate::schema::{CandidateRecord, InitializerRecord, TypeKind};

/// The classification outcome, decided once and never re-derived downstream.
#[derive(Debug)]
pub(crate) enum Shape<'a> {
    /// One accessible zero-argument initializer: fields come from assignable
    /// members.
    Properties,
    /// One accessible non-empty initializer: fields come from its parameters
    /// in declaration order.
    Constructor(&'a InitializerRecord),
    /// Any other combination: the candidate is rejected.
    Mismatch,
}

pub(crate) fn classify(candidate: &CandidateRecord) -> Shape<'_> {
    let mut zero_param: Option<&InitializerRecord> = None;
    let mut non_empty: Option<&InitializerRecord> = None;
    let mut count = 0usize;

    for init in &candidate.initializers {
        if !init.visibility.is_accessible() {
            continue;
        }
        if init.params.is_empty() {
            zero_param = Some(init);
        } else {
            non_empty = Some(init);
        }
        count += 1;
    }

    match (candidate.kind, count, zero_param, non_empty) {
        (_, 1, Some(_), None) => Shape::Properties,
        (_, 1, None, Some(ctor)) => Shape::Constructor(ctor),
        (TypeKind::Struct, 2, Some(_), Some(ctor)) => Shape::Constructor(ctor),
        _ => Shape::Mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        DeclaredType, Location, MessageAnnotation, ParamPassing, ParamRecord, Visibility,
    };

    fn param(name: &str) -> ParamRecord {
        ParamRecord {
            name: name.to_string(),
            location: Location::new("pkt.schema", 0, 1),
            passing: ParamPassing::Value,
            declared_type: DeclaredType::UInt8,
            annotation: None,
        }
    }

    fn init(visibility: Visibility, params: Vec<ParamRecord>) -> InitializerRecord {
        InitializerRecord { visibility, params }
    }

    fn candidate(kind: TypeKind, initializers: Vec<InitializerRecord>) -> CandidateRecord {
        CandidateRecord {
            name: "Msg".to_string(),
            qualified_name: "Group.Msg".to_string(),
            location: Location::new("pkt.schema", 0, 1),
            kind,
            is_multi_part: false,
            message: Some(MessageAnnotation { id: Some(1) }),
            has_group_annotation: false,
            initializers,
            members: Vec::new(),
        }
    }

    #[test]
    fn lone_zero_param_initializer_is_properties() {
        let c = candidate(TypeKind::Class, vec![init(Visibility::Public, Vec::new())]);
        assert!(matches!(classify(&c), Shape::Properties));
    }

    #[test]
    fn lone_non_empty_initializer_is_constructor() {
        let c = candidate(
            TypeKind::Class,
            vec![init(Visibility::Internal, vec![param("a")])],
        );
        let Shape::Constructor(ctor) = classify(&c) else {
            panic!("expected constructor shape");
        };
        assert_eq!(ctor.params.len(), 1);
    }

    #[test]
    fn struct_with_both_uses_the_non_empty_one() {
        let c = candidate(
            TypeKind::Struct,
            vec![
                init(Visibility::Public, Vec::new()),
                init(Visibility::Public, vec![param("a"), param("b"), param("c"), param("d")]),
            ],
        );
        let Shape::Constructor(ctor) = classify(&c) else {
            panic!("expected constructor shape");
        };
        assert_eq!(ctor.params.len(), 4);
    }

    #[test]
    fn class_with_both_is_rejected() {
        let c = candidate(
            TypeKind::Class,
            vec![
                init(Visibility::Public, Vec::new()),
                init(Visibility::Public, vec![param("a"), param("b"), param("c"), param("d")]),
            ],
        );
        assert!(matches!(classify(&c), Shape::Mismatch));
    }

    #[test]
    fn no_accessible_initializers_is_rejected() {
        let c = candidate(TypeKind::Class, vec![init(Visibility::Private, Vec::new())]);
        assert!(matches!(classify(&c), Shape::Mismatch));
    }

    #[test]
    fn inaccessible_initializers_are_not_counted() {
        let c = candidate(
            TypeKind::Class,
            vec![
                init(Visibility::Private, vec![param("a")]),
                init(Visibility::Public, Vec::new()),
            ],
        );
        assert!(matches!(classify(&c), Shape::Properties));
    }
}
