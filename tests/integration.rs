//! End-to-end tests: compile schema records into plans, then exercise the
//! wire codec — round trips, atomicity, length prefixes, empty bodies.

use anyhow::Result;
use packetc::{
    compile, CandidateRecord, CodecError, CreationStrategy, DeclaredType, GroupPlan, GroupRecord,
    InitializerRecord, Location, MemberRecord, MessageAnnotation, MessageValue, ParamPassing,
    ParamRecord, TypeKind, Value, Visibility, TAG_LEN,
};

fn loc(start: u32) -> Location {
    Location::new("chat.schema", start, start + 1)
}

fn member(name: &str, start: u32, declared_type: DeclaredType) -> MemberRecord {
    MemberRecord {
        name: name.to_string(),
        location: loc(start),
        declared_type,
        annotation: None,
        setter: Some(Visibility::Public),
        synthesized: false,
    }
}

fn param(name: &str, start: u32, declared_type: DeclaredType) -> ParamRecord {
    ParamRecord {
        name: name.to_string(),
        location: loc(start),
        passing: ParamPassing::Value,
        declared_type,
        annotation: None,
    }
}

fn enum_u8(name: &str) -> DeclaredType {
    DeclaredType::Enum {
        name: name.to_string(),
        underlying: Box::new(DeclaredType::UInt8),
    }
}

fn enum_u32(name: &str) -> DeclaredType {
    DeclaredType::Enum {
        name: name.to_string(),
        underlying: Box::new(DeclaredType::UInt32),
    }
}

/// One group exercising every strategy and wire kind:
/// - `Hello` (id 1): property-initialized, all scalar kinds plus enums.
/// - `Login` (id 2): constructor-initialized, two strings.
/// - `Heartbeat` (id 3): empty body.
fn chat_group() -> GroupRecord {
    let hello = CandidateRecord {
        name: "Hello".to_string(),
        qualified_name: "chat.ChatPackets.Hello".to_string(),
        location: loc(10),
        kind: TypeKind::Struct,
        is_multi_part: false,
        message: Some(MessageAnnotation { id: Some(1) }),
        has_group_annotation: false,
        initializers: vec![InitializerRecord {
            visibility: Visibility::Public,
            params: Vec::new(),
        }],
        members: vec![
            member("Name", 20, DeclaredType::Text),
            member("Flags", 30, DeclaredType::UInt8),
            member("Delta", 40, DeclaredType::Int8),
            member("Port", 50, DeclaredType::UInt16),
            member("Score", 60, DeclaredType::Int32),
            member("Session", 70, DeclaredType::UInt64),
            member("Color", 80, enum_u8("Color")),
            member("Mode", 90, enum_u32("Mode")),
        ],
    };
    let login = CandidateRecord {
        name: "Login".to_string(),
        qualified_name: "chat.ChatPackets.Login".to_string(),
        location: loc(100),
        kind: TypeKind::Class,
        is_multi_part: false,
        message: Some(MessageAnnotation { id: Some(2) }),
        has_group_annotation: false,
        initializers: vec![InitializerRecord {
            visibility: Visibility::Public,
            params: vec![
                param("name", 110, DeclaredType::Text),
                param("password", 120, DeclaredType::Text),
            ],
        }],
        members: Vec::new(),
    };
    let heartbeat = CandidateRecord {
        name: "Heartbeat".to_string(),
        qualified_name: "chat.ChatPackets.Heartbeat".to_string(),
        location: loc(130),
        kind: TypeKind::Struct,
        is_multi_part: false,
        message: Some(MessageAnnotation { id: Some(3) }),
        has_group_annotation: false,
        initializers: vec![InitializerRecord {
            visibility: Visibility::Public,
            params: Vec::new(),
        }],
        members: Vec::new(),
    };

    GroupRecord {
        name: "ChatPackets".to_string(),
        namespace: vec!["chat".to_string()],
        modifiers: "pub".to_string(),
        hierarchy: Vec::new(),
        location: loc(0),
        is_static: true,
        is_multi_part: true,
        has_message_annotation: false,
        enclosing_group: None,
        members: vec![hello, login, heartbeat],
    }
}

fn chat_plan() -> GroupPlan {
    let out = compile(&[chat_group()]);
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    out.plans.into_iter().next().expect("one group plan")
}

fn hello_value() -> MessageValue {
    MessageValue::properties([
        ("Name", Value::Str("alice".to_string())),
        ("Flags", Value::U8(0b1010_0001)),
        ("Delta", Value::I8(-4)),
        ("Port", Value::U16(9000)),
        ("Score", Value::I32(-123_456)),
        ("Session", Value::U64(0xDEAD_BEEF_CAFE_F00D)),
        ("Color", Value::U8(2)),
        ("Mode", Value::U32(7)),
    ])
}

#[test]
fn property_message_round_trips() -> Result<()> {
    let plan = chat_plan();
    let hello = plan.message(1).expect("hello plan");
    let value = hello_value();

    let bytes = hello.encode(&value)?;
    let mut pos = TAG_LEN;
    let decoded = hello.decode(&bytes, &mut pos)?;

    assert_eq!(decoded, value);
    assert_eq!(pos, bytes.len(), "decode must consume exactly the body");
    Ok(())
}

#[test]
fn constructor_message_round_trips_positionally() -> Result<()> {
    let plan = chat_plan();
    let login = plan.message(2).expect("login plan");
    assert_eq!(login.strategy, CreationStrategy::ConstructorInitialized);

    let value = MessageValue::Constructor(vec![
        Value::Str("bob".to_string()),
        Value::Str("hunter2".to_string()),
    ]);
    let bytes = login.encode(&value)?;
    let mut pos = TAG_LEN;
    let decoded = login.decode(&bytes, &mut pos)?;
    assert_eq!(decoded, value);
    Ok(())
}

#[test]
fn identity_tag_is_four_bytes_little_endian() -> Result<()> {
    let plan = chat_plan();
    let heartbeat = plan.message(3).expect("heartbeat plan");
    let bytes = heartbeat.encode(&MessageValue::Empty)?;
    assert_eq!(bytes, [3, 0, 0, 0]);
    Ok(())
}

#[test]
fn empty_body_decodes_from_nothing() -> Result<()> {
    let plan = chat_plan();
    let heartbeat = plan.message(3).expect("heartbeat plan");
    assert!(!heartbeat.has_body);

    let mut pos = 0;
    let decoded = heartbeat.decode(&[], &mut pos)?;
    assert_eq!(decoded, MessageValue::Empty);
    assert_eq!(pos, 0);
    Ok(())
}

#[test]
fn string_wire_layout_is_length_prefixed_utf8() -> Result<()> {
    let plan = chat_plan();
    let login = plan.message(2).expect("login plan");
    let value = MessageValue::Constructor(vec![
        Value::Str("ab".to_string()),
        Value::Str("".to_string()),
    ]);
    let bytes = login.encode(&value)?;
    // tag, then "ab" (len 2), then "" (len 0), nothing else
    assert_eq!(&bytes[TAG_LEN..], [2, 0, b'a', b'b', 0, 0]);
    Ok(())
}

#[test]
fn truncation_anywhere_fails_and_leaves_the_cursor_alone() -> Result<()> {
    let plan = chat_plan();
    let hello = plan.message(1).expect("hello plan");
    let bytes = hello.encode(&hello_value())?;
    let body = &bytes[TAG_LEN..];

    for cut in 0..body.len() {
        let mut pos = 0;
        let result = hello.decode(&body[..cut], &mut pos);
        assert!(result.is_err(), "decode must fail at cut {cut}");
        assert_eq!(pos, 0, "cursor must not move on failure at cut {cut}");
    }
    Ok(())
}

#[test]
fn failed_decode_preserves_a_preceding_sentinel_position() -> Result<()> {
    let plan = chat_plan();
    let hello = plan.message(1).expect("hello plan");
    let bytes = hello.encode(&hello_value())?;
    let body = &bytes[TAG_LEN..];

    // A sentinel byte sits ahead of a truncated message in one buffer.
    let mut buffer = vec![0xAB];
    buffer.extend_from_slice(&body[..body.len() - 1]);

    let mut pos = 0;
    assert_eq!(buffer[pos], 0xAB);
    pos += 1;

    let sentinel_pos = pos;
    assert!(hello.decode(&buffer, &mut pos).is_err());
    assert_eq!(pos, sentinel_pos);

    // Once the missing bytes arrive, the same read succeeds from the same spot.
    buffer.push(body[body.len() - 1]);
    let decoded = hello.decode(&buffer, &mut pos)?;
    assert_eq!(decoded, hello_value());
    assert_eq!(pos, buffer.len());
    Ok(())
}

#[test]
fn decode_stops_exactly_at_the_message_end() -> Result<()> {
    let plan = chat_plan();
    let login = plan.message(2).expect("login plan");
    let value = MessageValue::Constructor(vec![
        Value::Str("a".to_string()),
        Value::Str("b".to_string()),
    ]);
    let mut bytes = login.encode(&value)?;
    let body_len = bytes.len() - TAG_LEN;
    bytes.extend_from_slice(&[9, 9, 9, 9]); // trailing garbage from the next message

    let mut pos = TAG_LEN;
    login.decode(&bytes, &mut pos)?;
    assert_eq!(pos, TAG_LEN + body_len);
    Ok(())
}

#[test]
fn oversized_string_fails_encode_without_output() {
    let plan = chat_plan();
    let login = plan.message(2).expect("login plan");
    let value = MessageValue::Constructor(vec![
        Value::Str("x".repeat(70_000)),
        Value::Str("ok".to_string()),
    ]);
    match login.encode(&value) {
        Err(CodecError::StringTooLong { field, len }) => {
            assert_eq!(field, "name");
            assert_eq!(len, 70_000);
        }
        other => panic!("expected StringTooLong, got {other:?}"),
    }
}

#[test]
fn string_at_the_length_limit_still_encodes() -> Result<()> {
    let plan = chat_plan();
    let login = plan.message(2).expect("login plan");
    let value = MessageValue::Constructor(vec![
        Value::Str("x".repeat(u16::MAX as usize)),
        Value::Str(String::new()),
    ]);
    let bytes = login.encode(&value)?;
    let mut pos = TAG_LEN;
    assert_eq!(login.decode(&bytes, &mut pos)?, value);
    Ok(())
}

#[test]
fn enum_round_trips_tags_with_no_named_case() -> Result<()> {
    let plan = chat_plan();
    let hello = plan.message(1).expect("hello plan");
    let mut value = hello_value();
    if let MessageValue::Properties(map) = &mut value {
        map.insert("Color".to_string(), Value::U8(0xEE));
        map.insert("Mode".to_string(), Value::U32(0xFFFF_FFFF));
    }
    let bytes = hello.encode(&value)?;
    let mut pos = TAG_LEN;
    assert_eq!(hello.decode(&bytes, &mut pos)?, value);
    Ok(())
}

#[test]
fn malformed_utf8_decodes_with_replacement() -> Result<()> {
    let plan = chat_plan();
    let login = plan.message(2).expect("login plan");
    // name = 2 bytes of invalid UTF-8, password = empty
    let body = [2u8, 0, 0xFF, 0xFE, 0, 0];
    let mut pos = 0;
    let decoded = login.decode(&body, &mut pos)?;
    let MessageValue::Constructor(values) = decoded else {
        panic!("expected positional values");
    };
    assert_eq!(values[0], Value::Str("\u{FFFD}\u{FFFD}".to_string()));
    Ok(())
}

#[test]
fn missing_property_value_is_reported_by_name() {
    let plan = chat_plan();
    let hello = plan.message(1).expect("hello plan");
    let value = MessageValue::properties([("Name", Value::Str("a".to_string()))]);
    match hello.encode(&value) {
        Err(CodecError::MissingField(field)) => assert_eq!(field, "Flags"),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn wrong_arity_and_wrong_shape_are_rejected() {
    let plan = chat_plan();
    let login = plan.message(2).expect("login plan");
    assert!(matches!(
        login.encode(&MessageValue::Constructor(vec![Value::Str("a".to_string())])),
        Err(CodecError::ArityMismatch { expected: 2, got: 1 })
    ));
    assert!(matches!(
        login.encode(&MessageValue::Empty),
        Err(CodecError::StrategyMismatch)
    ));
}

#[test]
fn value_kind_mismatch_is_rejected() {
    let plan = chat_plan();
    let hello = plan.message(1).expect("hello plan");
    let mut value = hello_value();
    if let MessageValue::Properties(map) = &mut value {
        map.insert("Port".to_string(), Value::U32(9000));
    }
    assert!(matches!(
        hello.encode(&value),
        Err(CodecError::ValueMismatch { .. })
    ));
}
