// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════
mod record_tests {
    use crate::codec::{self, CodecOptions};
    use crate::error::RecordError;
    use crate::record::{Record, RecordBuilder};
    use crate::spooky_value::{Mapping, SpookyValue};
    use crate::types::{FieldDescriptor, FieldType, RecordType};
    use crate::value::{RecordValue, Value};
    use std::sync::Arc;

    const TEST_CONTENT: &str = r#"{"field1":"test-value","field2":3,"field3":true}"#;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// A declared record type without tags.
    fn untagged_type() -> Arc<RecordType> {
        Arc::new(
            RecordType::named(
                "TestStructureWithoutTag",
                vec![
                    FieldDescriptor::new("FieLD1", FieldType::Str, ""),
                    FieldDescriptor::new("FielD2", FieldType::I64, ""),
                    FieldDescriptor::new("FIeld3", FieldType::Bool, ""),
                ],
            )
            .unwrap(),
        )
    }

    fn untagged_expected() -> RecordValue {
        RecordValue::from_values(
            untagged_type(),
            vec!["test-value".into(), 3i64.into(), true.into()],
        )
        .unwrap()
    }

    fn profile_type() -> Arc<RecordType> {
        Arc::new(
            RecordType::named(
                "Profile",
                vec![
                    FieldDescriptor::new("Bio", FieldType::Str, "bio-tag"),
                    FieldDescriptor::new("Level", FieldType::U64, "level-tag"),
                ],
            )
            .unwrap(),
        )
    }

    fn user_type() -> Arc<RecordType> {
        Arc::new(
            RecordType::named(
                "User",
                vec![
                    FieldDescriptor::new("Name", FieldType::Str, "name-tag"),
                    FieldDescriptor::new("Tags", FieldType::list(FieldType::Str), ""),
                    FieldDescriptor::new("Profile", FieldType::Record(profile_type()), "p-tag"),
                ],
            )
            .unwrap(),
        )
    }

    fn make_user() -> Value {
        let mut rv = user_type().instantiate();
        rv.set("Name", "Alice").unwrap();
        rv.set("Tags", Value::List(vec!["rust".into()])).unwrap();
        let mut profile = rv.get_record_mut("Profile").unwrap();
        profile.set("Bio", "Developer").unwrap();
        profile.set("Level", 3u64).unwrap();
        Value::Record(rv)
    }

    fn lowercase_tag(name: &str) -> String {
        name.to_lowercase()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Decode → save_into / assign_from → encode
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_synthesized_record_decodes_and_saves_into_flat_record() {
        init_logger();
        let mut record = RecordBuilder::new()
            .add_field("Field1", FieldType::Str, "field1")
            .add_field("Field2", FieldType::I64, "field2")
            .add_field("Field3", FieldType::Bool, "field3")
            .build()
            .unwrap();

        codec::from_json(
            record.current_mut().unwrap(),
            TEST_CONTENT,
            &CodecOptions::whole_tag(),
        )
        .unwrap();

        let flat = Arc::new(
            RecordType::named(
                "Flat",
                vec![
                    FieldDescriptor::new("Field1", FieldType::Str, ""),
                    FieldDescriptor::new("Field2", FieldType::I64, ""),
                    FieldDescriptor::new("Field3", FieldType::Bool, ""),
                ],
            )
            .unwrap(),
        );
        let mut actual = Value::Record(flat.instantiate());
        record.save_into(&mut actual).unwrap();

        let expected = RecordValue::from_values(
            flat,
            vec!["test-value".into(), 3i64.into(), true.into()],
        )
        .unwrap();
        assert_eq!(actual.as_record(), Some(&expected));
    }

    #[test]
    fn test_unmarshal_into_wrapped_instance_with_new_tags() {
        let mut sample = Value::Record(untagged_type().instantiate());
        let mut record = Record::wrap(&mut sample).unwrap();
        record.set_tags(lowercase_tag);

        codec::from_json(
            record.current_mut().unwrap(),
            TEST_CONTENT,
            &CodecOptions::whole_tag(),
        )
        .unwrap();

        let mut actual = Value::Record(untagged_type().instantiate());
        record.save_into(&mut actual).unwrap();
        assert_eq!(actual.as_record(), Some(&untagged_expected()));
    }

    #[test]
    fn test_marshal_after_assign_from_plain_value() {
        let mut sample = Value::Record(untagged_type().instantiate());
        let mut record = Record::wrap(&mut sample).unwrap();
        record.set_tags(lowercase_tag);

        record
            .assign_from(Value::Record(untagged_expected()))
            .unwrap();

        let json = codec::to_json(record.current(), &CodecOptions::whole_tag()).unwrap();
        assert_eq!(json, TEST_CONTENT);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // wrap / current
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_wrap_rejects_plain_values() {
        assert!(matches!(
            Record::wrap(make_user()),
            Err(RecordError::NotAddressable)
        ));
    }

    #[test]
    fn test_wrap_rejects_references_to_non_records() {
        let number = Value::I64(1);
        assert!(matches!(
            Record::wrap(&number),
            Err(RecordError::NeedReference { .. })
        ));
        let mut map = Mapping::new();
        assert!(matches!(
            Record::wrap(&mut map),
            Err(RecordError::NeedReference { .. })
        ));
    }

    #[test]
    fn test_exclusive_wrap_writes_through_to_caller() {
        let mut user = make_user();
        {
            let mut record = Record::wrap(&mut user).unwrap();
            let mut map = Mapping::new();
            map.insert("Name".into(), SpookyValue::from("Bob"));
            record.assign_from(&map).unwrap();
            assert!(record.is_writable());
        }
        let name = user.as_record().and_then(|u| u.get("Name"));
        assert_eq!(name.and_then(Value::as_str), Some("Bob"));
    }

    #[test]
    fn test_shared_wrap_is_read_only() {
        let user = make_user();
        let mut record = Record::wrap(&user).unwrap();
        assert!(!record.is_writable());
        assert_eq!(Some(record.current()), user.as_record());

        assert!(matches!(
            record.current_mut(),
            Err(RecordError::ImmutableDestination)
        ));
        let mut map = Mapping::new();
        map.insert("Name".into(), SpookyValue::from("Bob"));
        assert!(matches!(
            record.assign_from(&map),
            Err(RecordError::ImmutableDestination)
        ));
        // checked before the source shape
        assert!(matches!(
            record.assign_from(Value::Bool(true)),
            Err(RecordError::ImmutableDestination)
        ));
        assert_eq!(Some(record.current()), make_user().as_record());
    }

    #[test]
    fn test_into_value() {
        let user = make_user();
        let record = Record::wrap(&user).unwrap();
        assert_eq!(Some(&record.into_value()), user.as_record());

        let record = Record::from_type(&user_type());
        assert_eq!(record.into_value(), user_type().instantiate());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // rewrite_tags
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_rewrite_tags_preserves_names_order_and_types() {
        init_logger();
        let user = make_user();
        let mut record = Record::wrap(&user).unwrap();
        let before = Arc::clone(record.record_type());

        record.rewrite_tags(|name, old| format!("{name}:{old}"));

        let after = record.record_type();
        assert_eq!(after.len(), before.len());
        assert_eq!(after.name(), None);
        for (new, old) in after.fields().iter().zip(before.fields()) {
            assert_eq!(new.name(), old.name());
            assert_eq!(new.tag(), format!("{}:{}", old.name(), old.tag()));
            if !old.ty().is_record() {
                assert_eq!(new.ty(), old.ty());
            }
        }

        let nested = after.fields()[2].ty().as_record().unwrap();
        let tags: Vec<_> = nested.fields().iter().map(|f| f.tag()).collect();
        assert_eq!(tags, ["Bio:bio-tag", "Level:level-tag"]);
        assert_eq!(nested.fields()[1].ty(), &FieldType::U64);
    }

    #[test]
    fn test_rewrite_tags_visits_fields_once_outer_before_nested() {
        let user = make_user();
        let mut record = Record::wrap(&user).unwrap();
        let mut visited = Vec::new();

        record.rewrite_tags(|name, old| {
            visited.push(name.to_owned());
            old.to_owned()
        });

        assert_eq!(visited, ["Name", "Tags", "Profile", "Bio", "Level"]);
    }

    #[test]
    fn test_rewrite_tags_discards_values() {
        let mut user = make_user();
        let mut record = Record::wrap(&mut user).unwrap();

        record.rewrite_tags(|_, old| old.to_owned());

        let current = record.current();
        assert_eq!(current.get("Name").and_then(Value::as_str), Some(""));
        assert_eq!(current.get("Tags").and_then(Value::as_list), Some(&[][..]));
        let profile = current.get("Profile").and_then(Value::as_record).unwrap();
        assert_eq!(profile.get("Level"), Some(&Value::U64(0)));
        drop(record);

        // the caller's instance is released untouched
        assert_eq!(user, make_user());
    }

    #[test]
    fn test_rewrite_tags_on_shared_wrap_yields_writable_record() {
        let user = make_user();
        let mut record = Record::wrap(&user).unwrap();
        record.set_tags(lowercase_tag);
        assert!(record.is_writable());
        assert!(record.current_mut().is_ok());
    }

    #[test]
    fn test_rewritten_nested_type_no_longer_matches_old_type() {
        let user = make_user();
        let mut record = Record::wrap(&user).unwrap();
        record.set_tags(lowercase_tag);
        record.assign_from(&user).unwrap();

        let current = record.current();
        assert_eq!(current.get("Name").and_then(Value::as_str), Some("Alice"));
        assert_eq!(current.get("Tags"), Some(&Value::List(vec!["rust".into()])));
        // Profile's type now carries different tags, so it is not copied.
        let profile = current.get("Profile").and_then(Value::as_record).unwrap();
        assert_eq!(profile.get("Bio").and_then(Value::as_str), Some(""));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // save_into
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_save_into_mapping_flattens_nested() {
        let user = make_user();
        let record = Record::wrap(&user).unwrap();
        let mut map = Mapping::new();

        record.save_into(&mut map).unwrap();

        assert_eq!(map.get("Name"), Some(&SpookyValue::from("Alice")));
        assert_eq!(
            map.get("Profile").and_then(|p| p.get("Level")),
            Some(&SpookyValue::from(3u64))
        );
    }

    #[test]
    fn test_save_into_rejects_read_only_destinations() {
        let user = make_user();
        let record = Record::wrap(&user).unwrap();

        let map = Mapping::new();
        assert!(matches!(
            record.save_into(&map),
            Err(RecordError::ImmutableDestination)
        ));
        assert!(map.is_empty());

        let dst = Value::Record(user_type().instantiate());
        assert!(matches!(
            record.save_into(&dst),
            Err(RecordError::ImmutableDestination)
        ));
        assert_eq!(dst.as_record(), Some(&user_type().instantiate()));

        assert!(matches!(
            record.save_into(Value::Record(user_type().instantiate())),
            Err(RecordError::ImmutableDestination)
        ));
    }

    #[test]
    fn test_save_into_rejects_non_record_destinations() {
        let user = make_user();
        let record = Record::wrap(&user).unwrap();

        let mut number = Value::I64(7);
        assert!(matches!(
            record.save_into(&mut number),
            Err(RecordError::NotAcceptable)
        ));
        assert_eq!(number, Value::I64(7));
        assert!(matches!(
            record.save_into(&Value::from("text")),
            Err(RecordError::NotAcceptable)
        ));
        assert!(matches!(
            record.save_into(Value::Bool(true)),
            Err(RecordError::NotAcceptable)
        ));
    }

    #[test]
    fn test_save_into_partial_overlap() {
        let user = make_user();
        let record = Record::wrap(&user).unwrap();
        let summary_type = Arc::new(
            RecordType::named(
                "Summary",
                vec![
                    FieldDescriptor::new("Name", FieldType::Str, ""),
                    FieldDescriptor::new("Tags", FieldType::Str, ""),
                    FieldDescriptor::new("Score", FieldType::F64, ""),
                ],
            )
            .unwrap(),
        );
        let mut summary = Value::Record(
            RecordValue::from_values(
                Arc::clone(&summary_type),
                vec!["x".into(), "keep".into(), 1.5f64.into()],
            )
            .unwrap(),
        );

        record.save_into(&mut summary).unwrap();

        let expected = RecordValue::from_values(
            summary_type,
            vec!["Alice".into(), "keep".into(), 1.5f64.into()],
        )
        .unwrap();
        assert_eq!(summary.as_record(), Some(&expected));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // assign_from
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_assign_from_mapping_roundtrip() {
        let user = make_user();
        let mut map = Mapping::new();
        Record::wrap(&user).unwrap().save_into(&mut map).unwrap();

        let mut record = Record::from_type(&user_type());
        record.assign_from(&map).unwrap();

        assert_eq!(Some(record.current()), user.as_record());
    }

    #[test]
    fn test_assign_from_rejects_unsupported_sources() {
        let mut record = Record::from_type(&user_type());
        assert!(matches!(
            record.assign_from(Value::from("text")),
            Err(RecordError::NotAcceptable)
        ));
        assert!(matches!(
            record.assign_from(&Value::I64(3)),
            Err(RecordError::NotAcceptable)
        ));
        assert_eq!(record.current(), &user_type().instantiate());
    }

    #[test]
    fn test_assign_from_mapping_mismatch_leaves_record_unchanged() {
        let mut user = make_user();
        let mut record = Record::wrap(&mut user).unwrap();
        let mut map = Mapping::new();
        map.insert("Name".into(), SpookyValue::from("Bob"));
        map.insert("Tags".into(), SpookyValue::from(5i64));

        assert!(matches!(
            record.assign_from(&map),
            Err(RecordError::ValueMismatch { .. })
        ));
        drop(record);
        assert_eq!(user, make_user());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Builder
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_builder_reports_invalid_names_at_build() {
        let result = RecordBuilder::new()
            .add_field("ok", FieldType::Bool, "")
            .add_field("not ok", FieldType::Bool, "")
            .build();
        assert!(matches!(result, Err(RecordError::InvalidFieldName(_))));
    }

    #[test]
    fn test_builder_empty() {
        let record = RecordBuilder::new().build().unwrap();
        assert!(record.record_type().is_empty());
        assert!(record.current().values().is_empty());
    }
}
