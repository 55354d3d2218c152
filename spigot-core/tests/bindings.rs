#[cfg(test)]
mod tests {
    use spigot_core::{Binding, Bindings, ParamTarget, PositionalBinding, Result, Value};

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(u64, Value)>,
    }

    impl ParamTarget for Recorder {
        fn set_value(&mut self, position: u64, value: Value) -> Result<()> {
            self.writes.push((position, value));
            Ok(())
        }
    }

    #[test]
    fn rejects_rebinding() {
        let bindings = Bindings::new()
            .value_binding("a", Binding::value(1))
            .unwrap();
        assert!(
            bindings
                .value_binding("a", Binding::value(2))
                .unwrap_err()
                .is_invalid_argument()
        );
        assert!(
            bindings
                .list_binding("a", vec![Binding::value(2)])
                .unwrap_err()
                .is_invalid_argument()
        );
        assert!(
            Bindings::new()
                .value_binding("", Binding::value(1))
                .unwrap_err()
                .is_invalid_argument()
        );
    }

    #[test]
    fn rejects_duplicates_across_merge() {
        let left = Bindings::new()
            .value_binding("a", Binding::value(1))
            .unwrap()
            .value_binding("b", Binding::value(2))
            .unwrap();
        let right = Bindings::new()
            .value_binding("c", Binding::value(3))
            .unwrap();
        let merged = left.merge(&right).unwrap();
        assert_eq!(merged.names().collect::<Vec<_>>(), ["a", "b", "c"]);

        let clashing = Bindings::new()
            .value_binding("b", Binding::value(9))
            .unwrap();
        assert!(left.merge(&clashing).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn persistent_update_leaves_the_original_usable() {
        let prototype = Bindings::new()
            .value_binding("a", Binding::value(1))
            .unwrap();
        let with_b = prototype
            .value_binding("b", Binding::value(2))
            .unwrap();
        let with_c = prototype
            .value_binding("c", Binding::value(3))
            .unwrap();
        assert_eq!(prototype.names().collect::<Vec<_>>(), ["a"]);
        assert_eq!(with_b.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(with_c.names().collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn lookup_of_unbound_name_fails() {
        let bindings = Bindings::new();
        assert!(bindings.get("nope").unwrap_err().is_invalid_argument());
        assert!(!bindings.contains("nope"));
        assert!(bindings.is_empty());
    }

    #[test]
    fn placeholder_fragments() {
        let mut out = String::new();
        PositionalBinding::Value(Binding::value(1)).append_placeholder(&mut out);
        assert_eq!(out, "?");

        let mut out = String::new();
        PositionalBinding::List(vec![
            Binding::value(1),
            Binding::value(2),
            Binding::value(3),
        ])
        .append_placeholder(&mut out);
        assert_eq!(out, "(?,?,?)");

        let mut out = String::new();
        PositionalBinding::List(Vec::new()).append_placeholder(&mut out);
        assert_eq!(out, "()");
    }

    #[test]
    fn writes_advance_the_position() {
        let mut recorder = Recorder::default();
        let next = PositionalBinding::Value(Binding::value("x"))
            .write(&mut recorder, 1)
            .unwrap();
        assert_eq!(next, 2);
        let next = PositionalBinding::List(vec![Binding::value(5), Binding::value(6)])
            .write(&mut recorder, next)
            .unwrap();
        assert_eq!(next, 4);
        assert_eq!(
            recorder.writes,
            vec![
                (1, Value::Varchar(Some("x".into()))),
                (2, Value::Int32(Some(5))),
                (3, Value::Int32(Some(6))),
            ]
        );
    }

    #[test]
    fn custom_setters_may_skip_and_normalize() {
        let mut recorder = Recorder::default();
        PositionalBinding::Value(Binding::with(|_slot| Ok(())))
            .write(&mut recorder, 1)
            .unwrap();
        PositionalBinding::Value(Binding::with(|slot| {
            assert_eq!(slot.position(), 2);
            slot.set(41_i64)
        }))
        .write(&mut recorder, 2)
        .unwrap();
        PositionalBinding::Value(Binding::null())
            .write(&mut recorder, 3)
            .unwrap();
        assert_eq!(
            recorder.writes,
            vec![
                (1, Value::Null),
                (2, Value::Int64(Some(41))),
                (3, Value::Null),
            ]
        );
    }

    #[test]
    fn optional_values_bind_typed_nulls() {
        let mut recorder = Recorder::default();
        PositionalBinding::Value(Binding::value(Option::<i32>::None))
            .write(&mut recorder, 1)
            .unwrap();
        assert_eq!(recorder.writes, vec![(1, Value::Int32(None))]);
    }
}
