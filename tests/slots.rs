#[cfg(test)]
mod tests {
    use pgbind::{Error, ParameterSlots, Value};
    use std::sync::Arc;
    use time::UtcOffset;

    fn slots() -> ParameterSlots {
        let types: Arc<[Value]> = vec![Value::Int32(None), Value::Varchar(None)].into();
        ParameterSlots::new(types)
    }

    #[test]
    fn set_coerces_to_declared_type() {
        let mut slots = slots();
        slots.set(1, Value::from(7i16), UtcOffset::UTC).unwrap();
        slots.set(2, Value::from("seven"), UtcOffset::UTC).unwrap();
        assert_eq!(
            slots.values(),
            &[
                Value::Int32(Some(7)),
                Value::Varchar(Some("seven".to_owned())),
            ],
        );
    }

    #[test]
    fn unset_slots_stay_null() {
        let mut slots = slots();
        slots.set(2, Value::from("x"), UtcOffset::UTC).unwrap();
        assert_eq!(slots.values()[0], Value::Null);
    }

    #[test]
    fn index_zero_and_count_plus_one_are_rejected() {
        let mut slots = slots();
        assert!(matches!(
            slots.set(0, Value::from(1i32), UtcOffset::UTC),
            Err(Error::ParameterIndexOutOfBounds { index: 0, count: 2 }),
        ));
        assert!(matches!(
            slots.set(3, Value::from(1i32), UtcOffset::UTC),
            Err(Error::ParameterIndexOutOfBounds { index: 3, count: 2 }),
        ));
    }

    #[test]
    fn null_skips_coercion() {
        let mut slots = slots();
        slots.set(1, Value::Null, UtcOffset::UTC).unwrap();
        assert_eq!(slots.values()[0], Value::Null);
    }

    #[test]
    fn coercion_failure_leaves_slot_untouched() {
        let mut slots = slots();
        slots.set(1, Value::from(5i32), UtcOffset::UTC).unwrap();
        let result = slots.set(1, Value::from(time::Time::MIDNIGHT), UtcOffset::UTC);
        assert!(matches!(result, Err(Error::TypeCoercion { .. })));
        assert_eq!(slots.values()[0], Value::Int32(Some(5)));
    }

    #[test]
    fn clear_resets_values_not_shape() {
        let mut slots = slots();
        slots.set(1, Value::from(1i32), UtcOffset::UTC).unwrap();
        slots.clear();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.values(), &[Value::Null, Value::Null]);
        assert_eq!(slots.declared_types()[0], Value::Int32(None));
    }

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let mut slots = slots();
        slots.set(1, Value::from(1i32), UtcOffset::UTC).unwrap();
        let snapshot = slots.snapshot_and_reset();
        assert_eq!(snapshot[0], Value::Int32(Some(1)));
        assert_eq!(slots.values(), &[Value::Null, Value::Null]);
        slots.set(1, Value::from(2i32), UtcOffset::UTC).unwrap();
        assert_eq!(snapshot[0], Value::Int32(Some(1)));
    }
}
