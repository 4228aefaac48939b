mod common;

#[cfg(test)]
mod tests {
    use crate::common::{MockProtocol, Respond};
    use pgbind::{BatchOutcome, Error, PreparedStatement, ResultField, Value};

    fn statement() -> PreparedStatement {
        crate::common::init();
        PreparedStatement::new(
            "stmt_1",
            vec![Value::Int32(None)],
            vec![ResultField::new("id", Value::Int64(None))],
        )
    }

    fn queue(statement: &mut PreparedStatement, values: &[i32]) {
        for v in values {
            statement.set_i32(1, *v).unwrap();
            statement.add_batch().unwrap();
        }
    }

    #[test]
    fn empty_queue_is_a_no_op() {
        let mut statement = statement();
        let mut protocol = MockProtocol::new([]);
        let outcomes = statement.execute_batch(&mut protocol).unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(protocol.commands_created, 0);
        assert_eq!(protocol.round_trips, 0);
    }

    #[test]
    fn one_round_trip_per_entry_in_order() {
        let mut statement = statement();
        queue(&mut statement, &[10, 20, 30]);
        let mut protocol =
            MockProtocol::new([Respond::count(1), Respond::count(0), Respond::count(2)]);
        let outcomes = statement.execute_batch(&mut protocol).unwrap();
        assert_eq!(
            outcomes,
            vec![
                BatchOutcome::Affected(1),
                BatchOutcome::Affected(0),
                BatchOutcome::Affected(2),
            ],
        );
        assert_eq!(protocol.round_trips, 3);
        // One shared command for the whole batch.
        assert_eq!(protocol.commands_created, 1);
        assert_eq!(protocol.statement.as_deref(), Some("stmt_1"));
    }

    #[test]
    fn ambiguous_shape_aborts_with_partial_outcomes() {
        let mut statement = statement();
        queue(&mut statement, &[1, 2, 3, 4]);
        let mut protocol = MockProtocol::new([
            Respond::count(1),
            Respond::count(5),
            Respond::split(),
            Respond::count(9),
        ]);
        let error = statement.execute_batch(&mut protocol).unwrap_err();
        let Error::BatchAbort {
            entry, outcomes, ..
        } = error
        else {
            panic!("expected BatchAbort, got {error}");
        };
        assert_eq!(entry, 2);
        assert_eq!(
            outcomes,
            vec![
                BatchOutcome::Affected(1),
                BatchOutcome::Affected(5),
                BatchOutcome::SuccessNoInfo,
                BatchOutcome::SuccessNoInfo,
            ],
        );
        // Entry 3 was never dispatched.
        assert_eq!(protocol.round_trips, 3);
    }

    #[test]
    fn missing_count_aborts() {
        let mut statement = statement();
        queue(&mut statement, &[1, 2]);
        let mut protocol = MockProtocol::new([Respond::count(1), Respond::no_count()]);
        let error = statement.execute_batch(&mut protocol).unwrap_err();
        assert!(matches!(error, Error::BatchAbort { entry: 1, .. }));
    }

    #[test]
    fn transport_failure_keeps_recorded_outcomes() {
        let mut statement = statement();
        queue(&mut statement, &[1, 2, 3]);
        let mut protocol = MockProtocol::new([Respond::count(4), Respond::fail("gone away")]);
        let error = statement.execute_batch(&mut protocol).unwrap_err();
        let Error::BatchAbort {
            entry, outcomes, ..
        } = error
        else {
            panic!("expected BatchAbort, got {error}");
        };
        assert_eq!(entry, 1);
        assert_eq!(outcomes[0], BatchOutcome::Affected(4));
        assert_eq!(outcomes[1], BatchOutcome::SuccessNoInfo);
    }

    #[test]
    fn queued_snapshot_is_isolated_from_later_sets() {
        let mut statement = statement();
        statement.set_i32(1, 111).unwrap();
        statement.add_batch().unwrap();
        statement.set_i32(1, 222).unwrap();
        let mut protocol = MockProtocol::new([Respond::count(1)]);
        statement.execute_batch(&mut protocol).unwrap();
        // Only the snapshot taken at add_batch time was dispatched, with
        // the value bound before the later edit.
        assert_eq!(protocol.round_trips, 1);
        assert_eq!(protocol.bound_history[0][0], Value::Int32(Some(111)));
    }

    #[test]
    fn generated_keys_are_collected_in_entry_order() {
        let mut statement = statement();
        statement.set_wants_generated_keys(true);
        queue(&mut statement, &[1, 2]);
        let mut protocol = MockProtocol::new([
            Respond::count_with_row(1, vec![Value::Int64(Some(100))].into()),
            Respond::count_with_row(1, vec![Value::Int64(Some(101))].into()),
        ]);
        statement.execute_batch(&mut protocol).unwrap();
        let keys = statement.generated_keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get_column(0, "id"), Some(&Value::Int64(Some(100))));
        assert_eq!(keys.get_column(1, "id"), Some(&Value::Int64(Some(101))));
    }

    #[test]
    fn warnings_chain_across_entries_and_survive_abort() {
        let mut statement = statement();
        queue(&mut statement, &[1, 2, 3]);
        let mut protocol = MockProtocol::new([
            Respond::count(1).with_warning("first"),
            Respond::count(1).with_warning("second"),
            Respond::no_count(),
        ]);
        let _ = statement.execute_batch(&mut protocol).unwrap_err();
        let messages: Vec<_> = statement
            .warnings()
            .iter()
            .map(|w| w.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn clear_batch_discards_without_executing() {
        let mut statement = statement();
        queue(&mut statement, &[1, 2]);
        assert_eq!(statement.batch_size(), 2);
        statement.clear_batch().unwrap();
        assert_eq!(statement.batch_size(), 0);
        let mut protocol = MockProtocol::new([]);
        let outcomes = statement.execute_batch(&mut protocol).unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(protocol.round_trips, 0);
    }
}
