#[cfg(test)]
mod tests {
    use spigot::{Cursor, CursorExt, NamedStatement, Value};
    use spigot_tests::fake::FakeConnection;

    #[test]
    fn entries_share_one_statement_and_one_round_trip() {
        let statement =
            NamedStatement::parse("INSERT INTO t (a, b) VALUES (:a, :b)").unwrap();
        let mut fake = FakeConnection::new();
        let mut batch = statement.batch();
        let entry = batch.start().bind("a", 1).unwrap().bind("b", "one").unwrap();
        batch.add(entry).unwrap();
        let entry = batch.start().bind("a", 2).unwrap().bind("b", "two").unwrap();
        batch.add(entry).unwrap();

        let counts = batch.execute(&mut fake).unwrap();
        assert_eq!(counts, vec![1, 1]);
        assert_eq!(
            fake.prepared_sql(),
            vec!["INSERT INTO t (a, b) VALUES (?, ?)"]
        );
        assert_eq!(
            fake.writes(),
            vec![
                (1, Value::Int32(Some(1))),
                (2, Value::Varchar(Some("one".into()))),
                (1, Value::Int32(Some(2))),
                (2, Value::Varchar(Some("two".into()))),
            ]
        );
        let events = fake.events();
        assert_eq!(events.iter().filter(|e| *e == "add_batch").count(), 2);
        assert!(events.contains(&"execute_batch:2".to_string()));
        assert!(events.contains(&"close_statement".to_string()));
    }

    #[test]
    fn an_empty_batch_fails_fast() {
        let statement = NamedStatement::parse("DELETE FROM t WHERE id = :id").unwrap();
        let mut fake = FakeConnection::new();
        let error = statement.batch().execute(&mut fake).unwrap_err();
        assert!(error.is_state_conflict());
        assert!(fake.events().is_empty());
    }

    #[test]
    fn entries_must_be_complete_and_exactly_scoped() {
        let statement =
            NamedStatement::parse("INSERT INTO t (a, b) VALUES (:a, :b)").unwrap();
        let mut batch = statement.batch();

        let incomplete = batch.start().bind("a", 1).unwrap();
        assert!(batch.add(incomplete).unwrap_err().is_state_conflict());

        let other = NamedStatement::parse("INSERT INTO t (a, b) VALUES (:a, :b)").unwrap();
        let foreign = other.binder().bind("a", 1).unwrap().bind("b", 2).unwrap();
        assert!(batch.add(foreign).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn a_finalized_batch_rejects_further_use() {
        let statement = NamedStatement::parse("DELETE FROM t WHERE id = :id").unwrap();
        let mut fake = FakeConnection::new();
        let mut batch = statement.batch();
        let entry = batch.start().bind("id", 1).unwrap();
        batch.add(entry).unwrap();
        batch.execute(&mut fake).unwrap();

        let entry = batch.start().bind("id", 2).unwrap();
        assert!(batch.add(entry).unwrap_err().is_state_conflict());
        assert!(batch.execute(&mut fake).unwrap_err().is_state_conflict());
    }

    #[test]
    fn returning_harvests_whatever_keys_the_backend_exposes() {
        let statement = NamedStatement::parse("INSERT INTO t (a) VALUES (:a)").unwrap();
        let mut fake = FakeConnection::new();
        fake.push_keys(
            &["id"],
            vec![vec![Value::Int64(Some(7))], vec![Value::Int64(Some(8))]],
        );
        let mut batch = statement.batch();
        for a in [1, 2] {
            let entry = batch.start().bind("a", a).unwrap();
            batch.add(entry).unwrap();
        }
        let (counts, keys) = batch
            .execute_returning(&mut fake, |row: &dyn Cursor| row.get::<i64>(0))
            .unwrap();
        assert_eq!(counts, vec![1, 1]);
        assert_eq!(keys, vec![7, 8]);
    }

    #[test]
    fn key_retrieval_is_backend_dependent() {
        // A backend returning a key only for the last entry is within
        // contract: counts stay authoritative, the key list does not.
        let statement = NamedStatement::parse("INSERT INTO t (a) VALUES (:a)").unwrap();
        let mut fake = FakeConnection::new();
        fake.push_keys(&["id"], vec![vec![Value::Int64(Some(8))]]);
        let mut batch = statement.batch();
        for a in [1, 2] {
            let entry = batch.start().bind("a", a).unwrap();
            batch.add(entry).unwrap();
        }
        let (counts, keys) = batch
            .execute_returning(&mut fake, |row: &dyn Cursor| row.get::<i64>(0))
            .unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(keys, vec![8]);
    }

    #[test]
    fn diverging_list_arities_are_a_documented_caller_contract() {
        // The SQL is generated from the first entry; a second entry with a
        // different list arity is not reconciled against it. The mismatch
        // stays visible instead of being silently "handled".
        let statement = NamedStatement::parse("DELETE FROM t WHERE id IN :ids").unwrap();
        let mut fake = FakeConnection::new();
        let mut batch = statement.batch();
        let entry = batch.start().bind_list("ids", [1, 2]).unwrap();
        batch.add(entry).unwrap();
        let entry = batch.start().bind_list("ids", [3, 4, 5]).unwrap();
        batch.add(entry).unwrap();
        batch.execute(&mut fake).unwrap();

        assert_eq!(fake.prepared_sql(), vec!["DELETE FROM t WHERE id IN (?,?)"]);
        // The second entry still wrote three positions against a two
        // placeholder statement
        let writes = fake.writes();
        assert_eq!(writes.len(), 5);
        assert_eq!(writes[4], (3, Value::Int32(Some(5))));
    }
}
