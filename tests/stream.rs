#[cfg(test)]
mod tests {
    use spigot::{Cursor, CursorExt, NamedStatement, Value};
    use spigot_tests::fake::{FailPoint, FakeConnection};

    fn reading_statement() -> NamedStatement {
        NamedStatement::parse("SELECT name FROM t WHERE g = :g").unwrap()
    }

    fn three_names(fake: &FakeConnection) {
        fake.push_rows(
            &["name"],
            vec![
                vec![Value::Varchar(Some("a".into()))],
                vec![Value::Varchar(Some("b".into()))],
                vec![Value::Varchar(Some("c".into()))],
            ],
        );
    }

    #[test]
    fn streams_rows_lazily_and_releases_on_exhaustion() {
        let statement = reading_statement();
        let mut fake = FakeConnection::new();
        three_names(&fake);
        let mut rows = statement
            .binder()
            .bind("g", 1)
            .unwrap()
            .fetch_lazy(&mut fake, |row: &dyn Cursor| row.get::<String>(0))
            .unwrap();
        assert_eq!(rows.size_hint(), (0, None));
        // Nothing is released while rows are still coming
        assert_eq!(rows.next().unwrap().unwrap(), "a");
        assert!(!fake.events().contains(&"close_cursor".to_string()));
        assert_eq!(rows.next().unwrap().unwrap(), "b");
        assert_eq!(rows.next().unwrap().unwrap(), "c");
        assert!(rows.next().is_none());
        let events = fake.events();
        assert!(events.contains(&"close_cursor".to_string()));
        assert!(events.contains(&"close_statement".to_string()));
        // Fused: exhaustion does not rescan
        assert!(rows.next().is_none());
        assert!(rows.next().is_none());
    }

    #[test]
    fn advance_faults_surface_as_one_stable_kind() {
        let statement = reading_statement();
        let mut fake = FakeConnection::new();
        three_names(&fake);
        fake.fail_once(FailPoint::Advance);
        let mut rows = statement
            .binder()
            .bind("g", 1)
            .unwrap()
            .fetch_lazy(&mut fake, |row: &dyn Cursor| row.get::<String>(0))
            .unwrap();
        let error = rows.next().unwrap().unwrap_err();
        assert!(error.is_advance());
        assert!(error.to_string().contains("Advance"));
        // The stream is dead after a fault
        assert!(rows.next().is_none());
        let events = fake.events();
        assert!(events.contains(&"close_cursor".to_string()));
        assert!(events.contains(&"close_statement".to_string()));
    }

    #[test]
    fn mapper_faults_are_wrapped_too() {
        let statement = reading_statement();
        let mut fake = FakeConnection::new();
        three_names(&fake);
        let mut rows = statement
            .binder()
            .bind("g", 1)
            .unwrap()
            .fetch_lazy(&mut fake, |row: &dyn Cursor| row.get::<i64>(0))
            .unwrap();
        let error = rows.next().unwrap().unwrap_err();
        assert!(error.is_advance());
    }

    #[test]
    fn close_faults_on_the_streaming_path_are_swallowed() {
        let statement = reading_statement();
        let mut fake = FakeConnection::new();
        three_names(&fake);
        fake.fail_once(FailPoint::CloseCursor);
        fake.fail_once(FailPoint::CloseStatement);
        let rows = statement
            .binder()
            .bind("g", 1)
            .unwrap()
            .fetch_lazy(&mut fake, |row: &dyn Cursor| row.get::<String>(0))
            .unwrap();
        let collected = rows.collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(collected, vec!["a", "b", "c"]);
        // Both releases were attempted even though both failed
        let events = fake.events();
        assert!(events.contains(&"close_cursor".to_string()));
        assert!(events.contains(&"close_statement".to_string()));
    }

    #[test]
    fn both_releases_run_even_if_the_first_fails() {
        let statement = reading_statement();
        let mut fake = FakeConnection::new();
        fake.fail_once(FailPoint::CloseCursor);
        let mut rows = statement
            .binder()
            .bind("g", 1)
            .unwrap()
            .fetch_lazy(&mut fake, |row: &dyn Cursor| row.get::<String>(0))
            .unwrap();
        rows.close();
        let events = fake.events();
        let cursor_at = events.iter().position(|e| e == "close_cursor").unwrap();
        let statement_at = events.iter().position(|e| e == "close_statement").unwrap();
        assert!(cursor_at < statement_at);
    }

    #[test]
    fn early_close_stops_iteration() {
        let statement = reading_statement();
        let mut fake = FakeConnection::new();
        three_names(&fake);
        let mut rows = statement
            .binder()
            .bind("g", 1)
            .unwrap()
            .fetch_lazy(&mut fake, |row: &dyn Cursor| row.get::<String>(0))
            .unwrap();
        assert_eq!(rows.next().unwrap().unwrap(), "a");
        rows.close();
        assert!(rows.next().is_none());
    }

    #[test]
    fn dropping_releases_the_handles() {
        let statement = reading_statement();
        let mut fake = FakeConnection::new();
        three_names(&fake);
        let rows = statement
            .binder()
            .bind("g", 1)
            .unwrap()
            .fetch_lazy(&mut fake, |row: &dyn Cursor| row.get::<String>(0))
            .unwrap();
        drop(rows);
        let events = fake.events();
        assert!(events.contains(&"close_cursor".to_string()));
        assert!(events.contains(&"close_statement".to_string()));
    }

    #[test]
    fn a_failed_open_closes_the_statement() {
        let statement = reading_statement();
        let mut fake = FakeConnection::new();
        fake.fail_once(FailPoint::ExecuteQuery);
        let error = statement
            .binder()
            .bind("g", 1)
            .unwrap()
            .fetch_lazy(&mut fake, |row: &dyn Cursor| row.get::<String>(0))
            .unwrap_err();
        assert!(error.is_session());
        assert!(fake.events().contains(&"close_statement".to_string()));
    }
}
