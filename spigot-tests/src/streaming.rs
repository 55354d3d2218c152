use spigot::{Connection, Cursor, CursorExt, NamedStatement};

pub fn streaming<C: Connection>(connection: &mut C) {
    let statement =
        NamedStatement::parse("SELECT name, level FROM gauge_reading WHERE level > :floor")
            .expect("Failed to parse the streaming statement");

    let rows = statement
        .binder()
        .bind("floor", 0.0)
        .unwrap()
        .fetch_lazy(connection, |row: &dyn Cursor| {
            Ok((row.get::<String>(0)?, row.get::<Option<f64>>(1)?))
        })
        .expect("Failed to open a lazy result");
    assert_eq!(rows.size_hint(), (0, None));
    let mut rows = rows;
    for row in &mut rows {
        row.expect("Failed to advance the lazy result");
    }
    // Exhausted: the iterator is fused and does not rescan
    assert!(rows.next().is_none());
    rows.close();

    // Closing early is always safe
    let mut rows = statement
        .binder()
        .bind("floor", 1.0)
        .unwrap()
        .fetch_lazy(connection, |row: &dyn Cursor| row.get::<String>(0))
        .expect("Failed to open a second lazy result");
    rows.close();
    assert!(rows.next().is_none());
}
