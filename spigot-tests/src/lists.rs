use spigot::{Connection, Cursor, CursorExt, NamedStatement};

pub fn lists<C: Connection>(connection: &mut C) {
    let statement = NamedStatement::parse(
        "SELECT name FROM gauge_reading WHERE name IN :names AND level > :floor",
    )
    .expect("Failed to parse the list statement");

    let binder = statement
        .binder()
        .bind_list("names", ["boiler-3", "boiler-4"])
        .expect("Failed to bind :names")
        .bind("floor", 0.0)
        .expect("Failed to bind :floor");
    assert_eq!(
        binder.sql().unwrap(),
        "SELECT name FROM gauge_reading WHERE name IN (?,?) AND level > ?"
    );
    binder
        .fetch_all(connection, |row: &dyn Cursor| row.get::<String>(0))
        .expect("Failed to fetch through a list binding");

    // An empty list still materializes, as ()
    let empty = statement
        .binder()
        .bind_list("names", Vec::<String>::new())
        .unwrap()
        .bind("floor", 0.0)
        .unwrap();
    assert_eq!(
        empty.sql().unwrap(),
        "SELECT name FROM gauge_reading WHERE name IN () AND level > ?"
    );

    // A list cannot rebind a name a value already took, and vice versa
    let bound = statement.binder().bind("names", "scalar").unwrap();
    assert!(
        bound
            .bind_list("names", ["x"])
            .unwrap_err()
            .is_invalid_argument()
    );
}
