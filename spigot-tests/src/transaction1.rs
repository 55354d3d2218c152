use spigot::{Connection, Error, Isolation, NamedStatement, Transaction};

pub fn transaction1<C: Connection>(connection: &mut C) {
    let statement =
        NamedStatement::parse("UPDATE gauge_reading SET level = :level WHERE name = :name")
            .expect("Failed to parse the update statement");

    // Committing unit of work
    let affected = Transaction::new()
        .run_on(connection, |session| {
            statement
                .binder()
                .bind("level", 4.5)?
                .bind("name", "boiler-3")?
                .execute(session)
        })
        .expect("Failed to run the committing transaction");
    assert_eq!(affected, 1);
    assert!(connection.auto_commit().unwrap());

    // Failing unit of work rolls back and still restores the session state
    let error = Transaction::new()
        .isolation(Isolation::Serializable)
        .run_on(connection, |session| {
            statement
                .binder()
                .bind("level", 9.9)?
                .bind("name", "boiler-3")?
                .execute(session)?;
            Err::<(), _>(Error::msg("unit of work gave up"))
        })
        .expect_err("A failing unit of work must surface its fault");
    assert!(error.is_session());
    assert!(connection.auto_commit().unwrap());

    // Nesting is a caller error
    connection.set_auto_commit(false).unwrap();
    let nested = Transaction::new()
        .run_on(connection, |_| Ok(()))
        .expect_err("A nested transaction must fail fast");
    assert!(nested.is_state_conflict());
    connection.set_auto_commit(true).unwrap();
}
