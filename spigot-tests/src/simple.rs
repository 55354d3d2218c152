use spigot::{Connection, NamedStatement};
use time::macros::datetime;
use uuid::Uuid;

pub fn simple<C: Connection>(connection: &mut C) {
    let statement = NamedStatement::parse(
        "INSERT INTO gauge_reading (id, name, at, level) VALUES (:id, :name, :at, :level)",
    )
    .expect("Failed to parse the insert statement");
    assert!(statement.contains_parameter("name").unwrap());
    assert!(!statement.contains_parameter("missing").unwrap());

    let affected = statement
        .binder()
        .bind("id", Uuid::new_v4())
        .expect("Failed to bind :id")
        .bind("name", "boiler-3")
        .expect("Failed to bind :name")
        .bind("at", datetime!(2024-05-17 08:30:00))
        .expect("Failed to bind :at")
        .bind("level", 12.5)
        .expect("Failed to bind :level")
        .execute(connection)
        .expect("Failed to execute the insert");
    assert_eq!(affected, 1);

    // Fan out two complete variants from one partially bound prototype
    let prototype = statement
        .binder()
        .bind("id", Uuid::new_v4())
        .unwrap()
        .bind("at", datetime!(2024-05-17 09:00:00))
        .expect("Failed to bind :at on the prototype");
    let first = prototype
        .bind("name", "boiler-4")
        .unwrap()
        .bind("level", 3.25)
        .unwrap();
    let second = prototype
        .bind("name", "boiler-5")
        .unwrap()
        .bind("level", Option::<f64>::None)
        .unwrap();
    first
        .execute(connection)
        .expect("Failed to execute the first variant");
    second
        .execute(connection)
        .expect("Failed to execute the second variant");

    // Missing bindings fail fast, before touching the session
    let error = statement
        .binder()
        .bind("name", "boiler-6")
        .unwrap()
        .execute(connection)
        .expect_err("An incomplete binder must not execute");
    assert!(error.is_state_conflict());
    assert!(error.to_string().contains(":at"));
    assert!(error.to_string().contains(":level"));

    // Unknown names and rebinds are caller errors
    let binder = statement.binder().bind("name", "boiler-7").unwrap();
    assert!(binder.bind("nam", "typo").unwrap_err().is_invalid_argument());
    assert!(binder.bind("name", "again").unwrap_err().is_invalid_argument());
}
