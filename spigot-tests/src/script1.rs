use indoc::indoc;
use spigot::{Connection, Script};

pub fn script1<C: Connection>(connection: &mut C) {
    let script = Script::parse(indoc! {"
        CREATE TABLE gauge_reading (id UUID, name VARCHAR, at TIMESTAMP, level DOUBLE);
        -- seed; the delimiter in this comment must not split anything
        INSERT INTO gauge_reading (name, level) VALUES ('probe;1', 0.5);
        INSERT INTO gauge_reading (name, level) VALUES ('probe:2', 0.7)
    "})
    .expect("Failed to parse the setup script");
    assert_eq!(script.len(), 3);
    assert!(script.statements()[1].contains("'probe;1'"));

    let outcomes = script
        .execute(connection)
        .expect("Failed to execute the setup script");
    assert_eq!(outcomes.len(), 3);

    let blank = Script::parse(" ;; \n ; ").expect("Failed to parse a blank script");
    assert!(blank.is_empty());
    assert_eq!(blank.execute(connection).expect("Failed to run a blank script"), Vec::<bool>::new());
}
