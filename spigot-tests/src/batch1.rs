use spigot::{Connection, NamedStatement};

pub fn batch1<C: Connection>(connection: &mut C) {
    let statement =
        NamedStatement::parse("INSERT INTO gauge_reading (name, level) VALUES (:name, :level)")
            .expect("Failed to parse the batch statement");
    let mut batch = statement.batch();

    // Nothing queued yet
    let error = batch
        .execute(connection)
        .expect_err("An empty batch must not execute");
    assert!(error.is_state_conflict());

    for (name, level) in [("probe-a", 1.5), ("probe-b", 2.5), ("probe-c", 3.5)] {
        let entry = batch
            .start()
            .bind("name", name)
            .unwrap()
            .bind("level", level)
            .unwrap();
        batch.add(entry).expect("Failed to add a batch entry");
    }
    assert_eq!(batch.len(), 3);

    // An incomplete entry is rejected at add time
    let incomplete = batch.start().bind("name", "probe-d").unwrap();
    assert!(batch.add(incomplete).unwrap_err().is_state_conflict());

    let counts = batch.execute(connection).expect("Failed to execute the batch");
    assert_eq!(counts.len(), 3);

    // A finalized batch cannot be extended or rerun
    let late = batch.start().bind("name", "x").unwrap().bind("level", 0.0).unwrap();
    assert!(batch.add(late).unwrap_err().is_state_conflict());
    assert!(batch.execute(connection).unwrap_err().is_state_conflict());
}
