use tests::*;

use pretty_assertions::assert_eq;

async fn new_dog(db: &Db, name: &str, breed: &str) -> Instance {
    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", name).unwrap();
    dog.set("breed", breed).unwrap();
    dog
}

#[tokio::test]
async fn superclass_row_is_written_first() {
    let TestDb { db, log } = setup().await;

    let mut dog = new_dog(&db, "Rex", "Lab").await;
    db.save(&mut dog).await.unwrap();

    assert_eq!(log.writes(), ["animals", "dogs"]);
    assert!(dog.is_persisted());
    assert!(dog.association().unwrap().is_persisted());
}

#[tokio::test]
async fn identity_is_shared() {
    let TestDb { db, .. } = setup().await;

    for (name, breed) in [("Rex", "Lab"), ("Fido", "Pug"), ("Spot", "Dalmatian")] {
        let mut dog = new_dog(&db, name, breed).await;
        db.save(&mut dog).await.unwrap();

        let animal = dog.association().unwrap();
        assert_eq!(dog.get("animal_id").unwrap(), animal.get("id").unwrap());
        assert_eq!(dog.key(), animal.key());
        assert_eq!(dog.get("id").unwrap(), animal.get("id").unwrap());
    }

    let keys: Vec<_> = db
        .all("Dog")
        .await
        .unwrap()
        .iter()
        .map(|dog| dog.key().clone())
        .collect();
    assert_eq!(keys, [Value::from(1), Value::from(2), Value::from(3)]);
}

#[tokio::test]
async fn discriminator_is_stamped() {
    let TestDb { db, .. } = setup().await;

    let mut dog = new_dog(&db, "Rex", "Lab").await;
    db.save(&mut dog).await.unwrap();

    let mut cat = db.new_instance("Cat").unwrap();
    cat.set("name", "Tom").unwrap();
    db.save(&mut cat).await.unwrap();

    let subtypes: Vec<_> = db
        .all_resolved("Animal")
        .await
        .unwrap()
        .iter()
        .map(|row| row.instance().association().unwrap().get("subtype").unwrap())
        .collect();
    assert_eq!(subtypes, [Value::from("Dog"), Value::from("Cat")]);
}

#[tokio::test]
async fn round_trip() {
    let TestDb { db, .. } = setup().await;

    let mut dog = new_dog(&db, "Rex", "Lab").await;
    db.save(&mut dog).await.unwrap();

    let mut reloaded = db.find("Dog", dog.key().clone()).await.unwrap();
    assert_eq!(reloaded.get("name").unwrap(), "Rex");
    assert_eq!(reloaded.get("breed").unwrap(), "Lab");

    reloaded.set("name", "Max").unwrap();
    reloaded.set("breed", "Pug").unwrap();
    db.save(&mut reloaded).await.unwrap();

    db.reload(&mut dog).await.unwrap();
    assert_eq!(dog.get("name").unwrap(), "Max");
    assert_eq!(dog.get("breed").unwrap(), "Pug");
}

#[tokio::test]
async fn saving_again_updates_both_rows() {
    let TestDb { db, mut log } = setup().await;

    let mut dog = new_dog(&db, "Rex", "Lab").await;
    db.save(&mut dog).await.unwrap();
    log.clear();

    dog.set("name", "Max").unwrap();
    db.save(&mut dog).await.unwrap();

    let (op, _) = log.pop();
    assert!(matches!(op, Operation::UpdateByKey(ref op) if op.table == "animals"));
    let (op, _) = log.pop();
    assert!(matches!(op, Operation::UpdateByKey(ref op) if op.table == "dogs"));
    assert!(log.is_empty());

    assert_eq!(db.all("Animal").await.unwrap().len(), 1);
}

#[tokio::test]
async fn superclass_validation_is_folded_in() {
    let TestDb { db, log } = setup().await;

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("breed", "Lab").unwrap();

    assert!(!db.validate(&mut dog));
    assert_eq!(dog.errors().on("name"), ["can't be blank"]);
    assert_eq!(dog.errors().full_messages(), ["Name can't be blank"]);

    let err = db.save(&mut dog).await.unwrap_err();
    assert!(err.is_validation_failed());
    assert_eq!(err.to_string(), "validation failed for `Dog` (1 error)");
    assert!(log.is_empty());
    assert!(!dog.is_persisted());

    dog.set("name", "Rex").unwrap();
    assert!(db.validate(&mut dog));
    assert!(dog.errors().is_empty());
    db.save(&mut dog).await.unwrap();
}

#[tokio::test]
async fn base_models_save_one_row() {
    let TestDb { db, log } = setup().await;

    let mut owner = db.new_instance("Owner").unwrap();
    owner.set("name", "Ann").unwrap();
    db.save(&mut owner).await.unwrap();

    assert_eq!(log.writes(), ["owners"]);
    assert_eq!(owner.key(), &Value::from(1));
}

#[tokio::test]
async fn atomic_save_rolls_back_superclass_row() {
    let mut builder = models::builder();
    builder.atomic_save(true);

    let driver = FailingDriver::new(Memory::new()).fail_writes_to("dogs");
    let TestDb { db, log } = build(builder, driver).await.unwrap();

    let mut dog = new_dog(&db, "Rex", "Lab").await;
    let err = db.save(&mut dog).await.unwrap_err();
    assert!(err.is_driver());

    assert!(!dog.is_persisted());
    assert!(dog.key().is_null());
    assert!(!dog.association().unwrap().is_persisted());
    assert!(db.all("Animal").await.unwrap().is_empty());

    let ops = log.operations();
    assert!(matches!(ops[0], Operation::Transaction(operation::Transaction::Start)));
    assert!(matches!(ops[1], Operation::Insert(ref op) if op.table == "animals"));
    assert!(matches!(ops[2], Operation::Transaction(operation::Transaction::Rollback)));
}

#[tokio::test]
async fn atomic_save_commits() {
    let mut builder = models::builder();
    builder.atomic_save(true);

    let TestDb { db, log } = setup_with(builder).await;

    let mut dog = new_dog(&db, "Rex", "Lab").await;
    db.save(&mut dog).await.unwrap();

    let ops = log.operations();
    assert_eq!(ops.len(), 4);
    assert!(matches!(ops[0], Operation::Transaction(operation::Transaction::Start)));
    assert!(matches!(ops[3], Operation::Transaction(operation::Transaction::Commit)));
    assert_eq!(db.all("Dog").await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_own_save_orphans_superclass_row() {
    let driver = FailingDriver::new(Memory::new()).fail_writes_to("dogs");
    let TestDb { db, .. } = build(models::builder(), driver).await.unwrap();

    let mut dog = new_dog(&db, "Rex", "Lab").await;
    assert!(db.save(&mut dog).await.unwrap_err().is_driver());

    // The superclass row stays behind, stamped but without its dog row.
    let rows = db.all_resolved("Animal").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(matches!(
        rows[0].fallback_reason(),
        Some(FallbackReason::LookupFailed(err)) if err.is_record_not_found()
    ));
    assert_eq!(rows[0].instance().get("name").unwrap(), "Rex");
}

#[tokio::test]
async fn atomic_save_needs_transaction_support() {
    let mut builder = models::builder();
    builder.atomic_save(true);

    let driver = FailingDriver::new(Memory::new())
        .fail_writes_to("dogs")
        .non_transactional();
    let TestDb { db, log } = build(builder, driver).await.unwrap();

    let mut dog = new_dog(&db, "Rex", "Lab").await;
    assert!(db.save(&mut dog).await.is_err());

    assert!(log
        .operations()
        .iter()
        .all(|op| !matches!(op, Operation::Transaction(_))));
    assert_eq!(db.all("Animal").await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_superclass_save_aborts() {
    let driver = FailingDriver::new(Memory::new()).fail_writes_to("animals");
    let TestDb { db, log } = build(models::builder(), driver).await.unwrap();

    let mut dog = new_dog(&db, "Rex", "Lab").await;
    let err = db.save(&mut dog).await.unwrap_err();
    assert!(err.is_driver());
    assert!(err.to_string().starts_with("saving `animal` of `Dog`: "));

    assert!(log.writes().is_empty());
    assert!(db.all("Dog").await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_superclass_row_is_restored_under_same_key() {
    let TestDb { db, mut log } = setup().await;

    let mut first = new_dog(&db, "Rex", "Lab").await;
    db.save(&mut first).await.unwrap();
    let mut dog = new_dog(&db, "Fido", "Pug").await;
    db.save(&mut dog).await.unwrap();
    let key = dog.key().clone();

    db.delete(dog.association().unwrap()).await.unwrap();

    let mut dog = db.find("Dog", key.clone()).await.unwrap();
    assert!(dog.association().is_none());
    log.clear();

    dog.set("name", "Max").unwrap();
    db.save(&mut dog).await.unwrap();

    assert_eq!(log.writes(), ["animals", "dogs"]);
    assert_eq!(dog.key(), &key);
    assert_eq!(dog.association().unwrap().key(), &key);

    let animals = db.all("Animal").await.unwrap();
    assert_eq!(animals.len(), 2);

    let found = db.find("Dog", key).await.unwrap();
    assert_eq!(found.get("name").unwrap(), "Max");
    assert_eq!(found.get("breed").unwrap(), "Pug");
}
