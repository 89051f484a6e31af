use tests::*;

use pretty_assertions::assert_eq;

async fn owner(db: &Db, name: &str) -> Instance {
    let mut owner = db.new_instance("Owner").unwrap();
    owner.set("name", name).unwrap();
    db.save(&mut owner).await.unwrap();
    owner
}

#[tokio::test]
async fn inherited_belongs_to() {
    let TestDb { db, .. } = setup().await;
    let ann = owner(&db, "Ann").await;

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    dog.associate("owner", &ann).unwrap();
    assert_eq!(dog.get("owner_id").unwrap(), ann.key().clone());
    db.save(&mut dog).await.unwrap();

    let dog = db.find("Dog", dog.key().clone()).await.unwrap();
    let found = db.related(&dog, "owner").await.unwrap().into_one().unwrap();
    assert_eq!(found.ty().name(), "Owner");
    assert_eq!(found.get("name").unwrap(), "Ann");
}

#[tokio::test]
async fn relations_are_not_attributes() {
    let TestDb { db, .. } = setup().await;

    let dog = db.new_instance("Dog").unwrap();
    let err = dog.get("owner").unwrap_err();
    assert!(!err.is_unknown_attribute());
    assert_eq!(
        err.to_string(),
        "`owner` is a relation of `Dog`; load it with `Db::related`"
    );
}

#[tokio::test]
async fn unset_relations_are_empty() {
    let TestDb { db, .. } = setup().await;

    let dog = db.new_instance("Dog").unwrap();
    assert!(db.related(&dog, "owner").await.unwrap().into_one().is_none());

    let ann = db.new_instance("Owner").unwrap();
    assert!(db.related(&ann, "animals").await.unwrap().into_many().is_empty());
}

#[tokio::test]
async fn has_many_from_the_superclass_side() {
    let TestDb { db, .. } = setup().await;
    let ann = owner(&db, "Ann").await;
    let bob = owner(&db, "Bob").await;

    for (name, owner) in [("Rex", &ann), ("Fido", &bob), ("Spot", &ann)] {
        let mut dog = db.new_instance("Dog").unwrap();
        dog.set("name", name).unwrap();
        dog.associate("owner", owner).unwrap();
        db.save(&mut dog).await.unwrap();
    }

    let animals = db.related(&ann, "animals").await.unwrap().into_many();
    let names: Vec<_> = animals
        .iter()
        .map(|animal| animal.get("name").unwrap())
        .collect();
    assert_eq!(names, [Value::from("Rex"), Value::from("Spot")]);
}

#[tokio::test]
async fn inheritance_association() {
    let TestDb { db, .. } = setup().await;

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    db.save(&mut dog).await.unwrap();

    let animal = db.related(&dog, "animal").await.unwrap().into_one().unwrap();
    assert_eq!(animal.ty().name(), "Animal");
    assert_eq!(animal.get("subtype").unwrap(), "Dog");
}

#[tokio::test]
async fn inheritance_association_of_new_instance_is_built() {
    let TestDb { db, log } = setup().await;

    let dog = db.new_instance("Dog").unwrap();
    let animal = db.related(&dog, "animal").await.unwrap().into_one().unwrap();
    assert_eq!(animal.ty().name(), "Animal");
    assert!(!animal.is_persisted());
    assert!(log.is_empty());

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    let animal = db.related(&dog, "animal").await.unwrap().into_one().unwrap();
    assert_eq!(animal.get("name").unwrap(), "Rex");
}

#[tokio::test]
async fn unknown_relation() {
    let TestDb { db, .. } = setup().await;

    let dog = db.new_instance("Dog").unwrap();
    let err = db.related(&dog, "visits").await.unwrap_err();
    assert!(err.is_unknown_attribute());
}

#[tokio::test]
async fn associate_checks_the_target() {
    let TestDb { db, .. } = setup().await;

    let mut dog = db.new_instance("Dog").unwrap();
    let cat = db.new_instance("Cat").unwrap();

    assert!(dog.associate("owner", &cat).is_err());
    assert!(dog
        .associate("animal", &cat)
        .unwrap_err()
        .to_string()
        .contains("is not a belongs_to relation"));
    assert!(dog.associate("vet", &cat).unwrap_err().is_unknown_attribute());
}

#[tokio::test]
async fn delete_destroys_superclass_row() {
    let TestDb { db, mut log } = setup().await;

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    db.save(&mut dog).await.unwrap();

    let mut cat = db.new_instance("Cat").unwrap();
    cat.set("name", "Tom").unwrap();
    db.save(&mut cat).await.unwrap();
    log.clear();

    let dog = db.find("Dog", dog.key().clone()).await.unwrap();
    db.delete(&dog).await.unwrap();

    assert_eq!(log.writes(), ["dogs", "animals"]);
    assert!(db.all("Dog").await.unwrap().is_empty());

    let remaining = db.all("Animal").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].ty().name(), "Cat");
}

#[tokio::test]
async fn delete_without_loaded_association() {
    let TestDb { db, .. } = setup().await;

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    db.save(&mut dog).await.unwrap();

    // Only the identity is known; the superclass row is found by key.
    let mut handle = db.new_instance("Dog").unwrap();
    handle.set("id", dog.key().clone()).unwrap();
    db.delete(&handle).await.unwrap();

    assert!(db.all("Animal").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_unsaved() {
    let TestDb { db, .. } = setup().await;

    let dog = db.new_instance("Dog").unwrap();
    assert!(db.delete(&dog).await.unwrap_err().is_record_not_found());
}

#[tokio::test]
async fn delete_with_unsaved_inherited_writes() {
    let TestDb { db, .. } = setup().await;

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    db.save(&mut dog).await.unwrap();

    // The superclass row built by this write is not the stored one.
    let mut handle = db.new_instance("Dog").unwrap();
    handle.set("id", dog.key().clone()).unwrap();
    handle.set("name", "Whatever").unwrap();
    db.delete(&handle).await.unwrap();

    assert!(db.all("Dog").await.unwrap().is_empty());
    assert!(db.all("Animal").await.unwrap().is_empty());
}
