use tests::*;

use pretty_assertions::assert_eq;

fn vehicle() -> Model {
    Model::new("Vehicle")
        .table_name("vehicles")
        .column(Column::new("id", Type::I64).auto_increment())
        .column(Column::new("wheels", Type::I64))
        .column(Column::new("subtype", Type::String))
}

fn car() -> Model {
    Model::new("Car")
        .table_name("cars")
        .column(Column::new("vehicle_id", Type::I64))
        .column(Column::new("doors", Type::I64))
}

#[tokio::test]
async fn dog_inherits_from_animal() {
    let mut builder = Db::builder();
    builder
        .register(
            Model::new("Animal")
                .table_name("animals")
                .column(Column::new("id", Type::I64).auto_increment())
                .column(Column::new("name", Type::String))
                .column(Column::new("subtype", Type::String)),
        )
        .register(
            Model::new("Dog")
                .table_name("dogs")
                .column(Column::new("animal_id", Type::I64))
                .column(Column::new("breed", Type::String)),
        )
        .inherits_from("Dog", "animal");

    let TestDb { db, .. } = setup_with(builder).await;

    let ty = db.ty("Dog").unwrap();
    assert_eq!(ty.inherited_column_names(), ["name"]);

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    dog.set("breed", "Lab").unwrap();
    db.save(&mut dog).await.unwrap();

    let animal = dog.association().unwrap();
    assert_eq!(animal.get("subtype").unwrap(), "Dog");
    assert_eq!(dog.get("animal_id").unwrap(), animal.get("id").unwrap());

    let reloaded = db.find("Dog", dog.key().clone()).await.unwrap();
    assert_eq!(reloaded.get("name").unwrap(), "Rex");
    assert_eq!(reloaded.get("breed").unwrap(), "Lab");
}

#[tokio::test]
async fn matchers() {
    let TestDb { db, .. } = setup().await;

    assert_inherits_from!(db, "Dog", "animal");
    assert_inherits_from!(db, "Cat", "Animal");
    assert_acts_as_superclass!(db, "Animal");
}

#[tokio::test]
#[should_panic(expected = "expected `Owner` to inherit from animal")]
async fn inherits_from_matcher_fails_for_base_models() {
    let TestDb { db, .. } = setup().await;
    assert_inherits_from!(db, "Owner", "animal");
}

#[tokio::test]
async fn declaration_repoints_primary_key() {
    let TestDb { db, .. } = setup().await;

    let dog = db.ty("Dog").unwrap();
    assert!(dog.inherits());
    assert_eq!(dog.primary_key(), "animal_id");
    assert_eq!(dog.association_name(), Some("animal"));
    assert_eq!(dog.superclass().unwrap().name(), "Animal");

    let relation = dog.model().relation_by_name("animal").unwrap();
    assert_eq!(relation.target, "Animal");
    assert_eq!(relation.dependent, Dependent::Destroy);

    let animal = db.ty("Animal").unwrap();
    assert!(!animal.inherits());
    assert_eq!(animal.primary_key(), "id");
}

#[tokio::test]
async fn inherited_members() {
    let TestDb { db, .. } = setup().await;

    let dog = db.ty("Dog").unwrap();
    assert_eq!(dog.inherited_column_names(), ["name", "owner_id"]);
    assert_eq!(dog.inherited_method_names(), ["owner"]);

    let cat = db.ty("Cat").unwrap();
    assert_eq!(cat.inherited_column_names(), ["name", "owner_id"]);

    assert!(db.ty("Owner").unwrap().inherited_column_names().is_empty());
}

#[tokio::test]
async fn mappings_are_kept_per_type() {
    let mut builder = models::builder();
    builder
        .register(vehicle())
        .register(car())
        .inherits_from("Car", "vehicle");

    let TestDb { db, log } = setup_with(builder).await;

    assert_eq!(db.ty("Dog").unwrap().association_name(), Some("animal"));
    assert_eq!(db.ty("Car").unwrap().association_name(), Some("vehicle"));
    assert_eq!(db.ty("Car").unwrap().inherited_column_names(), ["wheels"]);

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    db.save(&mut dog).await.unwrap();

    let mut car = db.new_instance("Car").unwrap();
    car.set("wheels", 4).unwrap();
    car.set("doors", 2).unwrap();
    db.save(&mut car).await.unwrap();

    assert_eq!(log.writes(), ["animals", "dogs", "vehicles", "cars"]);

    let car = db.find("Car", car.key().clone()).await.unwrap();
    assert_eq!(car.get("wheels").unwrap(), 4);
    assert_eq!(car.association().unwrap().get("subtype").unwrap(), "Car");
}

#[tokio::test]
async fn namespaced_association_ids() {
    let mut builder = Db::builder();
    builder
        .register(
            Model::new("Zoo::Keeper")
                .column(Column::new("id", Type::I64).auto_increment())
                .column(Column::new("badge", Type::String)),
        )
        .register(
            Model::new("Intern")
                .column(Column::new("zoo_keeper_id", Type::I64))
                .column(Column::new("school", Type::String)),
        )
        .inherits_from("Intern", "Zoo::Keeper");

    let TestDb { db, .. } = setup_with(builder).await;

    let intern = db.ty("Intern").unwrap();
    assert_eq!(intern.association_name(), Some("zoo_keeper"));
    assert_eq!(intern.primary_key(), "zoo_keeper_id");
    assert_eq!(intern.superclass().unwrap().table_name(), "zoo_keeper");

    let mut intern = db.new_instance("Intern").unwrap();
    intern.set("badge", "B-12").unwrap();
    db.save(&mut intern).await.unwrap();
    assert_eq!(intern.get("id").unwrap(), 1);
}

#[tokio::test]
async fn table_name_prefix() {
    let mut builder = models::builder();
    builder.table_name_prefix("test_");

    let TestDb { db, log } = setup_with(builder).await;
    assert_eq!(db.ty("Dog").unwrap().table_name(), "test_dogs");

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    db.save(&mut dog).await.unwrap();

    assert_eq!(log.writes(), ["test_animals", "test_dogs"]);
}

#[tokio::test]
async fn unknown_association_target() {
    let mut builder = Db::builder();
    builder
        .register(models::dog())
        .inherits_from("Dog", "plant");

    let err = build(builder, Memory::new()).await.unwrap_err();
    assert!(err.is_unknown_model());
    assert_eq!(
        err.to_string(),
        "declaring `Dog` inherits from `plant`: resolving association `plant` of `Dog`: unknown model: `plant`"
    );
}

#[tokio::test]
async fn unregistered_subclass() {
    let mut builder = models::builder();
    builder.inherits_from("Bird", "animal");

    let err = build(builder, Memory::new()).await.unwrap_err();
    assert!(err.is_unknown_model());
}

#[tokio::test]
async fn second_mapping_for_a_subclass() {
    let mut builder = models::builder();
    builder.inherits_from("Dog", "owner");

    let err = build(builder, Memory::new()).await.unwrap_err();
    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: `Dog` already inherits from `animal`"
    );
}

#[tokio::test]
async fn subclass_without_foreign_key_column() {
    let mut builder = Db::builder();
    builder
        .register(models::animal())
        .register(models::owner())
        .register(Model::new("Fish").column(Column::new("fins", Type::I64)))
        .inherits_from("Fish", "animal");

    let err = build(builder, Memory::new()).await.unwrap_err();
    assert!(err.is_invalid_schema());
}

#[tokio::test]
async fn multi_level_inheritance_is_rejected() {
    let mut builder = models::builder();
    builder
        .register(Model::new("Puppy").column(Column::new("dog_id", Type::I64)))
        .inherits_from("Puppy", "dog");

    let err = build(builder, Memory::new()).await.unwrap_err();
    assert!(err.is_invalid_schema());
}

#[tokio::test]
async fn acts_as_superclass_requires_discriminator_column() {
    let mut builder = models::builder();
    builder.acts_as_superclass("Owner");

    let TestDb { db, .. } = setup_with(builder).await;
    assert!(!db.ty("Owner").unwrap().acts_as_superclass());
    assert!(db.ty("Animal").unwrap().acts_as_superclass());
}

#[tokio::test]
async fn acts_as_superclass_unknown_model() {
    let mut builder = models::builder();
    builder.acts_as_superclass("Plant");

    let err = build(builder, Memory::new()).await.unwrap_err();
    assert!(err.is_unknown_model());
}

#[tokio::test]
async fn custom_discriminator_column() {
    let mut builder = Db::builder();
    builder
        .register(
            Model::new("Animal")
                .table_name("animals")
                .column(Column::new("id", Type::I64).auto_increment())
                .column(Column::new("name", Type::String))
                .column(Column::new("kind", Type::String)),
        )
        .register(models::dog())
        .inherits_from("Dog", "animal")
        .acts_as_superclass("Animal")
        .discriminator_column("kind");

    let TestDb { db, .. } = setup_with(builder).await;
    assert_eq!(db.ty("Dog").unwrap().inherited_column_names(), ["name"]);
    assert_eq!(
        db.new_instance("Dog").unwrap().attribute_names(),
        ["name", "animal_id", "breed"]
    );

    let mut dog = db.new_instance("Dog").unwrap();
    dog.set("name", "Rex").unwrap();
    db.save(&mut dog).await.unwrap();

    assert_eq!(dog.association().unwrap().get("kind").unwrap(), "Dog");
    let found = db.find("Animal", dog.key().clone()).await.unwrap();
    assert_eq!(found.ty().name(), "Dog");
}

#[tokio::test]
async fn unknown_models() {
    let TestDb { db, .. } = setup().await;

    assert!(db.new_instance("Bird").unwrap_err().is_unknown_model());
    assert!(db.find("Bird", 1).await.unwrap_err().is_unknown_model());
    assert!(db.all("Bird").await.unwrap_err().is_unknown_model());
}

#[tokio::test]
async fn display_types() {
    let TestDb { db, .. } = setup().await;

    assert_eq!(
        db.ty("Dog").unwrap().to_string(),
        "Dog(animal_id: i64, breed: string)"
    );
    assert_eq!(
        db.ty("Cat").unwrap().to_string(),
        "Cat(animal_id: i64, lives: i64)"
    );
}
