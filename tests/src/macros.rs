/// Asserts that the model named `$model` inherits through the association
/// `$association`, e.g. `assert_inherits_from!(db, "Dog", "animal")`.
#[macro_export]
macro_rules! assert_inherits_from {
    ($db:expr, $model:expr, $association:expr) => {{
        let ty = $db.ty($model).unwrap();
        let expected = $crate::association_name($association);
        match ty.association_name() {
            Some(actual) => assert_eq!(
                actual, expected,
                "expected `{}` to inherit from {}",
                $model, $association
            ),
            None => panic!("expected `{}` to inherit from {}", $model, $association),
        }
    }};
}

/// Asserts that rows of the model named `$model` are re-resolved by
/// discriminator.
#[macro_export]
macro_rules! assert_acts_as_superclass {
    ($db:expr, $model:expr) => {{
        let ty = $db.ty($model).unwrap();
        assert!(
            ty.acts_as_superclass(),
            "expected `{}` to act as a superclass",
            $model
        );
    }};
}
