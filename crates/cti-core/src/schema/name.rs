use heck::{ToSnakeCase, ToUpperCamelCase};

/// A model or association name split into lower-case words.
///
/// Namespace separators (`::`) are treated as word breaks, so
/// `Zoo::BigCat` has the parts `zoo`, `big`, `cat`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Self {
        let parts = src
            .split("::")
            .flat_map(|segment| {
                segment
                    .to_snake_case()
                    .split('_')
                    .filter(|part| !part.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { parts }
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    pub fn upper_camel_case(&self) -> String {
        self.snake_case().to_upper_camel_case()
    }

    /// The name with its last word singularized, e.g. `big_cats` becomes
    /// `big_cat`.
    pub fn singularize(&self) -> Name {
        let mut parts = self.parts.clone();
        if let Some(last) = parts.last_mut() {
            *last = pluralizer::pluralize(last, 1, false);
        }
        Name { parts }
    }
}
