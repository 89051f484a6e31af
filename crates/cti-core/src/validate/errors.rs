use indexmap::IndexMap;

/// Validation failures keyed by attribute name, in the order they were added.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Errors {
    messages: IndexMap<String, Vec<String>>,
}

impl Errors {
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for one attribute.
    pub fn on(&self, attribute: &str) -> &[String] {
        self.messages
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.messages.contains_key(attribute)
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Iterates `(attribute, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.messages.iter().flat_map(|(attribute, messages)| {
            messages
                .iter()
                .map(move |message| (attribute.as_str(), message.as_str()))
        })
    }

    /// Messages prefixed with the humanized attribute name, e.g.
    /// `Name can't be blank`.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .map(|(attribute, message)| format!("{} {}", humanize(attribute), message))
            .collect()
    }
}

fn humanize(attribute: &str) -> String {
    let spaced = attribute.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
