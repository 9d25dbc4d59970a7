use std::collections::BTreeMap;

use crate::schema::{Facet, FacetSchema};

/// Current value of every facet of a list page, keyed by facet name.
///
/// Starts with every facet at its unset sentinel. Only user actions change it;
/// fetch results never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    values: BTreeMap<&'static str, String>,
}

impl FilterState {
    pub fn new(schema: &FacetSchema) -> Self {
        let values = schema
            .facets()
            .iter()
            .map(|f| (f.name, f.unset.to_owned()))
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Store `value` for `facet`. Returns whether anything changed.
    pub fn set(&mut self, facet: &Facet, value: String) -> bool {
        match self.values.get_mut(facet.name) {
            Some(current) if *current == value => false,
            Some(current) => {
                *current = value;
                true
            }
            None => {
                self.values.insert(facet.name, value);
                true
            }
        }
    }

    /// Put every facet back to its sentinel in one step.
    pub fn reset(&mut self, schema: &FacetSchema) {
        *self = Self::new(schema);
    }

    pub fn is_default(&self, schema: &FacetSchema) -> bool {
        schema
            .facets()
            .iter()
            .all(|f| self.get(f.name).map_or(true, |v| v == f.unset))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Choice, Facet};

    const FACETS: &[Facet] = &[
        Facet::search("search", "Search"),
        Facet::choice("city", "City", &[Choice::new("Kyrenia", "Kyrenia")]),
    ];
    const SCHEMA: FacetSchema = FacetSchema::new(FACETS);

    #[test]
    fn starts_at_sentinels() {
        let state = FilterState::new(&SCHEMA);
        assert_eq!(state.get("search"), Some(""));
        assert_eq!(state.get("city"), Some("all"));
        assert!(state.is_default(&SCHEMA));
    }

    #[test]
    fn set_reports_changes_only() {
        let mut state = FilterState::new(&SCHEMA);
        let city = SCHEMA.get("city").unwrap();

        assert!(state.set(city, "Kyrenia".into()));
        assert!(!state.set(city, "Kyrenia".into()));
        assert!(!state.is_default(&SCHEMA));

        state.reset(&SCHEMA);
        assert!(state.is_default(&SCHEMA));
    }
}
