use thiserror::Error;

/// Sentinel conventionally used by select facets for "no constraint".
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacetError {
    #[error("unknown facet `{0}`")]
    UnknownFacet(String),
}

/// One selectable value of a [`FacetKind::Choice`] facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

impl Choice {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// Free text that re-queries while the user types; debounced.
    Search,
    /// Free text applied as-is on change.
    Text,
    /// Single choice out of a fixed option list.
    Choice(&'static [Choice]),
    /// Numeric bound; only finite numbers at or above `min` are sent.
    Number { min: Option<i64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facet {
    /// Query parameter name.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FacetKind,
    /// Value meaning "no constraint"; never sent to the backend.
    pub unset: &'static str,
}

impl Facet {
    pub const fn search(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: FacetKind::Search, unset: "" }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: FacetKind::Text, unset: "" }
    }

    pub const fn choice(name: &'static str, label: &'static str, options: &'static [Choice]) -> Self {
        Self { name, label, kind: FacetKind::Choice(options), unset: ALL }
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: FacetKind::Number { min: None }, unset: "" }
    }

    /// Lower bound of a number facet, e.g. 0 for prices. No effect on other kinds.
    pub const fn at_least(self, min: i64) -> Self {
        match self.kind {
            FacetKind::Number { .. } => Self { kind: FacetKind::Number { min: Some(min) }, ..self },
            _ => self,
        }
    }

    /// Replace the unset sentinel, e.g. with the default sort key.
    pub const fn unset_as(self, unset: &'static str) -> Self {
        Self { unset, ..self }
    }

    pub fn is_debounced(&self) -> bool {
        matches!(self.kind, FacetKind::Search)
    }

    /// The value to send for `raw`, or `None` when the facet places no
    /// constraint. Malformed input is dropped rather than reported.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() || value == self.unset {
            return None;
        }

        match self.kind {
            FacetKind::Search | FacetKind::Text => Some(value.to_owned()),
            FacetKind::Choice(options) => options
                .iter()
                .any(|c| c.value == value)
                .then(|| value.to_owned()),
            FacetKind::Number { min } => value
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && min.map_or(true, |m| *n >= m as f64))
                .map(|n| n.to_string()),
        }
    }
}

/// Ordered facet list of one list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetSchema {
    facets: &'static [Facet],
}

impl FacetSchema {
    pub const fn new(facets: &'static [Facet]) -> Self {
        Self { facets }
    }

    pub fn facets(&self) -> &'static [Facet] {
        self.facets
    }

    pub fn get(&self, name: &str) -> Option<&'static Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&'static Facet, FacetError> {
        self.get(name)
            .ok_or_else(|| FacetError::UnknownFacet(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTS: &[Choice] = &[
        Choice::new("newest", "Newest"),
        Choice::new("price_asc", "Price: low to high"),
    ];
    const CITIES: &[Choice] = &[Choice::new("Kyrenia", "Kyrenia")];

    #[test]
    fn sentinels_and_blanks_normalize_to_none() {
        let city = Facet::choice("city", "City", CITIES);
        assert_eq!(city.normalize("all"), None);
        assert_eq!(city.normalize("   "), None);
        assert_eq!(city.normalize("Kyrenia").as_deref(), Some("Kyrenia"));

        let sort = Facet::choice("sort", "Sort", SORTS).unset_as("newest");
        assert_eq!(sort.normalize("newest"), None);
        assert_eq!(sort.normalize("price_asc").as_deref(), Some("price_asc"));
    }

    #[test]
    fn choice_outside_options_is_dropped() {
        let sort = Facet::choice("sort", "Sort", SORTS);
        assert_eq!(sort.normalize("random"), None);
    }

    #[test]
    fn numbers_must_be_finite() {
        let min = Facet::number("minPrice", "Min price");
        assert_eq!(min.normalize("abc"), None);
        assert_eq!(min.normalize("NaN"), None);
        assert_eq!(min.normalize("inf"), None);
        assert_eq!(min.normalize(" 1500 ").as_deref(), Some("1500"));
        assert_eq!(min.normalize("1e3").as_deref(), Some("1000"));
        assert_eq!(min.normalize("99.5").as_deref(), Some("99.5"));
    }

    #[test]
    fn numbers_below_the_bound_are_dropped() {
        let price = Facet::number("minPrice", "Min price").at_least(0);
        assert_eq!(price.kind, FacetKind::Number { min: Some(0) });
        assert_eq!(price.normalize("-5"), None);
        assert_eq!(price.normalize("0").as_deref(), Some("0"));

        let offset = Facet::number("offset", "Offset");
        assert_eq!(offset.normalize("-5").as_deref(), Some("-5"));
        assert_eq!(Facet::search("q", "Q").at_least(0).kind, FacetKind::Search);
    }

    #[test]
    fn text_is_trimmed() {
        let q = Facet::search("search", "Search");
        assert!(q.is_debounced());
        assert_eq!(q.normalize("  villa ").as_deref(), Some("villa"));
        assert!(!Facet::text("city", "City").is_debounced());
    }

    #[test]
    fn schema_lookup() {
        const FACETS: &[Facet] = &[Facet::search("search", "Search"), Facet::number("minPrice", "Min")];
        let schema = FacetSchema::new(FACETS);

        assert_eq!(schema.get("minPrice").map(|f| f.kind), Some(FacetKind::Number { min: None }));
        assert_eq!(
            schema.require("colour"),
            Err(FacetError::UnknownFacet("colour".into()))
        );
    }
}
