//! Cascading multi-select filters over appearance rows
//!
//! Selection semantics, the one law every page depends on: within a
//! dimension the selected values are OR'ed (row matches if its value is in
//! the set), across dimensions they are AND'ed, and an empty set means "no
//! restriction" — never "exclude all".
//!
//! Cascading (continent narrows the country options, class narrows the
//! family options) only shapes what the UI offers; it has no effect on how
//! a selection is applied.

use crate::normalize::Appearance;
use serde::Serialize;
use std::collections::BTreeSet;

/// The user's current filter state. All sets default to empty, i.e. every
/// row passes.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub continents: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub classes: BTreeSet<String>,
    pub families: BTreeSet<String>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.continents.is_empty()
            && self.countries.is_empty()
            && self.classes.is_empty()
            && self.families.is_empty()
    }
}

fn matches(selection: &BTreeSet<String>, value: Option<&str>) -> bool {
    if selection.is_empty() {
        return true;
    }
    value.is_some_and(|v| selection.contains(v))
}

/// Apply a selection to a row set, producing a new, possibly empty, vector.
/// An empty result is a valid state, not an error.
pub fn apply(appearances: &[Appearance], selection: &FilterSelection) -> Vec<Appearance> {
    appearances
        .iter()
        .filter(|a| {
            matches(&selection.continents, a.continent.as_deref())
                && matches(&selection.countries, a.country.as_deref())
                && matches(&selection.classes, a.taxon_class.as_deref())
                && matches(&selection.families, a.taxon_family.as_deref())
        })
        .cloned()
        .collect()
}

fn sorted_unique<'a>(
    appearances: &'a [Appearance],
    value: impl Fn(&'a Appearance) -> Option<&'a str>,
) -> Vec<String> {
    let set: BTreeSet<&str> = appearances.iter().filter_map(value).collect();
    set.into_iter().map(String::from).collect()
}

/// All continents present in the data, sorted.
pub fn continent_options(appearances: &[Appearance]) -> Vec<String> {
    sorted_unique(appearances, |a| a.continent.as_deref())
}

/// Country options offered to the user. A non-empty continent selection
/// narrows the candidates to countries on those continents.
pub fn country_options(appearances: &[Appearance], continents: &BTreeSet<String>) -> Vec<String> {
    sorted_unique(appearances, |a| {
        if matches(continents, a.continent.as_deref()) {
            a.country.as_deref()
        } else {
            None
        }
    })
}

/// All taxon classes present in the data, sorted.
pub fn class_options(appearances: &[Appearance]) -> Vec<String> {
    sorted_unique(appearances, |a| a.taxon_class.as_deref())
}

/// Family options offered to the user, narrowed by any class selection.
pub fn family_options(appearances: &[Appearance], classes: &BTreeSet<String>) -> Vec<String> {
    sorted_unique(appearances, |a| {
        if matches(classes, a.taxon_class.as_deref()) {
            a.taxon_family.as_deref()
        } else {
            None
        }
    })
}

/// Animal names for the per-animal page selector, sorted.
pub fn animal_options(appearances: &[Appearance]) -> Vec<String> {
    let set: BTreeSet<&str> = appearances.iter().map(|a| a.animal.as_str()).collect();
    set.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::appearance;

    fn sample() -> Vec<Appearance> {
        let mut lion = appearance("S1", "E1", "2020-01-01", "Lion", "Panthera leo");
        lion.continent = Some("Africa".into());
        lion.country = Some("Kenya".into());
        lion.taxon_class = Some("Mammalia".into());
        lion.taxon_family = Some("Felidae".into());

        let mut kea = appearance("S2", "E1", "2021-05-02", "Kea", "Nestor notabilis");
        kea.continent = Some("Oceania".into());
        kea.country = Some("New Zealand".into());
        kea.taxon_class = Some("Aves".into());
        kea.taxon_family = Some("Strigopidae".into());

        let mut jaguar = appearance("S3", "E2", "2019-09-15", "Jaguar", "Panthera onca");
        jaguar.continent = Some("South America".into());
        jaguar.country = Some("Brazil".into());
        jaguar.taxon_class = Some("Mammalia".into());
        jaguar.taxon_family = Some("Felidae".into());

        vec![lion, kea, jaguar]
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let rows = sample();
        let filtered = apply(&rows, &FilterSelection::default());
        assert_eq!(filtered, rows);
    }

    #[test]
    fn test_or_within_dimension() {
        let rows = sample();
        let selection = FilterSelection {
            countries: set(&["Kenya", "Brazil"]),
            ..Default::default()
        };
        let filtered = apply(&rows, &selection);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|a| a.animal != "Kea"));
    }

    #[test]
    fn test_and_across_dimensions() {
        let rows = sample();
        let selection = FilterSelection {
            classes: set(&["Mammalia"]),
            continents: set(&["Africa"]),
            ..Default::default()
        };
        let filtered = apply(&rows, &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].animal, "Lion");
    }

    #[test]
    fn test_empty_result_is_valid() {
        let rows = sample();
        let selection = FilterSelection {
            countries: set(&["Japan"]),
            ..Default::default()
        };
        assert!(apply(&rows, &selection).is_empty());
    }

    #[test]
    fn test_row_with_absent_value_fails_active_filter() {
        let mut rows = sample();
        rows[0].country = None;
        let selection = FilterSelection {
            countries: set(&["Kenya"]),
            ..Default::default()
        };
        assert!(apply(&rows, &selection).is_empty());
    }

    #[test]
    fn test_cascading_country_options() {
        let rows = sample();
        assert_eq!(
            country_options(&rows, &BTreeSet::new()),
            vec!["Brazil", "Kenya", "New Zealand"]
        );
        assert_eq!(country_options(&rows, &set(&["Africa"])), vec!["Kenya"]);
    }

    #[test]
    fn test_cascading_family_options() {
        let rows = sample();
        assert_eq!(
            family_options(&rows, &BTreeSet::new()),
            vec!["Felidae", "Strigopidae"]
        );
        assert_eq!(family_options(&rows, &set(&["Mammalia"])), vec!["Felidae"]);
    }

    #[test]
    fn test_option_lists_sorted_and_deduplicated() {
        let mut rows = sample();
        rows.push(rows[0].clone());
        assert_eq!(continent_options(&rows), vec!["Africa", "Oceania", "South America"]);
        assert_eq!(animal_options(&rows), vec!["Jaguar", "Kea", "Lion"]);
    }
}
