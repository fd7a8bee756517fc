//! Per-species aggregates and chart-ready grouped summaries
//!
//! Aggregation is a pure view over the appearance set: recomputed fresh on
//! every run, never persisted, idempotent and order-independent. Appearances
//! order by `(air_date, show, episode)` — the explicit tie-break for rows
//! sharing an air date, so first/last appearance never depends on incidental
//! input order.

use crate::normalize::Appearance;
use crate::status::IucnStatus;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Where and when a species appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppearanceRef {
    pub show: String,
    pub episode: String,
    pub air_date: NaiveDate,
}

impl AppearanceRef {
    fn of(appearance: &Appearance) -> AppearanceRef {
        AppearanceRef {
            show: appearance.show.clone(),
            episode: appearance.episode.clone(),
            air_date: appearance.air_date,
        }
    }

    /// Ordering key: air date first, then show and episode lexicographic.
    fn sort_key(&self) -> (NaiveDate, &str, &str) {
        (self.air_date, &self.show, &self.episode)
    }
}

/// First/last appearance and appearance count for one species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesAggregate {
    pub binomial_name: String,
    pub first: AppearanceRef,
    pub last: AppearanceRef,
    pub times_featured: usize,
}

/// Compute per-species aggregates keyed by binomial name.
///
/// Rows without a binomial name carry no species identity and are skipped.
/// `times_featured` is derived by counting rows here rather than read from
/// the sheet's own appearance-number column, which is not kept consistent
/// across re-exports.
pub fn aggregate(appearances: &[Appearance]) -> BTreeMap<String, SpeciesAggregate> {
    let mut result: BTreeMap<String, SpeciesAggregate> = BTreeMap::new();

    for appearance in appearances {
        let Some(binomial) = appearance.binomial_name.as_deref() else {
            continue;
        };
        let candidate = AppearanceRef::of(appearance);

        match result.get_mut(binomial) {
            None => {
                result.insert(
                    binomial.to_string(),
                    SpeciesAggregate {
                        binomial_name: binomial.to_string(),
                        first: candidate.clone(),
                        last: candidate,
                        times_featured: 1,
                    },
                );
            }
            Some(agg) => {
                if candidate.sort_key() < agg.first.sort_key() {
                    agg.first = candidate.clone();
                }
                if candidate.sort_key() > agg.last.sort_key() {
                    agg.last = candidate;
                }
                agg.times_featured += 1;
            }
        }
    }

    result
}

/// One bar of the species-by-status chart, with the catalog styling the
/// rendering layer applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: IucnStatus,
    pub label: &'static str,
    pub species: usize,
    pub fill_color: &'static str,
    pub border_color: &'static str,
}

/// Unique species (binomial names) per species-level status, in catalog
/// display order. Statuses with no species are omitted; rows with no status
/// code are not charted.
pub fn species_count_by_status(appearances: &[Appearance]) -> Vec<StatusCount> {
    let mut species_by_status: HashMap<IucnStatus, HashSet<&str>> = HashMap::new();

    for appearance in appearances {
        let (Some(status), Some(binomial)) =
            (appearance.species_status, appearance.binomial_name.as_deref())
        else {
            continue;
        };
        species_by_status.entry(status).or_default().insert(binomial);
    }

    crate::status::ALL_STATUSES
        .iter()
        .filter_map(|&status| {
            let species = species_by_status.get(&status)?.len();
            Some(StatusCount {
                status,
                label: status.label(),
                species,
                fill_color: status.fill_color(),
                border_color: status.border_color(),
            })
        })
        .collect()
}

/// One bar of the species-by-country chart / one region of the choropleth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub species: usize,
    /// ISO 3166-1 numeric id for the map join; `None` = listed in the bar
    /// chart but absent from the choropleth.
    pub region_id: Option<u16>,
}

/// Unique species per country, sorted by species count descending, country
/// name ascending on ties.
pub fn species_count_by_country(appearances: &[Appearance]) -> Vec<CountryCount> {
    let mut species_by_country: BTreeMap<&str, (Option<u16>, HashSet<&str>)> = BTreeMap::new();

    for appearance in appearances {
        let (Some(country), Some(binomial)) =
            (appearance.country.as_deref(), appearance.binomial_name.as_deref())
        else {
            continue;
        };
        let entry = species_by_country
            .entry(country)
            .or_insert_with(|| (appearance.region_id, HashSet::new()));
        if entry.0.is_none() {
            entry.0 = appearance.region_id;
        }
        entry.1.insert(binomial);
    }

    let mut counts: Vec<CountryCount> = species_by_country
        .into_iter()
        .map(|(country, (region_id, species))| CountryCount {
            country: country.to_string(),
            species: species.len(),
            region_id,
        })
        .collect();

    counts.sort_by(|a, b| b.species.cmp(&a.species).then_with(|| a.country.cmp(&b.country)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::appearance;

    #[test]
    fn test_first_last_and_count() {
        let rows = vec![
            appearance("S1", "E1", "2020-01-01", "Lion", "Panthera leo"),
            appearance("S2", "E2", "2022-06-01", "Lion", "Panthera leo"),
        ];
        let aggregates = aggregate(&rows);
        let lion = &aggregates["Panthera leo"];
        assert_eq!(lion.first.air_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(lion.first.show, "S1");
        assert_eq!(lion.last.air_date, NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
        assert_eq!(lion.last.show, "S2");
        assert_eq!(lion.times_featured, 2);
    }

    #[test]
    fn test_order_independence() {
        let mut rows = vec![
            appearance("S1", "E1", "2020-01-01", "Lion", "Panthera leo"),
            appearance("S2", "E2", "2022-06-01", "Lion", "Panthera leo"),
            appearance("S3", "E1", "2021-03-05", "Lion", "Panthera leo"),
        ];
        let forward = aggregate(&rows);
        rows.reverse();
        let backward = aggregate(&rows);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_idempotence() {
        let rows = vec![
            appearance("S1", "E1", "2020-01-01", "Lion", "Panthera leo"),
            appearance("S1", "E2", "2020-01-08", "Tiger", "Panthera tigris"),
        ];
        assert_eq!(aggregate(&rows), aggregate(&rows));
    }

    #[test]
    fn test_same_date_tie_break_on_episode() {
        // Two appearances on the same air date order by (show, episode)
        let rows = vec![
            appearance("S1", "E2", "2020-01-01", "Lion", "Panthera leo"),
            appearance("S1", "E1", "2020-01-01", "Lion", "Panthera leo"),
        ];
        let aggregates = aggregate(&rows);
        let lion = &aggregates["Panthera leo"];
        assert_eq!(lion.first.episode, "E1");
        assert_eq!(lion.last.episode, "E2");
    }

    #[test]
    fn test_rows_without_binomial_are_skipped() {
        let mut row = appearance("S1", "E1", "2020-01-01", "Mystery", "Panthera leo");
        row.binomial_name = None;
        assert!(aggregate(&[row]).is_empty());
    }

    #[test]
    fn test_status_counts_in_rank_order() {
        let mut lion = appearance("S1", "E1", "2020-01-01", "Lion", "Panthera leo");
        lion.species_status = Some(IucnStatus::Vulnerable);
        let mut tiger = appearance("S1", "E2", "2020-01-08", "Tiger", "Panthera tigris");
        tiger.species_status = Some(IucnStatus::Endangered);
        let mut tiger2 = appearance("S2", "E1", "2021-01-08", "Tiger", "Panthera tigris");
        tiger2.species_status = Some(IucnStatus::Endangered);
        let mut wolf = appearance("S3", "E1", "2019-02-02", "Wolf", "Canis lupus");
        wolf.species_status = Some(IucnStatus::LeastConcern);

        let counts = species_count_by_status(&[tiger, lion, wolf, tiger2]);
        let codes: Vec<&str> = counts.iter().map(|c| c.status.code()).collect();
        assert_eq!(codes, ["LC", "VU", "EN"]);
        // Two tiger rows still count one species
        assert_eq!(counts[2].species, 1);
    }

    #[test]
    fn test_country_counts_sorted_descending() {
        let mut kenya1 = appearance("S1", "E1", "2020-01-01", "Lion", "Panthera leo");
        kenya1.country = Some("Kenya".into());
        kenya1.region_id = Some(404);
        let mut kenya2 = appearance("S1", "E2", "2020-01-08", "Cheetah", "Acinonyx jubatus");
        kenya2.country = Some("Kenya".into());
        kenya2.region_id = Some(404);
        let mut atlantis = appearance("S2", "E1", "2021-01-01", "Kraken", "Architeuthis dux");
        atlantis.country = Some("Atlantis".into());
        atlantis.region_id = None;

        let counts = species_count_by_country(&[atlantis.clone(), kenya1, kenya2]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].country, "Kenya");
        assert_eq!(counts[0].species, 2);
        assert_eq!(counts[0].region_id, Some(404));
        // Unmapped country keeps its bar but has no choropleth id
        assert_eq!(counts[1].country, "Atlantis");
        assert_eq!(counts[1].region_id, None);
    }
}
