//! Shared constructors for unit tests.

use crate::normalize::Appearance;
use chrono::NaiveDate;

/// Minimal appearance row; tests fill in the fields they care about.
pub fn appearance(
    show: &str,
    episode: &str,
    air_date: &str,
    animal: &str,
    binomial: &str,
) -> Appearance {
    Appearance {
        show: show.to_string(),
        episode: episode.to_string(),
        air_date: NaiveDate::parse_from_str(air_date, "%Y-%m-%d").unwrap(),
        animal: animal.to_string(),
        animal_subspecies: animal.to_string(),
        scientific_name: Some(binomial.to_string()),
        binomial_name: Some(binomial.to_string()),
        subspecies_status: None,
        species_status: None,
        taxon_class: None,
        taxon_family: None,
        location: None,
        country: None,
        country_code: None,
        continent: None,
        region_id: None,
        lat: None,
        lon: None,
        images: Vec::new(),
        lock_date: None,
        summary: None,
        notes: None,
    }
}
