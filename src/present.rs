//! Display-ready projections: sorted, deduplicated table rows and the
//! per-animal page model
//!
//! Two Appearances that project to an identical display row collapse to one
//! before presentation. Sorting by IUCN status always uses the catalog rank,
//! never the code string.

use crate::aggregate::SpeciesAggregate;
use crate::episodes::EpisodeIndex;
use crate::normalize::Appearance;
use crate::status::{rank_or_last, IucnStatus};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Column a table is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortKey {
    /// Display name, ascending.
    Alphabetical,
    ScientificName,
    /// Fixed catalog order LC,NT,VU,EN,CR,EX,DO,DD,NE; uncoded rows last.
    IucnStatus,
    /// Appearance count descending, display name ascending on ties.
    TimesFeatured,
    Show,
    Episode,
    Date,
    Country,
    Continent,
    /// Subspecies name column of the per-animal table.
    Name,
}

/// Base image host for the episode still galleries.
const IMAGE_BASE_URL: &str = "https://ulluri.com/wildlifeonscreen";

/// Render a date the way the tables do ("7 Mar 2021").
pub fn format_table_date(date: NaiveDate) -> String {
    format!("{} {}", date.day(), date.format("%b %Y"))
}

/// "Show (YYYY)" label used for first/last-seen columns and map tooltips.
fn show_with_year(show: &str, date: NaiveDate) -> String {
    format!("{} ({})", show, date.year())
}

// ============================================================================
// Species summary table (the general page)
// ============================================================================

/// One row of the species summary table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SpeciesRow {
    pub family: Option<String>,
    pub animal: String,
    /// Binomial name, rendered italic by the host layer.
    pub scientific_name: Option<String>,
    pub status: Option<IucnStatus>,
    pub times_featured: usize,
    /// "Show (YYYY)", or "-" when the species has no aggregate.
    pub first_seen: String,
    pub last_seen: String,
}

/// Project appearances onto species summary rows, joined against the
/// per-species aggregates. Identical display rows collapse to one.
pub fn species_rows(
    appearances: &[Appearance],
    aggregates: &BTreeMap<String, SpeciesAggregate>,
) -> Vec<SpeciesRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for appearance in appearances {
        let agg = appearance
            .binomial_name
            .as_deref()
            .and_then(|b| aggregates.get(b));

        let row = SpeciesRow {
            family: appearance.taxon_family.clone(),
            animal: appearance.animal.clone(),
            scientific_name: appearance.binomial_name.clone(),
            status: appearance.species_status,
            times_featured: agg.map(|a| a.times_featured).unwrap_or(0),
            first_seen: agg
                .map(|a| show_with_year(&a.first.show, a.first.air_date))
                .unwrap_or_else(|| "-".to_string()),
            last_seen: agg
                .map(|a| show_with_year(&a.last.show, a.last.air_date))
                .unwrap_or_else(|| "-".to_string()),
        };

        if seen.insert(row.clone()) {
            rows.push(row);
        }
    }

    rows
}

/// Order species summary rows by the chosen key.
pub fn sort_species_rows(rows: &mut [SpeciesRow], key: SortKey) {
    rows.sort_by(|a, b| match key {
        SortKey::ScientificName => a.scientific_name.cmp(&b.scientific_name),
        SortKey::IucnStatus => rank_or_last(a.status)
            .cmp(&rank_or_last(b.status))
            .then_with(|| a.animal.cmp(&b.animal)),
        SortKey::TimesFeatured => b
            .times_featured
            .cmp(&a.times_featured)
            .then_with(|| a.animal.cmp(&b.animal)),
        // Every other key falls back to the display name for this table
        _ => a.animal.cmp(&b.animal),
    });
}

// ============================================================================
// Per-animal appearance table (the animal page)
// ============================================================================

/// One row of an animal's appearance list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AppearanceRow {
    pub show: String,
    pub episode: String,
    /// Rendered date, e.g. "11 Nov 2018".
    pub date: String,
    /// Underlying air date, kept for date sorting.
    pub air_date: NaiveDate,
    /// Streaming link from the episode sheet; absent renders as empty.
    pub watch_link: Option<String>,
    pub country: Option<String>,
    pub continent: Option<String>,
    /// Subspecies display name.
    pub name: String,
    pub scientific_name: Option<String>,
    /// Subspecies-level status.
    pub status: Option<IucnStatus>,
}

/// Order appearance rows by the chosen key.
pub fn sort_appearance_rows(rows: &mut [AppearanceRow], key: SortKey) {
    rows.sort_by(|a, b| {
        let base = match key {
            SortKey::Episode => a.episode.cmp(&b.episode),
            SortKey::Date => a.air_date.cmp(&b.air_date),
            SortKey::Country => a.country.cmp(&b.country),
            SortKey::Continent => a.continent.cmp(&b.continent),
            SortKey::Name | SortKey::Alphabetical => a.name.cmp(&b.name),
            SortKey::ScientificName => a.scientific_name.cmp(&b.scientific_name),
            SortKey::IucnStatus => rank_or_last(a.status).cmp(&rank_or_last(b.status)),
            SortKey::Show | SortKey::TimesFeatured => a.show.cmp(&b.show),
        };
        if base == Ordering::Equal {
            a.air_date.cmp(&b.air_date)
        } else {
            base
        }
    });
}

/// One gallery image with its episode attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub show: String,
    pub episode: String,
    pub year: String,
    pub url: String,
}

/// One point on the animal page location map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    /// Tooltip label, "Show (YYYY)".
    pub label: String,
}

/// Everything the per-animal page renders.
#[derive(Debug, Clone, Serialize)]
pub struct AnimalProfile {
    pub animal: String,
    pub binomial_name: Option<String>,
    pub species_status: Option<IucnStatus>,
    /// Latest species lock date across this animal's rows ("Updated: …").
    pub updated_at: Option<NaiveDate>,
    /// True when the appearance table should show the subspecies columns.
    pub has_multiple_subspecies: bool,
    pub rows: Vec<AppearanceRow>,
    pub gallery: Vec<GalleryImage>,
    pub map_points: Vec<MapPoint>,
}

fn gallery_url(show: &str, episode: &str, air_date: NaiveDate, image: &str) -> String {
    let folder = format!(
        "{}/{} - {}/{}.webp",
        show,
        episode,
        format_table_date(air_date),
        image
    );
    format!("{}/{}", IMAGE_BASE_URL, folder.replace(' ', "%20"))
}

/// Build the per-animal page model. Returns `None` when the animal has no
/// appearances.
///
/// Rows come back deduplicated and ordered by the requested key (air date
/// is the default presentation order for this page).
pub fn animal_profile(
    appearances: &[Appearance],
    animal: &str,
    episodes: &EpisodeIndex,
    sort: SortKey,
) -> Option<AnimalProfile> {
    let mut selected: Vec<&Appearance> = appearances.iter().filter(|a| a.animal == animal).collect();
    if selected.is_empty() {
        return None;
    }
    selected.sort_by(|a, b| {
        a.air_date
            .cmp(&b.air_date)
            .then_with(|| a.show.cmp(&b.show))
            .then_with(|| a.episode.cmp(&b.episode))
    });

    let first = selected[0];
    let updated_at = selected.iter().filter_map(|a| a.lock_date).max();
    let subspecies: HashSet<&str> = selected.iter().map(|a| a.animal_subspecies.as_str()).collect();

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut gallery = Vec::new();
    let mut map_points = Vec::new();

    for appearance in &selected {
        let row = AppearanceRow {
            show: appearance.show.clone(),
            episode: appearance.episode.clone(),
            date: format_table_date(appearance.air_date),
            air_date: appearance.air_date,
            watch_link: episodes
                .link_for(&appearance.show, &appearance.episode)
                .map(String::from),
            country: appearance.country.clone(),
            continent: appearance.continent.clone(),
            name: appearance.animal_subspecies.clone(),
            scientific_name: appearance.scientific_name.clone(),
            status: appearance.subspecies_status,
        };
        if seen.insert(row.clone()) {
            rows.push(row);
        }

        if let Some(image) = appearance.images.first() {
            gallery.push(GalleryImage {
                show: appearance.show.clone(),
                episode: appearance.episode.clone(),
                year: appearance.air_date.year().to_string(),
                url: gallery_url(
                    &appearance.show,
                    &appearance.episode,
                    appearance.air_date,
                    image,
                ),
            });
        }

        if let (Some(lat), Some(lon)) = (appearance.lat, appearance.lon) {
            map_points.push(MapPoint {
                lat,
                lon,
                country: appearance.country.clone(),
                label: show_with_year(&appearance.show, appearance.air_date),
            });
        }
    }

    sort_appearance_rows(&mut rows, sort);

    Some(AnimalProfile {
        animal: animal.to_string(),
        binomial_name: first.binomial_name.clone(),
        species_status: first.species_status,
        updated_at,
        has_multiple_subspecies: subspecies.len() > 1,
        rows,
        gallery,
        map_points,
    })
}
