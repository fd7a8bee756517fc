//! Record normalization: raw sheet rows to canonical `Appearance` records
//!
//! The appearance sheet is exported as CSV with underscore-separated column
//! names. Normalization renames columns through a fixed static mapping,
//! derives the binomial species name, maps status codes through the catalog,
//! resolves the map region id, and drops rows for animals not identified to
//! species level.
//!
//! A required column missing from the header row is fatal for the whole
//! source. Everything per-row degrades to absent values and logs a warning
//! instead of aborting the run.

use crate::country;
use crate::status::IucnStatus;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// One species-in-episode appearance event, the canonical record every
/// downstream view is built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appearance {
    pub show: String,
    pub episode: String,
    pub air_date: NaiveDate,
    /// Species-level display name ("Tiger", "Leopard").
    pub animal: String,
    /// Subspecies-level display name ("Amur tiger"). Falls back to the
    /// species name when the sheet has no finer entry.
    pub animal_subspecies: String,
    /// Binomial or trinomial scientific name as recorded.
    pub scientific_name: Option<String>,
    /// First two tokens of the scientific name; absent when the scientific
    /// name has fewer than two tokens.
    pub binomial_name: Option<String>,
    /// Subspecies-level conservation status.
    pub subspecies_status: Option<IucnStatus>,
    /// Species-level conservation status.
    pub species_status: Option<IucnStatus>,
    pub taxon_class: Option<String>,
    pub taxon_family: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub continent: Option<String>,
    /// ISO 3166-1 numeric id for the choropleth join; absent = unmapped.
    pub region_id: Option<u16>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Up to three image identifiers for the gallery.
    pub images: Vec<String>,
    /// Last-verified date of the species entry, shown as "updated at".
    pub lock_date: Option<NaiveDate>,
    pub summary: Option<String>,
    pub notes: Option<String>,
}

// Source column names (underscore form, as exported).
const COL_SHOW: &str = "Show";
const COL_EPISODE: &str = "Episode";
const COL_AIR_DATE: &str = "Air_date";
const COL_ANIMAL_NAME: &str = "Animal_name";
const COL_ANIMAL_NAME_ORIGINAL: &str = "Animal_name_original";
const COL_SCIENTIFIC_NAME: &str = "Scientific_name";
const COL_SPECIES_STATUS: &str = "Species_status";
const COL_SPECIES_STATUS_ORIGINAL: &str = "Species_status_original";
const COL_CLASS: &str = "Class";
const COL_FAMILY: &str = "Family";
const COL_LOCATION: &str = "Location";
const COL_COUNTRY: &str = "Country";
const COL_COUNTRY_CODE: &str = "Country_code";
const COL_CONTINENT: &str = "Continent";
const COL_LAT: &str = "Lat";
const COL_LON: &str = "Lon";
const COL_IMAGE_1: &str = "Image_1";
const COL_IMAGE_2: &str = "Image_2";
const COL_IMAGE_3: &str = "Image_3";
const COL_LOCK_DATE: &str = "Species_lock_date";
const COL_SUMMARY: &str = "Summary";
const COL_NOTES: &str = "Notes";

/// Resolved column positions for the appearance sheet.
///
/// Required columns must exist in the header row; the rest resolve to `None`
/// and every row degrades to absent for that field.
#[derive(Debug, Clone)]
pub struct SheetSchema {
    show: usize,
    episode: usize,
    air_date: usize,
    animal_name: usize,
    animal_name_original: usize,
    scientific_name: usize,
    species_status: Option<usize>,
    species_status_original: Option<usize>,
    class: Option<usize>,
    family: Option<usize>,
    location: Option<usize>,
    country: Option<usize>,
    country_code: Option<usize>,
    continent: Option<usize>,
    lat: Option<usize>,
    lon: Option<usize>,
    images: [Option<usize>; 3],
    lock_date: Option<usize>,
    summary: Option<usize>,
    notes: Option<usize>,
}

impl SheetSchema {
    /// Resolve column positions from the header row. A missing required
    /// column is fatal for the data source.
    pub fn resolve(headers: &StringRecord) -> Result<SheetSchema> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| {
            find(name).ok_or_else(|| {
                anyhow::anyhow!("Missing required column '{}' in appearance sheet", name)
            })
        };

        Ok(SheetSchema {
            show: require(COL_SHOW)?,
            episode: require(COL_EPISODE)?,
            air_date: require(COL_AIR_DATE)?,
            animal_name: require(COL_ANIMAL_NAME)?,
            animal_name_original: require(COL_ANIMAL_NAME_ORIGINAL)?,
            scientific_name: require(COL_SCIENTIFIC_NAME)?,
            species_status: find(COL_SPECIES_STATUS),
            species_status_original: find(COL_SPECIES_STATUS_ORIGINAL),
            class: find(COL_CLASS),
            family: find(COL_FAMILY),
            location: find(COL_LOCATION),
            country: find(COL_COUNTRY),
            country_code: find(COL_COUNTRY_CODE),
            continent: find(COL_CONTINENT),
            lat: find(COL_LAT),
            lon: find(COL_LON),
            images: [find(COL_IMAGE_1), find(COL_IMAGE_2), find(COL_IMAGE_3)],
            lock_date: find(COL_LOCK_DATE),
            summary: find(COL_SUMMARY),
            notes: find(COL_NOTES),
        })
    }
}

/// Derive the binomial (genus + species) name from a possibly trinomial
/// scientific name: the first two whitespace-separated tokens, space-joined.
/// Fewer than two tokens derives nothing.
pub fn binomial_name(scientific_name: &str) -> Option<String> {
    let tokens: Vec<&str> = scientific_name.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    Some(format!("{} {}", tokens[0], tokens[1]))
}

/// Marker used by the data team for animals not identified to species level
/// ("Panthera sp."). Rows carrying it are excluded from every view.
///
/// Substring check, reproduced as-is from the source pipeline. It would
/// misfire on a legitimate name containing "sp." mid-word; none exist in the
/// dataset today.
fn is_indeterminate_species(animal: &str) -> bool {
    animal.contains("sp.")
}

fn non_empty(record: &StringRecord, col: Option<usize>) -> Option<String> {
    let value = col.and_then(|i| record.get(i))?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
}

fn parse_float(record: &StringRecord, col: Option<usize>) -> Option<f64> {
    non_empty(record, col)?.parse().ok()
}

/// Normalize raw sheet rows into canonical `Appearance` records.
///
/// Row-level anomalies (missing optional fields, unparseable coordinates,
/// unknown status codes, unresolvable countries) degrade to absent values.
/// Rows with no usable animal name or air date are dropped with a warning,
/// as are indeterminate-species rows.
pub fn normalize<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<Appearance>> {
    let headers = reader.headers().context("Failed to read header row")?.clone();
    let schema = SheetSchema::resolve(&headers)?;

    let mut appearances = Vec::new();

    for (row_num, result) in reader.records().enumerate() {
        let record = result.context("Failed to read CSV row")?;

        let animal = match non_empty(&record, Some(schema.animal_name_original)) {
            Some(a) => a,
            None => {
                log::warn!("Row {}: no animal name, skipping", row_num + 1);
                continue;
            }
        };

        if is_indeterminate_species(&animal) {
            log::debug!("Row {}: indeterminate species '{}', skipping", row_num + 1, animal);
            continue;
        }

        let air_date = match non_empty(&record, Some(schema.air_date)).and_then(|d| parse_date(&d))
        {
            Some(d) => d,
            None => {
                log::warn!("Row {}: missing or unparseable air date, skipping", row_num + 1);
                continue;
            }
        };

        let show = non_empty(&record, Some(schema.show)).unwrap_or_default();
        let episode = non_empty(&record, Some(schema.episode)).unwrap_or_default();
        let animal_subspecies =
            non_empty(&record, Some(schema.animal_name)).unwrap_or_else(|| animal.clone());

        let scientific_name = non_empty(&record, Some(schema.scientific_name));
        let binomial = scientific_name.as_deref().and_then(binomial_name);

        let country = non_empty(&record, schema.country);
        let country_code = non_empty(&record, schema.country_code);
        let region_id = country_code
            .as_deref()
            .and_then(country::resolve)
            .or_else(|| country.as_deref().and_then(country::resolve));

        let images = schema
            .images
            .iter()
            .filter_map(|&col| non_empty(&record, col))
            .collect();

        appearances.push(Appearance {
            show,
            episode,
            air_date,
            animal,
            animal_subspecies,
            binomial_name: binomial,
            scientific_name,
            subspecies_status: non_empty(&record, schema.species_status)
                .and_then(|c| IucnStatus::parse_code(&c)),
            species_status: non_empty(&record, schema.species_status_original)
                .and_then(|c| IucnStatus::parse_code(&c)),
            taxon_class: non_empty(&record, schema.class),
            taxon_family: non_empty(&record, schema.family),
            location: non_empty(&record, schema.location),
            country,
            country_code,
            continent: non_empty(&record, schema.continent),
            region_id,
            lat: parse_float(&record, schema.lat),
            lon: parse_float(&record, schema.lon),
            images,
            lock_date: non_empty(&record, schema.lock_date).and_then(|d| parse_date(&d)),
            summary: non_empty(&record, schema.summary),
            notes: non_empty(&record, schema.notes),
        });
    }

    Ok(appearances)
}

/// Normalize a CSV document held in memory (the cached sheet export).
pub fn normalize_csv_str(csv_data: &str) -> Result<Vec<Appearance>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_data.as_bytes());
    normalize(&mut reader)
}

/// Normalize a local CSV snapshot file.
pub fn normalize_csv_path(path: &Path) -> Result<Vec<Appearance>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open appearance CSV {}", path.display()))?;
    normalize(&mut reader)
}
