//! WOS CSV Tool - Run the appearance pipeline over sheet snapshots
//!
//! This tool processes locally exported CSV snapshots of the appearance and
//! episode sheets, producing the same tables and chart summaries the
//! dashboard pages render: the filtered species summary, per-animal
//! appearance lists, and counts by status and country.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use wildscreen_toolkit::aggregate;
use wildscreen_toolkit::episodes::{watch_icon, EpisodeIndex};
use wildscreen_toolkit::filter::{self, FilterSelection};
use wildscreen_toolkit::normalize;
use wildscreen_toolkit::present::{
    self, animal_profile, sort_species_rows, species_rows, SortKey,
};

#[derive(Parser)]
#[command(name = "wos-csv")]
#[command(about = "Build dashboard tables and chart summaries from appearance sheet CSVs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filtered species summary table (the general page)
    SpeciesTable {
        /// Appearance sheet CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Restrict to these continents (repeatable)
        #[arg(long)]
        continent: Vec<String>,

        /// Restrict to these countries (repeatable)
        #[arg(long)]
        country: Vec<String>,

        /// Restrict to these taxon classes (repeatable)
        #[arg(long)]
        class: Vec<String>,

        /// Restrict to these taxon families (repeatable)
        #[arg(long)]
        family: Vec<String>,

        /// Sort column: alphabetical, scientific-name, iucn-status, times-featured
        #[arg(long, default_value = "alphabetical")]
        sort_by: String,

        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Appearance list, gallery and map points for one animal
    Animal {
        /// Appearance sheet CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Episode sheet CSV with streaming links
        #[arg(short, long)]
        episodes: Option<PathBuf>,

        /// Animal display name, e.g. "Tiger"
        #[arg(short, long)]
        name: String,

        /// Sort column: show, episode, date, country, continent, name,
        /// scientific-name, iucn-status
        #[arg(long, default_value = "date")]
        sort_by: String,

        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Unique species counts per IUCN status, in catalog order
    StatusChart {
        /// Appearance sheet CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Restrict to these continents (repeatable)
        #[arg(long)]
        continent: Vec<String>,

        /// Restrict to these taxon classes (repeatable)
        #[arg(long)]
        class: Vec<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Unique species counts per country, with choropleth region ids
    CountryChart {
        /// Appearance sheet CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Show only the top N countries (0 = all)
        #[arg(long, default_value = "10")]
        top: usize,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Filter options offered by the UI, after cascade narrowing
    ListOptions {
        /// Appearance sheet CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Continents narrowing the country options (repeatable)
        #[arg(long)]
        continent: Vec<String>,

        /// Classes narrowing the family options (repeatable)
        #[arg(long)]
        class: Vec<String>,
    },
}

fn parse_sort_key(name: &str) -> Result<SortKey> {
    match name {
        "alphabetical" => Ok(SortKey::Alphabetical),
        "scientific-name" => Ok(SortKey::ScientificName),
        "iucn-status" => Ok(SortKey::IucnStatus),
        "times-featured" => Ok(SortKey::TimesFeatured),
        "show" => Ok(SortKey::Show),
        "episode" => Ok(SortKey::Episode),
        "date" => Ok(SortKey::Date),
        "country" => Ok(SortKey::Country),
        "continent" => Ok(SortKey::Continent),
        "name" => Ok(SortKey::Name),
        _ => Err(anyhow::anyhow!("Unknown sort column '{}'", name)),
    }
}

fn to_set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::SpeciesTable {
            input,
            continent,
            country,
            class,
            family,
            sort_by,
            json,
        } => {
            let sort = parse_sort_key(&sort_by)?;
            let rows = normalize::normalize_csv_path(&input)?;
            let selection = FilterSelection {
                continents: to_set(continent),
                countries: to_set(country),
                classes: to_set(class),
                families: to_set(family),
            };
            let filtered = filter::apply(&rows, &selection);
            let aggregates = aggregate::aggregate(&filtered);
            let mut table = species_rows(&filtered, &aggregates);
            sort_species_rows(&mut table, sort);

            if table.is_empty() {
                println!("No matches for the current filters.");
                return Ok(());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
                return Ok(());
            }

            println!(
                "{:>4}  {:<24} {:<28} {:<8} {:>9}  {:<20} {:<20}",
                "#", "Animal", "Scientific name", "Status", "Featured", "First seen", "Last seen"
            );
            println!("{:-<120}", "");
            for (i, row) in table.iter().enumerate() {
                println!(
                    "{:>4}  {:<24} {:<28} {:<8} {:>9}  {:<20} {:<20}",
                    i + 1,
                    row.animal,
                    row.scientific_name.as_deref().unwrap_or("-"),
                    row.status.map(|s| s.code()).unwrap_or("-"),
                    row.times_featured,
                    row.first_seen,
                    row.last_seen
                );
            }
        }

        Commands::Animal {
            input,
            episodes,
            name,
            sort_by,
            json,
        } => {
            let sort = parse_sort_key(&sort_by)?;
            let rows = normalize::normalize_csv_path(&input)?;
            let episode_index = match episodes {
                Some(path) => EpisodeIndex::from_csv_path(&path)?,
                None => EpisodeIndex::default(),
            };

            let profile = animal_profile(&rows, &name, &episode_index, sort)
                .with_context(|| format!("No appearances found for '{}'", name))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
                return Ok(());
            }

            println!("{}", profile.animal);
            if let Some(binomial) = &profile.binomial_name {
                let status = profile
                    .species_status
                    .map(|s| format!(" [{}]", s.label()))
                    .unwrap_or_default();
                println!("{}{}", binomial, status);
            }
            if let Some(updated) = profile.updated_at {
                println!("Updated: {}", present::format_table_date(updated));
            }

            println!(
                "\n{:<20} {:<24} {:<14} {:<10} {:<16} {:<14}",
                "Show", "Episode", "Date", "Watch", "Country", "Continent"
            );
            println!("{:-<100}", "");
            for row in &profile.rows {
                let watch = match &row.watch_link {
                    Some(link) => {
                        if watch_icon(link).contains("bbci") {
                            "BBC"
                        } else {
                            "Netflix"
                        }
                    }
                    None => "",
                };
                println!(
                    "{:<20} {:<24} {:<14} {:<10} {:<16} {:<14}",
                    row.show,
                    row.episode,
                    row.date,
                    watch,
                    row.country.as_deref().unwrap_or(""),
                    row.continent.as_deref().unwrap_or("")
                );
            }

            if profile.has_multiple_subspecies {
                println!(
                    "\n{:<24} {:<30} {:<8}",
                    "Name", "Scientific name", "Status"
                );
                println!("{:-<64}", "");
                for row in &profile.rows {
                    println!(
                        "{:<24} {:<30} {:<8}",
                        row.name,
                        row.scientific_name.as_deref().unwrap_or(""),
                        row.status.map(|s| s.code()).unwrap_or("")
                    );
                }
            }

            if !profile.gallery.is_empty() {
                println!("\nGallery:");
                for image in &profile.gallery {
                    println!("  {} - {} ({}): {}", image.show, image.episode, image.year, image.url);
                }
            }

            if !profile.map_points.is_empty() {
                println!("\nMap points:");
                for point in &profile.map_points {
                    println!(
                        "  {:>8.3}, {:>8.3}  {} [{}]",
                        point.lat,
                        point.lon,
                        point.label,
                        point.country.as_deref().unwrap_or("unmapped")
                    );
                }
            }
        }

        Commands::StatusChart {
            input,
            continent,
            class,
            json,
        } => {
            let rows = normalize::normalize_csv_path(&input)?;
            let selection = FilterSelection {
                continents: to_set(continent),
                classes: to_set(class),
                ..Default::default()
            };
            let filtered = filter::apply(&rows, &selection);
            let counts = aggregate::species_count_by_status(&filtered);

            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
                return Ok(());
            }

            println!("{:<24} {:<6} {:>9}", "IUCN status", "Code", "# Species");
            println!("{:-<42}", "");
            for count in &counts {
                println!("{:<24} {:<6} {:>9}", count.label, count.status.code(), count.species);
            }
        }

        Commands::CountryChart { input, top, json } => {
            let rows = normalize::normalize_csv_path(&input)?;
            let mut counts = aggregate::species_count_by_country(&rows);
            if top > 0 {
                counts.truncate(top);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
                return Ok(());
            }

            println!("{:<28} {:>9} {:>10}", "Country", "# Species", "Region id");
            println!("{:-<50}", "");
            for count in &counts {
                let region = count
                    .region_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "unmapped".to_string());
                println!("{:<28} {:>9} {:>10}", count.country, count.species, region);
            }
        }

        Commands::ListOptions {
            input,
            continent,
            class,
        } => {
            let rows = normalize::normalize_csv_path(&input)?;
            let continents = to_set(continent);
            let classes = to_set(class);

            println!("Continents: {}", filter::continent_options(&rows).join(", "));
            println!(
                "Countries:  {}",
                filter::country_options(&rows, &continents).join(", ")
            );
            println!("Classes:    {}", filter::class_options(&rows).join(", "));
            println!(
                "Families:   {}",
                filter::family_options(&rows, &classes).join(", ")
            );
            println!("Animals:    {}", filter::animal_options(&rows).join(", "));
        }
    }

    Ok(())
}
