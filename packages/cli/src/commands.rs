//! Subcommand implementations.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;
use std::time::Instant;

use ufo_map_analytics::{
    CategoryCount, ColumnStats, GroupBy, SightingFilter, count_by, count_by_year, describe,
    map_points,
};
use ufo_map_cli_utils::{LoadProgress, MultiProgress};
use ufo_map_ingest::{CleanDataset, LoadOptions, SourceLocation, load_clean_dataset};
use ufo_map_sighting_models::CleanSighting;

async fn load(
    multi: &MultiProgress,
    source: &str,
    options: &LoadOptions,
) -> Result<CleanDataset, Box<dyn std::error::Error>> {
    let location = SourceLocation::parse(source);
    let progress = LoadProgress::rows_spinner(multi, &format!("Loading {location}"));
    let start = Instant::now();

    let dataset = load_clean_dataset(&location, options, &progress).await?;

    log::info!(
        "Loaded {} clean sightings ({} dropped) in {:.1}s",
        dataset.report.rows_kept,
        dataset.report.rows_dropped,
        start.elapsed().as_secs_f64()
    );

    Ok(dataset)
}

/// Cleans a source and writes the sightings as JSON.
pub async fn clean(
    multi: &MultiProgress,
    source: &str,
    options: &LoadOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load(multi, source, options).await?;

    let mut writer: BufWriter<Box<dyn std::io::Write>> = match output {
        Some(path) => BufWriter::new(Box::new(File::create(path)?)),
        None => BufWriter::new(Box::new(std::io::stdout().lock())),
    };
    serde_json::to_writer_pretty(&mut writer, &dataset.sightings)?;
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = output {
        log::info!("Wrote {} sightings to {}", dataset.len(), path.display());
    }

    Ok(())
}

/// Prints summary tables, optionally restricted by shape and country.
///
/// A side left empty on the command line is not filtered.
pub async fn summary(
    multi: &MultiProgress,
    source: &str,
    options: &LoadOptions,
    shapes: Vec<String>,
    countries: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load(multi, source, options).await?;

    let mut filter = SightingFilter::any();
    if !shapes.is_empty() {
        filter = filter.with_shapes(shapes);
    }
    if !countries.is_empty() {
        filter = filter.with_countries(countries);
    }
    let selected: Vec<CleanSighting> = if filter == SightingFilter::any() {
        dataset.sightings
    } else {
        filter.apply(&dataset.sightings).into_iter().cloned().collect()
    };

    if selected.is_empty() {
        log::warn!("No matching sightings; adjust the filters or check the source");
        return Ok(());
    }

    let stats = describe(&selected);
    println!("Sightings: {}", stats.count);
    print_stats("latitude", stats.latitude);
    print_stats("longitude", stats.longitude);
    println!("Map points: {}", map_points(&selected).len());

    for group_by in [GroupBy::Country, GroupBy::State, GroupBy::SettlementType] {
        print_counts(&group_by.to_string(), &count_by(&selected, group_by));
    }

    println!();
    println!("By year:");
    for year in count_by_year(&selected) {
        println!("  {:<24} {:>8}", year.year, year.count);
    }

    Ok(())
}

fn print_stats(label: &str, stats: Option<ColumnStats>) {
    let Some(stats) = stats else {
        return;
    };
    let std = stats
        .std
        .map_or_else(|| "-".to_string(), |std| format!("{std:.4}"));
    println!(
        "  {label:<10} mean {:>10.4}  std {std:>10}  min {:>10.4}  25% {:>10.4}  \
         50% {:>10.4}  75% {:>10.4}  max {:>10.4}",
        stats.mean, stats.min, stats.p25, stats.median, stats.p75, stats.max
    );
}

fn print_counts(label: &str, counts: &[CategoryCount]) {
    println!();
    println!("By {label}:");
    for count in counts {
        println!("  {:<24} {:>8}", count.category, count.count);
    }
}
