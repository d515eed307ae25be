use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use zonal_catalog::epoch::{GeoLocation, MeanOfDate, ObservationContext, EPOCH_JD};
use zonal_catalog::query::Catalog;
use zonal_catalog::store::record::CatalogStar;
use zonal_catalog::Equatorial;

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "query-zonal")]
#[command(about = "Query zone/bin-indexed star catalogs")]
struct Cli {
    /// Catalog root directory (contains u4i/ and u4b/)
    #[arg(long)]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print catalog health and zone availability
    Info,
    /// Perform a cone search
    Search {
        /// Center right ascension, degrees
        ra: f64,
        /// Center declination, degrees
        dec: f64,
        /// Search radius in degrees
        #[arg(long, default_value = "1.0")]
        radius: f64,
        /// Exclude stars fainter than this magnitude
        #[arg(long)]
        mag_max: Option<f64>,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
        /// Observation epoch as a Julian day (default: catalog epoch)
        #[arg(long)]
        jd: Option<f64>,
        /// Print query timing
        #[arg(long)]
        timing: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Look up stars by designation, e.g. "UCAC4 451-012345"
    Find {
        /// Designation text, partial running index allowed
        text: String,
        /// Maximum number of results
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = Catalog::new(&cli.root, HashMap::new());
    let loaded = catalog.initialize()?;

    match cli.command {
        Commands::Info => {
            println!("Root: {}", cli.root.display());
            println!("Loaded: {}", loaded);
            if let Err(e) = Catalog::validate(&cli.root) {
                println!("Diagnostic: {}", e);
            }
            println!("Available zones: {}/900", catalog.available_zone_count());
        }
        Commands::Search {
            ra,
            dec,
            radius,
            mag_max,
            limit,
            jd,
            timing,
            format,
        } => {
            anyhow::ensure!(loaded, "catalog failed validation; see `info`");

            let ctx = ObservationContext::new(
                jd.unwrap_or(EPOCH_JD),
                GeoLocation::default(),
                Arc::new(MeanOfDate),
            );
            let center = Equatorial {
                ra_deg: ra,
                dec_deg: dec,
            };

            let start = timing.then(Instant::now);

            let iter = catalog.query(&ctx, center, radius, move |mag| {
                mag_max.map_or(true, |m| mag <= m)
            });
            let mut results = Vec::new();
            for star in iter {
                results.push(star?);
                if limit.is_some_and(|l| results.len() == l) {
                    break;
                }
            }

            if let Some(start_time) = start {
                let elapsed = start_time.elapsed();
                eprintln!(
                    "Query completed in {:.2} ms",
                    elapsed.as_secs_f64() * 1000.0
                );
            }

            match format {
                OutputFormat::Table => print_table(&results),
                OutputFormat::Json => print_json(&results)?,
                OutputFormat::Csv => print_csv(&results),
            }
        }
        Commands::Find { text, limit } => {
            anyhow::ensure!(loaded, "catalog failed validation; see `info`");

            let ctx =
                ObservationContext::new(EPOCH_JD, GeoLocation::default(), Arc::new(MeanOfDate));
            let results = catalog.designation_search(&ctx, &text, limit)?;
            print_table(&results);
        }
    }

    Ok(())
}

fn print_table(results: &[CatalogStar]) {
    for (i, star) in results.iter().enumerate() {
        let name = star.name.as_deref().unwrap_or("");
        println!(
            "{:4}: {:>16} RA={:10.6}\u{b0} Dec={:+10.6}\u{b0} Mag={:5.2} Class={} {}",
            i + 1,
            star.designation(),
            star.ra_deg,
            star.dec_deg,
            star.mag,
            star.spectral_class,
            name
        );
    }

    if results.is_empty() {
        println!("No stars found matching the search criteria.");
    } else {
        println!("\nTotal results: {}", results.len());
    }
}

#[derive(serde::Serialize)]
struct JsonStar<'a> {
    designation: String,
    ra_deg: f64,
    dec_deg: f64,
    mag: f64,
    b_mag: f64,
    v_mag: f64,
    spectral_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

fn print_json(results: &[CatalogStar]) -> anyhow::Result<()> {
    let stars: Vec<JsonStar> = results
        .iter()
        .map(|s| JsonStar {
            designation: s.designation(),
            ra_deg: s.ra_deg,
            dec_deg: s.dec_deg,
            mag: s.mag,
            b_mag: s.b_mag,
            v_mag: s.v_mag,
            spectral_class: s.spectral_class.to_string(),
            name: s.name.as_deref(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&stars)?);
    Ok(())
}

fn print_csv(results: &[CatalogStar]) {
    println!("designation,ra_deg,dec_deg,mag,b_mag,v_mag,spectral_class,name");
    for s in results {
        println!(
            "{},{},{},{},{},{},{},{}",
            s.designation(),
            s.ra_deg,
            s.dec_deg,
            s.mag,
            s.b_mag,
            s.v_mag,
            s.spectral_class,
            s.name.as_deref().unwrap_or("")
        );
    }
}
