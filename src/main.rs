use clap::Parser;
use remedix_core::{Catalog, CatalogConfig, ColumnMap, Criteria, DuplicatePolicy, Recommender};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// A content-based drug recommendation engine
#[derive(Parser, Debug)]
#[command(name = "remedix")]
#[command(about = "Recommend alternative drugs by indication/side-effect similarity", long_about = None)]
struct Args {
    /// Drug to find alternatives for
    drug: String,

    /// Path to the drug dataset (CSV)
    #[arg(short, long, default_value = "./data/drugs.csv")]
    data: PathBuf,

    /// Lower price bound (requires --price-max)
    #[arg(long)]
    price_min: Option<f64>,

    /// Upper price bound (requires --price-min)
    #[arg(long)]
    price_max: Option<f64>,

    /// Side effect to exclude (repeatable)
    #[arg(long = "exclude", value_name = "EFFECT")]
    excluded_effects: Vec<String>,

    /// Number of recommendations
    #[arg(long, default_value_t = 3)]
    count: usize,

    /// Keep rows that share a drug name instead of rejecting the dataset
    #[arg(long)]
    allow_duplicates: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Header of the drug name column
    #[arg(long, value_name = "HEADER")]
    col_name: Option<String>,

    /// Header of the therapeutic class column
    #[arg(long, value_name = "HEADER")]
    col_therapeutic: Option<String>,

    /// Header of the chemical class column
    #[arg(long, value_name = "HEADER")]
    col_chemical: Option<String>,

    /// Header of the action class column
    #[arg(long, value_name = "HEADER")]
    col_action: Option<String>,

    /// Header of the indication text column
    #[arg(long, value_name = "HEADER")]
    col_uses: Option<String>,

    /// Header of the side-effect text column
    #[arg(long, value_name = "HEADER")]
    col_side_effects: Option<String>,

    /// Header of the price column
    #[arg(long, value_name = "HEADER")]
    col_price: Option<String>,
}

impl Args {
    fn catalog_config(&self) -> CatalogConfig {
        let mut columns = ColumnMap::default();
        let overrides = [
            (&self.col_name, &mut columns.name),
            (&self.col_therapeutic, &mut columns.therapeutic_class),
            (&self.col_chemical, &mut columns.chemical_class),
            (&self.col_action, &mut columns.action_class),
            (&self.col_uses, &mut columns.uses),
            (&self.col_side_effects, &mut columns.side_effects),
            (&self.col_price, &mut columns.price),
        ];
        for (override_value, target) in overrides {
            if let Some(header) = override_value {
                *target = header.clone();
            }
        }

        CatalogConfig {
            columns,
            duplicates: if self.allow_duplicates {
                DuplicatePolicy::FirstWins
            } else {
                DuplicatePolicy::Reject
            },
        }
    }

    fn criteria(&self) -> anyhow::Result<Criteria> {
        let mut criteria = Criteria::default().with_result_count(self.count);
        criteria.excluded_effects = self.excluded_effects.clone();
        match (self.price_min, self.price_max) {
            (Some(min), Some(max)) => criteria.price_range = Some((min, max)),
            (None, None) => {}
            _ => anyhow::bail!("--price-min and --price-max must be given together"),
        }
        Ok(criteria)
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    details: &'a remedix_core::DrugRecord,
    price_range: (f64, f64),
    recommendations: &'a [remedix_core::Recommendation],
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting remedix v{}", env!("CARGO_PKG_VERSION"));
    info!("Dataset: {:?}", args.data);

    let load_start = Instant::now();
    let catalog = Catalog::load_path(&args.data, &args.catalog_config())?;
    info!("Catalog loaded in {:?}", load_start.elapsed());

    let build_start = Instant::now();
    let engine = Recommender::build(catalog);
    info!("Similarity index built in {:?}", build_start.elapsed());

    let criteria = args.criteria()?;
    let recommendations = engine.recommend(&args.drug, &criteria)?;
    let details = engine
        .details(&args.drug)
        .ok_or_else(|| anyhow::anyhow!("drug not found: {}", args.drug))?;

    if args.json {
        let output = JsonOutput {
            details,
            price_range: engine.price_range(),
            recommendations: &recommendations,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());
    println!("{}", details.name);
    println!("  therapeutic class: {}", or_na(&details.therapeutic_class));
    println!("  chemical class:    {}", or_na(&details.chemical_class));
    println!("  action class:      {}", or_na(&details.action_class));
    println!("  uses:              {}", details.uses_features);
    println!("  side effects:      {}", details.side_effect_features);
    if details.has_price() {
        println!("  price:             {:.2}", details.price);
    } else {
        println!("  price:             unknown");
    }

    println!("\nAlternatives:");
    for rec in &recommendations {
        println!("  {:<24} similarity {:.2}", rec.name, rec.score);
    }

    Ok(())
}
