use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use indexmap::IndexMap;
use tracing::{info, warn};

use menu_anchor::{localize_pages, MatcherConfig, PageBundle, PageRecord};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "Locate catalog item names on OCR'd menu pages and write one record per page.",
    arg_required_else_help = true
)]
pub struct Args {
    /// Path to the JSON page bundle ({"pages": [...]})
    pub input: PathBuf,

    /// Optional output file path. If omitted, writes to stdout.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[clap(short, long)]
    pub pretty: bool,

    /// TOML matcher configuration
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Override the configured left column fraction (1.0 = whole page)
    #[clap(long)]
    pub left_column_fraction: Option<f64>,

    /// Directory for the trace-level engine log
    #[clap(long)]
    pub log_dir: Option<PathBuf>,

    /// Log matching decisions at debug level
    #[clap(short, long)]
    pub verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _guard = match &args.log_dir {
        Some(dir) => Some(menu_anchor::logging::init_logging_with_dir(args.verbose, dir)?),
        None => {
            menu_anchor::logging::init_logging(args.verbose);
            None
        }
    };

    let mut config = match &args.config {
        Some(path) => MatcherConfig::from_toml_file(path)?,
        None => MatcherConfig::default(),
    };
    if let Some(fraction) = args.left_column_fraction {
        config.region.left_column_fraction = fraction;
        config.validate()?;
    }

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let mut bundle: PageBundle = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let base_dir = args
        .input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    for page in &mut bundle.pages {
        page.resolve_true_size(&base_dir)?;
    }

    let results = localize_pages(&bundle.pages, &config);

    let mut records: IndexMap<String, PageRecord> = IndexMap::with_capacity(results.len());
    let mut failed = 0usize;
    for (id, result) in results {
        match result {
            Ok(record) => {
                records.insert(id, record);
            }
            Err(e) => {
                warn!(page = %id, error = %e, "Skipping page");
                failed += 1;
            }
        }
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("Output written to: {:?}", path);
        }
        None => println!("{}", json),
    }

    if failed > 0 {
        bail!("{failed} page(s) could not be localized");
    }
    Ok(())
}
