use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use searchgap::{
    config::{load_run_config, ProfileName, RunConfig},
    pipeline, Report,
};
use std::{
    collections::BTreeSet,
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Compare an Ads search-terms export with an Organic query export and list
/// the paid terms that get little or no organic visibility.
#[derive(Parser, Debug)]
#[command(name = "searchgap", version, about)]
struct Cli {
    /// Ads search-terms CSV (two metadata lines, header on line 3)
    #[arg(long, value_name = "PATH")]
    ads: PathBuf,
    /// Organic query CSV (header line starting with `query,`)
    #[arg(long, value_name = "PATH")]
    organic: PathBuf,
    /// YAML run configuration (profile, columns, filters)
    #[arg(long, value_name = "PATH", env = "SEARCHGAP_CONFIG")]
    config: Option<PathBuf>,
    /// Ads export language; overrides the config file
    #[arg(long, env = "SEARCHGAP_PROFILE")]
    profile: Option<ProfileName>,
    #[arg(long)]
    min_ads_exposures: Option<u64>,
    #[arg(long)]
    min_ads_interactions: Option<u64>,
    #[arg(long)]
    max_organic_impressions: Option<u64>,
    /// Keep only these campaigns (repeatable)
    #[arg(long = "campaign", value_name = "NAME")]
    campaigns: Vec<String>,
    /// Write the report here instead of printing it
    #[arg(long, short, value_name = "PATH")]
    out: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
    /// Print the campaigns found and exit
    #[arg(long)]
    list_campaigns: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Fixed-width text table on stdout
    Table,
    Csv,
    Json,
    Parquet,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,searchgap=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ─── 2) resolve configuration ───────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => load_run_config(path)?,
        None => RunConfig::default(),
    };
    apply_overrides(&mut config, &cli);
    let profile = config.column_profile();
    info!(profile = config.profile.as_str(), custom = config.columns.is_some(), "configured");

    // ─── 3) read both exports into memory ───────────────────────────
    let ads = fs::read(&cli.ads).with_context(|| format!("reading Ads export {:?}", cli.ads))?;
    let organic = fs::read(&cli.organic)
        .with_context(|| format!("reading Organic export {:?}", cli.organic))?;

    // ─── 4) reconcile ───────────────────────────────────────────────
    let reconciliation = match pipeline::reconcile_exports(&ads, &organic, &profile) {
        Ok(r) => r,
        Err(e) => {
            if e.is_format_error() {
                error!("check that the right files were supplied: {}", e);
            }
            return Err(e.into());
        }
    };

    if cli.list_campaigns {
        for campaign in searchgap::reconcile::campaigns(&reconciliation.records) {
            println!("{}", if campaign.is_empty() { "(none)" } else { campaign.as_str() });
        }
        return Ok(());
    }

    let report = reconciliation.into_report(&config.filters);

    // ─── 5) emit ────────────────────────────────────────────────────
    if report.is_empty() {
        println!("no rows match the current filters");
        return Ok(());
    }
    match (&cli.out, cli.format) {
        (Some(path), Format::Parquet) => report.write_parquet(path)?,
        (Some(path), Format::Csv) => {
            fs::write(path, report.to_csv()?).with_context(|| format!("writing {:?}", path))?
        }
        (Some(path), Format::Json) => {
            fs::write(path, report.to_json()?).with_context(|| format!("writing {:?}", path))?
        }
        (None, Format::Json) => println!("{}", report.to_json()?),
        (None, Format::Csv) => io::stdout().write_all(&report.to_csv()?)?,
        (None, Format::Table) => print_table(&report),
        (Some(_), Format::Table) => bail!("--format table prints to stdout; drop --out"),
        (None, Format::Parquet) => bail!("--format parquet needs --out"),
    }
    if let Some(path) = &cli.out {
        info!(path = %path.display(), "report written");
    }

    info!("all done");
    Ok(())
}

fn apply_overrides(config: &mut RunConfig, cli: &Cli) {
    if let Some(profile) = cli.profile {
        config.profile = profile;
        config.columns = None;
    }
    let filters = &mut config.filters;
    if cli.min_ads_exposures.is_some() {
        filters.min_ads_exposures = cli.min_ads_exposures;
    }
    if cli.min_ads_interactions.is_some() {
        filters.min_ads_interactions = cli.min_ads_interactions;
    }
    if cli.max_organic_impressions.is_some() {
        filters.max_organic_impressions = cli.max_organic_impressions;
    }
    if !cli.campaigns.is_empty() {
        filters.allowed_campaigns = Some(cli.campaigns.iter().cloned().collect::<BTreeSet<_>>());
    }
}

fn print_table(report: &Report) {
    println!("\nResult ({} rows)", report.len());
    println!(
        "{: <40} {: <20} {:>12} {:>12} {:>12} {:>8}",
        "Ads search term", "Ads campaign", "Ads exp.", "Ads int.", "Organic exp.", "Visible"
    );
    println!("{:-<109}", "");
    for r in &report.rows {
        println!(
            "{: <40} {: <20} {:>12} {:>12} {:>12} {:>8}",
            r.term,
            r.campaign,
            r.ads_exposures,
            r.ads_interactions,
            r.organic_impressions,
            if r.visible { "yes" } else { "no" }
        );
    }
    println!(
        "\n{} of {} reconciled rows shown, {} without organic impressions",
        report.len(),
        report.reconciled_rows,
        report.hidden_terms()
    );
}
