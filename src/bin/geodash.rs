use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};

use geodash::{
    Config, Fps, FrameRenderer, IndicatorReport, Pipeline, PipelineOpts, ReferenceData,
    Selection, Theme, WorldBankClient, YearRange,
};

#[derive(Parser, Debug)]
#[command(name = "geodash", version)]
struct Cli {
    /// JSON config file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the indicator catalog.
    Metrics,
    /// List the provider's country directory.
    Countries(CountriesArgs),
    /// Render the selected metrics for the selected countries.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct CountriesArgs {
    /// Case-insensitive substring filter on the display name.
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Country display name; repeat for several.
    #[arg(long = "country", default_values_t = ["Pakistan".to_string(), "India".to_string()])]
    countries: Vec<String>,

    /// Metric display name; repeat for several.
    #[arg(long = "metric", default_values_t = ["GDP per Capita (current US$)".to_string()])]
    metrics: Vec<String>,

    #[arg(long, value_enum, default_value_t = ThemeArg::Light)]
    theme: ThemeArg,

    /// Animation frames per second.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=5))]
    fps: u32,

    /// First date of the range (YYYY-MM-DD); the config value when omitted.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date of the range (YYYY-MM-DD); the config value when omitted.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Directory receiving the PNG, GIF and MP4 of each metric.
    #[arg(long, default_value = "geodash-out")]
    out: PathBuf,

    /// Also write each animated chart as `<code>.chart.json`.
    #[arg(long)]
    chart_json: bool,

    /// Print the raw observations of each metric.
    #[arg(long)]
    show_data: bool,

    /// Override the boundary GeoJSON (path or URL).
    #[arg(long)]
    boundaries: Option<String>,

    /// Override the provider base URL.
    #[arg(long)]
    api_base_url: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    match cli.cmd {
        Command::Metrics => cmd_metrics(),
        Command::Countries(args) => cmd_countries(&cfg, args),
        Command::Run(args) => {
            if let Some(b) = &args.boundaries {
                cfg.boundaries = b.clone();
            }
            if let Some(url) = &args.api_base_url {
                cfg.api_base_url = url.clone();
            }
            cmd_run(&cfg, args)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "geodash=info",
        1 => "geodash=debug",
        _ => "geodash=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .ok();
}

fn cmd_metrics() -> anyhow::Result<()> {
    let mut table = new_table(["Metric", "Code"]);
    for ind in geodash::IndicatorCatalog::builtin().iter() {
        table.add_row([ind.name.as_str(), ind.code.as_str()]);
    }
    println!("{table}");
    Ok(())
}

fn cmd_countries(cfg: &Config, args: CountriesArgs) -> anyhow::Result<()> {
    cfg.validate()?;
    let client = WorldBankClient::from_config(cfg)?;
    let dir = geodash::CountryDirectory::from_countries(
        geodash::DataProvider::country_directory(&client)?,
    );
    let filter = args.filter.map(|f| f.to_lowercase());

    let mut table = new_table(["Country", "Id"]);
    for c in dir.iter() {
        if filter
            .as_deref()
            .is_some_and(|f| !c.name.to_lowercase().contains(f))
        {
            continue;
        }
        table.add_row([c.name.as_str(), c.id.as_str()]);
    }
    println!("{table}");
    Ok(())
}

fn cmd_run(cfg: &Config, args: RunArgs) -> anyhow::Result<()> {
    cfg.validate()?;
    let years = YearRange::from_dates(
        args.from.unwrap_or(cfg.start_date),
        args.to.unwrap_or(cfg.end_date),
    )?;
    let sel = Selection {
        countries: args.countries,
        metrics: args.metrics,
        theme: args.theme.into(),
        fps: Fps::new(args.fps)?,
        years,
    };
    // Cheap checks before any network traffic.
    sel.validate()?;

    let client = WorldBankClient::from_config(cfg)?;
    let refdata = ReferenceData::load(&client, cfg)?;
    let renderer = FrameRenderer::new(cfg.canvas)?;
    let pipeline = Pipeline::new(&client, &refdata, &renderer, PipelineOpts::from_config(cfg));

    let report = pipeline.run(&sel)?;
    if !report.resolution.unresolved.is_empty() {
        eprintln!(
            "warning: unknown countries ignored: {}",
            report.resolution.unresolved.join(", ")
        );
    }

    let mut undelivered = 0usize;
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(r) => {
                print_report(r, args.show_data);
                match deliver(r, &args.out, args.chart_json) {
                    Ok(written) => {
                        for path in written {
                            eprintln!("wrote {}", path.display());
                        }
                    }
                    Err(e) => {
                        eprintln!("error: Error with {}: {e:#}", outcome.metric);
                        undelivered += 1;
                    }
                }
            }
            Err(e) if e.is_warning() => eprintln!("warning: {e}"),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    if undelivered > 0 {
        anyhow::bail!("{undelivered} metric(s) could not be written to '{}'", args.out.display());
    }
    Ok(())
}

/// Write the artifacts of one metric, plus its chart JSON when asked.
fn deliver(r: &IndicatorReport, out: &Path, chart_json: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = r.artifacts.write_to(out)?;
    if chart_json {
        let path = out.join(format!("{}.chart.json", r.indicator.code));
        std::fs::write(&path, r.chart.to_json()?)
            .with_context(|| format!("write '{}'", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn print_report(r: &IndicatorReport, show_data: bool) {
    println!("{}", r.chart.title);

    let countries: Vec<&String> = r.trend.series.keys().collect();
    let mut header = vec!["Year".to_string()];
    header.extend(countries.iter().map(|c| c.to_string()));
    let mut trend = new_table(header);
    for (i, year) in r.trend.years.iter().enumerate() {
        let mut row = vec![year.to_string()];
        for c in &countries {
            let v = r.trend.series[*c].get(i).copied().flatten();
            row.push(v.map(format_value).unwrap_or_default());
        }
        trend.add_row(row);
    }
    right_align_numbers(&mut trend);
    println!("{trend}");

    if show_data {
        let mut raw = new_table(["Country", "Year", r.indicator.code.as_str()]);
        for row in r.table.rows() {
            raw.add_row(vec![
                row.country.clone(),
                row.year.to_string(),
                format_value(row.value),
            ]);
        }
        right_align_numbers(&mut raw);
        println!("{raw}");
    }
}

fn new_table<T: Into<Cell>>(header: impl IntoIterator<Item = T>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn right_align_numbers(table: &mut Table) {
    for column in table.column_iter_mut().skip(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

fn format_value(v: f64) -> String {
    if v.abs() >= 1e6 {
        format!("{v:.3e}")
    } else {
        format!("{v:.2}")
    }
}
