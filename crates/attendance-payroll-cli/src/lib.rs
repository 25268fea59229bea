mod config;
mod fetch;
mod render;
mod show;

use std::io::IsTerminal as _;
use std::path::PathBuf;

use anyhow::Result;
use attendance_payroll::{RawPayload, ReportConfig, ReportMonth};
use clap::{Args as ClapArgs, CommandFactory as _, Parser, Subcommand};

use config::{Config, LogSource};

#[derive(Parser)]
#[command(
    name = "attendance-payroll",
    about = "Monthly attendance and salary report from device logs"
)]
#[command(disable_help_subcommand = true)]
struct Args {
    /// Configuration file. Defaults to attendance-payroll.toml in the current directory.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    period: PeriodArgs,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(ClapArgs)]
struct PeriodArgs {
    /// Report year. Defaults to the current year.
    #[arg(short, long, global = true)]
    year: Option<String>,

    /// Report month (1-12). Defaults to the current month.
    #[arg(short, long, global = true)]
    month: Option<String>,
}

impl PeriodArgs {
    /// Unparsable values fall back to the current year or month instead of failing the run.
    fn resolve(&self, today: chrono::NaiveDate) -> ReportMonth {
        let year = parse_period(self.year.as_deref(), "year");
        let month = parse_period(self.month.as_deref(), "month");
        ReportMonth::resolve(year, month, today)
    }
}

fn parse_period<T: std::str::FromStr>(value: Option<&str>, name: &str) -> Option<T> {
    let value = value?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Invalid {name} '{value}', using the current {name}");
            None
        }
    }
}

#[derive(ClapArgs)]
struct SourceArgs {
    /// Fetch attendance logs from this URL instead of the configured source
    #[arg(long, global = true, conflicts_with = "file")]
    url: Option<String>,

    /// Read attendance logs from a JSON file instead of the configured source
    #[arg(long, global = true)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the CSV report (default)
    Report {
        /// Output file. Defaults to attendance-report-MM-YYYY.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the salary summary to the terminal and exit
    Show,
}

pub async fn run(args: impl IntoIterator<Item = String>) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "attendance_payroll=info,attendance_payroll_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    clap_complete::CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse_from(args);
    let mut config = load_config(args.config.as_deref())?;
    if let Some(url) = args.source.url {
        config.source.source = Some(LogSource::Url(url));
    } else if let Some(file) = args.source.file {
        config.source.source = Some(LogSource::File(file));
    }

    let now = chrono::Local::now().naive_local();
    let month = args.period.resolve(now.date());

    tracing::info!("Fetching data for {month}");
    let payload = fetch::fetch_payload(&config.source).await;
    let report = build_report(month, &config, &payload);

    match args.command.unwrap_or(Commands::Report { output: None }) {
        Commands::Show => {
            let stdout = std::io::stdout();
            let color = stdout.is_terminal();
            show::show_summary(stdout.lock(), &report, color)?;
        }
        Commands::Report { output } => {
            let path = output
                .or_else(|| config.report.output.clone())
                .unwrap_or_else(|| render::default_output_path(&report));
            let meta = render::ReportMeta {
                company_name: &config.report.company_name,
                title: &config.report.title,
                generated_at: now,
            };

            tracing::info!("Building report");
            render::write_report(&path, &report, &meta)?;
            println!("✓ Report saved as '{}'", path.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => Some(Config::load_from_file(path)?),
        None => Config::find_and_load()?,
    };

    Ok(match loaded {
        Some((base_dir, mut config)) => {
            config.resolve_paths(&base_dir);
            config
        }
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    })
}

fn build_report(
    month: ReportMonth,
    config: &Config,
    payload: &RawPayload,
) -> attendance_payroll::MonthlyReport {
    let report = ReportConfig::new(month, config.rules.clone(), config.financials.clone())
        .build(payload);

    let stats = report.stats;
    if stats.dropped_records > 0 {
        tracing::warn!("Skipped {} malformed employee record(s)", stats.dropped_records);
    }
    if stats.dropped_entries > 0 {
        tracing::warn!("Skipped {} malformed log entr(y/ies)", stats.dropped_entries);
    }
    if stats.duplicate_entries > 0 {
        tracing::info!("Ignored {} duplicate log entr(y/ies)", stats.duplicate_entries);
    }
    if stats.outside_month > 0 {
        tracing::debug!("{} log entr(y/ies) fall outside {month}", stats.outside_month);
    }
    if report.is_empty() {
        tracing::warn!("No employee data. Report will have headers only.");
    } else {
        tracing::info!("Reconciled {} employee(s)", report.employees.len());
    }

    report
}
