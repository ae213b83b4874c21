use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use hourbank_client::{ReportSession, normalize_base_url};
use hourbank_core::MonthKey;

mod config;
mod report;

#[derive(Parser, Debug)]
#[command(name = "hourbank", version, about = "Hour-bank calculator for the FolhaPonto intranet")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and compute the hour bank over a month range
    Calc(CalcArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct CalcArgs {
    /// Intranet base URL (defaults to the configured one)
    #[arg(long)]
    url: Option<String>,

    /// Intranet username
    #[arg(long)]
    user: String,

    /// First month of the range, MM/YYYY (default: one year back)
    #[arg(long)]
    from: Option<MonthKey>,

    /// Last month of the range, MM/YYYY (default: last month)
    #[arg(long)]
    to: Option<MonthKey>,

    /// Export the monthly detail as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Export the full summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the plain-text report
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.hourbank/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Calc(args) => calc(args).await?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

async fn calc(args: CalcArgs) -> Result<()> {
    if args.user.trim().is_empty() {
        bail!("username is empty");
    }

    let cfg = config::load_config()?;
    let raw_url = args
        .url
        .or_else(|| (!cfg.intranet.base_url.trim().is_empty()).then(|| cfg.intranet.base_url.clone()))
        .context("no intranet URL: pass --url or set intranet.base_url in the config")?;
    let base_url = normalize_base_url(&raw_url)?;

    let (from, to) = resolve_period(args.from, args.to)?;

    let password = match std::env::var("HOURBANK_PASSWORD") {
        Ok(password) if !password.trim().is_empty() => password,
        _ => rpassword::prompt_password("Senha: ").context("reading password")?,
    };
    if password.trim().is_empty() {
        bail!("password is empty");
    }

    let session = ReportSession::new(&base_url)?;

    println!("Conectando a {base_url} ...");
    session.login(&args.user, &password).await.context("login failed")?;
    println!("Login realizado. Calculando {from} - {to} ...");

    let mut on_progress = |done: usize, total: usize, label: &str| {
        println!("[{done}/{total}] {label}");
    };
    let summary = session.aggregate(from, to, Some(&mut on_progress)).await;

    report::print_summary(&summary);

    if let Some(path) = args.csv {
        report::write_csv(&summary, &path)?;
        println!("CSV: {}", path.display());
    }
    if let Some(path) = args.json {
        report::write_json(&summary, &path)?;
        println!("JSON: {}", path.display());
    }
    if let Some(path) = args.report {
        report::write_text_report(&summary, &path)?;
        println!("Relatório: {}", path.display());
    }

    Ok(())
}

/// Fill in the default period (one year back, ending last month) and
/// validate the range: only fully elapsed months can be queried, and the
/// end must not precede the start.
fn resolve_period(from: Option<MonthKey>, to: Option<MonthKey>) -> Result<(MonthKey, MonthKey)> {
    let current = MonthKey::from_date(Local::now().date_naive());
    let to = to.unwrap_or_else(|| current.prev());
    let from = from.unwrap_or_else(|| MonthKey::new(to.month(), to.year() - 1).unwrap_or(to));

    if to >= current {
        bail!("end month {to} has not elapsed yet");
    }
    if to < from {
        bail!("end month {to} precedes start month {from}");
    }
    Ok((from, to))
}
