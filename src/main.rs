use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use coal_fuel_calculator::{
    app::{self, AppError},
    config,
    fuel::{CalcMode, Field, RawValues},
    i18n::{self, Translator},
    report::ReportOptions,
    web::{self, WebState},
};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fuel_calc_cli", version, about = "Solid-fuel composition calculator")]
struct Cli {
    /// Interface language: auto, uk, en
    #[arg(short = 'L', long, default_value = "auto", global = true)]
    lang: String,
    /// Settings file, created with defaults when missing
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Menu-driven session (default).
    Interactive,
    /// Run a single calculation and print the report.
    Calc {
        /// 1 = working → dry & combustible, 2 = combustible → working
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Input value as KEY=VALUE, e.g. `--set W=8,5`. Repeatable.
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTML form.
    Serve {
        /// Listen address (defaults to `[server] addr` from the config)
        #[arg(long)]
        addr: Option<String>,
        /// Directory served under /static/
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    #[value(name = "1", alias = "working-to-dry")]
    One,
    #[value(name = "2", alias = "combustible-to-working")]
    Two,
}

impl From<ModeArg> for CalcMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::One => CalcMode::WorkingToDry,
            ModeArg::Two => CalcMode::CombustibleToWorking,
        }
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let key = key.trim();
    let field = Field::from_key(key).ok_or_else(|| format!("unknown field `{key}`"))?;
    Ok((field.key().to_string(), value.to_string()))
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let serving = matches!(cli.command, Some(Command::Serve { .. }));
    init_tracing(if serving { "info" } else { "warn" });

    match try_run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<ExitCode, AppError> {
    let mut cfg = config::load_or_default_at(&cli.config)?;
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());
    let opts = ReportOptions {
        precision: cfg.precision,
        heating_value_unit: cfg.heating_value_unit,
    };

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let stdin = io::stdin();
            app::run(&mut cfg, &cli.config, tr, &mut stdin.lock(), &mut io::stdout())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Calc { mode, values, json } => {
            let mode = mode.map(CalcMode::from).unwrap_or(cfg.default_mode);
            let values: RawValues = values.into_iter().collect();
            let ok = app::calculate_once(
                mode,
                &values,
                &opts,
                &tr,
                json,
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            )?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
        Command::Serve { addr, static_dir } => {
            let addr = addr.unwrap_or_else(|| cfg.server.addr.clone());
            let static_dir = static_dir.unwrap_or_else(|| cfg.static_dir());
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(web::serve(&addr, WebState::new(tr, opts), &static_dir))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
