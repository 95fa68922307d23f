use algae_forecast_bridge::{ChartRegistry, PredictionView, RenderedChart};
use algae_forecast_config::{ConfigParser, ConfigValidator, ForecastConfig};
use algae_forecast_shared::ViewMode;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "algae-forecast")]
#[command(about = "Daily, weekly and monthly views of algae biomass predictions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (yaml, json or toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one view of a prediction response
    View {
        /// Prediction response (JSON)
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// View mode: daily, weekly or monthly
        #[arg(short, long, default_value = "daily")]
        mode: ViewMode,

        /// Prediction screen preset; the configured default when omitted
        #[arg(short, long)]
        preset: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List available presets
    Presets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::View {
            input,
            mode,
            preset,
            format,
        } => {
            let json = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let chart = render_view(&config, &json, mode, preset.as_deref())?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&chart)?),
                OutputFormat::Table => print!("{}", format_table(&chart)),
            }
        }
        Commands::Presets => {
            for preset in config.preset_manager()?.list_presets() {
                let modes: Vec<&str> = preset.modes.iter().map(|m| m.as_str()).collect();
                println!(
                    "{:<20} {:<14} {}{}",
                    preset.name,
                    preset.chart_id,
                    modes.join(","),
                    if preset.is_builtin { "" } else { " (user)" }
                );
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<ForecastConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ConfigParser::parse_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => ForecastConfig::default(),
    };

    ConfigValidator::validate(&config)?;
    Ok(config)
}

/// Load `json` into the preset's screen and render `mode`
fn render_view(
    config: &ForecastConfig,
    json: &str,
    mode: ViewMode,
    preset: Option<&str>,
) -> Result<RenderedChart> {
    let mut view = PredictionView::from_config(config, preset)?;
    let series = view.load_json(json)?;
    debug!(
        points = series.len(),
        category = ?series.category(),
        "Loaded prediction run"
    );

    view.change_view_mode(mode)?;

    let mut charts = ChartRegistry::new();
    view.render(&mut charts)?;

    let chart_id = &view.preset().chart_id;
    charts
        .get(chart_id)
        .cloned()
        .with_context(|| format!("Chart {} was not rendered", chart_id))
}

fn format_table(chart: &RenderedChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", chart.dataset_label, chart.mode);

    let series = &chart.series;
    for ((label, value), category) in series
        .labels
        .iter()
        .zip(&series.values)
        .zip(&series.categories)
    {
        let _ = writeln!(out, "{:<16} {:>12} {}", label, value, category);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const RESPONSE: &str = r#"[
        {"date": "2025-01-01", "biomass": 10.0, "algae": "X"},
        {"date": "2025-01-02", "biomass": 10.0, "algae": "X"},
        {"date": "2025-01-03", "biomass": 10.0, "algae": "X"},
        {"date": "2025-01-04", "biomass": 10.0, "algae": "X"},
        {"date": "2025-01-05", "biomass": 10.0, "algae": "X"},
        {"date": "2025-01-06", "biomass": 10.0, "algae": "X"},
        {"date": "2025-01-07", "biomass": 10.0, "algae": "X"}
    ]"#;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_view_args() {
        let cli = Cli::try_parse_from([
            "algae-forecast",
            "view",
            "--input",
            "run.json",
            "--mode",
            "Weekly",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::View { mode, format, .. } => {
                assert_eq!(mode, ViewMode::Weekly);
                assert_eq!(format, OutputFormat::Json);
            }
            Commands::Presets => panic!("expected view"),
        }

        assert!(Cli::try_parse_from(["algae-forecast", "view", "-i", "a", "-m", "yearly"]).is_err());
    }

    #[test]
    fn test_weekly_table() {
        let chart = render_view(&ForecastConfig::default(), RESPONSE, ViewMode::Weekly, None)
            .unwrap();

        assert_eq!(chart.series.labels, vec!["1-7 ene 25"]);
        assert_eq!(
            format_table(&chart),
            "Biomasa (weekly)\n1-7 ene 25                 10 X\n"
        );
    }

    #[test]
    fn test_week_preset_refuses_monthly() {
        let result = render_view(&ForecastConfig::default(), RESPONSE, ViewMode::Monthly, None);
        assert!(result.is_err());

        let chart = render_view(
            &ForecastConfig::default(),
            RESPONSE,
            ViewMode::Monthly,
            Some("month-prediction"),
        )
        .unwrap();
        assert_eq!(chart.series.labels, vec!["1-30 ene 25"]);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecast.json");
        std::fs::write(&path, r#"{"display": {"default_preset": "nowhere"}}"#).unwrap();

        assert!(load_config(Some(&path)).is_err());
        assert_eq!(load_config(None).unwrap(), ForecastConfig::default());
    }
}
