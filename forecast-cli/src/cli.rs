use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, DEFAULT_MAX_DAYS, ForecastService,
    provider::{openweather::DEFAULT_BASE_URL, source_from_config},
};
use inquire::{Password, PasswordDisplayMode, Text};

use crate::{
    console::{self, ConsoleOptions},
    server,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Current weather, 5-day forecast and 24-hour chart")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key (and optionally a custom base URL).
    Configure,

    /// Print weather for a city and save chart, JSON and CSV files.
    Show {
        /// City name, e.g. "London" or "New York".
        city: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Menu-driven loop asking for city names.
    Interactive {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Serve the web page and the `POST /get_weather` JSON endpoint.
    Serve {
        /// Address to listen on; defaults to the configured `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Debug, clap::Args)]
pub struct OutputArgs {
    /// Number of forecast days to summarize.
    #[arg(long, default_value_t = DEFAULT_MAX_DAYS)]
    days: usize,

    /// Directory for chart, JSON and CSV files; defaults to the configured `output.dir`.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Only print to the console.
    #[arg(long)]
    no_files: bool,
}

impl OutputArgs {
    fn console_options(&self, config: &Config) -> ConsoleOptions {
        ConsoleOptions {
            out_dir: self.out_dir.clone().unwrap_or_else(|| config.output.dir.clone()),
            write_files: !self.no_files,
        }
    }
}

fn build_service(config: &Config, max_days: usize) -> anyhow::Result<ForecastService> {
    let source = source_from_config(config)?;
    Ok(ForecastService::new(Arc::from(source)).with_max_days(max_days))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, output } => {
                let config = Config::load_with_env()?;
                let service = build_service(&config, output.days)?;
                console::show(&service, &city, &output.console_options(&config)).await
            }
            Command::Interactive { output } => {
                let config = Config::load_with_env()?;
                let service = build_service(&config, output.days)?;
                console::interactive(&service, &output.console_options(&config)).await
            }
            Command::Serve { bind } => {
                let config = Config::load_with_env()?;
                let service = build_service(&config, DEFAULT_MAX_DAYS)?;
                let bind = bind.unwrap_or_else(|| config.server.bind.clone());
                server::serve(service, &bind).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let current_url = if config.base_url.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        config.base_url.clone()
    };
    let base_url = Text::new("API base URL:")
        .with_default(&current_url)
        .prompt()
        .context("Failed to read base URL")?;

    config.set_api_key(api_key.trim().to_string());
    config.base_url = base_url.trim().to_string();
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_defaults() {
        let cli = Cli::try_parse_from(["forecast", "show", "New York"]).unwrap();
        match cli.command {
            Command::Show { city, output } => {
                assert_eq!(city, "New York");
                assert_eq!(output.days, DEFAULT_MAX_DAYS);
                assert!(output.out_dir.is_none());
                assert!(!output.no_files);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_serve_bind() {
        let cli = Cli::try_parse_from(["forecast", "serve", "--bind", "127.0.0.1:8080"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { bind: Some(ref b) } if b == "127.0.0.1:8080"));
    }

    #[test]
    fn out_dir_flag_overrides_config() {
        let cli = Cli::try_parse_from([
            "forecast", "interactive", "--out-dir", "/tmp/wx", "--no-files", "--days", "3",
        ])
        .unwrap();
        let Command::Interactive { output } = cli.command else {
            panic!("expected interactive");
        };

        let opts = output.console_options(&Config::default());
        assert_eq!(opts.out_dir, PathBuf::from("/tmp/wx"));
        assert!(!opts.write_files);
        assert_eq!(output.days, 3);
    }

    #[test]
    fn build_service_requires_api_key() {
        let err = build_service(&Config::default(), 5).unwrap_err();
        assert!(err.to_string().contains("forecast configure"));
    }
}
