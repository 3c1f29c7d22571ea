use std::path::PathBuf;

use forecast_core::{
    CurrentConditions, DailyAggregate, ForecastService, chart, export,
};
use inquire::{InquireError, Select, Text};
use tracing::warn;

/// Larger than the web chart since it is saved for viewing on its own.
const CONSOLE_CHART_SIZE: (u32, u32) = (1200, 800);

#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    pub out_dir: PathBuf,
    pub write_files: bool,
}

pub fn format_current(current: &CurrentConditions) -> String {
    format!(
        "📍 CURRENT WEATHER IN {city}, {country}\n\
         {rule}\n\
         🌡️  Temperature:    {temp:.1}°C\n\
         🤔 Feels like:      {feels:.1}°C\n\
         📝 Conditions:      {desc}\n\
         💧 Humidity:        {humidity}%\n\
         📊 Pressure:        {pressure} hPa\n\
         💨 Wind Speed:      {wind} m/s",
        city = current.city.to_uppercase(),
        country = current.country,
        rule = "-".repeat(40),
        temp = current.temperature,
        feels = current.feels_like,
        desc = current.display_description(),
        humidity = current.humidity,
        pressure = current.pressure,
        wind = current.wind_speed,
    )
}

pub fn format_day(day: &DailyAggregate) -> String {
    format!(
        "{} {}: {:.1}°C | H:{:.1}°C L:{:.1}°C | {}",
        day.icon, day.label, day.avg_temp, day.max_temp, day.min_temp, day.description
    )
}

pub fn format_forecast(days: &[DailyAggregate]) -> String {
    let mut out = format!("📅 {}-DAY WEATHER FORECAST\n{}", days.len(), "-".repeat(50));
    for day in days {
        out.push('\n');
        out.push_str(&format_day(day));
    }
    out
}

/// One lookup: print, then save chart and data files.
///
/// A chart that fails to render is reported but does not discard the rest.
pub async fn show(
    service: &ForecastService,
    city: &str,
    opts: &ConsoleOptions,
) -> anyhow::Result<()> {
    println!("\n🔍 Fetching weather data for {}...", city.trim());

    let snapshot = service.snapshot(city).await?;
    let days = service.daily(&snapshot);
    let name = snapshot.current.city.as_str();

    println!("\n{}", "=".repeat(60));
    println!("🌤️  WEATHER FORECAST");
    println!("{}", "=".repeat(60));
    println!("\n{}", format_current(&snapshot.current));
    println!("\n{}", format_forecast(&days));

    if !opts.write_files {
        return Ok(());
    }

    println!("\n📊 GENERATING WEATHER VISUALIZATIONS...");
    match chart::render_with_size(&snapshot.samples, name, CONSOLE_CHART_SIZE) {
        Ok(image) => {
            std::fs::create_dir_all(&opts.out_dir)?;
            let path = opts.out_dir.join(export::chart_file_name(name));
            image.save(&path)?;
            println!("✅ Chart saved as '{}'", path.display());
        }
        Err(e) => {
            warn!(error = %e, "chart rendering failed");
            println!("❌ {e}");
        }
    }

    println!("\n💾 SAVING WEATHER DATA...");
    let json = export::write_json_summary(&opts.out_dir, name, &snapshot.current, &snapshot.samples)?;
    println!("✅ JSON data saved as '{}'", json.display());
    let csv = export::write_forecast_csv(&opts.out_dir, name, &snapshot.samples)?;
    println!("✅ CSV data saved as '{}'", csv.display());

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Lookup,
    Exit,
}

impl std::fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MenuChoice::Lookup => "Get weather for a city",
            MenuChoice::Exit => "Exit",
        })
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}

pub async fn interactive(service: &ForecastService, opts: &ConsoleOptions) -> anyhow::Result<()> {
    println!("🌤️  WEATHER FORECAST APPLICATION");
    println!("{}", "=".repeat(50));

    loop {
        let choice = match Select::new("Options:", vec![MenuChoice::Lookup, MenuChoice::Exit]).prompt()
        {
            Ok(choice) => choice,
            Err(e) if is_cancel(&e) => MenuChoice::Exit,
            Err(e) => return Err(e.into()),
        };

        if choice == MenuChoice::Exit {
            println!("\nThank you for using the Weather Forecast App! 🌟");
            return Ok(());
        }

        let city = match Text::new("Enter city name:").prompt() {
            Ok(city) => city,
            Err(e) if is_cancel(&e) => continue,
            Err(e) => return Err(e.into()),
        };

        if city.trim().is_empty() {
            println!("❌ Please enter a valid city name.");
            continue;
        }

        if let Err(e) = show(service, &city, opts).await {
            println!("❌ Error: {e:#}");
            println!("❌ Could not fetch weather data. Please check:");
            println!("   - City name spelling");
            println!("   - Internet connection");
            println!("   - API key configuration");
        }
    }
}
