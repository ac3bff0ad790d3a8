// ==========================================
// Parking occupancy - command line entry
// ==========================================
// parking-occupancy status [YYYY-MM-DD]
// parking-occupancy export-logs <start> <end> <file> [term]
// parking-occupancy export-vehicles <file> [term]
// ==========================================

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use parking_occupancy::config::AppSettings;
use parking_occupancy::domain::parking_log::DATE_FORMAT;
use parking_occupancy::domain::{OccupancyStatDetails, VehicleType};
use parking_occupancy::{logging, AppState};

const USAGE: &str = "usage:
  parking-occupancy status [YYYY-MM-DD]
  parking-occupancy export-logs <start> <end> <file> [term]
  parking-occupancy export-vehicles <file> [term]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = AppSettings::from_env();
    tracing::info!(
        version = parking_occupancy::VERSION,
        db_path = %settings.db_path,
        locale = %settings.locale,
        "{}",
        parking_occupancy::APP_NAME
    );

    let state = AppState::from_settings(&settings).context("failed to open parking database")?;

    match args.first().map(String::as_str) {
        Some("status") => {
            let date = match args.get(1) {
                Some(raw) => parse_date(raw)?,
                None => Local::now().date_naive(),
            };
            let stats = state.parking_api.occupancy_for(date).await?;
            println!("{}", date.format(DATE_FORMAT));
            for vehicle_type in VehicleType::ALL {
                print_line(pool_label(vehicle_type), stats.for_type(vehicle_type));
            }
        }
        Some("export-logs") => {
            let (start, end, file) = match (args.get(1), args.get(2), args.get(3)) {
                (Some(s), Some(e), Some(f)) => (parse_date(s)?, parse_date(e)?, f),
                _ => bail!(USAGE),
            };
            let term = args.get(4).map(String::as_str);
            let export = state.report_api.export_logs_csv(start, end, term).await?;
            std::fs::write(file, &export.content)
                .with_context(|| format!("cannot write {}", file))?;
            println!("{} -> {} ({} linhas)", export.filename, file, export.rows);
        }
        Some("export-vehicles") => {
            let Some(file) = args.get(1) else {
                bail!(USAGE);
            };
            let term = args.get(2).map(String::as_str);
            let export = state.report_api.export_vehicles_csv(term).await?;
            std::fs::write(file, &export.content)
                .with_context(|| format!("cannot write {}", file))?;
            println!("{} -> {} ({} linhas)", export.filename, file, export.rows);
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

fn pool_label(vehicle_type: VehicleType) -> &'static str {
    match vehicle_type {
        VehicleType::Car => "Carros",
        VehicleType::Motorcycle => "Motos",
        VehicleType::Bicycle => "Bicicletas",
    }
}

fn print_line(label: &str, stats: &OccupancyStatDetails) {
    let overflow = stats.overflow();
    if overflow > 0 {
        println!(
            "  {:<11} {:>4} / {:<4} ocupadas, {} livres (+{} acima da capacidade)",
            label, stats.occupied, stats.total, stats.available, overflow
        );
    } else {
        println!(
            "  {:<11} {:>4} / {:<4} ocupadas, {} livres",
            label, stats.occupied, stats.total, stats.available
        );
    }
}
