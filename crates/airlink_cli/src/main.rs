//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `airlink_core` linkage, configuration and storage bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use airlink_core::db::{migrations::current_user_version, open_db};
use airlink_core::{CarrierService, CoreConfig, FacilityService};
use airlink_core::{SqliteCarrierRepository, SqliteFacilityRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CoreConfig::from_env();
    println!("airlink_core ping={}", airlink_core::ping());
    println!("airlink_core version={}", airlink_core::core_version());

    if let Err(err) = airlink_core::init_logging_from(&config) {
        eprintln!("logging disabled: {err}");
    }

    match report(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_smoke module=cli status=error error={err}");
            eprintln!("airlink_core smoke failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn report(config: &CoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    println!("airlink_core db={}", config.db_path.display());
    println!("airlink_core schema_version={}", current_user_version(&conn)?);

    let carriers = CarrierService::new(SqliteCarrierRepository::try_new(&conn)?);
    let facilities = FacilityService::new(SqliteFacilityRepository::try_new(&conn)?);
    println!("airlink_core carriers={}", carriers.find_all()?.len());
    println!("airlink_core facilities={}", facilities.find_all()?.len());
    Ok(())
}
