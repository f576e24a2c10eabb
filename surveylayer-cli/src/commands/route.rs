//! `surveylayer route` - order the legs of a survey zone.
//!
//! Reads a JSON array of legs, orders the seed leg's zone and prints the
//! visiting order. With `--write` the updated legs are saved back to the
//! same file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use surveylayer::route::{assign_order, first_duplicate_id, LegDescriptor, LegId, RoutePlan};
use tracing::info;

use crate::error::CliError;

/// Arguments for `surveylayer route`.
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// JSON file containing an array of legs
    #[arg(long)]
    pub legs: PathBuf,

    /// Leg to start from; its zone is the one ordered
    #[arg(long)]
    pub seed: LegId,

    /// Save the assigned order back to the legs file
    #[arg(long)]
    pub write: bool,
}

pub fn run(args: RouteArgs) -> Result<(), CliError> {
    let mut legs = load_legs(&args.legs)?;
    let plan = order(&mut legs, args.seed, &args.legs)?;

    print_plan(&plan, &legs);

    if args.write {
        save_legs(&args.legs, &legs)?;
        println!();
        println!("Saved {} legs to {}", legs.len(), args.legs.display());
    }

    Ok(())
}

/// Order `legs` from `seed`, in place.
///
/// Leg ids must be unique across the file, so each row of the order table
/// and each written record names exactly one leg.
fn order(legs: &mut [LegDescriptor], seed: LegId, path: &Path) -> Result<RoutePlan, CliError> {
    if let Some(id) = first_duplicate_id(legs.iter().map(|l| l.id)) {
        return Err(CliError::DuplicateLeg {
            id,
            path: path.to_path_buf(),
        });
    }

    let plan = assign_order(legs, seed).ok_or_else(|| CliError::SeedNotFound {
        seed,
        path: path.to_path_buf(),
    })?;

    info!(
        zone = plan.zone_id,
        legs = plan.steps.len(),
        transit_m = plan.total_transit_m(),
        "Ordered survey zone"
    );

    Ok(plan)
}

pub(crate) fn load_legs(path: &Path) -> Result<Vec<LegDescriptor>, CliError> {
    let content = fs::read_to_string(path).map_err(|error| CliError::FileRead {
        path: path.to_path_buf(),
        error,
    })?;

    serde_json::from_str(&content).map_err(|error| CliError::Parse {
        path: path.to_path_buf(),
        error,
    })
}

pub(crate) fn save_legs(path: &Path, legs: &[LegDescriptor]) -> Result<(), CliError> {
    let write_error = |error: std::io::Error| CliError::FileWrite {
        path: path.to_path_buf(),
        error,
    };

    let mut content = serde_json::to_string_pretty(legs)
        .map_err(|e| write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    content.push('\n');

    fs::write(path, content).map_err(write_error)
}

fn print_plan(plan: &RoutePlan, legs: &[LegDescriptor]) {
    println!("Zone {}: {} legs", plan.zone_id, plan.steps.len());
    println!();
    println!(
        "{:>5}  {:>8}  {:<9}  {:>12}  {:>12}",
        "Order", "Leg", "Direction", "Transit (m)", "Length (m)"
    );

    for step in &plan.steps {
        let length = legs
            .iter()
            .find(|l| l.id == step.leg_id)
            .map(|l| l.length_m())
            .unwrap_or(0.0);
        let direction = if step.inverted { "reverse" } else { "forward" };

        println!(
            "{:>5}  {:>8}  {:<9}  {:>12.1}  {:>12.1}",
            step.order, step.leg_id, direction, step.transit_m, length
        );
    }

    println!();
    println!("Total transit: {:.1} m", plan.total_transit_m());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LEGS_JSON: &str = r#"[
        {"id": 1, "zone_id": 1, "start": {"latitude": 0.0, "longitude": 0.0}, "end": {"latitude": 0.0, "longitude": 1.0}},
        {"id": 2, "zone_id": 1, "start": {"latitude": 0.0, "longitude": 2.0}, "end": {"latitude": 0.0, "longitude": 1.1}},
        {"id": 3, "zone_id": 2, "start": {"latitude": 5.0, "longitude": 5.0}, "end": {"latitude": 5.0, "longitude": 6.0}, "order": 4}
    ]"#;

    fn write_legs(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("legs.json");
        fs::write(&path, LEGS_JSON).unwrap();
        path
    }

    #[test]
    fn test_write_persists_order() {
        let dir = TempDir::new().unwrap();
        let path = write_legs(&dir);

        run(RouteArgs {
            legs: path.clone(),
            seed: 1,
            write: true,
        })
        .unwrap();

        let legs = load_legs(&path).unwrap();
        assert_eq!(legs[0].order, Some(1));
        assert_eq!(legs[1].order, Some(2));
        assert!(legs[1].inverted);
        // Other zone untouched
        assert_eq!(legs[2].order, Some(4));
    }

    #[test]
    fn test_without_write_file_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = write_legs(&dir);

        run(RouteArgs {
            legs: path.clone(),
            seed: 1,
            write: false,
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), LEGS_JSON);
    }

    #[test]
    fn test_missing_seed() {
        let dir = TempDir::new().unwrap();
        let path = write_legs(&dir);

        let err = run(RouteArgs {
            legs: path,
            seed: 99,
            write: false,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::SeedNotFound { seed: 99, .. }));
    }

    #[test]
    fn test_duplicate_leg_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legs.json");
        let duplicated = LEGS_JSON.replace(r#""id": 2"#, r#""id": 1"#);
        fs::write(&path, &duplicated).unwrap();

        let err = run(RouteArgs {
            legs: path.clone(),
            seed: 1,
            write: true,
        })
        .unwrap_err();

        assert!(matches!(err, CliError::DuplicateLeg { id: 1, .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), duplicated);
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legs.json");
        fs::write(&path, "{ not legs }").unwrap();

        assert!(matches!(load_legs(&path), Err(CliError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(load_legs(&path), Err(CliError::FileRead { .. })));
    }
}
