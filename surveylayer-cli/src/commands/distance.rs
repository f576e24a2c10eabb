//! `surveylayer distance` - great-circle distance between two points.

use surveylayer::geo::{distance_m, GeodeticPoint};

use crate::error::CliError;

/// Validate both points and return the distance in metres.
pub fn compute(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64, CliError> {
    let from = GeodeticPoint::try_new(lat1, lon1)?;
    let to = GeodeticPoint::try_new(lat2, lon2)?;
    Ok(distance_m(&from, &to))
}

pub fn run(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<(), CliError> {
    let meters = compute(lat1, lon1, lat2, lon2)?;

    println!(
        "{} -> {}",
        GeodeticPoint::new(lat1, lon1),
        GeodeticPoint::new(lat2, lon2)
    );
    println!("{:.1} m ({:.3} km)", meters, meters / 1000.0);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let meters = compute(0.0, 0.0, 0.0, 1.0).unwrap();
        assert!((meters - 111_195.0).abs() < 10.0, "got {}", meters);
    }

    #[test]
    fn test_out_of_range_latitude_is_rejected() {
        let err = compute(91.0, 0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, CliError::Coordinate(_)));
    }
}
