/*
 * Responsibility
 * - 緯度経度 → sector (近傍の place をまとめるためのキー) の計算
 * - 範囲外の座標はここで弾く
 */
use thiserror::Error;

/// Decimal places kept when bucketing coordinates (2 ≈ 1 km at the equator).
pub const SECTOR_DECIMALS: i32 = 2;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude must be within [-90, 90], got {0}")]
    Latitude(f64),
    #[error("longitude must be within [-180, 180], got {0}")]
    Longitude(f64),
}

/// Sector key for a coordinate: both values truncated toward zero to
/// `SECTOR_DECIMALS`, stored as scaled integers (`"4071:-7400"`).
pub fn sector(lat: f64, long: f64) -> Result<String, GeoError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeoError::Latitude(lat));
    }
    if !(-180.0..=180.0).contains(&long) {
        return Err(GeoError::Longitude(long));
    }

    Ok(format!("{}:{}", truncate(lat), truncate(long)))
}

fn truncate(value: f64) -> i64 {
    let scaled = value * 10f64.powi(SECTOR_DECIMALS);
    // round away float noise (0.29 * 100 = 28.999999999999996) before truncating
    let cleaned = (scaled * 1e6).round() / 1e6;
    cleaned.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_points_share_a_sector() {
        let a = sector(40.712_8, -74.006_0).unwrap();
        let b = sector(40.719_9, -74.001_1).unwrap();
        assert_eq!(a, "4071:-7400");
        assert_eq!(a, b);
    }

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(sector(0.29, -0.29).unwrap(), "29:-29");
        assert_eq!(sector(-0.001, 0.009).unwrap(), "0:0");
        assert_eq!(sector(90.0, 180.0).unwrap(), "9000:18000");
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert_eq!(sector(91.0, 0.0), Err(GeoError::Latitude(91.0)));
        assert_eq!(sector(0.0, -180.5), Err(GeoError::Longitude(-180.5)));
        assert!(sector(f64::NAN, 0.0).is_err());
    }
}
