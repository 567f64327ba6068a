use crate::models::{DataPoint, ReadingSet, RiskGrid, StationReading};
use crate::risk::RiskBucket;

/// AQI value at which the risk score saturates at 100 ("hazardous").
const AQI_AT_MAX_RISK: f64 = 300.0;

/// Reported when a concentration is above the top breakpoint.
const AQI_CEILING: f64 = 500.0;

/// One row of an EPA breakpoint table: concentrations `[c_lo, c_hi]` map
/// linearly onto index values `[i_lo, i_hi]`.
struct Breakpoint {
    c_lo: f64,
    c_hi: f64,
    i_lo: f64,
    i_hi: f64,
}

const fn bp(c_lo: f64, c_hi: f64, i_lo: f64, i_hi: f64) -> Breakpoint {
    Breakpoint {
        c_lo,
        c_hi,
        i_lo,
        i_hi,
    }
}

/// PM2.5, 24-hour, µg/m³ (2024 revision).
const PM25: [Breakpoint; 6] = [
    bp(0.0, 9.0, 0.0, 50.0),
    bp(9.1, 35.4, 51.0, 100.0),
    bp(35.5, 55.4, 101.0, 150.0),
    bp(55.5, 125.4, 151.0, 200.0),
    bp(125.5, 225.4, 201.0, 300.0),
    bp(225.5, 325.4, 301.0, 500.0),
];

/// PM10, 24-hour, µg/m³.
const PM10: [Breakpoint; 6] = [
    bp(0.0, 54.0, 0.0, 50.0),
    bp(55.0, 154.0, 51.0, 100.0),
    bp(155.0, 254.0, 101.0, 150.0),
    bp(255.0, 354.0, 151.0, 200.0),
    bp(355.0, 424.0, 201.0, 300.0),
    bp(425.0, 604.0, 301.0, 500.0),
];

/// Ozone, 8-hour, ppb.
const O3: [Breakpoint; 5] = [
    bp(0.0, 54.0, 0.0, 50.0),
    bp(55.0, 70.0, 51.0, 100.0),
    bp(71.0, 85.0, 101.0, 150.0),
    bp(86.0, 105.0, 151.0, 200.0),
    bp(106.0, 200.0, 201.0, 300.0),
];

/// Nitrogen dioxide, 1-hour, ppb.
const NO2: [Breakpoint; 6] = [
    bp(0.0, 53.0, 0.0, 50.0),
    bp(54.0, 100.0, 51.0, 100.0),
    bp(101.0, 360.0, 101.0, 150.0),
    bp(361.0, 649.0, 151.0, 200.0),
    bp(650.0, 1249.0, 201.0, 300.0),
    bp(1250.0, 2049.0, 301.0, 500.0),
];

/// Piecewise-linear sub-index for one pollutant.
///
/// Concentrations that fall in the gap between two rows use the upper row;
/// the result is clamped to that row's index span.
fn sub_index(table: &[Breakpoint], concentration: f64) -> Option<f64> {
    if !concentration.is_finite() || concentration < 0.0 {
        return None;
    }
    let Some(row) = table.iter().find(|b| concentration <= b.c_hi) else {
        return Some(AQI_CEILING);
    };
    let t = (concentration - row.c_lo) / (row.c_hi - row.c_lo);
    let index = row.i_lo + t * (row.i_hi - row.i_lo);
    Some(index.clamp(row.i_lo, row.i_hi))
}

pub fn pm25_index(ug_m3: f64) -> Option<f64> {
    sub_index(&PM25, ug_m3)
}

pub fn pm10_index(ug_m3: f64) -> Option<f64> {
    sub_index(&PM10, ug_m3)
}

pub fn o3_index(ppb: f64) -> Option<f64> {
    sub_index(&O3, ppb)
}

pub fn no2_index(ppb: f64) -> Option<f64> {
    sub_index(&NO2, ppb)
}

/// Overall AQI: the worst pollutant's sub-index, or `None` when the station
/// reported nothing usable.
pub fn aqi(reading: &StationReading) -> Option<f64> {
    [
        reading.pm25.and_then(pm25_index),
        reading.pm10.and_then(pm10_index),
        reading.o3.and_then(o3_index),
        reading.no2.and_then(no2_index),
    ]
    .into_iter()
    .flatten()
    .reduce(f64::max)
}

/// Map AQI onto the 0-100 risk scale, rounded to one decimal.
pub fn risk_score_from_aqi(aqi: f64) -> f64 {
    let score = (aqi / AQI_AT_MAX_RISK * 100.0).clamp(0.0, 100.0);
    (score * 10.0).round() / 10.0
}

pub fn score_reading(reading: &StationReading) -> Option<DataPoint> {
    let risk_score = risk_score_from_aqi(aqi(reading)?);
    Some(DataPoint {
        latitude: reading.latitude,
        longitude: reading.longitude,
        risk_score,
        risk_class: RiskBucket::from_score(risk_score).class_name().to_string(),
    })
}

impl ReadingSet {
    /// Score every station; stations without a usable pollutant are dropped.
    pub fn to_grid(&self) -> RiskGrid {
        RiskGrid {
            bounding_box: self.bounding_box,
            cells: self.readings.iter().filter_map(score_reading).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;

    fn reading(pm25: Option<f64>, o3: Option<f64>) -> StationReading {
        StationReading {
            name: "Test Station".to_string(),
            latitude: 34.05,
            longitude: -118.24,
            pm25,
            pm10: None,
            o3,
            no2: None,
        }
    }

    #[test]
    fn test_pm25_breakpoint_edges() {
        assert!((pm25_index(0.0).unwrap() - 0.0).abs() < 1e-9);
        assert!((pm25_index(9.0).unwrap() - 50.0).abs() < 1e-9);
        assert!((pm25_index(35.4).unwrap() - 100.0).abs() < 1e-9);
        assert!((pm25_index(55.5).unwrap() - 151.0).abs() < 1e-9);
    }

    #[test]
    fn test_pm25_interpolates() {
        // Midpoint of the first row.
        assert!((pm25_index(4.5).unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_gap_value_stays_in_upper_row() {
        let v = pm25_index(9.05).unwrap();
        assert!((51.0..=100.0).contains(&v));
    }

    #[test]
    fn test_above_table_is_ceiling() {
        assert_eq!(pm25_index(900.0), Some(500.0));
        assert_eq!(o3_index(250.0), Some(500.0));
    }

    #[test]
    fn test_negative_concentration_rejected() {
        assert_eq!(pm10_index(-1.0), None);
        assert_eq!(no2_index(f64::NAN), None);
    }

    #[test]
    fn test_aqi_takes_worst_pollutant() {
        let r = reading(Some(4.5), Some(70.0));
        assert!((aqi(&r).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_aqi_none_without_pollutants() {
        assert_eq!(aqi(&reading(None, None)), None);
        assert!(score_reading(&reading(None, None)).is_none());
    }

    #[test]
    fn test_risk_score_scale() {
        assert_eq!(risk_score_from_aqi(0.0), 0.0);
        assert_eq!(risk_score_from_aqi(150.0), 50.0);
        assert_eq!(risk_score_from_aqi(300.0), 100.0);
        assert_eq!(risk_score_from_aqi(480.0), 100.0);
        assert_eq!(risk_score_from_aqi(100.0), 33.3);
    }

    #[test]
    fn test_score_reading_sets_class() {
        // PM2.5 of 150 µg/m³ is AQI ~225, risk 75.
        let p = score_reading(&reading(Some(150.0), None)).unwrap();
        assert!(p.risk_score >= 70.0);
        assert_eq!(p.risk_class, "severe");
        assert_eq!(p.latitude, 34.05);
    }

    #[test]
    fn test_to_grid_drops_empty_stations() {
        let set = ReadingSet {
            bounding_box: BoundingBox::new(-119.0, 33.0, -117.0, 35.0).unwrap(),
            readings: vec![reading(Some(12.0), None), reading(None, None)],
        };
        let grid = set.to_grid();
        assert_eq!(grid.cells.len(), 1);
        assert_eq!(grid.bounding_box, set.bounding_box);
    }
}
