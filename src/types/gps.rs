use crate::types::schema::{FieldDef, FieldValue, Record};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Years below this are stored as an offset from 2000
const TWO_DIGIT_YEAR_LIMIT: i32 = 100;
const CENTURY_BASE: i32 = 2000;

/// Input: `tsecs,mday/month/year,hour:minute:second,lat,lon,alt,nsats`
pub const GPS_SCHEMA: &[FieldDef] = &[
    FieldDef::float("tsecs", Some(','), 6, 1),
    FieldDef::int("mday", Some('/'), 2),
    FieldDef::int("month", Some('/'), 2),
    FieldDef::int("year", Some(','), 4),
    FieldDef::int("hour", Some(':'), 2),
    FieldDef::int("minute", Some(':'), 2),
    FieldDef::int("second", Some(','), 2),
    FieldDef::float("lat", Some(','), 11, 7),
    FieldDef::float("lon", Some(','), 12, 7),
    FieldDef::float("alt", Some(','), 8, 1),
    FieldDef::int("nsats", None, 2),
];

/// One GPS fix. All times are UT.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsRecord {
    /// Seconds since start of dataset
    pub tsecs: f64,
    pub mday: i32,
    pub month: i32,
    /// Full year (e.g. 2025)
    pub year: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    /// Latitude, deg north
    pub lat: f64,
    /// Longitude, deg east
    pub lon: f64,
    /// Altitude, m above MSL
    pub alt: f64,
    /// Satellites in view
    pub nsats: i32,
}

impl GpsRecord {
    /// Seconds since midnight
    pub fn today_secs(&self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

/// Two-digit years become 20xx; four-digit years pass through
pub fn normalize_year(year: i32) -> i32 {
    if (0..TWO_DIGIT_YEAR_LIMIT).contains(&year) {
        year + CENTURY_BASE
    } else {
        year
    }
}

impl Record for GpsRecord {
    const SCHEMA: &'static [FieldDef] = GPS_SCHEMA;

    fn from_fields(values: &[FieldValue]) -> Self {
        Self {
            tsecs: values[0].as_f64(),
            mday: values[1].as_i32(),
            month: values[2].as_i32(),
            year: normalize_year(values[3].as_i32()),
            hour: values[4].as_i32(),
            minute: values[5].as_i32(),
            second: values[6].as_i32(),
            lat: values[7].as_f64(),
            lon: values[8].as_f64(),
            alt: values[9].as_f64(),
            nsats: values[10].as_i32(),
        }
    }

    fn fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Float(self.tsecs),
            FieldValue::Int(self.mday),
            FieldValue::Int(self.month),
            FieldValue::Int(self.year),
            FieldValue::Int(self.hour),
            FieldValue::Int(self.minute),
            FieldValue::Int(self.second),
            FieldValue::Float(self.lat),
            FieldValue::Float(self.lon),
            FieldValue::Float(self.alt),
            FieldValue::Int(self.nsats),
        ]
    }

    fn tsecs(&self) -> f64 {
        self.tsecs
    }
}

/// Bucket mean of several GPS records, with the number folded in
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AveragedGps {
    pub record: GpsRecord,
    pub count: u32,
}
