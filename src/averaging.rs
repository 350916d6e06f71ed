//! Time-bucket averaging
//!
//! An accumulator keeps running sums for the bucket currently open. It is
//! either empty (nothing folded yet) or accumulating. [`Accumulator::flush`]
//! turns the sums into means, hands them back and leaves the accumulator
//! empty, ready for the first record of the next bucket.
//!
//! Deciding *when* a bucket closes is up to the pipeline driver.

use crate::export::FormatRow;
use crate::types::{AveragedGps, GpsRecord, SensorRecord, SENSOR_FIELD_COUNT};

/// Running-sum register for one record type
pub trait Accumulator: Default {
    type Record;
    type Output: FormatRow;

    fn fold(&mut self, record: &Self::Record);

    /// Number of records folded into the open bucket
    fn count(&self) -> u32;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Bucket means, or `None` when nothing was folded. Always resets.
    fn flush(&mut self) -> Option<Self::Output>;
}

/// Accumulator for GPS fixes.
///
/// Calendar fields cannot be averaged. The first fix of the bucket supplies
/// the date unless the mean time of day runs past midnight, in which case
/// the date of the latest fix is used instead.
#[derive(Debug, Default)]
pub struct GpsAccumulator {
    count: u32,
    /// Identity snapshot of the first fix in the bucket
    first: Option<GpsRecord>,
    latest: Option<GpsRecord>,
    tsecs: f64,
    today_secs: i64,
    lat: f64,
    lon: f64,
    alt: f64,
    nsats: i64,
}

impl Accumulator for GpsAccumulator {
    type Record = GpsRecord;
    type Output = AveragedGps;

    fn fold(&mut self, record: &GpsRecord) {
        let first = *self.first.get_or_insert(*record);
        let mut today_secs = record.today_secs();
        if record.hour < first.hour {
            // Past midnight relative to the bucket start
            today_secs += 24 * 3600;
        }

        self.tsecs += record.tsecs;
        self.today_secs = self.today_secs.saturating_add(today_secs);
        self.lat += record.lat;
        self.lon += record.lon;
        self.alt += record.alt;
        self.nsats = self.nsats.saturating_add(i64::from(record.nsats));
        self.latest = Some(*record);
        self.count += 1;
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn flush(&mut self) -> Option<AveragedGps> {
        let sums = std::mem::take(self);
        let (first, latest) = (sums.first?, sums.latest?);
        let n = sums.count;
        let nf = f64::from(n);

        let today_secs = sums.today_secs / i64::from(n);
        let mut hh = today_secs / 3600;
        let mm = (today_secs - hh * 3600) / 60;
        let ss = today_secs % 60;

        let date = if hh >= 24 {
            hh -= 24;
            latest
        } else {
            first
        };

        Some(AveragedGps {
            record: GpsRecord {
                tsecs: sums.tsecs / nf,
                mday: date.mday,
                month: date.month,
                year: date.year,
                hour: clamp_i32(hh),
                minute: clamp_i32(mm),
                second: clamp_i32(ss),
                lat: sums.lat / nf,
                lon: sums.lon / nf,
                alt: sums.alt / nf,
                // Truncating, matching the integer column it is printed in
                nsats: (sums.nsats / i64::from(n)) as i32,
            },
            count: n,
        })
    }
}

/// Time fields come from `i32` input, so only corrupt lines get clamped here
fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Accumulator for sensor readings: every channel is a plain mean
#[derive(Debug, Default)]
pub struct SensorAccumulator {
    count: u32,
    sums: [f64; SENSOR_FIELD_COUNT],
}

impl Accumulator for SensorAccumulator {
    type Record = SensorRecord;
    type Output = SensorRecord;

    fn fold(&mut self, record: &SensorRecord) {
        for (sum, value) in self.sums.iter_mut().zip(record.values.iter()) {
            *sum += value;
        }
        self.count += 1;
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn flush(&mut self) -> Option<SensorRecord> {
        let sums = std::mem::take(self);
        if sums.count == 0 {
            return None;
        }
        let n = f64::from(sums.count);
        Some(SensorRecord {
            values: sums.sums.map(|sum| sum / n),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(tsecs: f64, date: (i32, i32, i32), time: (i32, i32, i32), nsats: i32) -> GpsRecord {
        GpsRecord {
            tsecs,
            mday: date.0,
            month: date.1,
            year: date.2,
            hour: time.0,
            minute: time.1,
            second: time.2,
            lat: 10.0 + tsecs,
            lon: 20.0 - tsecs,
            alt: 100.0,
            nsats,
        }
    }

    #[test]
    fn test_flush_on_empty_is_none() {
        let mut acc = GpsAccumulator::default();
        assert!(acc.is_empty());
        assert!(acc.flush().is_none());
        assert!(SensorAccumulator::default().flush().is_none());
    }

    #[test]
    fn test_single_fix_round_trips_unchanged() {
        let mut acc = GpsAccumulator::default();
        let record = fix(5.0, (15, 3, 2025), (10, 30, 7), 9);
        acc.fold(&record);

        let averaged = acc.flush().unwrap();
        assert_eq!(averaged.count, 1);
        assert_eq!(averaged.record, record);
    }

    #[test]
    fn test_means_and_truncating_satellite_count() {
        let mut acc = GpsAccumulator::default();
        acc.fold(&fix(0.0, (15, 3, 2025), (10, 0, 0), 7));
        acc.fold(&fix(1.0, (15, 3, 2025), (10, 0, 5), 8));
        assert_eq!(acc.count(), 2);

        let averaged = acc.flush().unwrap();
        let r = averaged.record;
        assert_eq!(averaged.count, 2);
        assert!((r.tsecs - 0.5).abs() < 1e-12);
        assert!((r.lat - 10.5).abs() < 1e-12);
        assert!((r.lon - 19.5).abs() < 1e-12);
        assert!((r.alt - 100.0).abs() < 1e-12);
        // 15 / 2
        assert_eq!(r.nsats, 7);
        // (36000 + 36005) / 2 = 36002
        assert_eq!((r.hour, r.minute, r.second), (10, 0, 2));
        assert_eq!((r.mday, r.month, r.year), (15, 3, 2025));
    }

    #[test]
    fn test_flush_resets_to_empty() {
        let mut acc = GpsAccumulator::default();
        acc.fold(&fix(0.0, (1, 1, 2025), (1, 0, 0), 5));
        acc.flush();
        assert!(acc.is_empty());

        acc.fold(&fix(9.0, (2, 1, 2025), (2, 0, 0), 6));
        let averaged = acc.flush().unwrap();
        assert_eq!(averaged.count, 1);
        assert_eq!(averaged.record.mday, 2);
        assert_eq!(averaged.record.hour, 2);
    }

    #[test]
    fn test_midnight_rollover_uses_latest_date() {
        let mut acc = GpsAccumulator::default();
        acc.fold(&fix(0.0, (31, 12, 2024), (23, 59, 50), 6));
        acc.fold(&fix(10.0, (1, 1, 2025), (0, 0, 0), 6));
        acc.fold(&fix(20.0, (1, 1, 2025), (0, 0, 10), 6));

        // (86390 + 86400 + 86410) / 3 = 86400 -> 24:00:00 -> 00:00:00 next day
        let r = acc.flush().unwrap().record;
        assert_eq!((r.hour, r.minute, r.second), (0, 0, 0));
        assert_eq!((r.mday, r.month, r.year), (1, 1, 2025));
    }

    #[test]
    fn test_rollover_before_midnight_mean_keeps_first_date() {
        let mut acc = GpsAccumulator::default();
        acc.fold(&fix(0.0, (31, 12, 2024), (23, 59, 40), 6));
        acc.fold(&fix(10.0, (31, 12, 2024), (23, 59, 50), 6));
        acc.fold(&fix(20.0, (1, 1, 2025), (0, 0, 0), 6));

        // (86380 + 86390 + 86400) / 3 = 86390 -> 23:59:50
        let r = acc.flush().unwrap().record;
        assert_eq!((r.hour, r.minute, r.second), (23, 59, 50));
        assert_eq!((r.mday, r.month, r.year), (31, 12, 2024));
    }

    #[test]
    fn test_out_of_range_hours_do_not_overflow() {
        let mut acc = GpsAccumulator::default();
        acc.fold(&fix(0.0, (1, 1, 2025), (1_000_000, 0, 0), 5));
        let r = acc.flush().unwrap().record;
        // 1_000_000 h counts as past midnight and keeps the latest date
        assert_eq!((r.hour, r.minute, r.second), (999_976, 0, 0));

        acc.fold(&fix(0.0, (1, 1, 2025), (10, 0, 0), 5));
        acc.fold(&fix(1.0, (1, 1, 2025), (i32::MIN, 0, 0), 5));
        acc.fold(&fix(2.0, (1, 1, 2025), (i32::MAX, 59, 59), 5));
        let averaged = acc.flush().unwrap();
        assert_eq!(averaged.count, 3);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_sensor_means() {
        let mut acc = SensorAccumulator::default();
        let mut a = SensorRecord {
            values: [1.0; SENSOR_FIELD_COUNT],
        };
        a.values[0] = 0.0;
        let mut b = SensorRecord {
            values: [2.0; SENSOR_FIELD_COUNT],
        };
        b.values[0] = 1.0;
        acc.fold(&a);
        acc.fold(&b);

        let mean = acc.flush().unwrap();
        assert!((mean.values[0] - 0.5).abs() < 1e-12);
        assert!(mean.values[1..].iter().all(|v| (v - 1.5).abs() < 1e-12));
        assert!(acc.is_empty());
    }
}
