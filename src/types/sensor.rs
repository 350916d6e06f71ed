use crate::types::schema::{FieldDef, FieldValue, Record};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const SENSOR_FIELD_COUNT: usize = 18;

/// Eighteen comma-separated floats. Channel units are raw ADC counts until
/// calibration factors are known.
pub const SENSOR_SCHEMA: &[FieldDef] = &[
    FieldDef::float("tsecs", Some(','), 6, 1),
    FieldDef::float("tmpi", Some(','), 5, 1),
    FieldDef::float("a1x", Some(','), 0, 6),
    FieldDef::float("a1y", Some(','), 0, 6),
    FieldDef::float("a1z", Some(','), 0, 6),
    FieldDef::float("a2x", Some(','), 0, 6),
    FieldDef::float("a2y", Some(','), 0, 6),
    FieldDef::float("a2z", Some(','), 0, 6),
    FieldDef::float("magx", Some(','), 0, 6),
    FieldDef::float("magy", Some(','), 0, 6),
    FieldDef::float("magz", Some(','), 0, 6),
    FieldDef::float("gyrx", Some(','), 0, 6),
    FieldDef::float("gyry", Some(','), 0, 6),
    FieldDef::float("gyrz", Some(','), 0, 6),
    FieldDef::float("humid", Some(','), 0, 6),
    FieldDef::float("prss", Some(','), 0, 6),
    FieldDef::float("tmpx", Some(','), 0, 6),
    FieldDef::float("vbat", None, 0, 6),
];

/// One multi-channel sensor reading, values in schema order
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorRecord {
    pub values: [f64; SENSOR_FIELD_COUNT],
}

impl Record for SensorRecord {
    const SCHEMA: &'static [FieldDef] = SENSOR_SCHEMA;

    fn from_fields(values: &[FieldValue]) -> Self {
        let mut record = Self {
            values: [0.0; SENSOR_FIELD_COUNT],
        };
        for (slot, value) in record.values.iter_mut().zip(values) {
            *slot = value.as_f64();
        }
        record
    }

    fn fields(&self) -> Vec<FieldValue> {
        self.values.iter().map(|&v| FieldValue::Float(v)).collect()
    }

    fn tsecs(&self) -> f64 {
        self.values[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_matches_field_count() {
        assert_eq!(SENSOR_SCHEMA.len(), SENSOR_FIELD_COUNT);
        assert!(SENSOR_SCHEMA[..SENSOR_FIELD_COUNT - 1]
            .iter()
            .all(|f| f.separator == Some(',')));
        assert_eq!(SENSOR_SCHEMA[SENSOR_FIELD_COUNT - 1].separator, None);
    }

    #[test]
    fn test_from_fields_keeps_schema_order() {
        let values: Vec<FieldValue> = (0..SENSOR_FIELD_COUNT)
            .map(|i| FieldValue::Float(i as f64))
            .collect();
        let record = SensorRecord::from_fields(&values);

        assert_eq!(record.tsecs(), 0.0);
        assert_eq!(record.values[1], 1.0);
        assert_eq!(record.values[SENSOR_FIELD_COUNT - 1], 17.0);
        assert_eq!(record.fields().len(), SENSOR_FIELD_COUNT);
    }
}
