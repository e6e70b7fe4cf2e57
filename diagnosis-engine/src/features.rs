//! Patient records and the fixed-layout feature vector the classifiers score

use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::encoder::CategoryEncoder;
use crate::error::Result;

/// One patient's vital signs and reported symptoms, as posted by clients.
///
/// Field names on the wire are part of the client contract, including the
/// trailing underscore of `Oxygen_Saturation_`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "Age", deserialize_with = "measurement")]
    pub age: f64,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Symptom_1")]
    pub symptom_1: String,
    #[serde(rename = "Symptom_2")]
    pub symptom_2: String,
    #[serde(rename = "Symptom_3")]
    pub symptom_3: String,
    #[serde(rename = "Heart_Rate_bpm", deserialize_with = "measurement")]
    pub heart_rate_bpm: f64,
    #[serde(rename = "Body_Temperature_C", deserialize_with = "measurement")]
    pub body_temperature_c: f64,
    #[serde(rename = "Oxygen_Saturation_", deserialize_with = "measurement")]
    pub oxygen_saturation: f64,
    #[serde(rename = "Systolic", deserialize_with = "measurement")]
    pub systolic: f64,
    #[serde(rename = "Diastolic", deserialize_with = "measurement")]
    pub diastolic: f64,
}

impl PatientRecord {
    /// The five raw measurements, in feature order, paired with their wire names.
    pub fn measurements(&self) -> [(&'static str, f64); 5] {
        [
            ("Heart_Rate_bpm", self.heart_rate_bpm),
            ("Body_Temperature_C", self.body_temperature_c),
            ("Oxygen_Saturation_", self.oxygen_saturation),
            ("Systolic", self.systolic),
            ("Diastolic", self.diastolic),
        ]
    }

    /// The four categorical fields paired with their wire names.
    pub fn categories(&self) -> [(&'static str, &str); 4] {
        [
            ("Gender", self.gender.as_str()),
            ("Symptom_1", self.symptom_1.as_str()),
            ("Symptom_2", self.symptom_2.as_str()),
            ("Symptom_3", self.symptom_3.as_str()),
        ]
    }
}

/// Accepts a JSON number or a string holding one.
///
/// Browser form clients post every input value as a string.
fn measurement<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct MeasurementVisitor;

    impl Visitor<'_> for MeasurementVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<f64, E> {
            Ok(value)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<f64, E> {
            Ok(value as f64)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<f64, E> {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(MeasurementVisitor)
}

/// The four fitted encoders, one per categorical slot.
///
/// Each symptom slot has its own vocabulary; a symptom known to one slot is
/// not implied to be known to another.
#[derive(Clone)]
pub struct EncoderSet {
    pub gender: Arc<dyn CategoryEncoder>,
    pub symptom_1: Arc<dyn CategoryEncoder>,
    pub symptom_2: Arc<dyn CategoryEncoder>,
    pub symptom_3: Arc<dyn CategoryEncoder>,
}

impl EncoderSet {
    /// Encoders paired with the wire name of the field they encode.
    pub fn named(&self) -> [(&'static str, &dyn CategoryEncoder); 4] {
        [
            ("Gender", self.gender.as_ref()),
            ("Symptom_1", self.symptom_1.as_ref()),
            ("Symptom_2", self.symptom_2.as_ref()),
            ("Symptom_3", self.symptom_3.as_ref()),
        ]
    }
}

impl fmt::Debug for EncoderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderSet").finish_non_exhaustive()
    }
}

/// Model input: `Age`, the four encoded categories, then the five raw
/// measurements. The trained models depend on this exact order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FeatureVector::LEN]);

impl FeatureVector {
    pub const LEN: usize = 10;

    pub const NAMES: [&'static str; FeatureVector::LEN] = [
        "Age",
        "Gender",
        "Symptom_1",
        "Symptom_2",
        "Symptom_3",
        "Heart_Rate_bpm",
        "Body_Temperature_C",
        "Oxygen_Saturation_",
        "Systolic",
        "Diastolic",
    ];

    /// Encode `record` into model input.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownCategory`](crate::EngineError::UnknownCategory)
    /// for the first categorical field outside its encoder's vocabulary.
    pub fn assemble(record: &PatientRecord, encoders: &EncoderSet) -> Result<Self> {
        let gender = encoders.gender.encode(&record.gender)?;
        let symptom_1 = encoders.symptom_1.encode(&record.symptom_1)?;
        let symptom_2 = encoders.symptom_2.encode(&record.symptom_2)?;
        let symptom_3 = encoders.symptom_3.encode(&record.symptom_3)?;

        Ok(Self([
            record.age,
            f64::from(gender),
            f64::from(symptom_1),
            f64::from(symptom_2),
            f64::from(symptom_3),
            record.heart_rate_bpm,
            record.body_temperature_c,
            record.oxygen_saturation,
            record.systolic,
            record.diastolic,
        ]))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<[f64; FeatureVector::LEN]> for FeatureVector {
    fn from(values: [f64; FeatureVector::LEN]) -> Self {
        Self(values)
    }
}
