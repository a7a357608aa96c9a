use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::MAX_PHOTOS_PER_SETCARD;
use crate::error::{AppError, Result};

/// Standard alphabet, padding optional (browsers are inconsistent about it)
const PHOTO_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub chest: f64,
    pub waist: f64,
    pub hips: f64,
}

/// Setcard record stored in redb and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetcardRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub age: i64,
    pub height: f64,
    pub measurements: Measurements,
    /// Inline Base64 payloads, optionally as `data:` URLs
    pub photos: Vec<String>,
}

/// Setcard fields after validation and coercion, before an id is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewSetcard {
    pub name: String,
    pub age: i64,
    pub height: f64,
    pub measurements: Measurements,
    pub photos: Vec<String>,
}

impl NewSetcard {
    pub fn with_id(self, id: String) -> SetcardRecord {
        SetcardRecord {
            id,
            name: self.name,
            age: self.age,
            height: self.height,
            measurements: self.measurements,
            photos: self.photos,
        }
    }
}

/// Raw create-setcard body
///
/// Numeric fields are taken as arbitrary JSON so that clients sending form
/// values as strings (`"age": "30"`) are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct SetcardInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub height: Option<Value>,
    #[serde(default)]
    pub measurements: Option<MeasurementsInput>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MeasurementsInput {
    #[serde(default)]
    pub chest: Option<Value>,
    #[serde(default)]
    pub waist: Option<Value>,
    #[serde(default)]
    pub hips: Option<Value>,
}

impl SetcardInput {
    /// Coerce numeric fields and validate photos
    pub fn validate(self) -> Result<NewSetcard> {
        let photos = self.photos.unwrap_or_default();
        if photos.len() > MAX_PHOTOS_PER_SETCARD {
            return Err(AppError::Validation(format!(
                "A setcard can hold at most {} photos",
                MAX_PHOTOS_PER_SETCARD
            )));
        }
        for (index, photo) in photos.iter().enumerate() {
            if !is_base64_photo(photo) {
                return Err(AppError::Validation(format!(
                    "Photo {} is not a valid Base64 image",
                    index
                )));
            }
        }

        let measurements = self.measurements.unwrap_or_default();

        Ok(NewSetcard {
            name: self.name.unwrap_or_default(),
            age: coerce_integer(self.age.as_ref()),
            height: coerce_number(self.height.as_ref()),
            measurements: Measurements {
                chest: coerce_number(measurements.chest.as_ref()),
                waist: coerce_number(measurements.waist.as_ref()),
                hips: coerce_number(measurements.hips.as_ref()),
            },
            photos,
        })
    }
}

/// Numbers pass through, numeric strings are parsed, anything else is 0
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Like [`coerce_number`], truncating fractions toward zero
pub fn coerce_integer(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(|| coerce_number(value) as i64),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .unwrap_or_else(|_| coerce_number(value) as i64),
        _ => 0,
    }
}

/// Accepts bare Base64 or a `data:<mime>;base64,<payload>` URL
pub fn is_base64_photo(photo: &str) -> bool {
    let payload = match photo.strip_prefix("data:") {
        Some(rest) => match rest.split_once(";base64,") {
            Some((_, payload)) => payload,
            None => return false,
        },
        None => photo,
    };

    let payload = payload.trim();
    !payload.is_empty() && PHOTO_BASE64.decode(payload).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> SetcardInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_numbers_are_coerced() {
        let card = input(json!({
            "name": "A",
            "age": "30",
            "height": "170",
            "measurements": { "chest": "90", "waist": "60", "hips": "90" },
            "photos": []
        }))
        .validate()
        .unwrap();

        assert_eq!(card.name, "A");
        assert_eq!(card.age, 30);
        assert_eq!(card.height, 170.0);
        assert_eq!(
            card.measurements,
            Measurements {
                chest: 90.0,
                waist: 60.0,
                hips: 90.0
            }
        );
        assert!(card.photos.is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let card = input(json!({})).validate().unwrap();

        assert_eq!(card.name, "");
        assert_eq!(card.age, 0);
        assert_eq!(card.height, 0.0);
        assert_eq!(card.measurements, Measurements::default());
    }

    #[test]
    fn test_non_numeric_values_default_to_zero() {
        let card = input(json!({
            "age": "thirty",
            "height": true,
            "measurements": { "chest": null, "waist": "", "hips": [1] }
        }))
        .validate()
        .unwrap();

        assert_eq!(card.age, 0);
        assert_eq!(card.height, 0.0);
        assert_eq!(card.measurements, Measurements::default());
    }

    #[test]
    fn test_name_stored_as_given() {
        let card = input(json!({ "name": "  Anna  " })).validate().unwrap();
        assert_eq!(card.name, "  Anna  ");
    }

    #[test]
    fn test_coerce_integer_truncates() {
        assert_eq!(coerce_integer(Some(&json!(29.9))), 29);
        assert_eq!(coerce_integer(Some(&json!("41.5"))), 41);
        assert_eq!(coerce_integer(Some(&json!(" 22 "))), 22);
        assert_eq!(coerce_integer(Some(&json!("NaN"))), 0);
        assert_eq!(coerce_integer(None), 0);
    }

    #[test]
    fn test_coerce_number_rejects_non_finite() {
        assert_eq!(coerce_number(Some(&json!("inf"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("172.5"))), 172.5);
        assert_eq!(coerce_number(Some(&json!(88))), 88.0);
    }

    #[test]
    fn test_base64_photos() {
        assert!(is_base64_photo("SGVsbG8gV29ybGQ="));
        assert!(is_base64_photo("SGVsbG8gV29ybGQ"));
        assert!(is_base64_photo("data:image/png;base64,iVBORw0KGgo="));

        assert!(!is_base64_photo(""));
        assert!(!is_base64_photo("Hello@World!"));
        assert!(!is_base64_photo("data:image/png,raw-bytes"));
        assert!(!is_base64_photo("/models/1700000000000-face.jpg"));
    }

    #[test]
    fn test_invalid_photo_is_validation_error() {
        let result = input(json!({ "photos": ["SGVsbG8=", "not base64!"] })).validate();
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("Photo 1")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_too_many_photos() {
        let photos = vec!["SGVsbG8="; MAX_PHOTOS_PER_SETCARD + 1];
        let result = input(json!({ "photos": photos })).validate();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_record_serializes_mongo_style_id() {
        let record = NewSetcard {
            name: "A".to_string(),
            age: 30,
            height: 170.0,
            measurements: Measurements::default(),
            photos: vec![],
        }
        .with_id("id-1".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["_id"], "id-1");
        assert_eq!(json["age"], 30);
        assert_eq!(json["measurements"]["chest"], 0.0);
    }

    #[test]
    fn test_record_bincode_roundtrip() {
        let record = NewSetcard {
            name: "B".to_string(),
            age: 25,
            height: 181.5,
            measurements: Measurements {
                chest: 92.0,
                waist: 71.0,
                hips: 95.0,
            },
            photos: vec!["SGVsbG8=".to_string()],
        }
        .with_id("id-2".to_string());

        let bytes = bincode::serialize(&record).unwrap();
        let decoded: SetcardRecord = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, record);
    }
}
