//! Caller-facing property record

use serde::{Deserialize, Serialize, Serializer};

use crate::utils::constants::UNAVAILABLE;

/// A coordinate that may be missing from the raw listing
///
/// Serializes as a JSON number when known and as `"No disponible"` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Coordinate {
    Known(f64),
    #[default]
    Unavailable,
}

impl Coordinate {
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unavailable => None,
        }
    }
}

impl From<Option<f64>> for Coordinate {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unavailable, Self::Known)
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(v) => serializer.serialize_f64(*v),
            Self::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(crate::page_extractor::schema::number_from_value(&value).into())
    }
}

/// Sale or rental, by the catalog's operation id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Sale,
    Rent,
    TemporaryRent,
    Unknown,
}

impl OperationKind {
    #[must_use]
    pub fn from_id(id: Option<f64>) -> Self {
        match id {
            Some(v) if v == 1.0 => Self::Sale,
            Some(v) if v == 2.0 => Self::Rent,
            Some(v) if v == 3.0 => Self::TemporaryRent,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sale => "Venta",
            Self::Rent => "Alquiler",
            Self::TemporaryRent => "Alquiler temporario",
            Self::Unknown => "",
        }
    }
}

/// One normalized listing
///
/// Every field has a value; missing source data becomes a sentinel string,
/// an empty list or [`Coordinate::Unavailable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub title: String,
    pub price: String,
    pub address: String,
    pub locality: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub brokers: Vec<String>,
    pub contact_person: String,
    pub office: String,
    pub dimensions_land: String,
    pub m2_total: String,
    pub m2_cover: String,
    pub ambientes: String,
    #[serde(rename = "baños")]
    pub banos: String,
    pub property_type: String,
    pub url: String,
    pub photos: Vec<String>,
    pub operation: String,
}
