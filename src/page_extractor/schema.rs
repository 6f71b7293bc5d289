//! Raw listing schema as embedded in the catalog's framework state
//!
//! Every field is optional: the site omits keys freely and the normalizer
//! supplies fallbacks. Numeric fields accept JSON numbers and numeric strings.

use serde::{Deserialize, Deserializer};

/// Deserialize a number that may arrive as a JSON number, a numeric string or null
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Numeric view of a JSON value, if it has one
#[must_use]
pub fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// `{ "value": "..." }` wrapper the site uses for enumerations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueLabel {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoPoint {
    /// GeoJSON order: `[longitude, latitude]`
    #[serde(default)]
    pub coordinates: Option<Vec<serde_json::Value>>,
}

impl GeoPoint {
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.as_ref()?.first().and_then(number_from_value)
    }

    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.as_ref()?.get(1).and_then(number_from_value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Broker {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Associate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub office_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPhoto {
    #[serde(default)]
    pub raw_value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOperation {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub id: Option<f64>,
}

/// One listing object from the embedded state
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<ValueLabel>,
    #[serde(default)]
    pub display_address: Option<String>,
    #[serde(default)]
    pub geo_label: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub list_broker: Option<Vec<Broker>>,
    #[serde(default)]
    pub associate: Option<Associate>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dimension_land: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dimension_total_built: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dimension_covered: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_rooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bathrooms: Option<f64>,
    #[serde(default, rename = "type")]
    pub property_type: Option<ValueLabel>,
    #[serde(default)]
    pub photos: Option<Vec<RawPhoto>>,
    #[serde(default)]
    pub operation: Option<RawOperation>,
    #[serde(default)]
    pub listing_status: Option<ValueLabel>,
}

impl RawListing {
    /// Status label, if the listing carries one
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.listing_status.as_ref()?.value.as_deref()
    }
}

/// Listings sub-tree for one catalog page
///
/// Held only while the page is being processed.
#[derive(Debug, Clone, Default)]
pub struct RawListingPayload {
    /// Top-level state key the container was found under
    pub source_key: String,
    pub listings: Vec<RawListing>,
    /// Number of listing objects in the container, including ones that
    /// failed to deserialize
    pub raw_count: usize,
    pub total_pages: Option<u32>,
    pub total_items: Option<u64>,
}

impl RawListingPayload {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw_count == 0
    }
}
