//! Domain types shared across the service.

use serde::{Deserialize, Deserializer, Serialize};

// ── Airport records ───────────────────────────────────────────────────

/// An airport as returned by the AVWX station lookup.
///
/// Records are immutable once built; the store replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// ICAO identifier, the store key (e.g. "KSTL").
    pub icao: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_elevation")]
    pub elevation_ft: Option<f64>,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub runways: Vec<Runway>,
}

/// One physical runway, described by both of its ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runway {
    #[serde(default)]
    pub ident1: String,
    #[serde(default)]
    pub ident2: String,
    #[serde(default)]
    pub length_ft: u32,
    #[serde(default)]
    pub width_ft: u32,
}

impl Airport {
    /// Condensed one-line form: `"<icao>, <name>\n"`.
    pub fn summary_line(&self) -> String {
        format!("{}, {}\n", self.icao, self.name)
    }
}

/// Concatenate the summary lines of `airports`, in order.
pub fn summarize<'a, I>(airports: I) -> String
where
    I: IntoIterator<Item = &'a Airport>,
{
    airports.into_iter().map(Airport::summary_line).collect()
}

/// Elevation shows up as a number, a numeric string, or null depending on
/// the upstream revision. Anything else maps to `None` rather than failing
/// the record.
fn lenient_elevation<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}
