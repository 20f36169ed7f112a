//! Paint catalog domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable paint catalog entry.
///
/// Paints are created by catalog import or dashboard edits and never mutated
/// afterwards; an edit replaces the entry under the same id. The `rgb` and
/// `cmyk` display strings are derived from the hex value at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    /// Unique paint identifier (UUID format)
    pub id: String,
    /// Display name, e.g. "Verde Esmeralda"
    pub name: String,
    /// Manufacturer or catalog code
    pub code: String,
    /// Hex color in `#RRGGBB` form
    pub hex: String,
    /// Derived display string, e.g. "rgb(80, 200, 120)"
    pub rgb: String,
    /// Derived display string, e.g. "cmyk(60%, 0%, 40%, 22%)"
    pub cmyk: String,
    /// Category label, e.g. "Verdes"
    pub category: String,
}

impl Paint {
    /// Creates a paint entry, deriving the RGB and CMYK display strings from
    /// the hex value. An unparsable hex falls back to black.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        hex: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let hex = hex.into();
        let (r, g, b) = parse_hex(&hex).unwrap_or((0, 0, 0));
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            code: code.into(),
            hex,
            rgb: format!("rgb({}, {}, {})", r, g, b),
            cmyk: cmyk_string(r, g, b),
            category: category.into(),
        }
    }
}

/// A named, ordered collection of paints belonging to a company.
///
/// The `active` flag gates customer visibility: inactive catalogs stay
/// editable in the dashboard but are hidden from the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Unique catalog identifier (UUID format)
    pub id: String,
    /// Display name
    pub name: String,
    /// Owning company identifier
    pub company_id: String,
    /// Whether end customers can see this catalog
    pub active: bool,
    /// Ordered paint entries
    pub paints: Vec<Paint>,
}

impl Catalog {
    /// Creates an empty, active catalog for a company.
    pub fn new(name: impl Into<String>, company_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            company_id: company_id.into(),
            active: true,
            paints: Vec::new(),
        }
    }

    /// Replaces the paint with the same id, or appends when absent.
    ///
    /// Paints are immutable, so editing is modeled as replacement under the
    /// existing id.
    pub fn upsert_paint(&mut self, paint: Paint) {
        match self.paints.iter().position(|p| p.id == paint.id) {
            Some(index) => self.paints[index] = paint,
            None => self.paints.push(paint),
        }
    }
}

/// Parses `#RRGGBB` (leading `#` optional) into components.
pub(crate) fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

fn cmyk_string(r: u8, g: u8, b: u8) -> String {
    let rf = f64::from(r) / 255.0;
    let gf = f64::from(g) / 255.0;
    let bf = f64::from(b) / 255.0;

    let k = 1.0 - rf.max(gf).max(bf);
    if (1.0 - k).abs() < f64::EPSILON {
        return "cmyk(0%, 0%, 0%, 100%)".to_string();
    }

    let c = (1.0 - rf - k) / (1.0 - k);
    let m = (1.0 - gf - k) / (1.0 - k);
    let y = (1.0 - bf - k) / (1.0 - k);

    format!(
        "cmyk({}%, {}%, {}%, {}%)",
        (c * 100.0).round() as u32,
        (m * 100.0).round() as u32,
        (y * 100.0).round() as u32,
        (k * 100.0).round() as u32
    )
}
