//! Vendor and column inference for order exports.
//!
//! Headers are compared after lower-casing and dropping every character that
//! is not an ASCII letter or digit, so `"LCSC Part #"`, `"lcsc_part"` and
//! `"LCSC Part Number"` all normalize to something containing `lcscpart`.

use crate::core::types::Source;

/// Parts vendors whose exports carry a recognizable signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Lcsc,
    DigiKey,
}

impl Vendor {
    #[must_use]
    pub fn source(self) -> Source {
        match self {
            Self::Lcsc => Source::Lcsc,
            Self::DigiKey => Source::DigiKey,
        }
    }
}

/// (vendor, normalized header fragment, literal column title in raw text)
const VENDOR_SIGNATURES: &[(Vendor, &str, &str)] = &[
    (Vendor::Lcsc, "lcscpart", "LCSC Part #"),
    (Vendor::DigiKey, "digikeypart", "Digi-Key Part Number"),
];

/// How a candidate is compared against a normalized header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPattern {
    Contains(&'static str),
    Equals(&'static str),
}

impl HeaderPattern {
    #[must_use]
    pub fn matches(self, header: &str) -> bool {
        match self {
            Self::Contains(fragment) => header.contains(fragment),
            Self::Equals(name) => header == name,
        }
    }
}

/// Logical record fields that can be mapped to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PartNumber,
    MfrPart,
    Manufacturer,
    Description,
    Quantity,
    OrderDate,
}

use HeaderPattern::{Contains, Equals};

/// Candidates per field, tried in order; the first header matching wins
const COLUMN_RULES: &[(Field, &[HeaderPattern])] = &[
    (
        Field::PartNumber,
        &[
            Contains("lcscpart"),
            Contains("digikeypart"),
            Contains("partnumber"),
            Contains("part"),
            Equals("part"),
        ],
    ),
    (
        Field::MfrPart,
        &[
            Contains("manufacturepart"),
            Contains("manufacturerpart"),
            Contains("mfrpart"),
            Contains("productname"),
        ],
    ),
    (
        Field::Manufacturer,
        &[Equals("manufacturer"), Contains("brand"), Contains("vendor")],
    ),
    (
        Field::Description,
        &[
            Contains("description"),
            Contains("detail"),
            Contains("parameter"),
            Contains("comment"),
        ],
    ),
    (
        Field::Quantity,
        &[Contains("quantity"), Contains("qty"), Contains("orderqty")],
    ),
    (
        Field::OrderDate,
        &[
            Contains("ordertime"),
            Contains("date"),
            Contains("time"),
            Contains("placed"),
            Contains("invoice"),
        ],
    ),
];

/// Lower-case a header and keep only ASCII letters and digits
#[must_use]
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Identify the vendor from normalized headers, falling back to the raw text
#[must_use]
pub fn detect_vendor(headers: &[String], raw_text: &str) -> Option<Vendor> {
    VENDOR_SIGNATURES
        .iter()
        .find(|(_, fragment, _)| headers.iter().any(|h| h.contains(fragment)))
        .or_else(|| {
            VENDOR_SIGNATURES
                .iter()
                .find(|(_, _, title)| raw_text.contains(title))
        })
        .map(|(vendor, _, _)| *vendor)
}

/// Resolved column index for each logical field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub part_number: Option<usize>,
    pub mfr_part: Option<usize>,
    pub manufacturer: Option<usize>,
    pub description: Option<usize>,
    pub quantity: Option<usize>,
    pub order_date: Option<usize>,
}

impl ColumnMap {
    /// Resolve columns from normalized headers
    #[must_use]
    pub fn resolve(headers: &[String]) -> Self {
        let mut map = Self::default();
        for (field, candidates) in COLUMN_RULES {
            let index = candidates
                .iter()
                .find_map(|pattern| headers.iter().position(|h| pattern.matches(h)));
            *map.slot_mut(*field) = index;
        }
        map
    }

    #[must_use]
    pub fn index(&self, field: Field) -> Option<usize> {
        match field {
            Field::PartNumber => self.part_number,
            Field::MfrPart => self.mfr_part,
            Field::Manufacturer => self.manufacturer,
            Field::Description => self.description,
            Field::Quantity => self.quantity,
            Field::OrderDate => self.order_date,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<usize> {
        match field {
            Field::PartNumber => &mut self.part_number,
            Field::MfrPart => &mut self.mfr_part,
            Field::Manufacturer => &mut self.manufacturer,
            Field::Description => &mut self.description,
            Field::Quantity => &mut self.quantity,
            Field::OrderDate => &mut self.order_date,
        }
    }

    /// Cell for `field` in `row`; unmapped fields and short rows read as empty
    #[must_use]
    pub fn cell<'a>(&self, row: &'a [String], field: Field) -> &'a str {
        self.index(field)
            .and_then(|i| row.get(i))
            .map_or("", String::as_str)
    }
}
