use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::record::{digits_only, InventoryRecord};
use crate::core::tags::{generate_tags, tag_text};
use crate::core::types::Source;
use crate::parsing::csv::tokenize;
use crate::parsing::schema::{detect_vendor, normalize_header, ColumnMap, Field, Vendor};
use crate::utils::dates::{date_from_filename, parse_date};
use crate::utils::validation::check_row_limit;

static LCSC_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^C\d+$").expect("valid LCSC part pattern"));

/// Result of parsing one export, with counts of what was dropped
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub records: Vec<InventoryRecord>,
    /// Source tag assigned to every record
    pub source: Source,
    /// Rows with fewer than two cells
    pub malformed_rows: usize,
    /// Rows without part number, manufacturer part or description
    pub blank_rows: usize,
    /// Rows dropped after the import row limit was reached
    pub truncated_rows: usize,
}

/// Parse a vendor export into inventory records.
///
/// `source_hint` is the originating filename; it is only consulted to recover
/// an order date when a row has none. Text with fewer than two rows (empty or
/// header only) yields no records.
///
/// # Examples
///
/// ```
/// use partscout::parsing::ingest::parse;
///
/// let csv = "LCSC Part Number,Description,Order Qty.\nC25804,10k resistor,100\n";
/// let records = parse(csv, "LCSC_Exported__20240305101112.csv");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].order_date.as_deref(), Some("2024-03-05"));
/// ```
#[must_use]
pub fn parse(raw_text: &str, source_hint: &str) -> Vec<InventoryRecord> {
    parse_with_report(raw_text, source_hint).records
}

/// Parse a vendor export and report skipped rows
#[must_use]
pub fn parse_with_report(raw_text: &str, source_hint: &str) -> ParsedImport {
    let rows = tokenize(raw_text);
    if rows.len() < 2 {
        tracing::debug!("{source_hint}: fewer than 2 rows, nothing to import");
        return ParsedImport::default();
    }

    let headers: Vec<String> = rows[0].iter().map(|h| normalize_header(h)).collect();
    let vendor = detect_vendor(&headers, raw_text);
    let source = vendor.map_or(Source::Unknown, Vendor::source);
    let columns = ColumnMap::resolve(&headers);
    let filename_date = date_from_filename(source_hint);

    tracing::debug!(
        "{source_hint}: detected source {source}, columns {columns:?}, {} data rows",
        rows.len() - 1
    );

    let mut parsed = ParsedImport {
        source: source.clone(),
        ..ParsedImport::default()
    };

    for (offset, row) in rows[1..].iter().enumerate() {
        if check_row_limit(parsed.records.len()).is_some() {
            parsed.truncated_rows = rows.len() - 1 - offset;
            tracing::warn!(
                "{source_hint}: row limit reached, dropping {} rows",
                parsed.truncated_rows
            );
            break;
        }

        if row.len() < 2 {
            parsed.malformed_rows += 1;
            continue;
        }

        let mut record = InventoryRecord::new(source.clone());
        record.part_number = clean(columns.cell(row, Field::PartNumber));
        record.mfr_part = clean(columns.cell(row, Field::MfrPart));
        record.manufacturer = clean(columns.cell(row, Field::Manufacturer));
        record.description = clean(columns.cell(row, Field::Description));

        if record.is_blank() {
            parsed.blank_rows += 1;
            continue;
        }

        record.quantity = digits_only(columns.cell(row, Field::Quantity));
        record.order_date = parse_date(columns.cell(row, Field::OrderDate))
            .or_else(|| filename_date.clone());
        record.tags = generate_tags(&tag_text(&[
            &record.description,
            &record.mfr_part,
            &record.part_number,
            &record.manufacturer,
        ]));
        record.link = build_link(vendor, &record.part_number, &record.mfr_part);
        parsed.records.push(record);
    }

    if parsed.malformed_rows > 0 || parsed.blank_rows > 0 {
        tracing::debug!(
            "{source_hint}: skipped {} malformed and {} blank rows",
            parsed.malformed_rows,
            parsed.blank_rows
        );
    }

    parsed
}

/// Drop one stray surrounding quote on each side and trim
fn clean(cell: &str) -> String {
    let s = cell.trim();
    let s = s.strip_prefix('"').unwrap_or(s);
    let s = s.strip_suffix('"').unwrap_or(s);
    s.trim().to_string()
}

/// Deep link to the vendor's product page or search results
fn build_link(vendor: Option<Vendor>, part_number: &str, mfr_part: &str) -> String {
    match vendor {
        Some(Vendor::Lcsc) if LCSC_PART.is_match(part_number) => {
            format!("https://www.lcsc.com/product-detail/_{part_number}.html")
        }
        Some(Vendor::DigiKey) => {
            let keyword = if part_number.is_empty() {
                mfr_part
            } else {
                part_number
            };
            if keyword.is_empty() {
                String::new()
            } else {
                format!(
                    "https://www.digikey.com/en/products/result?keywords={}",
                    urlencoding::encode(keyword)
                )
            }
        }
        _ => String::new(),
    }
}
