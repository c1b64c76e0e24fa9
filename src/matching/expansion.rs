//! Unit-aware expansion of search terms.
//!
//! Component values are written many ways: a 100 nF capacitor may be listed
//! as `100nF`, `0.1uF` or `100000pF`, a 4.7 kΩ resistor as `4.7k`, `4700R` or
//! `4700 ohm`. A query that looks like a capacitance or resistance is expanded
//! into the equivalent spellings so substring matching finds all of them.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// `<number><unit>f` with unit in u/n/p (micro sign and Greek mu read as u)
static CAPACITANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s*([unp\x{00B5}\x{03BC}])f$").expect("valid capacitance pattern")
});

/// `<number>[k|m][ohm|r|Ω]`; the caller requires multiplier or unit to be present
static RESISTANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s*(k|m)?(ohm|r|[\x{2126}\x{03A9}\x{03C9}])?$")
        .expect("valid resistance pattern")
});

const PICO_PER_NANO: f64 = 1_000.0;
const PICO_PER_MICRO: f64 = 1_000_000.0;
const NANO_RANGE_END_PF: f64 = 1_000_000_000.0;

/// Expand a query term into unit-equivalent spellings.
///
/// The term itself is always part of the result; terms that are neither a
/// capacitance nor a resistance expand to just themselves.
///
/// # Examples
///
/// ```
/// use partscout::matching::expansion::expand_term;
///
/// let variants = expand_term("100nf");
/// assert!(variants.contains("0.1uf"));
/// assert!(variants.contains("100000pf"));
///
/// let variants = expand_term("4.7k");
/// assert!(variants.contains("4700"));
/// assert!(variants.contains("4700ohm"));
/// ```
#[must_use]
pub fn expand_term(term: &str) -> BTreeSet<String> {
    let term = term.trim().to_lowercase();
    let mut variants = BTreeSet::new();

    if let Some(caps) = CAPACITANCE.captures(&term) {
        if let Ok(value) = caps[1].parse::<f64>() {
            add_capacitance_variants(&mut variants, value, &caps[2]);
        }
    }

    if let Some(caps) = RESISTANCE.captures(&term) {
        let multiplier = caps.get(2).map(|m| m.as_str());
        // A bare number is not treated as a resistance
        if multiplier.is_some() || caps.get(3).is_some() {
            if let Ok(value) = caps[1].parse::<f64>() {
                add_resistance_variants(&mut variants, value, multiplier);
            }
        }
    }

    variants.insert(term);
    variants
}

fn add_capacitance_variants(variants: &mut BTreeSet<String>, value: f64, unit: &str) {
    let picofarads = match unit {
        "p" => value,
        "n" => value * PICO_PER_NANO,
        _ => value * PICO_PER_MICRO,
    };

    if (PICO_PER_NANO..NANO_RANGE_END_PF).contains(&picofarads) {
        add_with_unit(variants, picofarads / PICO_PER_NANO, "nf");
    }
    if picofarads >= PICO_PER_NANO {
        add_with_unit(variants, picofarads / PICO_PER_MICRO, "uf");
    }
    if picofarads < PICO_PER_MICRO {
        add_with_unit(variants, picofarads, "pf");
    }
}

fn add_resistance_variants(variants: &mut BTreeSet<String>, value: f64, multiplier: Option<&str>) {
    let ohms = match multiplier {
        Some("k") => value * 1_000.0,
        Some("m") => value * 1_000_000.0,
        _ => value,
    };

    if ohms >= 1_000_000.0 {
        let mega = format_number(ohms / 1_000_000.0);
        variants.insert(format!("{mega}m"));
        variants.insert(format!("{mega}m ohm"));
    }
    if ohms >= 1_000.0 {
        let kilo = format_number(ohms / 1_000.0);
        variants.insert(format!("{kilo}k"));
        variants.insert(format!("{kilo}k ohm"));
    }

    let base = format_number(ohms);
    variants.insert(format!("{base}r"));
    variants.insert(format!("{base}ohm"));
    variants.insert(base);
}

/// Insert `<n><unit>` and `<n> <unit>`
fn add_with_unit(variants: &mut BTreeSet<String>, value: f64, unit: &str) {
    let n = format_number(value);
    variants.insert(format!("{n}{unit}"));
    variants.insert(format!("{n} {unit}"));
}

/// Round to 12 significant digits and print in shortest decimal form.
///
/// Unit conversion multiplies by powers of ten, which leaves binary
/// floating-point noise (`4.7 * 1000 = 4700.000000000001`).
#[must_use]
pub fn format_number(value: f64) -> String {
    let rounded = format!("{value:.11e}").parse::<f64>().unwrap_or(value);
    format!("{rounded}")
}
