//! Smart tags inferred from free-text component descriptions.
//!
//! Rules are tried in order against the lower-cased text; every rule that
//! matches contributes its label. An inductor's DC-resistance rating ("DCR
//! 150mOhm") looks like a resistor value, so `Resistor` is dropped whenever
//! `Inductor` also matched.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A category label from the fixed tag taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "Keyboard Switch")]
    KeyboardSwitch,
    Resistor,
    Capacitor,
    Inductor,
    Diode,
    #[serde(rename = "LED")]
    Led,
    #[serde(rename = "MCU")]
    Mcu,
    Connector,
    #[serde(rename = "IC")]
    Ic,
}

impl Tag {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::KeyboardSwitch => "Keyboard Switch",
            Self::Resistor => "Resistor",
            Self::Capacitor => "Capacitor",
            Self::Inductor => "Inductor",
            Self::Diode => "Diode",
            Self::Led => "LED",
            Self::Mcu => "MCU",
            Self::Connector => "Connector",
            Self::Ic => "IC",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of tags attached to a record
pub type TagSet = BTreeSet<Tag>;

static TAG_RULES: Lazy<Vec<(Tag, Regex)>> = Lazy::new(|| {
    [
        (
            Tag::KeyboardSwitch,
            r"(key|mech|push)\s*switch|cherry|gateron|kailh|\d+gf",
        ),
        (
            Tag::Resistor,
            r"\b\d+(\.\d+)?[km]?\s*([\x{2126}\x{03A9}]|ohm)|\bres\b|resistor",
        ),
        (
            Tag::Capacitor,
            r"\b\d+(\.\d+)?[n\x{00B5}\x{03BC}u]f|\bcap\b|capacitor",
        ),
        (
            Tag::Inductor,
            r"\b\d+(\.\d+)?[n\x{00B5}\x{03BC}u]h|\bind\b|inductor",
        ),
        (Tag::Diode, r"\bdiode\b|\brectifier\b|1n4\d{3}"),
        (Tag::Led, r"\bled\b|\blight\s*emitting\b"),
        (
            Tag::Mcu,
            r"\bmcu\b|\bmicrocontroller\b|stm32|esp32|atmega|pic1|ch32|ch5",
        ),
        (Tag::Connector, r"\bheader\b|\bconn\b|\bsocket\b|usb|jst"),
        (Tag::Ic, r"\bic\b|\bchip\b|sop-|qfn-|dip-"),
    ]
    .into_iter()
    .map(|(tag, pattern)| {
        let regex = Regex::new(&format!("(?i){pattern}")).expect("tag patterns are valid");
        (tag, regex)
    })
    .collect()
});

/// Infer the tag set for a piece of descriptive text.
///
/// # Examples
///
/// ```
/// use partscout::core::tags::{generate_tags, Tag};
///
/// let tags = generate_tags("2.2uH inductor, DCR 150mOhm");
/// assert!(tags.contains(&Tag::Inductor));
/// assert!(!tags.contains(&Tag::Resistor));
/// ```
#[must_use]
pub fn generate_tags(text: &str) -> TagSet {
    let lowered = text.to_lowercase();
    let mut tags: TagSet = TAG_RULES
        .iter()
        .filter(|(_, regex)| regex.is_match(&lowered))
        .map(|(tag, _)| *tag)
        .collect();

    if tags.contains(&Tag::Inductor) {
        tags.remove(&Tag::Resistor);
    }

    tags
}

/// Join the descriptive fields of a record the way tagging expects them
#[must_use]
pub fn tag_text(parts: &[&str]) -> String {
    parts.join(" ")
}
