//! Reading the document information dictionary.
//!
//! Each property is read first through lopdf's structured metadata accessor, then
//! through an ordered table of dictionary key spellings, since producers disagree on
//! both. A property that no strategy can read is simply absent; a single malformed
//! entry never fails the whole document.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use docinfer_core::EmbeddedMetadata;
use lopdf::{Dictionary, Object, PdfMetadata};
use once_cell::sync::Lazy;
use regex::Regex;

static PDF_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:D:)?(\d{4})(\d{2})?(\d{2})?(\d{2})?(\d{2})?(\d{2})?\s*(Z|[+\-]\d{2}'?(?:\d{2}'?)?)?",
    )
    .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldLookup {
    /// Standard key, e.g. `Title`.
    Standard,
    /// Key stored with a literal leading slash, e.g. `/Title`.
    Slashed,
    Lowercase,
    SlashedLowercase,
    Uppercase,
    /// Any key equal ignoring ASCII case and leading slashes.
    CaseInsensitive,
}

const FIELD_LOOKUPS: &[FieldLookup] = &[
    FieldLookup::Standard,
    FieldLookup::Slashed,
    FieldLookup::Lowercase,
    FieldLookup::SlashedLowercase,
    FieldLookup::Uppercase,
    FieldLookup::CaseInsensitive,
];

impl FieldLookup {
    fn find<'a>(self, info: &'a Dictionary, name: &str) -> Option<&'a Object> {
        let key = match self {
            Self::Standard => name.to_string(),
            Self::Slashed => format!("/{name}"),
            Self::Lowercase => name.to_ascii_lowercase(),
            Self::SlashedLowercase => format!("/{}", name.to_ascii_lowercase()),
            Self::Uppercase => name.to_ascii_uppercase(),
            Self::CaseInsensitive => {
                return info.iter().find_map(|(key, value)| {
                    let key = String::from_utf8_lossy(key);
                    key.trim_start_matches('/')
                        .eq_ignore_ascii_case(name)
                        .then_some(value)
                });
            }
        };
        info.get(key.as_bytes()).ok()
    }
}

/// First non-empty text value for `name`, trying every lookup strategy in order.
pub fn lookup_text(info: &Dictionary, name: &str) -> Option<String> {
    FIELD_LOOKUPS
        .iter()
        .filter_map(|lookup| lookup.find(info, name))
        .find_map(object_text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Property {
    Title,
    Author,
    Subject,
    Creator,
    Producer,
    CreationDate,
    ModDate,
}

impl Property {
    fn key(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Subject => "Subject",
            Self::Creator => "Creator",
            Self::Producer => "Producer",
            Self::CreationDate => "CreationDate",
            Self::ModDate => "ModDate",
        }
    }

    fn structured(self, properties: &PdfMetadata) -> Option<&str> {
        let value = match self {
            Self::Title => &properties.title,
            Self::Author => &properties.author,
            Self::Subject => &properties.subject,
            Self::Creator => &properties.creator,
            Self::Producer => &properties.producer,
            Self::CreationDate => &properties.creation_date,
            Self::ModDate => &properties.modification_date,
        };
        value.as_deref()
    }
}

/// The places an embedded property can be read from, in lookup order.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoSources<'a> {
    pub properties: Option<&'a PdfMetadata>,
    pub info: Option<&'a Dictionary>,
}

impl InfoSources<'_> {
    fn text(&self, property: Property) -> Option<String> {
        self.properties
            .and_then(|properties| property.structured(properties))
            .filter(|value| !value.contains(char::REPLACEMENT_CHARACTER))
            .and_then(clean_pdf_metadata_field)
            .or_else(|| self.info.and_then(|info| lookup_text(info, property.key())))
    }
}

/// Read every embedded property; unparseable dates are reported in `warnings`.
pub fn read_embedded(sources: InfoSources<'_>, warnings: &mut Vec<String>) -> EmbeddedMetadata {
    EmbeddedMetadata {
        title: sources.text(Property::Title),
        author: sources.text(Property::Author),
        subject: sources.text(Property::Subject),
        creator: sources.text(Property::Creator),
        producer: sources.text(Property::Producer),
        creation_date: read_date(&sources, Property::CreationDate, "creation", warnings),
        modification_date: read_date(&sources, Property::ModDate, "modification", warnings),
    }
}

fn read_date(
    sources: &InfoSources<'_>,
    property: Property,
    label: &str,
    warnings: &mut Vec<String>,
) -> Option<DateTime<FixedOffset>> {
    let raw = sources.text(property)?;
    let parsed = parse_pdf_date(&raw);
    if parsed.is_none() {
        warnings.push(format!("Could not parse {label} date: '{raw}'"));
    }
    parsed
}

fn object_text(object: &Object) -> Option<String> {
    let raw = match object {
        Object::String(bytes, _) => decode_string_object(object, bytes)?,
        Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Object::Integer(value) => value.to_string(),
        Object::Real(value) => value.to_string(),
        _ => return None,
    };
    clean_pdf_metadata_field(&raw)
}

/// lopdf decodes the byte-order-marked forms and PDFDocEncoding. Producers that write
/// bare UTF-8 get it read as UTF-8.
fn decode_string_object(object: &Object, bytes: &[u8]) -> Option<String> {
    let marked = bytes.starts_with(b"\xFE\xFF") || bytes.starts_with(b"\xEF\xBB\xBF");
    if !marked
        && !bytes.is_ascii()
        && let Ok(text) = std::str::from_utf8(bytes)
    {
        return Some(text.to_string());
    }
    lopdf::decode_text_string(object).ok()
}

fn normalize_inline_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_pdf_metadata_field(raw: &str) -> Option<String> {
    let without_nul = raw.replace(['\0', '\u{feff}'], " ");
    let normalized = normalize_inline_whitespace(&without_nul);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Parse `D:YYYYMMDDHHmmSSOHH'mm'`, where everything after the year is optional.
/// RFC 3339 timestamps written by some producers are accepted too.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date);
    }

    let caps = PDF_DATE_RE.captures(raw)?;
    let part = |index: usize, default: u32| -> Option<u32> {
        match caps.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month = part(2, 1)?;
    let day = part(3, 1)?;
    let hour = part(4, 0)?;
    let minute = part(5, 0)?;
    let second = part(6, 0)?;
    let offset = parse_offset(caps.get(7).map(|m| m.as_str()))?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    offset.from_local_datetime(&naive).single()
}

fn parse_offset(raw: Option<&str>) -> Option<FixedOffset> {
    let raw = match raw {
        None | Some("Z") => return FixedOffset::east_opt(0),
        Some(raw) => raw,
    };
    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4).map_or(Some(0), |m| m.parse().ok())?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
