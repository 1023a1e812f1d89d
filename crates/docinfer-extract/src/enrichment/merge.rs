//! Filling gaps in embedded properties from an AI answer.

use docinfer_core::{AiMetadata, EmbeddedMetadata};

/// Title and author recovered from a `topic-title-author-year.pdf` style name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenameHints {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
}

/// Split a suggested filename into title, author and year.
///
/// A trailing four-digit part is the year, with the author right before it; without a
/// year the last part is the author. Whatever precedes the author is the title, and no
/// title is taken without an author. Empty parts from stray hyphens still count as parts
/// but never become a value. Multi-part surnames come out as one author part plus extra
/// title words.
pub fn parse_suggested_filename(filename: &str) -> FilenameHints {
    let stem = filename.strip_suffix(".pdf").unwrap_or(filename);
    let parts: Vec<&str> = stem.split('-').collect();

    let mut hints = FilenameHints::default();
    let [.., second_last, last] = parts.as_slice() else {
        return hints;
    };

    let consumed = if is_year(last) {
        hints.year = Some(last.to_string());
        if parts.len() < 3 {
            return hints;
        }
        hints.author = non_empty(second_last);
        2
    } else {
        hints.author = non_empty(last);
        1
    };

    if hints.author.is_some() && parts.len() > 2 {
        let words: Vec<&str> = parts[..parts.len() - consumed]
            .iter()
            .copied()
            .filter(|part| !part.is_empty())
            .collect();
        hints.title = non_empty(&title_case(&words.join(" ")));
    }
    hints
}

fn non_empty(part: &str) -> Option<String> {
    (!part.is_empty()).then(|| part.to_string())
}

/// Keep every present embedded value; fill title, author and subject from `ai` otherwise.
pub fn merge(embedded: &EmbeddedMetadata, ai: &AiMetadata) -> EmbeddedMetadata {
    let hints = parse_suggested_filename(&ai.suggested_filename);
    let category = Some(ai.category.clone()).filter(|c| !c.is_empty());

    EmbeddedMetadata {
        title: embedded.title.clone().or(hints.title),
        author: embedded.author.clone().or(hints.author),
        subject: embedded.subject.clone().or(category),
        ..embedded.clone()
    }
}

fn is_year(part: &str) -> bool {
    part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit())
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
