//! Post-processing applied to every successful model answer.
//!
//! Each step is idempotent, so normalizing an already-normalized record is a no-op.

use docinfer_core::AiMetadata;

const PDF_SUFFIX: &str = ".pdf";

/// Apply keyword and filename normalization in order.
pub fn normalize(mut metadata: AiMetadata) -> AiMetadata {
    metadata.keywords = normalize_keywords(metadata.keywords);
    metadata.suggested_filename = clean_filename(&ensure_pdf_suffix(&metadata.suggested_filename));
    metadata
}

/// `#`-prefix, then lowercase, every keyword.
pub fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|keyword| {
            if keyword.starts_with('#') {
                keyword
            } else {
                format!("#{keyword}")
            }
        })
        .map(|keyword| keyword.to_lowercase())
        .collect()
}

pub fn ensure_pdf_suffix(filename: &str) -> String {
    if filename.ends_with(PDF_SUFFIX) {
        filename.to_string()
    } else {
        format!("{filename}{PDF_SUFFIX}")
    }
}

/// Reduce a proposed filename to `[a-z0-9-.[]()]` ending in `.pdf`.
pub fn clean_filename(filename: &str) -> String {
    let base = filename
        .rsplit('/')
        .next()
        .unwrap_or(filename)
        .rsplit('\\')
        .next()
        .unwrap_or(filename);

    let hyphenated = base.replace([' ', '_'], "-").to_lowercase();
    let collapsed = collapse_hyphens(&hyphenated);

    let filtered: String = collapsed.chars().filter(|c| is_allowed(*c)).collect();
    // Dropping characters can bring hyphens together again.
    let mut cleaned = collapse_hyphens(&filtered);

    if !cleaned.ends_with(PDF_SUFFIX) {
        cleaned = format!("{}{PDF_SUFFIX}", cleaned.trim_end_matches('.'));
    }
    cleaned
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '[' | ']' | '(' | ')')
}

fn collapse_hyphens(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_hyphen = false;
    for c in value.chars() {
        if c == '-' {
            if previous_hyphen {
                continue;
            }
            previous_hyphen = true;
        } else {
            previous_hyphen = false;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_clean(name: &str) -> bool {
        name.ends_with(".pdf") && name.chars().all(is_allowed)
    }

    #[test]
    fn keywords_gain_hash_and_lowercase() {
        let keywords = normalize_keywords(vec![
            "DataScience".to_string(),
            "#Bayesian".to_string(),
            "#ml".to_string(),
        ]);
        assert_eq!(keywords, vec!["#datascience", "#bayesian", "#ml"]);
    }

    #[test]
    fn keyword_normalization_is_idempotent() {
        let once = normalize_keywords(vec!["Deep Learning".to_string(), "#NLP".to_string()]);
        let twice = normalize_keywords(once.clone());
        assert_eq!(once, twice);
        assert!(once.iter().all(|k| k.starts_with('#') && k.to_lowercase() == *k));
    }

    #[test]
    fn filename_strips_directories_and_separators() {
        assert_eq!(
            clean_filename("papers/2013\\Bayesian Data_Analysis--Gelman 2013.pdf"),
            "bayesian-data-analysis-gelman-2013.pdf"
        );
    }

    #[test]
    fn filename_drops_invalid_characters_and_keeps_brackets() {
        assert_eq!(
            clean_filename("Café: Théorie (2nd ed) [draft]!.pdf"),
            "caf-thorie-(2nd-ed)-[draft].pdf"
        );
    }

    #[test]
    fn filename_regains_pdf_suffix() {
        assert_eq!(clean_filename("notes."), "notes.pdf");
        assert_eq!(clean_filename("report.PDF"), "report.pdf");
        assert_eq!(clean_filename("slides.pdf?"), "slides.pdf");
        assert_eq!(clean_filename(""), ".pdf");
    }

    #[test]
    fn ensure_suffix_only_appends_when_missing() {
        assert_eq!(ensure_pdf_suffix("a-b-2020"), "a-b-2020.pdf");
        assert_eq!(ensure_pdf_suffix("a-b-2020.pdf"), "a-b-2020.pdf");
    }

    #[test]
    fn filename_cleaning_is_idempotent() {
        let samples = [
            "a-!-b.pdf",
            "Deep  Learning__Goodfellow 2016",
            "../../etc/passwd",
            "x - y - z.PDF",
            "Über_Statistik—Müller–2019.pdf",
            "...",
            "--a--.pdf",
        ];
        for sample in samples {
            let once = clean_filename(&ensure_pdf_suffix(sample));
            let twice = clean_filename(&ensure_pdf_suffix(&once));
            assert_eq!(once, twice, "not idempotent for {sample:?}");
            assert!(is_clean(&once), "unexpected characters in {once:?}");
        }
    }

    #[test]
    fn normalize_applies_all_steps() {
        let meta = normalize(AiMetadata {
            summary: "Summary.".to_string(),
            keywords: vec!["Bayesian".to_string(), "#Stats".to_string(), "mcmc".to_string()],
            category: "statistics".to_string(),
            suggested_filename: "Bayesian Data Analysis - Gelman - 2013".to_string(),
        });
        assert_eq!(meta.keywords, vec!["#bayesian", "#stats", "#mcmc"]);
        assert_eq!(meta.suggested_filename, "bayesian-data-analysis-gelman-2013.pdf");
        assert_eq!(normalize(meta.clone()), meta);
    }
}
