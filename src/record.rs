//! Defines [`PosterRecord`], the read-only projection of a poster page that
//! the listing is built from, and [`parse_record`], which derives one from a
//! parsed document.

use crate::document::PosterDocument;
use crate::schema::{Field, Schema};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref DIGITS: Regex = Regex::new("[0-9]+").unwrap();
}

/// Number of quote words that make up a poster title.
const TITLE_WORDS: usize = 5;

/// One poster as it appears in the listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PosterRecord {
    /// Link target, relative to the listing page (the file name).
    pub path: String,

    /// The sort key: the first run of digits in `number_text`.
    pub number: u64,

    /// The sequence label exactly as the poster shows it, e.g. `Số 02`.
    pub number_text: String,

    /// See [`title_from_quote`].
    pub title: String,

    pub topic: String,
}

/// Why a document that carries the poster marker was left out of the listing.
#[derive(Debug, PartialEq, Eq)]
pub enum Rejection {
    /// One or more fields had no matching node.
    Missing(Vec<Field>),

    /// The sequence label has no usable digits.
    NoNumber(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::Missing(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
                write!(f, "missing {}", names.join(", "))
            }
            Rejection::NoNumber(text) => write!(f, "no number in label `{}`", text),
        }
    }
}

/// Extracts a [`PosterRecord`] from `doc`. The caller is expected to have
/// classified the document with [`Schema::is_poster`] first; this function
/// only looks at the number, topic and quote fields.
pub fn parse_record(
    schema: &Schema,
    doc: &PosterDocument,
    path: &str,
) -> Result<PosterRecord, Rejection> {
    let number_text = doc.text(schema, Field::Number);
    let topic = doc.text(schema, Field::Topic);
    let quote = doc.text(schema, Field::Quote);

    let (number_text, topic, quote) = match (number_text, topic, quote) {
        (Some(n), Some(t), Some(q)) => (n, t, q),
        (n, t, q) => {
            let mut missing = Vec::new();
            if n.is_none() {
                missing.push(Field::Number);
            }
            if t.is_none() {
                missing.push(Field::Topic);
            }
            if q.is_none() {
                missing.push(Field::Quote);
            }
            return Err(Rejection::Missing(missing));
        }
    };

    let number = match leading_number(&number_text) {
        Some(number) => number,
        None => return Err(Rejection::NoNumber(number_text)),
    };

    Ok(PosterRecord {
        path: path.to_owned(),
        number,
        number_text,
        title: title_from_quote(&quote),
        topic,
    })
}

/// Returns the first run of ASCII digits in `text` as an integer. A run too
/// long for `u64` counts as no number.
pub fn leading_number(text: &str) -> Option<u64> {
    DIGITS.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Builds a listing title from the quote's text: the first character (the
/// drop cap) is dropped, then the first five words are kept and `...` is
/// appended. The suffix is added even when the quote is shorter than five
/// words.
pub fn title_from_quote(quote: &str) -> String {
    let without_drop_cap: String = quote.chars().skip(1).collect();
    let words: Vec<&str> = without_drop_cap
        .split_whitespace()
        .take(TITLE_WORDS)
        .collect();
    format!("{}...", words.join(" "))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Marker, Selectors};

    fn schema() -> Schema {
        Schema::new(&Selectors::default(), &Marker::default()).unwrap()
    }

    fn poster(number: &str, topic: Option<&str>, quote: &str) -> PosterDocument {
        let topic = match topic {
            Some(t) => format!(
                r#"<div class="mt-8"><p class="text-poster-accent">{}</p></div>"#,
                t
            ),
            None => String::new(),
        };
        PosterDocument::parse(&format!(
            r#"<html><head><meta name="xth-poster" content="true"></head><body>
            <header><div class="text-right"><p class="font-sans">{}</p></div></header>
            <p id="quote"><span class="drop">{}</p>
            {}
            </body></html>"#,
            number, quote, topic
        ))
    }

    #[test]
    fn test_parse_record() {
        let doc = poster(
            "Số 12",
            Some("Socrates"),
            r#"T</span>he unexamined life<br/>is not worth living, he said"#,
        );
        let record = parse_record(&schema(), &doc, "poster_socrates.html").unwrap();
        assert_eq!(
            PosterRecord {
                path: "poster_socrates.html".to_owned(),
                number: 12,
                number_text: "Số 12".to_owned(),
                title: "he unexamined life is not...".to_owned(),
                topic: "Socrates".to_owned(),
            },
            record
        );
    }

    #[test]
    fn test_missing_topic_is_rejected() {
        let doc = poster("Số 3", None, "A</span>bc");
        assert_eq!(
            Err(Rejection::Missing(vec![Field::Topic])),
            parse_record(&schema(), &doc, "p.html")
        );
    }

    #[test]
    fn test_label_without_digits_is_rejected() {
        let doc = poster("Số mới", Some("Kant"), "A</span>bc");
        assert_eq!(
            Err(Rejection::NoNumber("Số mới".to_owned())),
            parse_record(&schema(), &doc, "p.html")
        );
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(Some(2), leading_number("Số 02"));
        assert_eq!(Some(10), leading_number("No. 10 of 12"));
        assert_eq!(None, leading_number("none"));
        assert_eq!(None, leading_number("99999999999999999999999"));
    }

    #[test]
    fn test_only_ascii_digits_count() {
        assert_eq!(None, leading_number("Số ٣"));
        assert_eq!(Some(7), leading_number("٣ then 7"));
    }

    #[test]
    fn test_short_quote_title_still_gets_ellipsis() {
        assert_eq!("i...", title_from_quote("Hi"));
        assert_eq!("...", title_from_quote("H"));
        assert_eq!("...", title_from_quote(""));
    }

    #[test]
    fn test_title_drops_multibyte_drop_cap() {
        assert_eq!(
            "hững điều nhỏ bé làm...",
            title_from_quote("Những điều nhỏ bé làm nên cuộc đời")
        );
    }
}
