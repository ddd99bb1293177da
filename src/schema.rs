//! Defines the [`Field`]s of a poster document and the [`Schema`] that locates
//! them. Every field has exactly one CSS locator; lookups return an `Option`
//! so a missing node is a value the caller decides what to do with, never an
//! error.

use crate::config::{Marker, Selectors};
use scraper::{ElementRef, Html, Selector};
use std::fmt;

/// A named, addressable node of a poster document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// The quote paragraph, including its drop cap.
    Quote,

    /// The author (or source) line under the quote.
    Author,

    /// The poster's sequence label, e.g. `Số 02`.
    Number,

    /// The topic shown for the poster in the listing.
    Topic,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Quote => "quote",
            Field::Author => "author",
            Field::Number => "number",
            Field::Topic => "topic",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compiled locators for every [`Field`] plus the marker predicate.
#[derive(Debug)]
pub struct Schema {
    quote: Selector,
    author: Selector,
    number: Selector,
    topic: Selector,
    marker: Selector,
}

impl Schema {
    /// Compiles the configured selectors. The marker becomes a `meta` selector
    /// matching both its `name` and `content` attributes.
    pub fn new(selectors: &Selectors, marker: &Marker) -> Result<Schema> {
        Ok(Schema {
            quote: compile("quote", &selectors.quote)?,
            author: compile("author", &selectors.author)?,
            number: compile("number", &selectors.number)?,
            topic: compile("topic", &selectors.topic)?,
            marker: compile("marker", &marker_selector(marker))?,
        })
    }

    pub fn locator(&self, field: Field) -> &Selector {
        match field {
            Field::Quote => &self.quote,
            Field::Author => &self.author,
            Field::Number => &self.number,
            Field::Topic => &self.topic,
        }
    }

    /// Returns the first element matching `field`'s locator, if any.
    pub fn locate<'a>(&self, html: &'a Html, field: Field) -> Option<ElementRef<'a>> {
        html.select(self.locator(field)).next()
    }

    /// Reports whether `html` declares itself a poster through the marker
    /// node.
    pub fn is_poster(&self, html: &Html) -> bool {
        html.select(&self.marker).next().is_some()
    }
}

fn marker_selector(marker: &Marker) -> String {
    format!(
        "meta[name=\"{}\"][content=\"{}\"]",
        css_string(&marker.name),
        css_string(&marker.content)
    )
}

fn css_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn compile(field: &'static str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error {
        field,
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returned when a configured selector is not valid CSS.
#[derive(Debug)]
pub struct Error {
    pub field: &'static str,
    pub selector: String,
    pub reason: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "invalid {} selector `{}`: {}",
            self.field, self.selector, self.reason
        )
    }
}

impl std::error::Error for Error {}
