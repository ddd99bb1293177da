//! The poster generator: copies a template page and substitutes the quote,
//! author and sequence label. See [`Generator::apply`] for the substitution
//! rules and [`Generator::write`] for the all-or-nothing output step.

use crate::document::{has_html_extension, PosterDocument};
use crate::render::EscapeHtml;
use crate::schema::{Field, Schema};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const LINE_BREAK: &str = "<br/>";

/// The values a new poster is made from.
#[derive(Clone, Debug, Default)]
pub struct PosterContent {
    /// The quote, possibly spanning several lines. May contain inline markup.
    pub quote: String,

    pub author: String,

    /// The sequence label, e.g. `Số 02`.
    pub number: String,
}

/// A template page loaded from disk.
pub struct Template {
    path: PathBuf,
    source: String,
}

impl Template {
    /// Reads the template at `path`. A missing or unreadable file is fatal
    /// and is reported before any content is collected.
    pub fn load(path: &Path) -> Result<Template> {
        if !path.is_file() {
            return Err(Error::MissingTemplate(path.to_owned()));
        }
        let source = fs::read_to_string(path).map_err(|err| Error::ReadTemplate {
            path: path.to_owned(),
            err,
        })?;
        Ok(Template {
            path: path.to_owned(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn instantiate(&self) -> PosterDocument {
        PosterDocument::parse(&self.source)
    }
}

/// Applies [`PosterContent`] to template documents.
pub struct Generator<'a> {
    pub schema: &'a Schema,

    /// Quote text used when the supplied quote is blank.
    pub placeholder: &'a str,

    /// Class attribute of the drop-cap `<span>`.
    pub drop_cap_class: &'a str,
}

impl Generator<'_> {
    /// Substitutes `content` into `doc` and returns the fields whose node
    /// could not be found. A missing node is logged and its region is left as
    /// the template had it; the other substitutions still happen.
    pub fn apply(&self, doc: &mut PosterDocument, content: &PosterContent) -> Vec<Field> {
        let mut missing = Vec::new();

        match doc.find(self.schema, Field::Quote) {
            Some(id) => {
                match quote_markup(&content.quote, self.drop_cap_class) {
                    Some(markup) => doc.replace_children(id, &markup),
                    None => doc.replace_text(id, self.placeholder),
                };
            }
            None => {
                log::warn!("template has no quote element; quote left unchanged");
                missing.push(Field::Quote);
            }
        }

        for (field, value) in [
            (Field::Author, &content.author),
            (Field::Number, &content.number),
        ]
        .iter()
        {
            match doc.find(self.schema, *field) {
                Some(id) => {
                    doc.replace_text(id, value);
                }
                None => {
                    log::warn!("template has no {} element; {} left unchanged", field, field);
                    missing.push(*field);
                }
            }
        }

        missing
    }

    /// Renders a new poster from `template` and writes it to `output`. The
    /// page is rendered completely before the output file is created, so a
    /// failure never leaves a partial file behind.
    pub fn write(&self, template: &Template, content: &PosterContent, output: &Path) -> Result<()> {
        let mut doc = template.instantiate();
        self.apply(&mut doc, content);
        let rendered = doc.render();
        fs::write(output, rendered).map_err(|err| Error::WriteOutput {
            path: output.to_owned(),
            err,
        })
    }
}

/// Builds the markup for the quote element, or `None` if `quote` is blank.
/// The first character becomes the drop cap in its own `<span>`; line breaks
/// in the rest become `<br/>`. The rest is left unescaped so inline markup in
/// the quote survives.
pub fn quote_markup(quote: &str, drop_cap_class: &str) -> Option<String> {
    let quote = quote.trim();
    let mut chars = quote.chars();
    let first = chars.next()?;
    let rest = chars.as_str().replace("\r\n", "\n").replace('\n', LINE_BREAK);
    Some(format!(
        "<span class=\"{}\">{}</span>{}",
        EscapeHtml(drop_cap_class),
        EscapeHtml(&first.to_string()),
        rest
    ))
}

/// Appends `.html` to `name` unless it already ends in one of
/// [`crate::document::HTML_EXTENSIONS`]. A blank name is an error.
pub fn normalize_output_name(name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptyOutputName);
    }
    let path = PathBuf::from(name);
    Ok(match has_html_extension(&path) {
        true => path,
        false => PathBuf::from(format!("{}.html", name)),
    })
}

/// The result of a fallible generator operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal generator errors. Nothing is written when one of these is returned.
#[derive(Debug)]
pub enum Error {
    /// Returned when the template file doesn't exist.
    MissingTemplate(PathBuf),

    /// Returned when the template file exists but can't be read.
    ReadTemplate { path: PathBuf, err: io::Error },

    /// Returned when the output file name is blank.
    EmptyOutputName,

    /// Returned when the output file can't be written.
    WriteOutput { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingTemplate(path) => {
                write!(f, "Template file '{}' not found", path.display())
            }
            Error::ReadTemplate { path, err } => {
                write!(f, "Reading template file '{}': {}", path.display(), err)
            }
            Error::EmptyOutputName => write!(f, "Output file name must not be empty"),
            Error::WriteOutput { path, err } => {
                write!(f, "Writing output file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingTemplate(_) => None,
            Error::ReadTemplate { path: _, err } => Some(err),
            Error::EmptyOutputName => None,
            Error::WriteOutput { path: _, err } => Some(err),
        }
    }
}
