//! The list builder: scans a directory for poster pages, turns each one into a
//! [`PosterRecord`], and renders all of them, sorted by number, into a single
//! listing page. The listing is regenerated from scratch on every run.

use crate::config::Config;
use crate::document::{has_html_extension, PosterDocument};
use crate::record::{parse_record, PosterRecord, Rejection};
use crate::render::{EscapeHref, EscapeHtml};
use crate::schema::Schema;
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The built-in listing page.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/list.html");

/// Parses the listing template at `path`, or the built-in one when `path` is
/// `None`.
pub fn parse_template(path: Option<&Path>) -> Result<Template> {
    let contents = match path {
        None => String::from(DEFAULT_TEMPLATE),
        Some(path) => fs::read_to_string(path).map_err(|err| Error::OpenTemplateFile {
            path: path.to_owned(),
            err,
        })?,
    };
    let mut template = Template::default();
    template
        .parse(contents)
        .map_err(|e| Error::Template(e.to_string()))?;
    Ok(template)
}

/// Scans, extracts, and renders the listing page.
pub struct ListBuilder<'a> {
    /// Supplies the ignore list and the output file name.
    pub config: &'a Config,

    pub schema: &'a Schema,

    /// The listing page template. See [`parse_template`].
    pub template: &'a Template,
}

/// What a [`ListBuilder::build`] run produced.
#[derive(Debug)]
pub struct Listing {
    /// The listing file that was written.
    pub path: PathBuf,

    /// Number of posters in the listing.
    pub count: usize,

    /// Marked pages that were left out.
    pub rejected: Vec<Rejected>,
}

/// A page carrying the poster marker that was left out of the listing.
#[derive(Debug, PartialEq, Eq)]
pub struct Rejected {
    /// The file name, as it would have been linked.
    pub path: String,
    pub reason: Rejection,
}

/// The posters found by [`ListBuilder::scan`].
#[derive(Debug, Default)]
pub struct Scan {
    /// Sorted by number.
    pub records: Vec<PosterRecord>,

    /// In file-name order. Each one has already been logged as a warning.
    pub rejected: Vec<Rejected>,
}

impl ListBuilder<'_> {
    /// Returns a record for every poster directly inside `dir`, sorted by
    /// number. Entries are visited in file-name order, so posters sharing a
    /// number keep that order. Symlinks are followed. Only a directory that
    /// can't be read at all is an error; a bad entry or document is logged and
    /// skipped.
    pub fn scan(&self, dir: &Path) -> Result<Scan> {
        if !dir.is_dir() {
            return Err(Error::ScanDirectory {
                path: dir.to_owned(),
                err: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let mut scan = Scan::default();
        for result in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(Error::ScanDirectory {
                        path: dir.to_owned(),
                        err: err.into(),
                    })
                }
                Err(err) => {
                    log::warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !has_html_extension(entry.path()) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if self.config.is_ignored(&file_name) {
                log::debug!("ignoring `{}`", file_name);
                continue;
            }
            match self.inspect(entry.path(), &file_name) {
                Some(Ok(record)) => scan.records.push(record),
                Some(Err(reason)) => {
                    log::warn!(
                        "`{}` looks like a poster but was left out: {}",
                        entry.path().display(),
                        reason
                    );
                    scan.rejected.push(Rejected {
                        path: file_name.into_owned(),
                        reason,
                    });
                }
                None => {}
            }
        }

        scan.records.sort_by_key(|r| r.number);
        Ok(scan)
    }

    /// Reads one file and extracts its record. Returns `None` when the file
    /// can't be read or doesn't carry the poster marker.
    fn inspect(
        &self,
        path: &Path,
        file_name: &str,
    ) -> Option<std::result::Result<PosterRecord, Rejection>> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("could not read `{}`: {}", path.display(), e);
                return None;
            }
        };

        let doc = PosterDocument::parse(&source);
        if !self.schema.is_poster(doc.html()) {
            log::debug!("`{}` is not marked as a poster", file_name);
            return None;
        }

        Some(parse_record(self.schema, &doc, file_name))
    }

    /// Renders the listing page for `records`, in the order given.
    pub fn render(&self, records: &[PosterRecord]) -> Result<String> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "posters".to_owned(),
            Value::Array(records.iter().map(Value::from).collect()),
        );
        m.insert("count".to_owned(), Value::String(records.len().to_string()));

        let context = Context::from(Value::Object(m)).map_err(|e| Error::Template(e.to_string()))?;
        let mut out: Vec<u8> = Vec::new();
        self.template
            .execute(&mut out, &context)
            .map_err(|e| Error::Template(e.to_string()))?;
        String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
    }

    /// Scans `dir`, renders the listing, and writes it to
    /// `{dir}/{list_output}`. The page is rendered in full before the file is
    /// touched.
    pub fn build(&self, dir: &Path) -> Result<Listing> {
        log::info!("scanning `{}` for posters", dir.display());
        let Scan { records, rejected } = self.scan(dir)?;
        if records.is_empty() {
            log::info!("no marked posters found; the listing will only hold the placeholder item");
        }
        log::info!("found {} poster(s), writing the listing", records.len());

        let page = self.render(&records)?;
        let path = dir.join(&self.config.list_output);
        fs::write(&path, page).map_err(|err| Error::WriteOutput {
            path: path.clone(),
            err,
        })?;
        Ok(Listing {
            path,
            count: records.len(),
            rejected,
        })
    }
}

impl From<&PosterRecord> for Value {
    /// Converts a [`PosterRecord`] into a template object. Every field is
    /// escaped here, since the template inserts values as-is.
    fn from(record: &PosterRecord) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "path".to_owned(),
            Value::String(EscapeHref(&record.path).to_string()),
        );
        m.insert("number".to_owned(), Value::String(record.number.to_string()));
        m.insert(
            "number_text".to_owned(),
            Value::String(EscapeHtml(&record.number_text).to_string()),
        );
        m.insert(
            "title".to_owned(),
            Value::String(EscapeHtml(&record.title).to_string()),
        );
        m.insert(
            "topic".to_owned(),
            Value::String(EscapeHtml(&record.topic).to_string()),
        );
        Value::Object(m)
    }
}

/// The result of a fallible listing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal list-builder errors.
#[derive(Debug)]
pub enum Error {
    /// Returned when the directory to scan can't be read.
    ScanDirectory { path: PathBuf, err: io::Error },

    /// Returned when a custom listing template can't be read.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing or executing the listing template.
    Template(String),

    /// Returned when the listing file can't be written.
    WriteOutput { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ScanDirectory { path, err } => {
                write!(f, "Scanning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening listing template '{}': {}", path.display(), err)
            }
            Error::Template(err) => write!(f, "Listing template: {}", err),
            Error::WriteOutput { path, err } => {
                write!(f, "Writing listing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ScanDirectory { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::Template(_) => None,
            Error::WriteOutput { path: _, err } => Some(err),
        }
    }
}
