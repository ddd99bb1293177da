//! The library code for the `xth-poster` site tools. There are two
//! independent one-shot tools, both exposed through [`crate::build`]:
//!
//! 1. The poster generator ([`crate::generate`]) copies a poster template,
//!    substitutes a quote, an author and a sequence label, and writes the
//!    result as a new page. The quote's first character becomes a drop cap.
//! 2. The list builder ([`crate::listing`]) scans a directory for pages that
//!    carry the poster marker, extracts a [`crate::record::PosterRecord`]
//!    from each, and renders all of them, sorted by number, into one listing
//!    page.
//!
//! Both tools locate poster fields through a [`crate::schema::Schema`]: one
//! CSS selector per named field, configurable through the project file
//! ([`crate::config`]). A missing field is never fatal; only template and
//! output file problems abort a run.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod document;
pub mod generate;
pub mod listing;
pub mod prompt;
pub mod record;
pub mod render;
pub mod schema;
