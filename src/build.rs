//! Exports [`create_poster`] and [`update_list`], which stitch together the
//! steps of each tool: compiling the [`Schema`] from the [`Config`], loading
//! templates, and handing off to [`crate::generate`] or [`crate::listing`].

use crate::config::Config;
use crate::generate::{normalize_output_name, Error as GenerateError, Generator, Template};
use crate::listing::{parse_template, Error as ListingError, ListBuilder, Listing};
use crate::prompt::{ask, Prompt};
use crate::schema::{Error as SchemaError, Schema};
use std::fmt;
use std::path::{Path, PathBuf};

/// Creates one poster. The template is loaded before any question is asked,
/// so a missing template fails without prompting. Returns the path of the
/// written file.
pub fn create_poster(
    config: &Config,
    template: Option<&Path>,
    prompt: &mut dyn Prompt,
) -> Result<PathBuf> {
    let schema = Schema::new(&config.selectors, &config.marker)?;
    let template = Template::load(template.unwrap_or(config.template.as_path()))?;
    log::debug!("using template `{}`", template.path().display());

    let answers = ask(prompt)?;
    let output = normalize_output_name(&answers.output)?;

    let generator = Generator {
        schema: &schema,
        placeholder: &config.placeholder,
        drop_cap_class: &config.drop_cap_class,
    };
    generator.write(&template, &answers.content, &output)?;
    Ok(output)
}

/// Rebuilds the listing page for the posters in `dir`.
pub fn update_list(config: &Config, dir: &Path) -> Result<Listing> {
    let schema = Schema::new(&config.selectors, &config.marker)?;
    let template = parse_template(config.list_template.as_deref())?;
    let builder = ListBuilder {
        config,
        schema: &schema,
        template: &template,
    };
    Ok(builder.build(dir)?)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for both tools. Every variant is fatal for the run.
#[derive(Debug)]
pub enum Error {
    /// Returned when a configured selector doesn't compile.
    Schema(SchemaError),

    /// Returned for poster generator failures.
    Generate(GenerateError),

    /// Returned for list builder failures.
    Listing(ListingError),

    /// Returned when reading the interactive answers fails.
    Prompt(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Schema(err) => err.fmt(f),
            Error::Generate(err) => err.fmt(f),
            Error::Listing(err) => err.fmt(f),
            Error::Prompt(err) => write!(f, "Reading input: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Schema(err) => Some(err),
            Error::Generate(err) => Some(err),
            Error::Listing(err) => Some(err),
            Error::Prompt(err) => Some(err),
        }
    }
}

impl From<SchemaError> for Error {
    /// Converts [`SchemaError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: SchemaError) -> Error {
        Error::Schema(err)
    }
}

impl From<GenerateError> for Error {
    /// Converts [`GenerateError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: GenerateError) -> Error {
        Error::Generate(err)
    }
}

impl From<ListingError> for Error {
    /// Converts [`ListingError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ListingError) -> Error {
        Error::Listing(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s from prompting into [`Error`].
    fn from(err: std::io::Error) -> Error {
        Error::Prompt(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::PosterDocument;
    use crate::prompt::Lines;
    use crate::schema::Field;
    use std::fs;

    #[test]
    fn test_missing_template_fails_before_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_root(dir.path());
        let mut asked = Vec::new();
        let result = create_poster(
            &config,
            None,
            &mut Lines::new("Quote\n\nPlato\nSố 1\nout\n".as_bytes(), &mut asked),
        );
        assert!(matches!(
            result,
            Err(Error::Generate(GenerateError::MissingTemplate(_)))
        ));
        assert!(asked.is_empty());
    }

    #[test]
    fn test_created_poster_is_listed() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_root(dir.path());
        let output = dir.path().join("poster_plato");
        let input = format!(
            "Know thyself\n\nPlato\nSố 02\n{}\n",
            output.display()
        );
        let written = create_poster(
            &config,
            Some(Path::new("./testdata/chudiemnho.html")),
            &mut Lines::new(input.as_bytes(), Vec::new()),
        )
        .unwrap();
        assert_eq!(dir.path().join("poster_plato.html"), written);

        let schema = Schema::new(&config.selectors, &config.marker).unwrap();
        let doc = PosterDocument::parse(&fs::read_to_string(&written).unwrap());
        assert_eq!(Some("Số 02".to_owned()), doc.text(&schema, Field::Number));

        let listing = update_list(&config, dir.path()).unwrap();
        assert_eq!(1, listing.count);
        let page = fs::read_to_string(dir.path().join("chudiem-list.html")).unwrap();
        assert!(page.contains(r#"href="poster_plato.html""#));
        assert!(page.contains(">now thyself...</h3>"));
        assert!(page.contains(">Plato</p>"));
    }

    #[test]
    fn test_empty_output_name_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_root(dir.path());
        let result = create_poster(
            &config,
            Some(Path::new("./testdata/chudiemnho.html")),
            &mut Lines::new("Quote\n\nPlato\nSố 1\n\n".as_bytes(), Vec::new()),
        );
        assert!(matches!(
            result,
            Err(Error::Generate(GenerateError::EmptyOutputName))
        ));
        assert_eq!(0, fs::read_dir(dir.path()).unwrap().count());
    }
}
