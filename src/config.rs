//! Loads the optional `xth-poster.yaml` project file. Every key has a default,
//! and running without any project file reproduces the site's built-in
//! layout: the `chudiemnho.html` template, the `chudiem-list.html` listing and
//! the selectors of the poster template.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const PROJECT_FILE: &str = "xth-poster.yaml";

/// CSS locators for the poster fields. See [`crate::schema::Field`].
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Selectors {
    pub quote: String,
    pub author: String,
    pub number: String,
    pub topic: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Selectors {
            quote: String::from("p#quote"),
            author: String::from("div.mt-8 > p.text-poster-accent"),
            number: String::from("header div.text-right > p.font-sans"),
            // The author line doubles as the poster's topic.
            topic: String::from("div.mt-8 > p.text-poster-accent"),
        }
    }
}

/// The `<meta name=... content=...>` pair a poster uses to identify itself.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Marker {
    pub name: String,
    pub content: String,
}

impl Default for Marker {
    fn default() -> Self {
        Marker {
            name: String::from("xth-poster"),
            content: String::from("true"),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Project {
    template: Option<PathBuf>,
    list_output: Option<String>,
    ignored_files: Option<Vec<String>>,
    list_template: Option<PathBuf>,
    placeholder: Option<String>,
    drop_cap_class: Option<String>,
    selectors: Selectors,
    marker: Marker,
}

pub struct Config {
    /// The poster template the generator copies.
    pub template: PathBuf,

    /// File name of the listing page, written into the scanned directory.
    pub list_output: String,

    /// Site pages the list builder never looks at. The listing output is
    /// always ignored in addition to these.
    pub ignored_files: Vec<String>,

    /// A gtmpl template replacing the built-in listing page.
    pub list_template: Option<PathBuf>,

    /// Quote text used when the generator is given an empty quote.
    pub placeholder: String,

    /// Class attribute of the drop-cap `<span>`.
    pub drop_cap_class: String,

    pub selectors: Selectors,
    pub marker: Marker,
}

impl Config {
    /// Looks for [`PROJECT_FILE`] in `dir` and each of its parents. The first
    /// one found is loaded; when there is none, [`Config::with_root`] supplies
    /// the defaults relative to `dir`.
    pub fn discover(dir: &Path) -> Result<Config> {
        for ancestor in dir.ancestors() {
            let path = ancestor.join(PROJECT_FILE);
            if path.is_file() {
                log::debug!("using project file `{}`", path.display());
                return Config::from_project_file(&path)
                    .map_err(|e| anyhow!("Loading configuration: {:#}", e));
            }
        }
        Ok(Config::with_root(dir))
    }

    /// Loads a specific project file. Relative paths inside it resolve against
    /// the file's own directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(root) => Ok(Config::from_project(project, root)),
        }
    }

    /// The default configuration with relative paths rooted at `root`.
    pub fn with_root(root: &Path) -> Config {
        Config::from_project(Project::default(), root)
    }

    fn from_project(project: Project, root: &Path) -> Config {
        Config {
            template: root.join(
                project
                    .template
                    .unwrap_or_else(|| PathBuf::from("chudiemnho.html")),
            ),
            list_output: project
                .list_output
                .unwrap_or_else(|| String::from("chudiem-list.html")),
            ignored_files: project.ignored_files.unwrap_or_else(|| {
                vec![
                    String::from("tool.html"),
                    String::from("index.html"),
                    String::from("trietgia.html"),
                ]
            }),
            list_template: project.list_template.map(|p| root.join(p)),
            placeholder: project
                .placeholder
                .unwrap_or_else(|| String::from("Chưa có trích dẫn.")),
            drop_cap_class: project.drop_cap_class.unwrap_or_else(|| {
                String::from(
                    "font-sans font-black text-6xl float-left mr-4 mt-[-12px] text-poster-accent leading-none",
                )
            }),
            selectors: project.selectors,
            marker: project.marker,
        }
    }

    /// Reports whether the list builder skips `file_name` before looking
    /// inside it.
    pub fn is_ignored(&self, file_name: &str) -> bool {
        file_name == self.list_output || self.ignored_files.iter().any(|f| f == file_name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_project_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::discover(dir.path())?;
        assert_eq!(dir.path().join("chudiemnho.html"), config.template);
        assert_eq!("chudiem-list.html", config.list_output);
        assert_eq!("Chưa có trích dẫn.", config.placeholder);
        assert_eq!(Selectors::default(), config.selectors);
        assert_eq!(Marker::default(), config.marker);
        assert!(config.list_template.is_none());
        Ok(())
    }

    #[test]
    fn test_project_file_found_in_parent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(PROJECT_FILE),
            "template: layouts/poster.html\nlist_output: all.html\nselectors:\n  quote: 'blockquote'\n",
        )?;
        let nested = dir.path().join("posters");
        fs::create_dir(&nested)?;

        let config = Config::discover(&nested)?;
        assert_eq!(dir.path().join("layouts/poster.html"), config.template);
        assert_eq!("all.html", config.list_output);
        assert_eq!("blockquote", config.selectors.quote);
        // unspecified selectors keep their defaults
        assert_eq!(Selectors::default().number, config.selectors.number);
        Ok(())
    }

    #[test]
    fn test_list_output_is_always_ignored() {
        let mut config = Config::with_root(Path::new("."));
        config.ignored_files = Vec::new();
        assert!(config.is_ignored("chudiem-list.html"));
        assert!(!config.is_ignored("poster_plato.html"));

        let config = Config::with_root(Path::new("."));
        assert!(config.is_ignored("index.html"));
        assert!(config.is_ignored("tool.html"));
        assert!(config.is_ignored("trietgia.html"));
    }

    #[test]
    fn test_malformed_project_file_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "ignored_files: 3\n")?;
        assert!(Config::discover(dir.path()).is_err());
        Ok(())
    }
}
