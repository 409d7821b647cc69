//! Loads a [`Config`] from a `blogdex.yaml` project file and its optional
//! theme.

use crate::date::DateFormat;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

const PROJECT_FILE: &str = "blogdex.yaml";

fn default_posts() -> PathBuf {
    PathBuf::from("posts")
}

fn default_posts_url() -> String {
    String::from("/posts/")
}

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    title: String,

    #[serde(default = "default_posts")]
    posts: PathBuf,

    #[serde(default = "default_posts_url")]
    posts_url: String,

    #[serde(default)]
    date_format: DateFormat,
}

#[derive(Deserialize)]
struct Theme {
    index_template: Vec<PathBuf>,
}

/// Where the posts come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostsSource {
    /// A directory of markdown post files and post bundles. See
    /// [`crate::parser::Parser::parse_posts`].
    Directory(PathBuf),

    /// A YAML manifest of already-collected posts. See
    /// [`crate::parser::parse_manifest`].
    Manifest(PathBuf),
}

impl PostsSource {
    fn from_path(path: PathBuf) -> PostsSource {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => PostsSource::Manifest(path),
            _ => PostsSource::Directory(path),
        }
    }
}

/// The configuration for building an index page.
#[derive(Clone, Debug)]
pub struct Config {
    /// The site title.
    pub title: String,

    /// The source of the posts.
    pub posts_source: PostsSource,

    /// The URL prefix for post pages, e.g. `/posts/`.
    pub posts_url: String,

    /// The pattern for rendering post dates.
    pub date_format: DateFormat,

    /// The theme's index template files. Empty means the built-in template.
    pub index_template: Vec<PathBuf>,

    /// The file the index page is written to.
    pub output_file: PathBuf,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a `blogdex.yaml`
    /// and loads the first one found.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(Error::NotFound),
            }
        }
    }

    /// Loads the project file at `path`. Relative paths in the project and
    /// theme files are resolved against their containing directories.
    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path)?)
            .map_err(|err| Error::Yaml { path: path.to_owned(), err })?;
        let project_root = path.parent().unwrap_or_else(|| Path::new("."));

        let theme_dir = project_root.join("theme");
        let theme_path = theme_dir.join("theme.yaml");
        let index_template = if theme_path.exists() {
            let theme: Theme = serde_yaml::from_reader(open(&theme_path)?)
                .map_err(|err| Error::Yaml { path: theme_path.clone(), err })?;
            theme
                .index_template
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect()
        } else {
            Vec::new()
        };

        Ok(Config {
            title: project.title,
            posts_source: PostsSource::from_path(project_root.join(project.posts)),
            posts_url: project.posts_url,
            date_format: project.date_format,
            index_template,
            output_file: output_directory.join("index.html"),
        })
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| Error::Open { path: path.to_owned(), err })
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no `blogdex.yaml` exists in the directory or any of its
    /// ancestors.
    NotFound,

    /// Returned when a project or theme file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when a project or theme file isn't valid.
    Yaml { path: PathBuf, err: serde_yaml::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound => write!(
                f,
                "Could not find `{}` in any parent directory",
                PROJECT_FILE
            ),
            Error::Open { path, err } => {
                write!(f, "Opening '{}': {}", path.display(), err)
            }
            Error::Yaml { path, err } => {
                write!(f, "Loading configuration '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound => None,
            Error::Open { path: _, err } => Some(err),
            Error::Yaml { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_directory_walks_up() -> Result<()> {
        let config = Config::from_directory(
            Path::new("./testdata/blog/posts/photo-walk"),
            Path::new("/tmp/out"),
        )?;
        assert_eq!("Field Notes", config.title);
        assert_eq!(
            PostsSource::Directory(PathBuf::from("./testdata/blog/posts")),
            config.posts_source
        );
        assert_eq!("/posts/", config.posts_url);
        assert_eq!(DateFormat::default(), config.date_format);
        assert!(config.index_template.is_empty());
        assert_eq!(PathBuf::from("/tmp/out/index.html"), config.output_file);
        Ok(())
    }

    #[test]
    fn test_from_project_file_with_theme() -> Result<()> {
        let config = Config::from_project_file(
            Path::new("./testdata/themed/blogdex.yaml"),
            Path::new("out"),
        )?;
        assert_eq!("Themed Blog", config.title);
        assert_eq!(
            PostsSource::Manifest(PathBuf::from("./testdata/themed/posts.yaml")),
            config.posts_source
        );
        assert_eq!("%d %b %Y", config.date_format.pattern());
        assert_eq!(
            vec![
                PathBuf::from("./testdata/themed/theme/layout.html"),
                PathBuf::from("./testdata/themed/theme/index.html"),
            ],
            config.index_template
        );
        Ok(())
    }

    #[test]
    fn test_missing_project_file() {
        match Config::from_project_file(Path::new("./testdata/nope.yaml"), Path::new("out")) {
            Err(Error::Open { path, err: _ }) => {
                assert_eq!(PathBuf::from("./testdata/nope.yaml"), path)
            }
            other => panic!("unexpected result: {:?}", other.map(|c| c.title)),
        }
    }

    #[test]
    fn test_bad_date_format_names_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_FILE);
        std::fs::write(&path, "title: T\ndate_format: \"%H:%M\"\n").unwrap();

        match Config::from_project_file(&path, Path::new("out")) {
            Err(err @ Error::Yaml { .. }) => {
                let message = err.to_string();
                assert!(message.contains(PROJECT_FILE), "{}", message);
                assert!(message.contains("invalid date format `%H:%M`"), "{}", message);
            }
            other => panic!("unexpected result: {:?}", other.map(|c| c.title)),
        }
    }
}
