//! Defines the [`Parser`] and [`Error`] types: the content collector which
//! reads post sources from the file system and produces the [`Post`]
//! sequence the index page is rendered from. Also defines [`parse_manifest`]
//! for posts which were collected by some other tool.

use std::{
    fmt,
    fs::{read_dir, File},
    io::Read,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

use crate::{date, markdown, post::Post};

const MARKDOWN_EXTENSION: &str = "md";
const BUNDLE_INDEX: &str = "index.md";

/// Parses [`Post`] objects from source files.
pub struct Parser {
    /// `posts_url` is the URL prefix for post pages (i.e., the URL for a post
    /// is `{posts_url}{post_id}.html`). Always ends in a slash.
    posts_url: String,
}

impl Parser {
    /// Constructs a new parser. A trailing slash is appended to `posts_url`
    /// if it doesn't already have one.
    pub fn new(posts_url: &str) -> Parser {
        let mut posts_url = posts_url.to_owned();
        if !posts_url.ends_with('/') {
            posts_url.push('/');
        }
        Parser { posts_url }
    }

    /// Searches a provided `source_directory` for post files (extension =
    /// `.md`) and post bundles (directories containing an `index.md`) and
    /// returns a list of [`Post`] objects sorted by date (most recent first).
    /// Posts with the same date are ordered by URL. Each post file must be
    /// structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `Title`, `Date`, and optionally
    ///    `Excerpt`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// Title: Hello, world!
    /// Date: 2021-04-16
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        let annotate = |e: std::io::Error| {
            Error::Annotated(
                format!("reading posts directory `{}`", source_directory.display()),
                Box::new(Error::Io(e)),
            )
        };

        let mut posts = Vec::new();
        for result in read_dir(source_directory).map_err(annotate)? {
            let entry = result.map_err(annotate)?;
            let path = entry.path();
            if entry.file_type().map_err(annotate)?.is_dir() {
                let index = path.join(BUNDLE_INDEX);
                if index.is_file() {
                    posts.push(self.parse_post_file(&index, &path)?);
                }
            } else if path.extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION) {
                posts.push(self.parse_post_file(&path, &path)?);
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.url.cmp(&b.url)));
        Ok(posts)
    }

    /// Reads and parses the post at `source_path`. The post ID is derived
    /// from the file stem of `id_path` (the source file itself, or the bundle
    /// directory for bundles).
    fn parse_post_file(&self, source_path: &Path, id_path: &Path) -> Result<Post> {
        let annotate = |e: Error| {
            Error::Annotated(format!("parsing post `{}`", source_path.display()), Box::new(e))
        };

        let stem = id_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| annotate(Error::InvalidFileName(source_path.to_owned())))?;

        let mut contents = String::new();
        File::open(source_path)
            .and_then(|mut f| f.read_to_string(&mut contents))
            .map_err(|e| annotate(Error::Io(e)))?;

        let post = self.parse_post(&slug::slugify(stem), &contents).map_err(annotate)?;
        debug!("parsed post `{}` from `{}`", post.url, source_path.display());
        Ok(post)
    }

    /// Parses a single [`Post`] from an `id` and `input` strings. The URL is
    /// `{posts_url}{id}.html`.
    pub fn parse_post(&self, id: &str, input: &str) -> Result<Post> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            // the closing fence must start a line
            match input[FENCE.len()..].find("\n---") {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                            // yaml_start
                    FENCE.len() + offset + 1,               // yaml_stop
                    FENCE.len() + offset + 1 + FENCE.len(), // body_start
                )),
            }
        }

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;
        let body = &input[body_start..];

        Ok(Post {
            title: frontmatter.title,
            url: format!("{}{}.html", self.posts_url, id),
            date: date::parse_date(&frontmatter.date)?,
            excerpt: markdown::to_html(match &frontmatter.excerpt {
                Some(excerpt) => excerpt,
                None => markdown::excerpt(body),
            }),
        })
    }
}

/// Parses a YAML manifest: a list of posts with fields `title`, `url`,
/// `date`, and optionally `excerpt` (HTML). The posts are returned in file
/// order.
///
/// ```yaml
/// - title: Hello, world!
///   url: /posts/hello-world.html
///   date: 2021-04-16
///   excerpt: <p>Greetings.</p>
/// ```
pub fn parse_manifest(path: &Path) -> Result<Vec<Post>> {
    let annotate = |e: Error| {
        Error::Annotated(format!("parsing manifest `{}`", path.display()), Box::new(e))
    };
    let file = File::open(path).map_err(|e| annotate(Error::Io(e)))?;
    serde_yaml::from_reader(file).map_err(|e| annotate(Error::DeserializeYaml(e)))
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    /// The title of the post.
    #[serde(rename = "Title")]
    pub title: String,

    /// The date of the post.
    #[serde(rename = "Date")]
    pub date: String,

    /// An explicit excerpt (markdown). If absent, the excerpt is derived from
    /// the body.
    #[serde(default, rename = "Excerpt")]
    pub excerpt: Option<String>,
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter or a manifest
    /// as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the `Date` frontmatter field isn't a recognized date.
    Date(chrono::ParseError),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(PathBuf),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Date(err) => write!(f, "invalid date: {}", err),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Date(err) => Some(err),
            Error::InvalidFileName(_) => None,
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Error {
        Error::Date(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
