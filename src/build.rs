//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the index page: collecting the posts
//! ([`crate::parser`]), loading the index template, and rendering the page to
//! disk ([`crate::index`]).

use crate::config::{Config, PostsSource};
use crate::index::{Error as IndexError, IndexRenderer};
use crate::parser::{parse_manifest, Error as ParseError, Parser as PostParser};
use crate::post::Post;
use log::info;
use std::fmt;
use std::path::PathBuf;

/// Builds the index page from a [`Config`] object. This calls into
/// [`PostParser::parse_posts`] (or [`parse_manifest`]) and
/// [`IndexRenderer::render`] which do the heavy-lifting. The page is rendered
/// in full before the output file is touched, so a failing template leaves
/// no partial page behind.
pub fn build_site(config: &Config) -> Result<()> {
    let posts = collect_posts(config)?;
    info!("collected {} posts", posts.len());

    let page = renderer(config)?.render(&posts)?;

    if let Some(dir) = config.output_file.parent() {
        std::fs::create_dir_all(dir).map_err(|err| Error::CreateOutput {
            path: dir.to_owned(),
            err,
        })?;
    }
    std::fs::write(&config.output_file, page).map_err(|err| Error::CreateOutput {
        path: config.output_file.clone(),
        err,
    })?;

    info!("wrote index page `{}`", config.output_file.display());
    Ok(())
}

/// Collects the posts named by [`Config::posts_source`].
pub fn collect_posts(config: &Config) -> Result<Vec<Post>> {
    Ok(match &config.posts_source {
        PostsSource::Directory(dir) => {
            info!("parsing posts from `{}`", dir.display());
            PostParser::new(&config.posts_url).parse_posts(dir)?
        }
        PostsSource::Manifest(path) => {
            info!("reading post manifest `{}`", path.display());
            parse_manifest(path)?
        }
    })
}

fn renderer(config: &Config) -> Result<IndexRenderer> {
    let renderer = if config.index_template.is_empty() {
        IndexRenderer::new(&config.title, config.date_format.clone())?
    } else {
        IndexRenderer::from_template_files(
            config.index_template.iter(),
            &config.title,
            config.date_format.clone(),
        )?
    };
    Ok(renderer)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building the index page. Errors can be during parsing,
/// templating, or creating the output file.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors collecting posts.
    Parse(ParseError),

    /// Returned for errors loading or applying the index template.
    Index(IndexError),

    /// Returned for I/O problems while creating or writing the output
    /// directory or file.
    CreateOutput { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Index(err) => err.fmt(f),
            Error::CreateOutput { path, err } => {
                write!(f, "Creating '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Index(err) => Some(err),
            Error::CreateOutput { path: _, err } => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<IndexError> for Error {
    /// Converts [`IndexError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: IndexError) -> Error {
        Error::Index(err)
    }
}
