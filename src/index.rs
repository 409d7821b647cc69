//! Renders the blog index page. See [`IndexRenderer`].

use crate::date::DateFormat;
use crate::post::{escape, Post};
use gtmpl::{Context, Template, Value};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// The template used when a theme doesn't provide one.
pub const DEFAULT_TEMPLATE: &str = include_str!("../theme/index.html");

/// Applies an index template to a sequence of [`Post`]s.
///
/// The template sees an object with these fields:
///
/// * `title`: the site title.
/// * `empty`: `true` if there are no posts.
/// * `posts`: the posts in the order they were supplied, each converted with
///   [`Post::to_value`].
///
/// The built-in template ([`DEFAULT_TEMPLATE`]) renders one `<article>` per
/// post, each followed by an `<hr />`, or a "No blog posts yet." message when
/// there are no posts.
pub struct IndexRenderer {
    template: Template,
    title: String,
    date_format: DateFormat,
}

impl IndexRenderer {
    /// Creates a renderer for the built-in template.
    pub fn new(title: &str, date_format: DateFormat) -> Result<IndexRenderer> {
        Self::from_template_str(DEFAULT_TEMPLATE, title, date_format)
    }

    /// Creates a renderer from template source text.
    pub fn from_template_str(
        source: &str,
        title: &str,
        date_format: DateFormat,
    ) -> Result<IndexRenderer> {
        let mut template = Template::default();
        template.parse(source).map_err(Error::ParseTemplate)?;
        Ok(IndexRenderer {
            template,
            title: title.to_owned(),
            date_format,
        })
    }

    /// Loads the template files, concatenates their contents (separated by a
    /// space), and parses the result into a template. This lets a theme split
    /// its layout and `{{ define }}` blocks across files.
    pub fn from_template_files<P: AsRef<Path>>(
        template_files: impl Iterator<Item = P>,
        title: &str,
        date_format: DateFormat,
    ) -> Result<IndexRenderer> {
        let mut contents = String::new();
        for template_file in template_files {
            use std::io::Read;
            let template_file = template_file.as_ref();
            debug!("loading index template `{}`", template_file.display());
            File::open(template_file)
                .map_err(|e| Error::OpenTemplateFile {
                    path: template_file.to_owned(),
                    err: e,
                })?
                .read_to_string(&mut contents)?;
            contents.push(' ');
        }
        Self::from_template_str(&contents, title, date_format)
    }

    /// Renders `posts` into a document string.
    pub fn render(&self, posts: &[Post]) -> Result<String> {
        let mut out: Vec<u8> = Vec::new();
        self.write(posts, &mut out)?;
        String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
    }

    /// Renders `posts` and writes the result to `w`.
    pub fn write<W: io::Write>(&self, posts: &[Post], mut w: W) -> Result<()> {
        let context = Context::from(self.to_value(posts)).map_err(Error::Template)?;
        self.template.execute(&mut w, &context)?;
        Ok(())
    }

    fn to_value(&self, posts: &[Post]) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(escape(&self.title)));
        m.insert("empty".to_owned(), Value::Bool(posts.is_empty()));
        m.insert(
            "posts".to_owned(),
            Value::Array(
                posts
                    .iter()
                    .map(|p| p.to_value(&self.date_format))
                    .collect(),
            ),
        );
        Value::Object(m)
    }
}

/// The result of a fallible index-rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or applying an index template.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors executing the template.
    Template(String),

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => write!(f, "Parsing template: {}", err),
            Error::Template(err) => write!(f, "Rendering template: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn post(title: &str, url: &str, day: u32, excerpt: &str) -> Post {
        Post {
            title: title.to_owned(),
            url: url.to_owned(),
            date: NaiveDate::from_ymd_opt(2021, 4, day).unwrap(),
            excerpt: excerpt.to_owned(),
        }
    }

    fn renderer() -> IndexRenderer {
        IndexRenderer::new("My Blog", DateFormat::default()).unwrap()
    }

    #[test]
    fn test_empty_renders_fallback() -> Result<()> {
        let out = renderer().render(&[])?;
        assert!(out.contains("No blog posts yet"));
        assert!(!out.contains("<article"));
        assert!(!out.contains("<hr />"));
        assert!(out.contains("<title>My Blog</title>"));
        Ok(())
    }

    #[test]
    fn test_posts_render_in_supplied_order() -> Result<()> {
        // deliberately not sorted by date
        let posts = vec![
            post("Older", "/posts/older.html", 1, "<p>old</p>"),
            post("Newest", "/posts/newest.html", 20, "<p>new</p>"),
            post("Middle", "/posts/middle.html", 10, "<p>mid</p>"),
        ];
        let out = renderer().render(&posts)?;

        assert!(!out.contains("No blog posts yet"));
        assert_eq!(3, out.matches(r#"<article class="post">"#).count());
        assert_eq!(3, out.matches("<hr />").count());

        let positions: Vec<usize> = ["Older", "Newest", "Middle"]
            .iter()
            .map(|t| out.find(&format!(">{}</a>", t)).unwrap())
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2]);
        Ok(())
    }

    #[test]
    fn test_block_contents() -> Result<()> {
        let posts = vec![post(
            "Hello, world!",
            "/posts/hello-world.html",
            6,
            "<p>Greetings.</p>",
        )];
        let out = renderer().render(&posts)?;

        assert!(out.contains(
            r#"<a href="/posts/hello-world.html">Hello, world!</a>"#
        ));
        assert!(out.contains(r#"<p class="post-date">April 06, 2021</p>"#));
        assert!(out.contains(r#"<div class="post-excerpt"><p>Greetings.</p></div>"#));
        assert!(out.contains(
            r#"<a class="read-more" href="/posts/hello-world.html">Read more</a>"#
        ));
        Ok(())
    }

    #[test]
    fn test_link_targets_match_urls() -> Result<()> {
        let posts = vec![
            post("A", "a.html", 1, ""),
            post("B", "/deep/path/b.html", 2, ""),
        ];
        let out = renderer().render(&posts)?;
        assert_eq!(2, out.matches(r#"href="a.html""#).count());
        assert_eq!(2, out.matches(r#"href="/deep/path/b.html""#).count());
        Ok(())
    }

    #[test]
    fn test_custom_date_format() -> Result<()> {
        let renderer =
            IndexRenderer::new("", DateFormat::new("%Y-%m-%d").unwrap())?;
        let out = renderer.render(&[post("A", "a.html", 16, "")])?;
        assert!(out.contains("2021-04-16"));
        Ok(())
    }

    #[test]
    fn test_custom_template() -> Result<()> {
        let renderer = IndexRenderer::from_template_str(
            "{{ if .empty }}none{{ else }}{{ range .posts }}[{{ .title }}]{{ end }}{{ end }}",
            "",
            DateFormat::default(),
        )?;
        assert_eq!("none", renderer.render(&[])?);
        assert_eq!(
            "[A][B]",
            renderer.render(&[post("A", "a", 1, ""), post("B", "b", 2, "")])?
        );
        Ok(())
    }

    #[test]
    fn test_template_files() -> Result<()> {
        let renderer = IndexRenderer::from_template_files(
            [
                "./testdata/themed/theme/layout.html",
                "./testdata/themed/theme/index.html",
            ]
            .iter(),
            "Themed",
            DateFormat::default(),
        )?;
        let out = renderer.render(&[])?;
        assert!(out.contains("Nothing here yet"));
        Ok(())
    }

    #[test]
    fn test_missing_template_file() {
        let result = IndexRenderer::from_template_files(
            ["./testdata/does-not-exist.html"].iter(),
            "",
            DateFormat::default(),
        );
        match result {
            Err(Error::OpenTemplateFile { path, err: _ }) => {
                assert_eq!(PathBuf::from("./testdata/does-not-exist.html"), path)
            }
            _ => panic!("expected an OpenTemplateFile error"),
        }
    }
}
