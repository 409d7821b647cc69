//! Defines the [`Post`] type, the record the index page is rendered from.

use crate::date::{deserialize_date, DateFormat};
use chrono::NaiveDate;
use gtmpl::Value;
use pulldown_cmark::escape::escape_html;
use serde::Deserialize;
use std::collections::HashMap;

/// A single blog entry as supplied by a content collector (see
/// [`crate::parser`]).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// The title of the post.
    pub title: String,

    /// The post's URL, typically relative to the site root (e.g.,
    /// `/posts/hello-world.html`).
    pub url: String,

    /// The date of the post.
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,

    /// The post excerpt as HTML.
    #[serde(default)]
    pub excerpt: String,
}

impl Post {
    /// Converts a [`Post`] into a [`Value::Object`] with fields `title`,
    /// `url`, `date`, and `excerpt`. All but `excerpt` are HTML-escaped, and
    /// `date` is rendered with `date_format`.
    pub fn to_value(&self, date_format: &DateFormat) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(escape(&self.title)));
        m.insert("url".to_owned(), Value::String(escape(&self.url)));
        m.insert(
            "date".to_owned(),
            Value::String(escape(&date_format.format(&self.date))),
        );
        m.insert("excerpt".to_owned(), Value::String(self.excerpt.clone()));
        Value::Object(m)
    }
}

/// HTML-escapes `s`.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    // writing into a `String` can't fail
    let _ = escape_html(&mut out, s);
    out
}
