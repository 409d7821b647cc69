//! The library code for `blogdex`, which renders the index page of a static
//! blog. The work breaks down into two distinct steps:
//!
//! 1. Collecting posts from source files on disk ([`crate::parser`]), or from
//!    a manifest produced by some other tool
//! 2. Rendering the posts into the index page ([`crate::index`])
//!
//! The index renderer takes the posts in the order it's given and applies the
//! index template: one block per post (title linking to the post, date,
//! excerpt, and a "read more" link) followed by a separator, or a fallback
//! message when there are no posts. Ordering is the collector's job; the
//! [`crate::parser::Parser`] sorts posts most recent first.
//!
//! [`crate::build::build_site`] ties the two steps together for a
//! [`crate::config::Config`] loaded from a `blogdex.yaml` project file.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod date;
pub mod index;
pub mod markdown;
pub mod parser;
pub mod post;
