use std::path::Path;
use std::process::{Command, Output};

fn blogdex(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blogdex"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn render_prints_manifest_with_builtin_template() {
    let output = blogdex(&[
        "render",
        "--manifest",
        "./testdata/themed/posts.yaml",
        "--title",
        "Manifest",
    ]);

    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.contains("<h1>Manifest</h1>"));
    assert_eq!(2, html.matches(r#"<article class="post">"#).count());
    assert!(html.contains(r#"<p class="post-date">January 01, 2020</p>"#));
}

#[test]
fn render_accepts_repeated_templates() {
    let output = blogdex(&[
        "render",
        "-m",
        "./testdata/themed/posts.yaml",
        "--template",
        "./testdata/themed/theme/layout.html",
        "--template",
        "./testdata/themed/theme/index.html",
        "--date-format",
        "%Y",
    ]);

    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.contains(r#"<li><a href="/zebra.html">Zebra</a> (2020)</li>"#));
}

#[test]
fn render_rejects_bad_date_format() {
    let output = blogdex(&[
        "render",
        "--manifest",
        "./testdata/themed/posts.yaml",
        "--date-format",
        "%H:%M",
    ]);

    assert_eq!(Some(1), output.status.code());
    assert!(output.stdout.is_empty());
}

#[test]
fn build_writes_index_into_output_directory() {
    let out = tempfile::tempdir().unwrap();
    let output = blogdex(&[
        "build",
        "--project",
        "./testdata/blog",
        "--output",
        out.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(Path::new(&out.path().join("index.html")).is_file());
}
