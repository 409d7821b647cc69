use blogdex::build::build_site;
use blogdex::config::Config;
use blogdex::date::DateFormat;
use blogdex::index::IndexRenderer;
use blogdex::parser::parse_manifest;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use flexi_logger::Logger;
use log::error;
use std::error::Error;
use std::path::Path;
use std::process;

fn main() {
    let matches = App::new("blogdex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders the index page of a static blog")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .takes_value(true)
                .default_value("info")
                .help("Log level or filter spec; RUST_LOG takes precedence"),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Builds the index page for a blogdex project")
                .arg(
                    Arg::with_name("project")
                        .long("project")
                        .short("p")
                        .takes_value(true)
                        .default_value(".")
                        .help("A directory at or below the one holding blogdex.yaml"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .default_value("_site")
                        .help("The output directory"),
                ),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Renders a YAML post manifest to stdout")
                .arg(
                    Arg::with_name("manifest")
                        .long("manifest")
                        .short("m")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("template")
                        .long("template")
                        .short("t")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .help("Index template file; may be repeated"),
                )
                .arg(
                    Arg::with_name("title")
                        .long("title")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("date-format")
                        .long("date-format")
                        .takes_value(true)
                        .default_value(blogdex::date::DEFAULT_DATE_FORMAT),
                ),
        )
        .get_matches();

    let _logger = match Logger::try_with_env_or_str(matches.value_of("log-level").unwrap_or("info"))
        .and_then(|logger| logger.start())
    {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("failed to start logger: {}", e);
            process::exit(1);
        }
    };

    let result = match matches.subcommand() {
        ("build", Some(m)) => build(m),
        ("render", Some(m)) => render(m),
        _ => Ok(()),
    };
    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

fn build(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let project = std::fs::canonicalize(matches.value_of("project").unwrap_or("."))?;
    let output = Path::new(matches.value_of("output").unwrap_or("_site"));
    let config = Config::from_directory(&project, output)?;
    build_site(&config)?;
    Ok(())
}

fn render(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let title = matches.value_of("title").unwrap_or("");
    let date_format: DateFormat = matches
        .value_of("date-format")
        .unwrap_or(blogdex::date::DEFAULT_DATE_FORMAT)
        .parse()?;
    let renderer = match matches.values_of("template") {
        Some(templates) => IndexRenderer::from_template_files(templates, title, date_format)?,
        None => IndexRenderer::new(title, date_format)?,
    };

    let manifest = matches.value_of("manifest").unwrap_or("");
    let posts = parse_manifest(Path::new(manifest))?;
    let stdout = std::io::stdout();
    renderer.write(&posts, stdout.lock())?;
    Ok(())
}
