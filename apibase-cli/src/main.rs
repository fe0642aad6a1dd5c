use anyhow::{Error, Result};
use apibase::{DotenvSource, EnvSource, Resolution, Settings, SettingsBuilder};
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use log::{debug, error};
use serde::Serialize;
use std::str::FromStr;
use strum::VariantNames;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0:}")]
    InvalidArgsError(String),
}

#[derive(
    strum::AsRefStr, Clone, Copy, Debug, Default, strum::EnumString, PartialEq, Eq, strum::VariantNames,
)]
enum OutputFormat {
    #[strum(serialize = "plain")]
    #[default]
    Plain,
    #[strum(serialize = "json")]
    Json,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    api_base_url: &'a str,
    url: String,
    resolution: &'a Resolution,
}

fn main() {
    let cmd = cmd();
    let matches = cmd.get_matches();
    let res = init_logger_from_matches(&matches);
    if let Err(e) = res {
        eprintln!("Error creating logger: {e}");
        std::process::exit(126);
    }

    let status = match make_settings(&matches) {
        Ok(settings) => match run(&matches, &settings) {
            Ok(output) => {
                println!("{output}");
                0
            }
            Err(e) => {
                print_err(&e);
                1
            }
        },
        Err(e) => {
            print_err(&e);
            127
        }
    };
    std::process::exit(status);
}

const MAX_TERM_WIDTH: usize = 100;

fn cmd() -> Command {
    Command::new("apibase")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Dave Rolsky <autarch@urth.org>")
        .about("Prints backend API URLs built from the configured base URL")
        .arg(Arg::new("path").help(concat!(
            "The API path to build a URL for, like /users or users/42. Defaults to /. A",
            " leading slash is added if it is missing.",
        )))
        .arg(Arg::new("api-base-url").long("api-base-url").short('u').help(concat!(
            "The base URL to use. This takes precedence over the environment and any",
            " --env-file. If this is empty or not given, the VITE_API_BASE_URL setting is",
            " used, falling back to http://127.0.0.1:9000.",
        )))
        .arg(
            Arg::new("env-file")
                .long("env-file")
                .short('e')
                .action(ArgAction::Append)
                .help(concat!(
                    "A .env file to read settings from. The process environment is always",
                    " checked first. This can be passed more than once, in which case the",
                    " files are checked in the order given.",
                )),
        )
        .arg(Arg::new("var-name").long("var-name").help(concat!(
            "The name of the setting that holds the base URL. Defaults to",
            " VITE_API_BASE_URL.",
        )))
        .arg(
            Arg::new("base")
                .long("base")
                .short('b')
                .action(ArgAction::SetTrue)
                .help("Print only the resolved base URL. You cannot pass a path with this."),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .value_parser(clap::builder::PossibleValuesParser::new(
                    OutputFormat::VARIANTS,
                ))
                .help("The output format. Defaults to plain."),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .short('c')
                .action(ArgAction::SetTrue)
                .help("Exit with an error if the resulting URL cannot be parsed."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output."),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debugging output."),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppresses most output."),
        )
        .group(ArgGroup::new("log-level").args(["verbose", "debug", "quiet"]))
        .max_term_width(MAX_TERM_WIDTH)
}

pub(crate) fn init_logger_from_matches(matches: &ArgMatches) -> Result<(), log::SetLoggerError> {
    let level = if matches.get_flag("debug") {
        log::LevelFilter::Debug
    } else if matches.get_flag("verbose") {
        log::LevelFilter::Info
    } else if matches.get_flag("quiet") {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };

    apibase::init_logger(level)
}

fn make_settings(matches: &ArgMatches) -> Result<Settings> {
    validate_args(matches)?;

    let mut builder = SettingsBuilder::new().source(EnvSource);
    if let Some(url) = matches.get_one::<String>("api-base-url") {
        builder = builder.api_base_url(url);
    }
    if let Some(name) = matches.get_one::<String>("var-name") {
        builder = builder.var_name(name);
    }
    if let Some(files) = matches.get_many::<String>("env-file") {
        for f in files {
            builder = builder.source(DotenvSource::from_path(f)?);
        }
    }

    let settings = builder.build();
    debug!(
        "Resolved the API base URL to `{}` ({:?})",
        settings.api_base_url(),
        settings.resolution(),
    );
    Ok(settings)
}

fn validate_args(matches: &ArgMatches) -> Result<()> {
    if matches.get_flag("base") && matches.contains_id("path") {
        return Err(CliError::InvalidArgsError(
            "You cannot combine the --base option with a path".to_string(),
        )
        .into());
    }

    if let Some(name) = matches.get_one::<String>("var-name") {
        if name.is_empty() {
            return Err(
                CliError::InvalidArgsError("The --var-name cannot be empty".to_string()).into(),
            );
        }
    }

    Ok(())
}

fn run(matches: &ArgMatches, settings: &Settings) -> Result<String> {
    let format = match matches.get_one::<String>("format") {
        Some(f) => OutputFormat::from_str(f)?,
        None => OutputFormat::default(),
    };
    let path = matches.get_one::<String>("path");

    let url = if matches.get_flag("base") {
        settings.api_base_url().to_string()
    } else {
        settings.api_url(path)
    };

    if matches.get_flag("check") {
        if matches.get_flag("base") {
            settings.parse_api_base_url()?;
        } else {
            settings.parse_api_url(path)?;
        }
    }

    Ok(match format {
        OutputFormat::Plain => url,
        OutputFormat::Json => serde_json::to_string_pretty(&JsonOutput {
            api_base_url: settings.api_base_url(),
            url,
            resolution: settings.resolution(),
        })?,
    })
}

fn print_err(e: &Error) {
    error!("{e}");
    if let Some(ce) = e.downcast_ref::<CliError>() {
        match ce {
            CliError::InvalidArgsError(_) => {
                println!();
                cmd().print_help().unwrap();
            }
        }
    }
}
