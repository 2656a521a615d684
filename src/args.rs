use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

pub const DEFAULT_COUNT: usize = 10;

pub fn command_builder() -> Command {
    command!()
        .max_term_width(100)
        .disable_version_flag(true)
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Print debug output")
                .long_help("Print debug output to stderr, including every line read from the mirror index page and every Contents header skipped")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List supported architectures and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("arch")
                .short('a')
                .long("arch")
                .value_name("ARCH")
                .help("Architecture whose packages list you want to analyze")
                .long_help("Architecture whose packages list you want to analyze, must be one of the entries printed by --list")
                .num_args(1),
        )
        .arg(
            Arg::new("count")
                .short('c')
                .long("count")
                .value_name("COUNT")
                .help("The number of packages you would like to list")
                .value_parser(parse_count)
                .default_value("10"),
        )
        .arg(
            Arg::new("mirror")
                .short('m')
                .long("mirror")
                .value_name("URL")
                .help("Repository component URL to read Contents files from")
                .num_args(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Read configuration from PATH instead of /etc/pkgstat.toml")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
}

/// Accept plain decimal digits only, `+5` and `-1` are rejected
pub fn parse_count(s: &str) -> Result<usize, String> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("count is not numerical: {s}"));
    }

    s.parse::<usize>().map_err(|e| format!("{s}: {e}"))
}

#[derive(Debug)]
pub struct CliArgs {
    pub debug: bool,
    pub list: bool,
    pub arch: Option<String>,
    pub count: usize,
    pub mirror: Option<String>,
    pub config: Option<PathBuf>,
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            debug: matches.get_flag("debug"),
            list: matches.get_flag("list"),
            arch: matches.get_one::<String>("arch").cloned(),
            count: matches
                .get_one::<usize>("count")
                .copied()
                .unwrap_or(DEFAULT_COUNT),
            mirror: matches.get_one::<String>("mirror").cloned(),
            config: matches.get_one::<PathBuf>("config").cloned(),
        }
    }
}
