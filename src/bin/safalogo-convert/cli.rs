// command-line interface for safalogo-convert

use std::ffi::OsString;

use clap::crate_version;
use clap_complete::Shell;

pub fn build_cli() -> clap::Command {
    clap::Command::new("safalogo-convert")
        .version(concat!("version ", crate_version!()))
        .about("Convert public/safalogo.svg to a high-resolution public/safalogo.png")
        .disable_version_flag(true)
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('?')
                .long("help")
                .help("Display the help")
                .action(clap::ArgAction::Help),
        )
        .arg(
            clap::Arg::new("version")
                .short('v')
                .long("version")
                .help("Display the version information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("package_manager")
                .long("package-manager")
                .num_args(1)
                .value_name("program")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Run '<program> install <package>...' if the rasterizer is unusable")
                .requires("package")
                .action(clap::ArgAction::Set),
        )
        .arg(
            clap::Arg::new("package")
                .long("package")
                .num_args(1)
                .value_name("name")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .requires("package_manager")
                .help("Package for the package manager to install (repeatable)")
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::Arg::new("thumbnailer")
                .long("thumbnailer")
                .num_args(1)
                .value_name("program")
                .value_parser(clap::value_parser!(OsString))
                .help("Fallback thumbnailer [defaults to the one shipped with the OS]")
                .action(clap::ArgAction::Set),
        )
        .arg(
            clap::Arg::new("no_fallback")
                .long("no-fallback")
                .conflicts_with("thumbnailer")
                .help("Do not run the thumbnailer if the conversion fails")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("completion")
                .long("completion")
                .help("Output shell completion for the given shell")
                .num_args(1)
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(Shell))
                .value_name("shell-name"),
        )
}

#[derive(Debug)]
pub struct Args {
    pub version: bool,
    pub package_manager: Option<String>,
    pub packages: Vec<String>,
    pub thumbnailer: Option<OsString>,
    pub no_fallback: bool,
    pub completion: Option<Shell>,
}

impl Args {
    pub fn parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = build_cli().try_get_matches_from(args)?;

        Ok(Args {
            version: matches.get_flag("version"),
            package_manager: matches.get_one::<String>("package_manager").cloned(),
            packages: matches
                .get_many::<String>("package")
                .map(|v| v.cloned().collect())
                .unwrap_or_default(),
            thumbnailer: matches.get_one::<OsString>("thumbnailer").cloned(),
            no_fallback: matches.get_flag("no_fallback"),
            completion: matches.get_one::<Shell>("completion").copied(),
        })
    }
}
