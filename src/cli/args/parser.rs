//! Module defining the command line argument parser.

use std::path::PathBuf;
use std::time::Duration;

use conv::TryFrom;
use clap::{self, AppSettings, Arg, ArgMatches};
use memer::constants::{DEFAULT_TIMEOUT, DEFAULT_TOKEN_FILE};
use memer::{MemeSpecBuilder, Platform};

use super::{NAME, VERSION};
use super::model::{ArgsError, Options};


impl<'a> TryFrom<ArgMatches<'a>> for Options {
    type Err = ArgsError;

    fn try_from(matches: ArgMatches<'a>) -> Result<Self, Self::Err> {
        let verbose_count = matches.occurrences_of(OPT_VERBOSE) as isize;
        let quiet_count = matches.occurrences_of(OPT_QUIET) as isize;
        let verbosity = verbose_count - quiet_count;

        let meme = {
            let mut builder = MemeSpecBuilder::new()
                .source(matches.value_of(ARG_URL).unwrap_or(""));
            if let Some(mut texts) = matches.values_of(OPT_TEXT) {
                if let (Some(top), Some(bottom)) = (texts.next(), texts.next()) {
                    builder = builder.top_text(top).bottom_text(bottom);
                }
            }
            if let Some(name) = matches.value_of(OPT_OUT) {
                builder = builder.name(name.trim());
            }
            builder.build()?
        };
        let show = !matches.is_present(OPT_NO_SHOW);

        let path = |opt: &str, default: &str| PathBuf::from(matches.value_of(opt).unwrap_or(default));
        let save_dir = path(OPT_SAVE_DIR, DEFAULT_SAVE_DIR);
        let token_file = path(OPT_TOKEN_FILE, DEFAULT_TOKEN_FILE);
        let log_file = path(OPT_LOG_FILE, DEFAULT_LOG_FILE);

        let timeout = match matches.value_of(OPT_TIMEOUT) {
            Some(secs) => Duration::from_secs(secs.trim().parse()?),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Options{verbosity, meme, show, save_dir, token_file, log_file, timeout})
    }
}


// Parser definition

/// Type of the argument parser object
/// (which is called an "App" in clap's silly nomenclature).
pub type Parser<'p> = clap::App<'p, 'p>;


lazy_static! {
    static ref ABOUT: &'static str = option_env!("CARGO_PKG_DESCRIPTION").unwrap_or("");

    static ref URL_HELP: String = format!(concat!(
        "Link to the image to make a meme of.\n\n",
        "This can be a direct link to a PNG or JPEG file, ",
        "or a link to a post with images on one of: {}. ",
        "Links to a particular photo of a post (like .../photo/2) pick that photo, ",
        "otherwise the first one is used."),
        Platform::iter_variants().map(|p| p.name()).collect::<Vec<_>>().join(", "));
}

const ARG_URL: &str = "url";
const OPT_TEXT: &str = "text";
const OPT_NO_SHOW: &str = "no-show";
const OPT_OUT: &str = "out";
const OPT_SAVE_DIR: &str = "save-dir";
const OPT_TOKEN_FILE: &str = "token-file";
const OPT_LOG_FILE: &str = "log-file";
const OPT_TIMEOUT: &str = "timeout";
const OPT_VERBOSE: &str = "verbose";
const OPT_QUIET: &str = "quiet";

const DEFAULT_SAVE_DIR: &str = "imgs";
const DEFAULT_LOG_FILE: &str = "memer.log";


/// Create the parser for application's command line.
pub fn create_parser<'p>() -> Parser<'p> {
    let mut parser = Parser::new(*NAME);
    if let Some(version) = *VERSION {
        parser = parser.version(version);
    }
    parser
        .about(*ABOUT)
        .author(env!("CARGO_PKG_AUTHORS"))

        .setting(AppSettings::StrictUtf8)

        .setting(AppSettings::UnifiedHelpMessage)
        .setting(AppSettings::DontCollapseArgsInUsage)
        .setting(AppSettings::DeriveDisplayOrder)

        // Meme specification.
        .arg(Arg::with_name(ARG_URL)
            .value_name("URL")
            .required(true)
            .help("Link to the image; supports tweet links")
            .long_help(URL_HELP.as_str()))
        .arg(Arg::with_name(OPT_TEXT)
            .long("text").short("t")
            .number_of_values(2)
            .value_names(&["TOP", "BOTTOM"])
            .allow_hyphen_values(true)
            .help("Top and bottom text of the meme")
            .long_help(concat!(
                "Top and bottom text of the meme.\n\n",
                "Use a single space to leave one of them blank. ",
                "By default, the top text is blank and the bottom one is \"wow?\".")))
        .arg(Arg::with_name(OPT_NO_SHOW)
            .long("no-show").short("n")
            .help("Don't show the meme nor copy it to the clipboard"))

        // Output flags.
        .arg(Arg::with_name(OPT_OUT)
            .long("out").short("o")
            .value_name("NAME")
            .help("Name of the output file, without extension")
            .long_help(concat!(
                "Name of the output file, without the .png extension.\n\n",
                "By default, or when empty, the name is derived from the link.")))
        .arg(Arg::with_name(OPT_SAVE_DIR)
            .long("save-dir").short("d")
            .value_name("DIR")
            .help("Directory to save the meme to (created if missing)")
            .default_value(DEFAULT_SAVE_DIR))

        // Environment flags.
        .arg(Arg::with_name(OPT_TOKEN_FILE)
            .long("token-file")
            .value_name("PATH")
            .help("File with the Twitter API bearer token")
            .long_help(concat!(
                "File with the Twitter API bearer token, needed to resolve tweet links.\n\n",
                "The MEMER_TWITTER_TOKEN environment variable takes precedence over it.")))
        .arg(Arg::with_name(OPT_LOG_FILE)
            .long("log-file")
            .value_name("PATH")
            .help("File to append the debug log to")
            .default_value(DEFAULT_LOG_FILE))
        .arg(Arg::with_name(OPT_TIMEOUT)
            .long("timeout")
            .value_name("SECS")
            .help("Timeout of each network request, in seconds"))

        // Verbosity flags.
        .arg(Arg::with_name(OPT_VERBOSE)
            .long("verbose").short("v")
            .multiple(true)
            .conflicts_with(OPT_QUIET)
            .help("Increase logging verbosity"))
        .arg(Arg::with_name(OPT_QUIET)
            .long("quiet").short("q")
            .multiple(true)
            .conflicts_with(OPT_VERBOSE)
            .help("Decrease logging verbosity"))

        .help_short("H")
        .version_short("V")
}
