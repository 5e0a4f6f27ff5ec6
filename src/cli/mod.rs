//! Command-line surface for spotify-downloader.
//!
//! The argument structure is declared with clap's derive macros, then the
//! built command is adjusted at runtime so help output shows the defaults
//! that came from the config file.

use crate::config::{FILE_FORMAT_TAGS, InputExt, Overwrite, Settings};
use crate::logging::LOG_LEVELS;
use crate::paths;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Args, Command, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Single-dash abbreviations longer than one character, and the long flag
/// each one stands for.
pub const ABBREVIATIONS: [(&str, &str); 8] = [
    ("-st", "--savedtracks"),
    ("-nm", "--no-metadata"),
    ("-ff", "--file-format"),
    ("-dm", "--download-only-metadata"),
    ("-mo", "--music-videos-only"),
    ("-ns", "--no-spaces"),
    ("-ll", "--log-level"),
    ("-yk", "--youtube-api-key"),
];

/// Download and convert songs from Spotify, Youtube etc.
#[derive(Parser, Debug)]
#[command(name = "spotify-downloader", version, infer_long_args = true)]
pub struct Cli {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub options: OptionArgs,
}

/// What to download. Exactly one is required.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Download song by spotify link or name
    #[arg(short = 's', long)]
    pub song: Option<String>,

    /// Download songs from a file
    #[arg(short = 'l', long)]
    pub list: Option<String>,

    /// Load songs from playlist URL into <playlist_name>.txt
    #[arg(short = 'p', long)]
    pub playlist: Option<String>,

    /// Load songs from album URL into <album_name>.txt
    #[arg(short = 'b', long)]
    pub album: Option<String>,

    /// Load songs from user's playlist into <playlist_name>.txt
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Load songs from user's saved tracks into saved_tracks.txt
    #[arg(long)]
    pub savedtracks: Option<String>,
}

impl TargetArgs {
    /// The single target that was given, if any.
    pub fn into_selection(self) -> Option<crate::config::SelectionTarget> {
        use crate::config::SelectionTarget;

        self.song
            .map(SelectionTarget::Song)
            .or(self.list.map(SelectionTarget::List))
            .or(self.playlist.map(SelectionTarget::Playlist))
            .or(self.album.map(SelectionTarget::Album))
            .or(self.username.map(SelectionTarget::Username))
            .or(self.savedtracks.map(SelectionTarget::SavedTracks))
    }
}

/// Options that override config file values.
///
/// Flags only switch a setting on; an absent flag leaves the file value.
#[derive(Args, Debug, Default)]
pub struct OptionArgs {
    /// Choose the song to download manually
    #[arg(short = 'm', long)]
    pub manual: bool,

    /// Do not embed metadata in songs
    #[arg(long)]
    pub no_metadata: bool,

    /// Use avconv for conversion otherwise set defaults to ffmpeg
    #[arg(short = 'a', long)]
    pub avconv: bool,

    /// Path to folder where files will be stored in
    #[arg(short = 'f', long, value_name = "PATH")]
    pub folder: Option<PathBuf>,

    /// Change the overwrite policy
    #[arg(long, value_enum)]
    pub overwrite: Option<Overwrite>,

    /// Preferred input format .m4a or .webm (Opus)
    #[arg(short = 'i', long, value_enum)]
    pub input_ext: Option<InputExt>,

    /// Preferred output format .mp3, .m4a (AAC), .flac, etc.
    #[arg(short = 'o', long, value_name = "EXT")]
    pub output_ext: Option<String>,

    /// File name template for downloaded songs; tags are in curly braces
    #[arg(long, value_name = "TEMPLATE")]
    pub file_format: Option<String>,

    /// Download songs for which metadata is found
    #[arg(long)]
    pub download_only_metadata: bool,

    /// Show only track title and YouTube URL
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Search only for music on Youtube
    #[arg(long)]
    pub music_videos_only: bool,

    /// Replace spaces with underscores in file names
    #[arg(long)]
    pub no_spaces: bool,

    /// Set log verbosity
    #[arg(
        long,
        ignore_case = true,
        value_parser = PossibleValuesParser::new(LOG_LEVELS).map(|level| level.to_ascii_uppercase())
    )]
    pub log_level: Option<String>,

    #[arg(long, hide = true)]
    pub youtube_api_key: Option<String>,

    /// Replace with custom config.yml file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl OptionArgs {
    /// Layer these command-line values over `settings`.
    pub fn apply_to(&self, settings: Settings) -> Settings {
        Settings {
            manual: settings.manual || self.manual,
            no_metadata: settings.no_metadata || self.no_metadata,
            avconv: settings.avconv || self.avconv,
            folder: self.folder.clone().unwrap_or(settings.folder),
            overwrite: self.overwrite.unwrap_or(settings.overwrite),
            input_ext: self.input_ext.unwrap_or(settings.input_ext),
            output_ext: self.output_ext.clone().unwrap_or(settings.output_ext),
            download_only_metadata: settings.download_only_metadata || self.download_only_metadata,
            dry_run: settings.dry_run || self.dry_run,
            music_videos_only: settings.music_videos_only || self.music_videos_only,
            no_spaces: settings.no_spaces || self.no_spaces,
            file_format: self.file_format.clone().unwrap_or(settings.file_format),
            youtube_api_key: self.youtube_api_key.clone().or(settings.youtube_api_key),
            log_level: self.log_level.clone().unwrap_or(settings.log_level),
        }
    }
}

/// Build the command with help text showing the defaults from `settings`.
pub fn command(settings: &Settings, cwd: &Path) -> Command {
    let folder = paths::relative_to(&settings.folder, cwd);
    let defaults = [
        ("manual", settings.manual.to_string()),
        ("no_metadata", settings.no_metadata.to_string()),
        ("avconv", settings.avconv.to_string()),
        ("folder", folder.display().to_string()),
        ("overwrite", settings.overwrite.to_string()),
        ("input_ext", settings.input_ext.to_string()),
        ("output_ext", settings.output_ext.clone()),
        ("file_format", settings.file_format.clone()),
        (
            "download_only_metadata",
            settings.download_only_metadata.to_string(),
        ),
        ("dry_run", settings.dry_run.to_string()),
        ("music_videos_only", settings.music_videos_only.to_string()),
        ("no_spaces", settings.no_spaces.to_string()),
        ("log_level", settings.log_level.clone()),
    ];

    let command = Cli::command().mut_arg("file_format", |arg| {
        let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
        arg.help(format!(
            "{help}. Possible formats: {}",
            FILE_FORMAT_TAGS.join(", ")
        ))
    });

    let command = ABBREVIATIONS.iter().fold(command, |command, (abbrev, long)| {
        let id = long.trim_start_matches("--").replace('-', "_");
        command.mut_arg(id, |arg| {
            if arg.is_hide_set() {
                return arg;
            }
            let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
            arg.help(format!("{help} (short: {abbrev})"))
        })
    });

    defaults
        .into_iter()
        .fold(command, |command, (id, value)| {
            command.mut_arg(id, |arg| {
                let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
                arg.help(format!("{help} [default: {value}]"))
            })
        })
}

/// Rewrite multi-character single-dash abbreviations to their long flags.
///
/// The program name, values of value-taking options, and everything after
/// `--` are passed through unchanged.
pub fn expand_abbreviations<I, T>(command: &Command, args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut expanded = Vec::new();
    let mut pending_value = false;
    let mut passthrough = false;

    for (index, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if index == 0 || passthrough || pending_value {
            pending_value = false;
            expanded.push(arg);
            continue;
        }

        let Some(token) = arg.to_str() else {
            expanded.push(arg);
            continue;
        };
        if token == "--" {
            passthrough = true;
            expanded.push(arg);
            continue;
        }

        let (flag, inline_value) = match token.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (token, None),
        };
        let long = ABBREVIATIONS
            .iter()
            .find(|(abbrev, _)| *abbrev == flag)
            .map(|(_, long)| *long);

        pending_value = inline_value.is_none() && takes_value(command, long.unwrap_or(flag));
        match (long, inline_value) {
            (Some(long), Some(value)) => expanded.push(format!("{long}={value}").into()),
            (Some(long), None) => expanded.push(long.into()),
            (None, _) => expanded.push(arg),
        }
    }

    expanded
}

/// Whether `flag` names an option that consumes the next argument.
///
/// Long flags may be unambiguous prefixes, matching `infer_long_args`.
fn takes_value(command: &Command, flag: &str) -> bool {
    if let Some(name) = flag.strip_prefix("--") {
        if name.is_empty() {
            return false;
        }
        let mut matches = command
            .get_arguments()
            .filter(|arg| arg.get_long().is_some_and(|long| long.starts_with(name)));
        let exact = command
            .get_arguments()
            .find(|arg| arg.get_long() == Some(name));
        let arg = match exact {
            Some(arg) => Some(arg),
            None => match (matches.next(), matches.next()) {
                (Some(arg), None) => Some(arg),
                _ => None,
            },
        };
        return arg.is_some_and(|arg| arg.get_action().takes_values());
    }

    let mut chars = flag.strip_prefix('-').unwrap_or_default().chars();
    match (chars.next(), chars.next()) {
        (Some(short), None) => command
            .get_arguments()
            .find(|arg| arg.get_short() == Some(short))
            .is_some_and(|arg| arg.get_action().takes_values()),
        _ => false,
    }
}

/// Parse `args` against a command whose help reflects `settings`.
pub fn parse<I, T>(args: I, settings: &Settings, cwd: &Path) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = command(settings, cwd);
    let args = expand_abbreviations(&command, args);
    let matches = command.try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}
