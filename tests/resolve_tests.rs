//! Integration tests for layered configuration resolution.
//!
//! Each test runs against its own temp directory, which stands in for both the
//! program directory (default folder, implicit `config.yml`) and the working
//! directory.

use spotify_downloader::config::{
    CONFIG_FILE_NAME, ConfigurationSet, DefaultTable, InputExt, Overwrite, Resolver,
    SelectionTarget, load_or_create,
};
use spotify_downloader::error::ErrorKind;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::Level;

/// Helper to create a resolver rooted in a temp directory.
fn setup() -> (TempDir, Resolver) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let resolver = Resolver::new(
        DefaultTable::new(temp.path()),
        Some(temp.path().join(CONFIG_FILE_NAME)),
        temp.path().to_path_buf(),
    );
    (temp, resolver)
}

fn write_config(temp: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, format!("spotify-downloader:\n{body}")).expect("Failed to write config");
    path
}

#[test]
fn no_config_and_no_flags_yields_defaults() {
    let (temp, resolver) = setup();

    let invocation = resolver
        .resolve(["spotify-downloader", "-s", "song name"])
        .expect("resolve failed");

    let expected =
        ConfigurationSet::from_settings(resolver.defaults().settings().clone(), temp.path())
            .unwrap();
    assert_eq!(invocation.config, expected);
    assert_eq!(invocation.config.folder, PathBuf::from("Music"));
    assert_eq!(invocation.config.overwrite, Overwrite::Prompt);
    assert_eq!(invocation.config.input_ext, InputExt::M4a);
    assert_eq!(invocation.config.output_ext, ".mp3");
    assert_eq!(invocation.config.log_level, Level::INFO);
    assert_eq!(invocation.target, SelectionTarget::Song("song name".into()));
}

#[test]
fn file_value_used_without_cli_override() {
    let (temp, resolver) = setup();
    write_config(&temp, CONFIG_FILE_NAME, "  input-ext: .webm\n");

    let invocation = resolver
        .resolve(["spotify-downloader", "-s", "x"])
        .unwrap();

    assert_eq!(invocation.config.input_ext, InputExt::Webm);
}

#[test]
fn cli_value_wins_over_file() {
    let (temp, resolver) = setup();
    write_config(&temp, CONFIG_FILE_NAME, "  input-ext: .webm\n");

    let invocation = resolver
        .resolve(["spotify-downloader", "-s", "x", "-i", ".m4a"])
        .unwrap();

    assert_eq!(invocation.config.input_ext, InputExt::M4a);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let (temp, resolver) = setup();
    write_config(
        &temp,
        CONFIG_FILE_NAME,
        "  no-spaces: true\n  overwrite: skip\n",
    );

    let config = resolver
        .resolve(["spotify-downloader", "-l", "songs.txt"])
        .unwrap()
        .config;

    assert!(config.no_spaces);
    assert_eq!(config.overwrite, Overwrite::Skip);
    assert_eq!(config.output_ext, ".mp3");
    assert_eq!(config.file_format, "{artist} - {track_name}");
}

#[test]
fn boolean_flag_cannot_switch_file_true_off() {
    let (temp, resolver) = setup();
    write_config(&temp, CONFIG_FILE_NAME, "  dry-run: true\n");

    let config = resolver
        .resolve(["spotify-downloader", "-s", "x"])
        .unwrap()
        .config;

    assert!(config.dry_run);
}

#[test]
fn explicit_config_overrides_implicit_file() {
    let (temp, resolver) = setup();
    write_config(
        &temp,
        CONFIG_FILE_NAME,
        "  output-ext: .flac\n  overwrite: force\n",
    );
    let custom = write_config(&temp, "custom.yml", "  output-ext: .ogg\n");

    let config = resolver
        .resolve([
            "spotify-downloader".into(),
            "-s".into(),
            "x".into(),
            "-c".into(),
            custom.into_os_string(),
        ])
        .unwrap()
        .config;

    assert_eq!(config.output_ext, ".ogg");
    // The explicit file merges over the defaults, not over the implicit file
    assert_eq!(config.overwrite, Overwrite::Prompt);
}

#[test]
fn cli_wins_over_explicit_config() {
    let (temp, resolver) = setup();
    write_config(&temp, "custom.yml", "  log-level: error\n  output-ext: .ogg\n");

    let config = resolver
        .resolve([
            "spotify-downloader",
            "-s",
            "x",
            "--config",
            "custom.yml",
            "-o",
            ".m4a",
            "-ll",
            "debug",
        ])
        .unwrap()
        .config;

    assert_eq!(config.output_ext, ".m4a");
    assert_eq!(config.log_level, Level::DEBUG);
}

#[test]
fn missing_explicit_config_is_created() {
    let (temp, resolver) = setup();
    let custom = temp.path().join("profiles").join("custom.yml");

    resolver
        .resolve([
            "spotify-downloader".into(),
            "-s".into(),
            "x".into(),
            "--config".into(),
            custom.clone().into_os_string(),
        ])
        .unwrap();

    assert!(custom.exists());
}

#[test]
fn log_level_casing_does_not_matter() {
    let (_temp, resolver) = setup();

    let lower = resolver
        .resolve(["spotify-downloader", "-s", "x", "--log-level", "debug"])
        .unwrap();
    let upper = resolver
        .resolve(["spotify-downloader", "-s", "x", "--log-level", "DEBUG"])
        .unwrap();

    assert_eq!(lower.config.log_level, Level::DEBUG);
    assert_eq!(lower.config.log_level, upper.config.log_level);
}

#[test]
fn two_targets_are_rejected() {
    let (_temp, resolver) = setup();

    let err = resolver
        .resolve(["spotify-downloader", "-s", "song", "-p", "playlist-url"])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn missing_target_is_rejected() {
    let (_temp, resolver) = setup();

    let err = resolver.resolve(["spotify-downloader", "-d"]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn overwrite_outside_set_is_rejected() {
    let (_temp, resolver) = setup();

    let err = resolver
        .resolve(["spotify-downloader", "-s", "x", "--overwrite", "clobber"])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn invalid_file_value_is_rejected() {
    let (temp, resolver) = setup();
    write_config(&temp, CONFIG_FILE_NAME, "  input-ext: .flac\n");

    let err = resolver
        .resolve(["spotify-downloader", "-s", "x"])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert!(err.to_string().contains("input-ext"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn corrupt_config_is_fatal() {
    let (temp, resolver) = setup();
    fs::write(
        temp.path().join(CONFIG_FILE_NAME),
        "spotify-downloader: {manual: true\n",
    )
    .unwrap();

    let err = resolver
        .resolve(["spotify-downloader", "-s", "x"])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CorruptFile);
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn corrupt_explicit_config_is_fatal() {
    let (temp, resolver) = setup();
    write_config(&temp, CONFIG_FILE_NAME, "  manual: true\n");
    fs::write(temp.path().join("custom.yml"), "spotify-downloader: [unclosed\n").unwrap();

    let err = resolver
        .resolve(["spotify-downloader", "-s", "x", "--config", "custom.yml"])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CorruptFile);
    assert!(err.to_string().contains("custom.yml"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn unreadable_explicit_config_is_io_error() {
    let (temp, resolver) = setup();
    fs::create_dir(temp.path().join("config-dir")).unwrap();

    let err = resolver
        .resolve(["spotify-downloader", "-s", "x", "-c", "config-dir"])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.exit_code(), 1);
    // The implicit file was still bootstrapped in the first pass.
    assert!(temp.path().join(CONFIG_FILE_NAME).exists());
}

#[test]
fn help_is_not_a_failure() {
    let (_temp, resolver) = setup();

    let err = resolver
        .resolve(["spotify-downloader", "--help"])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Usage);
    assert_eq!(err.exit_code(), 0);
}

#[test]
fn abbreviated_flags_resolve() {
    let (_temp, resolver) = setup();

    let invocation = resolver
        .resolve([
            "spotify-downloader",
            "-st",
            "me",
            "-nm",
            "-dm",
            "-mo",
            "-ns",
            "-ff",
            "{track_number} {track_name}",
            "-yk",
            "api-key",
        ])
        .unwrap();

    assert_eq!(invocation.target, SelectionTarget::SavedTracks("me".into()));
    let config = invocation.config;
    assert!(config.no_metadata);
    assert!(config.download_only_metadata);
    assert!(config.music_videos_only);
    assert!(config.no_spaces);
    assert_eq!(config.file_format, "{track_number} {track_name}");
    assert_eq!(config.youtube_api_key.as_deref(), Some("api-key"));
}

#[test]
fn api_key_from_file_is_kept() {
    let (temp, resolver) = setup();
    write_config(&temp, CONFIG_FILE_NAME, "  youtube-api-key: file-key\n");

    let config = resolver
        .resolve(["spotify-downloader", "-s", "x"])
        .unwrap()
        .config;

    assert_eq!(config.youtube_api_key.as_deref(), Some("file-key"));
    assert!(!config.no_spaces);
}

#[test]
fn cli_folder_is_relative_to_cwd() {
    let (temp, resolver) = setup();
    let absolute = temp.path().join("downloads").join("new");

    let config = resolver
        .resolve([
            "spotify-downloader".into(),
            "-s".into(),
            "x".into(),
            "-f".into(),
            absolute.into_os_string(),
        ])
        .unwrap()
        .config;

    assert_eq!(config.folder, PathBuf::from("downloads").join("new"));
}

#[test]
fn load_or_create_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let defaults = DefaultTable::new(temp.path());
    let path = temp.path().join(CONFIG_FILE_NAME);

    let first = load_or_create(&path, &defaults).unwrap();
    let second = load_or_create(&path, &defaults).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, defaults.to_map());
}

#[test]
fn two_resolutions_do_not_interfere() {
    let (temp, resolver) = setup();
    let custom = write_config(&temp, "custom.yml", "  overwrite: force\n");

    let with_custom = resolver
        .resolve([
            "spotify-downloader".into(),
            "-s".into(),
            "x".into(),
            "-c".into(),
            custom.into_os_string(),
        ])
        .unwrap();
    let plain = resolver
        .resolve(["spotify-downloader", "-s", "x"])
        .unwrap();

    assert_eq!(with_custom.config.overwrite, Overwrite::Force);
    assert_eq!(plain.config.overwrite, Overwrite::Prompt);
}
