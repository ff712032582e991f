// tests/cli_parsing.rs

use std::path::PathBuf;

use clap::Parser;

use lovewatch::cli::{CliArgs, Command, LogLevel};

#[test]
fn bundle_with_output() {
    let args = CliArgs::try_parse_from(["lovewatch", "bundle", "-o", "dist/game.love"]).unwrap();
    match args.command {
        Command::Bundle(out) => assert_eq!(out.output, Some(PathBuf::from("dist/game.love"))),
        other => panic!("unexpected command {other:?}"),
    }
    assert!(args.config.is_none());
}

#[test]
fn watch_with_runtime_override_and_global_flags() {
    let args = CliArgs::try_parse_from([
        "lovewatch",
        "watch",
        "--love",
        "/opt/love",
        "--log-level",
        "debug",
        "--config",
        "alt.toml",
    ])
    .unwrap();

    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert_eq!(args.config, Some(PathBuf::from("alt.toml")));
    match args.command {
        Command::Watch(w) => {
            assert_eq!(w.love.as_deref(), Some("/opt/love"));
            assert_eq!(w.output.output, None);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn add_requires_a_name() {
    assert!(CliArgs::try_parse_from(["lovewatch", "add"]).is_err());

    let args = CliArgs::try_parse_from(["lovewatch", "add", "hump"]).unwrap();
    assert!(matches!(args.command, Command::Add { ref name } if name == "hump"));
}

#[test]
fn a_subcommand_is_required() {
    assert!(CliArgs::try_parse_from(["lovewatch"]).is_err());
}
