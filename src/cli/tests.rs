//! Unit tests for CLI commands

use crate::cli::{Cli, Commands, ContainerArg};
use crate::markup::ContainerKind;
use clap::Parser;

#[test]
fn test_tokens_command_parses() {
    let cli = Cli::try_parse_from(["weft-markup", "tokens", "page.html"]).unwrap();

    match cli.command {
        Commands::Tokens { file } => {
            assert_eq!(file.to_string_lossy(), "page.html");
        }
        _ => panic!("Expected Tokens command"),
    }
}

#[test]
fn test_chain_command_defaults() {
    let cli = Cli::try_parse_from(["weft-markup", "chain", "page.html"]).unwrap();

    match cli.command {
        Commands::Chain {
            file,
            container,
            container_type,
            config,
        } => {
            assert_eq!(file.to_string_lossy(), "page.html");
            assert_eq!(container, ContainerArg::Page);
            assert_eq!(container_type, "app::Page");
            assert!(config.is_none());
        }
        _ => panic!("Expected Chain command"),
    }
}

#[test]
fn test_dump_command_with_flags() {
    let cli = Cli::try_parse_from([
        "weft-markup",
        "dump",
        "panel.html",
        "--container",
        "panel",
        "--container-type",
        "app::widgets::NavPanel",
        "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Dump {
            file,
            container,
            container_type,
            json,
            ..
        } => {
            assert_eq!(file.to_string_lossy(), "panel.html");
            assert_eq!(container, Some(ContainerArg::Panel));
            assert_eq!(container_type, "app::widgets::NavPanel");
            assert!(json);
        }
        _ => panic!("Expected Dump command"),
    }
}

#[test]
fn test_dump_without_container_is_inline() {
    let cli = Cli::try_parse_from(["weft-markup", "dump", "fragment.html"]).unwrap();

    match cli.command {
        Commands::Dump { container, json, .. } => {
            assert!(container.is_none());
            assert!(!json);
        }
        _ => panic!("Expected Dump command"),
    }
}

#[test]
fn test_container_arg_maps_to_kind() {
    assert_eq!(ContainerKind::from(ContainerArg::Page), ContainerKind::Page);
    assert_eq!(
        ContainerKind::from(ContainerArg::Panel),
        ContainerKind::Panel
    );
    assert_eq!(
        ContainerKind::from(ContainerArg::Border),
        ContainerKind::Border
    );
    assert_eq!(
        ContainerKind::from(ContainerArg::Component),
        ContainerKind::Component
    );
}

#[test]
fn test_all_commands_parse() {
    // Verify all commands can be parsed
    let commands = vec![
        vec!["weft-markup", "tokens", "page.html"],
        vec!["weft-markup", "chain", "page.html", "--container", "border"],
        vec!["weft-markup", "dump", "page.html", "--container", "page"],
        vec!["weft-markup", "dump", "page.html", "--json"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}
