use clap::{CommandFactory, Parser};
use spaark_loader::logging::{LogFormat, LogOutput};
use spaark_loader::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["spaark-loader", "resolve", "Spaark.Core.Output.StdOutput"],
        vec!["spaark-loader", "resolve", "App.Model.User", "--format", "json"],
        vec!["spaark-loader", "model", "User"],
        vec!["spaark-loader", "model", "User", "--scope", "App.Shop.Model"],
        vec!["spaark-loader", "path", "Zzz.Foo"],
        vec!["spaark-loader", "registry", "--format", "json"],
        vec!["spaark-loader", "inspect", "App.Model.User", "--method", "save"],
        vec!["spaark-loader", "validate"],
        vec![
            "spaark-loader",
            "--app-root",
            "/srv/app",
            "--log-level",
            "debug",
            "validate",
            "--format",
            "json",
        ],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_name_and_unknown_commands() {
    assert!(Cli::try_parse_from(["spaark-loader", "resolve"]).is_err());
    assert!(Cli::try_parse_from(["spaark-loader", "model"]).is_err());
    assert!(Cli::try_parse_from(["spaark-loader", "scan"]).is_err());
}

#[test]
fn parse_model_scope_and_defaults() {
    let cli = Cli::try_parse_from(["spaark-loader", "model", "User", "--scope", "App.Local"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Model {
            name: "User".to_string(),
            scope: Some("App.Local".to_string()),
            format: "text".to_string(),
        }
    );
    assert_eq!(cli.app_root, std::path::PathBuf::from("."));
    assert!(cli.config.is_none());
}

#[test]
fn log_flags_override_config_section() {
    let cli = Cli::try_parse_from([
        "spaark-loader",
        "--log-level",
        "trace",
        "--log-format",
        "json",
        "registry",
    ])
    .unwrap();
    let logging = cli.logging_config(&Default::default()).unwrap();
    assert_eq!(logging.level, "trace");
    assert_eq!(logging.format, LogFormat::Json);
    assert_eq!(logging.output, LogOutput::Stderr);

    let bad = Cli::try_parse_from(["spaark-loader", "--log-output", "syslog", "registry"]).unwrap();
    assert!(bad.logging_config(&Default::default()).is_err());
}

#[test]
fn help_lists_every_command() {
    let help = Cli::command().render_long_help().to_string();
    for command in ["resolve", "model", "path", "registry", "inspect", "validate"] {
        assert!(help.contains(command), "help is missing {command}");
    }
}
