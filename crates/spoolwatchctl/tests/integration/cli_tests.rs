/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

use clap::Parser;
use spoolwatchctl::{Cli, Commands, OutputFormat};
use std::path::PathBuf;

#[test]
fn test_run_with_overrides() {
    let cli = Cli::try_parse_from([
        "spoolwatchctl",
        "run",
        "--api-url",
        "http://10.0.0.5:3000/api/print-jobs",
        "--interval",
        "15",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Commands::Run {
            api_url: Some("http://10.0.0.5:3000/api/print-jobs".to_string()),
            interval: Some(15),
            log_level: Some("debug".to_string()),
        }
    );
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "spoolwatchctl",
        "printers",
        "--config",
        "/tmp/spoolwatch.toml",
        "-v",
    ])
    .unwrap();

    assert_eq!(cli.command, Commands::Printers);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/spoolwatch.toml")));
    assert!(cli.verbose);
    assert!(!cli.quiet);
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let result = Cli::try_parse_from(["spoolwatchctl", "-v", "-q", "check"]);
    assert!(result.is_err());
}

#[test]
fn test_check_format_defaults_to_human() {
    let cli = Cli::try_parse_from(["spoolwatchctl", "check"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Check {
            format: OutputFormat::Human
        }
    );

    let cli = Cli::try_parse_from(["spoolwatchctl", "check", "--format", "json"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Check {
            format: OutputFormat::Json
        }
    );

    assert!(Cli::try_parse_from(["spoolwatchctl", "check", "--format", "yaml"]).is_err());
}

#[test]
fn test_init_config_arguments() {
    let cli = Cli::try_parse_from([
        "spoolwatchctl",
        "init-config",
        "--path",
        "./agent.toml",
        "--force",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Commands::InitConfig {
            path: Some(PathBuf::from("./agent.toml")),
            force: true,
        }
    );
}

#[test]
fn test_interval_must_be_numeric() {
    let result = Cli::try_parse_from(["spoolwatchctl", "run", "--interval", "soon"]);
    assert!(result.is_err());
}

#[test]
fn test_subcommand_is_required() {
    assert!(Cli::try_parse_from(["spoolwatchctl"]).is_err());
}
