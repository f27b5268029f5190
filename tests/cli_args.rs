//! Integration tests for command-line handling
//!
//! Runs the built binary to check flag validation before the server starts.

use std::process::Command;

const CONFIG_ENV: [&str; 7] = [
    "PAAPI_ACCESS_KEY",
    "PAAPI_SECRET_KEY",
    "PAAPI_PARTNER_TAG",
    "PAAPI_DOMAIN",
    "PAAPI_RESPONSE_GROUP",
    "ITEM_CACHE_DIR",
    "PORT",
];

/// Helper to run the binary with given args and a clean configuration environment
fn run_cli(args: &[&str]) -> std::process::Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_item-lookup"));
    for var in CONFIG_ENV {
        command.env_remove(var);
    }
    command
        .args(args)
        .output()
        .expect("Failed to execute item-lookup")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("item-lookup"), "Help should mention item-lookup");
    assert!(stdout.contains("--cache-dir"), "Help should mention --cache-dir");
    assert!(stdout.contains("PAAPI_ACCESS_KEY"), "Help should list env fallbacks");
}

#[test]
fn test_missing_credentials_exit_with_error() {
    let output = run_cli(&["--port", "0"]);
    assert!(!output.status.success(), "Expected missing credentials to fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--access"), "Should name the missing flag: {}", stderr);
}

#[test]
fn test_unknown_domain_prints_error_and_exits() {
    let output = run_cli(&[
        "--access", "AKID", "--secret", "S", "--tag", "t", "--domain", "XX",
    ]);
    assert!(!output.status.success(), "Expected unknown domain to fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid domain"), "Should explain the domain error: {}", stderr);
}

#[test]
fn test_unknown_response_group_prints_error_and_exits() {
    let output = run_cli(&[
        "--access",
        "AKID",
        "--secret",
        "S",
        "--tag",
        "t",
        "--response-group",
        "Huge",
    ]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid response group"), "{}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use item_lookup::cli::{parse_domain_arg, Cli, ServiceConfig};
    use item_lookup::data::ResponseGroup;

    #[test]
    fn test_parse_domain_arg_uk() {
        let locale = parse_domain_arg("uk").unwrap();
        assert_eq!(locale.host, "webservices.amazon.co.uk");
        assert_eq!(locale.region, "eu-west-1");
    }

    #[test]
    fn test_config_from_full_command_line() {
        let cli = Cli::parse_from([
            "item-lookup",
            "--access",
            "AKID",
            "--secret",
            "SECRET",
            "--tag",
            "example-22",
            "--domain",
            "US",
            "--port",
            "3000",
            "--cache-dir",
            "/srv/cache",
            "--response-group",
            "small",
        ]);

        let config = ServiceConfig::from_cli(&cli);

        assert_eq!(config.locale.marketplace, "www.amazon.com");
        assert_eq!(config.port, 3000);
        assert_eq!(config.response_group, ResponseGroup::Small);
        assert_eq!(config.credentials.access_key, "AKID");
        assert!(config.cache.is_some());
    }
}
