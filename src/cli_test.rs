use super::*;
use pretty_assertions::assert_eq;

fn parse(args: &[&str]) -> RunConfig {
    let mut argv = vec!["relish-notifier"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().into_config().unwrap()
}

#[test]
fn test_defaults() {
    let config = parse(&[]);
    assert!(config.headless);
    assert!(config.extensions);
    assert_eq!(config.page_timeout, Duration::from_secs(10));
    assert_eq!(config.interval, Duration::from_secs(30));
    assert!(!config.once);
    assert_eq!(config.command, None);
    assert_eq!(config.verbosity, Verbosity::Warning);
    assert_eq!(config.tracker_url, "https://relish.ezcater.com/schedule");
    assert_eq!(config.webdriver_url, None);
}

#[test]
fn test_negated_flags() {
    let config = parse(&["--no-headless", "--no-extensions"]);
    assert!(!config.headless);
    assert!(!config.extensions);
}

#[test]
fn test_last_flag_wins() {
    let config = parse(&["--no-headless", "--headless"]);
    assert!(config.headless);

    let config = parse(&["--extensions", "--no-extensions"]);
    assert!(!config.extensions);
}

#[test]
fn test_short_flags() {
    let config = parse(&["-t", "5", "-i", "60", "-vv", "-c", "notify-send lunch"]);
    assert_eq!(config.page_timeout, Duration::from_secs(5));
    assert_eq!(config.interval, Duration::from_secs(60));
    assert_eq!(config.verbosity, Verbosity::Debug);
    assert_eq!(config.command.as_deref(), Some("notify-send lunch"));
}

#[test]
fn test_verbosity_is_clamped() {
    let config = parse(&["-vvvvv"]);
    assert_eq!(config.verbosity, Verbosity::Debug);

    let config = parse(&["--verbose"]);
    assert_eq!(config.verbosity, Verbosity::Info);
}

#[test]
fn test_once() {
    assert!(parse(&["--once"]).once);
}

#[test]
fn test_zero_page_timeout_rejected() {
    let result = Cli::try_parse_from(["relish-notifier", "--page-timeout", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_blank_command_ignored() {
    let config = parse(&["--command", "  "]);
    assert_eq!(config.command, None);
}

#[test]
fn test_credential_source() {
    let cli = Cli::try_parse_from(["relish-notifier"]).unwrap();
    assert_eq!(cli.credentials, CredentialSource::Keyring);

    let cli = Cli::try_parse_from(["relish-notifier", "--credentials", "env"]).unwrap();
    assert_eq!(cli.credentials, CredentialSource::Env);
}

#[test]
fn test_invalid_urls_rejected() {
    let cli = Cli::try_parse_from(["relish-notifier", "--tracker-url", "not a url"]).unwrap();
    assert!(cli.into_config().is_err());

    let cli = Cli::try_parse_from(["relish-notifier", "--webdriver-url", "::"]).unwrap();
    assert!(cli.into_config().is_err());

    let config = parse(&["--webdriver-url", "http://localhost:4444"]);
    assert_eq!(config.webdriver_url.as_deref(), Some("http://localhost:4444"));
}
