use clap::Parser;
use fibstrip::config::AppConfig;
use fibstrip::{Args, StripOptions};

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("fibstrip").chain(args.iter().copied()))
        .expect("arguments should parse")
}

#[test]
fn test_config_used_when_cli_is_silent() {
    let mut config = AppConfig::default();
    config.strip.initial_length = 25;
    config.debug.enabled = true;
    config.performance.event_poll_interval_ms = 50;

    let opts = StripOptions::from_args_and_config(&parse(&[]), &config);

    assert_eq!(opts.initial_length, 25);
    assert!(opts.debug);
    assert!(opts.mouse);
    assert_eq!(opts.event_poll_interval_ms, 50);
}

#[test]
fn test_cli_length_overrides_config() {
    let mut config = AppConfig::default();
    config.strip.initial_length = 25;

    let opts = StripOptions::from_args_and_config(&parse(&["--length", "40"]), &config);
    assert_eq!(opts.initial_length, 40);
}

#[test]
fn test_cli_length_is_normalized() {
    let config = AppConfig::default();

    let cases = [
        ("5", 10),
        ("999", 50),
        ("-3", 10),
        ("abc", 10),
        ("17boxes", 17),
        (" 33", 33),
    ];
    for (raw, expected) in cases {
        let opts = StripOptions::from_args_and_config(&parse(&["--length", raw]), &config);
        assert_eq!(opts.initial_length, expected, "--length {:?}", raw);
    }
}

#[test]
fn test_flags() {
    let args = parse(&["--debug", "--no-mouse"]);
    let opts = StripOptions::from(&args);
    assert!(opts.debug);
    assert!(!opts.mouse);

    assert!(Args::try_parse_from(["fibstrip", "--force"]).is_err());
    let args = parse(&["--generate-config", "--force"]);
    assert!(args.generate_config);
    assert!(args.force);
}

#[test]
fn test_default_options() {
    let opts = StripOptions::default();
    assert_eq!(opts.initial_length, 10);
    assert!(!opts.debug);
    assert!(opts.mouse);
    assert!(!opts.log_to_file);
    assert_eq!(opts.event_poll_interval_ms, 25);
}
