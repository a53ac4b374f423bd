use clap::{Arg, ArgAction, Command};
use hostscan_core::{config::CliConfig, shutdown, Config, MetricsCollector, Scheduler};
use std::{path::PathBuf, process};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cli() -> Command {
    Command::new("hostscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scans the system and logs metrics to a CSV file")
        .arg(
            Arg::new("logdir")
                .short('l')
                .long("logdir")
                .value_name("PATH")
                .help("Log file path [default: ./log.csv]")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .value_name("SECONDS")
                .help("Interval in seconds between cycles [default: 5]")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Echo every cycle to stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("bandwidth")
                .short('b')
                .long("bandwidth")
                .value_name("GB")
                .help("Total network bandwidth in GB (required)")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("json-config")
                .long("json-config")
                .value_name("PATH")
                .help("Path to JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn run() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let cli_config = CliConfig {
        log_path: matches.get_one::<PathBuf>("logdir").cloned(),
        interval_secs: matches.get_one::<u64>("interval").copied(),
        verbose: matches.get_flag("verbose"),
        bandwidth_gb: matches.get_one::<f64>("bandwidth").copied(),
    };

    let json_config_path = matches.get_one::<PathBuf>("json-config");
    let config = Config::load(Some(&cli_config), json_config_path)?;

    let cancel = shutdown::install_signal_handlers()?;
    let source = MetricsCollector::new()?;

    let mut scheduler = Scheduler::new(config, source, cancel);
    scheduler.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let matches = cli()
            .try_get_matches_from(["hostscan", "-l", "out.csv", "-i", "10", "-v", "-b", "1.5"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("logdir"),
            Some(&PathBuf::from("out.csv"))
        );
        assert_eq!(matches.get_one::<u64>("interval"), Some(&10));
        assert!(matches.get_flag("verbose"));
        assert_eq!(matches.get_one::<f64>("bandwidth"), Some(&1.5));
    }

    #[test]
    fn test_non_numeric_interval_is_rejected() {
        let result = cli().try_get_matches_from(["hostscan", "--interval", "soon", "-b", "1"]);
        assert!(result.is_err());
    }
}
