//! Demo entry point — CLI wiring, manual cycles, and sample output.

use std::path::Path;
use std::process;
use std::thread;
use std::time::Duration;

use microgrid_telemetry::collector::Collector;
use microgrid_telemetry::config::SimulatorConfig;
use microgrid_telemetry::store::{Store, Table};
use tracing_subscriber::EnvFilter;

/// How many rows of each sample table the demo prints.
const SAMPLE_ROWS: usize = 5;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    db_override: Option<String>,
    cycles: u32,
    watch: bool,
    interval_secs: Option<u64>,
    duration_secs: u64,
}

fn print_help() {
    eprintln!("microgrid-telemetry — IoT telemetry simulator for rural microgrid monitoring");
    eprintln!();
    eprintln!("Usage: microgrid-telemetry [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>      Load configuration from TOML file");
    eprintln!("  --db <path>          Override database path");
    eprintln!("  --cycles <n>         Number of manual collection cycles (default: 5)");
    eprintln!("  --watch              Run the background collection loop instead");
    eprintln!("  --interval <secs>    Loop interval in seconds (default: from config)");
    eprintln!("  --duration <secs>    How long to run the loop (default: 300)");
    eprintln!("  --help               Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        db_override: None,
        cycles: 5,
        watch: false,
        interval_secs: None,
        duration_secs: 300,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--db" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --db requires a path argument");
                    process::exit(1);
                }
                cli.db_override = Some(args[i].clone());
            }
            "--cycles" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --cycles requires a count argument");
                    process::exit(1);
                }
                if let Ok(n) = args[i].parse::<u32>() {
                    cli.cycles = n;
                } else {
                    eprintln!("error: --cycles value \"{}\" is not a valid u32", args[i]);
                    process::exit(1);
                }
            }
            "--watch" => {
                cli.watch = true;
            }
            "--interval" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --interval requires a seconds argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.interval_secs = Some(s);
                } else {
                    eprintln!("error: --interval value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--duration" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --duration requires a seconds argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.duration_secs = s;
                } else {
                    eprintln!("error: --duration value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn print_samples(store: &Store) {
    for (title, table) in [
        ("Recent solar sensor data:", Table::Solar),
        ("Recent weather data:", Table::Weather),
    ] {
        println!("\n{title}");
        match store.get_recent(table, 1) {
            Ok(rows) => {
                for row in rows.iter().take(SAMPLE_ROWS) {
                    println!("  {row}");
                }
                if rows.is_empty() {
                    println!("  (none)");
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    println!("\nSummary statistics:");
    match store.summary() {
        Ok(report) => println!("{report}"),
        Err(e) => eprintln!("error: {e}"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = parse_args();

    let mut config = if let Some(ref path) = cli.config_path {
        match SimulatorConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        SimulatorConfig::default()
    };

    if let Some(db) = cli.db_override {
        config.database.path = db;
    }
    if let Some(secs) = cli.interval_secs {
        config.collection.interval_secs = secs;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let store = match Store::open(&config.database.path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let mut collector = Collector::new(store.clone(), config.entities.clone());

    if cli.watch {
        let interval = Duration::from_secs(config.collection.interval_secs);
        println!(
            "Collecting every {}s for {}s...",
            config.collection.interval_secs, cli.duration_secs
        );
        collector.start(interval);
        thread::sleep(Duration::from_secs(cli.duration_secs));
        collector.stop();
    } else {
        println!("Running {} test collection cycles...", cli.cycles);
        for _ in 0..cli.cycles {
            if let Err(e) = collector.run_one_cycle() {
                eprintln!("error: {e}");
            }
        }
    }

    print_samples(&store);
}
