//! Load-profile simulator entry point: CLI wiring and run orchestration.

use std::path::Path;
use std::process;

use demand_sim::config::RunConfig;
use demand_sim::io::catalog::load_catalog;
use demand_sim::io::export::export_csv;
use demand_sim::model::{DayType, UseCase};
use demand_sim::presets;
use demand_sim::rng::RngService;
use demand_sim::sim::Engine;

/// Parsed CLI arguments.
struct CliArgs {
    catalog_path: Option<String>,
    preset: Option<String>,
    config_path: Option<String>,
    profiles_override: Option<usize>,
    seed_override: Option<u64>,
    parallel: bool,
    out: Option<String>,
}

fn print_help() {
    eprintln!("demand-sim — stochastic minute-resolution load-profile generator");
    eprintln!();
    eprintln!("Usage: demand-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --catalog <path>   Load the appliance catalog from a CSV file");
    eprintln!("  --preset <name>    Use a built-in use case (village)");
    eprintln!("  --config <path>    Load run parameters from a TOML file");
    eprintln!("  --profiles <n>     Override the number of daily profiles");
    eprintln!("  --seed <u64>       Override the random seed");
    eprintln!("  --parallel         Fan work out over (day, appliance, copy) tasks");
    eprintln!("  --out <path>       Export the flattened series to CSV");
    eprintln!("  --help             Show this help message");
    eprintln!();
    eprintln!("If no --catalog or --preset is given, the village preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        catalog_path: None,
        preset: None,
        config_path: None,
        profiles_override: None,
        seed_override: None,
        parallel: false,
        out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--catalog" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --catalog requires a path argument");
                    process::exit(1);
                }
                cli.catalog_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--profiles" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --profiles requires a number argument");
                    process::exit(1);
                }
                match args[i].parse::<usize>() {
                    Ok(n) => cli.profiles_override = Some(n),
                    Err(_) => {
                        eprintln!(
                            "error: --profiles value \"{}\" is not a valid number",
                            args[i]
                        );
                        process::exit(1);
                    }
                }
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                match args[i].parse::<u64>() {
                    Ok(s) => cli.seed_override = Some(s),
                    Err(_) => {
                        eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                        process::exit(1);
                    }
                }
            }
            "--parallel" => {
                cli.parallel = true;
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a path argument");
                    process::exit(1);
                }
                cli.out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.catalog_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --catalog and --preset are mutually exclusive; choose one source");
        process::exit(1);
    }

    cli
}

fn load_use_case(cli: &CliArgs) -> UseCase {
    if let Some(ref path) = cli.catalog_path {
        match load_catalog(Path::new(path)) {
            Ok(uc) => uc,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        let name = cli.preset.as_deref().unwrap_or("village");
        match presets::from_preset(name) {
            Ok(uc) => uc,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    }
}

fn main() {
    let cli = parse_args();

    let mut config = if let Some(ref path) = cli.config_path {
        match RunConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        RunConfig::default()
    };

    if let Some(n) = cli.profiles_override {
        config.run.num_profiles = n;
    }
    if let Some(seed) = cli.seed_override {
        config.run.seed = Some(seed);
    }
    if cli.parallel {
        config.run.parallel = true;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let use_case = load_use_case(&cli);
    let day_types = match config.resolve_day_types() {
        Ok(days) => days,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let mut engine = Engine::new(use_case);
    engine.peak_enlarge = config.run.peak_enlarge;

    let seed = config.run.seed.unwrap_or_else(rand::random);
    let result = if config.run.parallel {
        engine.run_parallel(&day_types, seed)
    } else {
        let mut rng = RngService::from_seed(seed);
        engine.run(&day_types, &mut rng)
    };

    let profiles = match result {
        Ok(profiles) => profiles,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    println!(
        "use case \"{}\": {} users, {} appliance rows, seed {seed}",
        engine.use_case().name,
        engine.use_case().users.len(),
        engine.use_case().appliance_count(),
    );
    for (day, (profile, day_type)) in profiles.iter().zip(&day_types).enumerate() {
        let energy_kwh: f64 = profile.iter().sum::<f64>() / 1000.0 / 60.0;
        let peak_w = profile.iter().copied().fold(0.0_f64, f64::max);
        let kind = match day_type {
            DayType::Weekday => "weekday",
            DayType::Weekend => "weekend",
        };
        println!("day {day} ({kind}): energy {energy_kwh:.2} kWh, peak {peak_w:.0} W");
    }

    if let Some(ref path) = cli.out {
        if let Err(e) = export_csv(&profiles, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Profiles written to {path}");
    }
}
