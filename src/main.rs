mod debug_report;

use groupling::{
    ConfigRegistry, Event, FingerprintingRules, apply_fingerprint_overrides,
    default_grouping_config_dict, get_grouping_variants, load_grouping_config,
};
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let registry = ConfigRegistry::builtin();
    let dict = default_grouping_config_dict(config.config_id.as_deref());
    let grouping_config = match load_grouping_config(&dict, registry) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let mut event: Event = match serde_json::from_str(&config.input) {
        Ok(event) => event,
        Err(err) => {
            eprintln!("error: event is not valid JSON: {err}");
            std::process::exit(2);
        }
    };

    if let Some(rules) = &config.rules {
        apply_fingerprint_overrides(&mut event, rules);
    }

    let variants = get_grouping_variants(&event, &grouping_config);
    debug_report::print_report(&event, &variants, config.color);
}

struct CliConfig {
    input: String,
    config_id: Option<String>,
    rules: Option<FingerprintingRules>,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut config_id: Option<String> = None;
    let mut rules: Option<FingerprintingRules> = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("groupling {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--config" | "-c" => {
                let value = args.next().ok_or_else(|| "error: --config expects a value".to_string())?;
                config_id = Some(value);
            }
            "--rules" => {
                let path = args.next().ok_or_else(|| "error: --rules expects a path".to_string())?;
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| format!("error: cannot read {path}: {e}"))?;
                let parsed = FingerprintingRules::parse(&text)
                    .map_err(|e| format!("error: {e}"))?;
                rules = Some(parsed);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            other => {
                return Err(format!("error: unknown argument '{other}' (see --help)"));
            }
        }
    }

    let input = match input {
        Some(i) => i,
        None => {
            if io::stdin().is_terminal() {
                return Err("error: no input; pass --input '<json>' or pipe an event".to_string());
            }
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("error: failed to read stdin: {e}"))?;
            buf
        }
    };
    if input.trim().is_empty() {
        return Err("error: empty input".to_string());
    }

    Ok(CliConfig { input, config_id, rules, color })
}

fn print_help() {
    println!("groupling — compute grouping variants for an error event");
    println!();
    println!("USAGE:");
    println!("    groupling [OPTIONS] --input '<event json>'");
    println!("    echo '<event json>' | groupling [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -i, --input <JSON>    Event payload as a JSON object");
    println!("    -c, --config <ID>     Grouping config id (default: {})", groupling::DEFAULT_CONFIG);
    println!("        --rules <PATH>    Fingerprinting rules file to apply first");
    println!("        --color           Force colored output");
    println!("        --no-color        Disable colored output");
    println!("    -h, --help            Show this help");
    println!("    -V, --version         Show version");
}
