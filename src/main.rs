//! flagmap - command-line flag resolver
//!
//! Features:
//! - Resolves flag image URLs for one or more country codes
//! - Accepts 3-letter codes and common aliases (e.g. UK, DEU)
//! - Prints a placeholder descriptor when no flag can be found
//! - Reads defaults from ~/.config/flagmap/config.json

use flagmap::{
    generate_fallback, AppConfig, FlagCache, FlagResolver, HttpProbe, TokioClock,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("flagmap {}", VERSION);
        return;
    }

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args(args) {
        Ok(cli) if !cli.codes.is_empty() => cli,
        Ok(_) => {
            print_help();
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let loaded = match &cli.config_path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let mut options = config.resolve.clone();
    if cli.no_retry {
        options.fallback_to_lower_quality = false;
    }

    let clock = Arc::new(TokioClock);
    let resolver = FlagResolver::new(config.sources(), Arc::new(HttpProbe::new()), clock.clone());
    let cache = FlagCache::new(clock).with_ttl(config.cache_ttl());

    info!(
        "flagmap v{} resolving {} code(s) across {} source(s)",
        VERSION,
        cli.codes.len(),
        resolver.sources().len()
    );

    for (code, url) in cache.preload(&resolver, &cli.codes, &options).await {
        match url {
            Some(url) => println!("{}\t{}", code, url),
            None => {
                let placeholder = generate_fallback(&code, &config.fallback);
                match serde_json::to_string(&placeholder) {
                    Ok(json) => println!("{}\t{}", code, json),
                    Err(e) => error!("Failed to encode placeholder for {}: {}", code, e),
                }
            }
        }
    }

    if cli.show_stats {
        let stats = cache.stats();
        eprintln!("cache entries: {}", stats.size);
        for entry in stats.entries {
            eprintln!("  {} (age {:?})", entry.key, entry.age);
        }
    }
}

/// Parsed command-line options
#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    config_path: Option<PathBuf>,
    show_stats: bool,
    no_retry: bool,
    codes: Vec<String>,
}

/// Parses everything after the program name; unknown options are rejected
fn parse_args(args: Vec<String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => match iter.next() {
                Some(path) => cli.config_path = Some(PathBuf::from(path)),
                None => return Err("--config requires a path".to_string()),
            },
            "--stats" => cli.show_stats = true,
            "--no-retry" => cli.no_retry = true,
            _ if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
            _ => cli.codes.push(arg),
        }
    }

    Ok(cli)
}

fn print_help() {
    println!("flagmap {}", VERSION);
    println!();
    println!("Resolves country flag image URLs with multi-source fallback.");
    println!();
    println!("USAGE:");
    println!("    flagmap [OPTIONS] <CODE>...");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help           Show this help message");
    println!("    -v, --version        Show version");
    println!("    -c, --config PATH    Read settings from PATH");
    println!("        --stats          Print cache statistics after resolving");
    println!("        --no-retry       Sweep the sources only once");
}
