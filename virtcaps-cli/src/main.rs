//! Capability document inspector
//!
//! Configuration is loaded from virtcaps.toml in the working directory,
//! or from the file named with --config.

use virtcaps_cli::{args::parse_args, init_tracing, run, Config, Report};

fn main() {
    let args = parse_args();

    let config_path = args.config.as_deref().unwrap_or("virtcaps.toml");
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);
    let ctx = config.context();
    tracing::info!(uri = %ctx.uri, "inspecting {:?}", args.command);

    let (output, code) = match run(&ctx, &args.command) {
        Ok(data) => (serde_json::to_string_pretty(&Report::success(data)), 0),
        Err(e) => {
            tracing::warn!(kind = %e.kind(), "query failed: {e}");
            (serde_json::to_string_pretty(&Report::failure(&e)), 1)
        }
    };

    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to render report: {e}");
            std::process::exit(1);
        }
    }
    std::process::exit(code);
}
