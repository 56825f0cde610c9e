use anyhow::Result;
use clap::{Arg, Command};
use overpass2geojson::{ConversionMode, PolygonMode, convert_file};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = Command::new("overpass2geojson")
        .version("0.1.0")
        .about("Convert Overpass API JSON responses to GeoJSON")
        .arg(
            Arg::new("input")
                .help("Input Overpass JSON file (stdin if omitted or '-')")
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output GeoJSON file (stdout if not specified)"),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Elements to convert: all (deduplicated), nodes, ways, relations")
                .value_parser(["all", "nodes", "ways", "relations"])
                .default_value("all"),
        )
        .arg(
            Arg::new("force-polygon")
                .long("force-polygon")
                .action(clap::ArgAction::SetTrue)
                .help("Emit every way as a Polygon instead of inferring from closure (ways mode only)"),
        )
        .arg(
            Arg::new("pretty")
                .short('p')
                .long("pretty")
                .action(clap::ArgAction::SetTrue)
                .help("Pretty-print JSON output"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let input_path = matches.get_one::<String>("input");
    let output_path = matches.get_one::<String>("output");
    let pretty_print = matches.get_flag("pretty");
    let polygon_mode = if matches.get_flag("force-polygon") {
        PolygonMode::ForcePolygon
    } else {
        PolygonMode::InferFromClosure
    };
    let mode_name = matches
        .get_one::<String>("mode")
        .map(String::as_str)
        .unwrap_or("all");
    let mode = ConversionMode::from_name(mode_name, polygon_mode)?;

    if let Some(path) = input_path {
        if path != "-" && !Path::new(path).exists() {
            anyhow::bail!("Input file does not exist: {}", path);
        }
    }

    convert_file(input_path.map(String::as_str), output_path, mode, pretty_print)
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
