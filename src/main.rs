use clap::{App, Arg};
use std::fs;
use std::io::{self, Read};
use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod parser;
mod transpiler;
mod generator;


use generator::GenerateOptions;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!("{:?}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("abi2sol")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates a Solidity interface from a contract ABI")
        .arg(
            Arg::with_name("INPUT")
                .help("ABI JSON or artifact file; reads stdin when omitted or `-`")
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Write the interface to FILE instead of stdout")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("options")
                .long("options")
                .value_name("FILE")
                .help("JSON file with name, solidityVersion, license and formatOutput")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("name")
                .short("n")
                .long("name")
                .value_name("NAME")
                .help("Interface name")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("solidity-version")
                .short("s")
                .long("solidity-version")
                .value_name("VERSION")
                .help("Version constraint for the `pragma solidity` line")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("license")
                .short("L")
                .long("license")
                .value_name("SPDX")
                .help("SPDX license identifier")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .help("Tidy the generated source before writing it"),
        )
        .get_matches();

    // Options file first, then individual flags on top
    let mut options = match matches.value_of("options") {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file: {}", path))?;
            serde_json::from_str::<GenerateOptions>(&text)
                .with_context(|| format!("Invalid options file: {}", path))?
        }
        None => GenerateOptions::default(),
    };
    if let Some(name) = matches.value_of("name") {
        options.name = name.to_string();
    }
    if let Some(version) = matches.value_of("solidity-version") {
        options.solidity_version = version.to_string();
    }
    if let Some(license) = matches.value_of("license") {
        options.license = license.to_string();
    }
    if matches.is_present("format") {
        options.format_output = true;
    }

    // Read the ABI from the input file or stdin
    let source = match matches.value_of("INPUT") {
        Some(path) if path != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path))?,
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .with_context(|| "Failed to read ABI from stdin")?;
            buffer
        }
    };

    // Parse and generate the interface
    let abi = parser::parse_abi(&source)
        .with_context(|| "Failed to parse ABI")?;

    let solidity = generator::generate(&abi, &options)
        .with_context(|| format!("Failed to generate interface {}", options.name))?;

    // Write output file, or print to stdout
    match matches.value_of("output") {
        Some(path) => {
            fs::write(path, &solidity)
                .with_context(|| format!("Failed to write output file: {}", path))?;
            info!("Wrote interface {} to {}", options.name, path);
        }
        None => print!("{}", solidity),
    }

    Ok(())
}
