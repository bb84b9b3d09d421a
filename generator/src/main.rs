mod cli;

use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn read_input(input: &str) -> Result<String, Box<dyn Error>> {
    if input.starts_with("http://") || input.starts_with("https://") {
        Ok(reqwest::blocking::get(input)?.error_for_status()?.text()?)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

/// Document name: the input's file stem, without any URL query.
fn document_name(input: &str) -> &str {
    let path = input.split(['?', '#']).next().unwrap_or(input);
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Service")
}

fn run(cli: &cli::Cli) -> Result<(), Box<dyn Error>> {
    let source = read_input(&cli.input)?;
    let options = roxmltree::ParsingOptions {
        allow_dtd: cli.allow_dtd,
        ..roxmltree::ParsingOptions::default()
    };
    let xml = roxmltree::Document::parse_with_options(&source, options)?;
    let definitions = dt_wsdl::read_wsdl(&xml)?;
    let mut parsed =
        dt_wsdl_generator::parse_wsdl(&definitions, document_name(&cli.input), &cli.options())?;
    parsed.set_source(&cli.input);

    for diagnostic in &parsed.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    print!("{parsed}");
    Ok(())
}

fn main() -> ExitCode {
    if let Ok(filter) = EnvFilter::try_from_env("WSDL_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = cli::Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
