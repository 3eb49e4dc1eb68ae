//! Render a script file to SVG on stdout.
//!
//! `RUST_LOG=seqdraw_core=debug cargo run --example render_file -- flow.seq > flow.svg`

use std::env;
use std::fs;
use std::process;

use seqdraw_core::{build, parse_named, render_with_config, Config};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let input_file = args.get(1).expect("Usage: render_file <input.seq>");
    let input = fs::read_to_string(input_file).expect("Failed to read input file");

    let diagram = match parse_named(input_file, &input)
        .map_err(seqdraw_core::Error::from)
        .and_then(|nodes| build(&nodes))
    {
        Ok(diagram) => diagram,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let config = Config::default().with_instructions(diagram.instructions());
    print!("{}", render_with_config(&diagram, config));
}
