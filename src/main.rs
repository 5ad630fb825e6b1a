use anyhow::{Context, Result};
use clap::{crate_version, App, Arg};
use log::{debug, error, warn};
use std::fs;
use std::io::{self, prelude::*};
use std::process;

use xmltree::siblings;

enum Output {
    Tree,
    Dump,
    Debug,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let matches = App::new("xmltree")
        .version(crate_version!())
        .about("Parses an XML fragment and prints its elements")
        .arg(
            Arg::with_name("input")
                .help("path to input file, stdin when omitted or '-'")
                .index(1),
        )
        .arg(
            Arg::with_name("dump")
                .long("dump")
                .help("print each top-level element's own tag and text"),
        )
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .conflicts_with("dump")
                .help("print the structural debug dump of each top-level element"),
        )
        .get_matches();
    let output = if matches.is_present("dump") {
        Output::Dump
    } else if matches.is_present("debug") {
        Output::Debug
    } else {
        Output::Tree
    };
    if let Err(err) = run(matches.value_of("input"), output) {
        error!("{:#}", err);
        process::exit(1);
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
            Ok(input)
        }
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading input file {}", path))
        }
    }
}

fn run(path: Option<&str>, output: Output) -> Result<()> {
    let input = read_input(path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for result in siblings(&input) {
        if !result.skipped.trim().is_empty() {
            debug!("skipped {:?}", result.skipped.trim());
        }
        let node = result.node;
        if node.name().is_empty() {
            continue;
        }
        if result.is_eof {
            warn!("document truncated inside <{}>", node.name());
        }
        match output {
            Output::Tree => node.write_tree(&mut out).context("writing to stdout")?,
            Output::Dump => writeln!(out, "{}", node.dump()).context("writing to stdout")?,
            Output::Debug => writeln!(out, "{}", node.tree(0)).context("writing to stdout")?,
        }
    }
    Ok(())
}
