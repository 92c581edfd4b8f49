//! Subcommands and the options they share.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;

use anyhow::Context;
use clap::*;
use sf_energy::Energy;
use sf_energy::EnergyTables;
use sf_energy::MultiLoopParams;
use sf_energy::NearestNeighborModel;
use sf_energy::StemLengthModel;

pub mod eval;
pub mod fold;

/// Input and energy model arguments of every subcommand.
pub fn model_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("input")
            .short('i')
            .long("input")
            .num_args(1)
            .default_value("stdin")
            .help("Input file, one record per line (or stdin if not specified)"),
    )
    .arg(
        Arg::new("params")
            .long("params")
            .num_args(1)
            .help("Energy parameter file (JSON) replacing the built-in tables"),
    )
    .arg(
        Arg::new("ml-init")
            .long("ml-init")
            .num_args(1)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(Energy))
            .default_value("93")
            .help("Multi-loop initiation cost (dcal/mol)"),
    )
    .arg(
        Arg::new("ml-branch")
            .long("ml-branch")
            .num_args(1)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(Energy))
            .default_value("-6")
            .help("Multi-loop cost per branch (dcal/mol)"),
    )
    .arg(
        Arg::new("ml-unpaired")
            .long("ml-unpaired")
            .num_args(1)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(Energy))
            .default_value("0")
            .help("Multi-loop cost per unpaired nucleotide (dcal/mol)"),
    )
    .arg(
        Arg::new("stem-costs")
            .long("stem-costs")
            .num_args(1)
            .allow_hyphen_values(true)
            .default_value("50 6 15 15 9")
            .help("Costs of stems of length 1, 2, ...; the last applies to all longer stems"),
    )
    .arg(
        Arg::new("no-stacking")
            .long("no-stacking")
            .action(ArgAction::SetTrue)
            .help("Disable dangles, terminal mismatches and coaxial stacking"),
    )
}

pub fn parse_stem_costs(s: &str) -> anyhow::Result<Vec<Energy>> {
    s.split_whitespace()
        .map(|c| {
            c.parse::<Energy>()
                .with_context(|| format!("invalid stem length cost '{}'", c))
        })
        .collect()
}

/// The energy model described by the arguments of [`model_args`].
pub fn build_model(args: &ArgMatches) -> anyhow::Result<StemLengthModel> {
    let tables = match args.get_one::<String>("params") {
        Some(path) => EnergyTables::from_json_file(path)
            .with_context(|| format!("failed to load energy parameters from {}", path))?,
        None => EnergyTables::default(),
    };
    let multi_loop = MultiLoopParams {
        init: *args.get_one::<Energy>("ml-init").unwrap(),
        branch: *args.get_one::<Energy>("ml-branch").unwrap(),
        unpaired: *args.get_one::<Energy>("ml-unpaired").unwrap(),
    };
    let costs = parse_stem_costs(args.get_one::<String>("stem-costs").unwrap())?;
    let base = NearestNeighborModel::new(tables, multi_loop)?;
    let model = StemLengthModel::new(base, costs)?;
    log::info!("Stem length costs: {:?}", model.length_costs());
    Ok(model)
}

/// Non-empty input lines split at whitespace. Lines starting with '#' are skipped.
pub fn read_records(input: &str) -> anyhow::Result<Vec<Vec<String>>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = File::open(input).with_context(|| format!("cannot open {}", input))?;
        Box::new(BufReader::new(file))
    };

    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        records.push(line.split_whitespace().map(String::from).collect());
    }
    Ok(records)
}
