use anyhow::bail;
use clap::*;
use colored::Colorize;
use log::info;
use log::warn;
use sf_energy::energy_to_kcal;
use sf_energy::NucleotideVec;
use sf_folding::fold_batch;
use sf_folding::FolderConfig;
use sf_folding::StemLengthFolder;
use sf_structure::PairSet;
use sf_structure::PairStatistics;
use sf_structure::PairTable;

pub fn make_subcommand() -> Command {
    let cmd = Command::new("fold")
        .about("Minimum free energy structures with stem length penalties")
        .after_help(
            r###"
Each input line holds a sequence and, optionally, a reference structure in
dot-bracket notation. For every sequence, the MFE structure and its energy
are printed; with a reference structure, also the F-score of the prediction.

Examples:
1. Fold a single sequence:
   echo UGGCGUUC | stemfold fold --stem-costs "2 -61 69 18"

2. Fold a file of sequences on four threads, without lonely pairs:
   stemfold fold -i seqs.txt --threads 4 --no-lonely-pairs

"###,
        )
        .arg(
            Arg::new("max-two-loop")
                .long("max-two-loop")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("30")
                .help("Maximum number of unpaired nucleotides in bulges and interior loops"),
        )
        .arg(
            Arg::new("no-lonely-pairs")
                .long("no-lonely-pairs")
                .action(ArgAction::SetTrue)
                .help("Forbid pairs that cannot stack on a neighboring pair"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("Number of worker threads (default: all cores)"),
        );
    super::model_args(cmd)
}

pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let model = super::build_model(args)?;
    let config = FolderConfig {
        lonely_pairs: !args.get_flag("no-lonely-pairs"),
        stacking: !args.get_flag("no-stacking"),
        max_two_loop: *args.get_one::<usize>("max-two-loop").unwrap(),
    };
    if let Some(&threads) = args.get_one::<usize>("threads") {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let mut seqs = Vec::new();
    let mut references = Vec::new();
    for (n, record) in super::read_records(args.get_one::<String>("input").unwrap())?
        .into_iter()
        .enumerate()
    {
        let seq = NucleotideVec::try_from(record[0].as_str())?;
        let reference = match record.get(1) {
            Some(db) => {
                let pt = PairTable::try_from(db.as_str())?;
                if pt.len() != seq.len() {
                    bail!(
                        "record {}: reference of length {} for sequence of length {}",
                        n + 1,
                        pt.len(),
                        seq.len()
                    );
                }
                Some(pt)
            }
            None => None,
        };
        if record.len() > 2 {
            warn!("record {}: ignoring {} extra fields", n + 1, record.len() - 2);
        }
        seqs.push(seq);
        references.push(reference);
    }
    info!("Folding {} sequences with {:?}", seqs.len(), config);

    //----------------------------
    // Ops
    //----------------------------
    let folder = StemLengthFolder::with_config(model, config);
    let results = fold_batch(&folder, &seqs);

    //----------------------------
    // Output
    //----------------------------
    for ((seq, reference), result) in seqs.iter().zip(&references).zip(results) {
        let result = result?;
        println!("{}", seq);
        println!("{}", result.structure);
        println!(
            "{}",
            format!("MFE: {} (kcal/mol)", energy_to_kcal(result.energy)).bold()
        );
        if let Some(reference) = reference {
            let stats = PairStatistics::compare(
                &PairSet::from(reference),
                &PairSet::from(&result.structure),
            );
            println!(
                "F-score: {:.3} (sensitivity: {:.3}, PPV: {:.3})",
                stats.f1_score(),
                stats.sensitivity(),
                stats.ppv()
            );
        }
    }

    Ok(())
}
