use anyhow::bail;
use clap::*;
use colored::Colorize;
use log::warn;
use sf_energy::energy_to_kcal;
use sf_energy::evaluate_structure;
use sf_energy::EnergyModel;
use sf_energy::NucleotideVec;
use sf_structure::PairTable;

pub fn make_subcommand() -> Command {
    let cmd = Command::new("eval")
        .about("Free energy of sequence/structure pairs")
        .after_help(
            r###"
Each input line holds a sequence and a structure in dot-bracket notation.

Example:
   echo "UGGCGUUC .((...))" | stemfold eval --stem-costs "2 -61 69 18"

"###,
        );
    super::model_args(cmd)
}

pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let model = super::build_model(args)?;
    let stacking = !args.get_flag("no-stacking");

    for (n, record) in super::read_records(args.get_one::<String>("input").unwrap())?
        .into_iter()
        .enumerate()
    {
        if record.len() < 2 {
            bail!("record {}: expected a sequence and a structure", n + 1);
        }
        let seq = NucleotideVec::try_from(record[0].as_str())?;
        let pt = PairTable::try_from(record[1].as_str())?;
        let energy = evaluate_structure(&model, &seq, &pt, stacking)?;

        println!("{}", seq);
        println!("{}", pt);
        if energy >= model.max_mfe() / 2 {
            warn!("record {}: structure contains an infeasible loop", n + 1);
            println!("{}", "Free Energy Change: inf (kcal/mol)".bold());
        } else {
            println!(
                "{}",
                format!("Free Energy Change: {} (kcal/mol)", energy_to_kcal(energy)).bold()
            );
        }
    }
    Ok(())
}
