use clap::*;

mod cmd;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let app = Command::new("stemfold")
        .version(crate_version!())
        .about("`stemfold` - RNA folding with stem length penalties")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd::fold::make_subcommand())
        .subcommand(cmd::eval::make_subcommand())
        .after_help(
            r###"Energies are printed in kcal/mol. Set RUST_LOG=debug for details.

* fold - Minimum free energy structure of each input sequence
* eval - Free energy of given sequence/structure pairs

"###,
        );

    match app.get_matches().subcommand() {
        Some(("fold", sub_matches)) => cmd::fold::execute(sub_matches),
        Some(("eval", sub_matches)) => cmd::eval::execute(sub_matches),
        _ => unreachable!(),
    }
}
