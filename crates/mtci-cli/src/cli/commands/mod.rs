use super::args::*;

pub mod doctor;
pub mod mrs;
pub(crate) mod run;
pub mod stats;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args).await,
        Command::Doctor(args) => doctor::run(args).await,
        Command::Stats(args) => stats::run(args),
        Command::Mrs => mrs::run(),
    }
}
