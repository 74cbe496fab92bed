use crate::demo::{
    run_demo, run_evaluate, run_terms, run_year_label, DemoArgs, EvaluateArgs, YearLabelArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use efg_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EFG Portal",
    about = "Serve and inspect the Enrollment Fee Grant eligibility portal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate one student's eligibility against the configured Banner endpoints
    Evaluate(EvaluateArgs),
    /// List the terms offered in the term dropdown
    Terms,
    /// Print the academic-year label for a term code
    YearLabel(YearLabelArgs),
    /// Render both portal views against built-in sample records
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Terms => run_terms().await,
        Command::YearLabel(args) => run_year_label(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
