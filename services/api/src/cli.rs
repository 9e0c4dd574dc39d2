use crate::demo::{
    run_customers, run_demo, run_evaluate, CustomersArgs, DemoArgs, EvaluateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleet_sla::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet SLA",
    about = "Evaluate maintenance SLAs and compare repair scenarios for fleet contracts",
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
    /// Run the SLA calculators from the command line
    Sla {
        #[command(subcommand)]
        command: SlaCommand,
    },
    /// Walk through a multi-scenario comparison and print the report
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum SlaCommand {
    /// Evaluate one maintenance scenario
    Evaluate(EvaluateArgs),
    /// List every customer and plate in the billing base
    Customers(CustomersArgs),
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
        Command::Sla {
            command: SlaCommand::Evaluate(args),
        } => run_evaluate(args),
        Command::Sla {
            command: SlaCommand::Customers(args),
        } => run_customers(args),
        Command::Demo(args) => run_demo(args),
    }
}
