use crate::demo::{run_demo, run_leave_eligible, DemoArgs, LeaveEligibleArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lingua_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lingua Portal",
    about = "Run the language-school back office or walk through its workflows from the command line",
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
    /// Inspect leave requests in the seeded demo data
    Leave {
        #[command(subcommand)]
        command: LeaveCommand,
    },
    /// Walk through the substitute-assignment workflow on seeded data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum LeaveCommand {
    /// List eligible substitutes for one leave request
    Eligible(LeaveEligibleArgs),
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
        Command::Leave {
            command: LeaveCommand::Eligible(args),
        } => run_leave_eligible(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
