use crate::render::{run_render, RenderConsentArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use clinic_forms::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Clinic Forms",
    about = "Serve the clinic website's consent and contact form endpoints",
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
    /// Work with the patient consent form offline
    Consent {
        #[command(subcommand)]
        command: ConsentCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConsentCommand {
    /// Fill the consent template from a JSON submission without emailing it
    Render(RenderConsentArgs),
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
        Command::Consent {
            command: ConsentCommand::Render(args),
        } => run_render(args),
    }
}
