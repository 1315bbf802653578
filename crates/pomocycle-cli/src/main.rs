use clap::{Parser, Subcommand};

mod commands;
mod host;
mod logger;

#[derive(Parser)]
#[command(name = "pomocycle", version, about = "Pomocycle work/break cycle timer")]
struct Cli {
    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Settings management
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Settings { action } => commands::settings::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
