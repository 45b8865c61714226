use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use onboarding_core::{OnboardingRecord, Settings};

#[derive(Parser)]
#[command(name = "onboarding-pdf")]
#[command(about = "Generate new-starter onboarding PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Organisation name printed in footers
    #[arg(long, global = true)]
    organisation: Option<String>,

    /// PNG logo for the header bar
    #[arg(long, global = true)]
    logo: Option<PathBuf>,

    /// Leave page content streams uncompressed
    #[arg(long, global = true)]
    uncompressed: bool,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Blank New Starter Pack for completion on paper
    Blank {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Filled onboarding record from a JSON row
    Record {
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

fn settings(cli: &Cli) -> Settings {
    let mut settings = Settings::from_env();
    if let Some(org) = &cli.organisation {
        settings = settings.with_organisation(org.clone());
    }
    if let Some(logo) = &cli.logo {
        settings = settings.with_logo(logo.clone());
    }
    if cli.uncompressed {
        settings = settings.uncompressed();
    }
    settings
}

fn run(cli: &Cli) -> Result<PathBuf, onboarding_core::Error> {
    let settings = settings(cli);
    match &cli.command {
        Commands::Blank { output } => onboarding_core::generate_blank_form(output, &settings),
        Commands::Record { input, output } => {
            let json = std::fs::read_to_string(input)?;
            let record = OnboardingRecord::from_json(&json)?;
            onboarding_core::generate_filled_document(&record, output, &settings)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
