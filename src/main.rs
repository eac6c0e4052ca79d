use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ycp_cli::{
    confirm, display_banner, display_error, display_report, print_help, read_form, read_line,
    save_report, Submitter, ValidationOutcome, ValidationSession,
};
use ycp_core::Error;
use ycp_lyzr::{HealthStatus, LyzrClient};

/// How long to wait for mirrored submissions before exiting.
const SECONDARY_GRACE: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "ycp")]
#[command(about = "Validate a startup idea against Y Combinator criteria", long_about = None)]
struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one idea and print the analysis
    Validate {
        /// Founder's full name
        #[arg(long)]
        name: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Idea description, at least 50 characters
        #[arg(long)]
        idea: String,
        /// Also print the raw response text
        #[arg(long)]
        raw: bool,
        /// Save the response text into DIR (current directory if omitted)
        #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = ".")]
        save: Option<PathBuf>,
    },
    /// Check that the agent credentials are configured
    Health,
    /// Send a fixed test submission to the agent
    Probe,
}

type Session = ValidationSession<LyzrClient>;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,ycp=debug,ycp_core=debug,ycp_lyzr=debug,ycp_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_session() -> ycp_core::Result<Session> {
    let primary = LyzrClient::from_env()?;
    let secondary = LyzrClient::secondary_from_env()?;
    if secondary.is_none() {
        debug!("secondary agent not configured");
    }
    Ok(ValidationSession::new(Submitter::with_secondary(primary, secondary)))
}

fn is_end_of_input(err: &Error) -> bool {
    matches!(err, Error::Io(e) if e.kind() == IoErrorKind::UnexpectedEof)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Validate {
            name,
            email,
            idea,
            raw,
            save,
        }) => run_validate(&name, &email, &idea, raw, save).await,
        Some(Commands::Health) => run_health(),
        Some(Commands::Probe) => {
            let submitter = match LyzrClient::from_env() {
                Ok(client) => Submitter::new(client),
                Err(e) => {
                    display_error(&e.user_message());
                    return Ok(ExitCode::FAILURE);
                }
            };
            Ok(run_probe(&submitter).await)
        }
        None => run_interactive().await,
    }
}

async fn run_validate(
    name: &str,
    email: &str,
    idea: &str,
    raw: bool,
    save: Option<PathBuf>,
) -> Result<ExitCode> {
    let session = match build_session() {
        Ok(session) => session,
        Err(e) => {
            display_error(&e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    eprintln!("{} Analyzing your startup idea...", "🤖".blue());
    let code = match session.submit_form(name, email, idea).await {
        Ok(outcome) => show_outcome(&outcome, raw, save).await,
        Err(e) => {
            display_error(&e.user_message());
            ExitCode::FAILURE
        }
    };

    session.submitter().flush_background(SECONDARY_GRACE).await;
    Ok(code)
}

async fn show_outcome(outcome: &ValidationOutcome, raw: bool, save: Option<PathBuf>) -> ExitCode {
    display_report(&outcome.report);
    if raw {
        println!("{}", "Raw response".bold());
        println!("{}", outcome.response_text);
    }

    let Some(dir) = save else {
        return ExitCode::SUCCESS;
    };
    match save_report(&dir, &outcome.response_text).await {
        Ok(path) => {
            println!("{} Saved to {}", "✅".green(), path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            display_error(&format!("Could not save the analysis: {}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_health() -> Result<ExitCode> {
    let status = HealthStatus::from_env();
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(if status.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_probe(submitter: &Submitter<LyzrClient>) -> ExitCode {
    eprintln!("{} Sending test submission...", "🔌".blue());
    match submitter.probe().await {
        Ok(text) => {
            println!("{} Agent responded", "✅".green());
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(failure) => {
            let status = failure
                .status
                .map_or_else(|| "no response".to_string(), |s| s.to_string());
            display_error(&format!("Probe failed ({:?}, status {})", failure.kind, status));
            eprintln!("{}", failure.message.dimmed());
            ExitCode::FAILURE
        }
    }
}

async fn run_interactive() -> Result<ExitCode> {
    display_banner();

    let session = match build_session() {
        Ok(session) => session,
        Err(e) => {
            display_error(&e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    loop {
        let input = match read_line(&"ycp>".green().bold().to_string()) {
            Ok(input) => input,
            Err(e) if is_end_of_input(&e) => break,
            Err(e) => return Err(e.into()),
        };

        match input.trim().to_lowercase().as_str() {
            "exit" | "quit" => break,
            "help" => print_help(),
            "health" => {
                run_health()?;
            }
            "probe" => {
                run_probe(session.submitter()).await;
            }
            "" | "new" | "validate" => match interactive_submission(&session).await {
                Err(e) if is_end_of_input(&e) => break,
                other => other?,
            },
            other => println!(
                "{} Unknown command '{}'. Type 'help' for the list.",
                "?".yellow(),
                other
            ),
        }
    }

    println!("{}", "👋 Goodbye!".green());
    session.submitter().flush_background(SECONDARY_GRACE).await;
    Ok(ExitCode::SUCCESS)
}

async fn interactive_submission(session: &Session) -> ycp_core::Result<()> {
    let (name, email, idea) = read_form()?;

    println!("{} Analyzing your startup idea...", "🤖".blue());
    match session.submit_form(&name, &email, &idea).await {
        Ok(outcome) => {
            display_report(&outcome.report);
            if confirm("Save this analysis to the current directory?")? {
                let path = save_report(std::path::Path::new("."), &outcome.response_text).await?;
                println!("{} Saved to {}", "✅".green(), path.display());
            }
        }
        Err(e) => display_error(&e.user_message()),
    }

    session.reset();
    println!(
        "{}",
        "Press Enter to validate another idea, or type 'exit' to quit".dimmed()
    );
    Ok(())
}
