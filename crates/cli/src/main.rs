use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chronos_agents::{ChatInput, CompletionConfig, CompletionService, TravelAgent, DEFAULT_SESSION_TTL};
use chronos_core::faq::FAQ;
use chronos_core::quiz::{score_answers, QUESTIONS};
use chronos_core::{
    format_price, require_destination, BookingWizard, DetailsPatch, InfoPatch, Transition,
    TripDuration, WizardCommand, WizardStep, DESTINATIONS,
};
use chronos_observability::{init_tracing, AppMetrics};
use chronos_storage::MemoryStore;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "chronos")]
#[command(about = "TimeTravel Agency CLI")]
struct Cli {
    /// Answer from the keyword rules even when a completion key is set.
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Chat,
    Book,
    Quote {
        #[arg(long)]
        destination: String,
        #[arg(long, default_value_t = 1)]
        travelers: i64,
    },
    Quiz {
        #[arg(long, value_delimiter = ',')]
        answers: Vec<usize>,
    },
    Faq,
    Destinations,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("chronos_cli");
    let cli = Cli::parse();

    match cli.command {
        Command::Chat => run_chat(build_agent(cli.offline)?).await?,
        Command::Book => run_booking(build_agent(true)?).await?,
        Command::Quote {
            destination,
            travelers,
        } => {
            let total = quote(&destination, travelers)?;
            println!("{}", format_price(total));
        }
        Command::Quiz { answers } => {
            let result = score_answers(&answers).with_context(|| {
                format!("expected {} answers such as --answers 0,1,2,0", QUESTIONS.len())
            })?;
            println!("{} ({})\n{}", result.title, result.subtitle, result.description);
        }
        Command::Faq => {
            for entry in FAQ.iter() {
                println!("{}\n  {}\n", entry.question, entry.answer);
            }
        }
        Command::Destinations => {
            for destination in DESTINATIONS.iter() {
                println!(
                    "{} {} [{}] {} / voyageur\n  {}",
                    destination.emoji,
                    destination.label,
                    destination.id,
                    format_price(u64::from(destination.price)),
                    destination.description
                );
            }
        }
    }

    Ok(())
}

fn build_agent(offline: bool) -> Result<TravelAgent<MemoryStore>> {
    let config = if offline {
        None
    } else {
        CompletionConfig::from_env()
    };
    let completion = CompletionService::from_config(config)?;

    Ok(TravelAgent::new(
        Arc::new(MemoryStore::new()),
        completion,
        AppMetrics::shared(),
        DEFAULT_SESSION_TTL,
    ))
}

/// Total for a destination and party size, travelers clamped to 1..=6.
fn quote(destination_id: &str, travelers: i64) -> Result<u64> {
    let destination = require_destination(destination_id)?;
    let mut wizard = BookingWizard::new();
    wizard.select_destination(destination.id);
    wizard.go_next();
    wizard.update_details(DetailsPatch {
        travelers: Some(travelers),
        ..DetailsPatch::default()
    });
    Ok(wizard.total_price())
}

async fn run_chat(agent: TravelAgent<MemoryStore>) -> Result<()> {
    let session = agent.open_conversation().await?;
    let session_id = session.session_id.clone();

    println!("Chronos ({}). type 'exit' to quit.", agent.completion_mode());
    if let Some(greeting) = session.last_message() {
        println!("\n{}\n", greeting.text);
    }

    loop {
        let line = prompt("> ")?;
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let turn = agent
            .handle_chat(ChatInput {
                session_id: Some(session_id.clone()),
                text: line,
            })
            .await?;
        println!("\n[{}] {}\n", turn.message.time_label(), turn.reply.text);
    }

    Ok(())
}

async fn run_booking(agent: TravelAgent<MemoryStore>) -> Result<()> {
    let booking = agent.create_booking().await?;
    let id = booking.booking_id.as_str();
    let mut step = booking.wizard.step();

    loop {
        println!("\n== {} ({}/4) ==", step.label(), step.index() + 1);
        let command = match step {
            WizardStep::Destination => {
                for (index, destination) in DESTINATIONS.iter().enumerate() {
                    println!(
                        "  {}. {} {} ({})",
                        index + 1,
                        destination.emoji,
                        destination.label,
                        format_price(u64::from(destination.price))
                    );
                }
                let choice = prompt("Destination: ")?;
                let destination = choice
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| index.checked_sub(1))
                    .and_then(|index| DESTINATIONS.get(index));
                if let Some(destination) = destination {
                    agent
                        .apply_booking_command(
                            id,
                            WizardCommand::SelectDestination {
                                destination_id: destination.id.to_string(),
                            },
                        )
                        .await?;
                }
                WizardCommand::Next
            }
            WizardStep::Details => {
                let departure_date = prompt("Date de départ (AAAA-MM-JJ): ")?;
                let duration = prompt("Durée (3, 5 ou 7 jours): ")?
                    .parse::<u8>()
                    .ok()
                    .and_then(|days| TripDuration::try_from(days).ok());
                let travelers = prompt("Voyageurs (1-6): ")?.parse::<i64>().ok();
                agent
                    .apply_booking_command(
                        id,
                        WizardCommand::UpdateDetails(DetailsPatch {
                            departure_date: Some(departure_date),
                            duration,
                            travelers,
                        }),
                    )
                    .await?;
                WizardCommand::Next
            }
            WizardStep::PersonalInfo => {
                let patch = InfoPatch {
                    first_name: Some(prompt("Prénom: ")?),
                    last_name: Some(prompt("Nom: ")?),
                    email: Some(prompt("Email: ")?),
                    phone: Some(prompt("Téléphone: ")?),
                };
                agent
                    .apply_booking_command(id, WizardCommand::UpdateInfo(patch))
                    .await?;
                WizardCommand::Next
            }
            WizardStep::Confirmation => {
                let current = agent
                    .booking(id)
                    .await?
                    .context("booking disappeared")?;
                let summary = current
                    .wizard
                    .summary()
                    .context("booking has no destination")?;
                println!("{}", serde_json::to_string_pretty(&summary)?);
                println!("Total: {}", format_price(summary.total_price));
                match prompt("Confirmer ? [o]ui / [r]etour / [q]uitter: ")?.as_str() {
                    "o" | "oui" => WizardCommand::Confirm,
                    "r" | "retour" => WizardCommand::Prev,
                    "q" => bail!("booking abandoned"),
                    _ => continue,
                }
            }
        };

        let update = agent.apply_booking_command(id, command).await?;
        match update.outcome.transition {
            Some(Transition::Confirmed) => {
                println!("\nRéservation confirmée ! Référence {id}");
                break;
            }
            Some(Transition::Blocked) => println!("Informations incomplètes, réessayez."),
            _ => {}
        }
        step = update.booking.wizard.step();
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        bail!("input closed");
    }
    Ok(line.trim().to_string())
}
