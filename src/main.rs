use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use time::Date;

use tarot_booking::booking::parse_iso_date;
use tarot_booking::config::{DEFAULT_DB_FILE, DEFAULT_TIMEOUT_SECS};
use tarot_booking::{
    BookingDb, BookingForm, ConsultationRepository, ConsultationRequest, LogNotifier, StoreConfig,
};

#[derive(Parser)]
#[command(name = "tarot-booking")]
#[command(about = "Book tarot consultations and list stored bookings")]
struct Cli {
    /// Path to the SQLite booking database
    #[arg(long, value_name = "PATH", env = "TAROT_BOOKING_DB", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Upper bound for a single storage call, in seconds
    #[arg(
        long,
        value_name = "SECS",
        env = "TAROT_BOOKING_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the consultations table if it is missing
    Init,

    /// Print every stored consultation
    List {
        /// Print a JSON array instead of text
        #[arg(long)]
        json: bool,
    },

    /// Book a consultation and print the updated list
    Add {
        #[arg(long)]
        name: String,

        /// Email address or phone number
        #[arg(long)]
        contact: String,

        #[arg(long)]
        consultant: Option<String>,

        #[arg(long, default_value = "")]
        message: String,

        /// Consultation day, YYYY-MM-DD
        #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
        date: Option<Date>,
    },
}

fn parse_date_arg(value: &str) -> Result<Date, String> {
    parse_iso_date(value).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    tarot_booking::logging::init_logging(args.verbose);

    let config = StoreConfig::new(&args.db).with_timeout(Duration::from_secs(args.timeout_secs));

    // The one handle for this process; everything below borrows it.
    let db = BookingDb::open(&config)
        .await
        .with_context(|| format!("Failed to open booking database {:?}", args.db))?;

    match args.command {
        Command::Init => {
            db.initialize().await?;
            println!("Booking database ready at {:?}", args.db);
        }
        Command::List { json } => {
            db.initialize().await?;
            let consultations = db.list_all().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&consultations)?);
            } else {
                print_consultations(&consultations);
            }
        }
        Command::Add {
            name,
            contact,
            consultant,
            message,
            date,
        } => {
            let mut form = BookingForm::new();
            form.mount(&db).await?;
            form.name = name;
            form.contact = contact;
            form.consultant = consultant;
            form.message = message;
            if let Some(date) = date {
                form.select_date(date);
            }

            let stored = form.submit(&db, &LogNotifier).await?;
            println!("Booked consultation #{}", stored.id);
            if let Some(err) = form.last_error() {
                eprintln!("Warning: booking saved but list could not be reloaded: {err}");
            } else {
                print_consultations(form.consultations());
            }
        }
    }

    Ok(())
}

fn print_consultations(consultations: &[ConsultationRequest]) {
    println!("\n=== Consultations ===");
    if consultations.is_empty() {
        println!("No consultations booked yet.");
        return;
    }
    for item in consultations {
        println!("#{}", item.id);
        println!("  Name: {}", item.name);
        println!("  Contact: {}", item.contact);
        if let Some(consultant) = &item.consultant {
            println!("  Consultant: {consultant}");
        }
        if let Some(message) = &item.message {
            println!("  Message: {message}");
        }
        if let Some(date) = &item.date {
            println!("  Date: {date}");
        }
    }
}
