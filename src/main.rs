use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use proposal_builder::application::service::ProposalService;
use proposal_builder::config::load_catalog;
use proposal_builder::domain::catalog::{Catalog, ProgramType};
use proposal_builder::domain::ports::ProposalStoreBox;
use proposal_builder::domain::proposal::{ProposalDraft, ProposalStatus};
use proposal_builder::domain::selection::Selection;
use proposal_builder::infrastructure::in_memory::InMemoryProposalStore;
use proposal_builder::infrastructure::json_file::JsonFileProposalStore;
use proposal_builder::interfaces::csv::proposal_writer::ProposalWriter;
use proposal_builder::interfaces::format::format_currency;
use proposal_builder::interfaces::quote::{QuoteHeader, QuoteRenderer};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog JSON file. Uses the built-in catalog when omitted.
    #[arg(long, env = "PROPOSAL_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// JSON file holding saved proposals.
    #[arg(long, env = "PROPOSAL_DATA_FILE", global = true, conflicts_with = "db_path")]
    data_file: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List programs, tiers, add-ons and options
    Catalog,
    /// Price a selection without saving it
    Quote {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Price and save a proposal
    Save {
        #[command(flatten)]
        selection: SelectionArgs,
        #[arg(long, default_value = "")]
        client_name: String,
        #[arg(long)]
        client_email: Option<String>,
        /// Proposal date (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List saved proposals as CSV, newest first
    List,
    /// Show a saved proposal
    Show {
        id: Uuid,
        #[arg(long)]
        json: bool,
    },
    /// Change the status of a saved proposal
    Status { id: Uuid, status: ProposalStatus },
    /// Delete a saved proposal
    Delete { id: Uuid },
}

#[derive(Args)]
struct SelectionArgs {
    #[arg(long)]
    program: ProgramType,
    /// Tier id, the program's entry tier by default
    #[arg(long)]
    tier: Option<String>,
    /// In-person sessions per month
    #[arg(long, default_value_t = 0)]
    sessions: u32,
    /// Commitment length in months
    #[arg(long, default_value_t = 3)]
    commitment: u32,
    #[arg(long)]
    friends_and_family: bool,
    /// Add-on id, repeatable
    #[arg(long = "add-on")]
    add_ons: Vec<String>,
}

impl SelectionArgs {
    fn into_selection(self, catalog: &Catalog) -> Result<Selection> {
        let selected_tier_id = match self.tier {
            Some(tier) => tier,
            None => catalog
                .default_tier(self.program)
                .map(|tier| tier.id.clone())
                .ok_or_else(|| miette!("program '{}' has no tiers", self.program))?,
        };
        let selection = Selection {
            program_type: self.program,
            selected_tier_id,
            in_person_sessions: self.sessions,
            commitment_length: self.commitment,
            friends_and_family: self.friends_and_family,
            selected_add_ons: self.add_ons,
        };
        selection.validate(catalog).into_diagnostic()?;
        Ok(selection)
    }
}

fn open_store(data_file: Option<&Path>, db_path: Option<&Path>) -> Result<ProposalStoreBox> {
    if let Some(path) = data_file {
        return Ok(Box::new(JsonFileProposalStore::open(path).into_diagnostic()?));
    }

    if let Some(path) = db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            use proposal_builder::infrastructure::rocksdb::RocksDBStore;
            return Ok(Box::new(RocksDBStore::open(path).into_diagnostic()?));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        tracing::warn!(
            path = %path.display(),
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    Ok(Box::new(InMemoryProposalStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    proposal_builder::init_tracing();
    let cli = Cli::parse();

    let catalog = load_catalog(cli.catalog.as_deref()).into_diagnostic()?;
    let store = open_store(cli.data_file.as_deref(), cli.db_path.as_deref())?;
    let service = ProposalService::new(catalog, store);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Catalog => print_catalog(&mut out, service.catalog()).into_diagnostic()?,
        Command::Quote { selection, json } => {
            let selection = selection.into_selection(service.catalog())?;
            let breakdown = service.preview(&selection).into_diagnostic()?;
            if json {
                serde_json::to_writer_pretty(&mut out, &breakdown).into_diagnostic()?;
                writeln!(out).into_diagnostic()?;
            } else {
                QuoteRenderer::new(&mut out, service.catalog())
                    .render(None, &selection, &breakdown)
                    .into_diagnostic()?;
            }
        }
        Command::Save {
            selection,
            client_name,
            client_email,
            date,
        } => {
            let draft = ProposalDraft {
                client_name,
                client_email,
                proposal_date: date.unwrap_or_else(|| Local::now().date_naive()),
                selection: selection.into_selection(service.catalog())?,
            };
            let proposal = service.save(draft).await.into_diagnostic()?;
            writeln!(
                out,
                "Saved proposal #{} with id {}",
                proposal.proposal_number, proposal.id
            )
            .into_diagnostic()?;
        }
        Command::List => {
            let proposals = service.list().await.into_diagnostic()?;
            ProposalWriter::new(&mut out)
                .write_proposals(&proposals)
                .into_diagnostic()?;
        }
        Command::Show { id, json } => {
            let proposal = service
                .get(id)
                .await
                .into_diagnostic()?
                .ok_or_else(|| miette!("Proposal not found: {}", id))?;
            if json {
                serde_json::to_writer_pretty(&mut out, &proposal).into_diagnostic()?;
                writeln!(out).into_diagnostic()?;
            } else {
                let breakdown = service.breakdown_for(&proposal);
                writeln!(out, "Status: {}", proposal.status).into_diagnostic()?;
                QuoteRenderer::new(&mut out, service.catalog())
                    .render(
                        Some(&QuoteHeader::from(&proposal)),
                        &proposal.selection,
                        &breakdown,
                    )
                    .into_diagnostic()?;
            }
        }
        Command::Status { id, status } => {
            let proposal = service.update_status(id, status).await.into_diagnostic()?;
            writeln!(
                out,
                "Proposal #{} is now {}",
                proposal.proposal_number, proposal.status
            )
            .into_diagnostic()?;
        }
        Command::Delete { id } => {
            service.delete(id).await.into_diagnostic()?;
            writeln!(out, "Deleted proposal {}", id).into_diagnostic()?;
        }
    }

    Ok(())
}

fn print_catalog(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    for program in &catalog.programs {
        writeln!(out, "{} ({})", program.label, program.program_type)?;
        for tier in &program.tiers {
            writeln!(
                out,
                "  {:<26}{:<22}{}/mo",
                tier.id,
                tier.name,
                format_currency(tier.price)
            )?;
        }
    }

    writeln!(out, "Add-ons")?;
    for add_on in &catalog.add_ons {
        let billing = if add_on.is_one_time { "one-time" } else { "monthly" };
        writeln!(
            out,
            "  {:<26}{:<26}{} {}",
            add_on.id,
            add_on.name,
            format_currency(add_on.price),
            billing
        )?;
    }

    writeln!(out, "Commitments")?;
    for (months, discount) in &catalog.commitment_discounts {
        writeln!(out, "  {} months: -{}/mo", months, format_currency(*discount))?;
    }

    writeln!(
        out,
        "Sessions ({} each)",
        format_currency(catalog.session_unit_price)
    )?;
    for (count, option) in &catalog.session_options {
        writeln!(out, "  {:>2}: {}", count, option.label)?;
    }
    Ok(())
}
