use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use species_catalog::card::{CardActions, CardContext, Confirmation, DeleteOutcome, RecordCard};
use species_catalog::config::{default_config_path, find_config_file, get_config, load_config, Config};
use species_catalog::models::{Kingdom, RecordDraft};
use species_catalog::notify::RefreshFlag;
use species_catalog::search::{CallbackSink, ChannelSink, SearchWorkflow, WikipediaClient};
use species_catalog::store::{RecordStore, RestStore};
use species_catalog::ui::{
    self, render_card, render_details, render_record_table, render_search_outcome, status_line,
    ConsoleNotifier, Status,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Species Catalog - catalogue species records, prefilled from Wikipedia
#[derive(Parser, Debug)]
#[command(name = "species-catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Catalogue species records, prefilled from Wikipedia search", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Act as this user (overrides viewer.user_id)
    #[arg(long = "as", global = true, value_name = "USER_ID")]
    viewer: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search Wikipedia for an image and an introductory paragraph
    #[command(alias = "s")]
    Search {
        /// Scientific or common name to search for
        query: Option<String>,
    },

    /// List all records as cards
    #[command(alias = "ls")]
    List {
        /// Show a compact table instead of cards
        #[arg(long)]
        table: bool,
    },

    /// Show the details of one record
    Show {
        /// Record id
        id: i64,
    },

    /// Create a record
    Add {
        #[command(flatten)]
        fields: RecordFields,
    },

    /// Edit a record you own
    Edit {
        /// Record id
        id: i64,

        #[command(flatten)]
        fields: RecordFields,
    },

    /// Delete a record you own
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: i64,

        /// Skip the confirmation question
        #[arg(long, short)]
        yes: bool,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
struct RecordFields {
    /// Scientific name
    #[arg(long)]
    scientific_name: Option<String>,

    /// Common name
    #[arg(long)]
    common_name: Option<String>,

    /// Kingdom (Animalia, Plantae, Fungi, Protista, Archaea, Bacteria)
    #[arg(long)]
    kingdom: Option<Kingdom>,

    /// Total population
    #[arg(long)]
    population: Option<i64>,

    /// Image URL
    #[arg(long)]
    image: Option<String>,

    /// Description
    #[arg(long)]
    description: Option<String>,

    /// Prefill image and description from a Wikipedia search
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default configuration file
    Init {
        /// Where to write it (default: per-user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        load_config(&config_path)?
    } else {
        get_config()?
    };

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("species_catalog={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(config_path) = &cli.config {
        tracing::debug!("Using config file: {}", config_path.display());
    }

    let viewer = cli
        .viewer
        .clone()
        .or_else(|| config.viewer.user_id.clone());

    match cli.command {
        Commands::Search { query } => {
            let workflow = search_workflow(&config)?;
            workflow.set_input(query.unwrap_or_default());

            let sink = CallbackSink::new(
                |url: &str| tracing::debug!(url, "Image found"),
                |text: &str| tracing::debug!(chars = text.chars().count(), "Description found"),
            );

            match workflow.submit_input(&sink).await? {
                Some(outcome) => print!("{}", render_search_outcome(&outcome)),
                None => {
                    if !cli.quiet {
                        eprintln!("{}", status_line(Status::Info, "Nothing to search for"));
                    }
                }
            }
        }

        Commands::List { table } => {
            let store = record_store(&config)?;
            list_records(store.as_ref(), viewer.as_deref().unwrap_or_default(), table).await?;
        }

        Commands::Show { id } => {
            let store = record_store(&config)?;
            let record = store
                .get(id)
                .await?
                .with_context(|| format!("No record with id {}", id))?;

            let mut card = RecordCard::new(record, viewer.unwrap_or_default());
            card.open_details();
            if let Some(details) = card.details() {
                println!("{}", render_details(&details));
            }
        }

        Commands::Add { fields } => {
            let author = viewer.context("A user id is required: pass --as or set viewer.user_id")?;
            let store = record_store(&config)?;

            let mut draft = RecordDraft::new();
            prefill_from_search(&config, &mut draft, fields.search.as_deref()).await?;
            apply_fields(&mut draft, &fields);

            let record = draft.validate(&author)?;
            let stored = store.insert(&record).await?;

            if !cli.quiet {
                eprintln!(
                    "{}",
                    status_line(
                        Status::Success,
                        &format!("Created #{} {}", stored.id, stored.scientific_name)
                    )
                );
            }
        }

        Commands::Edit { id, fields } => {
            let store = record_store(&config)?;
            let record = store
                .get(id)
                .await?
                .with_context(|| format!("No record with id {}", id))?;

            let card = RecordCard::new(record.clone(), viewer.unwrap_or_default());
            if !card.actions().contains(CardActions::EDIT) {
                bail!("Only the author of '{}' may edit it", record.scientific_name);
            }

            let mut draft = RecordDraft::from_record(&record);
            prefill_from_search(&config, &mut draft, fields.search.as_deref()).await?;
            apply_fields(&mut draft, &fields);

            let payload = draft.validate(&record.author)?;
            let stored = store.update(id, &payload).await?;

            if !cli.quiet {
                eprintln!(
                    "{}",
                    status_line(
                        Status::Success,
                        &format!("Updated #{} {}", stored.id, stored.scientific_name)
                    )
                );
            }
        }

        Commands::Delete { id, yes } => {
            let store = record_store(&config)?;
            let record = store
                .get(id)
                .await?
                .with_context(|| format!("No record with id {}", id))?;

            let refresher = Arc::new(RefreshFlag::new());
            let ctx = CardContext {
                store: store.clone(),
                notifier: Arc::new(ConsoleNotifier),
                refresher: refresher.clone(),
            };

            let mut card = RecordCard::new(record, viewer.clone().unwrap_or_default());
            let prompt = card.request_delete()?;
            let answer = if yes {
                Confirmation::Yes
            } else {
                ask(prompt).await?
            };

            let outcome = card.resolve_delete(answer, &ctx).await?;
            if let DeleteOutcome::Failed(message) = outcome {
                tracing::debug!(%message, "Delete not applied");
            }

            if refresher.take() && !cli.quiet {
                list_records(store.as_ref(), viewer.as_deref().unwrap_or_default(), true).await?;
            }
        }

        Commands::Config(ConfigCommand::Init { path, force }) => {
            let path = path
                .or_else(default_config_path)
                .context("Could not determine a configuration directory; pass --path")?;

            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }

            Config::default().save(&path)?;
            eprintln!(
                "{}",
                status_line(Status::Success, &format!("Wrote {}", path.display()))
            );
        }

        Commands::Config(ConfigCommand::Show) => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn search_workflow(config: &Config) -> Result<SearchWorkflow> {
    let client = WikipediaClient::from_config(&config.encyclopedia)?;
    Ok(SearchWorkflow::new(
        Arc::new(client),
        Arc::new(ConsoleNotifier),
    ))
}

fn record_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    Ok(Arc::new(RestStore::from_config(&config.store)?))
}

/// Run a search and let the draft take whatever it finds
async fn prefill_from_search(
    config: &Config,
    draft: &mut RecordDraft,
    query: Option<&str>,
) -> Result<()> {
    let Some(query) = query else {
        return Ok(());
    };

    let workflow = search_workflow(config)?;
    let (sink, mut events) = ChannelSink::new();
    workflow.submit(Some(query), &sink).await?;
    drop(sink);

    while let Some(event) = events.recv().await {
        draft.apply(event);
    }
    Ok(())
}

/// Explicit flags win over anything a search prefilled
fn apply_fields(draft: &mut RecordDraft, fields: &RecordFields) {
    if let Some(name) = &fields.scientific_name {
        draft.scientific_name = name.clone();
    }
    if let Some(name) = &fields.common_name {
        draft.common_name = Some(name.clone());
    }
    if let Some(kingdom) = fields.kingdom {
        draft.kingdom = Some(kingdom);
    }
    if let Some(population) = fields.population {
        draft.total_population = Some(population);
    }
    if let Some(image) = &fields.image {
        draft.image = Some(image.clone());
    }
    if let Some(description) = &fields.description {
        draft.description = Some(description.clone());
    }
}

async fn list_records(store: &dyn RecordStore, viewer: &str, table: bool) -> Result<()> {
    let records = store.list().await?;

    if table || !ui::is_terminal() {
        println!("{}", render_record_table(&records));
        return Ok(());
    }

    for record in records {
        let id = record.id;
        let card = RecordCard::new(record, viewer);
        println!("{}", render_card(id, &card.view()));
    }
    Ok(())
}

/// Ask a yes/no question without blocking the runtime
async fn ask(prompt: &str) -> Result<Confirmation> {
    let prompt = prompt.to_string();
    let answer = tokio::task::spawn_blocking(move || -> std::io::Result<String> {
        use std::io::Write;

        eprint!("{} [y/N] ", prompt);
        std::io::stderr().flush()?;

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line)
    })
    .await??;

    Ok(Confirmation::from_answer(&answer))
}
