//! CLI binary for browsing and managing perks.

use std::io::{self, Write as _};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use perks_rs::client::{PerksBlockingClient, PerksClient};
use perks_rs::models::{CreatedBy, Perk, PerkDraft, PerkId, PerkPatch};
use perks_rs::query::PerkQuery;
use perks_rs::render::{detail_path, discount_badge, render_view};
use perks_rs::view::{SearchView, ViewConfig, ViewSnapshot};
use tokio::io::{AsyncBufReadExt as _, BufReader};

/// Environment variable name for the API base URL.
const BASE_URL_ENV: &str = "PERKS_BASE_URL";

/// Environment variable name for the bearer token.
const TOKEN_ENV: &str = "PERKS_TOKEN";

/// Perks API CLI: search, browse and manage perks.
#[derive(Debug, Parser)]
#[command(name = "perks", version, about)]
struct Cli {
    /// Override the API base URL (default: $PERKS_BASE_URL or
    /// http://localhost:5000/api).
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// List public perks, optionally filtered by title or merchant.
    List {
        /// Case-insensitive title search.
        #[arg(long)]
        search: Option<String>,
        /// Exact merchant name.
        #[arg(long)]
        merchant: Option<String>,
    },
    /// Show one of your perks.
    Show {
        /// Perk identifier.
        id: String,
    },
    /// Create a perk.
    Create(CreateArgs),
    /// Update fields of one of your perks.
    Update(UpdateArgs),
    /// Delete one of your perks.
    Delete {
        /// Perk identifier.
        id: String,
    },
    /// Interactive search view driven by line commands on stdin.
    Browse {
        /// Quiet period before a typed change triggers a search.
        #[arg(long, default_value_t = 500, value_name = "MS")]
        quiet_ms: u64,
    },
}

/// Arguments for the `create` subcommand.
#[derive(Debug, Args)]
struct CreateArgs {
    /// Perk title.
    #[arg(long)]
    title: String,
    /// Perk category.
    #[arg(long)]
    category: String,
    /// Merchant offering the perk.
    #[arg(long)]
    merchant: Option<String>,
    /// Discount percentage.
    #[arg(long)]
    discount: Option<f64>,
    /// Free-form description.
    #[arg(long)]
    description: Option<String>,
}

/// Arguments for the `update` subcommand.
#[derive(Debug, Args)]
struct UpdateArgs {
    /// Perk identifier.
    id: String,
    /// New title.
    #[arg(long)]
    title: Option<String>,
    /// New category.
    #[arg(long)]
    category: Option<String>,
    /// New merchant.
    #[arg(long)]
    merchant: Option<String>,
    /// New discount percentage.
    #[arg(long)]
    discount: Option<f64>,
    /// New description.
    #[arg(long)]
    description: Option<String>,
}

impl UpdateArgs {
    /// Collects the given fields into a patch.
    fn to_patch(&self) -> PerkPatch {
        PerkPatch {
            title: self.title.clone(),
            merchant: self.merchant.clone(),
            category: self.category.clone(),
            discount_percent: self.discount,
            description: self.description.clone(),
        }
    }
}

/// A line typed into the `browse` view.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    /// Replace the search text.
    Query(String),
    /// Replace the merchant filter.
    Merchant(String),
    /// Clear both filters.
    Reset,
    /// Search immediately.
    Now,
    /// Repeat the last search.
    Retry,
    /// Print the command list.
    Help,
    /// Leave the view.
    Quit,
    /// Blank line.
    Nothing,
}

impl BrowseCommand {
    /// Parses one input line.
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        match word.trim_end() {
            "" => Ok(Self::Nothing),
            "q" | "query" => Ok(Self::Query(rest.to_owned())),
            "m" | "merchant" => Ok(Self::Merchant(rest.to_owned())),
            "reset" => Ok(Self::Reset),
            "now" | "search" => Ok(Self::Now),
            "retry" => Ok(Self::Retry),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command `{other}`, type `help`")),
        }
    }
}

/// Help text for the `browse` view.
const BROWSE_HELP: &str = "\
commands:
  q <text>      set the title search (empty clears it)
  m <merchant>  set the merchant filter (empty clears it)
  reset         clear both filters
  now           search immediately
  retry         repeat the last search
  quit          leave";

/// Reads the bearer token from the environment.
fn read_token() -> Option<String> {
    std::env::var(TOKEN_ENV)
        .ok()
        .filter(|val| !val.trim().is_empty())
}

/// Resolves the base URL from the flag or the environment.
fn resolve_base_url(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var(BASE_URL_ENV).ok())
        .filter(|val| !val.trim().is_empty())
}

/// Prints an error line to stderr.
fn report(context: &str, err: &dyn core::fmt::Display) -> io::Result<()> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let base_url = resolve_base_url(cli.base_url);
    let token = read_token();

    dispatch(cli.command, base_url, token)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch(
    command: Command,
    base_url: Option<String>,
    token: Option<String>,
) -> io::Result<ExitCode> {
    match command {
        Command::List { search, merchant } => {
            let query = PerkQuery::new()
                .search(search.unwrap_or_default())
                .merchant(merchant.unwrap_or_default());
            with_client(base_url, token, |client| cmd_list(client, &query))
        }
        Command::Show { id } => {
            with_client(base_url, token, |client| cmd_show(client, &PerkId::new(id)))
        }
        Command::Create(args) => with_client(base_url, token, |client| cmd_create(client, args)),
        Command::Update(args) => with_client(base_url, token, |client| cmd_update(client, &args)),
        Command::Delete { id } => {
            with_client(base_url, token, |client| cmd_delete(client, &PerkId::new(id)))
        }
        Command::Browse { quiet_ms } => cmd_browse(base_url, token, quiet_ms),
    }
}

/// Builds a blocking client and hands it to `command`.
fn with_client<F>(base_url: Option<String>, token: Option<String>, command: F) -> io::Result<ExitCode>
where
    F: FnOnce(&PerksBlockingClient) -> io::Result<ExitCode>,
{
    let mut builder = PerksBlockingClient::builder();
    if let Some(url) = base_url {
        builder = builder.base_url(url);
    }
    if let Some(token) = token {
        builder = builder.token(token);
    }
    match builder.build() {
        Ok(client) => command(&client),
        Err(err) => {
            report("failed to build client", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `list` subcommand.
fn cmd_list(client: &PerksBlockingClient, query: &PerkQuery) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading perks...");
    let outcome = client.all_perks(query);
    spinner.finish_and_clear();

    match outcome {
        Ok(perks) => {
            print_perks_table(&perks)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to list perks", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `show` subcommand.
fn cmd_show(client: &PerksBlockingClient, id: &PerkId) -> io::Result<ExitCode> {
    match client.get_perk(id) {
        Ok(perk) => {
            print_perk_details(&perk)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to load perk", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `create` subcommand.
fn cmd_create(client: &PerksBlockingClient, args: CreateArgs) -> io::Result<ExitCode> {
    let mut draft = PerkDraft::new(args.title, args.category);
    if let Some(merchant) = args.merchant {
        draft = draft.merchant(merchant);
    }
    if let Some(discount) = args.discount {
        draft = draft.discount_percent(discount);
    }
    if let Some(description) = args.description {
        draft = draft.description(description);
    }

    match client.create_perk(&draft) {
        Ok(perk) => {
            writeln!(
                io::stdout().lock(),
                "{} {} {}",
                "Created".green().bold(),
                perk.title,
                detail_path(&perk.id).dimmed()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to create perk", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `update` subcommand.
fn cmd_update(client: &PerksBlockingClient, args: &UpdateArgs) -> io::Result<ExitCode> {
    let patch = args.to_patch();
    if patch.is_empty() {
        report("nothing to update", &"pass at least one field flag")?;
        return Ok(ExitCode::FAILURE);
    }

    match client.update_perk(&PerkId::new(args.id.clone()), &patch) {
        Ok(perk) => {
            writeln!(
                io::stdout().lock(),
                "{} {} {}",
                "Updated".green().bold(),
                perk.title,
                detail_path(&perk.id).dimmed()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to update perk", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `delete` subcommand.
fn cmd_delete(client: &PerksBlockingClient, id: &PerkId) -> io::Result<ExitCode> {
    match client.delete_perk(id) {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{} {id}", "Deleted".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report("failed to delete perk", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `browse` subcommand on a single-threaded runtime.
fn cmd_browse(
    base_url: Option<String>,
    token: Option<String>,
    quiet_ms: u64,
) -> io::Result<ExitCode> {
    let mut builder = PerksClient::builder();
    if let Some(url) = base_url {
        builder = builder.base_url(url);
    }
    if let Some(token) = token {
        builder = builder.token(token);
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(err) => {
            report("failed to build client", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let config = ViewConfig::new().quiet_period(core::time::Duration::from_millis(quiet_ms));
    runtime.block_on(browse(SearchView::new(client, config)))
}

/// Drives the search view from stdin until `quit` or end of input.
///
/// Every settled state is printed; intermediate loading states are not.
async fn browse(view: SearchView<PerksClient>) -> io::Result<ExitCode> {
    let mut updates = view.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    writeln!(io::stdout().lock(), "{}", "type `help` for commands".dimmed())?;
    view.mount().await;
    updates.mark_unchanged();
    print_view(&view.snapshot())?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match BrowseCommand::parse(&line) {
                    Ok(BrowseCommand::Query(text)) => view.set_query(text),
                    Ok(BrowseCommand::Merchant(name)) => view.set_merchant(name),
                    Ok(BrowseCommand::Reset) => view.reset(),
                    Ok(BrowseCommand::Now) => view.search_now().await,
                    Ok(BrowseCommand::Retry) => view.retry().await,
                    Ok(BrowseCommand::Help) => writeln!(io::stdout().lock(), "{BROWSE_HELP}")?,
                    Ok(BrowseCommand::Quit) => break,
                    Ok(BrowseCommand::Nothing) => {}
                    Err(message) => report("browse", &message)?,
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if !snapshot.loading {
                    print_view(&snapshot)?;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Prints a rendered view followed by a separator line.
fn print_view(snapshot: &ViewSnapshot) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", render_view(snapshot))?;
    writeln!(out, "{}", "---".dimmed())?;
    Ok(())
}

/// Prints perks as a formatted table.
fn print_perks_table(perks: &[Perk]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if perks.is_empty() {
        writeln!(out, "{}", "No perks found".yellow())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Discount").fg(Color::Cyan),
        Cell::new("Merchant").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Created by").fg(Color::Cyan),
        Cell::new("Link").fg(Color::Cyan),
    ]);

    for perk in perks {
        let discount_cell = discount_badge(perk).map_or_else(
            || Cell::new("-").fg(Color::DarkGrey),
            |badge| Cell::new(badge).fg(Color::Green),
        );
        let author = perk
            .created_by
            .as_ref()
            .and_then(CreatedBy::display_name)
            .unwrap_or("-");
        _ = table.add_row(vec![
            Cell::new(&perk.title),
            discount_cell,
            Cell::new(perk.merchant_name().unwrap_or("-")),
            Cell::new(&perk.category),
            Cell::new(author),
            Cell::new(detail_path(&perk.id)),
        ]);
    }

    writeln!(out, "{table}")?;
    writeln!(out, "{} perk(s)", perks.len())?;
    Ok(())
}

/// Prints every field of one perk.
fn print_perk_details(perk: &Perk) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", perk.title.bold())?;
    writeln!(out, "  {} {}", "id:".cyan(), perk.id)?;
    writeln!(out, "  {} {}", "category:".cyan(), perk.category)?;
    writeln!(
        out,
        "  {} {}",
        "merchant:".cyan(),
        perk.merchant_name().unwrap_or("-")
    )?;
    writeln!(
        out,
        "  {} {}",
        "discount:".cyan(),
        discount_badge(perk).unwrap_or_else(|| "-".to_owned())
    )?;
    if let Some(description) = perk.description.as_deref() {
        writeln!(out, "  {} {description}", "description:".cyan())?;
    }
    if let Some(author) = perk.created_by.as_ref().and_then(CreatedBy::display_name) {
        writeln!(out, "  {} {author}", "created by:".cyan())?;
    }
    if let Some(created) = perk.created_at {
        writeln!(out, "  {} {}", "created:".cyan(), created.format("%Y-%m-%d %H:%M"))?;
    }
    writeln!(out, "  {} {}", "link:".cyan(), detail_path(&perk.id))?;
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
