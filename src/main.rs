#[cfg(feature = "server")]
use std::net::SocketAddr;
use std::path::PathBuf;
#[cfg(feature = "server")]
use std::sync::Once;

use clap::{Parser, Subcommand};
use vaultvoice::{AppendOutcome, AppendRequest, DailyStore};

#[cfg(feature = "server")]
mod server;

#[derive(Debug, Parser)]
#[command(name = "vaultvoice", version, about = "Daily note capture CLI + API")]
struct Cli {
    /// Path to the vault root.
    #[arg(long, env = "VAULTVOICE_VAULT", global = true)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Append an entry to a daily note.
    Append {
        /// Entry text.
        content: String,

        /// Target date (YYYY-MM-DD); today when omitted.
        #[arg(long)]
        date: Option<String>,

        /// Tag to merge into the note's frontmatter (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Target section.
        #[arg(long)]
        section: Option<String>,

        /// Priority metadata for todo entries.
        #[arg(long)]
        priority: Option<String>,

        /// Due-date metadata for todo entries.
        #[arg(long)]
        due: Option<String>,

        /// Attachment filename to embed under the entry (repeatable).
        #[arg(long = "attach")]
        attachments: Vec<String>,
    },
    /// Print a daily note.
    Show {
        /// Target date; today when omitted.
        #[arg(long)]
        date: Option<String>,

        /// Print the parsed document as JSON instead of the raw file.
        #[arg(long)]
        json: bool,
    },
    /// List todo lines for a date.
    Todos {
        /// Target date; today when omitted.
        #[arg(long)]
        date: Option<String>,
    },
    /// Toggle a todo checkbox.
    Toggle {
        /// 0-based line index within the file.
        line: usize,

        /// Target date; today when omitted.
        #[arg(long)]
        date: Option<String>,
    },
    /// Print tags with frequencies over recent notes.
    Tags,
    /// Print recent notes with previews.
    Recent,
    /// Serve the HTTP API.
    #[cfg(feature = "server")]
    Serve {
        /// Bind address for the HTTP server.
        #[arg(long, default_value = "127.0.0.1:3939")]
        bind: SocketAddr,

        /// Bearer token required on /api routes.
        #[arg(long, env = "VAULTVOICE_API_KEY")]
        api_key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let vault = require_vault(cli.vault)?;

    match cli.command {
        Command::Append {
            content,
            date,
            tags,
            section,
            priority,
            due,
            attachments,
        } => {
            let store = DailyStore::open(&vault)?;
            let req = AppendRequest {
                date: date.unwrap_or_else(today),
                content,
                tags,
                section,
                priority,
                due,
                attachments,
            };
            match store.append(&req)? {
                AppendOutcome::Created => println!("created {}", req.date),
                AppendOutcome::Updated { tags_added } => {
                    println!("updated {}", req.date);
                    if !tags_added.is_empty() {
                        println!("tags added: {}", tags_added.join(", "));
                    }
                }
            }
        }
        Command::Show { date, json } => {
            let store = DailyStore::open(&vault)?;
            let doc = store.read(&date.unwrap_or_else(today))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                print!("{}", doc.raw);
            }
        }
        Command::Todos { date } => {
            let store = DailyStore::open(&vault)?;
            for entry in store.list_todos(&date.unwrap_or_else(today))? {
                let mark = if entry.done { "x" } else { " " };
                let mut line = format!("{}\t[{mark}] {}", entry.line_index, entry.text);
                if let Some(p) = &entry.priority {
                    line.push_str(&format!("\tpriority={p}"));
                }
                if let Some(d) = &entry.due {
                    line.push_str(&format!("\tdue={d}"));
                }
                println!("{line}");
            }
        }
        Command::Toggle { line, date } => {
            let store = DailyStore::open(&vault)?;
            let date = date.unwrap_or_else(today);
            let toggled = store.toggle_todo(&date, line)?;
            println!("toggled line {toggled} in {date}");
        }
        Command::Tags => {
            let store = DailyStore::open(&vault)?;
            for row in store.tag_counts()? {
                println!("{}\t#{}", row.count, row.tag);
            }
        }
        Command::Recent => {
            let store = DailyStore::open(&vault)?;
            for note in store.recent_notes()? {
                println!("{}\t[{}]\t{}", note.date, note.tags.join(", "), note.preview);
            }
        }
        #[cfg(feature = "server")]
        Command::Serve { bind, api_key } => {
            init_server_logging();
            server::run(vault, bind, api_key).await?;
        }
    }

    Ok(())
}

#[cfg(feature = "server")]
fn init_server_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    });
}

fn require_vault(vault: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    vault.ok_or_else(|| anyhow::anyhow!("--vault is required (or set VAULTVOICE_VAULT)"))
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
