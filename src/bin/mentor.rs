//! `mentor`: command-line stand-in for the browser popup.
//!
//!   mentor hint  <problem> [--code FILE] [--language python]
//!   mentor next  <problem>
//!   mentor show  <problem>
//!   mentor reset <problem>
//!   mentor forget <problem>
//!   mentor sweep
//!
//! `<problem>` is either a LeetCode problem URL or a bare slug.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};

use leetcode_mentor::history::{now_ms, HintStore};
use leetcode_mentor::mentor::{ClientError, HttpBackend, MentorSession, DEFAULT_SERVER, MAX_HINTS_PER_PROBLEM};
use leetcode_mentor::page::{LocalPage, ProblemPage, UNKNOWN_SLUG};
use leetcode_mentor::telemetry;

#[derive(Parser)]
#[command(name = "mentor", about = "Progressive LeetCode hints from the mentor server")]
struct Cli {
  /// Base URL of the hint server.
  #[arg(long, env = "MENTOR_SERVER", default_value = DEFAULT_SERVER)]
  server: String,

  /// Hint history file (defaults to the user data directory).
  #[arg(long, env = "MENTOR_STORE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Request the next hint level for a problem.
  Hint {
    problem: String,
    /// File holding the code written so far.
    #[arg(long)]
    code: Option<PathBuf>,
    #[arg(long, default_value = "python")]
    language: String,
  },
  /// Step to the next stored hint.
  Next { problem: String },
  /// Print the stored hints and which one is current.
  Show { problem: String },
  /// Clear the hints for a problem, keeping an empty record.
  Reset { problem: String },
  /// Delete the stored record for a problem entirely.
  Forget { problem: String },
  /// Remove hint histories older than seven days.
  Sweep,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  telemetry::init_with_default("warn,leetcode_mentor=info");

  let cli = Cli::parse();
  let store = Arc::new(HintStore::new(cli.store.clone().unwrap_or_else(HintStore::default_path)));

  // Same housekeeping the extension does whenever it starts.
  let removed = store.sweep(now_ms()).await?;
  let backend = HttpBackend::new(cli.server.clone())?;

  match cli.command {
    Command::Hint { problem, code, language } => {
      let user_code = match code {
        Some(path) => tokio::fs::read_to_string(&path)
          .await
          .with_context(|| format!("reading {}", path.display()))?,
        None => String::new(),
      };
      let page = LocalPage::new(problem, user_code);
      let mut session = MentorSession::open(store, backend, &page, language).await?;
      let hint = session.get_hint(&page).await?.to_string();
      println!("[{}/{}] {}", session.hints().len(), MAX_HINTS_PER_PROBLEM, hint);
    }
    Command::Next { problem } => {
      let page = LocalPage::new(problem, "");
      let mut session = MentorSession::open(store, backend, &page, "python").await?;
      match session.next().await? {
        Some(hint) => println!("{}", hint),
        None => println!("No further hints stored for {}", session.slug()),
      }
    }
    Command::Show { problem } => {
      let page = LocalPage::new(problem, "");
      let session = MentorSession::open(store, backend, &page, "python").await?;
      if session.hints().is_empty() {
        println!("No hints yet for {}", session.slug());
      }
      for (idx, hint) in session.hints().iter().enumerate() {
        let marker = if idx == session.current_index() { '>' } else { ' ' };
        println!("{} {}. {}", marker, idx + 1, hint);
      }
    }
    Command::Reset { problem } => {
      let page = LocalPage::new(problem, "");
      let mut session = MentorSession::open(store, backend, &page, "python").await?;
      session.reset().await?;
      println!("Cleared hints for {}", session.slug());
    }
    Command::Forget { problem } => {
      let page = LocalPage::new(problem, "");
      let slug = page.extract_context().problem_slug;
      if slug == UNKNOWN_SLUG {
        return Err(ClientError::NotProblemPage.into());
      }
      if store.remove(&slug).await? {
        println!("Deleted stored hints for {}", slug);
      } else {
        println!("Nothing stored for {}", slug);
      }
    }
    Command::Sweep => {
      println!("Removed {} stale hint histories from {}", removed, store.path().display());
    }
  }

  Ok(())
}
