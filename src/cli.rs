use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

mod config;
mod list;
mod terminal;

use clap::ArgAction;
use list::List;
use shortages::{
    Actor, Category, Config, JsonStore, NewRequest, Priority, Registered, RequestService, Room,
    ServiceError, Title,
};
use terminal::Tone;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the configuration and data files
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// The acting user. Prompted for when omitted.
    #[arg(short, long, env = "SHORTAGES_USER", global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(&self.root, self.user)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Register a new request
    ///
    /// A request with the same title and room replaces an existing one only
    /// if its priority is higher.
    Register(Register),

    /// List requests, highest priority first
    ///
    /// Admins see every request, other users only their own.
    List(List),

    /// Delete a request
    ///
    /// Users may delete their own requests; admins may delete any.
    Delete(Delete),

    /// Show or modify configuration settings
    Config(config::Command),
}

impl Command {
    fn run(self, root: &Path, user: Option<String>) -> anyhow::Result<()> {
        match self {
            Self::Register(command) => command.run(&Session::open(root, user)?)?,
            Self::List(command) => command.run(&Session::open(root, user)?)?,
            Self::Delete(command) => command.run(&Session::open(root, user)?)?,
            Self::Config(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// The acting user and a service bound to the data file under the root.
pub struct Session {
    actor: Actor,
    service: RequestService<JsonStore>,
}

impl Session {
    fn open(root: &Path, user: Option<String>) -> anyhow::Result<Self> {
        let config = Config::load_or_default(root).map_err(|e| anyhow::anyhow!("{e}"))?;
        let name = resolve_user(user, std::io::stdin().is_terminal())?;

        Ok(Self::new(root, &config, Actor::resolve(name, &config)))
    }

    fn new(root: &Path, config: &Config, actor: Actor) -> Self {
        let store = JsonStore::new(root.join(config.data_file()));
        tracing::debug!(
            user = actor.name(),
            admin = actor.is_admin(),
            "Using data file {}",
            store.path().display()
        );
        Self {
            actor,
            service: RequestService::new(store),
        }
    }
}

/// Picks the acting user from `--user`/`SHORTAGES_USER`, prompting for one
/// only when stdin is interactive.
fn resolve_user(user: Option<String>, interactive: bool) -> anyhow::Result<String> {
    let name = match user {
        Some(name) => name,
        None if interactive => dialoguer::Input::<String>::new()
            .with_prompt("Your name")
            .interact_text()?,
        None => anyhow::bail!("no user given; pass --user or set SHORTAGES_USER"),
    };

    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("user name must not be empty");
    }
    Ok(name.to_string())
}

/// Turns a service error into the message shown to the user.
///
/// Rejections are shown as they are. Storage failures have already been
/// logged by the service and are reported without internal detail.
fn user_facing(error: ServiceError, action: &str) -> anyhow::Error {
    if error.is_rejection() {
        anyhow::Error::new(error)
    } else {
        anyhow::anyhow!("an unexpected error occurred while {action}")
    }
}

#[derive(Debug, clap::Parser)]
pub struct Register {
    /// The request title
    #[arg(long, short)]
    title: Title,

    /// The room: MeetingRoom, Kitchen or Bathroom
    #[arg(long)]
    room: Room,

    /// The category: Electronics, Food or Other
    #[arg(long, short)]
    category: Category,

    /// Priority from 1 (low) to 10 (high)
    #[arg(long, short)]
    priority: Priority,
}

impl Register {
    #[instrument(skip(session))]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let new = NewRequest {
            title: self.title,
            room: self.room,
            category: self.category,
            priority: self.priority,
        };

        let outcome = session
            .service
            .register(new, &session.actor)
            .map_err(|e| user_facing(e, "registering the request"))?;

        println!("{}", Tone::Success.paint(&registration_message(&outcome)));
        Ok(())
    }
}

fn registration_message(outcome: &Registered) -> String {
    let request = outcome.request();
    let stored = format!(
        "'{}' in {} (priority {})",
        request.title(),
        request.room(),
        request.priority()
    );
    match outcome {
        Registered::Created(_) => format!("✅ Registered {stored}"),
        Registered::Replaced { previous, .. } => format!(
            "✅ Registered {stored}, replacing priority {} from {}",
            previous.priority(),
            previous.owner()
        ),
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The title of the request to delete (case-insensitive)
    #[arg(long, short)]
    title: String,

    /// The room of the request to delete
    #[arg(long)]
    room: Room,
}

impl Delete {
    #[instrument(skip(session))]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let removed = session
            .service
            .delete(&self.title, self.room, &session.actor)
            .map_err(|e| user_facing(e, "deleting the request"))?;

        println!(
            "{}",
            Tone::Success.paint(&format!(
                "✅ Deleted '{}' in {}",
                removed.title(),
                removed.room()
            ))
        );
        Ok(())
    }
}
