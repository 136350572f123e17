use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use habit_domain::{demo::demo_habit_list, record::parse_day, HabitId, HabitStatus};
use habit_store::{HabitService, ImportMode, Scope, StoreConfig};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "habits", about = "Track daily habits and move them between stores")]
pub struct Cli {
    /// User whose list is read and written.
    #[arg(long, env = "HABITS_USER", default_value = "local", global = true)]
    pub user: String,

    /// Work on an anonymous session list; takes precedence over `--user`.
    #[arg(long, global = true)]
    pub session: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show live habits in display order.
    List,
    Add {
        name: String,
    },
    Remove {
        id: String,
    },
    Rename {
        id: String,
        name: String,
    },
    /// Mark a day done (today by default).
    Tick {
        id: String,
        #[arg(long, value_parser = day_arg)]
        day: Option<NaiveDate>,
        /// Mark the day as not done.
        #[arg(long)]
        undo: bool,
    },
    Star {
        id: String,
        #[arg(long)]
        off: bool,
    },
    Archive {
        id: String,
    },
    Unarchive {
        id: String,
    },
    /// Hide a habit for good; its data stays stored.
    Delete {
        id: String,
    },
    /// Set the display order; `moved` picks up the status of its new neighbours.
    Order {
        #[arg(long)]
        moved: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    Import {
        file: PathBuf,
        /// Overwrite the stored list instead of merging into it.
        #[arg(long)]
        replace: bool,
    },
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Merge a session's list into the current user's list.
    Reconcile {
        #[arg(long = "from-session")]
        from_session: String,
    },
    /// Seed the current scope with sample habits for the past week.
    Demo,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            store: StoreConfig::from_env()?,
        })
    }
}

impl Cli {
    fn scope(&self) -> Scope {
        match &self.session {
            Some(token) => Scope::Session(token.clone()),
            None => Scope::User(self.user.clone()),
        }
    }
}

pub fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let service = HabitService::new(config.store.build_adapter());
    let scope = cli.scope();
    info!(%scope, "running command");

    match cli.command {
        Command::List => {
            let list = service.habit_list(&scope)?;
            for habit in list.habits() {
                let star = if habit.star() { "*" } else { " " };
                println!(
                    "{star} {}  {:<50} {:<8} {} days",
                    habit.id(),
                    habit.name(),
                    habit.status(),
                    habit.ticked_days().len()
                );
            }
        }
        Command::Add { name } => {
            let id = service.add_habit(&scope, &name)?;
            println!("{id}");
        }
        Command::Remove { id } => {
            if !service.remove_habit(&scope, &HabitId::new(id))? {
                println!("nothing to remove");
            }
        }
        Command::Rename { id, name } => service.rename(&scope, &HabitId::new(id), &name)?,
        Command::Tick { id, day, undo } => {
            let day = day.unwrap_or_else(|| Local::now().date_naive());
            service.tick(&scope, &HabitId::new(id), day, !undo)?;
        }
        Command::Star { id, off } => service.set_star(&scope, &HabitId::new(id), !off)?,
        Command::Archive { id } => {
            service.set_status(&scope, &HabitId::new(id), HabitStatus::Archived)?
        }
        Command::Unarchive { id } => {
            service.set_status(&scope, &HabitId::new(id), HabitStatus::Active)?
        }
        Command::Delete { id } => {
            service.set_status(&scope, &HabitId::new(id), HabitStatus::SoftDeleted)?
        }
        Command::Order { moved, ids } => {
            let order = ids.into_iter().map(HabitId::new).collect();
            if let Some(status) = service.reorder(&scope, order, &HabitId::new(moved))? {
                println!("{status}");
            }
        }
        Command::Import { file, replace } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let mode = if replace {
                ImportMode::Replace
            } else {
                ImportMode::Merge
            };
            let report = service.import(&scope, &text, mode)?;
            println!("{report}");
        }
        Command::Export { out } => {
            let json = service.export(&scope)?;
            match out {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Command::Reconcile { from_session } => {
            let report = service.reconcile(&Scope::Session(from_session), &scope)?;
            println!("{report}");
        }
        Command::Demo => {
            let today = Local::now().date_naive();
            let days: Vec<NaiveDate> = (0..7).rev().map(|n| today - Duration::days(n)).collect();
            service.save(&scope, &demo_habit_list(&days))?;
        }
    }
    Ok(())
}

fn day_arg(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_day(value).map_err(|err| err.to_string())
}
