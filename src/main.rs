mod aggregate;
mod config;
mod db;
mod display;
mod error;
mod events;
mod models;
mod run;
mod tracker;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = run::Args::parse();
    config::init_logging(args.verbose);

    let db_path = config::resolve_db_path(args.db.as_deref())?;
    let db = db::Database::open(&db_path)?;
    let mut tracker = tracker::Tracker::new(db);
    let changes = tracker.subscribe();

    let painter = display::Painter {
        enabled: config::use_color(args.no_color),
    };
    let command = args.command.unwrap_or(run::Command::Summary {
        as_of: None,
        months: aggregate::DEFAULT_MONTHS_BACK,
    });
    run::as_cli(command, &mut tracker, painter)?;

    for change in changes.try_iter() {
        tracing::debug!(?change, "change committed");
    }
    Ok(())
}
