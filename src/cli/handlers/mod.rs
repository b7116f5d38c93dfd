use std::fs;
use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::tasks_io::{StoreError, Workspace, atomic_write};
use crate::model::task::day_name;
use crate::model::week::WeekKey;
use crate::ops::task_ops;
use crate::parse::{format_markdown, parse_markdown_with_report};
use crate::share;

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> HandlerResult {
    let json = cli.json;
    let root = match cli.dir {
        Some(ref dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let ws = Workspace::open(&root)?;
    tracing::debug!(root = %ws.root.display(), tasks = %ws.tasks_path().display(), "workspace");

    match cli.command {
        // Read commands
        Commands::Weeks => cmd_weeks(&ws, json),
        Commands::Show(args) => cmd_show(&ws, args, json),
        Commands::Share(args) => cmd_share(&ws, args, json),
        Commands::Open(args) => cmd_open(args, json),

        // Write commands
        Commands::Fmt(args) => cmd_fmt(&ws, args),
        Commands::Mark(args) => cmd_mark(&ws, args, json),
        Commands::Done(args) => cmd_done(&ws, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a week argument, defaulting to the current ISO week
fn resolve_week(arg: Option<&str>) -> Result<WeekKey, Box<dyn std::error::Error>> {
    match arg {
        Some(s) => Ok(s.parse()?),
        None => Ok(WeekKey::current()),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> HandlerResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_weeks(ws: &Workspace, json: bool) -> HandlerResult {
    let tasks = ws.load_tasks()?;
    let summaries = task_ops::week_summaries(&tasks);
    if json {
        return print_json(&summaries);
    }
    for s in &summaries {
        println!("{}  {} tasks ({} done)", s.week, s.tasks, s.done);
    }
    Ok(())
}

fn cmd_show(ws: &Workspace, args: ShowArgs, json: bool) -> HandlerResult {
    let week = resolve_week(args.week.as_deref())?;
    let tasks = ws.load_tasks()?;
    let in_week = task_ops::tasks_in_week(&tasks, &week);
    if json {
        return print_json(&WeekJson {
            week: week.to_string(),
            tasks: in_week,
        });
    }
    for line in render_week(&week, &in_week) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_share(ws: &Workspace, args: ShareArgs, json: bool) -> HandlerResult {
    let week = resolve_week(args.week.as_deref())?;
    let tasks = ws.load_tasks()?;
    let snapshot = task_ops::week_snapshot(&tasks, &week);
    if snapshot.is_empty() {
        return Err(format!("no tasks in week {}", week).into());
    }

    let slug = share::encode_share_data(&snapshot, &week.to_string());
    let url = share::share_url(&ws.config.share.base_url, &slug);
    tracing::info!(%week, tasks = snapshot.len(), bytes = slug.len(), "encoded share link");

    if json {
        return print_json(&ShareJson {
            week: week.to_string(),
            slug,
            url,
        });
    }
    println!("{}", url);
    Ok(())
}

fn cmd_open(args: OpenArgs, json: bool) -> HandlerResult {
    let slug = share::extract_slug(&args.link);
    let data = share::decode_share_data(slug).ok_or("share link not found")?;
    tracing::debug!(version = data.version, tasks = data.tasks.len(), "decoded share link");

    if json {
        return print_json(&data);
    }
    print!("{}", format_markdown(&data.tasks));
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_fmt(ws: &Workspace, args: FmtArgs) -> HandlerResult {
    let path = ws.tasks_path();
    let source = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    let (tasks, dropped) = parse_markdown_with_report(&source);
    for d in &dropped {
        eprintln!("warning: line {}: {}: {}", d.line, d.reason, d.text.trim());
    }
    let formatted = format_markdown(&tasks);

    if formatted == source {
        return Ok(());
    }
    if args.check {
        return Err(format!("{} is not formatted", path.display()).into());
    }
    atomic_write(&path, formatted.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    println!("formatted {} ({} tasks)", path.display(), tasks.len());
    Ok(())
}

fn cmd_mark(ws: &Workspace, args: MarkArgs, json: bool) -> HandlerResult {
    let day = task_ops::parse_day(&args.day)?;
    let mut tasks = ws.load_tasks()?;
    let status = task_ops::cycle_status(&mut tasks, &args.id, day)?;
    ws.save_tasks(&tasks)?;

    if json {
        return print_json(&MarkJson {
            id: args.id,
            day: day_name(day).to_string(),
            status,
        });
    }
    println!("{} {}: {}", args.id, day_name(day), status.name());
    Ok(())
}

fn cmd_done(ws: &Workspace, args: DoneArgs, json: bool) -> HandlerResult {
    let mut tasks = ws.load_tasks()?;
    let done = task_ops::toggle_done(&mut tasks, &args.id)?;
    ws.save_tasks(&tasks)?;

    if json {
        return print_json(&DoneJson { id: args.id, done });
    }
    println!("{} {}", args.id, if done { "done" } else { "open" });
    Ok(())
}
