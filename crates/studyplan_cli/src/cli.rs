//! Command-line parsing and dispatch onto the JSON API.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use studyplan_api::{calendar, exams, notes, sessions, stats, ApiResponse};
use studyplan_core::config::{ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};

#[derive(Parser, Debug)]
#[command(
    name = "studyplan",
    version,
    about = "StudyPlan - notes, exam schedule and study statistics"
)]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = ENV_DB_PATH)]
    pub db: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = ENV_LOG_LEVEL)]
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files.
    #[arg(long, global = true, env = ENV_LOG_DIR)]
    pub log_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Note {
        #[command(subcommand)]
        command: NoteCommand,
    },
    Exam {
        #[command(subcommand)]
        command: ExamCommand,
    },
    Calendar {
        #[command(subcommand)]
        command: CalendarCommand,
    },
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    Stats {
        #[command(subcommand)]
        command: StatsCommand,
    },
    /// Aggregate a JSON file of time records without using the database.
    Aggregate { file: PathBuf },
}

#[derive(Args, Debug, Default)]
pub struct PageArgs {
    #[arg(long)]
    pub page: Option<String>,
    #[arg(long)]
    pub limit: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    Add {
        title: String,
        content: String,
        /// Display date; defaults to today as `DD/MM/YYYY`.
        #[arg(long)]
        date: Option<String>,
    },
    Show {
        id: i64,
    },
    Edit {
        id: i64,
        title: String,
        content: String,
        #[arg(long)]
        date: Option<String>,
    },
    Rm {
        id: i64,
    },
    /// Delete every note.
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ExamCommand {
    List {
        #[arg(long)]
        subject: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Add {
        title: String,
        subject: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    Show {
        id: String,
    },
    /// Replace an exam's details; the favorite flag is kept.
    Edit {
        id: String,
        title: String,
        subject: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    Rm {
        id: String,
    },
    /// Toggle the favorite flag.
    Fav {
        id: String,
    },
    Subjects,
    /// Add the demo exams when the schedule is empty.
    Seed,
}

#[derive(Subcommand, Debug)]
pub enum CalendarCommand {
    List,
    Add {
        title: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    Edit {
        id: String,
        title: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    Rm {
        id: String,
    },
    /// Replace the whole calendar with a JSON array of events read from FILE.
    Replace { file: PathBuf },
    /// Add the demo slot when the calendar is empty.
    Seed,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    Add {
        /// RFC 3339 start time.
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: Option<String>,
        /// Length in seconds.
        #[arg(long, allow_negative_numbers = true)]
        duration: Option<i64>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    Rm {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum StatsCommand {
    /// All four summary series.
    Summary {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Series, total and records for one granularity.
    Report {
        #[arg(long)]
        granularity: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Show the stored granularity, or store a new one.
    View { granularity: Option<String> },
}

/// Runs one command that does not need a database.
pub fn run_offline(command: &Command) -> Option<Result<ApiResponse>> {
    let Command::Aggregate { file } = command else {
        return None;
    };
    Some(
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read `{}`", file.display()))
            .map(|body| stats::aggregate_records(&body)),
    )
}

/// Runs one database-backed command.
pub fn run(command: Command, conn: &Connection) -> Result<ApiResponse> {
    let response = match command {
        Command::Note { command } => run_note(command, conn),
        Command::Exam { command } => run_exam(command, conn),
        Command::Calendar { command } => run_calendar(command, conn)?,
        Command::Session { command } => run_session(command, conn),
        Command::Stats { command } => run_stats(command, conn),
        Command::Aggregate { file } => {
            bail!("`aggregate {}` runs without a database", file.display())
        }
    };
    Ok(response)
}

fn run_note(command: NoteCommand, conn: &Connection) -> ApiResponse {
    match command {
        NoteCommand::List { paging } => {
            notes::list_notes(conn, paging.page.as_deref(), paging.limit.as_deref())
        }
        NoteCommand::Add {
            title,
            content,
            date,
        } => notes::create_note(conn, &note_body(title, content, date)),
        NoteCommand::Show { id } => notes::get_note(conn, id),
        NoteCommand::Edit {
            id,
            title,
            content,
            date,
        } => notes::update_note(conn, id, &note_body(title, content, date)),
        NoteCommand::Rm { id } => notes::delete_note(conn, id),
        NoteCommand::Clear => notes::delete_all_notes(conn),
    }
}

fn note_body(title: String, content: String, date: Option<String>) -> String {
    let date = date.unwrap_or_else(|| Utc::now().format("%d/%m/%Y").to_string());
    json!({ "title": title, "content": content, "date": date }).to_string()
}

fn run_exam(command: ExamCommand, conn: &Connection) -> ApiResponse {
    match command {
        ExamCommand::List { subject, paging } => exams::list_exams(
            conn,
            subject.as_deref(),
            paging.page.as_deref(),
            paging.limit.as_deref(),
        ),
        ExamCommand::Add {
            title,
            subject,
            start,
            end,
            room,
            note,
        } => exams::create_exam(conn, &exam_body(title, subject, start, end, room, note)),
        ExamCommand::Show { id } => exams::get_exam(conn, &id),
        ExamCommand::Edit {
            id,
            title,
            subject,
            start,
            end,
            room,
            note,
        } => exams::update_exam(
            conn,
            &id,
            &exam_body(title, subject, start, end, room, note),
        ),
        ExamCommand::Rm { id } => exams::delete_exam(conn, &id),
        ExamCommand::Fav { id } => exams::toggle_favorite(conn, &id),
        ExamCommand::Subjects => exams::list_subjects(conn),
        ExamCommand::Seed => exams::seed_demo(conn, Utc::now()),
    }
}

fn exam_body(
    title: String,
    subject: String,
    start: String,
    end: String,
    room: Option<String>,
    note: Option<String>,
) -> String {
    json!({
        "title": title,
        "subject": subject,
        "start": start,
        "end": end,
        "room": room,
        "note": note,
    })
    .to_string()
}

fn run_calendar(command: CalendarCommand, conn: &Connection) -> Result<ApiResponse> {
    let response = match command {
        CalendarCommand::List => calendar::list_events(conn),
        CalendarCommand::Add { title, start, end } => {
            let body = json!({ "title": title, "start": start, "end": end });
            calendar::add_event(conn, &body.to_string())
        }
        CalendarCommand::Edit {
            id,
            title,
            start,
            end,
        } => {
            let body = json!({ "title": title, "start": start, "end": end });
            calendar::update_event(conn, &id, &body.to_string())
        }
        CalendarCommand::Rm { id } => calendar::delete_event(conn, &id),
        CalendarCommand::Replace { file } => {
            let body = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            calendar::replace_events(conn, &body)
        }
        CalendarCommand::Seed => calendar::seed_demo(conn, Utc::now()),
    };
    Ok(response)
}

fn run_session(command: SessionCommand, conn: &Connection) -> ApiResponse {
    match command {
        SessionCommand::List { paging } => {
            sessions::list_sessions(conn, paging.page.as_deref(), paging.limit.as_deref())
        }
        SessionCommand::Add {
            start,
            end,
            duration,
            subject,
            note,
        } => {
            let mut body = Map::new();
            body.insert("startTime".to_string(), Value::String(start));
            if let Some(end) = end {
                body.insert("endTime".to_string(), Value::String(end));
            }
            if let Some(duration) = duration {
                body.insert("duration".to_string(), json!(duration));
            }
            if let Some(subject) = subject {
                body.insert("subject".to_string(), Value::String(subject));
            }
            if let Some(note) = note {
                body.insert("note".to_string(), Value::String(note));
            }
            sessions::record_session(conn, &Value::Object(body).to_string())
        }
        SessionCommand::Rm { id } => sessions::delete_session(conn, id),
    }
}

fn run_stats(command: StatsCommand, conn: &Connection) -> ApiResponse {
    match command {
        StatsCommand::Summary { from, to } => {
            stats::summaries(conn, from.as_deref(), to.as_deref())
        }
        StatsCommand::Report {
            granularity,
            from,
            to,
        } => stats::report(
            conn,
            granularity.as_deref(),
            from.as_deref(),
            to.as_deref(),
        ),
        StatsCommand::View { granularity: None } => stats::view_state(conn),
        StatsCommand::View {
            granularity: Some(granularity),
        } => stats::select_granularity(conn, &granularity),
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Command, NoteCommand};
    use clap::Parser;
    use studyplan_core::open_db_in_memory;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "studyplan",
            "note",
            "list",
            "--page",
            "2",
            "--db",
            "/tmp/plan.sqlite3",
        ])
        .unwrap();
        assert_eq!(
            cli.db.as_deref(),
            Some(std::path::Path::new("/tmp/plan.sqlite3"))
        );
        match cli.command {
            Command::Note {
                command: NoteCommand::List { paging },
            } => assert_eq!(paging.page.as_deref(), Some("2")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn note_add_then_list_round_trips_through_api() {
        let conn = open_db_in_memory().unwrap();
        let add = Cli::try_parse_from(["studyplan", "note", "add", "Chem", "moles", "--date", "x"])
            .unwrap();
        assert_eq!(run(add.command, &conn).unwrap().status, 201);

        let list = Cli::try_parse_from(["studyplan", "note", "list"]).unwrap();
        let response = run(list.command, &conn).unwrap();
        let body = response.json().unwrap();
        assert_eq!(body["extraInfo"]["total"], 1);
        assert_eq!(body["data"][0]["title"], "Chem");
    }

    #[test]
    fn negative_session_duration_is_accepted() {
        let conn = open_db_in_memory().unwrap();
        let add = Cli::try_parse_from([
            "studyplan",
            "session",
            "add",
            "--start",
            "2025-11-20T09:00:00Z",
            "--duration",
            "-600",
        ])
        .unwrap();
        let response = run(add.command, &conn).unwrap();
        assert_eq!(response.status, 201, "{}", response.body);
        assert_eq!(response.json().unwrap()["duration"], -600);
    }

    fn run_args(conn: &rusqlite::Connection, args: &[&str]) -> serde_json::Value {
        let cli = Cli::try_parse_from(std::iter::once("studyplan").chain(args.iter().copied()))
            .unwrap();
        let response = run(cli.command, conn).unwrap();
        assert!(response.is_success(), "{}", response.body);
        response.json().unwrap()
    }

    #[test]
    fn exam_edit_keeps_favorite_flag() {
        let conn = open_db_in_memory().unwrap();
        let seeded = run_args(&conn, &["exam", "seed"]);
        let favorite = &seeded["data"][1];
        assert_eq!(favorite["favorite"], true);
        let id = favorite["id"].as_str().unwrap();

        let edited = run_args(
            &conn,
            &[
                "exam",
                "edit",
                id,
                "Retake",
                "Math",
                "--start",
                "2025-12-10T09:00:00Z",
                "--end",
                "2025-12-10T11:00:00Z",
            ],
        );
        assert_eq!(edited["title"], "Retake");
        assert_eq!(edited["room"], serde_json::Value::Null);
        assert_eq!(edited["favorite"], true);
    }

    #[test]
    fn calendar_edit_moves_slot() {
        let conn = open_db_in_memory().unwrap();
        let added = run_args(
            &conn,
            &[
                "calendar",
                "add",
                "Review",
                "--start",
                "2025-11-24T10:00:00Z",
                "--end",
                "2025-11-24T11:00:00Z",
            ],
        );
        let id = added["id"].as_str().unwrap();

        run_args(
            &conn,
            &[
                "calendar",
                "edit",
                id,
                "Review",
                "--start",
                "2025-11-24T14:00:00Z",
                "--end",
                "2025-11-24T16:00:00Z",
            ],
        );
        let listed = run_args(&conn, &["calendar", "list"]);
        assert_eq!(listed["data"][0]["start"], "2025-11-24T14:00:00Z");
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    }
}
