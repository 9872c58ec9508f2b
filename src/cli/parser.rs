use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for labgrade
/// CLI application to record lab events and grade them against deadlines
#[derive(Parser)]
#[command(
    name = "labgrade",
    version = env!("CARGO_PKG_VERSION"),
    about = "Lab-event telemetry and deadline-aware grading backed by SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use a configuration file other than ~/.labgrade/labgrade.conf
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, info)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(
            long = "dir",
            value_name = "DIR",
            help = "Directory with extra *.sql migrations (overrides config)"
        )]
        dir: Option<String>,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", default_value_t = 50, help = "Maximum rows to show")]
        limit: usize,
    },

    /// Record or list raw lab events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Configure lab base scores and deadlines
    Lab {
        #[command(subcommand)]
        action: LabAction,
    },

    /// Manually assigned final grades
    Override {
        #[command(subcommand)]
        action: OverrideAction,
    },

    /// Compute scores for a whole course or a single student
    Score {
        course: String,

        #[arg(long, requires = "student", help = "Lab code (with --student)")]
        lab: Option<String>,

        #[arg(long, requires = "lab", help = "Student login (with --lab)")]
        student: Option<String>,
    },

    /// Per-student timing statistics (JSON)
    Stats {
        course: String,

        #[arg(long, help = "Add human-readable timestamps and durations")]
        human: bool,
    },

    /// Export the finished / score sheet of a course
    Export {
        course: String,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long = "student", value_name = "STUDENT", help = "Restrict to these students")]
        students: Vec<String>,

        #[arg(long = "lab", value_name = "LAB", help = "Restrict to these labs")]
        labs: Vec<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// Append an event
    Add {
        course: String,
        lab: String,
        student: String,
        event_type: String,

        #[arg(
            long = "at",
            value_name = "WHEN",
            help = "Event time: Unix seconds, RFC 3339 or YYYY-MM-DD HH:MM[:SS] UTC (default: now)"
        )]
        at: Option<String>,

        #[arg(long)]
        comment: Option<String>,
    },

    /// List events of a course
    List {
        course: String,

        #[arg(long = "type", value_name = "EVENT_TYPE", help = "Only this event type")]
        event_type: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LabAction {
    /// Create or update a lab's base score and deadline
    Add {
        course: String,
        lab: String,

        #[arg(long, allow_negative_numbers = true)]
        score: i64,

        #[arg(
            long,
            value_name = "WHEN",
            help = "Inclusive deadline; a bare YYYY-MM-DD closes at 23:59:59 UTC"
        )]
        deadline: String,
    },

    /// List configured labs
    List { course: String },
}

#[derive(Subcommand)]
pub enum OverrideAction {
    /// Create or replace an override
    Set {
        course: String,
        lab: String,
        student: String,

        #[arg(long, allow_negative_numbers = true)]
        score: i64,

        #[arg(long, default_value = "")]
        reason: String,
    },

    /// List overrides of a course
    List { course: String },
}
