use clap::{Parser, Subcommand};

/// Command-line interface definition for rHours
/// Track hours worked per day toward a total-hours goal
#[derive(Parser)]
#[command(
    name = "rhours",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track hours worked per day and forecast when the hours goal is reached",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

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

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create an account and sign in
    Register {
        email: String,

        /// Password (asked on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in
    Login {
        email: String,

        /// Password (asked on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and mark yourself offline
    Logout,

    /// Request or complete a password reset
    PasswordReset {
        #[arg(long, help = "Send a reset code to this email")]
        email: Option<String>,

        #[arg(long, requires = "new_password", help = "Reset code received by email")]
        code: Option<String>,

        #[arg(long = "new-password", requires = "code")]
        new_password: Option<String>,

        #[arg(
            long = "show-mail",
            requires = "email",
            help = "Print the messages queued for --email by the local mail outbox"
        )]
        show_mail: bool,
    },

    /// Record the hours of one day
    Set {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Hours worked, `absent` or an empty string for 0
        #[arg(allow_hyphen_values = true)]
        hours: String,
    },

    /// Show the calendar of a month
    Show {
        #[arg(long, value_name = "YYYY-MM", help = "Month to show (default: current)")]
        month: Option<String>,
    },

    /// Show totals and the expected completion date
    Summary,

    /// Set the hours worked before using rHours
    Previous {
        #[arg(allow_hyphen_values = true)]
        hours: String,
    },

    /// Delete every recorded day
    Reset {
        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Export the recorded hours as JSON
    Export {
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Replace the recorded hours with the content of an export file
    Import {
        file: String,

        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Administrator tools
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },

    /// Grant or revoke the admin claim (operator access to the local database)
    GrantAdmin {
        /// Uid or email of the account
        user: String,

        #[arg(long)]
        revoke: bool,
    },

    /// Stay signed in: send presence heartbeats and follow live presence
    Watch {
        #[arg(long, value_name = "SECS", help = "Stop after this many seconds")]
        duration: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List users with their presence
    Users {
        #[arg(long, help = "Only users currently online")]
        online: bool,
    },

    /// Delete an account and all its data
    Delete {
        uid: String,

        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}
