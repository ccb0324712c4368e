use clap::{Parser, Subcommand};

/// Command-line interface definition for BarBuzz
/// CLI application to track bar attendance with SQLite
#[derive(Parser)]
#[command(
    name = "barbuzz",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track who's out tonight: record buzz-ins, watch live counts, archive every morning",
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

    /// Manage the configuration file (view, check, migrate, or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Run configuration file migrations if needed")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
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

    /// Create an account and send its verification code
    Signup {
        /// Email address (must belong to the allowed domain)
        email: String,

        /// Display name shown on venue rosters
        #[arg(long = "name", help = "Display name shown on venue rosters")]
        display_name: String,
    },

    /// Confirm a signup with the emailed code
    Verify {
        email: String,

        /// The 6-digit code from the signup email
        code: String,
    },

    /// Record attendance for a venue
    Buzz {
        /// User id of the submitter (must be verified)
        user: String,

        /// Venue title from the catalog
        venue: String,

        #[arg(long = "here", help = "I am at the venue right now")]
        here: bool,

        #[arg(long = "planning", help = "I intend to go tonight")]
        planning: bool,
    },

    /// Show per-venue attendance counts
    Counts {
        /// Restrict to a single venue (default: whole catalog)
        venue: Option<String>,

        #[arg(long = "json", help = "Print the counts as JSON")]
        json: bool,
    },

    /// List the people attending a venue
    Who {
        venue: String,

        #[arg(
            long = "flag",
            default_value = "here",
            help = "Which flag to list: 'here' or 'planning'"
        )]
        flag: String,
    },

    /// Register a push token for a user
    Device {
        user: String,

        /// Expo push token, e.g. ExponentPushToken[xxxx]
        token: String,
    },

    /// Archive today's submissions and clear the flags (runs once, now)
    Reset,

    /// Send the weekend reminder push (runs once, now)
    Remind,

    /// Print the venue catalog
    Venues,

    /// Run the scheduler daemon (daily reset + weekend reminder)
    Serve,
}
