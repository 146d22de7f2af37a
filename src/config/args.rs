use crate::config::toml_config::TomlConfig;
use crate::core::mappers::CarForm;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Used when neither the config file nor `--session-file` names one.
pub const DEFAULT_SESSION_FILE: &str = ".roadready-session.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "roadready")]
#[command(about = "Command-line client for the RoadReady car rental API")]
pub struct CliConfig {
    /// TOML config file; `${VAR}` references are expanded from the environment
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "API base URL, e.g. http://localhost:5047/api/")]
    pub base_url: Option<String>,

    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, help = "File that keeps remembered logins")]
    pub session_file: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Config file (or defaults) with command-line overrides applied on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        if let Some(url) = &self.base_url {
            config.api.base_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout_seconds = timeout;
        }
        if let Some(file) = &self.session_file {
            config.session.file = Some(file.clone());
        }
        if config.session.file.is_none() {
            config.session.file = Some(DEFAULT_SESSION_FILE.to_string());
        }
        if self.json_logs {
            config.logging.json = true;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and store the token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Keep the session only for this process
        #[arg(long)]
        no_remember: bool,
    },
    Logout,
    /// Show the signed-in user and role
    Whoami,
    Signup(SignupArgs),
    /// List the public fleet
    Cars {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        fuel: Option<String>,
        #[arg(long)]
        seats: Option<u32>,
    },
    /// Cars free between two days
    Search(SearchArgs),
    Locations,
    Quote {
        #[arg(long)]
        car_id: i64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    Book {
        #[arg(long)]
        car_id: i64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        pickup_location: i64,
        #[arg(long)]
        dropoff_location: i64,
    },
    Bookings,
    Cancel {
        booking_id: i64,
    },
    Issues,
    ReportIssue {
        #[arg(long)]
        booking_id: i64,
        #[arg(long = "type", default_value = "Vehicle")]
        issue_type: String,
        #[arg(long)]
        description: String,
    },
    Review {
        #[arg(long)]
        booking_id: i64,
        #[arg(long, default_value_t = 5)]
        rating: u8,
        #[arg(long, default_value = "")]
        comment: String,
    },
    #[command(subcommand)]
    Fleet(FleetCommand),
    #[command(subcommand)]
    Agent(AgentCommand),
    /// List all users (admin)
    Users,
}

#[derive(Debug, Clone, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm: String,
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    #[arg(long)]
    pub brand_id: Option<i64>,
    #[arg(long)]
    pub fuel_type: Option<String>,
    #[arg(long)]
    pub transmission: Option<String>,
    #[arg(long)]
    pub min_seats: Option<u32>,
    #[arg(long)]
    pub max_rate: Option<f64>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum FleetCommand {
    List {
        #[arg(long, default_value = "")]
        query: String,
    },
    Add(CarFormArgs),
    Update {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        form: CarFormArgs,
    },
    Delete {
        car_id: i64,
    },
    Status {
        car_id: i64,
        status_id: i64,
    },
    /// Add a brand
    Brand {
        name: String,
    },
    Export {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "")]
        query: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum AgentCommand {
    Cars,
    /// Flip a car between Available and Unavailable
    Toggle {
        car_id: i64,
    },
    Issues,
    Maintenance {
        #[arg(long)]
        car_id: Option<i64>,
        #[arg(long, default_value = "")]
        description: String,
    },
    Resolve {
        request_id: i64,
    },
}

/// Car fields as typed; blank flags are left unset. Validated when shaped into a request.
#[derive(Debug, Clone, Default, Args)]
pub struct CarFormArgs {
    #[arg(long, default_value = "")]
    pub brand_id: String,
    #[arg(long = "model", default_value = "")]
    pub model_name: String,
    #[arg(long, default_value = "")]
    pub year: String,
    #[arg(long, default_value = "")]
    pub daily_rate: String,
    #[arg(long, default_value = "")]
    pub seats: String,
    #[arg(long, default_value = "")]
    pub transmission: String,
    #[arg(long, default_value = "")]
    pub fuel_type: String,
    #[arg(long, default_value = "")]
    pub status_id: String,
    #[arg(long, default_value = "")]
    pub image_url: String,
}

impl From<CarFormArgs> for CarForm {
    fn from(args: CarFormArgs) -> Self {
        CarForm {
            brand_id: args.brand_id,
            model_name: args.model_name,
            year: args.year,
            daily_rate: args.daily_rate,
            seats: args.seats,
            transmission: args.transmission,
            fuel_type: args.fuel_type,
            status_id: args.status_id,
            image_url: args.image_url,
        }
    }
}
