//! Command-line arguments.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, value_parser};
use fugitive_core::Period;

/// Fugitive Simple setup and record tool.
#[derive(Parser, Debug)]
#[command(name = "fugitive-setup", author, version)]
#[command(about = "Register the Fugitive Simple DocType and manage refrigerant emission records", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "FUGITIVE_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the DocType, then optionally add the sample purchases
    Setup {
        /// Add sample data without asking
        #[arg(long, conflicts_with = "no_samples")]
        with_samples: bool,

        /// Skip sample data without asking
        #[arg(long)]
        no_samples: bool,
    },

    /// Create the Fugitive Simple DocType
    CreateDoctype,

    /// Add the three sample purchases
    AddSamples,

    /// Compute tCO2e for one purchase without storing it
    Estimate {
        /// Amount purchased (A)
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        /// Purchase unit: Tonnes or kg
        #[arg(long)]
        unit: String,

        /// Global warming potential (B)
        #[arg(long, conflicts_with = "refrigerant", allow_negative_numbers = true)]
        gwp: Option<f64>,

        /// Refrigerant whose reference GWP to use
        #[arg(long)]
        refrigerant: Option<String>,
    },

    /// Store one purchase
    Add(AddArgs),

    /// Delete one stored purchase
    Delete {
        /// Serial number of the entry
        #[arg(long, value_parser = value_parser!(u32).range(1..))]
        s_no: u32,
    },

    /// List stored purchases
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Only entries of this company
        #[arg(long)]
        company: Option<String>,
    },

    /// Emission totals by month or year
    Summary {
        /// Bucket width
        #[arg(long, default_value = "month")]
        period: Period,

        /// Only entries of this company
        #[arg(long)]
        company: Option<String>,
    },

    /// Print the DocType definition
    Schema {
        /// Print JSON instead of a field table
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of `add`.
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Serial number, unique per dataset
    #[arg(long, value_parser = value_parser!(u32).range(1..))]
    pub s_no: u32,

    /// Entry date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Refrigerant type
    #[arg(long)]
    pub refrigerant: String,

    /// Amount purchased (A)
    #[arg(long, allow_negative_numbers = true)]
    pub amount: f64,

    /// Purchase unit: Tonnes or kg
    #[arg(long)]
    pub unit: String,

    /// Global warming potential (B); defaults to the refrigerant's reference value
    #[arg(long, allow_negative_numbers = true)]
    pub gwp: Option<f64>,

    /// Invoice number
    #[arg(long)]
    pub invoice: Option<String>,

    /// Number of units (D)
    #[arg(long, default_value_t = 1.0)]
    pub units: f64,

    /// Company
    #[arg(long)]
    pub company: Option<String>,

    /// Company unit
    #[arg(long)]
    pub company_unit: Option<String>,
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print one value by dotted key, e.g. `store.backend`
    Get {
        /// Dotted key
        key: String,
    },
}

impl Command {
    /// Returns `true` if the command needs the document store.
    pub fn needs_store(&self) -> bool {
        !matches!(
            self,
            Command::Estimate { .. } | Command::Schema { .. } | Command::Config { .. }
        )
    }
}
