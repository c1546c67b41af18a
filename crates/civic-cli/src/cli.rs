//! Command-line arguments.

use civic_core::{RequestStatus, ServiceRequestId};
use clap::{Parser, Subcommand};

/// CLI structure
#[derive(Parser, Debug)]
#[command(name = "civic")]
#[command(about = "Municipal service request tracker")]
#[command(version)]
pub struct Cli {
    /// Directory holding default.toml, {environment}.toml and local.toml
    #[arg(long, global = true, default_value = "./config")]
    pub config_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Main commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Submit a new service request
    Create {
        /// Short summary, e.g. "Buraco na rua"
        title: String,
        /// What is wrong
        #[arg(long, short)]
        description: String,
        /// Service category
        #[arg(long, short)]
        category: String,
        /// Neighborhood
        #[arg(long, short)]
        neighborhood: String,
        #[arg(long, allow_negative_numbers = true, requires = "longitude")]
        latitude: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "latitude")]
        longitude: Option<f64>,
        /// Photo URL (repeatable)
        #[arg(long = "photo")]
        photos: Vec<String>,
    },

    /// Show one service request
    Get {
        id: ServiceRequestId,
    },

    /// List service requests, newest first
    List {
        #[arg(long, default_value_t = 0)]
        skip: u64,
        #[arg(long, default_value_t = 100)]
        limit: u64,
    },

    /// Change the status of a service request
    UpdateStatus {
        id: ServiceRequestId,
        /// pendente, em_andamento or concluido
        status: RequestStatus,
    },

    /// Delete every cache entry
    ClearCache,

    /// Show which cache backend is active
    CacheStatus,
}
