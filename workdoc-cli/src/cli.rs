//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// WorkDoc360 operator CLI
#[derive(Debug, Parser)]
#[command(name = "workdoc", version, about)]
pub struct Cli {
    /// Config file (TOML); defaults to ./workdoc.toml when present
    #[arg(long, global = true, env = "WORKDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Subdomain candidate pool
    #[command(subcommand)]
    Pool(PoolCommand),
    /// Companies and their subdomains
    #[command(subcommand)]
    Company(CompanyCommand),
    /// DNS provider checks
    #[command(subcommand)]
    Dns(DnsCommand),
    /// Show the subdomain slug generated for a company name
    Slug {
        /// Company name
        name: String,
    },
    /// CSCS card checks
    #[command(subcommand)]
    Card(CardCommand),
    /// Compliance documents
    #[command(subcommand)]
    Document(DocumentCommand),
}

#[derive(Debug, Subcommand)]
pub enum PoolCommand {
    /// Candidate counts
    Stats,
    /// Create `count` new candidates, continuing the numbering
    Expand {
        count: usize,
    },
    /// Add explicit names to the pool, reusing existing DNS records
    Setup {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CompanyCommand {
    /// Register a company and provision its subdomain
    Register {
        name: String,
    },
    /// Show a company
    Show {
        id: i64,
    },
    /// Move a company to a new subdomain
    SetSubdomain {
        id: i64,
        slug: String,
    },
    /// Companies whose provisioning failed
    Failed,
    /// Retry provisioning for a failed company
    Retry {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum DnsCommand {
    /// Check the provider credentials and zone
    Test,
    /// List subdomain records in the zone
    List,
}

#[derive(Debug, Subcommand)]
pub enum CardCommand {
    /// Analyse a photo of a CSCS card
    Verify {
        image: PathBuf,
        /// MIME type; guessed from the file extension when omitted
        #[arg(long)]
        media_type: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// Generate a document for a company
    Generate(GenerateArgs),
    /// List a company's documents, newest first
    List {
        company_id: i64,
    },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    pub company_id: i64,
    /// risk_assessment, method_statement or iso9001_template
    pub document_type: String,
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub site: Option<String>,
    #[arg(long)]
    pub trade: Option<String>,
    #[arg(long)]
    pub details: Option<String>,
}
