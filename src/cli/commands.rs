use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "sub-hunter")]
#[command(version, about = "SecurityTrails subdomain discovery and aggregation", long_about = None)]
pub struct Cli {
    /// Target domain, e.g. example.com
    pub domain: String,

    /// Which SecurityTrails endpoint to use
    #[arg(short, long, value_enum, default_value = "list")]
    pub method: Method,

    /// Output file to save hostnames (one per line)
    #[arg(short, long)]
    pub out: Option<String>,

    /// SecurityTrails API key (falls back to the SECURITYTRAILS_APIKEY env var)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Records per page for the search endpoint
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Maximum pages to fetch from the search endpoint
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Simple subdomain listing (GET)
    List,
    /// Paginated domain search (POST)
    Search,
    /// Run both endpoints and merge the results
    Both,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::List => "list",
            Method::Search => "search",
            Method::Both => "both",
        }
    }
}
