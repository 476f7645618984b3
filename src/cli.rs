// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is declared as Rust structs and
// enums, and clap generates the parsing, --help and --version for us.
//
// Subcommands:
// - scan: enumerate files and folders under a URL
// - result-view: render the tree stored in a result file
// - result-diff: compare the trees of two result files
// - dictionary-generate: build a dictionary from a local directory
// - version: print version information
//
// The raw values parsed here are validated and turned into a ScanConfig in
// src/config.rs.
// =============================================================================

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "dirhound",
    version,
    about = "Stalk the given url trying to enumerate files and folders",
    long_about = "dirhound is a tool that attempts to enumerate files and folders starting from a given URL. \
                  Every folder it finds is scanned again with the same dictionary, up to the configured depth."
)]
pub struct Cli {
    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the given URL
    ///
    /// Example: dirhound scan https://example.com -d dictionary.txt --scan-depth 2
    Scan(ScanArgs),

    /// Read a scan output file and render the folder tree
    #[command(alias = "result.view")]
    ResultView {
        /// Result file to read
        #[arg(short = 'r', long)]
        result_file: PathBuf,
    },

    /// Print the differences between the trees of 2 result files
    #[command(alias = "result.diff")]
    ResultDiff {
        /// First result file to read
        #[arg(short = 'f', long)]
        first: PathBuf,

        /// Second result file to read
        #[arg(short = 's', long)]
        second: PathBuf,
    },

    /// Generate a dictionary from the given folder
    #[command(alias = "dictionary.generate")]
    DictionaryGenerate {
        /// Folder to walk
        path: PathBuf,

        /// Where to write the dictionary (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write the full path of every file instead of distinct names
        #[arg(long)]
        absolute_only: bool,
    },

    /// Print the current version
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// URL to scan (e.g., https://example.com/app)
    pub url: String,

    /// Dictionary to use for the scan (path to local file or remote url)
    #[arg(short = 'd', long)]
    pub dictionary: String,

    /// Timeout in milliseconds (used when fetching remote dictionary)
    #[arg(long, default_value_t = 50_000)]
    pub dictionary_get_timeout: u64,

    /// Comma separated list of http methods to use; eg: GET,POST,PUT
    #[arg(long, value_delimiter = ',', default_value = "GET")]
    pub http_methods: Vec<String>,

    /// Comma separated list of http statuses to ignore when showing and processing results; eg: 404,301
    #[arg(long, value_delimiter = ',', default_value = "404")]
    pub http_statuses_to_ignore: Vec<u16>,

    /// Amount of threads for concurrent requests
    #[arg(short = 't', long, default_value_t = 3)]
    pub threads: usize,

    /// Timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub http_timeout: u64,

    /// Never send the same request (method, host, path) twice within a scan
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub http_cache_requests: bool,

    /// How many levels deep to recurse into discovered folders
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(0..))]
    pub scan_depth: i32,

    /// SOCKS5 host to use (e.g., 127.0.0.1:9050)
    #[arg(long)]
    pub socks5: Option<String>,

    /// User agent to use for http requests
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Retain any cookie sent by the server and send it on following requests
    #[arg(long)]
    pub use_cookie_jar: bool,

    /// Cookie to add to each request; eg name=value (can be specified multiple times)
    #[arg(long = "cookie")]
    pub cookies: Vec<String>,

    /// Header to add to each request; eg "Name: value" (can be specified multiple times)
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// Path where to store result output
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Skip checking the validity of SSL certificates
    #[arg(long)]
    pub no_check_certificate: bool,

    /// Ignore HTTP 2xx responses with an empty body
    #[arg(long)]
    pub ignore_empty_body: bool,

    /// Treat pages whose body matches this regex as 404
    #[arg(long)]
    pub assume_404_regex: Option<String>,

    /// Treat pages whose body matches REGEX as status CODE; eg 403=forbidden (repeatable)
    #[arg(long = "assume-status")]
    pub assume_statuses: Vec<String>,

    /// Recurse into results even when they are hidden by the status filter
    #[arg(long)]
    pub expand_ignored: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::parse_from(["dirhound", "scan", "http://mysite", "-d", "dict.txt"]);

        let Commands::Scan(args) = cli.command else {
            panic!("expected the scan command");
        };

        assert_eq!(args.http_methods, vec!["GET"]);
        assert_eq!(args.http_statuses_to_ignore, vec![404]);
        assert_eq!(args.threads, 3);
        assert_eq!(args.scan_depth, 3);
        assert_eq!(args.http_timeout, 5000);
        assert!(args.http_cache_requests);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_scan_lists_and_repeats() {
        let cli = Cli::parse_from([
            "dirhound",
            "-v",
            "scan",
            "http://mysite",
            "-d",
            "dict.txt",
            "--http-methods",
            "GET,POST",
            "--http-statuses-to-ignore",
            "404,301",
            "--http-cache-requests",
            "false",
            "--cookie",
            "a=1",
            "--cookie",
            "b=2",
        ]);

        let Commands::Scan(args) = cli.command else {
            panic!("expected the scan command");
        };

        assert!(cli.verbose);
        assert_eq!(args.http_methods, vec!["GET", "POST"]);
        assert_eq!(args.http_statuses_to_ignore, vec![404, 301]);
        assert!(!args.http_cache_requests);
        assert_eq!(args.cookies, vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_negative_depth_is_rejected() {
        let parsed = Cli::try_parse_from([
            "dirhound",
            "scan",
            "http://mysite",
            "-d",
            "dict.txt",
            "--scan-depth",
            "-1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_dotted_aliases() {
        let cli = Cli::parse_from(["dirhound", "result.view", "-r", "out.txt"]);
        assert!(matches!(cli.command, Commands::ResultView { .. }));
    }
}
