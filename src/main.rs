// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, see src/logging.rs)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 2 = error)
//
// The scan handler wires the pieces together: dictionary -> producer ->
// scanner -> summarizer + output file. Everything else lives in the library
// crate (src/lib.rs) so the integration tests can reach it.
//
// Rust concepts used:
// - async/await: the scan runs on the tokio runtime
// - tokio::select!: wait for a result OR for Ctrl+C, whichever comes first
// - Arc<dyn Trait>: the scanner is built from trait objects
// =============================================================================

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use dirhound::cli::{Cli, Commands, ScanArgs};
use dirhound::client::{build_doer, HttpDoer};
use dirhound::config::ScanConfig;
use dirhound::output::{load_results, saver_for};
use dirhound::scan::{DictionaryProducer, Producer, ReProducer, Scanner};
use dirhound::summary::{diff_trees, ResultSummarizer, ResultTree};
use dirhound::termination::{forward_interrupts, TerminationHandler};
use dirhound::{dictionary, logging};

// Interrupts needed before we stop without waiting for the workers
const INTERRUPTS_BEFORE_EXIT: usize = 2;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;

    match cli.command {
        Commands::Scan(args) => handle_scan(&args).await?,
        Commands::ResultView { result_file } => handle_result_view(&result_file)?,
        Commands::ResultDiff { first, second } => handle_result_diff(&first, &second)?,
        Commands::DictionaryGenerate {
            path,
            out,
            absolute_only,
        } => handle_dictionary_generate(&path, out.as_deref(), absolute_only)?,
        Commands::Version => {
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(0)
}

// Handles the 'scan' subcommand
async fn handle_scan(args: &ScanArgs) -> Result<()> {
    let config = ScanConfig::from_args(args).context("failed to build config")?;

    let dictionary_doer = HttpDoer::new(&config.dictionary_client(), &config.url)
        .context("failed to build dictionary client")?;
    let words = dictionary::load(&config.dictionary, &dictionary_doer)
        .await
        .context("failed to build dictionary")?;

    let doer = build_doer(&config.client, &config.url).context("failed to build scanner client")?;

    let producer: Arc<dyn Producer> = Arc::new(DictionaryProducer::new(
        config.methods.clone(),
        words.clone(),
        config.depth,
    ));
    let reproducer = Arc::new(ReProducer::new(Arc::clone(&producer)));
    let scanner = Scanner::new(
        doer,
        producer,
        reproducer,
        Arc::new(config.result_filter()),
    );

    tracing::info!(
        url = %config.url,
        threads = config.threads,
        dictionary_length = words.len(),
        scan_depth = config.depth,
        timeout_ms = config.client.timeout.as_millis() as u64,
        socks5 = ?config.client.socks5.as_ref().map(|u| u.to_string()),
        cookies = ?config.client.cookies,
        cookie_jar = config.client.use_cookie_jar,
        headers = ?config.client.headers,
        user_agent = ?config.client.user_agent,
        "starting scan"
    );

    let mut saver = saver_for(config.out.as_deref()).context("failed to create output saver")?;
    let summarizer = ResultSummarizer::new();

    let token = CancellationToken::new();
    let mut results = scanner.scan(token.clone(), &config.url, config.threads);
    let termination = TerminationHandler::new(INTERRUPTS_BEFORE_EXIT);
    let mut interrupts = forward_interrupts(tokio::signal::ctrl_c);

    // The loop only breaks; the summary and the output file are handled the
    // same way for every exit path
    let outcome: Result<()> = loop {
        tokio::select! {
            Some(()) = interrupts.recv() => {
                termination.signal_termination();
                token.cancel();

                if termination.should_terminate() {
                    tracing::info!("received interrupt, terminating...");
                    break Ok(());
                }

                tracing::info!(
                    "received interrupt, trying to shut down gracefully, another interrupt will terminate the application"
                );
            }
            result = results.recv() => {
                let Some(result) = result else {
                    tracing::debug!("result channel closed, scan should be complete");
                    break Ok(());
                };

                if let Err(e) = saver.save(&result) {
                    break Err(e.context("failed to add output to file"));
                }
                summarizer.add(result);
            }
        }
    };

    token.cancel();

    let stdout = io::stdout();
    summarizer
        .summarize(&mut stdout.lock())
        .context("failed to print summary")?;

    if let Err(e) = saver.close() {
        tracing::error!(error = %e, "failed to close output file");
    }

    tracing::info!(results = summarizer.results_found(), "finished scan");

    outcome
}

// Handles the 'result-view' subcommand
fn handle_result_view(result_file: &Path) -> Result<()> {
    let results = load_results(result_file)
        .with_context(|| format!("failed to load results from {}", result_file.display()))?;

    print!("{}", ResultTree::from_results(&results));
    Ok(())
}

// Handles the 'result-diff' subcommand
// Two identical trees are reported as an error
fn handle_result_diff(first: &Path, second: &Path) -> Result<()> {
    let first_results = load_results(first)
        .with_context(|| format!("failed to load results from {}", first.display()))?;
    let second_results = load_results(second)
        .with_context(|| format!("failed to load results from {}", second.display()))?;

    let diff = diff_trees(
        &ResultTree::from_results(&first_results).to_string(),
        &ResultTree::from_results(&second_results).to_string(),
    );

    if diff.is_equal() {
        bail!("no diffs found");
    }

    print!("{}", diff);
    Ok(())
}

// Handles the 'dictionary-generate' subcommand
fn handle_dictionary_generate(path: &Path, out: Option<&Path>, absolute_only: bool) -> Result<()> {
    match out {
        Some(out) => {
            let file = File::create(out)
                .with_context(|| format!("failed to create `{}`", out.display()))?;
            let mut writer = BufWriter::new(file);
            dictionary::generate(path, absolute_only, &mut writer)?;
            writer.flush().context("failed to write dictionary")?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            dictionary::generate(path, absolute_only, &mut writer)?;
        }
    }

    Ok(())
}
