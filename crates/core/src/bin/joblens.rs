// ABOUTME: CLI binary for the joblens job-posting scraper.
// ABOUTME: Scrapes URLs or offline HTML files and prints the response envelope as JSON.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use joblens_core::{AbsencePolicy, Client, ScrapeEnvelope};

#[derive(Parser, Debug)]
#[command(name = "joblens")]
#[command(about = "Extract structured job-posting data from job-listing pages")]
struct Args {
    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// HTML file to parse offline (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// URL context for offline parsing (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// Omit empty fields from the formatted data payload
    #[arg(long = "elide-empty")]
    elide_empty: bool,

    /// Overall per-request timeout in seconds
    #[arg(long = "timeout", default_value_t = 45)]
    timeout: u64,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// URLs to scrape (fetch mode)
    #[arg()]
    urls: Vec<String>,
}

fn format_output(envelopes: &[ScrapeEnvelope]) -> String {
    if envelopes.len() == 1 {
        serde_json::to_string_pretty(&envelopes[0]).unwrap()
    } else {
        serde_json::to_string_pretty(envelopes).unwrap()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Validate args
    if args.html.is_some() && args.url.is_none() {
        eprintln!("error: --url is required when using --html");
        return ExitCode::from(1);
    }

    if args.html.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --html with --url");
        return ExitCode::from(1);
    }

    if args.html.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --html and positional URLs");
        return ExitCode::from(1);
    }

    let policy = if args.elide_empty {
        AbsencePolicy::ElideEmpty
    } else {
        AbsencePolicy::KeepEmpty
    };
    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .absence_policy(policy)
        .build();

    let start = Instant::now();
    let mut envelopes: Vec<ScrapeEnvelope> = Vec::new();
    let mut had_error = false;

    if let Some(html_path) = &args.html {
        let url = args.url.as_deref().unwrap_or_default();
        match fs::read_to_string(html_path) {
            Ok(html) => {
                let envelope = match client.scrape_html(&html, url).await {
                    Ok(report) => ScrapeEnvelope::success(&report, policy),
                    Err(err) => {
                        had_error = true;
                        ScrapeEnvelope::failure(err.to_string(), url)
                    }
                };
                envelopes.push(envelope);
            }
            Err(err) => {
                eprintln!("error reading file {:?}: {}", html_path, err);
                return ExitCode::from(1);
            }
        }
    } else {
        for url in &args.urls {
            let envelope = client.scrape_envelope(url).await;
            if !envelope.is_success() {
                had_error = true;
            }
            envelopes.push(envelope);
        }
    }

    if args.timing {
        eprintln!("elapsed: {} ms", start.elapsed().as_millis());
    }

    let output = format_output(&envelopes);
    match &args.output {
        Some(path) => {
            if let Err(err) = fs::write(path, output) {
                eprintln!("error writing to {:?}: {}", path, err);
                return ExitCode::from(1);
            }
        }
        None => {
            let mut stdout = io::stdout();
            let _ = writeln!(stdout, "{}", output);
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
