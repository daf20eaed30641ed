use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use sitegraph_core::crawl::{CrawlOptions, FollowMode, execute_crawl, generate_crawl_summary};
use sitegraph_core::report::{ReportFormat, render_report, save_report};
use sitegraph_scanner::normalize::parse_seed;
use sitegraph_scanner::{CrawlOutcome, HttpOptions, TraversalOrder};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Parse a single line as a URL, adding http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    match parse_seed(line) {
        Some(url) => Some(url.to_string()),
        None => {
            eprintln!("{} Skipping invalid URL '{}'", "⚠".yellow(), line);
            None
        }
    }
}

/// Split a `Name: value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("header '{}' is not in 'Name: value' form", raw))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("header '{}' has an empty name", raw);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Expand `~` in a user supplied output path.
pub fn expand_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Logs go to stderr so reports on stdout stay clean. `RUST_LOG` overrides
/// the default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn crawl_options_from_matches(sub_matches: &ArgMatches) -> Result<CrawlOptions> {
    let raw_url = sub_matches
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let url = parse_url_line(raw_url).ok_or_else(|| anyhow!("invalid seed URL '{}'", raw_url))?;

    let order = sub_matches
        .get_one::<String>("order")
        .and_then(|o| TraversalOrder::from_str(o))
        .unwrap_or_default();

    let headers = sub_matches
        .get_many::<String>("header")
        .map(|values| values.map(|h| parse_header(h)).collect::<Result<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();

    let follow_mode = if sub_matches.get_flag("same-host") {
        FollowMode::SameHost
    } else {
        FollowMode::Any
    };

    Ok(CrawlOptions {
        url,
        max_depth: *sub_matches.get_one::<usize>("depth").unwrap_or(&2),
        time_limit: Duration::from_secs(*sub_matches.get_one::<u64>("time-limit").unwrap_or(&60)),
        threads: *sub_matches.get_one::<usize>("threads").unwrap_or(&10),
        order,
        fetch_timeout: Duration::from_secs(*sub_matches.get_one::<u64>("timeout").unwrap_or(&10)),
        max_links: sub_matches
            .get_one::<usize>("max-links")
            .copied()
            .filter(|&n| n > 0),
        follow_mode,
        http: HttpOptions {
            user_agent: sub_matches.get_one::<String>("user-agent").cloned(),
            proxy: sub_matches.get_one::<String>("proxy").cloned(),
            headers,
        },
        show_progress_bars: !sub_matches.get_flag("no-progress"),
    })
}

/// Render the finished crawl and write it to `output`, or stdout.
pub fn emit_report(
    outcome: &CrawlOutcome,
    format: ReportFormat,
    output: Option<&str>,
) -> Result<Option<PathBuf>> {
    let rendered = render_report(outcome, format).context("Failed to render report")?;

    match output {
        Some(path) => {
            let path = expand_output_path(path);
            save_report(&rendered, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            Ok(Some(path))
        }
        None => {
            if format == ReportFormat::Text {
                print!("{}", generate_crawl_summary(outcome));
            }
            print!("{}", rendered);
            Ok(None)
        }
    }
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    init_tracing();

    let options = crawl_options_from_matches(sub_matches)?;
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = sub_matches.get_one::<String>("output").map(String::as_str);
    debug!("Crawl options: {:?}", options);

    if !quiet {
        eprintln!("\n{} Crawling {}", "🕷".cyan(), options.url.bold());
        eprintln!("Workers: {}", options.threads);
        eprintln!("Max depth: {}", options.max_depth);
        eprintln!("Time limit: {}s", options.time_limit.as_secs());
        eprintln!("Order: {}", options.order.label());
        eprintln!(
            "Follow: {}\n",
            match options.follow_mode {
                FollowMode::SameHost => "same host only",
                FollowMode::Any => "all links",
            }
        );
    }

    let seed = options.url.clone();
    let outcome = execute_crawl(options, None)
        .await
        .with_context(|| format!("Crawl of {} failed", seed))?;

    if let Some(path) = emit_report(&outcome, format, output)?
        && !quiet
    {
        eprintln!(
            "{} Report saved to {}",
            "✓".green().bold(),
            path.display().to_string().bold()
        );
    }

    Ok(())
}
