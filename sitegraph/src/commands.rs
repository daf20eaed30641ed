use crate::CLAP_STYLING;
use clap::builder::RangedU64ValueParser;
use clap::{arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitegraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitegraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a site from a seed URL and map its link graph, bounded by link depth \
                and a time limit.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to crawl (http:// is assumed when no scheme is given)"),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum link depth from the seed. Pages at this depth are fetched but not expanded further.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("2"),
                )
                .arg(
                    arg!(-T --"time-limit" <SECONDS>)
                        .required(false)
                        .help("Wall-clock budget for the crawl. No new fetch starts after it runs out.")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("60"),
                )
                .arg(
                    arg!(--"order" <ORDER>)
                        .required(false)
                        .help("Traversal order: breadth-first or depth-first")
                        .value_parser(["bfs", "dfs"])
                        .default_value("bfs"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of concurrent fetches in the worker pool.")
                        .value_parser(RangedU64ValueParser::<usize>::new().range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"max-links" <NUM>)
                        .required(false)
                        .help("Follow at most this many links from each page (0 = no limit)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"same-host")
                        .required(false)
                        .help("Only follow links on the seed's host (default: follow every HTTP link)")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"proxy" <URL>)
                        .required(false)
                        .help("Send every request through this proxy"),
                )
                .arg(
                    arg!(--"user-agent" <UA>)
                        .required(false)
                        .help("User-Agent header sent with every request"),
                )
                .arg(
                    arg!(-H --"header" <HEADER>)
                        .required(false)
                        .help("Extra request header as 'Name: value'. May be repeated.")
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv (URL,ExtractedText), dot (Graphviz)")
                        .value_parser(["text", "json", "csv", "dot"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(--"no-progress")
                        .required(false)
                        .help("Hide the progress spinner")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
