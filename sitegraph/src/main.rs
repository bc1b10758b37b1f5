use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use sitegraph_core::pipeline::{CrawlOptions, execute_crawl};
use sitegraph_core::report::{self, ReportFormat};
use std::path::PathBuf;
use url::Url;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => {
            if let Err(e) = handle_crawl(primary_command, quiet).await {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        }
        None => {
            // No subcommand provided, just show the banner
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

fn print_banner() {
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!("{}", "  SITEGRAPH".bright_white().bold());
    println!(
        "{}",
        "  domain crawler with link-graph centrality analytics".bright_blue()
    );
    println!("{}", "═".repeat(60).bright_blue().bold());
}

async fn handle_crawl(args: &ArgMatches, quiet: bool) -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = args.get_one::<Url>("url").unwrap();
    let depth = *args.get_one::<usize>("depth").unwrap();
    let timeout = *args.get_one::<u64>("timeout").unwrap();
    let concurrency = *args.get_one::<usize>("concurrency").unwrap();
    let top_words = *args.get_one::<usize>("top-words").unwrap();
    let top_urls = *args.get_one::<usize>("top-urls").unwrap();
    let top_graph = *args.get_one::<usize>("top-graph").unwrap();

    let mut options = CrawlOptions::new(url.as_str());
    options.max_depth = depth;
    options.domain_marker = args.get_one::<String>("domain").cloned();
    options.user_agent = args.get_one::<String>("user-agent").cloned();
    options.timeout_secs = timeout;
    options.concurrency = concurrency;
    options.show_progress = !quiet;

    if !quiet {
        println!("\n🕸  Crawling {}", url);
        println!("Max depth: {}", depth);
        println!("Concurrency: {}\n", concurrency);
    }

    let outcome = execute_crawl(options).await.map_err(anyhow::Error::msg)?;

    if !quiet {
        println!(
            "\n{} Crawl complete: {} pages, {} nodes, {} edges\n",
            "✓".green().bold(),
            outcome.pages.len(),
            outcome.graph.node_count(),
            outcome.graph.edge_count()
        );
    }

    let domain_report = report::build_report(url.as_str(), &outcome, top_words, top_urls, top_graph);

    let format = args.get_one::<String>("format").unwrap();
    let rendered = match ReportFormat::from_str(format) {
        Some(ReportFormat::Text) => report::render_text(&domain_report),
        Some(ReportFormat::Json) => {
            report::render_json(&domain_report).context("Failed to serialize report")?
        }
        None => unreachable!("clap restricts the format values"),
    };

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            report::save_report(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                println!("{} Report saved to {}", "✓".green().bold(), path.display());
            }
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
