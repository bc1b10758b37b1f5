use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitegraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitegraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a domain to a bounded depth, then rank its pages by link-graph \
                centrality and its words by frequency.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("Root URL to crawl")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-d --"depth" <HOPS>)
                        .required(false)
                        .help("Maximum link-following depth from the root")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("2"),
                )
                .arg(
                    arg!(--"domain" <MARKER>)
                        .required(false)
                        .help("Same-site marker substring (default: root host without www.)"),
                )
                .arg(
                    arg!(--"user-agent" <UA>)
                        .required(false)
                        .help("User-Agent header sent with every request"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-c --"concurrency" <NUM>)
                        .required(false)
                        .help("Maximum concurrent fetches")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: print to stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"top-words" <NUM>)
                        .required(false)
                        .help("Word-frequency rows to keep in the report")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("250"),
                )
                .arg(
                    arg!(--"top-urls" <NUM>)
                        .required(false)
                        .help("Rows to keep per centrality ranking")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("150"),
                )
                .arg(
                    arg!(--"top-graph" <NUM>)
                        .required(false)
                        .help("Pages in the link-structure excerpt")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("50"),
                ),
        )
}
