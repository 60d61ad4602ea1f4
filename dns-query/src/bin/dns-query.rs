//! Sends one DNS query over UDP and prints the reply.
//!
//! ```text
//! $ cargo run --package dns-query -- example.com A
//! ```
#![forbid(unsafe_code)]

use clap::{ArgAction, Parser};
use dns_query::{DnsClient, DnsErrorKind, DEFAULT_PORT, DEFAULT_QUERY_TYPE, DEFAULT_SERVER};
use log::{debug, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;
use std::net::IpAddr;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "dns-query")]
#[command(version)]
#[command(about = "Send a DNS query over UDP and print the response")]
struct Args {
    /// Server address
    #[arg(short, long, default_value_t = DEFAULT_SERVER)]
    server: IpAddr,

    /// Server UDP port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// How long to wait for the reply, in milliseconds
    #[arg(short, long, default_value_t = 2000)]
    timeout_ms: u64,

    /// Log more, repeat for even more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Domain name to look up
    name: String,

    /// Record type, like A, AAAA, MX, or TYPE65
    #[arg(value_name = "TYPE", default_value = DEFAULT_QUERY_TYPE)]
    typ: String,
}

fn init_logging(verbose: u8) -> Result<(), String> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // Logs go to stderr so stdout holds only the response.
    let stderr = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} {t} {m}{n}")))
        .target(Target::Stderr)
        .build();
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| format!("error building log config: {}", e))?;
    log4rs::init_config(config).map_err(|e| format!("error installing logger: {}", e))?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(args.verbose) {
        eprintln!("warning: {}", e);
    }
    let client = DnsClient::new(args.server, args.port)
        .with_timeout(Duration::from_millis(args.timeout_ms));
    debug!("querying {} for {} {}", client.server_addr(), args.name, args.typ);
    match client.lookup(&args.name, &args.typ) {
        Ok(response) => {
            print!("{}", response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            match e.kind() {
                DnsErrorKind::Encoding => ExitCode::from(2),
                DnsErrorKind::MalformedMessage
                | DnsErrorKind::Timeout
                | DnsErrorKind::Transport => ExitCode::FAILURE,
            }
        }
    }
}
