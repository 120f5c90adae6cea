//! ldmsd-req CLI
//!
//! Encode configuration commands into request records and inspect
//! received records.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ldmsd_req::protocol::{
    attribute_name, build_request_with, command_name, read_request, write_request, ATTRIBUTES,
    COMMANDS,
};
use ldmsd_req::Config;
use tracing_subscriber::{fmt, EnvFilter};

/// ldmsd request codec tool
#[derive(Parser, Debug)]
#[command(name = "ldmsd-req")]
#[command(about = "Encode and decode daemon configuration requests")]
#[command(version)]
struct Args {
    /// Starting request buffer size in bytes
    #[arg(long, default_value = "1024")]
    initial_capacity: usize,

    /// Largest request record accepted, in bytes
    #[arg(long, default_value = "16777216")]
    max_request_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a command, e.g. `encode prdcr_add name=p1 host=node1`
    Encode {
        /// Verb followed by key=value tokens
        #[arg(required = true, num_args = 1..)]
        command: Vec<String>,

        /// Write the raw record here instead of printing a hex dump
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode the request records in a file
    Decode {
        /// File holding one or more concatenated records
        file: PathBuf,
    },

    /// List known verbs and attribute names
    Keywords,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ldmsd_req=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match Config::builder()
        .initial_capacity(args.initial_capacity)
        .max_request_size(args.max_request_size)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    let result = match args.command {
        Commands::Encode { command, output } => {
            let command = command.join(" ");
            encode(&config, &command, output)
                .map_err(|e| format!("failed to encode '{}': {}", command, e))
        }
        Commands::Decode { file } => decode(&config, &file)
            .map_err(|e| format!("failed to decode {}: {}", file.display(), e)),
        Commands::Keywords => {
            keywords();
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn encode(config: &Config, command: &str, output: Option<PathBuf>) -> ldmsd_req::Result<()> {
    let request = build_request_with(config, command)?;

    match output {
        Some(path) => {
            let mut file = File::create(&path)?;
            write_request(&mut file, &request)?;
            tracing::info!("wrote {} bytes to {}", request.record_length(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for chunk in request.as_bytes().chunks(16) {
                let line: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
                writeln!(out, "{}", line.join(" "))?;
            }
        }
    }
    Ok(())
}

fn decode(config: &Config, path: &Path) -> ldmsd_req::Result<()> {
    let mut reader = BufReader::new(File::open(path)?);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    while let Some(request) = read_request(&mut reader, config.max_request_size)? {
        let verb = request
            .header()
            .request_code()
            .and_then(command_name)
            .unwrap_or("?");
        writeln!(
            out,
            "{} (code 0x{:x}, {} bytes)",
            verb,
            request.code(),
            request.record_length()
        )?;

        for attr in request.attrs() {
            let attr = attr?;
            let name = attr.attr_id().map(attribute_name).unwrap_or("?");
            writeln!(out, "  {:<10} = {}", name, attr.value_str()?)?;
        }
    }
    Ok(())
}

fn keywords() {
    println!("verbs:");
    for (verb, code) in COMMANDS.entries() {
        println!("  {:<20} 0x{:x}", verb, code.as_u32());
    }
    println!("attributes:");
    for (name, id) in ATTRIBUTES.entries() {
        println!("  {:<20} {}", name, id.as_u32());
    }
}
