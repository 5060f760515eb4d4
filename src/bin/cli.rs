//! DayLog CLI Client
//!
//! Command-line interface for interacting with a DayLog server.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use daylog::protocol::{read_response, write_command, Command, Response, Status};

/// DayLog CLI
#[derive(Parser, Debug)]
#[command(name = "daylog-cli")]
#[command(about = "CLI for the DayLog log store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:9999")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append a JSON record to today's partition
    Write {
        /// The record, as JSON
        record: String,
    },

    /// Read one page of records
    Read {
        /// Date (YYYY-MM-DD, default today UTC)
        #[arg(short, long, default_value = "")]
        date: String,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Records per page
        #[arg(long, default_value = "100")]
        page_size: u32,
    },

    /// Delete one line from a partition
    Delete {
        /// Date (YYYY-MM-DD, default today UTC)
        #[arg(short, long, default_value = "")]
        date: String,

        /// 1-based line number
        line: u32,
    },

    /// Ping the server
    Ping,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let command = match args.command {
        Commands::Write { record } => Command::Write {
            record: record.into_bytes(),
        },
        Commands::Read {
            date,
            page,
            page_size,
        } => Command::Read {
            date,
            page,
            page_size,
        },
        Commands::Delete { date, line } => Command::Delete { date, line },
        Commands::Ping => Command::Ping,
    };

    match send(&args.server, &command) {
        Ok(response) => report(response),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Send one command and wait for its response
fn send(server: &str, command: &Command) -> daylog::Result<Response> {
    let stream = TcpStream::connect(server)?;
    let mut writer = BufWriter::new(stream.try_clone()?);
    let mut reader = BufReader::new(stream);

    write_command(&mut writer, command)?;
    read_response(&mut reader)
}

fn report(response: Response) -> ExitCode {
    match response.status {
        Status::Ok => {
            match response.payload {
                Some(_) => println!("{}", response.message()),
                None => println!("OK"),
            }
            ExitCode::SUCCESS
        }
        Status::NotFound => {
            eprintln!("not found");
            ExitCode::FAILURE
        }
        Status::Error | Status::BadRequest => {
            eprintln!("error: {}", response.message());
            ExitCode::FAILURE
        }
    }
}
