//! tablewire CLI Client
//!
//! Command-line interface for interacting with a tablewire server.

use clap::{Parser, Subcommand};
use tablewire::Client;

/// tablewire CLI
#[derive(Parser, Debug)]
#[command(name = "tablewire-cli")]
#[command(about = "CLI for the tablewire table server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8585")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping,

    /// Create a table
    Create {
        /// Table name
        name: String,
    },

    /// Delete a table and its files
    Delete {
        /// Table name
        name: String,
    },

    /// List all tables
    List,

    /// Show a table's name and path
    Info {
        /// Table name
        name: String,
    },
}

fn main() {
    let args = Args::parse();
    let client = Client::new(&args.server);

    let result = match args.command {
        Commands::Ping => client.ping().map(|_| println!("ok")),
        Commands::Create { name } => client.create_table(&name).map(|_| println!("ok")),
        Commands::Delete { name } => client.delete_table(&name).map(|_| println!("ok")),
        Commands::List => client.get_tables().map(|tables| {
            for table in tables {
                println!("{}", table);
            }
        }),
        Commands::Info { name } => client
            .get_table(&name)
            .map(|info| println!("{}\t{}", info.name, info.path)),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
