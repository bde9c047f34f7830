use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use cfo_assistant::{PasswordHash, create_user, initialize_db};

/// A utility for creating a test database for the REST API server of CFO Assistant.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The email of the test user.
    #[arg(long, default_value = "test@example.com")]
    email: String,

    /// The password of the test user.
    #[arg(long, default_value = "test")]
    password: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {}...", args.email);

    let password_hash = PasswordHash::new(&args.password, PasswordHash::DEFAULT_COST)?;
    create_user(&args.email, password_hash, &conn)?;

    println!("Success!");

    Ok(())
}
