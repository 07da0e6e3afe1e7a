use clap::{Args, Parser as ClapParser, Subcommand};
use sieve_lang::{
    IngestOptions,
    cli::{self, CliError, Mode, RunOptions, RunResult},
    ingest::read_records,
};
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

#[derive(ClapParser)]
#[command(name = "sieve")]
#[command(about = "Sieve - filter and aggregate user records with boolean statements")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// CSV file with a header row ('-' reads stdin)
    #[arg(short, long, env = "SIEVE_DATA", default_value = "./user_profiles.csv")]
    data: PathBuf,

    /// Field decoded as an integer (repeatable; defaults to age and balance)
    #[arg(long = "numeric", value_name = "FIELD")]
    numeric: Vec<String>,

    /// Header rename FROM=TO (repeatable; defaults to accountBalance=balance and userId=id)
    #[arg(long = "rename", value_name = "FROM=TO")]
    rename: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Test every record and print each with its result
    Filter {
        /// The statement to evaluate
        statement: String,

        #[command(flatten)]
        data: DataArgs,

        /// Print one JSON object per record
        #[arg(long)]
        json: bool,
    },

    /// Average a numeric field over the matching records
    Average {
        /// The statement to evaluate
        statement: String,

        /// Field to average
        #[arg(short, long, default_value = "balance")]
        field: String,

        #[command(flatten)]
        data: DataArgs,

        /// Evaluate records on all cores
        #[arg(long)]
        parallel: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Only compile the statement and print how it was parsed
    Check {
        /// The statement to compile
        statement: String,
    },

    /// Show the statement reference and the fields available in the data
    Fields {
        #[command(flatten)]
        data: DataArgs,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Filter {
            statement,
            data,
            json,
        } => run(statement, Some(data), Mode::Filter, json),
        Commands::Average {
            statement,
            field,
            data,
            parallel,
            json,
        } => run(statement, Some(data), Mode::Average { field, parallel }, json),
        Commands::Check { statement } => run(statement, None, Mode::Check, false),
        Commands::Fields { data } => run_fields(data),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn ingest_options(data: &DataArgs) -> Result<IngestOptions, CliError> {
    let mut options = IngestOptions::default();
    if !data.numeric.is_empty() {
        options.numeric_fields = data.numeric.clone();
    }
    if !data.rename.is_empty() {
        options.renames = data
            .rename
            .iter()
            .map(|r| cli::parse_rename(r))
            .collect::<Result<_, _>>()?;
    }
    Ok(options)
}

/// Reads the CSV text: stdin for '-', or when stdin is piped and the path
/// was left at its default; otherwise the file.
fn read_input(data: &DataArgs) -> Result<String, CliError> {
    let from_stdin = data.data.as_os_str() == "-"
        || (!atty::is(atty::Stream::Stdin) && !data.data.exists());

    if from_stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(fs::read_to_string(&data.data)?)
}

fn run(
    statement: String,
    data: Option<DataArgs>,
    mode: Mode,
    json: bool,
) -> Result<(), CliError> {
    let (input, ingest) = match &data {
        Some(data) => (Some(read_input(data)?), ingest_options(data)?),
        None => (None, IngestOptions::default()),
    };

    let options = RunOptions {
        statement,
        input,
        mode,
        ingest,
    };

    match cli::execute(&options)? {
        RunResult::Compiled(expr) => println!("{}", expr),
        RunResult::Matches(rows) => {
            for (record, matched) in rows {
                if json {
                    let line = serde_json::json!({
                        "record": cli::record_to_json(&record),
                        "matched": matched,
                    });
                    println!("{}", serde_json::to_string(&line)?);
                } else {
                    println!("{}", cli::format_record(&record));
                    println!("{}", matched);
                }
            }
        }
        RunResult::Average(result) => {
            if json {
                println!("{}", serde_json::to_string(&cli::aggregate_to_json(&result))?);
            } else {
                println!("matches: {}", result.match_count);
                println!("average: {}", result.average);
            }
        }
    }
    Ok(())
}

fn run_fields(data: DataArgs) -> Result<(), CliError> {
    print!("{}", cli::get_statement_reference());

    let input = read_input(&data)?;
    let records = read_records(input.as_bytes(), &ingest_options(&data)?)?;
    println!("\nFIELDS ({})\n", data.data.display());
    print!("{}", cli::describe_fields(&records));
    Ok(())
}
