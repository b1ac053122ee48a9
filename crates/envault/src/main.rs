// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Envault - securely store and retrieve environment variables.
//!
//! This is the binary entry point for the `envault` command.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use envault::exec::{self, ExecRequest};
use envault::extract;
use envault::{Envault, EnvaultError};
use envault_config::model::EnvaultConfig;

/// Exit code for malformed command lines.
const EXIT_USAGE: i32 = 1;
/// Exit code for failed store operations.
const EXIT_FAILURE: i32 = 255;

/// Envault - securely store and retrieve environment variables.
///
/// Variables are key-value pairs stored in a realm, of which there may be
/// many. All data lives in one file under the user's config directory,
/// encrypted with a per-user key held in the system keychain.
#[derive(Parser, Debug)]
#[command(name = "envault", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Add or overwrite variables in a realm, creating it if needed.
    Add {
        realm: String,
        /// KEY=VALUE pairs.
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
    },
    /// Print one variable, or a whole realm as JSON.
    Get {
        /// Omit the trailing newline.
        #[arg(short = 'n')]
        no_newline: bool,
        #[arg(value_name = "REALM[/KEY]")]
        path: String,
    },
    /// Delete one variable, or a whole realm.
    Drop {
        #[arg(value_name = "REALM[/KEY]")]
        path: String,
    },
    /// List realms, or a realm's variables with time, size, and hash.
    List {
        /// Show decrypted values too.
        #[arg(short = 'd')]
        decrypt: bool,
        #[arg(value_name = "REALM[/KEY]")]
        path: Option<String>,
    },
    /// Run a command with a realm's variables in its environment.
    Exec {
        /// Answer `yes` on the command's stdin.
        #[arg(short = 'y')]
        yes: bool,
        #[arg(value_name = "REALM[/KEY]")]
        path: String,
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "COMMAND"
        )]
        command: Vec<String>,
    },
    /// Export a realm as JSON to a file (mode 0600) or stdout.
    Read {
        /// Inline values that are themselves JSON objects or arrays.
        #[arg(short = 'q')]
        unquote: bool,
        realm: String,
        #[arg(value_name = "FILE|-")]
        file: Option<PathBuf>,
    },
    /// Import a JSON object of strings from a file or stdin into a realm.
    Write {
        realm: String,
        #[arg(value_name = "FILE|-")]
        file: Option<PathBuf>,
    },
    /// Print the version.
    Version,
}

#[tokio::main]
async fn main() {
    let code = run_cli().await;
    std::process::exit(code);
}

async fn run_cli() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { EXIT_USAGE } else { 0 };
        }
    };

    if let Commands::Version = cli.command {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return 0;
    }

    let config = match envault_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            envault_config::render_errors(&errors);
            return EXIT_USAGE;
        }
    };

    init_tracing(&config.log.level);

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("envault: {e}");
            EXIT_FAILURE
        }
    }
}

async fn run(command: Commands, config: &EnvaultConfig) -> Result<i32, EnvaultError> {
    if let Commands::Add { pairs, .. } = &command {
        let parsed = extract::assignments(pairs);
        if let Some(bad) = parsed.rest.first() {
            eprintln!("envault: invalid pair `{bad}`, expected KEY=VALUE");
            return Ok(EXIT_USAGE);
        }
    }

    let mut store = Envault::open(config)?;
    let code = dispatch(command, &mut store).await;
    let closed = store.close();
    let code = code?;
    closed?;
    Ok(code)
}

async fn dispatch(command: Commands, store: &mut Envault) -> Result<i32, EnvaultError> {
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Add { realm, pairs } => {
            let parsed = extract::assignments(&pairs);
            store.add(&realm, parsed.values)?;
        }
        Commands::Get { no_newline, path } => {
            let out = match extract::split_path(&path) {
                (realm, Some(key)) => store.get(realm, key)?,
                (realm, None) => store.fetch_as_json(realm)?.to_string(),
            };
            let written = if no_newline {
                write!(stdout, "{out}")
            } else {
                writeln!(stdout, "{out}")
            };
            written.map_err(EnvaultError::storage)?;
        }
        Commands::Drop { path } => match extract::split_path(&path) {
            (realm, Some(key)) => store.drop_key(realm, key)?,
            (realm, None) => store.purge(realm)?,
        },
        Commands::List { decrypt, path } => match path {
            None => {
                for realm in store.realms()? {
                    writeln!(stdout, "{realm}").map_err(EnvaultError::storage)?;
                }
            }
            Some(path) => {
                let (realm, key) = extract::split_path(&path);
                store.list(&mut stdout, realm, key, decrypt)?;
            }
        },
        Commands::Exec { yes, path, command } => {
            let vars = match extract::split_path(&path) {
                (realm, Some(key)) => vec![format!("{key}={}", store.get(realm, key)?)],
                (realm, None) => store.fetch_as_var_list(realm)?,
            };
            store.close()?;
            drop(stdout);

            let (program, args) = command
                .split_first()
                .ok_or_else(|| EnvaultError::Internal("missing command".to_string()))?;
            let request = ExecRequest {
                program: program.clone(),
                args: args.to_vec(),
                vars,
                answer_yes: yes,
            };
            return exec::run(&request).await;
        }
        Commands::Read {
            unquote,
            realm,
            file,
        } => match output_target(file.as_deref()) {
            None => store.write_json(&mut stdout, &realm, unquote)?,
            Some(path) => store.write_json(create_private(path)?, &realm, unquote)?,
        },
        Commands::Write { realm, file } => match output_target(file.as_deref()) {
            None => store.read_json(io::stdin().lock(), &realm)?,
            Some(path) => {
                let reader = File::open(path).map_err(EnvaultError::storage)?;
                store.read_json(io::BufReader::new(reader), &realm)?;
            }
        },
        Commands::Version => {
            writeln!(stdout, "{}", env!("CARGO_PKG_VERSION")).map_err(EnvaultError::storage)?;
        }
    }

    Ok(0)
}

/// `None` for stdin/stdout (`-` or no argument), otherwise the file path.
fn output_target(file: Option<&Path>) -> Option<&Path> {
    file.filter(|p| p.as_os_str() != "-")
}

/// Create or truncate `path` readable by the owner only.
fn create_private(path: &Path) -> Result<File, EnvaultError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(path)
        .map_err(|e| EnvaultError::storage(e).context(format!("creating {}", path.display())))
}

/// Initialize the tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("envault={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}
