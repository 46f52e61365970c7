//!
//! ulpf CLI binary
//! ---------------
//! Command-line front end over a rooted file store: save, read, remove and
//! resolve files, create directories and dump CSV files as JSON rows.
//! The root comes from `--root`, or from `file_root` in the INI file given
//! with `--config`.

use std::env;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use ulpf::bootstrap::{Configuration, Settings};
use ulpf::storage::{CsvReader, FileStore};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file.ini>] [--root <dir>] <command> [args]\n\nCommands:\n  put <path> [content]   write content (stdin when omitted), creating parent directories\n  cat <path>             print file contents\n  rm <path>              remove a file or a directory tree\n  mkdir <path>           create a directory and its parents\n  exists <path>          print true/false\n  resolve <path>         print the absolute path under the root\n  csv <path>             print CSV rows as JSON\n\nFlags:\n  --config <file.ini>    INI file with file_root, debug, log_filter, csv_delimiter\n  --root <dir>           file store root (overrides file_root)\n  -h, --help             show this help\n\nExamples:\n  {program} --root /tmp/store put notes/today.txt \"hello\"\n  {program} --config app.ini csv imports/users.csv"
    );
}

fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut config_path: Option<String> = None;
    let mut root: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() { eprintln!("--config requires a value"); print_usage(&program); std::process::exit(2); }
                config_path = Some(args[i+1].clone());
                i += 2; continue;
            }
            "--root" => {
                if i + 1 >= args.len() { eprintln!("--root requires a value"); print_usage(&program); std::process::exit(2); }
                root = Some(args[i+1].clone());
                i += 2; continue;
            }
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            other => { positional.push(other.to_string()); i += 1; }
        }
    }

    let settings = match &config_path {
        Some(p) => Settings::from_configuration(&Configuration::from_file(p).with_context(|| format!("loading {p}"))?),
        None => Settings::default(),
    };
    init_logging(&settings.log_filter);

    let root: PathBuf = root
        .map(PathBuf::from)
        .or_else(|| settings.file_root.clone())
        .ok_or_else(|| anyhow!("no file store root: pass --root or set file_root in the configuration"))?;
    let store = FileStore::with_root(&root)?;
    info!(target: "ulpf", "ulpf: root='{}' config='{}'", root.display(), config_path.as_deref().unwrap_or("<none>"));

    let mut pos = positional.into_iter();
    let Some(command) = pos.next() else {
        print_usage(&program);
        std::process::exit(2);
    };
    let path = pos.next().ok_or_else(|| anyhow!("'{command}' requires a path"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command.as_str() {
        "put" => {
            let content = match pos.next() {
                Some(c) => c.into_bytes(),
                None => {
                    let mut buf = Vec::new();
                    io::stdin().read_to_end(&mut buf)?;
                    buf
                }
            };
            store.save_contents(content, &path)?;
        }
        "cat" => out.write_all(&store.get_file_bytes(&path)?)?,
        "rm" => { store.remove(&path)?; }
        "mkdir" => { store.create_directory(&path)?; }
        "exists" => writeln!(out, "{}", store.file_exists(&path))?,
        "resolve" => writeln!(out, "{}", store.get_real_file_path(&path)?.display())?,
        "csv" => {
            let rows = CsvReader::new(&store).delimiter(settings.csv_delimiter).read_csv(&path)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        }
        other => {
            print_usage(&program);
            bail!("unknown command '{other}'");
        }
    }
    Ok(())
}
