use std::fmt;
use std::path::PathBuf;

use reader_core::model::BookId;
use reader_core::text::Layout;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingBookId,
    UnknownArg(String),
    UnknownCommand(String),
    InvalidBookId { raw: String },
    InvalidLayout { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingBookId => write!(f, "--book-id is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidBookId { raw } => write!(f, "invalid --book-id value: {raw}"),
            ArgsError::InvalidLayout { raw } => write!(f, "invalid --layout value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Read(ReadArgs),
    Progress { db_url: String },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadArgs {
    pub db_url: String,
    pub book_id: BookId,
    pub title: Option<String>,
    pub author: Option<String>,
    pub layout: Layout,
    pub file: Option<PathBuf>,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  reader read --book-id <id> [--title <t>] [--author <a>] [--layout mobile|desktop]");
    eprintln!("              [--file <path>] [--db <sqlite_url>]");
    eprintln!("  reader progress [--db <sqlite_url>]");
    eprintln!();
    eprintln!("While reading: n (next), p (previous), g <page> (jump),");
    eprintln!("               l <mobile|desktop> (switch layout), q (quit)");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:reader.sqlite3");
    eprintln!("  --layout desktop");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  READER_DB_URL, READER_API_BASE_URL, READER_AUTH_TOKEN,");
    eprintln!("  READER_WORDS_PER_PAGE, READER_CHARS_PER_PAGE, READER_TICK_SECS,");
    eprintln!("  READER_HTTP_TIMEOUT_SECS, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

/// Parse everything after the program name.
///
/// `env_db_url` is the `READER_DB_URL` value, if set.
pub fn parse(
    argv: impl IntoIterator<Item = String>,
    env_db_url: Option<String>,
) -> Result<Command, ArgsError> {
    let mut args = argv.into_iter().peekable();
    let default_db = env_db_url.unwrap_or_else(|| "sqlite:reader.sqlite3".into());

    let first = args.peek().cloned();
    let cmd = match first.as_deref() {
        None | Some("--help" | "-h") => return Ok(Command::Help),
        Some(flag) if flag.starts_with("--") => "read".to_string(),
        Some(_) => args.next().unwrap_or_default(),
    };

    match cmd.as_str() {
        "read" => parse_read(&mut args, default_db).map(Command::Read),
        "progress" => parse_progress(&mut args, default_db),
        other => Err(ArgsError::UnknownCommand(other.to_string())),
    }
}

fn parse_read(
    args: &mut impl Iterator<Item = String>,
    default_db: String,
) -> Result<ReadArgs, ArgsError> {
    let mut db_url = default_db;
    let mut book_id = None;
    let mut title = None;
    let mut author = None;
    let mut layout = Layout::Desktop;
    let mut file = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_url = parse_db(require_value(args, "--db")?)?,
            "--book-id" => {
                let value = require_value(args, "--book-id")?;
                let parsed = value
                    .parse::<BookId>()
                    .map_err(|_| ArgsError::InvalidBookId { raw: value.clone() })?;
                book_id = Some(parsed);
            }
            "--title" => title = Some(require_value(args, "--title")?),
            "--author" => author = Some(require_value(args, "--author")?),
            "--layout" => {
                let value = require_value(args, "--layout")?;
                layout = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidLayout { raw: value.clone() })?;
            }
            "--file" => file = Some(PathBuf::from(require_value(args, "--file")?)),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(ReadArgs {
        db_url: normalize_sqlite_url(db_url),
        book_id: book_id.ok_or(ArgsError::MissingBookId)?,
        title,
        author,
        layout,
        file,
    })
}

fn parse_progress(
    args: &mut impl Iterator<Item = String>,
    default_db: String,
) -> Result<Command, ArgsError> {
    let mut db_url = default_db;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_url = parse_db(require_value(args, "--db")?)?,
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(Command::Progress {
        db_url: normalize_sqlite_url(db_url),
    })
}

fn parse_db(value: String) -> Result<String, ArgsError> {
    if value.trim().is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw: value });
    }
    Ok(value)
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
