use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use signature::FieldId;

#[derive(Parser, Debug)]
#[command(
    name = "signature",
    version,
    about = "Build a copy-pasteable HTML email signature"
)]
pub struct Cli {
    /// Extra configuration file (TOML), layered over the default one
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the saved form state
    #[arg(long, global = true, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Query string of a shared link, e.g. `input-naam=Ada&input-email=ada%40example.com`
    #[arg(long, global = true, value_name = "QUERY")]
    pub query: Option<String>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print the signature
    Render {
        /// Set a field, e.g. `--set input-naam=Ada` (repeatable)
        #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_assignment)]
        set: Vec<Assignment>,
        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,
        /// Also copy the signature to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Print a link that reproduces the current form
    Url {
        #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_assignment)]
        set: Vec<Assignment>,
        /// Page the query is appended to
        #[arg(long, default_value = "/")]
        base: String,
    },
    /// Forget the saved form state
    Reset,
    /// List the form fields
    Fields,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Html,
    Text,
    Json,
}

/// One `--set` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub field: FieldId,
    pub value: String,
}

pub fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got `{raw}`"))?;
    let field = key
        .trim()
        .parse::<FieldId>()
        .map_err(|_| format!("unknown field `{}` (see `signature fields`)", key.trim()))?;
    Ok(Assignment {
        field,
        value: value.to_string(),
    })
}
