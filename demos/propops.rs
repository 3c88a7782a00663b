// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use prop_ops::{PropOps, Value};

fn read_document(file: &str) -> Result<Value> {
    if file.ends_with(".json") {
        Value::from_json_file(file)
    } else if file.ends_with(".yaml") || file.ends_with(".yml") {
        Value::from_yaml_file(file)
    } else {
        bail!("Unsupported document `{file}`. Must be json or yaml.")
    }
}

fn parse_value(value: &str) -> Result<Value> {
    Value::from_json_str(value).with_context(|| format!("Failed to parse value `{value}` as json"))
}

fn print(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn update(
    ops: &PropOps,
    file: &str,
    path: &str,
    value: Option<&str>,
    merge: bool,
    in_place: bool,
) -> Result<()> {
    let mut doc = read_document(file)?;

    let value = value.map(parse_value).transpose()?;
    match (value, in_place) {
        (Some(value), true) if merge => ops.merge_mut(&mut doc, path, value)?,
        (Some(value), true) => ops.set_mut(&mut doc, path, value)?,
        (None, true) => ops.del_mut(&mut doc, path)?,
        (Some(value), false) if merge => doc = ops.merge(&doc, path, value)?,
        (Some(value), false) => doc = ops.set(&doc, path, value)?,
        (None, false) => doc = ops.del(&doc, path)?,
    }

    print(&doc)
}

#[derive(Subcommand)]
enum PropOpsCommand {
    /// Read the value at a path.
    Get {
        /// Document. json or yaml.
        file: String,

        /// Dotted path such as `a.[0].b`.
        path: String,

        /// Json value printed when nothing is found.
        #[arg(long, short)]
        fallback: Option<String>,
    },

    /// Check whether a path holds a value.
    Has {
        /// Document. json or yaml.
        file: String,

        /// Dotted path.
        path: String,
    },

    /// Store a json value at a path.
    Set {
        /// Document. json or yaml.
        file: String,

        /// Dotted path.
        path: String,

        /// Json value.
        value: String,
    },

    /// Shallow-merge a json object or array into the value at a path.
    Merge {
        /// Document. json or yaml.
        file: String,

        /// Dotted path.
        path: String,

        /// Json object or array.
        value: String,
    },

    /// Delete the value at a path.
    Del {
        /// Document. json or yaml.
        file: String,

        /// Dotted path.
        path: String,
    },
}

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: PropOpsCommand,

    /// Create or replace containers along the path.
    #[arg(long, short, global = true)]
    loose: bool,

    /// Update the loaded document in place instead of a copy.
    #[arg(long, global = true)]
    in_place: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    // Parse and dispatch command.
    let cli = Cli::parse();
    let mut ops = PropOps::new();
    ops.set_loose(cli.loose);

    match cli.command {
        PropOpsCommand::Get {
            file,
            path,
            fallback,
        } => {
            let doc = read_document(&file)?;
            let fallback = match fallback {
                Some(fallback) => parse_value(&fallback)?,
                None => Value::Null,
            };
            print(&ops.get_or(&doc, path.as_str(), fallback)?)
        }
        PropOpsCommand::Has { file, path } => {
            let doc = read_document(&file)?;
            println!("{}", ops.has(&doc, path.as_str())?);
            Ok(())
        }
        PropOpsCommand::Set { file, path, value } => {
            update(&ops, &file, &path, Some(&value), false, cli.in_place)
        }
        PropOpsCommand::Merge { file, path, value } => {
            update(&ops, &file, &path, Some(&value), true, cli.in_place)
        }
        PropOpsCommand::Del { file, path } => update(&ops, &file, &path, None, false, cli.in_place),
    }
}
