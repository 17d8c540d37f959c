//! Interactive text menu

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::commands::{cache, process};
use crate::config::Config;

pub fn execute(config: &Config) -> Result<()> {
    run(io::stdin().lock(), &mut io::stdout().lock(), config)
}

/// Run the menu until the user exits or input ends
pub fn run<R: BufRead, W: Write>(mut input: R, out: &mut W, config: &Config) -> Result<()> {
    loop {
        writeln!(out)?;
        writeln!(out, "1. Rebuild texture cache")?;
        writeln!(out, "2. Process an OBJ file")?;
        writeln!(out, "3. Exit")?;
        write!(out, "Select an option: ")?;
        out.flush()?;

        let Some(choice) = read_line(&mut input)? else {
            return Ok(());
        };

        match choice.trim() {
            "1" => match cache::build_index(config) {
                Ok(index) => writeln!(out, "Cached {} textures", index.len())?,
                Err(e) => writeln!(out, "Error: {e:#}")?,
            },
            "2" => {
                write!(out, "Path to OBJ file: ")?;
                out.flush()?;
                let Some(line) = read_line(&mut input)? else {
                    return Ok(());
                };

                let path = strip_quotes(&line);
                if path.is_empty() {
                    writeln!(out, "No file given")?;
                    continue;
                }
                let files = [PathBuf::from(path)];
                if let Err(e) = process::run(&files, config.scale.target_unit, false, config, out) {
                    writeln!(out, "Error: {e:#}")?;
                }
            }
            "3" => return Ok(()),
            other => writeln!(out, "Invalid option: {other}")?,
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Trim a pasted path and drop the quotes a file manager may add around it
pub fn strip_quotes(input: &str) -> &str {
    input.trim().trim_matches(|c: char| c == '"' || c == '\'').trim()
}
