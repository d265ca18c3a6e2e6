//! Minimal CLI: IR graph → (names | csharp)
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;

use crate::codegen::{self, RenderOptions};
use crate::ir::Graph;
use crate::naming::Names;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// render typed IR graphs (JSON) as C# data types with Newtonsoft.Json marshalling
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the allocated class, union, property and field names
    Names(NamesOut),
    /// emit C# source
    Csharp(CSharpOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to the graph inside each document (e.g. /ir)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more IR graph files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// enclosing C# namespace; each dotted segment is made a valid identifier
    #[arg(long, default_value = "QuickType", value_parser = parse_namespace)]
    namespace: String,
}

#[derive(clap::Parser, Debug)]
struct NamesOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CSharpOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .cs file, or a directory when several inputs are given (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn options(&self) -> RenderOptions {
        RenderOptions { namespace: self.namespace.clone() }
    }

    fn load_graphs(&self) -> Result<Vec<(PathBuf, Graph)>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        source_paths
            .into_iter()
            .map(|source_path| {
                let graph = self
                    .load_graph(&source_path)
                    .with_context(|| format!("failed to load IR graph ({})", source_path.display()))?;
                Ok((source_path, graph))
            })
            .collect()
    }

    fn load_graph(&self, source_path: &Path) -> Result<Graph> {
        let source = std::fs::read_to_string(source_path).context("failed to read source file")?;
        tracing::debug!(path = %source_path.display(), "loading graph");
        let graph = match self.json_pointer.as_deref() {
            None => Graph::from_json_str(&source)?,
            Some(pointer) => {
                let document: serde_json::Value = serde_json::from_str(&source)?;
                let Some(selected) = document.pointer(pointer) else {
                    bail!("JSON pointer {pointer} selects nothing");
                };
                let graph: Graph = crate::path_de::from_value_with_path(selected.clone())?;
                graph.validate()?;
                graph
            }
        };
        Ok(graph)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Names(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let options = target.input_settings.options();
                for (_, graph) in target.input_settings.load_graphs()? {
                    let names = Names::build(&graph, options.forbidden_names());
                    println!("{}", serde_json::to_string_pretty(&names.report(&graph))?);
                }
                Ok(())
            }
            Command::Csharp(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let options = target.input_settings.options();
                let graphs = target.input_settings.load_graphs()?;

                // each render is independent; keep input order for output
                let rendered = graphs
                    .par_iter()
                    .map(|(path, graph)| {
                        let src = codegen::render(graph, &options)
                            .with_context(|| format!("failed to render {}", path.display()))?;
                        Ok((path.clone(), src))
                    })
                    .collect::<Result<Vec<_>>>()?;

                write_outputs(target.out.as_deref(), rendered)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_outputs(out: Option<&Path>, rendered: Vec<(PathBuf, String)>) -> Result<()> {
    let Some(out) = out else {
        return write_concatenated(&mut std::io::stdout().lock(), &rendered);
    };
    if let [(_, src)] = rendered.as_slice() {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))?;
        return Ok(());
    }
    let targets = output_targets(out, rendered.iter().map(|(path, _)| path.as_path()))?;
    std::fs::create_dir_all(out)?;
    for (target, (_, src)) in targets.iter().zip(&rendered) {
        std::fs::write(target, src).with_context(|| format!("failed to write {}", target.display()))?;
    }
    Ok(())
}

/// Sources back to back, each already ending in its own newline.
fn write_concatenated(sink: &mut impl Write, rendered: &[(PathBuf, String)]) -> Result<()> {
    for (_, src) in rendered {
        sink.write_all(src.as_bytes())?;
    }
    sink.flush()?;
    Ok(())
}

/// `<out>/<stem>.cs` per input; two inputs may not land on the same file.
fn output_targets<'a>(out: &Path, sources: impl IntoIterator<Item = &'a Path>) -> Result<Vec<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut targets = Vec::new();
    for source_path in sources {
        let stem = source_path.file_stem().unwrap_or(source_path.as_os_str());
        let target = out.join(stem).with_extension("cs");
        if let Some(previous) = claimed.insert(target.clone(), source_path) {
            bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                source_path.display(),
                target.display()
            );
        }
        targets.push(target);
    }
    Ok(targets)
}

fn parse_namespace(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        return Err("namespace cannot be empty".to_string());
    }
    Ok(codegen::legal_namespace(raw))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

/// stderr logging, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
