use clap::Parser;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use huati_layout::check_tree;
use huati_protocol::{Corpus, CorpusPack};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Validates a JSON sentence corpus and compiles it to an rkyv pack")]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE", required_unless_present = "check")]
    output: Option<PathBuf>,

    /// Validate only; do not write a pack.
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!(input = ?cli.input, "reading corpus");
    let input_data = fs::read_to_string(&cli.input).with_context(|| format!("reading {:?}", cli.input))?;
    let corpus: Corpus = serde_json::from_str(&input_data).with_context(|| format!("parsing {:?}", cli.input))?;

    let defects = audit(&corpus);
    if defects > 0 {
        bail!("{} contract violation(s) in {:?}", defects, cli.input);
    }
    info!(version = corpus.version, sentences = corpus.sentences.len(), "corpus is well-formed");

    if cli.check {
        return Ok(());
    }
    let Some(output) = cli.output else {
        bail!("--output is required unless --check is given");
    };

    let bytes = CorpusPack::from_corpus(&corpus).to_bytes()?;
    fs::write(&output, &bytes).with_context(|| format!("writing {:?}", output))?;

    info!(output = ?output, bytes = bytes.len(), "pack written");
    Ok(())
}

/// Logs every defect and returns how many there were.
fn audit(corpus: &Corpus) -> usize {
    let mut defects = 0;
    let mut seen = HashSet::new();

    for sentence in &corpus.sentences {
        if !seen.insert(sentence.id.as_str()) {
            error!(sentence = %sentence.id, "duplicate sentence id");
            defects += 1;
        }
        if sentence.tree.is_dropped {
            warn!(sentence = %sentence.id, "root is a ghost; hiding ghosts will render nothing");
        }
        for err in check_tree(&sentence.tree) {
            error!(sentence = %sentence.id, "{}", err);
            defects += 1;
        }
    }

    defects
}
