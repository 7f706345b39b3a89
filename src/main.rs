use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod error;
mod index;
mod io;
mod mapping;
mod search;
mod util;

use crate::io::query::QueryKind;
use crate::mapping::MapOpt;
use crate::search::SearchParams;
use crate::util::aa::MatchingMode;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "pepmap", author, version, about = "FM-index based peptide and tag to proteome mapper", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum MatchingArg {
    /// 逐字符严格匹配
    String,
    /// 展开歧义码（X/B/Z/J）
    AminoAcid,
    /// 歧义码之上将 I/L 视为不可区分
    Indistinguishable,
}

impl From<MatchingArg> for MatchingMode {
    fn from(m: MatchingArg) -> Self {
        match m {
            MatchingArg::String => MatchingMode::String,
            MatchingArg::AminoAcid => MatchingMode::AminoAcid,
            MatchingArg::Indistinguishable => MatchingMode::IndistinguishableAminoAcids,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the FM index over a protein FASTA database
    Index {
        /// Protein FASTA file
        fasta: String,
        /// Output prefix for the index file (<prefix>.pmi)
        #[arg(short, long, default_value = "proteome")]
        output: String,
    },
    /// Map peptides, patterns or tags against a built index
    Map {
        /// Path to the index file (.pmi)
        #[arg(short = 'i', long = "index")]
        index: String,
        /// Query file: one peptide / pattern / tag per line, '#' comments
        queries: String,
        /// Output CSV path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
        /// Treat query lines as bracket patterns, e.g. [TEST]TE[ST]
        #[arg(long, conflicts_with = "tags")]
        patterns: bool,
        /// Treat query lines as sequence tags, e.g. 1115.49,LTSESSV,1094.59
        #[arg(long)]
        tags: bool,
        #[arg(long = "max-substitutions", default_value_t = 0)]
        max_substitutions: u32,
        #[arg(long = "max-insertions", default_value_t = 0)]
        max_insertions: u32,
        #[arg(long = "max-deletions", default_value_t = 0)]
        max_deletions: u32,
        #[arg(long = "matching", value_enum, default_value = "indistinguishable")]
        matching: MatchingArg,
        /// Queries with a higher X fraction yield no rows
        #[arg(long = "limit-x", default_value_t = 0.25)]
        limit_x: f64,
        /// Fragment mass tolerance for tag gaps [Da]
        #[arg(long = "tolerance", default_value_t = 0.02)]
        tolerance: f64,
        /// Expanding a query X to a concrete residue consumes a substitution
        #[arg(long = "x-as-edit")]
        x_as_edit: bool,
        /// Decorate matched sequences with flanking residues (K.PEPTIDE.R)
        #[arg(short = 'f', long = "flanking")]
        flanking: bool,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Index { fasta, output } => run_index(&fasta, &output),
        Commands::Map {
            index,
            queries,
            out,
            patterns,
            tags,
            max_substitutions,
            max_insertions,
            max_deletions,
            matching,
            limit_x,
            tolerance,
            x_as_edit,
            flanking,
            threads,
        } => {
            let kind = if patterns {
                QueryKind::Pattern
            } else if tags {
                QueryKind::Tag
            } else {
                QueryKind::Peptide
            };
            let opt = MapOpt {
                kind,
                params: SearchParams {
                    max_substitutions,
                    max_insertions,
                    max_deletions,
                    matching: matching.into(),
                    limit_x,
                    fragment_tolerance: tolerance,
                    x_counts_as_edit: x_as_edit,
                },
                flanking,
                threads,
            };
            mapping::map_queries(&index, &queries, out.as_deref(), &opt)
        }
    }
}

fn run_index(fasta: &str, output: &str) -> Result<()> {
    let fh = std::fs::File::open(fasta)
        .map_err(|e| anyhow::anyhow!("cannot open protein FASTA '{}': {}", fasta, e))?;
    let buf = std::io::BufReader::new(fh);
    let records = io::fasta::FastaReader::new(buf).read_all()?;

    let n_seqs = records.len();
    let total_len: usize = records.iter().map(|r| r.seq.len()).sum();

    let started = std::time::Instant::now();
    let (text, spans) = index::corpus::build_corpus(&records)?;
    let corpus_len = text.len();
    let sa = index::sa::build_sa(&text);
    let bwt = index::bwt::build_bwt(&text, &sa);
    let mut fm = index::fm::FMIndex::build(
        text,
        bwt,
        &sa,
        spans,
        util::aa::SIGMA as u8,
        index::fm::DEFAULT_OCC_BLOCK,
        index::fm::DEFAULT_SA_SHIFT,
    )?;
    fm.set_meta(index::fm::IndexMeta {
        fasta_file: Some(fasta.to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });

    println!("database:  {}", fasta);
    println!("proteins:  {}", n_seqs);
    println!("residues:  {}", total_len);
    println!("corpus:    {} symbols", corpus_len);
    println!("build:     {:.2}s", started.elapsed().as_secs_f64());
    println!(
        "memory:    {:.1} MB",
        fm.allocated_bytes() as f64 / (1024.0 * 1024.0)
    );

    let out_path = format!("{}.pmi", output);
    fm.save_to_file(&out_path)
        .map_err(|e| anyhow::anyhow!("cannot write index to '{}': {}", out_path, e))?;
    println!("FM index saved: {}", out_path);
    Ok(())
}
