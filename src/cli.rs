use std::path::PathBuf;

use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

use nucpack::{MoleculeKind, DEFAULT_BUFFER_CAPACITY, LINE_WIDTH};

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version,
    about = "lossless conversion between FASTA and 2-bit packed containers",
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack a FASTA file (optionally compressed) into a .bin container
    #[command(arg_required_else_help = true)]
    Encode {
        /// the input FASTA file
        input: PathBuf,

        /// molecule kind of every record: dna or rna
        #[arg(short, long)]
        kind: MoleculeKind,

        /// directory for the container(s), created if missing
        #[arg(short, long)]
        output_dir: PathBuf,

        /// write one container per record, named after its description
        #[arg(long)]
        split: bool,

        /// bytes of sequence text buffered before packing
        #[arg(long, default_value_t = DEFAULT_BUFFER_CAPACITY)]
        buffer_capacity: usize,

        /// drop records with invalid nucleotides instead of aborting
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Unpack a .bin container back into FASTA
    #[command(arg_required_else_help = true)]
    Decode {
        /// the input .bin container
        input: PathBuf,

        /// existing directory for the .fasta output
        #[arg(short, long)]
        output_dir: PathBuf,

        /// nucleotides per output line (0 disables wrapping)
        #[arg(short, long, default_value_t = LINE_WIDTH)]
        line_width: usize,
    },

    /// Print the record layout of a .bin container
    #[command(arg_required_else_help = true)]
    Inspect {
        /// the input .bin container
        input: PathBuf,

        /// dump the raw bytes instead of the record table
        #[arg(long)]
        hex: bool,
    },
}
