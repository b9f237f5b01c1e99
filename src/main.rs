#[macro_use]
extern crate log;
use std::{
    fs::File,
    io::{stdout, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;

use nucpack::{
    decode_container, encode_split, finish_file,
    inspect::{hex_dump, summarize, write_summary},
    paths::{self, CONTAINER_EXTENSION, FASTA_EXTENSION},
    FastaEncoderBuilder, MoleculeKind, Policy,
};

mod cli;

use cli::{Cli, Commands};

fn encode(
    input: &Path,
    kind: MoleculeKind,
    output_dir: &Path,
    split: bool,
    buffer_capacity: usize,
    skip_invalid: bool,
) -> Result<()> {
    let source = paths::open_input(input)?;
    paths::ensure_output_dir(output_dir)?;

    let policy = if skip_invalid {
        Policy::SkipRecord
    } else {
        Policy::Abort
    };
    let builder = FastaEncoderBuilder::default()
        .kind(kind)
        .buffer_capacity(buffer_capacity)
        .policy(policy);

    if split {
        let summary = encode_split(source, output_dir, builder)?;
        info!(
            "Encoded {} records ({} nucleotides) into {} containers, skipped {}",
            summary.totals.records,
            summary.totals.nucleotides,
            summary.files.len(),
            summary.totals.skipped
        );
        return Ok(());
    }

    let out_path = paths::output_path(input, output_dir, CONTAINER_EXTENSION)?;
    let out_handle = File::create(&out_path)
        .map(BufWriter::new)
        .with_context(|| format!("Could not create {}", out_path.display()))?;
    let mut encoder = builder.build(out_handle)?;
    encoder.encode(source)?;
    let summary = finish_file(encoder)?;
    info!(
        "Encoded {} records ({} nucleotides, {} bytes) into {}, skipped {}",
        summary.records,
        summary.nucleotides,
        summary.bytes,
        out_path.display(),
        summary.skipped
    );
    debug!("Buffer flushed {} times", summary.buffer_flushes);
    Ok(())
}

fn decode(input: &Path, output_dir: &Path, line_width: usize) -> Result<()> {
    paths::validate_container_input(input)?;
    paths::validate_output_dir(output_dir)?;

    let out_path = paths::output_path(input, output_dir, FASTA_EXTENSION)?;
    let in_handle = File::open(input).map(BufReader::new)?;
    let out_handle = File::create(&out_path)
        .map(BufWriter::new)
        .with_context(|| format!("Could not create {}", out_path.display()))?;

    let summary = decode_container(in_handle, out_handle, line_width)?;
    info!(
        "Decoded {} {} records ({} nucleotides) into {}",
        summary.records,
        summary.kind,
        summary.nucleotides,
        out_path.display()
    );
    Ok(())
}

fn inspect(input: &Path, hex: bool) -> Result<()> {
    paths::validate_container_input(input)?;
    let in_handle = File::open(input).map(BufReader::new)?;
    let mut out = BufWriter::new(stdout().lock());
    if hex {
        hex_dump(in_handle, &mut out)?;
    } else {
        let (kind, records) = summarize(in_handle)?;
        write_summary(&mut out, kind, &records)?;
    }
    out.flush()?;
    Ok(())
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Encode {
            input,
            kind,
            output_dir,
            split,
            buffer_capacity,
            skip_invalid,
        } => encode(
            input,
            *kind,
            output_dir,
            *split,
            *buffer_capacity,
            *skip_invalid,
        )?,
        Commands::Decode {
            input,
            output_dir,
            line_width,
        } => decode(input, output_dir, *line_width)?,
        Commands::Inspect { input, hex } => inspect(input, *hex)?,
    }
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));
        std::process::exit(1);
    }
}
