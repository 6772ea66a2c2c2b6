use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use stitchtrim::io_utils::{open_input, open_output, OutputFormat};
use stitchtrim::pipeline::{trim_by_contig, trim_by_region};
use stitchtrim::samples_io::{read_regions, read_windows, write_trims};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Trim overlapping consensus windows into a non-overlapping tiling"
)]
struct Args {
    /// Window table (use '-' for stdin). Supports .gz and .zst compressed files.
    input: String,

    /// BED file of regions to restrict each contig's trims to
    #[arg(long)]
    regions: Option<String>,

    /// Output table (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gzip-compress the output
    #[arg(long)]
    gz: bool,

    /// Zstd-compress the output
    #[arg(long)]
    zstd: bool,

    /// Omit windows that fall entirely outside the region
    #[arg(long)]
    skip_excluded: bool,

    /// Worker threads (default: all cores)
    #[arg(short, long)]
    threads: Option<usize>,
}

impl Args {
    fn output_format(&self) -> Result<OutputFormat> {
        if self.gz && self.zstd {
            bail!("--gz and --zstd are mutually exclusive");
        }
        let format = match (self.gz, self.zstd) {
            (true, _) => OutputFormat::Gzip,
            (_, true) => OutputFormat::Zstd,
            _ => OutputFormat::Plain,
        };
        if format != OutputFormat::Plain && self.output.is_none() {
            bail!("--output is required when compressing output");
        }
        Ok(format)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let format = args.output_format()?;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
    }

    let reader = open_input(&args.input)?;
    let table = read_windows(BufReader::new(reader))
        .with_context(|| format!("failed to read windows from '{}'", args.input))?;

    let rows = match &args.regions {
        Some(path) => {
            let regions = read_regions(open_input(path)?, &table)
                .with_context(|| format!("failed to read regions from '{path}'"))?;
            trim_by_region(&table, &regions)?
        }
        None => trim_by_contig(&table)?,
    };

    let mut writer = open_output(args.output.as_deref(), format)?;
    write_trims(&mut writer, &table, &rows, args.skip_excluded)?;
    writer.finish()?;

    let heuristic = rows.iter().filter(|r| r.trim.heuristic).count();
    let excluded = rows.iter().filter(|r| r.trim.is_excluded()).count();
    info!("windows: {}", rows.len());
    info!("heuristic: {heuristic}");
    info!("excluded: {excluded}");

    Ok(())
}
