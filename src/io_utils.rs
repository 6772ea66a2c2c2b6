use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Output compression for written tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Gzip,
    Zstd,
}

fn sniff<R: Read + 'static>(mut br: BufReader<R>) -> Result<Box<dyn Read>> {
    let buf = br.fill_buf()?;
    let is_gz = buf.starts_with(&GZIP_MAGIC);
    let is_zst = buf.starts_with(&ZSTD_MAGIC);
    if is_gz {
        Ok(Box::new(MultiGzDecoder::new(br)))
    } else if is_zst {
        Ok(Box::new(zstd::stream::read::Decoder::with_buffer(br)?))
    } else {
        Ok(Box::new(br))
    }
}

/// Opens `path` (or stdin for `-`), transparently decompressing gzip and zstd.
pub fn open_input(path: &str) -> Result<Box<dyn Read>> {
    if path == "-" {
        sniff(BufReader::new(io::stdin()))
    } else {
        let f = File::open(path).with_context(|| format!("failed to open input '{path}'"))?;
        sniff(BufReader::new(f))
    }
}

type Sink = BufWriter<Box<dyn Write>>;

/// A possibly compressed output stream.
///
/// Must be closed with [`OutputWriter::finish`]; dropping it loses any error
/// raised while writing the compression trailer.
pub enum OutputWriter {
    Plain(Sink),
    Gzip(GzEncoder<Sink>),
    Zstd(zstd::stream::write::Encoder<'static, Sink>),
}

impl OutputWriter {
    pub fn new(sink: Box<dyn Write>, format: OutputFormat) -> Result<Self> {
        let sink = BufWriter::new(sink);
        Ok(match format {
            OutputFormat::Plain => OutputWriter::Plain(sink),
            OutputFormat::Gzip => OutputWriter::Gzip(GzEncoder::new(sink, Compression::default())),
            OutputFormat::Zstd => OutputWriter::Zstd(zstd::stream::write::Encoder::new(sink, 0)?),
        })
    }

    /// Writes the compression trailer, if any, and flushes everything to the
    /// underlying file or stdout.
    pub fn finish(self) -> Result<()> {
        let sink = match self {
            OutputWriter::Plain(sink) => sink,
            OutputWriter::Gzip(gz) => gz.finish().context("failed to finish gzip output")?,
            OutputWriter::Zstd(zst) => zst.finish().context("failed to finish zstd output")?,
        };
        let mut inner = sink
            .into_inner()
            .map_err(|e| e.into_error())
            .context("failed to flush output")?;
        inner.flush().context("failed to flush output")?;
        Ok(())
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputWriter::Plain(w) => w.write(buf),
            OutputWriter::Gzip(w) => w.write(buf),
            OutputWriter::Zstd(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputWriter::Plain(w) => w.flush(),
            OutputWriter::Gzip(w) => w.flush(),
            OutputWriter::Zstd(w) => w.flush(),
        }
    }
}

/// Opens `path` for writing (stdout when `None`), compressing as requested.
pub fn open_output(path: Option<&Path>, format: OutputFormat) -> Result<OutputWriter> {
    let sink: Box<dyn Write> = match path {
        Some(p) => {
            let f = File::create(p)
                .with_context(|| format!("failed to create output '{}'", p.display()))?;
            Box::new(f)
        }
        None => Box::new(io::stdout()),
    };
    OutputWriter::new(sink, format)
}
