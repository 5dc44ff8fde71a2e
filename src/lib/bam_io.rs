//! BAM reader and writer construction.
//!
//! The BGZF codec is the only parallel part of the pipeline: record
//! processing is strictly single-pass, but compression and decompression
//! can fan out across workers without changing the record order the caller
//! observes. Readers and writers are built over an enum of the serial and
//! threaded noodles codecs so the rest of the crate is generic over the
//! thread count, and writers expose an explicit finish path so the BGZF EOF
//! block always lands.

use anyhow::{Context, Result};
use noodles::bgzf::io::{
    MultithreadedReader, MultithreadedWriter, Reader as BgzfReader, Writer as BgzfWriter,
    multithreaded_writer, writer::CompressionLevel,
};
use noodles::sam::Header;
use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::num::NonZero;
use std::path::Path;

/// BGZF decompressor, serial or threaded.
pub enum BgzfDecoder {
    /// In-process decompression
    Serial(BgzfReader<File>),
    /// Worker-pool decompression
    Threaded(MultithreadedReader<File>),
}

/// BGZF compressor, serial or threaded.
pub enum BgzfEncoder {
    /// In-process compression
    Serial(BgzfWriter<File>),
    /// Worker-pool compression
    Threaded(MultithreadedWriter<File>),
}

/// BAM reader over either decompressor flavor.
pub type BamReader = noodles::bam::io::Reader<BgzfDecoder>;

/// BAM writer over either compressor flavor.
pub type BamWriter = noodles::bam::io::Writer<BgzfEncoder>;

impl Read for BgzfDecoder {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Serial(inner) => inner.read(buf),
            Self::Threaded(inner) => inner.read(buf),
        }
    }
}

impl BufRead for BgzfDecoder {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::Serial(inner) => inner.fill_buf(),
            Self::Threaded(inner) => inner.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::Serial(inner) => inner.consume(amt),
            Self::Threaded(inner) => inner.consume(amt),
        }
    }
}

impl Write for BgzfEncoder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Serial(inner) => inner.write(buf),
            Self::Threaded(inner) => inner.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Serial(inner) => inner.flush(),
            Self::Threaded(inner) => inner.flush(),
        }
    }
}

impl BgzfEncoder {
    /// Flushes remaining blocks and, for the threaded flavor, joins the
    /// worker pool so the EOF marker is written in order.
    ///
    /// # Errors
    ///
    /// Returns an error if a final flush fails or a worker panicked.
    pub fn finish(self) -> io::Result<()> {
        match self {
            // The serial writer appends the EOF block on drop
            Self::Serial(mut inner) => inner.flush(),
            Self::Threaded(mut inner) => {
                inner.finish().map(|_| ()).map_err(|e| io::Error::other(e.to_string()))
            }
        }
    }
}

/// Opens a BAM file for reading and consumes its header.
///
/// `threads` selects the BGZF decompressor: 1 for serial, more for a
/// worker pool. Record order is unaffected either way.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its header is invalid.
pub fn create_bam_reader<P: AsRef<Path>>(path: P, threads: usize) -> Result<(BamReader, Header)> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("opening input BAM {}", path.display()))?;

    let decoder = match NonZero::new(threads) {
        Some(workers) if workers.get() > 1 => {
            BgzfDecoder::Threaded(MultithreadedReader::with_worker_count(workers, file))
        }
        _ => BgzfDecoder::Serial(BgzfReader::new(file)),
    };

    let mut reader = noodles::bam::io::Reader::from(decoder);
    let header = reader
        .read_header()
        .with_context(|| format!("reading header of {}", path.display()))?;

    Ok((reader, header))
}

/// Creates a BAM file and writes the given header to it.
///
/// `threads` selects the BGZF compressor as for [`create_bam_reader`];
/// `compression_level` is the BGZF level (1 fastest, 12 smallest).
///
/// # Errors
///
/// Returns an error if the file cannot be created or the header write fails.
pub fn create_bam_writer<P: AsRef<Path>>(
    path: P,
    header: &Header,
    threads: usize,
    compression_level: u32,
) -> Result<BamWriter> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("creating output BAM {}", path.display()))?;

    #[allow(clippy::cast_possible_truncation)]
    let level = CompressionLevel::new(compression_level as u8);

    let encoder = match NonZero::new(threads) {
        Some(workers) if workers.get() > 1 => {
            let mut builder =
                multithreaded_writer::Builder::default().set_worker_count(workers);
            if let Some(level) = level {
                builder = builder.set_compression_level(level);
            }
            BgzfEncoder::Threaded(builder.build_from_writer(file))
        }
        _ => {
            let mut builder = noodles::bgzf::io::writer::Builder::default();
            if let Some(level) = level {
                builder = builder.set_compression_level(level);
            }
            BgzfEncoder::Serial(builder.build_from_writer(file))
        }
    };

    let mut writer = noodles::bam::io::Writer::from(encoder);
    writer
        .write_header(header)
        .with_context(|| format!("writing header to {}", path.display()))?;
    Ok(writer)
}

/// Flushes a BAM writer and finalizes the BGZF stream.
///
/// # Errors
///
/// Returns an error if the final flush or worker join fails.
pub fn finalize_bam_writer(writer: BamWriter) -> Result<()> {
    writer.into_inner().finish().context("finalizing output BAM")
}

/// True when the path denotes standard input ("-" or /dev/stdin).
pub fn is_stdin_path<P: AsRef<Path>>(path: P) -> bool {
    matches!(path.as_ref().to_string_lossy().as_ref(), "-" | "/dev/stdin")
}
