//! Zip container assembly over a pluggable sink.

use std::io::{Seek, Write};

use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::PageStripError;

/// Deflate at maximal effort; fixed, no runtime override.
const COMPRESSION_LEVEL: i64 = 9;

/// Write-append-finalize builder for the output container.
///
/// The sink is anything `Write + Seek`: an in-memory cursor, a temp
/// file, or a response-stream adapter. Finalizing consumes the builder,
/// so "exactly one finalize, no append afterwards" holds by
/// construction.
pub struct ArchiveBuilder<W: Write + Seek> {
    writer: ZipWriter<W>,
}

impl<W: Write + Seek> ArchiveBuilder<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: ZipWriter::new(sink),
        }
    }

    /// Append one named entry. Names are taken as-is; duplicate names
    /// are passed through without collision detection.
    pub fn append(&mut self, entry_name: &str, content: &[u8]) -> Result<(), PageStripError> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(COMPRESSION_LEVEL));
        self.writer.start_file(entry_name, options)?;
        self.writer.write_all(content)?;
        Ok(())
    }

    /// Flush buffered entries, close the container, and hand the sink
    /// back to the caller.
    pub fn finalize(self) -> Result<W, PageStripError> {
        let mut writer = self.writer;
        Ok(writer.finish()?)
    }
}
