//! Response-stream sink for the archive builder.

use std::io::{self, Seek, SeekFrom, Write};

use tokio::sync::mpsc;

/// Chunks queued between the blocking archive driver and the response
/// body; sends block once the consumer falls this far behind.
pub const CHANNEL_CAPACITY: usize = 16;

pub type ChunkSender = mpsc::Sender<Result<Vec<u8>, io::Error>>;
pub type ChunkReceiver = mpsc::Receiver<Result<Vec<u8>, io::Error>>;

/// `Write + Seek` adapter that feeds archive bytes to the response body
/// as soon as the zip writer can no longer revisit them.
///
/// The zip writer appends forward and seeks backward only to patch the
/// local header of the entry it has just finished; everything below a
/// strict backward-seek target is final and can be transmitted. A
/// position query (`seek(Current(0))`) is not a backward seek and
/// transmits nothing. If the writer never seeks back, all bytes go out
/// in `finish`.
pub struct ChannelSink {
    tx: ChunkSender,
    /// Bytes written but not yet transmitted; `buf[0]` sits at absolute
    /// offset `base`.
    buf: Vec<u8>,
    base: u64,
    /// Current virtual write position (absolute).
    pos: u64,
}

impl ChannelSink {
    pub fn new(tx: ChunkSender) -> Self {
        Self {
            tx,
            buf: Vec::new(),
            base: 0,
            pos: 0,
        }
    }

    /// Transmit everything below `target` that has not gone out yet.
    fn transmit_below(&mut self, target: u64) -> io::Result<()> {
        if target <= self.base {
            return Ok(());
        }
        let count = ((target - self.base) as usize).min(self.buf.len());
        if count == 0 {
            return Ok(());
        }
        let chunk: Vec<u8> = self.buf.drain(..count).collect();
        self.base += count as u64;
        self.tx
            .blocking_send(Ok(chunk))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response consumer disconnected"))
    }

    /// Flush the remaining tail after the container is closed. Consumes
    /// the sink; dropping it afterwards ends the body stream.
    pub fn finish(mut self) -> io::Result<()> {
        let end = self.base + self.buf.len() as u64;
        self.transmit_below(end)
    }
}

impl Write for ChannelSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.pos < self.base {
            return Err(io::Error::other("write into already-transmitted region"));
        }
        let idx = (self.pos - self.base) as usize;
        if idx > self.buf.len() {
            self.buf.resize(idx, 0);
        }
        let end = idx + data.len();
        if end <= self.buf.len() {
            self.buf[idx..end].copy_from_slice(data);
        } else {
            let overlap = self.buf.len() - idx;
            self.buf[idx..].copy_from_slice(&data[..overlap]);
            self.buf.extend_from_slice(&data[overlap..]);
        }
        self.pos += data.len() as u64;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Transmission is gated on seek patterns, not on flush; bytes
        // above the watermark may still be rewritten.
        Ok(())
    }
}

impl Seek for ChannelSink {
    fn seek(&mut self, seek: SeekFrom) -> io::Result<u64> {
        let end = self.base + self.buf.len() as u64;
        let target = match seek {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(delta) => self.pos as i128 + delta as i128,
            SeekFrom::End(delta) => end as i128 + delta as i128,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of stream",
            ));
        }
        let target = target as u64;
        if target < self.pos {
            self.transmit_below(target)?;
        }
        self.pos = target;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagestrip_core::ArchiveBuilder;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn drain(mut rx: ChunkReceiver) -> Vec<u8> {
        let mut out = Vec::new();
        while let Ok(chunk) = rx.try_recv() {
            out.extend_from_slice(&chunk.expect("stream error"));
        }
        out
    }

    #[test]
    fn backward_seek_transmits_final_prefix() {
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut sink = ChannelSink::new(tx);

        sink.write_all(b"0123456789").unwrap();
        // Patch bytes 4..6, the way the zip writer revisits a header
        sink.seek(SeekFrom::Start(4)).unwrap();
        sink.write_all(b"AB").unwrap();
        sink.seek(SeekFrom::End(0)).unwrap();
        sink.write_all(b"xyz").unwrap();

        // The back-seek to 4 finalized the first four bytes
        let first = rx.try_recv().unwrap().unwrap();
        assert_eq!(first, b"0123");

        sink.finish().unwrap();
        let rest = drain(rx);
        assert_eq!(rest, b"AB6789xyz");
    }

    #[test]
    fn position_query_transmits_nothing() {
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut sink = ChannelSink::new(tx);

        sink.write_all(b"header").unwrap();
        sink.seek(SeekFrom::Current(0)).unwrap();
        assert!(rx.try_recv().is_err());

        sink.finish().unwrap();
        assert_eq!(drain(rx), b"header");
    }

    #[test]
    fn dropped_receiver_fails_the_next_transmit() {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut sink = ChannelSink::new(tx);
        drop(rx);

        sink.write_all(b"doomed").unwrap();
        let err = sink.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn zip_written_through_channel_sink_is_readable() {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let mut builder = ArchiveBuilder::new(ChannelSink::new(tx));
        builder.append("modified-a.pdf", b"alpha contents").unwrap();
        builder.append("modified-b.pdf", b"beta contents").unwrap();
        builder.finalize().unwrap().finish().unwrap();

        let bytes = drain(rx);
        let mut archive = ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        assert_eq!(archive.len(), 2);

        let mut names = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            names.push(entry.name().to_string());
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).unwrap();
            assert!(!contents.is_empty());
        }
        assert_eq!(names, vec!["modified-a.pdf", "modified-b.pdf"]);
    }
}
