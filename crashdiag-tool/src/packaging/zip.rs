use anyhow::{Context, Result};
use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipEntryBuilder};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Compression preference for archive entries.
#[derive(Debug, Clone, Copy)]
pub enum Compressor {
    Deflate,
    Stored,
}

impl Compressor {
    fn to_compression(self) -> Compression {
        match self {
            Compressor::Deflate => Compression::Deflate,
            Compressor::Stored => Compression::Stored,
        }
    }
}

/// Streaming ZIP container writer. Entry names are caller-supplied and
/// written as-is; nothing guards against duplicates.
pub struct ZipBundle {
    writer: ZipFileWriter<File>,
    compressor: Compressor,
}

impl ZipBundle {
    /// Creates the container file at `path`.
    pub async fn create(path: &Path, compressor: Compressor) -> Result<Self> {
        let file = File::create(path)
            .await
            .with_context(|| format!("creating archive {path:?}"))?;
        Ok(ZipBundle {
            writer: ZipFileWriter::with_tokio(file),
            compressor,
        })
    }

    /// Writes one named entry with the bundle's compression preference.
    pub async fn add_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let entry = ZipEntryBuilder::new(name.to_string().into(), self.compressor.to_compression());
        self.writer
            .write_entry_whole(entry, data)
            .await
            .with_context(|| format!("writing archive entry {name}"))?;
        Ok(())
    }

    /// Reads a file whole and writes it as one named entry.
    pub async fn add_file(&mut self, name: &str, path: &Path) -> Result<()> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {path:?}"))?;
        self.add_bytes(name, &data).await
    }

    /// Finalizes the container and flushes it to disk.
    pub async fn finish(self) -> Result<()> {
        let compat = self.writer.close().await.context("finalizing archive")?;
        let mut file = compat.into_inner();
        file.shutdown().await.context("flushing archive")?;
        Ok(())
    }
}
