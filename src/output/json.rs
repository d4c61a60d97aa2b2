//! JSON feed exports
//!
//! Both sinks write UTF-8 and flush after every record.

use crate::output::traits::{OutputResult, ProductRecord, ProductSink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One JSON object per line
pub struct JsonLinesSink {
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl ProductSink for JsonLinesSink {
    fn write(&mut self, record: &ProductRecord) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// A single JSON array, closed by `finish`
pub struct JsonArraySink {
    writer: BufWriter<File>,
    written: usize,
    finished: bool,
}

impl JsonArraySink {
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(b"[")?;
        Ok(Self {
            writer,
            written: 0,
            finished: false,
        })
    }
}

impl ProductSink for JsonArraySink {
    fn write(&mut self, record: &ProductRecord) -> OutputResult<()> {
        if self.written > 0 {
            self.writer.write_all(b",")?;
        }
        self.writer.write_all(b"\n")?;
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if !self.finished {
            self.writer.write_all(b"\n]\n")?;
            self.finished = true;
        }
        self.writer.flush()?;
        Ok(())
    }
}
