//! Struct archiving functionality
//!
//! An [`Archiver`] writes serialisable records as rows of a CSV file in the
//! session's archive directory. An uninitialised archiver silently discards
//! records, so code which produces archive data does not need to care whether
//! a session exists (unit tests in particular run without one).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::Path;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver writing to the given path relative to the
    /// session's archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session,
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut arch_path = session.arch_root.clone();
        arch_path.push(path);

        // Create any parent directories and the file itself
        if let Some(parent) = arch_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        File::create(arch_path.clone())?;

        // Open the file in append mode
        let file = OpenOptions::new().append(true).open(arch_path)?;

        let writer = WriterBuilder::new().has_headers(true).from_writer(file);

        Ok(Self {
            writer: Some(writer),
        })
    }

    /// Serialise a record into the archive.
    ///
    /// Does nothing if the archiver was never attached to a file.
    pub fn serialise<T: Serialize>(
        &mut self,
        record: T,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(ref mut writer) = self.writer {
            writer.serialize(record)?;
            writer.flush()?;
        }

        Ok(())
    }
}
