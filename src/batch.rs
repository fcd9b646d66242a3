//! Batch generation over variable record sets
//!
//! One conversation template, many variable records, one image per record.
//! Records come from a JSON array of objects or from a CSV file whose header
//! row names the variables. Records are processed strictly in order and the
//! first failure aborts the remainder of the run.

use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::capture::Capture;
use crate::error::{Error, Result};
use crate::input::{self, Description};
use crate::model::ChatFile;
use crate::render::{self, RenderContext};
use crate::template::{self, Variables};

/// Record file syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    /// Pick the format from a file extension; JSON is the default.
    pub fn from_path(path: &Path) -> RecordFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => RecordFormat::Csv,
            _ => RecordFormat::Json,
        }
    }
}

/// Parse batch records; every record becomes one variable set.
pub fn parse_records(text: &str, format: RecordFormat) -> Result<Vec<Variables>> {
    match format {
        RecordFormat::Json => serde_json::from_str(text)
            .map_err(|e| Error::malformed(format!("batch data: {e}"))),
        RecordFormat::Csv => parse_csv_records(text),
    }
}

/// CSV rows become string-valued variable sets keyed by the header row.
fn parse_csv_records(text: &str) -> Result<Vec<Variables>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| Error::malformed(format!("batch data: {e}")))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| Error::malformed(format!("batch data: {e}")))?;
        let mut vars = Variables::new();
        for (key, field) in headers.iter().zip(row.iter()) {
            vars.insert(key.to_string(), Value::String(field.to_string()));
        }
        records.push(vars);
    }
    Ok(records)
}

/// Runner-level display settings shared by every record
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory receiving the generated images
    pub output_dir: PathBuf,
    /// Document width in CSS pixels
    pub width: u32,
    /// Render every record with the dark palette
    pub dark: bool,
    /// Force the Android style for every record
    pub force_android: bool,
}

impl Default for BatchOptions {
    fn default() -> BatchOptions {
        BatchOptions {
            output_dir: PathBuf::from("./output"),
            width: crate::DEFAULT_WIDTH,
            dark: false,
            force_android: false,
        }
    }
}

/// Drives one conversation template over many variable records
pub struct BatchRunner {
    description: Description,
    defaults: Variables,
    records: Vec<Variables>,
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(
        description: Description,
        records: Vec<Variables>,
        options: BatchOptions,
    ) -> BatchRunner {
        let defaults = description.default_variables();
        BatchRunner {
            description,
            defaults,
            records,
            options,
        }
    }

    /// Number of records in the run
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve record `index` into its model and output path.
    ///
    /// The record's filename comes from the substituted description when it
    /// declares one, otherwise it defaults to `output-<n>.png` with a
    /// 1-based record number. The winning name takes one more substitution
    /// pass, so placeholders arriving inside variable values still expand,
    /// then it is sanitized and joined under the output directory.
    fn prepare(&self, index: usize) -> Result<(ChatFile, PathBuf)> {
        let record = &self.records[index];
        let vars = input::merge_variables(&self.defaults, record);
        let chat = self.description.resolve(&vars)?;

        let filename = chat
            .output
            .filename
            .clone()
            .unwrap_or_else(|| format!("output-{}.png", index + 1));
        let filename = template::expand_str(&filename, &vars);
        let path = self
            .options
            .output_dir
            .join(template::sanitize_filename(&filename));
        Ok((chat, path))
    }

    /// The output path of every record, in order, without rendering.
    pub fn output_paths(&self) -> Result<Vec<PathBuf>> {
        (0..self.records.len())
            .map(|index| self.prepare(index).map(|(_, path)| path))
            .collect()
    }

    /// Render and capture every record in order; returns the written paths.
    pub fn run(&self, capture: &Capture) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.options.output_dir)?;

        let total = self.records.len();
        let mut written = Vec::with_capacity(total);
        for index in 0..total {
            let (mut chat, path) = self.prepare(index)?;
            input::resolve_avatar(&mut chat.conversation.contact);

            let display_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            println!("[{}/{}] Generating: {}", index + 1, total, display_name);

            let variant = chat.style(self.options.force_android);
            debug!("Record {} uses style {:?}", index + 1, variant);

            let ctx = RenderContext::new(variant, self.options.dark, self.options.width);
            let document = render::render_document(&chat.conversation, &ctx);
            capture.capture(&document, &path)?;
            written.push(path);
        }
        Ok(written)
    }
}
