//! Error types for the scheduling pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing IFC files.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read the IFC file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The STEP format is invalid or malformed.
    #[error("invalid STEP format: {message}")]
    InvalidStep { message: String },
}

/// Errors that can occur when loading or saving the project document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the project document from disk.
    #[error("failed to read project document '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid JSON for the project schema.
    #[error("JSON (de)serialization failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },
}

/// Errors that can occur when reading the CSV input tables.
#[derive(Debug, Error)]
pub enum InputError {
    /// Failed to open the input file.
    #[error("failed to open input '{path}': {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A CSV record could not be read or deserialized.
    #[error("CSV read failed: {source}")]
    CsvRead {
        #[from]
        source: csv::Error,
    },

    /// A required column is missing from the table.
    #[error("column '{column}' not found in '{path}'")]
    MissingColumn { column: String, path: PathBuf },
}

/// Errors that can occur when loading the productivity configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration is not valid JSON.
    #[error("config JSON parse failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// A productivity rate is zero, negative or not finite.
    #[error("invalid productivity rate {rate} for task '{task}'")]
    InvalidRate { task: String, rate: f64 },
}

/// Errors that can occur when exporting reports.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
