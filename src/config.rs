//! Configuration management for acquisition and export runs
//!
//! This module provides runtime configuration loading from JSON files, so
//! dataset locations, the label range and export options can be changed
//! without recompiling. Command-line flags override individual values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub acquisition: AcquisitionConfig,
    pub export: ExportConfig,
}

/// Dataset store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Backing CSV file shared by acquisition and export
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sensor_samples.csv"),
        }
    }
}

/// Acquisition session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Smallest accepted label
    pub label_min: i32,
    /// Largest accepted label
    pub label_max: i32,
    /// Print the operator instructions banner at session start
    pub show_instructions: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            label_min: 1,
            label_max: 6,
            show_instructions: true,
        }
    }
}

/// Include guard flavour for the exported header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeGuard {
    /// `#pragma once`
    PragmaOnce,
    /// `#ifndef` / `#define` / `#endif`
    Ifndef,
}

/// Export run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Destination of the generated lookup table
    pub output_path: PathBuf,
    /// Optional column marking training rows; ignored when absent from the table
    pub row_type_column: Option<String>,
    /// Value of `row_type_column` that selects a training row
    pub train_value: String,
    pub include_guard: IncludeGuard,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("dataset.h"),
            row_type_column: Some("row_type".to_string()),
            train_value: "train".to_string(),
            include_guard: IncludeGuard::PragmaOnce,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file("assets/posture_config.json")
    }

    /// Accepted label range as an inclusive pair
    pub fn label_range(&self) -> (i32, i32) {
        (self.acquisition.label_min, self.acquisition.label_max)
    }
}
