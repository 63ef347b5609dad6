// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised by the cleaning, aggregation and chart layers.
///
/// Every variant is fatal to the run. Missing nights entries are not errors:
/// they surface as a `None` per-day amount and a logged warning.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("report provider failed: {0}")]
    Provider(String),

    #[error("cannot build chart: {0}")]
    Chart(String),

    #[error("unknown axis '{0}' (use city|country)")]
    UnknownAxis(String),
}

impl PipelineError {
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        PipelineError::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        PipelineError::Config(reason.into())
    }
}
