// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod category;
pub mod charts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod convert;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod metadata;
pub mod models;
pub mod nights;
pub mod utils;
