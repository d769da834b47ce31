// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Concurrency Runtime Support
//!
//! The shared worker pool (§4.6, §5, §10.4) every module host task offloads
//! blocking work through.

pub mod worker_pool;

pub use worker_pool::WorkerPool;
