// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan-look filters — the per-pixel kernels and the decode/transform/encode engine.

pub mod engine;
pub mod kernel;

pub use engine::FilterEngine;
