// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — decode to RGBA, scale for rendering, encode to PNG.

pub mod processor;

pub use processor::ImageProcessor;
