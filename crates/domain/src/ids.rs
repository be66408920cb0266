// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Strategy for naming generated records.
pub trait IdGenerator {
    /// Formats an identifier from a prefix and a sequence number.
    fn format(&self, prefix: &str, sequence: u32) -> String;

    /// Formats the numeric barcode printed on a purchased tire.
    fn barcode(&self, stage: u8, sequence: u32) -> String {
        format!("{stage}{sequence:05}")
    }

    /// Returns the first identifier with this prefix not present in `existing`,
    /// starting after the number of existing ids.
    fn next_free(&self, prefix: &str, existing: &[String]) -> String {
        let mut sequence: u32 = u32::try_from(existing.len()).unwrap_or(u32::MAX - 1) + 1;
        loop {
            let candidate: String = self.format(prefix, sequence);
            if !existing.contains(&candidate) {
                return candidate;
            }
            sequence = sequence.saturating_add(1);
        }
    }
}

/// Prefix followed by a zero padded counter (`P1001`, `S001`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialIds {
    pub width: usize,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self { width: 3 }
    }
}

impl IdGenerator for SequentialIds {
    fn format(&self, prefix: &str, sequence: u32) -> String {
        format!("{prefix}{sequence:0width$}", width = self.width)
    }
}

/// Default tire prefix for a stage (`P1`, `P2`, ...).
#[must_use]
pub fn default_tire_prefix(stage: u8) -> String {
    format!("P{stage}")
}

/// Prefix of generated set ids.
pub const SET_PREFIX: &str = "S";
