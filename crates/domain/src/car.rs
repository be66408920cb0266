// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::Date;

/// A car tires are purchased for and sets are mounted on.
///
/// The name is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub name: String,
    pub race_number: Option<u16>,
    pub driver: String,
    /// Racing class the car is entered in.
    pub category: String,
    pub active: bool,
    pub registered_on: Date,
}

impl Car {
    /// Creates an active car with no driver assigned.
    #[must_use]
    pub fn new(name: &str, race_number: Option<u16>, registered_on: Date) -> Self {
        Self {
            name: name.to_string(),
            race_number,
            driver: String::new(),
            category: String::new(),
            active: true,
            registered_on,
        }
    }
}
