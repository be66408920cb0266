// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend setup.
//!
//! Only `SQLite` is supported. Everything that needs raw SQL (PRAGMA
//! statements, migrations) lives here; queries and mutations use the
//! Diesel DSL.

pub mod sqlite;
