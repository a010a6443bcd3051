// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific connection setup.
//!
//! Only `SQLite` is supported. Everything that cannot be expressed in the
//! Diesel DSL (PRAGMA statements, migration execution) lives here; the
//! `queries` and `mutations` modules stay in the DSL.

pub mod sqlite;
