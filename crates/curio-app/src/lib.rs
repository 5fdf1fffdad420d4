// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod filter;
pub mod model;
pub mod pager;
pub mod row;
pub mod sort;
pub mod state;

pub use controller::*;
pub use filter::*;
pub use model::*;
pub use pager::*;
pub use row::*;
pub use sort::*;
pub use state::*;
