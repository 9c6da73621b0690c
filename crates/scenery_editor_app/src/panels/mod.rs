// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor panel implementations.

pub mod console;
mod properties;

pub use console::ConsolePanel;
pub use properties::PropertiesPanel;
