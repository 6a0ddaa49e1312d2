//! Cross-cutting helpers for the HTTP surface

pub mod logging;
