//! # restrict-imports-js
//!
//! Tree-sitter powered import extraction for JavaScript and TypeScript.
//!
//! This crate feeds `restrict-imports-core` with the import sites of each
//! source file. It provides:
//!
//! - [`LanguageExtractor`] trait for pluggable language support
//! - [`EcmaScriptExtractor`] for `.js`/`.jsx`/`.mjs`/`.cjs`, `.ts`/`.mts`/`.cts`
//!   and `.tsx` files
//! - [`default_extractors`] to get all of them at once

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ecmascript;
pub mod extractor;

pub use ecmascript::{default_extractors, Dialect, EcmaScriptExtractor};
pub use extractor::{dotted_extension, find_extractor, ExtractError, FileAnalysis, LanguageExtractor};
