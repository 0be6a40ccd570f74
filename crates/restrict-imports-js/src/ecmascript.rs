//! JavaScript and TypeScript import extraction using Tree-sitter.
//!
//! Only `import` declarations are extracted, including side-effect imports
//! (`import "./polyfill"`), `import type` and TypeScript's
//! `import x = require("y")`. Re-exports (`export … from`), `require()`
//! calls and dynamic `import()` are not import declarations and are ignored.
//!
//! Specifiers are the decoded string values, so `"lod\u0061sh"` is
//! matched as `lodash`.

use std::path::Path;
use tree_sitter::{Language, Node, Parser};

use restrict_imports_core::ImportSite;

use crate::extractor::{ExtractError, FileAnalysis, LanguageExtractor};

/// Which grammar an [`EcmaScriptExtractor`] parses with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// JavaScript, including JSX.
    JavaScript,
    /// TypeScript without JSX.
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
}

impl Dialect {
    fn id(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::JavaScript => &[".js", ".jsx", ".mjs", ".cjs"],
            Self::TypeScript => &[".ts", ".mts", ".cts"],
            Self::Tsx => &[".tsx"],
        }
    }

    fn language(self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Extracts import declarations from JavaScript-family source.
pub struct EcmaScriptExtractor {
    dialect: Dialect,
    language: Language,
}

impl EcmaScriptExtractor {
    /// Creates an extractor for the given dialect.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            language: dialect.language(),
        }
    }

    /// JavaScript / JSX extractor.
    #[must_use]
    pub fn javascript() -> Self {
        Self::new(Dialect::JavaScript)
    }

    /// TypeScript extractor.
    #[must_use]
    pub fn typescript() -> Self {
        Self::new(Dialect::TypeScript)
    }

    /// TSX extractor.
    #[must_use]
    pub fn tsx() -> Self {
        Self::new(Dialect::Tsx)
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
    }

    /// Contents of a string literal node without its quotes, escapes decoded.
    fn string_value(node: &Node<'_>, src: &[u8]) -> String {
        // Escapes are buffered as UTF-16 so `\uD83D\uDE00` pairs combine.
        let mut value = String::new();
        let mut units: Vec<u16> = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "string_fragment" => {
                    value.push_str(&String::from_utf16_lossy(&units));
                    units.clear();
                    value.push_str(Self::text(&child, src));
                }
                "escape_sequence" => decode_escape(Self::text(&child, src), &mut units),
                _ => {}
            }
        }
        value.push_str(&String::from_utf16_lossy(&units));
        value
    }

    /// The `source` string of an import statement, if it has one.
    fn import_source<'t>(node: &Node<'t>) -> Option<Node<'t>> {
        if let Some(source) = node.child_by_field_name("source") {
            return Some(source);
        }
        // TypeScript: `import x = require("y")`
        let mut cursor = node.walk();
        let clause = node
            .children(&mut cursor)
            .find(|c| c.kind() == "import_require_clause")?;
        clause.child_by_field_name("source")
    }

    fn extract_import(node: &Node<'_>, src: &[u8]) -> Option<ImportSite> {
        let source = Self::import_source(node)?;
        let start = node.start_position();
        Some(ImportSite {
            specifier: Self::string_value(&source, src),
            line: start.row + 1,
            column: start.column,
            length: node.end_byte() - node.start_byte(),
        })
    }
}

impl LanguageExtractor for EcmaScriptExtractor {
    fn language_id(&self) -> &'static str {
        self.dialect.id()
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.dialect.extensions()
    }

    fn analyze(&self, path: &Path, source: &str) -> Result<FileAnalysis, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Language {
                language: self.language_id(),
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or_else(|| ExtractError::Parse {
            path: path.to_path_buf(),
            language: self.language_id(),
        })?;
        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!(file = %path.display(), "source has syntax errors; extracting what parsed");
        }

        let mut result = FileAnalysis {
            file_path: path.to_path_buf(),
            imports: Vec::new(),
        };

        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            if node.kind() == "import_statement" {
                if let Some(site) = Self::extract_import(&node, src) {
                    result.imports.push(site);
                }
            }
        }

        Ok(result)
    }
}

/// Appends the UTF-16 units of one escape sequence (backslash included).
fn decode_escape(escape: &str, units: &mut Vec<u16>) {
    let body = escape.strip_prefix('\\').unwrap_or(escape);
    let hex = |digits: &str| u32::from_str_radix(digits, 16).ok();
    let code = match body.chars().next() {
        Some('n') => Some(u32::from('\n')),
        Some('t') => Some(u32::from('\t')),
        Some('r') => Some(u32::from('\r')),
        Some('b') => Some(0x08),
        Some('f') => Some(0x0c),
        Some('v') => Some(0x0b),
        Some('x') => hex(&body[1..]),
        Some('u') => hex(body[1..].trim_start_matches('{').trim_end_matches('}')),
        Some('0'..='7') => u32::from_str_radix(body, 8).ok(),
        // Line continuation
        Some('\r' | '\n' | '\u{2028}' | '\u{2029}') => return,
        Some(c) => Some(u32::from(c)),
        None => None,
    };

    match code {
        // Lone surrogate halves; a following escape may complete the pair.
        Some(unit @ 0xD800..=0xDFFF) => units.push(u16::try_from(unit).unwrap_or(0xFFFD)),
        Some(code) => {
            let c = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
            let mut buf = [0u16; 2];
            units.extend_from_slice(c.encode_utf16(&mut buf));
        }
        None => units.extend(escape.encode_utf16()),
    }
}

/// All built-in extractors: JavaScript, TypeScript, and TSX.
#[must_use]
pub fn default_extractors() -> Vec<Box<dyn LanguageExtractor>> {
    vec![
        Box::new(EcmaScriptExtractor::javascript()),
        Box::new(EcmaScriptExtractor::typescript()),
        Box::new(EcmaScriptExtractor::tsx()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::find_extractor;

    fn specifiers(extractor: &EcmaScriptExtractor, src: &str) -> Vec<String> {
        extractor
            .analyze(Path::new("test"), src)
            .unwrap()
            .imports
            .into_iter()
            .map(|i| i.specifier)
            .collect()
    }

    #[test]
    fn extracts_es_module_imports() {
        let src = r#"
import _ from "lodash";
import { a, b } from './a.js';
import * as ns from "src/core/ns.js";
import "./side-effect.css";
"#;
        assert_eq!(
            specifiers(&EcmaScriptExtractor::javascript(), src),
            vec!["lodash", "./a.js", "src/core/ns.js", "./side-effect.css"]
        );
    }

    #[test]
    fn reports_position_of_statement() {
        let src = "const x = 1;\n  import y from \"y\";\n";
        let a = EcmaScriptExtractor::javascript()
            .analyze(Path::new("a.js"), src)
            .unwrap();
        assert_eq!(a.imports.len(), 1);
        let site = &a.imports[0];
        assert_eq!((site.line, site.column), (2, 2));
        assert_eq!(site.length, "import y from \"y\";".len());
    }

    #[test]
    fn ignores_require_reexport_and_dynamic_import() {
        let src = r#"
const fs = require("fs");
export { x } from "./x.js";
export * from "./all.js";
const lazy = import("./lazy.js");
"#;
        assert!(specifiers(&EcmaScriptExtractor::javascript(), src).is_empty());
    }

    #[test]
    fn extracts_jsx_file_imports() {
        let src = "import React from \"react\";\nexport const A = () => <div />;\n";
        assert_eq!(
            specifiers(&EcmaScriptExtractor::javascript(), src),
            vec!["react"]
        );
    }

    #[test]
    fn extracts_typescript_imports() {
        let src = r#"
import type { User } from "src/core/user";
import fs = require("fs");
import { h } from "./h";
"#;
        assert_eq!(
            specifiers(&EcmaScriptExtractor::typescript(), src),
            vec!["src/core/user", "fs", "./h"]
        );
    }

    #[test]
    fn extracts_tsx_imports() {
        let src = "import { Button } from \"src/ui/button\";\nconst x = <Button />;\n";
        assert_eq!(
            specifiers(&EcmaScriptExtractor::tsx(), src),
            vec!["src/ui/button"]
        );
    }

    #[test]
    fn decodes_escapes_in_specifiers() {
        let src = r#"
import a from "lod\u0061sh";
import b from '\x2e/b.js';
import c from "src/\u{63}ore/c";
import d from "emoji-\uD83D\uDE00";
import e from "it\'s";
"#;
        assert_eq!(
            specifiers(&EcmaScriptExtractor::javascript(), src),
            vec!["lodash", "./b.js", "src/core/c", "emoji-\u{1F600}", "it's"]
        );
    }

    #[test]
    fn decode_escape_handles_each_form() {
        let decode = |e: &str| {
            let mut units = Vec::new();
            decode_escape(e, &mut units);
            String::from_utf16_lossy(&units)
        };
        assert_eq!(decode("\\n"), "\n");
        assert_eq!(decode("\\0"), "\0");
        assert_eq!(decode("\\101"), "A");
        assert_eq!(decode("\\/"), "/");
        assert_eq!(decode("\\\n"), "");
        assert_eq!(decode("\\xZZ"), "\\xZZ");
    }

    #[test]
    fn empty_source() {
        assert!(specifiers(&EcmaScriptExtractor::javascript(), "").is_empty());
    }

    #[test]
    fn picks_extractor_by_extension() {
        let extractors = default_extractors();
        let pick = |p: &str| find_extractor(&extractors, Path::new(p)).map(|e| e.language_id());
        assert_eq!(pick("src/a.mjs"), Some("javascript"));
        assert_eq!(pick("src/a.cts"), Some("typescript"));
        assert_eq!(pick("src/a.tsx"), Some("tsx"));
        assert_eq!(pick("src/a.rs"), None);
        assert_eq!(pick("Makefile"), None);
    }
}
