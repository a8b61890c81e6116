//! Tree-sitter parsing for the anonymizer passes.

use crate::error::{PrepError, Result};
use crate::models::Dialect;
use std::cell::RefCell;
use std::collections::HashMap;
use tree_sitter::{Node, Parser, Tree};

// Thread-local parser cache so parallel workers each reuse their own parser.
thread_local! {
    static PARSER_CACHE: RefCell<HashMap<Dialect, Parser>> = RefCell::new(HashMap::new());
}

/// Tree-sitter grammar for a dialect.
pub fn grammar(dialect: Dialect) -> tree_sitter::Language {
    match dialect {
        Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

/// Create a parser for a specific dialect.
fn create_parser(dialect: Dialect) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar(dialect))
        .map_err(|e| PrepError::Parse(format!("Failed to set language: {}", e)))?;
    Ok(parser)
}

/// Parse `text` with the thread's cached parser for `dialect`.
///
/// With `reject_syntax_errors`, a tree containing error or missing nodes is
/// reported as a parse failure at the first such node.
pub fn parse(dialect: Dialect, text: &str, reject_syntax_errors: bool) -> Result<Tree> {
    let tree = PARSER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if !cache.contains_key(&dialect) {
            cache.insert(dialect, create_parser(dialect)?);
        }

        let parser = cache.get_mut(&dialect).ok_or_else(|| {
            PrepError::Parse(format!("Parser not in cache for {}", dialect))
        })?;

        parser
            .parse(text, None)
            .ok_or_else(|| PrepError::Parse(format!("Failed to parse {} source", dialect)))
    })?;

    if reject_syntax_errors && tree.root_node().has_error() {
        let (row, column) = first_error(tree.root_node())
            .map(|n| {
                let pos = n.start_position();
                (pos.row + 1, pos.column + 1)
            })
            .unwrap_or((1, 1));

        return Err(PrepError::Parse(format!(
            "Syntax error in {} source at line {}, column {}",
            dialect, row, column
        )));
    }

    Ok(tree)
}

/// First error or missing node in document order.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }

        if !node.has_error() {
            continue;
        }

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    None
}
