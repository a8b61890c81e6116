//! Two-pass declaration rewriter.

use super::parser;
use super::scope::{NormalizationPass, RoleNameMap};
use crate::config::AnonymizerConfig;
use crate::error::{PrepError, Result};
use crate::models::{apply_replacements, Dialect, Replacement};
use tracing::{debug, trace};
use tree_sitter::{Node, Tree};

/// Declaration anonymizer over tree-sitter TypeScript trees.
#[derive(Debug, Clone)]
pub struct Anonymizer {
    /// Configuration.
    config: AnonymizerConfig,
}

impl Anonymizer {
    /// Create an anonymizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(AnonymizerConfig::default())
    }

    /// Create an anonymizer with custom configuration.
    pub fn with_config(config: AnonymizerConfig) -> Self {
        Self { config }
    }

    /// Configured default dialect.
    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// Passes enabled by the configuration, in execution order.
    pub fn passes(&self) -> Vec<NormalizationPass> {
        NormalizationPass::ALL
            .into_iter()
            .filter(|pass| match pass {
                NormalizationPass::ClassScope => self.config.class_scope,
                NormalizationPass::FunctionScope => self.config.function_scope,
            })
            .collect()
    }

    /// Anonymize `text` in the configured dialect.
    pub fn anonymize(&self, text: &str) -> Result<String> {
        self.anonymize_as(text, self.config.dialect)
    }

    /// Anonymize `text` parsed as `dialect`.
    ///
    /// Every pass re-parses the output of the pass before it.
    pub fn anonymize_as(&self, text: &str, dialect: Dialect) -> Result<String> {
        let mut current = text.to_string();

        for pass in self.passes() {
            current = self.run_pass(pass, &current, dialect)?;
        }

        Ok(current)
    }

    /// Run a single pass: parse, plan replacements, splice.
    pub fn run_pass(&self, pass: NormalizationPass, text: &str, dialect: Dialect) -> Result<String> {
        let tree = parser::parse(dialect, text, self.config.reject_syntax_errors)
            .map_err(|e| match e {
                PrepError::Parse(msg) => PrepError::Parse(format!("{} pass: {}", pass, msg)),
                other => other,
            })?;

        let replacements = plan_pass(pass, &tree, text)?;

        debug!(
            "{} pass: {} declarations rewritten",
            pass,
            replacements.len()
        );

        apply_replacements(text, replacements)
    }
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Anonymize TypeScript `text` with default configuration.
pub fn anonymize(text: &str) -> Result<String> {
    Anonymizer::new().anonymize(text)
}

/// Compute one replacement per outermost target declaration.
///
/// Offsets refer to `source`, the text `tree` was parsed from.
pub fn plan_pass(pass: NormalizationPass, tree: &Tree, source: &str) -> Result<Vec<Replacement>> {
    let mut replacements = Vec::new();

    for node in collect_targets(pass, tree.root_node()) {
        let names = collect_names(pass, node, source)?;
        if names.is_empty() {
            continue;
        }

        for (role, name, placeholder) in names.mappings() {
            trace!(
                "{} at byte {}: {:?} {} -> {}",
                node.kind(),
                node.start_byte(),
                role,
                name,
                placeholder
            );
        }

        let original = node_text(node, source)?;
        let rewritten = names.rewrite(original)?;
        if rewritten != original {
            replacements.push(Replacement::new(rewritten, node.start_byte(), node.end_byte()));
        }
    }

    Ok(replacements)
}

/// Outermost nodes of the pass's target kinds, in document order.
///
/// The walk does not descend into a collected node, so the returned ranges
/// never nest or overlap.
pub fn collect_targets<'tree>(pass: NormalizationPass, root: Node<'tree>) -> Vec<Node<'tree>> {
    let mut targets = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if pass.is_target(node.kind()) {
            targets.push(node);
            continue;
        }

        let mut cursor = node.walk();
        let children: Vec<Node<'tree>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    targets
}

/// Walk `node`'s subtree once, recording every renamed identifier in
/// discovery order.
pub fn collect_names(pass: NormalizationPass, node: Node<'_>, source: &str) -> Result<RoleNameMap> {
    let mut names = RoleNameMap::new();
    let mut stack = vec![node];

    while let Some(parent) = stack.pop() {
        let mut cursor = parent.walk();
        let mut children = Vec::new();

        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if let Some(role) = pass.classify(child.kind(), parent.kind(), cursor.field_name()) {
                    names.insert(role, node_text(child, source)?);
                }
                children.push(child);

                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        stack.extend(children.into_iter().rev());
    }

    Ok(names)
}

fn node_text<'s>(node: Node<'_>, source: &'s str) -> Result<&'s str> {
    source
        .get(node.start_byte()..node.end_byte())
        .ok_or(PrepError::InvalidReplacement {
            start: node.start_byte(),
            end: node.end_byte(),
            len: source.len(),
        })
}
