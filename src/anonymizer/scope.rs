//! Normalization passes, identifier roles, and per-declaration name maps.

use crate::error::Result;
use regex::{Captures, Regex};

/// Node kinds targeted by the class-scope pass.
const CLASS_TARGETS: &[&str] = &["class_declaration"];

/// Node kinds targeted by the function/method-scope pass.
const FUNCTION_TARGETS: &[&str] = &[
    "function_declaration",
    "function_signature",
    "method_definition",
    "method_signature",
];

/// One parse-traverse-splice cycle over a category of declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationPass {
    /// Class names and public field names inside class declarations.
    ClassScope,
    /// Function, method, parameter and local variable names inside
    /// function and method declarations.
    FunctionScope,
}

impl NormalizationPass {
    /// Passes in execution order.
    pub const ALL: [NormalizationPass; 2] =
        [NormalizationPass::ClassScope, NormalizationPass::FunctionScope];

    /// Human-readable pass name.
    pub fn name(&self) -> &'static str {
        match self {
            NormalizationPass::ClassScope => "class scope",
            NormalizationPass::FunctionScope => "function scope",
        }
    }

    /// Node kinds whose subtrees this pass rewrites.
    pub fn target_kinds(&self) -> &'static [&'static str] {
        match self {
            NormalizationPass::ClassScope => CLASS_TARGETS,
            NormalizationPass::FunctionScope => FUNCTION_TARGETS,
        }
    }

    /// Whether a node of `kind` is a declaration this pass rewrites.
    pub fn is_target(&self, kind: &str) -> bool {
        self.target_kinds().contains(&kind)
    }

    /// Role of a node of `kind` sitting in `field` of a parent of
    /// `parent_kind`, if this pass renames it.
    ///
    /// Only the declaring position counts: a `variable_declarator`'s value or
    /// a `for ... of` loop's right-hand side is not a binding.
    pub fn classify(&self, kind: &str, parent_kind: &str, field: Option<&str>) -> Option<Role> {
        match self {
            NormalizationPass::ClassScope => match (kind, parent_kind, field) {
                ("type_identifier", "class_declaration", Some("name")) => Some(Role::Class),
                ("property_identifier", "public_field_definition", Some("name")) => {
                    Some(Role::Property)
                }
                _ => None,
            },
            NormalizationPass::FunctionScope => match (kind, parent_kind, field) {
                ("identifier", "function_declaration" | "function_signature", Some("name")) => {
                    Some(Role::Function)
                }
                ("property_identifier", "method_definition" | "method_signature", Some("name")) => {
                    Some(Role::Method)
                }
                ("identifier", "required_parameter" | "optional_parameter", Some("pattern"))
                | ("identifier", "variable_declarator", Some("name"))
                | ("identifier", "for_in_statement", Some("left")) => Some(Role::Variable),
                _ => None,
            },
        }
    }
}

impl std::fmt::Display for NormalizationPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Role an identifier plays in its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Class,
    Function,
    Method,
    Property,
    Variable,
}

impl Role {
    /// Substitution order: declaration names before members and bindings.
    pub const ORDER: [Role; 5] = [
        Role::Class,
        Role::Function,
        Role::Method,
        Role::Property,
        Role::Variable,
    ];

    /// Placeholder for the `index`-th distinct name of this role.
    ///
    /// Declaration-name roles share one fixed placeholder; member and
    /// binding roles are numbered in discovery order.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Role::Class => "_class_".to_string(),
            Role::Function => "_function_".to_string(),
            Role::Method => "_method_".to_string(),
            Role::Property => format!("_property{}_", index),
            Role::Variable => format!("_variable{}_", index),
        }
    }

    /// Compile one anchored pattern matching any of `names` in this role.
    ///
    /// Group 1 holds the anchor text that must be written back before the
    /// placeholder; group 2 holds the matched name.
    pub fn pattern(&self, names: &[&str]) -> Result<Regex> {
        let mut sorted = names.to_vec();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternatives = sorted
            .iter()
            .map(|name| {
                let head = match self {
                    Role::Property if starts_with_word_char(name) => r"\b",
                    _ => "",
                };
                let tail = if ends_with_word_char(name) { r"\b" } else { "" };
                format!("{}{}{}", head, regex::escape(name), tail)
            })
            .collect::<Vec<_>>()
            .join("|");

        let anchor = match self {
            Role::Class => r"\bclass\s+",
            Role::Function | Role::Method => {
                r"\b(?:function|public|private|protected)\b[\s*]*(?:(?:static|async|abstract|override|readonly|get|set)\s+)*\*?\s*"
            }
            Role::Property => "",
            Role::Variable => r"^|[^\w$.]",
        };

        Ok(Regex::new(&format!("({})({})", anchor, alternatives))?)
    }
}

fn starts_with_word_char(name: &str) -> bool {
    name.chars()
        .next()
        .map(|c| c.is_alphanumeric() || c == '_')
        .unwrap_or(false)
}

fn ends_with_word_char(name: &str) -> bool {
    name.chars()
        .last()
        .map(|c| c.is_alphanumeric() || c == '_')
        .unwrap_or(false)
}

/// Original-name to placeholder mapping for one declaration node.
///
/// Built fresh for every node and dropped once the node's text has been
/// rewritten, so numbering never leaks between declarations.
#[derive(Debug, Clone, Default)]
pub struct RoleNameMap {
    entries: Vec<NameEntry>,
    counters: RoleCounters,
}

#[derive(Debug, Clone)]
struct NameEntry {
    role: Role,
    original: String,
    placeholder: String,
}

#[derive(Debug, Clone, Default)]
struct RoleCounters {
    property: usize,
    variable: usize,
}

impl RoleNameMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `original` in `role`, returning its placeholder.
    ///
    /// A name seen again in the same role keeps its first placeholder.
    pub fn insert(&mut self, role: Role, original: &str) -> Option<String> {
        if original.is_empty() {
            return None;
        }

        if let Some(existing) = self.get(role, original) {
            return Some(existing.to_string());
        }

        let index = match role {
            Role::Property => post_increment(&mut self.counters.property),
            Role::Variable => post_increment(&mut self.counters.variable),
            _ => 0,
        };

        let placeholder = role.placeholder(index);
        self.entries.push(NameEntry {
            role,
            original: original.to_string(),
            placeholder: placeholder.clone(),
        });
        Some(placeholder)
    }

    /// Look up the placeholder assigned to `original` in `role`.
    pub fn get(&self, role: Role, original: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.role == role && e.original == original)
            .map(|e| e.placeholder.as_str())
    }

    /// Number of recorded names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no names were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All mappings as `(role, original, placeholder)` in discovery order.
    pub fn mappings(&self) -> impl Iterator<Item = (Role, &str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.role, e.original.as_str(), e.placeholder.as_str()))
    }

    /// Rewrite `text` with every recorded mapping.
    ///
    /// Each role is substituted in a single sweep, declaration names first,
    /// so a binding sharing a declaration's name cannot consume the
    /// declaration's anchor.
    pub fn rewrite(&self, text: &str) -> Result<String> {
        let mut result = text.to_string();

        for role in Role::ORDER {
            let entries: Vec<&NameEntry> = self.entries.iter().filter(|e| e.role == role).collect();
            if entries.is_empty() {
                continue;
            }

            let names: Vec<&str> = entries.iter().map(|e| e.original.as_str()).collect();
            let re = role.pattern(&names)?;
            result = re
                .replace_all(&result, |caps: &Captures| {
                    let placeholder = entries
                        .iter()
                        .find(|e| e.original == caps[2])
                        .map_or(&caps[2], |e| e.placeholder.as_str());
                    format!("{}{}", &caps[1], placeholder)
                })
                .into_owned();
        }

        Ok(result)
    }
}

fn post_increment(counter: &mut usize) -> usize {
    let value = *counter;
    *counter += 1;
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        assert!(NormalizationPass::ClassScope.is_target("class_declaration"));
        assert!(!NormalizationPass::ClassScope.is_target("method_definition"));
        assert!(NormalizationPass::FunctionScope.is_target("method_signature"));
        assert!(NormalizationPass::FunctionScope.is_target("function_signature"));
        assert!(!NormalizationPass::FunctionScope.is_target("arrow_function"));
    }

    #[test]
    fn test_classify_by_parent_and_field() {
        let class = NormalizationPass::ClassScope;
        assert_eq!(
            class.classify("type_identifier", "class_declaration", Some("name")),
            Some(Role::Class)
        );
        assert_eq!(class.classify("type_identifier", "type_annotation", None), None);
        assert_eq!(
            class.classify("property_identifier", "public_field_definition", Some("name")),
            Some(Role::Property)
        );

        let func = NormalizationPass::FunctionScope;
        assert_eq!(
            func.classify("identifier", "function_declaration", Some("name")),
            Some(Role::Function)
        );
        assert_eq!(
            func.classify("property_identifier", "method_definition", Some("name")),
            Some(Role::Method)
        );
        assert_eq!(
            func.classify("identifier", "optional_parameter", Some("pattern")),
            Some(Role::Variable)
        );
        assert_eq!(
            func.classify("identifier", "for_in_statement", Some("left")),
            Some(Role::Variable)
        );
        assert_eq!(func.classify("identifier", "for_in_statement", Some("right")), None);
        assert_eq!(func.classify("identifier", "variable_declarator", Some("value")), None);
        assert_eq!(func.classify("identifier", "call_expression", Some("function")), None);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(Role::Class.placeholder(7), "_class_");
        assert_eq!(Role::Method.placeholder(3), "_method_");
        assert_eq!(Role::Property.placeholder(2), "_property2_");
        assert_eq!(Role::Variable.placeholder(0), "_variable0_");
    }

    #[test]
    fn test_indices_follow_discovery_order() {
        let mut map = RoleNameMap::new();
        assert_eq!(map.insert(Role::Variable, "b").as_deref(), Some("_variable0_"));
        assert_eq!(map.insert(Role::Variable, "a").as_deref(), Some("_variable1_"));
        assert_eq!(map.insert(Role::Variable, "b").as_deref(), Some("_variable0_"));
        assert_eq!(map.insert(Role::Property, "p").as_deref(), Some("_property0_"));
        assert_eq!(map.len(), 3);

        let mappings: Vec<_> = map.mappings().collect();
        assert_eq!(
            mappings,
            vec![
                (Role::Variable, "b", "_variable0_"),
                (Role::Variable, "a", "_variable1_"),
                (Role::Property, "p", "_property0_"),
            ]
        );
    }

    #[test]
    fn test_constructor_is_an_ordinary_method_name() {
        let mut map = RoleNameMap::new();
        assert_eq!(map.insert(Role::Method, "constructor").as_deref(), Some("_method_"));
        assert_eq!(
            map.rewrite("public constructor(x: number) {}").unwrap(),
            "public _method_(x: number) {}"
        );
    }

    #[test]
    fn test_class_pattern_needs_keyword() {
        let mut map = RoleNameMap::new();
        map.insert(Role::Class, "Point");

        let result = map.rewrite("class Point { clone() { return new Point(); } }").unwrap();
        assert_eq!(result, "class _class_ { clone() { return new Point(); } }");
    }

    #[test]
    fn test_property_pattern_uses_word_boundaries() {
        let mut map = RoleNameMap::new();
        map.insert(Role::Property, "count");

        let result = map.rewrite("count = 0; inc() { this.count += this.counter; }").unwrap();
        assert_eq!(result, "_property0_ = 0; inc() { this._property0_ += this.counter; }");
    }

    #[test]
    fn test_variable_pattern_skips_member_access() {
        let mut map = RoleNameMap::new();
        map.insert(Role::Variable, "name");

        let result = map
            .rewrite("function f(name: string) { return user.name + name + rename; }")
            .unwrap();
        assert_eq!(
            result,
            "function f(_variable0_: string) { return user.name + _variable0_ + rename; }"
        );
    }

    #[test]
    fn test_variable_pattern_handles_adjacent_uses() {
        let mut map = RoleNameMap::new();
        map.insert(Role::Variable, "a");

        assert_eq!(map.rewrite("a+a*a").unwrap(), "_variable0_+_variable0_*_variable0_");
    }

    #[test]
    fn test_function_pattern_needs_keyword() {
        let mut map = RoleNameMap::new();
        map.insert(Role::Function, "run");

        let result = map.rewrite("function run() { run(); }").unwrap();
        assert_eq!(result, "function _function_() { run(); }");
    }

    #[test]
    fn test_method_pattern_needs_visibility_keyword() {
        let mut map = RoleNameMap::new();
        map.insert(Role::Method, "load");

        assert_eq!(
            map.rewrite("public async load() { this.load(); }").unwrap(),
            "public async _method_() { this.load(); }"
        );
        assert_eq!(
            map.rewrite("private static load() {}").unwrap(),
            "private static _method_() {}"
        );
        assert_eq!(map.rewrite("load(): void;").unwrap(), "load(): void;");
        assert_eq!(map.rewrite("static load() {}").unwrap(), "static load() {}");
    }

    #[test]
    fn test_prefix_names_share_one_sweep() {
        let mut map = RoleNameMap::new();
        map.insert(Role::Variable, "items");
        map.insert(Role::Variable, "item");

        let result = map
            .rewrite("(items) { for (const item of items) use(item); }")
            .unwrap();
        assert_eq!(
            result,
            "(_variable0_) { for (const _variable1_ of _variable0_) use(_variable1_); }"
        );
    }

    #[test]
    fn test_pattern_captures_anchor_and_name() {
        let re = Role::Class.pattern(&["A", "Point"]).unwrap();
        let caps = re.captures("export class Point {}").unwrap();
        assert_eq!(&caps[1], "class ");
        assert_eq!(&caps[2], "Point");
    }

    #[test]
    fn test_declaration_names_rewritten_before_bindings() {
        let mut map = RoleNameMap::new();
        map.insert(Role::Function, "f");
        map.insert(Role::Variable, "f");

        let result = map.rewrite("function f(f) { return f; }").unwrap();
        assert_eq!(result, "function _function_(_variable0_) { return _variable0_; }");
    }

    #[test]
    fn test_names_with_regex_metacharacters() {
        let mut map = RoleNameMap::new();
        map.insert(Role::Variable, "$el");

        assert_eq!(map.rewrite("let $el = 1; f($el);").unwrap(), "let _variable0_ = 1; f(_variable0_);");
    }
}
