//! Function-level view of a contract.
//!
//! Detectors that reason per-function (guard checks, body scans) get their
//! function list from here. When a syntax tree is available the list comes
//! from the tree; without one the extraction degrades to a brace-matching
//! text scan rather than failing; an absent tree is a valid input, not an
//! error.

use tree_sitter::{Node, Tree};

use super::SourceText;

/// One function definition, with precomputed lowered views for the
/// case-insensitive matching detectors do.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    /// Full definition text: header, modifiers, and body.
    pub text: String,
    /// Body text between the outermost braces; empty for bodyless
    /// declarations.
    pub body: String,
    /// Byte offset of the definition start in the contract source.
    pub start: usize,
    name_lower: String,
    text_lower: String,
    body_lower: String,
}

impl FunctionDef {
    fn new(name: &str, text: &str, body: &str, start: usize) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            body: body.to_string(),
            start,
            name_lower: name.to_ascii_lowercase(),
            text_lower: text.to_ascii_lowercase(),
            body_lower: body.to_ascii_lowercase(),
        }
    }

    /// Case-insensitive match over the whole definition, modifiers included.
    pub fn text_contains(&self, pattern: &str) -> bool {
        self.text_lower.contains(pattern)
    }

    pub fn text_contains_any(&self, patterns: &[&str]) -> bool {
        patterns.iter().any(|p| self.text_lower.contains(p))
    }

    pub fn body_contains(&self, pattern: &str) -> bool {
        self.body_lower.contains(pattern)
    }

    pub fn body_contains_any(&self, patterns: &[&str]) -> bool {
        patterns.iter().any(|p| self.body_lower.contains(p))
    }

    pub fn name_is(&self, name: &str) -> bool {
        self.name_lower == name
    }

    pub fn name_in(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.name_lower == *n)
    }

    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name_lower.contains(fragment)
    }
}

/// Extract all function (and constructor) definitions from the source,
/// preferring the syntax tree when one is available.
pub fn extract_functions(source: &SourceText, tree: Option<&Tree>) -> Vec<FunctionDef> {
    if let Some(tree) = tree {
        let defs = extract_from_tree(source.as_str(), tree);
        if !defs.is_empty() {
            return defs;
        }
        // A tree from badly mangled source can carry zero function nodes;
        // the text scan still gets a chance.
    }
    extract_from_text(source)
}

fn extract_from_tree(source: &str, tree: &Tree) -> Vec<FunctionDef> {
    let mut defs = Vec::new();
    collect_function_nodes(tree.root_node(), source, &mut defs);
    defs.sort_by_key(|d| d.start);
    defs
}

fn collect_function_nodes(node: Node, source: &str, defs: &mut Vec<FunctionDef>) {
    match node.kind() {
        "function_definition" => {
            let name = node
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                .unwrap_or("");
            push_node_def(node, name, source, defs);
        }
        "constructor_definition" => {
            push_node_def(node, "constructor", source, defs);
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_function_nodes(child, source, defs);
    }
}

fn push_node_def(node: Node, name: &str, source: &str, defs: &mut Vec<FunctionDef>) {
    let text = node.utf8_text(source.as_bytes()).unwrap_or("");
    let body = node
        .child_by_field_name("body")
        .and_then(|b| b.utf8_text(source.as_bytes()).ok())
        .map(|b| b.trim_start_matches('{').trim_end_matches('}'))
        .unwrap_or("");
    defs.push(FunctionDef::new(name, text, body, node.start_byte()));
}

/// Text fallback: locate `function <name>` / `constructor(` headers and
/// brace-match their bodies. Comment-aware only to the extent the brace
/// counter tolerates; good enough for triage.
fn extract_from_text(source: &SourceText) -> Vec<FunctionDef> {
    let raw = source.as_str();
    let lower = source.lower();
    let bytes = lower.as_bytes();
    let mut defs = Vec::new();

    let mut at = 0;
    while let Some(rel) = lower[at..].find("function ") {
        let start = at + rel;
        at = start + "function ".len();
        // Require a keyword boundary on the left.
        if start > 0 && is_ident_byte(bytes[start - 1]) {
            continue;
        }
        let name_start = start + "function ".len();
        let name: String = raw[name_start..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if name.is_empty() {
            continue;
        }
        if let Some((text, body, _)) = delimit_definition(raw, lower, start) {
            defs.push(FunctionDef::new(&name, text, body, start));
        }
    }

    let mut at = 0;
    while let Some(rel) = lower[at..].find("constructor") {
        let start = at + rel;
        at = start + "constructor".len();
        if start > 0 && is_ident_byte(bytes[start - 1]) {
            continue;
        }
        let after = lower[start + "constructor".len()..].trim_start();
        if !after.starts_with('(') {
            continue;
        }
        if let Some((text, body, _)) = delimit_definition(raw, lower, start) {
            defs.push(FunctionDef::new("constructor", text, body, start));
        }
    }

    defs.sort_by_key(|d| d.start);
    defs
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// From a header start offset, find the definition extent. Returns
/// (full text, body text, end offset), or None for bodyless declarations
/// (interface members end at `;` before any `{`).
fn delimit_definition<'a>(
    raw: &'a str,
    lower: &str,
    start: usize,
) -> Option<(&'a str, &'a str, usize)> {
    let rest = &lower[start..];
    let open = rest.find('{');
    let semi = rest.find(';');
    let open = match (open, semi) {
        (Some(o), Some(s)) if s < o => return None,
        (Some(o), _) => o,
        (None, _) => return None,
    };

    let mut depth = 0usize;
    for (i, b) in rest[open..].bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + open + i + 1;
                    let text = &raw[start..end];
                    let body = &raw[start + open + 1..end - 1];
                    return Some((text, body, end));
                }
            }
            _ => {}
        }
    }
    // Unbalanced braces: take everything to EOF rather than dropping the
    // function.
    let text = &raw[start..];
    let body = &raw[start + open + 1..];
    Some((text, body, raw.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn functions(source: &str) -> Vec<FunctionDef> {
        extract_functions(&SourceText::new(source.to_string()), None)
    }

    const TOKEN: &str = r#"
contract Token {
    uint256 public totalSupply;

    constructor(uint256 supply) {
        totalSupply = supply;
    }

    function mint(address to, uint256 amount) public onlyOwner {
        _mint(to, amount);
    }

    function burn(uint256 amount) external {
        if (amount > 0) { _burn(msg.sender, amount); }
    }
}
"#;

    #[test]
    fn test_extracts_named_functions_and_constructor() {
        let defs = functions(TOKEN);
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["constructor", "mint", "burn"]);
    }

    #[test]
    fn test_body_excludes_header_and_matches_nesting() {
        let defs = functions(TOKEN);
        let burn = defs.iter().find(|d| d.name_is("burn")).unwrap();
        assert!(burn.body.contains("_burn(msg.sender, amount);"));
        assert!(burn.body.contains("if (amount > 0)"));
        assert!(!burn.body.contains("external"));
    }

    #[test]
    fn test_modifier_lives_in_text_not_body() {
        let defs = functions(TOKEN);
        let mint = defs.iter().find(|d| d.name_is("mint")).unwrap();
        assert!(mint.text_contains("onlyowner"));
        assert!(!mint.body_contains("onlyowner"));
    }

    #[test]
    fn test_interface_declarations_are_skipped() {
        let defs = functions("interface IERC20 { function transfer(address to, uint256 v) external returns (bool); }");
        assert!(defs.is_empty());
    }

    #[test]
    fn test_tree_backed_extraction_matches_text_fallback() {
        let source = SourceText::new(TOKEN.to_string());
        let tree = crate::source::parser::parse_source(source.as_str());
        let defs = extract_functions(&source, tree.as_ref());
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["constructor", "mint", "burn"]);
    }
}
