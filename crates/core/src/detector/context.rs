use tree_sitter::Tree;

use crate::source::{extract_functions, FunctionDef, SourceText};

/// Read-only bundle passed to every detector.
///
/// Built once per audit invocation; nothing in it is shared across calls, so
/// concurrent audits never contend. Bytecode semantics: `None` means the
/// bytecode was never fetched (the bytecode family stays silent), while
/// `Some("")` / `Some("0x")` means it was fetched and came back empty.
pub struct AuditContext<'a> {
    source: &'a SourceText,
    syntax_tree: Option<&'a Tree>,
    bytecode: Option<&'a str>,
    contract_address: Option<&'a str>,
    functions: Vec<FunctionDef>,
}

impl<'a> AuditContext<'a> {
    pub fn new(
        source: &'a SourceText,
        syntax_tree: Option<&'a Tree>,
        bytecode: Option<&'a str>,
        contract_address: Option<&'a str>,
    ) -> Self {
        let functions = extract_functions(source, syntax_tree);
        Self {
            source,
            syntax_tree,
            bytecode,
            contract_address,
            functions,
        }
    }

    pub fn source(&self) -> &SourceText {
        self.source
    }

    pub fn syntax_tree(&self) -> Option<&Tree> {
        self.syntax_tree
    }

    pub fn bytecode(&self) -> Option<&str> {
        self.bytecode
    }

    /// The audited contract's own address, used only to exclude
    /// self-references when scanning for hardcoded addresses.
    pub fn contract_address(&self) -> Option<&str> {
        self.contract_address
    }

    /// Function definitions, tree-backed when a tree was supplied and
    /// text-extracted otherwise.
    pub fn functions(&self) -> &[FunctionDef] {
        &self.functions
    }
}
