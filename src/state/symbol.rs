/// Symbol definitions for the search index
///
/// Kinds use the vocabulary Dash expects in the `type` column.
use std::fmt;

/// The kind of a documented construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Package,
    Function,
    Type,
    Method,
    Variable,
    Constant,
}

impl SymbolKind {
    /// Converts the kind to the string stored in the index
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Package => "Package",
            Self::Function => "Function",
            Self::Type => "Type",
            Self::Method => "Method",
            Self::Variable => "Variable",
            Self::Constant => "Constant",
        }
    }

    /// Parses a kind from its index representation
    ///
    /// Returns None if the string doesn't match any known kind.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "Package" => Some(Self::Package),
            "Function" => Some(Self::Function),
            "Type" => Some(Self::Type),
            "Method" => Some(Self::Method),
            "Variable" => Some(Self::Variable),
            "Constant" => Some(Self::Constant),
            _ => None,
        }
    }

    /// Returns all kinds
    pub fn all_kinds() -> Vec<Self> {
        vec![
            Self::Package,
            Self::Function,
            Self::Type,
            Self::Method,
            Self::Variable,
            Self::Constant,
        ]
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// One row of the search index
///
/// The triple (name, kind, path) identifies the entry; inserting it twice is
/// a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    /// Document path, optionally followed by `#anchor`
    pub path: String,
}

impl SymbolEntry {
    pub fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        document_path: &str,
        anchor: Option<&str>,
    ) -> Self {
        let path = match anchor {
            Some(anchor) if !anchor.is_empty() => format!("{}#{}", document_path, anchor),
            _ => document_path.to_string(),
        };
        Self {
            name: name.into(),
            kind,
            path,
        }
    }
}
