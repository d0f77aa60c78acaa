//! Syntax nodes stored in the source arena.

use super::token::SourceLocation;
use std::ops::Range;

/// Index of a node in [`SourceCode`](super::SourceCode)'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

macro_rules! node_kinds {
    ($($variant:ident => $($grammar:literal)|+),* $(,)?) => {
        /// Syntax node categories inspected by the rules.
        ///
        /// Grammar names without a dedicated variant map to [`NodeKind::Other`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $(
                #[doc = stringify!($($grammar)|+)]
                $variant,
            )*
            /// Any other grammar node.
            Other(&'static str),
        }

        impl NodeKind {
            /// Maps a tree-sitter grammar name to a node kind.
            #[must_use]
            pub fn from_grammar_name(name: &'static str) -> Self {
                match name {
                    $($($grammar)|+ => Self::$variant,)*
                    other => Self::Other(other),
                }
            }

            /// Returns the canonical grammar name.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => node_kinds!(@first $($grammar)|+),)*
                    Self::Other(name) => name,
                }
            }
        }
    };
    (@first $first:literal $(| $rest:literal)*) => { $first };
}

node_kinds! {
    Program => "program",
    StatementBlock => "statement_block",
    ExpressionStatement => "expression_statement",
    IfStatement => "if_statement",
    ElseClause => "else_clause",
    WhileStatement => "while_statement",
    DoStatement => "do_statement",
    ForStatement => "for_statement",
    ForInStatement => "for_in_statement",
    WithStatement => "with_statement",
    SwitchStatement => "switch_statement",
    SwitchBody => "switch_body",
    SwitchCase => "switch_case",
    SwitchDefault => "switch_default",
    ReturnStatement => "return_statement",
    ThrowStatement => "throw_statement",
    YieldExpression => "yield_expression",
    CallExpression => "call_expression",
    NewExpression => "new_expression",
    Arguments => "arguments",
    ParenthesizedExpression => "parenthesized_expression",
    ArrowFunction => "arrow_function",
    FunctionExpression => "function_expression" | "function",
    FunctionDeclaration => "function_declaration",
    GeneratorFunction => "generator_function",
    GeneratorFunctionDeclaration => "generator_function_declaration",
    MethodDefinition => "method_definition",
    FormalParameters => "formal_parameters",
    TemplateString => "template_string",
    TemplateSubstitution => "template_substitution",
    Object => "object",
    Pair => "pair",
    ComputedPropertyName => "computed_property_name",
    TypeParameters => "type_parameters",
    TypeArguments => "type_arguments",
    AsExpression => "as_expression",
    SatisfiesExpression => "satisfies_expression",
    ArrayType => "array_type",
    LookupType => "lookup_type",
    Identifier => "identifier",
    PropertyIdentifier => "property_identifier",
    ShorthandPropertyIdentifierPattern => "shorthand_property_identifier_pattern",
    BinaryExpression => "binary_expression",
    AssignmentExpression => "assignment_expression",
    AugmentedAssignmentExpression => "augmented_assignment_expression",
    TernaryExpression => "ternary_expression",
    ConditionalType => "conditional_type",
    VariableDeclarator => "variable_declarator",
    AssignmentPattern => "assignment_pattern",
    ObjectAssignmentPattern => "object_assignment_pattern",
    PublicFieldDefinition => "public_field_definition",
    EnumAssignment => "enum_assignment",
    TypeAliasDeclaration => "type_alias_declaration",
    DefaultType => "default_type",
    ImportAlias => "import_alias",
    ExportStatement => "export_statement",
    ClassDeclaration => "class_declaration" | "abstract_class_declaration",
    Class => "class",
    ImportClause => "import_clause",
    CatchClause => "catch_clause",
}

/// A named syntax node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Arena index of this node.
    pub id: NodeId,
    /// Node category.
    pub kind: NodeKind,
    /// Byte range in the source text.
    pub range: Range<usize>,
    /// Line/column span.
    pub loc: SourceLocation,
    /// Field name under the parent (`"body"`, `"arguments"`, ...).
    pub field: Option<&'static str>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// Returns the parent node id, if any.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the ids of the named children in source order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns true if the node is one of the function-like kinds.
    #[must_use]
    pub fn is_function(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::ArrowFunction
                | NodeKind::FunctionExpression
                | NodeKind::FunctionDeclaration
                | NodeKind::GeneratorFunction
                | NodeKind::GeneratorFunctionDeclaration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_names_round_trip() {
        assert_eq!(
            NodeKind::from_grammar_name("function"),
            NodeKind::FunctionExpression
        );
        assert_eq!(
            NodeKind::from_grammar_name("function_expression").as_str(),
            "function_expression"
        );
        assert_eq!(
            NodeKind::from_grammar_name("jsx_element"),
            NodeKind::Other("jsx_element")
        );
    }
}
