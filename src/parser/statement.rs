use super::expression::Expression;
use crate::lexer::Span;
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Function(function) => Some(function),
            Declaration::Entry(_) => None,
        })
    }

    pub fn entry_points(&self) -> impl Iterator<Item = &EntryPoint> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Entry(entry) => Some(entry),
            Declaration::Function(_) => None,
        })
    }

    pub fn node_type(&self) -> &'static str {
        "Program"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Function(FunctionDecl),
    Entry(EntryPoint),
}

impl Declaration {
    pub fn node_type(&self) -> &'static str {
        match self {
            Declaration::Function(_) => "FunctionDeclaration",
            Declaration::Entry(_) => "EntryPoint",
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Declaration::Function(decl) => decl.line,
            Declaration::Entry(entry) => entry.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: CompactString,
    pub parameters: Vec<CompactString>,
    pub body: Vec<Statement>,
    pub span: Span,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryPoint {
    pub body: Vec<Statement>,
    pub span: Span,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Print(PrintStatement),
    Call(CallStatement),
    Assignment(AssignmentStatement),
}

impl Statement {
    pub fn node_type(&self) -> &'static str {
        match self {
            Statement::Print(_) => "PrintStatement",
            Statement::Call(_) => "CallStatement",
            Statement::Assignment(_) => "AssignmentStatement",
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Statement::Print(stmt) => stmt.line,
            Statement::Call(stmt) => stmt.line,
            Statement::Assignment(stmt) => stmt.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStatement {
    pub expr: Expression,
    pub newline: bool,
    pub span: Span,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallStatement {
    pub name: CompactString,
    pub arguments: Vec<Expression>,
    pub span: Span,
    pub line: u32,
}

/// Both `assign x = e;` and the bare `x = e;` form.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStatement {
    pub name: CompactString,
    pub value: Expression,
    pub span: Span,
    pub line: u32,
}
