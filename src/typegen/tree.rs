//! Declaration trees and their `.d.ts` rendering.

use std::fmt::{self, Write};

/// A single declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsDeclaration {
    /// Emitted verbatim.
    Raw(String),
    /// `const name: ty;`
    Const { name: String, ty: String },
    /// `function name(a: A): R;`
    Function {
        name: String,
        params: Vec<(String, String)>,
        returns: String,
    },
}

impl From<&str> for TsDeclaration {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for TsDeclaration {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl fmt::Display for TsDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(raw) => f.write_str(raw.trim_end()),
            Self::Const { name, ty } => write!(f, "const {name}: {ty};"),
            Self::Function {
                name,
                params,
                returns,
            } => {
                let params: Vec<_> = params.iter().map(|(n, t)| format!("{n}: {t}")).collect();
                write!(f, "function {name}({}): {returns};", params.join(", "))
            }
        }
    }
}

/// Triple-slash reference directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TsReference {
    Types(String),
    Path(String),
}

impl fmt::Display for TsReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Types(value) => write!(f, "/// <reference types=\"{value}\" />"),
            Self::Path(value) => write!(f, "/// <reference path=\"{value}\" />"),
        }
    }
}

/// `declare module "name" { … }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsModule {
    pub name: String,
    pub content: Vec<TsDeclaration>,
    pub globals: Vec<TsDeclaration>,
}

/// Contents of one declaration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsTree {
    pub references: Vec<TsReference>,
    /// Import statements, verbatim
    pub imports: Vec<String>,
    pub globals: Vec<TsDeclaration>,
    pub modules: Vec<TsModule>,
}

impl TsTree {
    /// Add a reference unless already present.
    pub fn reference(&mut self, reference: TsReference) {
        if !self.references.contains(&reference) {
            self.references.push(reference);
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        for reference in &self.references {
            let _ = writeln!(out, "{reference}");
        }
        if !self.references.is_empty() {
            out.push('\n');
        }

        for import in &self.imports {
            let _ = writeln!(out, "{}", import.trim_end());
        }
        if !self.imports.is_empty() {
            out.push('\n');
        }

        if !self.globals.is_empty() {
            write_block(&mut out, "declare global", &self.globals, 0);
            out.push('\n');
        }

        for module in &self.modules {
            let _ = writeln!(out, "declare module \"{}\" {{", module.name);
            for decl in &module.content {
                write_indented(&mut out, &decl.to_string(), 1);
            }
            if !module.globals.is_empty() {
                write_block(&mut out, "global", &module.globals, 1);
            }
            out.push_str("}\n\n");
        }

        // A file with imports or globals has to be a module itself.
        if !self.imports.is_empty() || !self.globals.is_empty() {
            out.push_str("export {};\n");
        }

        out
    }
}

fn write_block(out: &mut String, header: &str, decls: &[TsDeclaration], depth: usize) {
    write_indented(out, &format!("{header} {{"), depth);
    for decl in decls {
        write_indented(out, &decl.to_string(), depth + 1);
    }
    write_indented(out, "}", depth);
}

fn write_indented(out: &mut String, text: &str, depth: usize) {
    for line in text.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "{}{line}", "    ".repeat(depth));
        }
    }
}
