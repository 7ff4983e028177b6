//! Scope-aware variable renaming.
//!
//! After the pass every variable's display name differs from the names of all variables visible
//! in the same scope chain. A name `x` colliding with a visible `x` becomes `x1`, `x2`, ...
//! skipping suffixed names already taken in any visible scope.

use std::collections::{HashMap, HashSet};

use snafu::{OptionExt, ensure};
use tracing::trace;

use crate::error::{MissingScopeSnafu, Result, VariableRedeclaredSnafu};
use crate::expr::Var;
use crate::func::{Declaration, Program, Prototype};
use crate::stmt::{Block, Stmt};

const DEFAULT_NAME: &str = "x";

#[derive(Debug, Default)]
struct Scope {
    declared: HashSet<u64>,
    counters: HashMap<String, u64>,
}

#[derive(Debug, Default)]
struct UniqueNames {
    scopes: Vec<Scope>,
}

impl UniqueNames {
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.scopes.push(Scope::default());
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn declare(&mut self, var: &Var) -> Result<()> {
        let mut name = var.name();
        ensure!(!self.scopes.is_empty(), MissingScopeSnafu { name: name.clone() });
        ensure!(
            !self.scopes.iter().any(|s| s.declared.contains(&var.id())),
            VariableRedeclaredSnafu { name: name.clone() }
        );

        if name.is_empty() {
            name = DEFAULT_NAME.to_string();
            var.set_name(DEFAULT_NAME);
        }

        if let Some(index) = self.scopes.iter().position(|s| s.counters.contains_key(&name)) {
            let mut counter = self.scopes[index].counters[&name];
            let renamed = loop {
                counter += 1;
                let candidate = format!("{name}{counter}");
                if !self.scopes.iter().any(|s| s.counters.contains_key(&candidate)) {
                    break candidate;
                }
            };
            trace!(from = %name, to = %renamed, depth = self.scopes.len(), "renamed variable");
            self.scopes[index].counters.insert(name, counter);
            var.set_name(renamed.as_str());
            name = renamed;
        }

        let innermost = self.scopes.last_mut().context(MissingScopeSnafu { name: name.clone() })?;
        innermost.declared.insert(var.id());
        innermost.counters.insert(name, 0);
        Ok(())
    }

    fn stmt(&mut self, s: &Stmt) -> Result<()> {
        match s {
            Stmt::Declaration { var, .. } | Stmt::DeclarationAssignment { var, .. } => self.declare(var),
            Stmt::Expression(_) => Ok(()),
            Stmt::Block(b) => self.block(b),
            Stmt::ForLoop { start, body, .. } => self.scoped(|this| {
                this.stmt(start)?;
                this.block(body)
            }),
            Stmt::IfSelection { then, otherwise, .. } => self.scoped(|this| {
                this.block(then)?;
                match otherwise {
                    Some(o) => this.stmt(o),
                    None => Ok(()),
                }
            }),
        }
    }

    fn block(&mut self, b: &Block) -> Result<()> {
        self.scoped(|this| b.stmts.iter().try_for_each(|s| this.stmt(s)))
    }

    fn prototype(&mut self, p: &Prototype) -> Result<()> {
        p.args.iter().try_for_each(|(_, v)| self.declare(v))
    }

    fn declaration(&mut self, d: &Declaration) -> Result<()> {
        match d {
            Declaration::Prototype(p) => self.scoped(|this| this.prototype(p)),
            Declaration::Function { prototype, body } => self.scoped(|this| {
                this.prototype(prototype)?;
                this.block(body)
            }),
            Declaration::Global(s) => self.stmt(s),
        }
    }
}

/// Renames variables of a whole program; program-scope variables share one scope.
pub fn make_names_unique(program: &Program) -> Result<()> {
    let mut pass = UniqueNames::default();
    pass.scoped(|this| program.declarations.iter().try_for_each(|d| this.declaration(d)))
}

pub fn make_names_unique_in_declaration(declaration: &Declaration) -> Result<()> {
    let mut pass = UniqueNames::default();
    match declaration {
        Declaration::Global(_) => pass.scoped(|this| this.declaration(declaration)),
        _ => pass.declaration(declaration),
    }
}

pub fn make_names_unique_in_block(block: &Block) -> Result<()> {
    UniqueNames::default().block(block)
}

/// Fails with [`crate::Error::MissingScope`] for a bare declaration, which has no enclosing block.
pub fn make_names_unique_in_stmt(stmt: &Stmt) -> Result<()> {
    UniqueNames::default().stmt(stmt)
}
