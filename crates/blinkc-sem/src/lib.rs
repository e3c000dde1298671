//! blinkc-sem - Semantic analyzer for the Blink language.
//!
//! Walks the parsed statement list and accepts or rejects the program
//! before code generation: name resolution over lexical scopes, type
//! compatibility through the common-type relation, call arity, and the
//! statement-context rules (`break`/`continue` only inside loops,
//! `return` only inside functions). The AST itself is left untouched.
//!
//! State mirrors the walker's position: a scope stack of declared variable
//! types, a flat function registry (functions are global), a stack of
//! enclosing function return types, and a loop depth counter.

pub mod error;
pub mod infer;

use indexmap::IndexMap;

use blinkc_par::ast::*;
use blinkc_par::types::{Type, TypeKind};
use blinkc_util::{ScopeStack, Span};

pub use error::SemanticError;
pub use infer::common_type;

/// A registered function: declared return type and formal parameters.
#[derive(Clone, Debug)]
pub struct FunctionInfo {
    pub return_type: Type,
    pub args: Vec<Argument>,
}

/// Semantic analyzer over one program.
pub struct SemanticAnalyzer {
    variables: ScopeStack<Type>,
    functions: IndexMap<String, FunctionInfo>,
    functions_types_stack: Vec<Type>,
    loops_blocks_deep: u32,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            variables: ScopeStack::new(),
            functions: IndexMap::new(),
            functions_types_stack: Vec::new(),
            loops_blocks_deep: 0,
        }
    }

    /// Validates the whole program.
    pub fn analyze(&mut self, stmts: &[Stmt]) -> Result<(), SemanticError> {
        for stmt in stmts {
            self.analyze_stmt(stmt)?;
        }
        Ok(())
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) -> Result<(), SemanticError> {
        match stmt {
            Stmt::VarDecl(s) => self.analyze_var_decl_stmt(s),
            Stmt::FuncDecl(s) => self.analyze_func_decl_stmt(s),
            Stmt::FuncCall(s) => self.analyze_func_call_stmt(s),
            Stmt::VarAsgn(s) => self.analyze_var_asgn_stmt(s),
            Stmt::If(s) => self.analyze_if_stmt(s),
            Stmt::ForCycle(s) => self.analyze_for_cycle_stmt(s),
            Stmt::WhileCycle(s) => self.analyze_while_cycle_stmt(s),
            Stmt::DoWhileCycle(s) => self.analyze_do_while_cycle_stmt(s),
            Stmt::Break(s) => self.analyze_break_stmt(s),
            Stmt::Continue(s) => self.analyze_continue_stmt(s),
            Stmt::Return(s) => self.analyze_return_stmt(s),
        }
    }

    /// Declaration: unique in the innermost scope, initializer unifiable
    /// with the declared type. The name becomes visible only after its
    /// initializer is checked.
    fn analyze_var_decl_stmt(&mut self, vds: &VarDeclStmt) -> Result<(), SemanticError> {
        if self.variables.is_declared_in_current(&vds.name) {
            return Err(SemanticError::DuplicateVariable {
                name: vds.name.clone(),
                span: vds.token.span,
            });
        }

        if let Some(init) = &vds.init {
            let init_type = self.analyze_expr(init)?;
            common_type(&vds.ty, &init_type, vds.token.span)?;
        }

        self.variables.declare(vds.name.clone(), vds.ty.clone());
        Ok(())
    }

    /// Functions are global and unique by name. The function is registered
    /// before its body is walked so recursive calls resolve.
    fn analyze_func_decl_stmt(&mut self, fds: &FuncDeclStmt) -> Result<(), SemanticError> {
        if let Some(existing) = self.functions.get(&fds.name) {
            return Err(SemanticError::DuplicateFunction {
                signature: render_signature(&fds.name, existing),
                span: fds.token.span,
            });
        }

        self.functions.insert(
            fds.name.clone(),
            FunctionInfo {
                return_type: fds.return_type.clone(),
                args: fds.args.clone(),
            },
        );

        self.variables.enter();
        self.functions_types_stack.push(fds.return_type.clone());
        for arg in &fds.args {
            self.variables.declare(arg.name.clone(), arg.ty.clone());
        }
        for stmt in &fds.body {
            self.analyze_stmt(stmt)?;
        }
        self.functions_types_stack.pop();
        self.variables.leave();
        Ok(())
    }

    fn analyze_func_call_stmt(&mut self, fcs: &FuncCallStmt) -> Result<(), SemanticError> {
        self.analyze_call(&fcs.name, &fcs.args, fcs.token.span)?;
        Ok(())
    }

    /// The assignment target must resolve and the RHS must type-check on
    /// its own; declared-versus-assigned compatibility is left to the
    /// code generator's implicit cast.
    fn analyze_var_asgn_stmt(&mut self, vas: &VarAsgnStmt) -> Result<(), SemanticError> {
        if self.variables.lookup(&vas.name).is_none() {
            return Err(SemanticError::UnresolvedVariable {
                name: vas.name.clone(),
                span: vas.token.span,
            });
        }
        self.analyze_expr(&vas.expr)?;
        Ok(())
    }

    fn analyze_if_stmt(&mut self, is: &IfStmt) -> Result<(), SemanticError> {
        self.analyze_expr(&is.cond)?;

        self.variables.enter();
        for stmt in &is.then_block {
            self.analyze_stmt(stmt)?;
        }
        self.variables.leave();

        self.variables.enter();
        for stmt in &is.else_block {
            self.analyze_stmt(stmt)?;
        }
        self.variables.leave();
        Ok(())
    }

    /// The `for` header's declaration lands in the enclosing scope, like
    /// the code generator emits it; only the body gets its own frame.
    fn analyze_for_cycle_stmt(&mut self, fcs: &ForCycleStmt) -> Result<(), SemanticError> {
        self.analyze_stmt(&fcs.init)?;
        self.analyze_expr(&fcs.cond)?;
        self.analyze_stmt(&fcs.step)?;

        self.loops_blocks_deep += 1;
        self.variables.enter();
        for stmt in &fcs.body {
            self.analyze_stmt(stmt)?;
        }
        self.variables.leave();
        self.loops_blocks_deep -= 1;
        Ok(())
    }

    fn analyze_while_cycle_stmt(&mut self, wcs: &WhileCycleStmt) -> Result<(), SemanticError> {
        self.analyze_expr(&wcs.cond)?;

        self.loops_blocks_deep += 1;
        self.variables.enter();
        for stmt in &wcs.body {
            self.analyze_stmt(stmt)?;
        }
        self.variables.leave();
        self.loops_blocks_deep -= 1;
        Ok(())
    }

    fn analyze_do_while_cycle_stmt(&mut self, dwcs: &DoWhileCycleStmt) -> Result<(), SemanticError> {
        self.analyze_expr(&dwcs.cond)?;

        self.loops_blocks_deep += 1;
        self.variables.enter();
        for stmt in &dwcs.body {
            self.analyze_stmt(stmt)?;
        }
        self.variables.leave();
        self.loops_blocks_deep -= 1;
        Ok(())
    }

    fn analyze_break_stmt(&mut self, bs: &BreakStmt) -> Result<(), SemanticError> {
        if self.loops_blocks_deep == 0 {
            return Err(SemanticError::BreakOutsideLoop {
                span: bs.token.span,
            });
        }
        Ok(())
    }

    fn analyze_continue_stmt(&mut self, cs: &ContinueStmt) -> Result<(), SemanticError> {
        if self.loops_blocks_deep == 0 {
            return Err(SemanticError::ContinueOutsideLoop {
                span: cs.token.span,
            });
        }
        Ok(())
    }

    /// `return` must sit inside a function; its expression (or `nothing`
    /// when absent) must unify with the declared return type.
    fn analyze_return_stmt(&mut self, rs: &ReturnStmt) -> Result<(), SemanticError> {
        let Some(return_type) = self.functions_types_stack.last().cloned() else {
            return Err(SemanticError::ReturnOutsideFunction {
                span: rs.token.span,
            });
        };

        match &rs.expr {
            Some(expr) => {
                let expr_type = self.analyze_expr(expr)?;
                common_type(&expr_type, &return_type, rs.token.span)?;
            }
            None => {
                if return_type.kind != TypeKind::Nothing {
                    return Err(SemanticError::NoCommonType {
                        left: Type::nothing().to_string(),
                        right: return_type.to_string(),
                        span: rs.token.span,
                    });
                }
            }
        }
        Ok(())
    }

    fn analyze_expr(&mut self, expr: &Expr) -> Result<Type, SemanticError> {
        match expr {
            Expr::Literal(lit) => Ok(lit.ty.clone()),
            Expr::Binary(be) => {
                let left = self.analyze_expr(&be.left)?;
                let right = self.analyze_expr(&be.right)?;
                common_type(&left, &right, be.token.span)
            }
            Expr::Unary(ue) => self.analyze_expr(&ue.expr),
            Expr::Var(ve) => {
                self.variables
                    .lookup(&ve.name)
                    .cloned()
                    .ok_or(SemanticError::UnresolvedVariable {
                        name: ve.name.clone(),
                        span: ve.token.span,
                    })
            }
            Expr::FuncCall(fce) => self.analyze_call(&fce.name, &fce.args, fce.token.span),
        }
    }

    /// Shared resolution for call statements and call expressions. The
    /// reserved variadic external `printf` is accepted unconditionally and
    /// types as `i32`.
    fn analyze_call(
        &mut self,
        name: &str,
        args: &[Expr],
        span: Span,
    ) -> Result<Type, SemanticError> {
        if name == "printf" {
            return Ok(Type::i32());
        }

        if !self.functions.contains_key(name) {
            let mut rendered = Vec::with_capacity(args.len());
            for arg in args {
                rendered.push(self.analyze_expr(arg)?.to_string());
            }
            return Err(SemanticError::UnresolvedFunction {
                name: name.to_string(),
                args: rendered.join(", "),
                span,
            });
        }

        let info = self.functions[name].clone();
        if args.len() != info.args.len() {
            return Err(SemanticError::ArityMismatch {
                name: name.to_string(),
                expected: info.args.len(),
                found: args.len(),
                span,
            });
        }

        for (actual, formal) in args.iter().zip(&info.args) {
            let actual_type = self.analyze_expr(actual)?;
            common_type(&actual_type, &formal.ty, span)?;
        }

        Ok(info.return_type)
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_signature(name: &str, info: &FunctionInfo) -> String {
    let args = info
        .args
        .iter()
        .map(|arg| arg.ty.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} {}({})", info.return_type, name, args)
}
