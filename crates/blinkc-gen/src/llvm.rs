//! LLVM IR generation.
//!
//! Walks the validated statement list and builds a module: one global per
//! module-scope declaration, one function per `func`, and an external
//! `printf` declared up front. All locals (parameters included) live in
//! stack slots accessed through load/store; no phi nodes are built here —
//! downstream mem2reg is expected to promote the slots.
//!
//! Control flow is fully explicit: every edge between basic blocks is an
//! unconditional or conditional branch, and a block only receives a
//! fall-through branch when it does not already end in a terminator.

use indexmap::IndexMap;
use inkwell::basic_block::BasicBlock;
use inkwell::builder::{Builder, BuilderError};
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum};
use inkwell::values::{BasicMetadataValueEnum, BasicValueEnum, FunctionValue, IntValue, PointerValue};
use inkwell::{AddressSpace, FloatPredicate, IntPredicate};

use blinkc_lex::TokenKind;
use blinkc_par::ast::*;
use blinkc_par::types::Value;
use blinkc_util::{ScopeStack, Span};

use crate::error::CodegenError;
use crate::types::TypeLowering;

/// Storage handle for one variable: the address to load from / store to
/// and the type stored there (a global's value type, an alloca's allocated
/// type, or a spilled parameter's own type).
#[derive(Clone, Copy, Debug)]
pub struct VarBinding<'ctx> {
    pub ptr: PointerValue<'ctx>,
    pub ty: BasicTypeEnum<'ctx>,
}

/// Code generator over one validated program.
pub struct CodeGenerator<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    types: TypeLowering<'ctx>,
    variables: ScopeStack<VarBinding<'ctx>>,
    functions: IndexMap<String, FunctionValue<'ctx>>,
    /// `(exit, continue)` target pair per enclosing loop; `break` branches
    /// to the first, `continue` to the second.
    loop_blocks: Vec<(BasicBlock<'ctx>, BasicBlock<'ctx>)>,
    /// Zero at module scope; declarations there become globals.
    blocks_deep: u32,
}

impl<'ctx> CodeGenerator<'ctx> {
    /// Creates a generator with an empty module and the external variadic
    /// `printf : (i8*, ...) -> i32` already declared.
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        let module = context.create_module(module_name);
        let builder = context.create_builder();

        let i8_ptr = context.i8_type().ptr_type(AddressSpace::default());
        let printf_type = context.i32_type().fn_type(&[i8_ptr.into()], true);
        let printf = module.add_function("printf", printf_type, Some(Linkage::External));

        let mut functions = IndexMap::new();
        functions.insert("printf".to_string(), printf);

        Self {
            context,
            module,
            builder,
            types: TypeLowering::new(context),
            variables: ScopeStack::new(),
            functions,
            loop_blocks: Vec::new(),
            blocks_deep: 0,
        }
    }

    /// Emits the whole program into the module.
    pub fn generate(&mut self, stmts: &[Stmt]) -> Result<(), CodegenError> {
        for stmt in stmts {
            self.generate_stmt(stmt)?;
        }
        Ok(())
    }

    /// Hands the finished module to the caller.
    pub fn finish(self) -> Module<'ctx> {
        self.module
    }

    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    fn generate_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::VarDecl(s) => self.generate_var_decl_stmt(s),
            Stmt::FuncDecl(s) => self.generate_func_decl_stmt(s),
            Stmt::FuncCall(s) => self.generate_func_call_stmt(s),
            Stmt::VarAsgn(s) => self.generate_var_asgn_stmt(s),
            Stmt::If(s) => self.generate_if_stmt(s),
            Stmt::ForCycle(s) => self.generate_for_cycle_stmt(s),
            Stmt::WhileCycle(s) => self.generate_while_cycle_stmt(s),
            Stmt::DoWhileCycle(s) => self.generate_do_while_cycle_stmt(s),
            Stmt::Break(s) => self.generate_break_stmt(s),
            Stmt::Continue(s) => self.generate_continue_stmt(s),
            Stmt::Return(s) => self.generate_return_stmt(s),
        }
    }

    /// Module scope gets an external global with a folded initializer;
    /// function scope gets a stack slot with a stored (and implicitly
    /// cast) initial value. Either way the handle lands in the current
    /// frame.
    fn generate_var_decl_stmt(&mut self, vds: &VarDeclStmt) -> Result<(), CodegenError> {
        let span = vds.token.span;
        let var_type = self.types.lower_basic(&vds.ty, span)?;

        if self.blocks_deep == 0 {
            let init = match &vds.init {
                Some(expr) => self.fold_global_init(expr, var_type, &vds.name, span)?,
                None => var_type.const_zero(),
            };
            let global = self.module.add_global(var_type, None, &vds.name);
            global.set_linkage(Linkage::External);
            global.set_constant(vds.ty.is_const);
            global.set_initializer(&init);
            self.variables.declare(
                vds.name.clone(),
                VarBinding {
                    ptr: global.as_pointer_value(),
                    ty: var_type,
                },
            );
        } else {
            let at = builder_error(span);
            let slot = self.builder.build_alloca(var_type, &vds.name).map_err(at)?;
            let init = match &vds.init {
                Some(expr) => {
                    let value = self.generate_expr(expr)?;
                    self.implicitly_cast(value, var_type, span)?
                }
                None => var_type.const_zero(),
            };
            self.builder.build_store(slot, init).map_err(at)?;
            self.variables.declare(
                vds.name.clone(),
                VarBinding {
                    ptr: slot,
                    ty: var_type,
                },
            );
        }
        Ok(())
    }

    /// Module-scope initializers must fold to constants: a numeric or
    /// boolean literal, possibly under a unary minus, converted straight
    /// to the declared type.
    fn fold_global_init(
        &self,
        expr: &Expr,
        target: BasicTypeEnum<'ctx>,
        name: &str,
        span: Span,
    ) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let non_constant = || CodegenError::NonConstantGlobalInit {
            name: name.to_string(),
            span,
        };

        let (literal, negate) = match expr {
            Expr::Literal(lit) => (lit, false),
            Expr::Unary(ue) if ue.op == TokenKind::Minus => match &*ue.expr {
                Expr::Literal(lit) => (lit, true),
                _ => return Err(non_constant()),
            },
            _ => return Err(non_constant()),
        };

        let (int_val, float_val) = match &literal.value {
            Value::I8(v) => (*v as i64, *v as f64),
            Value::I16(v) => (*v as i64, *v as f64),
            Value::I32(v) => (*v as i64, *v as f64),
            Value::I64(v) => (*v, *v as f64),
            Value::F32(v) => (*v as i64, *v as f64),
            Value::F64(v) => (*v as i64, *v),
            Value::U8(v) => (*v as i64, *v as f64),
            Value::U16(v) => (*v as i64, *v as f64),
            Value::U32(v) => (*v as i64, *v as f64),
            Value::U64(v) => (*v as i64, *v as f64),
            Value::Bool(v) => (*v as i64, f64::from(u8::from(*v))),
            Value::Str(_) => return Err(non_constant()),
        };
        let (int_val, float_val) = if negate {
            (-int_val, -float_val)
        } else {
            (int_val, float_val)
        };

        match target {
            BasicTypeEnum::IntType(ty) => Ok(ty.const_int(int_val as u64, true).into()),
            BasicTypeEnum::FloatType(ty) => Ok(ty.const_float(float_val).into()),
            _ => Err(non_constant()),
        }
    }

    /// Declares the function, spills every parameter into a stack slot,
    /// and emits the body starting from the `entry` block.
    fn generate_func_decl_stmt(&mut self, fds: &FuncDeclStmt) -> Result<(), CodegenError> {
        let span = fds.token.span;
        let return_type = self.types.lower_return(&fds.return_type, span)?;
        let mut param_types: Vec<BasicMetadataTypeEnum> = Vec::with_capacity(fds.args.len());
        for arg in &fds.args {
            param_types.push(self.types.lower_basic(&arg.ty, span)?.into());
        }

        let fn_type = match return_type {
            Some(ty) => ty.fn_type(&param_types, false),
            None => self.context.void_type().fn_type(&param_types, false),
        };
        let function = self
            .module
            .add_function(&fds.name, fn_type, Some(Linkage::External));

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);
        self.blocks_deep += 1;
        self.variables.enter();
        self.functions.insert(fds.name.clone(), function);

        let at = builder_error(span);
        for (index, arg) in fds.args.iter().enumerate() {
            let param = function
                .get_nth_param(index as u32)
                .ok_or_else(|| CodegenError::Internal {
                    message: format!("missing parameter {} of '{}'", index, fds.name),
                    span,
                })?;
            param.set_name(&arg.name);
            let slot = self
                .builder
                .build_alloca(param.get_type(), &arg.name)
                .map_err(at)?;
            self.builder.build_store(slot, param).map_err(at)?;
            self.variables.declare(
                arg.name.clone(),
                VarBinding {
                    ptr: slot,
                    ty: param.get_type(),
                },
            );
        }

        for stmt in &fds.body {
            self.generate_stmt(stmt)?;
        }

        self.blocks_deep -= 1;
        self.variables.leave();
        Ok(())
    }

    fn generate_func_call_stmt(&mut self, fcs: &FuncCallStmt) -> Result<(), CodegenError> {
        self.generate_call(&fcs.name, &fcs.args, fcs.token.span)?;
        Ok(())
    }

    fn generate_var_asgn_stmt(&mut self, vas: &VarAsgnStmt) -> Result<(), CodegenError> {
        let span = vas.token.span;
        let value = self.generate_expr(&vas.expr)?;
        let binding =
            *self
                .variables
                .lookup(&vas.name)
                .ok_or_else(|| CodegenError::UnresolvedVariable {
                    name: vas.name.clone(),
                    span,
                })?;
        let value = self.implicitly_cast(value, binding.ty, span)?;
        self.builder
            .build_store(binding.ptr, value)
            .map_err(builder_error(span))?;
        Ok(())
    }

    /// `then`/`else`/`merge` block triple; each branch runs in its own
    /// scope frame and falls through to `merge` unless already terminated.
    fn generate_if_stmt(&mut self, is: &IfStmt) -> Result<(), CodegenError> {
        let span = is.token.span;
        let at = builder_error(span);
        let cond = self.generate_expr(&is.cond)?;
        let cond = self.expect_int_condition(cond, span)?;
        let function = self.current_function(span)?;

        let then_bb = self.context.append_basic_block(function, "then");
        let else_bb = self.context.append_basic_block(function, "else");
        let merge_bb = self.context.append_basic_block(function, "merge");

        self.builder
            .build_conditional_branch(cond, then_bb, else_bb)
            .map_err(at)?;

        self.builder.position_at_end(then_bb);
        self.variables.enter();
        for stmt in &is.then_block {
            self.generate_stmt(stmt)?;
        }
        self.variables.leave();
        if self.needs_terminator() {
            self.builder.build_unconditional_branch(merge_bb).map_err(at)?;
        }

        self.builder.position_at_end(else_bb);
        self.variables.enter();
        for stmt in &is.else_block {
            self.generate_stmt(stmt)?;
        }
        self.variables.leave();
        if self.needs_terminator() {
            self.builder.build_unconditional_branch(merge_bb).map_err(at)?;
        }

        self.builder.position_at_end(merge_bb);
        Ok(())
    }

    /// Five blocks: indexator → condition → (body → iteration → condition)
    /// | exit. The header declaration is emitted before the body frame is
    /// pushed, so it lands in the enclosing scope.
    fn generate_for_cycle_stmt(&mut self, fcs: &ForCycleStmt) -> Result<(), CodegenError> {
        let span = fcs.token.span;
        let at = builder_error(span);
        let function = self.current_function(span)?;

        let indexator_bb = self.context.append_basic_block(function, "for.indexator");
        let condition_bb = self.context.append_basic_block(function, "for.condition");
        let iteration_bb = self.context.append_basic_block(function, "for.iteration");
        let body_bb = self.context.append_basic_block(function, "for.body");
        let exit_bb = self.context.append_basic_block(function, "for.exit");

        self.builder.build_unconditional_branch(indexator_bb).map_err(at)?;
        self.builder.position_at_end(indexator_bb);
        self.generate_stmt(&fcs.init)?;

        self.builder.build_unconditional_branch(condition_bb).map_err(at)?;
        self.builder.position_at_end(condition_bb);
        let cond = self.generate_expr(&fcs.cond)?;
        let cond = self.expect_int_condition(cond, span)?;
        self.builder
            .build_conditional_branch(cond, body_bb, exit_bb)
            .map_err(at)?;

        self.builder.position_at_end(body_bb);
        self.loop_blocks.push((exit_bb, iteration_bb));
        self.blocks_deep += 1;
        self.variables.enter();
        for stmt in &fcs.body {
            self.generate_stmt(stmt)?;
        }
        self.variables.leave();
        self.blocks_deep -= 1;
        self.loop_blocks.pop();

        if self.needs_terminator() {
            self.builder.build_unconditional_branch(iteration_bb).map_err(at)?;
        }
        self.builder.position_at_end(iteration_bb);
        self.generate_stmt(&fcs.step)?;
        self.builder.build_unconditional_branch(condition_bb).map_err(at)?;

        self.builder.position_at_end(exit_bb);
        Ok(())
    }

    /// Three blocks: condition → (body → condition) | exit.
    fn generate_while_cycle_stmt(&mut self, wcs: &WhileCycleStmt) -> Result<(), CodegenError> {
        let span = wcs.token.span;
        let at = builder_error(span);
        let function = self.current_function(span)?;

        let condition_bb = self.context.append_basic_block(function, "while.condition");
        let body_bb = self.context.append_basic_block(function, "while.body");
        let exit_bb = self.context.append_basic_block(function, "while.exit");

        self.builder.build_unconditional_branch(condition_bb).map_err(at)?;
        self.builder.position_at_end(condition_bb);
        let cond = self.generate_expr(&wcs.cond)?;
        let cond = self.expect_int_condition(cond, span)?;
        self.builder
            .build_conditional_branch(cond, body_bb, exit_bb)
            .map_err(at)?;

        self.builder.position_at_end(body_bb);
        self.loop_blocks.push((exit_bb, condition_bb));
        self.blocks_deep += 1;
        self.variables.enter();
        for stmt in &wcs.body {
            self.generate_stmt(stmt)?;
        }
        self.variables.leave();
        self.blocks_deep -= 1;
        self.loop_blocks.pop();

        if self.needs_terminator() {
            self.builder.build_unconditional_branch(condition_bb).map_err(at)?;
        }
        self.builder.position_at_end(exit_bb);
        Ok(())
    }

    /// Three blocks: body → condition → (body | exit); the body runs
    /// before the condition is first evaluated.
    fn generate_do_while_cycle_stmt(&mut self, dwcs: &DoWhileCycleStmt) -> Result<(), CodegenError> {
        let span = dwcs.token.span;
        let at = builder_error(span);
        let function = self.current_function(span)?;

        let condition_bb = self.context.append_basic_block(function, "dowhile.condition");
        let body_bb = self.context.append_basic_block(function, "dowhile.body");
        let exit_bb = self.context.append_basic_block(function, "dowhile.exit");

        self.builder.build_unconditional_branch(body_bb).map_err(at)?;
        self.builder.position_at_end(body_bb);
        self.loop_blocks.push((exit_bb, condition_bb));
        self.blocks_deep += 1;
        self.variables.enter();
        for stmt in &dwcs.body {
            self.generate_stmt(stmt)?;
        }
        self.variables.leave();
        self.blocks_deep -= 1;
        self.loop_blocks.pop();

        if self.needs_terminator() {
            self.builder.build_unconditional_branch(condition_bb).map_err(at)?;
        }
        self.builder.position_at_end(condition_bb);
        let cond = self.generate_expr(&dwcs.cond)?;
        let cond = self.expect_int_condition(cond, span)?;
        self.builder
            .build_conditional_branch(cond, body_bb, exit_bb)
            .map_err(at)?;

        self.builder.position_at_end(exit_bb);
        Ok(())
    }

    fn generate_break_stmt(&mut self, bs: &BreakStmt) -> Result<(), CodegenError> {
        let span = bs.token.span;
        let (exit, _) = *self
            .loop_blocks
            .last()
            .ok_or_else(|| CodegenError::Internal {
                message: "`break` outside of a loop reached code generation".to_string(),
                span,
            })?;
        self.builder
            .build_unconditional_branch(exit)
            .map_err(builder_error(span))?;
        Ok(())
    }

    fn generate_continue_stmt(&mut self, cs: &ContinueStmt) -> Result<(), CodegenError> {
        let span = cs.token.span;
        let (_, target) = *self
            .loop_blocks
            .last()
            .ok_or_else(|| CodegenError::Internal {
                message: "`continue` outside of a loop reached code generation".to_string(),
                span,
            })?;
        self.builder
            .build_unconditional_branch(target)
            .map_err(builder_error(span))?;
        Ok(())
    }

    fn generate_return_stmt(&mut self, rs: &ReturnStmt) -> Result<(), CodegenError> {
        let span = rs.token.span;
        match &rs.expr {
            None => {
                self.builder.build_return(None).map_err(builder_error(span))?;
            }
            Some(expr) => {
                let value = self.generate_expr(expr)?;
                self.builder
                    .build_return(Some(&value))
                    .map_err(builder_error(span))?;
            }
        }
        Ok(())
    }

    fn generate_expr(&mut self, expr: &Expr) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        match expr {
            Expr::Literal(lit) => self.generate_literal(lit),
            Expr::Binary(be) => self.generate_binary_expr(be),
            Expr::Unary(ue) => self.generate_unary_expr(ue),
            Expr::Var(ve) => self.generate_var_expr(ve),
            Expr::FuncCall(fce) => {
                let result = self.generate_call(&fce.name, &fce.args, fce.token.span)?;
                result.ok_or_else(|| CodegenError::VoidCall {
                    name: fce.name.clone(),
                    span: fce.token.span,
                })
            }
        }
    }

    /// Integer literals carry their exact width with sign interpretation
    /// from the type flag; strings become module-level constants with a
    /// pointer returned.
    fn generate_literal(&mut self, lit: &Literal) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        use blinkc_par::types::TypeKind;

        let span = lit.token.span;
        let signed = !lit.ty.is_unsigned;
        let value: BasicValueEnum = match (lit.ty.kind, &lit.value) {
            (TypeKind::I8, Value::I8(v)) => self
                .context
                .i8_type()
                .const_int(*v as i64 as u64, signed)
                .into(),
            (TypeKind::I16, Value::I16(v)) => self
                .context
                .i16_type()
                .const_int(*v as i64 as u64, signed)
                .into(),
            (TypeKind::I32, Value::I32(v)) => self
                .context
                .i32_type()
                .const_int(*v as i64 as u64, signed)
                .into(),
            (TypeKind::I64, Value::I64(v)) => {
                self.context.i64_type().const_int(*v as u64, signed).into()
            }
            (TypeKind::F32, Value::F32(v)) => {
                self.context.f32_type().const_float(*v as f64).into()
            }
            (TypeKind::F64, Value::F64(v)) => self.context.f64_type().const_float(*v).into(),
            (TypeKind::U8, Value::U8(v)) => {
                self.context.i8_type().const_int(*v as u64, signed).into()
            }
            (TypeKind::U16, Value::U16(v)) => {
                self.context.i16_type().const_int(*v as u64, signed).into()
            }
            (TypeKind::U32, Value::U32(v)) => {
                self.context.i32_type().const_int(*v as u64, signed).into()
            }
            (TypeKind::U64, Value::U64(v)) => {
                self.context.i64_type().const_int(*v, signed).into()
            }
            (TypeKind::Bool, Value::Bool(v)) => {
                self.context.bool_type().const_int(*v as u64, signed).into()
            }
            (TypeKind::Str, Value::Str(v)) => self
                .builder
                .build_global_string_ptr(v, "string_lit")
                .map_err(builder_error(span))?
                .as_pointer_value()
                .into(),
            _ => return Err(CodegenError::UnsupportedLiteral { span }),
        };
        Ok(value)
    }

    /// Promotes both operands to the codegen-level common type (doubles
    /// dominate, else float, else the wider integer), then selects the
    /// float or integer instruction family. `&&`/`||` lower to selects on
    /// `i1` with no short-circuit control flow.
    fn generate_binary_expr(&mut self, be: &BinaryExpr) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let span = be.token.span;
        let at = builder_error(span);
        let mut left = self.generate_expr(&be.left)?;
        let mut right = self.generate_expr(&be.right)?;

        let common = self
            .common_llvm_type(left.get_type(), right.get_type())
            .ok_or_else(|| CodegenError::NoCommonType {
                left: render_type(left.get_type()),
                right: render_type(right.get_type()),
                span,
            })?;
        if left.get_type() != common {
            left = self.implicitly_cast(left, common, span)?;
        }
        if right.get_type() != common {
            right = self.implicitly_cast(right, common, span)?;
        }

        let is_float = common.is_float_type();
        let value: BasicValueEnum = match be.op {
            TokenKind::Plus => {
                if is_float {
                    self.builder
                        .build_float_add(left.into_float_value(), right.into_float_value(), "addtmp")
                        .map_err(at)?
                        .into()
                } else {
                    self.builder
                        .build_int_add(left.into_int_value(), right.into_int_value(), "addtmp")
                        .map_err(at)?
                        .into()
                }
            }
            TokenKind::Minus => {
                if is_float {
                    self.builder
                        .build_float_sub(left.into_float_value(), right.into_float_value(), "subtmp")
                        .map_err(at)?
                        .into()
                } else {
                    self.builder
                        .build_int_sub(left.into_int_value(), right.into_int_value(), "subtmp")
                        .map_err(at)?
                        .into()
                }
            }
            TokenKind::Mult => {
                if is_float {
                    self.builder
                        .build_float_mul(left.into_float_value(), right.into_float_value(), "multmp")
                        .map_err(at)?
                        .into()
                } else {
                    self.builder
                        .build_int_mul(left.into_int_value(), right.into_int_value(), "multmp")
                        .map_err(at)?
                        .into()
                }
            }
            TokenKind::Div => {
                if is_float {
                    self.builder
                        .build_float_div(left.into_float_value(), right.into_float_value(), "divtmp")
                        .map_err(at)?
                        .into()
                } else {
                    self.builder
                        .build_int_signed_div(left.into_int_value(), right.into_int_value(), "divtmp")
                        .map_err(at)?
                        .into()
                }
            }
            TokenKind::Modulo => {
                if is_float {
                    self.builder
                        .build_float_rem(left.into_float_value(), right.into_float_value(), "remtmp")
                        .map_err(at)?
                        .into()
                } else {
                    self.builder
                        .build_int_signed_rem(left.into_int_value(), right.into_int_value(), "remtmp")
                        .map_err(at)?
                        .into()
                }
            }
            TokenKind::Gt => self.build_comparison(
                left,
                right,
                is_float,
                FloatPredicate::OGT,
                IntPredicate::SGT,
                "gttmp",
                span,
            )?,
            TokenKind::GtEq => self.build_comparison(
                left,
                right,
                is_float,
                FloatPredicate::OGE,
                IntPredicate::SGE,
                "getmp",
                span,
            )?,
            TokenKind::Ls => self.build_comparison(
                left,
                right,
                is_float,
                FloatPredicate::OLT,
                IntPredicate::SLT,
                "lttmp",
                span,
            )?,
            TokenKind::LsEq => self.build_comparison(
                left,
                right,
                is_float,
                FloatPredicate::OLE,
                IntPredicate::SLE,
                "letmp",
                span,
            )?,
            TokenKind::EqEq => self.build_comparison(
                left,
                right,
                is_float,
                FloatPredicate::OEQ,
                IntPredicate::EQ,
                "eqtmp",
                span,
            )?,
            TokenKind::NotEq => self.build_comparison(
                left,
                right,
                is_float,
                FloatPredicate::ONE,
                IntPredicate::NE,
                "netmp",
                span,
            )?,
            TokenKind::LAnd => {
                let cond = self.expect_int_condition(left, span)?;
                let zero: BasicValueEnum = match right {
                    BasicValueEnum::IntValue(v) => v.get_type().const_zero().into(),
                    _ => {
                        return Err(CodegenError::Internal {
                            message: "logical operator on a non-integer operand".to_string(),
                            span,
                        })
                    }
                };
                self.builder
                    .build_select(cond, right, zero, "landtmp")
                    .map_err(at)?
            }
            TokenKind::LOr => {
                let cond = self.expect_int_condition(left, span)?;
                let one: BasicValueEnum = match right {
                    BasicValueEnum::IntValue(v) => v.get_type().const_int(1, false).into(),
                    _ => {
                        return Err(CodegenError::Internal {
                            message: "logical operator on a non-integer operand".to_string(),
                            span,
                        })
                    }
                };
                self.builder
                    .build_select(cond, one, right, "lortmp")
                    .map_err(at)?
            }
            _ => {
                return Err(CodegenError::Internal {
                    message: format!("unsupported binary operator {:?}", be.op),
                    span,
                })
            }
        };
        Ok(value)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_comparison(
        &self,
        left: BasicValueEnum<'ctx>,
        right: BasicValueEnum<'ctx>,
        is_float: bool,
        float_pred: FloatPredicate,
        int_pred: IntPredicate,
        name: &str,
        span: Span,
    ) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let at = builder_error(span);
        let value = if is_float {
            self.builder
                .build_float_compare(
                    float_pred,
                    left.into_float_value(),
                    right.into_float_value(),
                    name,
                )
                .map_err(at)?
        } else {
            self.builder
                .build_int_compare(int_pred, left.into_int_value(), right.into_int_value(), name)
                .map_err(at)?
        };
        Ok(value.into())
    }

    /// `-` negates in the operand's own domain; `!` compares against a
    /// zero of the operand's own type and yields `i1`.
    fn generate_unary_expr(&mut self, ue: &UnaryExpr) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let span = ue.token.span;
        let at = builder_error(span);
        let value = self.generate_expr(&ue.expr)?;

        match ue.op {
            TokenKind::Minus => match value {
                BasicValueEnum::FloatValue(v) => Ok(self
                    .builder
                    .build_float_neg(v, "negtmp")
                    .map_err(at)?
                    .into()),
                BasicValueEnum::IntValue(v) => {
                    Ok(self.builder.build_int_neg(v, "negtmp").map_err(at)?.into())
                }
                _ => Err(CodegenError::Internal {
                    message: "negation of a non-numeric value".to_string(),
                    span,
                }),
            },
            TokenKind::LNot => match value {
                BasicValueEnum::FloatValue(v) => Ok(self
                    .builder
                    .build_float_compare(FloatPredicate::OEQ, v, v.get_type().const_zero(), "lnottmp")
                    .map_err(at)?
                    .into()),
                BasicValueEnum::IntValue(v) => Ok(self
                    .builder
                    .build_int_compare(IntPredicate::EQ, v, v.get_type().const_zero(), "lnottmp")
                    .map_err(at)?
                    .into()),
                _ => Err(CodegenError::Internal {
                    message: "logical not of a non-numeric value".to_string(),
                    span,
                }),
            },
            _ => Err(CodegenError::Internal {
                message: format!("unsupported unary operator {:?}", ue.op),
                span,
            }),
        }
    }

    fn generate_var_expr(&mut self, ve: &VarExpr) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let span = ve.token.span;
        let binding =
            *self
                .variables
                .lookup(&ve.name)
                .ok_or_else(|| CodegenError::UnresolvedVariable {
                    name: ve.name.clone(),
                    span,
                })?;
        self.builder
            .build_load(binding.ptr, &format!("{}.load", ve.name))
            .map_err(builder_error(span))
    }

    /// Shared emission for call statements and call expressions. No
    /// implicit casts here: the semantic analyzer validated the argument
    /// types. Returns `None` for void calls.
    fn generate_call(
        &mut self,
        name: &str,
        args: &[Expr],
        span: Span,
    ) -> Result<Option<BasicValueEnum<'ctx>>, CodegenError> {
        let function = *self
            .functions
            .get(name)
            .ok_or_else(|| CodegenError::UnresolvedFunction {
                name: name.to_string(),
                span,
            })?;

        let mut call_args: Vec<BasicMetadataValueEnum> = Vec::with_capacity(args.len());
        for arg in args {
            call_args.push(self.generate_expr(arg)?.into());
        }

        let call = self
            .builder
            .build_call(function, &call_args, &format!("{}.call", name))
            .map_err(builder_error(span))?;
        Ok(call.try_as_basic_value().basic())
    }

    /// Same-width is a no-op; narrowing truncates; widening sign-extends
    /// (for unsigned operands too); `f32`/`f64` convert with fpext/
    /// fptrunc; integer to float goes through sitofp. Everything else is
    /// unrepresentable.
    fn implicitly_cast(
        &self,
        value: BasicValueEnum<'ctx>,
        expected: BasicTypeEnum<'ctx>,
        span: Span,
    ) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let at = builder_error(span);
        if value.get_type() == expected {
            return Ok(value);
        }

        match (value, expected) {
            (BasicValueEnum::IntValue(v), BasicTypeEnum::IntType(ty)) => {
                let value_width = v.get_type().get_bit_width();
                let expected_width = ty.get_bit_width();
                if value_width == expected_width {
                    Ok(value)
                } else if value_width > expected_width {
                    Ok(self
                        .builder
                        .build_int_truncate(v, ty, "trunctmp")
                        .map_err(at)?
                        .into())
                } else {
                    Ok(self
                        .builder
                        .build_int_s_extend(v, ty, "sexttmp")
                        .map_err(at)?
                        .into())
                }
            }
            (BasicValueEnum::FloatValue(v), BasicTypeEnum::FloatType(ty)) => {
                if ty == self.context.f64_type() {
                    Ok(self
                        .builder
                        .build_float_ext(v, ty, "fpexttmp")
                        .map_err(at)?
                        .into())
                } else {
                    Ok(self
                        .builder
                        .build_float_trunc(v, ty, "fptrunctmp")
                        .map_err(at)?
                        .into())
                }
            }
            (BasicValueEnum::IntValue(v), BasicTypeEnum::FloatType(ty)) => Ok(self
                .builder
                .build_signed_int_to_float(v, ty, "sitofptmp")
                .map_err(at)?
                .into()),
            _ => Err(CodegenError::InvalidCast {
                from: render_type(value.get_type()),
                to: render_type(expected),
                span,
            }),
        }
    }

    /// Codegen-level common type: doubles dominate; both floats stay
    /// float; two integers pick the wider (left on a tie). Mixed
    /// integer/f32 and pointer operands have no common type here.
    fn common_llvm_type(
        &self,
        left: BasicTypeEnum<'ctx>,
        right: BasicTypeEnum<'ctx>,
    ) -> Option<BasicTypeEnum<'ctx>> {
        let f64_type: BasicTypeEnum = self.context.f64_type().into();
        if left == f64_type || right == f64_type {
            return Some(f64_type);
        }
        if left.is_float_type() && right.is_float_type() {
            return Some(self.context.f32_type().into());
        }
        if let (BasicTypeEnum::IntType(l), BasicTypeEnum::IntType(r)) = (left, right) {
            if l.get_bit_width() >= r.get_bit_width() {
                return Some(left);
            }
            return Some(right);
        }
        None
    }

    fn expect_int_condition(
        &self,
        value: BasicValueEnum<'ctx>,
        span: Span,
    ) -> Result<IntValue<'ctx>, CodegenError> {
        match value {
            BasicValueEnum::IntValue(v) => Ok(v),
            _ => Err(CodegenError::Internal {
                message: "condition did not evaluate to an integer value".to_string(),
                span,
            }),
        }
    }

    fn current_function(&self, span: Span) -> Result<FunctionValue<'ctx>, CodegenError> {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_parent())
            .ok_or_else(|| CodegenError::Internal {
                message: "no active insertion point".to_string(),
                span,
            })
    }

    /// Whether the block under the insertion point still needs a
    /// terminator before control can fall through.
    fn needs_terminator(&self) -> bool {
        self.builder
            .get_insert_block()
            .map(|block| block.get_terminator().is_none())
            .unwrap_or(false)
    }
}

fn builder_error(span: Span) -> impl Fn(BuilderError) -> CodegenError + Copy {
    move |err| CodegenError::Builder {
        message: err.to_string(),
        span,
    }
}

fn render_type(ty: BasicTypeEnum) -> String {
    ty.print_to_string().to_string()
}
