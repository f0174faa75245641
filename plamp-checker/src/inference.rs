//! Type inference and rewriting
//!
//! One walk over every function resolves the type of each expression and
//! checks operators, assignments, calls and returns. The walk also rewrites
//! the tree while it goes:
//! - a numeric operand that widens into its partner is wrapped in a `Cast`
//! - `int i;` becomes `i := 0i`, with a default chosen by the type
//! - the first assignment to an unknown name becomes a typed definition
//!
//! An expression whose type cannot be determined is left unknown (`None`).
//! Checks that need an unknown type are skipped, so one mistake is reported
//! once instead of at every node above it.

use crate::builtins::{FunctionSignature, Intrinsics};
use crate::externals::ExternalSymbols;
use crate::scope::{ScopeStack, Variable, VariableKind};
use crate::widening::{assignability, can_cast, promote, widens_to, Assignability, Promotion};
use plamp_parser::{
    AssignOp, Ast, BinaryOp, Diagnostic, DiagnosticKind, InternalError, LiteralValue, NodeId, NodeKind,
    OperatorCategory, PlampType, Result, Symbol, SymbolTable, UnaryOp,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Infer types for every function under `root`, rewriting the tree in place
pub fn infer_types(
    ast: &mut Ast,
    symbols: &mut SymbolTable,
    root: NodeId,
    file_name: &str,
    externals: &dyn ExternalSymbols,
) -> Result<Vec<Diagnostic>> {
    let functions = match ast.kind(root) {
        NodeKind::Root { functions, .. } => functions.clone(),
        _ => return Err(InternalError::unexpected_node(root, "Root")),
    };

    let mut inference = TypeInference {
        ast,
        symbols,
        file_name,
        externals,
        intrinsics: Intrinsics::new(),
        functions: HashMap::new(),
        scopes: ScopeStack::new(),
        return_type: ReturnType::Unresolved,
        loop_depth: 0,
        duplicates: HashSet::new(),
        diagnostics: Vec::new(),
    };
    inference.collect_signatures(&functions)?;
    for function in functions {
        inference.visit_function(function)?;
    }

    debug!(
        file = file_name,
        diagnostics = inference.diagnostics.len(),
        "type inference finished"
    );
    Ok(inference.diagnostics)
}

#[derive(Debug, Clone)]
enum ReturnType {
    Known(PlampType),
    /// The declared return type did not resolve; returns are not checked
    Unresolved,
}

struct TypeInference<'a> {
    ast: &'a mut Ast,
    symbols: &'a mut SymbolTable,
    file_name: &'a str,
    externals: &'a dyn ExternalSymbols,
    intrinsics: Intrinsics,
    functions: HashMap<Symbol, Vec<FunctionSignature>>,
    scopes: ScopeStack,
    return_type: ReturnType,
    loop_depth: usize,
    /// Definitions already reported as duplicates
    duplicates: HashSet<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl TypeInference<'_> {
    fn report(&mut self, node: NodeId, kind: DiagnosticKind) -> Result<()> {
        let diagnostic = self.symbols.exception_for_node(node, kind, self.file_name)?;
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    /// Record the signature of every module function before any body is
    /// visited, so calls may refer to functions defined further down
    fn collect_signatures(&mut self, functions: &[NodeId]) -> Result<()> {
        for &function in functions {
            let NodeKind::FuncDef { return_type, name, params, .. } = self.ast.kind(function).clone() else {
                return Err(InternalError::unexpected_node(function, "FuncDef"));
            };
            let return_type = match return_type {
                Some(ty) => self.resolve_type_node(ty)?,
                None => Some(PlampType::Void),
            };

            let mut param_types = Vec::with_capacity(params.len());
            for param in params {
                let ty = match self.ast.kind(param) {
                    NodeKind::Parameter { ty, .. } => *ty,
                    _ => return Err(InternalError::unexpected_node(param, "Parameter")),
                };
                let resolved = self.resolve_type_node(ty)?;
                self.ast.set_ty(param, resolved.clone());
                param_types.push(resolved);
            }

            self.functions.entry(name).or_default().push(FunctionSignature {
                name,
                params: param_types,
                return_type,
            });
        }
        Ok(())
    }

    fn visit_function(&mut self, function: NodeId) -> Result<()> {
        let NodeKind::FuncDef { return_type, name, params, body } = self.ast.kind(function).clone() else {
            return Err(InternalError::unexpected_node(function, "FuncDef"));
        };
        trace!(function = %name, "inferring function");

        self.scopes = ScopeStack::new();
        self.loop_depth = 0;
        self.return_type = match return_type {
            None => ReturnType::Known(PlampType::Void),
            Some(ty) => match self.ast.ty(ty) {
                Some(resolved) => ReturnType::Known(resolved.clone()),
                None => ReturnType::Unresolved,
            },
        };

        for param in params {
            let name = match self.ast.kind(param) {
                NodeKind::Parameter { name, .. } => *name,
                _ => return Err(InternalError::unexpected_node(param, "Parameter")),
            };
            // Repeated parameter names are reported by a validator.
            if self.scopes.lookup(name).is_none() {
                let ty = self.ast.ty(param).cloned();
                self.scopes.declare(name, Variable { ty, node: param, kind: VariableKind::Parameter });
            }
        }

        self.visit_body(body)
    }

    fn visit_body(&mut self, body: NodeId) -> Result<()> {
        let statements = match self.ast.kind(body) {
            NodeKind::Body { statements } => statements.clone(),
            _ => return Err(InternalError::unexpected_node(body, "Body")),
        };

        self.scopes.push();
        let mut woven = Vec::with_capacity(statements.len());
        for statement in statements {
            woven.push(self.visit_statement(statement)?);
        }
        if let NodeKind::Body { statements } = self.ast.kind_mut(body) {
            *statements = woven;
        }
        self.scopes.pop();
        Ok(())
    }

    /// Visit one statement and return the node that takes its place
    fn visit_statement(&mut self, statement: NodeId) -> Result<NodeId> {
        match self.ast.kind(statement).clone() {
            NodeKind::VariableDefinition { ty, name } => return self.visit_bare_definition(statement, ty, name),
            NodeKind::Assign { op, target, value } => self.visit_assign(statement, op, target, value)?,
            NodeKind::Condition { predicate, if_clause, else_clause } => {
                self.visit_predicate(predicate)?;
                self.visit_body(if_clause)?;
                if let Some(else_clause) = else_clause {
                    self.visit_body(else_clause)?;
                }
            }
            NodeKind::While { predicate, body } => {
                self.visit_predicate(predicate)?;
                self.loop_depth += 1;
                self.visit_body(body)?;
                self.loop_depth -= 1;
            }
            NodeKind::Return { value } => self.visit_return(statement, value)?,
            NodeKind::Break => self.visit_jump(statement, "break")?,
            NodeKind::Continue => self.visit_jump(statement, "continue")?,
            NodeKind::Body { .. } => self.visit_body(statement)?,
            NodeKind::Call { .. } | NodeKind::ConstructorCall { .. } | NodeKind::Unary { .. } => {
                self.visit_expression(statement)?;
            }
            _ => return Err(InternalError::unexpected_node(statement, "statement")),
        }
        Ok(statement)
    }

    fn visit_predicate(&mut self, predicate: NodeId) -> Result<()> {
        match self.visit_expression(predicate)? {
            Some(ty) if ty != PlampType::Bool => self.report(predicate, DiagnosticKind::PredicateMustBeBooleanType),
            _ => Ok(()),
        }
    }

    fn visit_jump(&mut self, statement: NodeId, keyword: &str) -> Result<()> {
        if self.loop_depth == 0 {
            self.report(statement, DiagnosticKind::JumpOutsideLoop(keyword.to_string()))?;
        }
        Ok(())
    }

    fn visit_return(&mut self, statement: NodeId, value: Option<NodeId>) -> Result<()> {
        let found = match value {
            Some(value) => self.visit_expression(value)?,
            None => None,
        };
        let ReturnType::Known(expected) = self.return_type.clone() else {
            return Ok(());
        };

        match (value, expected) {
            (None, PlampType::Void) => Ok(()),
            (None, _) => self.report(statement, DiagnosticKind::ReturnValueIsMissing),
            (Some(_), PlampType::Void) => self.report(statement, DiagnosticKind::CannotReturnValue),
            (Some(value), expected) => {
                let Some(found) = found else {
                    return Ok(());
                };
                match assignability(&found, &expected) {
                    Assignability::Exact => Ok(()),
                    Assignability::Widen => self.insert_cast(statement, value, expected).map(drop),
                    Assignability::No => self.report(
                        statement,
                        DiagnosticKind::ReturnTypeMismatch {
                            expected: expected.to_string(),
                            found: found.to_string(),
                        },
                    ),
                }
            }
        }
    }

    /// `int i;` is declared and becomes `i := <default>`
    fn visit_bare_definition(&mut self, statement: NodeId, ty: Option<NodeId>, name: Symbol) -> Result<NodeId> {
        let Some(type_node) = ty else {
            return Err(InternalError::unexpected_node(statement, "typed VariableDefinition"));
        };
        let declared = self.resolve_type_node(type_node)?;
        self.ast.set_ty(statement, declared.clone());
        self.define_variable(statement, name, declared.clone())?;

        let Some(declared) = declared else {
            return Ok(statement);
        };
        let value = self.default_value(&declared, statement)?;
        let assign = self.ast.alloc(NodeKind::Assign { op: AssignOp::Assign, target: statement, value });
        self.symbols.copy_span(statement, assign)?;
        trace!(variable = %name, ty = %declared, "synthesised default value");
        Ok(assign)
    }

    fn visit_assign(&mut self, statement: NodeId, op: AssignOp, target: NodeId, value: NodeId) -> Result<()> {
        let value_ty = match self.visit_expression(value)? {
            Some(PlampType::Void) => {
                self.report(value, DiagnosticKind::CannotAssignNone)?;
                None
            }
            other => other,
        };

        match self.ast.kind(target).clone() {
            NodeKind::VariableDefinition { ty: Some(type_node), name } => {
                let declared = self.resolve_type_node(type_node)?;
                self.ast.set_ty(target, declared.clone());
                self.define_variable(target, name, declared.clone())?;
                self.check_store(statement, op, value, declared, value_ty)
            }
            NodeKind::Member { name } => self.visit_name_assignment(statement, op, target, name, value, value_ty),
            NodeKind::MemberAccess { .. } | NodeKind::IndexAccess { .. } => {
                let target_ty = self.visit_expression(target)?;
                self.check_store(statement, op, value, target_ty, value_ty)
            }
            _ => Err(InternalError::unexpected_node(target, "assignment target")),
        }
    }

    /// `name := value`: a re-assignment when `name` is visible, otherwise an
    /// implicit declaration
    fn visit_name_assignment(
        &mut self,
        statement: NodeId,
        op: AssignOp,
        target: NodeId,
        name: Symbol,
        value: NodeId,
        value_ty: Option<PlampType>,
    ) -> Result<()> {
        if let Some(variable) = self.scopes.lookup(name) {
            let target_ty = variable.ty.clone();
            self.ast.set_ty(target, target_ty.clone());
            return self.check_store(statement, op, value, target_ty, value_ty);
        }
        if op != AssignOp::Assign {
            return self.report(target, DiagnosticKind::CannotFindMember(name));
        }
        if let Some(earlier) = self.scopes.declared_in_nested(name) {
            self.report_duplicate(earlier, target, name)?;
            self.ast.set_ty(target, value_ty.clone());
            self.scopes.declare(name, Variable { ty: value_ty, node: target, kind: VariableKind::Local });
            return Ok(());
        }

        let ty = value_ty.filter(|ty| *ty != PlampType::Null);
        let type_node = match &ty {
            Some(ty) => Some(self.synthesize_type_ref(ty, target)?),
            None => None,
        };
        let definition = self.ast.alloc(NodeKind::VariableDefinition { ty: type_node, name });
        self.ast.set_ty(definition, ty.clone());
        self.symbols.replace(target, definition)?;
        if !self.ast.replace_child(statement, target, definition) {
            return Err(InternalError::unexpected_node(statement, "Assign"));
        }
        trace!(variable = %name, "implicit declaration");
        self.scopes.declare(name, Variable { ty, node: definition, kind: VariableKind::Local });
        Ok(())
    }

    /// Declare an explicitly typed variable. A name that is already visible,
    /// or was declared in a closed nested block, is a duplicate.
    fn define_variable(&mut self, definition: NodeId, name: Symbol, ty: Option<PlampType>) -> Result<()> {
        let earlier = self
            .scopes
            .lookup(name)
            .map(|variable| variable.node)
            .or_else(|| self.scopes.declared_in_nested(name));
        match earlier {
            Some(earlier) => self.report_duplicate(earlier, definition, name),
            None => {
                self.scopes.declare(name, Variable { ty, node: definition, kind: VariableKind::Local });
                Ok(())
            }
        }
    }

    /// Report both definitions, each at most once however often the name
    /// is redefined
    fn report_duplicate(&mut self, earlier: NodeId, later: NodeId, name: Symbol) -> Result<()> {
        for node in [earlier, later] {
            if self.duplicates.insert(node) {
                self.report(node, DiagnosticKind::DuplicateVariableDefinition(name))?;
            }
        }
        Ok(())
    }

    /// Check storing a value of `value_ty` into a slot of `target_ty`
    fn check_store(
        &mut self,
        statement: NodeId,
        op: AssignOp,
        value: NodeId,
        target_ty: Option<PlampType>,
        value_ty: Option<PlampType>,
    ) -> Result<()> {
        let (Some(target_ty), Some(value_ty)) = (target_ty, value_ty) else {
            return Ok(());
        };

        if let Some(binary) = op.binary() {
            let applicable = match binary.category() {
                OperatorCategory::Arithmetic => target_ty.is_numeric() && value_ty.is_numeric(),
                OperatorCategory::Bitwise => {
                    (target_ty.is_integer() && value_ty.is_integer())
                        || (target_ty == PlampType::Bool && value_ty == PlampType::Bool)
                }
                _ => false,
            };
            if !applicable {
                return self.report(statement, DiagnosticKind::CannotApplyOperator(op.symbol().to_string()));
            }
        }

        match assignability(&value_ty, &target_ty) {
            Assignability::Exact => Ok(()),
            Assignability::Widen => self.insert_cast(statement, value, target_ty).map(drop),
            Assignability::No if op.binary().is_some() => {
                self.report(statement, DiagnosticKind::CannotApplyOperator(op.symbol().to_string()))
            }
            Assignability::No => self.report(
                statement,
                DiagnosticKind::CannotAssign {
                    from: value_ty.to_string(),
                    to: target_ty.to_string(),
                },
            ),
        }
    }

    /// Resolve the type of an expression and store it on the node
    fn visit_expression(&mut self, id: NodeId) -> Result<Option<PlampType>> {
        let ty = match self.ast.kind(id).clone() {
            NodeKind::Literal { value } => Some(value.ty()),
            NodeKind::Member { name } => match self.scopes.lookup(name) {
                Some(variable) => variable.ty.clone(),
                None => {
                    self.report(id, DiagnosticKind::CannotFindMember(name))?;
                    None
                }
            },
            NodeKind::MemberAccess { from, member } => self.visit_member_access(id, from, member)?,
            NodeKind::IndexAccess { target, index } => self.visit_index(id, target, index)?,
            NodeKind::Binary { op, left, right } => self.visit_binary(id, op, left, right)?,
            NodeKind::Unary { op, operand } => self.visit_unary(id, op, operand)?,
            NodeKind::Call { name, args } => self.visit_call(id, name, &args)?,
            NodeKind::ConstructorCall { ty, args } => {
                let constructed = self.resolve_type_node(ty)?;
                for arg in args {
                    self.visit_expression(arg)?;
                }
                constructed
            }
            NodeKind::ArrayInit { element_ty, length } => {
                let element = self.resolve_type_node(element_ty)?;
                let length_ty = self.visit_expression(length)?;
                self.check_integer_index(id, length, length_ty)?;
                element.map(|element| PlampType::array_of(element, 1))
            }
            NodeKind::Cast { to, inner, .. } => self.visit_cast(id, to, inner)?,
            _ => return Err(InternalError::unexpected_node(id, "expression")),
        };
        self.ast.set_ty(id, ty.clone());
        Ok(ty)
    }

    fn visit_member_access(&mut self, id: NodeId, from: NodeId, member: Symbol) -> Result<Option<PlampType>> {
        let Some(owner) = self.visit_expression(from)? else {
            return Ok(None);
        };
        if member.as_str() == "length" && matches!(owner, PlampType::String | PlampType::Array { .. }) {
            return Ok(Some(PlampType::Int));
        }
        match self.externals.resolve_member(&owner, member) {
            Some(ty) => Ok(Some(ty)),
            None => {
                self.report(id, DiagnosticKind::CannotFindMember(member))?;
                Ok(None)
            }
        }
    }

    fn visit_index(&mut self, id: NodeId, target: NodeId, index: NodeId) -> Result<Option<PlampType>> {
        let target_ty = self.visit_expression(target)?;
        let index_ty = self.visit_expression(index)?;
        self.check_integer_index(id, index, index_ty)?;

        match target_ty {
            None => Ok(None),
            Some(PlampType::Array { element, rank: 1 }) => Ok(Some(*element)),
            Some(PlampType::Array { .. }) => {
                self.report(id, DiagnosticKind::MultiDimensionalIndexer)?;
                Ok(None)
            }
            Some(other) => {
                self.report(target, DiagnosticKind::IndexerIsNotApplicable(other.to_string()))?;
                Ok(None)
            }
        }
    }

    /// An index or array length must be an `int`, possibly after widening
    fn check_integer_index(&mut self, parent: NodeId, index: NodeId, ty: Option<PlampType>) -> Result<()> {
        match ty {
            None | Some(PlampType::Int) => Ok(()),
            Some(ty) if widens_to(&ty, &PlampType::Int) => self.insert_cast(parent, index, PlampType::Int).map(drop),
            Some(_) => self.report(index, DiagnosticKind::IndexerValueMustBeInteger),
        }
    }

    fn visit_binary(&mut self, id: NodeId, op: BinaryOp, left: NodeId, right: NodeId) -> Result<Option<PlampType>> {
        let left_ty = self.visit_expression(left)?;
        let right_ty = self.visit_expression(right)?;
        let reject = |this: &mut Self| this.report(id, DiagnosticKind::CannotApplyOperator(op.symbol().to_string()));

        match op.category() {
            OperatorCategory::Arithmetic => {
                let (Some(l), Some(r)) = (left_ty, right_ty) else {
                    return Ok(None);
                };
                if !l.is_numeric() || !r.is_numeric() {
                    reject(self)?;
                    return Ok(None);
                }
                self.unify_operands(id, op, left, right, &l, &r)
            }
            OperatorCategory::Comparison => {
                if let (Some(l), Some(r)) = (left_ty, right_ty) {
                    if l.is_numeric() && r.is_numeric() {
                        self.unify_operands(id, op, left, right, &l, &r)?;
                    } else {
                        reject(self)?;
                    }
                }
                Ok(Some(PlampType::Bool))
            }
            OperatorCategory::Equality => {
                if let (Some(l), Some(r)) = (left_ty, right_ty) {
                    let null_check = (l == PlampType::Null && r.is_nullable()) || (r == PlampType::Null && l.is_nullable());
                    if l == PlampType::Void || r == PlampType::Void {
                        reject(self)?;
                    } else if l.is_numeric() && r.is_numeric() {
                        self.unify_operands(id, op, left, right, &l, &r)?;
                    } else if l != r && !null_check {
                        reject(self)?;
                    }
                }
                Ok(Some(PlampType::Bool))
            }
            OperatorCategory::Logical => {
                let not_bool = |ty: &Option<PlampType>| ty.as_ref().is_some_and(|ty| *ty != PlampType::Bool);
                if not_bool(&left_ty) || not_bool(&right_ty) {
                    reject(self)?;
                }
                Ok(Some(PlampType::Bool))
            }
            OperatorCategory::Bitwise => {
                let (Some(l), Some(r)) = (left_ty, right_ty) else {
                    return Ok(None);
                };
                if l == PlampType::Bool && r == PlampType::Bool {
                    Ok(Some(PlampType::Bool))
                } else if l.is_integer() && r.is_integer() {
                    self.unify_operands(id, op, left, right, &l, &r)
                } else {
                    reject(self)?;
                    Ok(None)
                }
            }
        }
    }

    /// Widen one operand into the other's type when the two differ
    fn unify_operands(
        &mut self,
        id: NodeId,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        left_ty: &PlampType,
        right_ty: &PlampType,
    ) -> Result<Option<PlampType>> {
        match promote(left_ty, right_ty) {
            Promotion::Same => Ok(Some(left_ty.clone())),
            Promotion::CastLeft(ty) => {
                self.insert_cast(id, left, ty.clone())?;
                Ok(Some(ty))
            }
            Promotion::CastRight(ty) => {
                self.insert_cast(id, right, ty.clone())?;
                Ok(Some(ty))
            }
            Promotion::Incompatible => {
                self.report(id, DiagnosticKind::CannotApplyOperator(op.symbol().to_string()))?;
                Ok(None)
            }
        }
    }

    fn visit_unary(&mut self, id: NodeId, op: UnaryOp, operand: NodeId) -> Result<Option<PlampType>> {
        let operand_ty = self.visit_expression(operand)?;
        let reject = DiagnosticKind::CannotApplyOperator(op.symbol().to_string());
        match (op, operand_ty) {
            (UnaryOp::Not, Some(ty)) if ty != PlampType::Bool => {
                self.report(id, reject)?;
                Ok(Some(PlampType::Bool))
            }
            (UnaryOp::Not, _) => Ok(Some(PlampType::Bool)),
            (_, Some(ty)) if ty.is_numeric() => Ok(Some(ty)),
            (_, Some(_)) => {
                self.report(id, reject)?;
                Ok(None)
            }
            (_, None) => Ok(None),
        }
    }

    /// Resolve a call against module functions, then intrinsics, then the
    /// host. Arguments are visited first so their own errors surface.
    fn visit_call(&mut self, id: NodeId, name: Symbol, args: &[NodeId]) -> Result<Option<PlampType>> {
        let reported_before = self.diagnostics.len();
        let mut arg_types = Vec::with_capacity(args.len());
        for &arg in args {
            arg_types.push(self.visit_expression(arg)?);
        }
        let args_reported = self.diagnostics.len() > reported_before;

        let candidates = match self.functions.get(&name) {
            Some(signatures) => signatures.clone(),
            None => match self.intrinsics.get(&name) {
                Some(signature) => vec![signature.clone()],
                None => self.externals.resolve_function(name),
            },
        };
        if let Some(signature) = candidates.iter().find(|s| s.accepts(&arg_types)) {
            return Ok(signature.return_type.clone());
        }

        let arity_matches = candidates.iter().any(|s| s.params.len() == args.len());
        let suppressed = arity_matches && (args_reported || arg_types.iter().any(Option::is_none));
        if !suppressed {
            self.report(id, DiagnosticKind::UnknownFunction(name))?;
        }
        Ok(None)
    }

    fn visit_cast(&mut self, id: NodeId, to: NodeId, inner: NodeId) -> Result<Option<PlampType>> {
        let target = self.resolve_type_node(to)?;
        let inner_ty = self.visit_expression(inner)?;
        if let NodeKind::Cast { from, .. } = self.ast.kind_mut(id) {
            *from = inner_ty.clone();
        }
        if let (Some(from), Some(to)) = (&inner_ty, &target) {
            if !can_cast(from, to) {
                self.report(
                    id,
                    DiagnosticKind::CannotCast {
                        from: from.to_string(),
                        to: to.to_string(),
                    },
                )?;
            }
        }
        Ok(target)
    }

    /// Resolve a written type: built in, then the host
    fn resolve_type_node(&mut self, node: NodeId) -> Result<Option<PlampType>> {
        let (name, dims) = match self.ast.kind(node) {
            NodeKind::TypeRef { name, dims } => (*name, dims.clone()),
            _ => return Err(InternalError::unexpected_node(node, "TypeRef")),
        };
        let base = PlampType::builtin(name.as_str()).or_else(|| self.externals.resolve_type(name));
        let Some(mut ty) = base else {
            self.report(node, DiagnosticKind::TypeNotFound(name))?;
            return Ok(None);
        };
        for rank in dims {
            ty = PlampType::array_of(ty, rank);
        }
        self.ast.set_ty(node, Some(ty.clone()));
        Ok(Some(ty))
    }

    /// A `TypeRef` spelling `ty`, spanning the same source as `origin`
    fn synthesize_type_ref(&mut self, ty: &PlampType, origin: NodeId) -> Result<NodeId> {
        let mut dims = Vec::new();
        let mut base = ty;
        while let PlampType::Array { element, rank } = base {
            dims.push(*rank);
            base = element.as_ref();
        }
        dims.reverse();

        let node = self.ast.alloc(NodeKind::TypeRef { name: Symbol::intern(&base.to_string()), dims });
        self.ast.set_ty(node, Some(ty.clone()));
        self.symbols.copy_span(origin, node)?;
        Ok(node)
    }

    /// The value a variable of type `ty` starts with
    fn default_value(&mut self, ty: &PlampType, origin: NodeId) -> Result<NodeId> {
        let node = match (LiteralValue::zero_of(ty), ty) {
            (Some(zero), _) => self.ast.alloc(NodeKind::Literal { value: zero }),
            (None, PlampType::Named(_)) => {
                let type_node = self.synthesize_type_ref(ty, origin)?;
                let call = self.ast.alloc(NodeKind::ConstructorCall { ty: type_node, args: Vec::new() });
                self.ast.set_ty(call, Some(ty.clone()));
                call
            }
            (None, _) => self.ast.alloc(NodeKind::Literal { value: LiteralValue::Null }),
        };
        self.symbols.copy_span(origin, node)?;
        Ok(node)
    }

    /// Wrap `child` of `parent` in a widening cast to `to`
    fn insert_cast(&mut self, parent: NodeId, child: NodeId, to: PlampType) -> Result<NodeId> {
        let from = self.ast.ty(child).cloned();
        let type_node = self.synthesize_type_ref(&to, child)?;
        let cast = self.ast.alloc(NodeKind::Cast { to: type_node, inner: child, from });
        self.symbols.copy_span(child, cast)?;
        if !self.ast.replace_child(parent, child, cast) {
            return Err(InternalError::unexpected_node(parent, "parent of the widened operand"));
        }
        trace!(to = %to, "inserted widening cast");
        self.ast.set_ty(cast, Some(to));
        Ok(cast)
    }
}
