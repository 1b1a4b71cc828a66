//! Typed expression nodes and the type-determination protocol.
//!
//! Every node carries the set of value types it may still produce. A node
//! starts with every result its overloads allow and only ever narrows:
//!
//! - [`Node::determine_weakly`] intersects the node's set with an allowed set
//!   and, if anything changed, settles the node against its operands.
//! - [`Node::determine_strongly`] pins the node to one type.
//!
//! Settling an operator keeps only the overloads consistent with the node's
//! own set and its operands' sets, then pushes the projected argument sets
//! down into the operands. Narrowing a parameter node narrows the shared
//! entry in the [`ParameterRegistry`], so other uses of the same parameter
//! pick the change up the next time they are refined.

use crate::analyzer::TypeErrorKind;
use crate::ast::signature::{self, Overload};
use crate::params::ParameterRegistry;
use crate::parser::{BinaryOp, BoolOp, ComparisonOp, ShiftOp, Span};
use crate::stdlib::Builtin;
use crate::values::{TypeSet, Value, ValueType};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    /// Types this node may still produce.
    pub types: TypeSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Constant(Value),
    /// A free variable. Producers are invoked at every point of use.
    Parameter { name: String, producer: bool },
    Negate(Box<Node>),
    Arithmetic {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Logical {
        op: BoolOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Shift {
        op: ShiftOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Comparison {
        op: ComparisonOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Call {
        function: &'static Builtin,
        args: Vec<Node>,
    },
}

/// Union of the result types of `overloads`.
fn results<'a>(overloads: impl Iterator<Item = &'a Overload>) -> TypeSet {
    overloads.fold(TypeSet::empty(), |set, o| set | TypeSet::from(o.result))
}

/// A type set as it reads in error messages: the bare type name when only
/// one is left.
fn describe(set: TypeSet) -> String {
    match set.single() {
        Some(ty) => ty.to_string(),
        None => set.to_string(),
    }
}

impl Node {
    pub fn constant(value: Value, span: Span) -> Self {
        let types = TypeSet::from(value.value_type());
        Self {
            kind: NodeKind::Constant(value),
            span,
            types,
        }
    }

    /// A parameter reference; `types` is the registry's current view.
    pub fn parameter(name: impl Into<String>, producer: bool, types: TypeSet, span: Span) -> Self {
        Self {
            kind: NodeKind::Parameter {
                name: name.into(),
                producer,
            },
            span,
            types,
        }
    }

    /// An operator or call node, open to every result its overloads allow.
    pub fn operator(kind: NodeKind, span: Span) -> Self {
        let mut node = Self {
            kind,
            span,
            types: TypeSet::empty(),
        };
        node.types = node
            .overloads()
            .map(|overloads| results(overloads.iter()))
            .unwrap_or(TypeSet::empty());
        node
    }

    pub fn negate(operand: Node, span: Span) -> Self {
        Self::operator(NodeKind::Negate(Box::new(operand)), span)
    }

    pub fn call(function: &'static Builtin, args: Vec<Node>, span: Span) -> Self {
        Self::operator(NodeKind::Call { function, args }, span)
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.types.single()
    }

    pub fn is_resolved(&self) -> bool {
        self.value_type().is_some()
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Constant(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.as_constant().is_some()
    }

    /// Overloads of operator and call nodes; `None` for leaves.
    pub fn overloads(&self) -> Option<&'static [Overload]> {
        match &self.kind {
            NodeKind::Constant(_) | NodeKind::Parameter { .. } => None,
            NodeKind::Negate(_) => Some(signature::NEGATE),
            NodeKind::Arithmetic { op, .. } => Some(signature::arithmetic(*op)),
            NodeKind::Logical { op, .. } => Some(signature::logical(*op)),
            NodeKind::Shift { .. } => Some(signature::SHIFT),
            NodeKind::Comparison { op, .. } => Some(signature::comparison(*op)),
            NodeKind::Call { function, .. } => Some(function.overloads),
        }
    }

    /// How the operator is named in error messages.
    pub fn operator_name(&self) -> String {
        match &self.kind {
            NodeKind::Negate(_) => "operator '-'".to_string(),
            NodeKind::Arithmetic { op, .. } => format!("operator '{}'", op),
            NodeKind::Logical { op, .. } => format!("operator '{}'", op),
            NodeKind::Shift { op, .. } => format!("operator '{}'", op),
            NodeKind::Comparison { op, .. } => format!("operator '{}'", op),
            NodeKind::Call { function, .. } => format!("function '{}'", function.name),
            NodeKind::Constant(_) => "constant".to_string(),
            NodeKind::Parameter { name, .. } => format!("parameter '{}'", name),
        }
    }

    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Constant(_) | NodeKind::Parameter { .. } => Vec::new(),
            NodeKind::Negate(operand) => vec![operand.as_ref()],
            NodeKind::Arithmetic { left, right, .. }
            | NodeKind::Logical { left, right, .. }
            | NodeKind::Shift { left, right, .. }
            | NodeKind::Comparison { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            NodeKind::Call { args, .. } => args.iter().collect(),
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        match &mut self.kind {
            NodeKind::Constant(_) | NodeKind::Parameter { .. } => Vec::new(),
            NodeKind::Negate(operand) => vec![operand.as_mut()],
            NodeKind::Arithmetic { left, right, .. }
            | NodeKind::Logical { left, right, .. }
            | NodeKind::Shift { left, right, .. }
            | NodeKind::Comparison { left, right, .. } => vec![left.as_mut(), right.as_mut()],
            NodeKind::Call { args, .. } => args.iter_mut().collect(),
        }
    }

    /// Restrict the node to `allowed`. Returns whether anything changed.
    pub fn determine_weakly(
        &mut self,
        allowed: TypeSet,
        registry: &mut ParameterRegistry,
    ) -> Result<bool, TypeErrorKind> {
        let narrowed = self.types & allowed;
        if narrowed.is_empty() {
            return Err(self.conflict(allowed));
        }
        if narrowed == self.types {
            return Ok(false);
        }
        self.types = narrowed;
        self.settle(registry)?;
        Ok(true)
    }

    /// Pin the node to `ty`, which it must still be able to produce.
    pub fn determine_strongly(
        &mut self,
        ty: ValueType,
        registry: &mut ParameterRegistry,
    ) -> Result<bool, TypeErrorKind> {
        if !self.types.has(ty) {
            return Err(self.conflict(ty.into()));
        }
        self.determine_weakly(ty.into(), registry)
    }

    /// Re-propagate the whole subtree, children first. Returns whether
    /// anything changed.
    pub fn refine(&mut self, registry: &mut ParameterRegistry) -> Result<bool, TypeErrorKind> {
        let mut changed = false;
        for child in self.children_mut() {
            changed |= child.refine(registry)?;
        }
        changed |= self.settle(registry)?;
        Ok(changed)
    }

    /// Make the node consistent with its operands (or, for a parameter, with
    /// the registry), to a fixpoint.
    pub fn settle(&mut self, registry: &mut ParameterRegistry) -> Result<bool, TypeErrorKind> {
        if let NodeKind::Parameter { name, .. } = &self.kind {
            let types = registry
                .narrow(name, self.types)
                .map_err(|err| TypeErrorKind::from_parameter(err, self.span.clone()))?;
            let changed = types != self.types;
            self.types = types;
            return Ok(changed);
        }
        let mut changed = false;
        while self.settle_operator(registry)? {
            changed = true;
        }
        Ok(changed)
    }

    fn settle_operator(&mut self, registry: &mut ParameterRegistry) -> Result<bool, TypeErrorKind> {
        let Some(overloads) = self.overloads() else {
            return Ok(false);
        };
        let operands: Vec<TypeSet> = self.children().iter().map(|c| c.types).collect();
        let matches_operands = |o: &&Overload| {
            o.args.len() == operands.len()
                && o.args.iter().zip(&operands).all(|(ty, set)| set.has(*ty))
        };
        let viable: Vec<&Overload> = overloads
            .iter()
            .filter(matches_operands)
            .filter(|o| self.types.has(o.result))
            .collect();

        if viable.is_empty() {
            let produces = results(overloads.iter().filter(matches_operands));
            return Err(self.mismatch(&operands, produces));
        }

        let mut changed = false;
        let types = results(viable.iter().copied());
        if types != self.types {
            self.types = types;
            changed = true;
        }
        for (position, child) in self.children_mut().into_iter().enumerate() {
            let projected = viable
                .iter()
                .fold(TypeSet::empty(), |set, o| set | TypeSet::from(o.args[position]));
            changed |= child.determine_weakly(projected, registry)?;
        }
        Ok(changed)
    }

    fn conflict(&self, allowed: TypeSet) -> TypeErrorKind {
        match &self.kind {
            NodeKind::Parameter { name, .. } => TypeErrorKind::NotLogicallyValid {
                message: format!(
                    "parameter '{}' would have to be {} but is already {}",
                    name,
                    describe(allowed),
                    describe(self.types)
                ),
                span: self.span.clone(),
                parameter: Some(name.clone()),
            },
            NodeKind::Constant(value) => TypeErrorKind::not_logically_valid(
                format!(
                    "expected {}, found a {} constant",
                    describe(allowed),
                    value.value_type()
                ),
                self.span.clone(),
            ),
            _ => TypeErrorKind::not_logically_valid(
                format!(
                    "{} produces {} where {} is required",
                    self.operator_name(),
                    describe(self.types),
                    describe(allowed)
                ),
                self.span.clone(),
            ),
        }
    }

    fn mismatch(&self, operands: &[TypeSet], produces: TypeSet) -> TypeErrorKind {
        if !produces.is_empty() {
            let message = format!(
                "{} produces {} where {} is required",
                self.operator_name(),
                describe(produces),
                describe(self.types)
            );
            return TypeErrorKind::not_logically_valid(message, self.span.clone());
        }
        let described: Vec<String> = operands.iter().map(|set| describe(*set)).collect();
        // Blame the first parameter operand, if any.
        let parameter = self.children().into_iter().find_map(|child| match &child.kind {
            NodeKind::Parameter { name, .. } => Some(name.clone()),
            _ => None,
        });
        TypeErrorKind::NotLogicallyValid {
            message: format!(
                "{} cannot be applied to {}",
                self.operator_name(),
                described.join(" and ")
            ),
            span: self.span.clone(),
            parameter,
        }
    }
}
