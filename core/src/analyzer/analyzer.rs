use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::analyzer::{TypeError, TypeErrorKind};
use crate::ast::{Node, NodeKind, simplify};
use crate::diagnostics::context::Context;
use crate::params::{FloatPreference, ParameterRegistry, ParameterTable};
use crate::parser::{Expr, ExprKind, Literal, Span, UnaryOp};
use crate::stdlib;
use crate::syntax::Extracted;
use crate::values::{Formatters, TypeSet, Value, ValueType};

/// A fully typed, simplified expression and its frozen parameters.
#[derive(Debug)]
pub struct Analysis {
    pub root: Node,
    pub parameters: ParameterTable,
}

/// Build the typed tree for `expr`.
///
/// `expr` was parsed from `extracted.text`; node spans and errors are
/// reported against `source`, the text before literal extraction. New
/// parameters are added to `registry` in order of first appearance.
pub fn analyze(
    expr: &Expr,
    extracted: &Extracted,
    source: &str,
    registry: ParameterRegistry,
    formatters: &Formatters,
) -> Result<Analysis, TypeError> {
    let mut analyzer = Analyzer {
        extracted,
        source,
        formatters,
        registry,
        first_use: HashMap::new(),
    };
    let mut root = analyzer.build(expr).map_err(|kind| analyzer.error(kind))?;
    analyzer.resolve(&mut root)?;
    analyzer
        .assign_preferences(&root)
        .map_err(|kind| analyzer.error(kind))?;

    let Analyzer {
        registry,
        first_use,
        ..
    } = analyzer;
    let parameters = registry.finalize().map_err(|err| {
        let span = first_use.get(err.name()).cloned().unwrap_or_default();
        TypeError::new(TypeErrorKind::from_parameter(err, span), source.to_string())
    })?;
    debug!(
        parameters = parameters.len(),
        result = ?root.value_type(),
        "Analyzed expression"
    );
    Ok(Analysis { root, parameters })
}

struct Analyzer<'a> {
    extracted: &'a Extracted,
    source: &'a str,
    formatters: &'a Formatters,
    registry: ParameterRegistry,
    first_use: HashMap<String, Span>,
}

impl<'a> Analyzer<'a> {
    fn error(&self, kind: TypeErrorKind) -> TypeError {
        let defined_here = match &kind {
            TypeErrorKind::NotLogicallyValid {
                parameter: Some(name),
                span,
                ..
            } => self
                .first_use
                .get(name)
                .filter(|first| *first != span)
                .map(|first| Context::DefinedHere {
                    what: format!("parameter '{}'", name),
                    span: first.clone(),
                }),
            _ => None,
        };
        let error = TypeError::new(kind, self.source.to_string());
        match defined_here {
            Some(context) => error.with_context(context),
            None => error,
        }
    }

    /// Build bottom-up: each node is settled against its operands and then
    /// simplified before its parent is built.
    fn build(&mut self, expr: &Expr) -> Result<Node, TypeErrorKind> {
        let span = self.extracted.original_span(&expr.span);
        let node = match &expr.kind {
            ExprKind::Literal(literal) => {
                let value = match literal {
                    Literal::Int(i) => Value::int(*i),
                    Literal::Float(f) => Value::float(*f),
                    Literal::Bool(b) => Value::Bool(*b),
                };
                return Ok(Node::constant(value, span));
            }
            ExprKind::Ident(name) => {
                if let Some(constant) = self.extracted.constant_at(&expr.span) {
                    return Ok(Node::constant(constant.value.clone(), span));
                }
                return self.parameter(name, false, span);
            }
            ExprKind::Unary {
                op: UnaryOp::Neg,
                expr,
            } => Node::negate(self.build(expr)?, span),
            ExprKind::Binary { op, left, right } => {
                let (left, right) = self.operands(left, right)?;
                Node::operator(NodeKind::Arithmetic { op: *op, left, right }, span)
            }
            ExprKind::Boolean { op, left, right } => {
                let (left, right) = self.operands(left, right)?;
                Node::operator(NodeKind::Logical { op: *op, left, right }, span)
            }
            ExprKind::Shift { op, left, right } => {
                let (left, right) = self.operands(left, right)?;
                Node::operator(NodeKind::Shift { op: *op, left, right }, span)
            }
            ExprKind::Comparison { op, left, right } => {
                let (left, right) = self.operands(left, right)?;
                Node::operator(NodeKind::Comparison { op: *op, left, right }, span)
            }
            ExprKind::Call { name, args } => match stdlib::lookup(name) {
                Some(function) => {
                    if !function.accepts_arity(args.len()) {
                        return Err(TypeErrorKind::ArityMismatch {
                            name: name.clone(),
                            expected: function.arity_description(),
                            found: args.len(),
                            span,
                        });
                    }
                    let args = args
                        .iter()
                        .map(|arg| self.build(arg))
                        .collect::<Result<Vec<_>, _>>()?;
                    Node::call(function, args, span)
                }
                None if args.is_empty() => return self.parameter(name, true, span),
                None => {
                    return Err(TypeErrorKind::UnknownFunction {
                        name: name.clone(),
                        span,
                    });
                }
            },
        };
        self.finish(node)
    }

    fn operands(&mut self, left: &Expr, right: &Expr) -> Result<(Box<Node>, Box<Node>), TypeErrorKind> {
        Ok((Box::new(self.build(left)?), Box::new(self.build(right)?)))
    }

    fn finish(&mut self, mut node: Node) -> Result<Node, TypeErrorKind> {
        node.settle(&mut self.registry)?;
        simplify(node, self.formatters)
    }

    fn parameter(&mut self, name: &str, producer: bool, span: Span) -> Result<Node, TypeErrorKind> {
        let types = self.registry.advertise(name).types();
        self.registry
            .mark_producer(name, producer)
            .map_err(|err| TypeErrorKind::from_parameter(err, span.clone()))?;
        self.first_use
            .entry_ref(name)
            .or_insert_with(|| span.clone());
        Ok(Node::parameter(name, producer, types, span))
    }

    /// Propagate to a fixpoint, then give the lowest-order ambiguous
    /// parameter its default type, until every parameter is resolved.
    fn resolve(&mut self, root: &mut Node) -> Result<(), TypeError> {
        loop {
            while root
                .refine(&mut self.registry)
                .map_err(|kind| self.error(kind))?
            {}

            let Some(context) = self.registry.first_unresolved() else {
                break;
            };
            let name = context.name().to_string();
            let logical = first_use_is_logical_operand(root, &name).unwrap_or(false);
            let ty = default_type(context.types(), logical);
            trace!(parameter = %name, default = %ty, "Defaulting parameter type");

            let forced = match find_parameter(root, &name) {
                Some(node) => node.determine_strongly(ty, &mut self.registry).map(|_| ()),
                None => self
                    .registry
                    .force(&name, ty)
                    .map_err(|err| TypeErrorKind::from_parameter(err, Span::default())),
            };
            forced.map_err(|kind| {
                let mut error = self.error(kind);
                if let Some(first) = self.first_use.get(&name) {
                    error = error.with_context(Context::InferredHere {
                        type_name: ty.to_string(),
                        span: first.clone(),
                    });
                }
                error
            })?;
        }

        if !root.is_resolved() {
            let kind = TypeErrorKind::not_logically_valid(
                format!("the expression could be any of {}", root.types),
                root.span.clone(),
            );
            return Err(self.error(kind));
        }
        Ok(())
    }

    /// Record how numeric parameters want their arguments represented:
    /// floating-point builtins prefer floats, shifts and bitwise operators
    /// prefer integers.
    fn assign_preferences(&mut self, node: &Node) -> Result<(), TypeErrorKind> {
        match &node.kind {
            NodeKind::Call { function, args } if function.preference != FloatPreference::Unset => {
                for arg in args {
                    self.prefer(arg, function.preference)?;
                }
            }
            NodeKind::Shift { left, right, .. } => {
                self.prefer(left, FloatPreference::Integer)?;
                self.prefer(right, FloatPreference::Integer)?;
            }
            NodeKind::Logical { left, right, .. }
                if node.value_type() == Some(ValueType::Numeric) =>
            {
                self.prefer(left, FloatPreference::Integer)?;
                self.prefer(right, FloatPreference::Integer)?;
            }
            _ => {}
        }
        for child in node.children() {
            self.assign_preferences(child)?;
        }
        Ok(())
    }

    fn prefer(&mut self, node: &Node, preference: FloatPreference) -> Result<(), TypeErrorKind> {
        match &node.kind {
            NodeKind::Parameter { name, .. } if node.value_type() == Some(ValueType::Numeric) => self
                .registry
                .prefer(name, preference)
                .map_err(|err| TypeErrorKind::from_parameter(err, node.span.clone())),
            _ => Ok(()),
        }
    }
}

/// Boolean for a direct operand of `&` or `|` that may be one. Otherwise
/// Numeric if allowed, else String, Boolean, ByteSequence.
fn default_type(types: TypeSet, logical_operand: bool) -> ValueType {
    if logical_operand && types.has(ValueType::Boolean) {
        return ValueType::Boolean;
    }
    types.types().next().unwrap_or(ValueType::Numeric)
}

/// Whether the first reference to parameter `name` is a direct operand of
/// `&` or `|`. `None` if the tree does not reference it.
fn first_use_is_logical_operand(node: &Node, name: &str) -> Option<bool> {
    node.children().into_iter().find_map(|child| match &child.kind {
        NodeKind::Parameter { name: n, .. } if n == name => {
            Some(matches!(node.kind, NodeKind::Logical { .. }))
        }
        _ => first_use_is_logical_operand(child, name),
    })
}

/// The first reference to parameter `name`, in evaluation order.
fn find_parameter<'n>(node: &'n mut Node, name: &str) -> Option<&'n mut Node> {
    if matches!(&node.kind, NodeKind::Parameter { name: n, .. } if n == name) {
        return Some(node);
    }
    node.children_mut()
        .into_iter()
        .find_map(|child| find_parameter(child, name))
}
