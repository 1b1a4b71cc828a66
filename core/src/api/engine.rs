//! The fuzzex compilation engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use super::{ComputedExpression, EngineOptions, Error};
use crate::ast::Node;
use crate::compiler::{self, CompileError, Mode};
use crate::params::{ParameterRegistry, ParameterTable};
use crate::syntax::extract_constants;
use crate::values::{Formatters, ValueFormatter, ValueType};
use crate::{analyzer, parser};

type CacheSlot = Arc<OnceCell<Arc<ComputedExpression>>>;

/// The fuzzex compilation engine.
///
/// The engine manages:
/// - Compilation options (literal delimiters, nesting limit)
/// - The formatter chain used for string coercion
/// - A cache of computed expressions keyed by source text
///
/// The engine is `Send + Sync`; [`Engine::interpret`] may be called from
/// any number of threads and compiles each distinct text at most once.
///
/// # Example
///
/// ```
/// use fuzzex_core::api::{Engine, EngineOptions};
/// use fuzzex_core::evaluator::Argument;
/// use fuzzex_core::values::Value;
///
/// let engine = Engine::new(EngineOptions::default()).unwrap();
/// let expr = engine.interpret("price * (1 + rate)").unwrap();
/// assert_eq!(expr.parameters(), vec!["price", "rate"]);
///
/// let result = expr.evaluate(&[Argument::value(200i64), Argument::value(0.5)]).unwrap();
/// assert_eq!(result, Value::float(300.0));
/// ```
pub struct Engine {
    options: EngineOptions,
    formatters: Formatters,
    cache: DashMap<String, CacheSlot>,
    compilations: AtomicUsize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_valid_options(EngineOptions::default())
    }
}

impl Engine {
    /// Create an engine, rejecting options the compiler cannot work with.
    pub fn new(options: EngineOptions) -> Result<Self, Error> {
        options.default_compilation_options.validate()?;
        Ok(Self::with_valid_options(options))
    }

    fn with_valid_options(options: EngineOptions) -> Self {
        Self {
            options,
            formatters: Formatters::new(),
            cache: DashMap::new(),
            compilations: AtomicUsize::new(0),
        }
    }

    /// Append a formatter to the chain used when values are coerced to
    /// strings. Cached expressions are dropped since they captured the old
    /// chain.
    pub fn with_formatter(mut self, formatter: impl ValueFormatter + 'static) -> Self {
        self.formatters.push(Arc::new(formatter));
        self.cache.clear();
        self
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn formatters(&self) -> &Formatters {
        &self.formatters
    }

    /// Compile `source`, or return the expression compiled earlier from the
    /// same text.
    ///
    /// Concurrent callers with the same text wait for a single compilation.
    /// Failures are not cached: the next call compiles again.
    pub fn interpret(&self, source: &str) -> Result<Arc<ComputedExpression>, Error> {
        if let Some(expr) = self.cache.get(source).and_then(|slot| slot.value().get().cloned()) {
            trace!(source, "Expression cache hit");
            return Ok(expr);
        }

        // Hold the shard lock only long enough to get the slot.
        let slot: CacheSlot = self.cache.entry(source.to_string()).or_default().value().clone();
        let result = slot.get_or_try_init(|| self.compile(source).map(Arc::new));
        match result {
            Ok(expr) => Ok(expr.clone()),
            Err(err) => {
                self.cache.remove_if(source, |_, slot| slot.get().is_none());
                Err(err)
            }
        }
    }

    /// Compile `source` without consulting or filling the cache.
    pub fn compile(&self, source: &str) -> Result<ComputedExpression, Error> {
        self.compile_with_registry(source, ParameterRegistry::new())
    }

    /// Compile `source` with parameters of an earlier expression already
    /// known: they keep their order and types, and new parameters follow.
    pub fn compile_seeded(
        &self,
        source: &str,
        seed: &ParameterTable,
    ) -> Result<ComputedExpression, Error> {
        self.compile_with_registry(source, ParameterRegistry::seeded(seed))
    }

    fn compile_with_registry(
        &self,
        source: &str,
        registry: ParameterRegistry,
    ) -> Result<ComputedExpression, Error> {
        let options = &self.options.default_compilation_options;
        let extracted = extract_constants(source, options.delimiter, options.escape);

        let expr = parser::parse_with_max_depth(&extracted.text, options.max_depth)
            .map_err(|err| err.relocate(source, |span| extracted.original_span(span)))?;

        let analysis = analyzer::analyze(&expr, &extracted, source, registry, &self.formatters)?;

        let generate = |mode| {
            compiler::generate(&analysis.root, mode, &self.formatters, &analysis.parameters)
                .map_err(|err| Error::compilation(err.to_diagnostic(), source))
        };
        let exact = generate(Mode::Exact)?;
        let tolerant = generate(Mode::Tolerant)?;
        let return_type = result_type(&analysis.root, source)?;

        self.compilations.fetch_add(1, Ordering::Relaxed);
        debug!(
            source,
            parameters = analysis.parameters.len(),
            constants = extracted.constants.len(),
            result = %return_type,
            "Compiled expression"
        );

        Ok(ComputedExpression::new(
            source.to_string(),
            exact,
            tolerant,
            analysis.parameters,
            return_type,
            self.options.default_execution_options.clone(),
        ))
    }

    /// Number of cached expressions.
    pub fn len(&self) -> usize {
        self.cache
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an expression for `source` is cached.
    pub fn contains(&self, source: &str) -> bool {
        self.cache
            .get(source)
            .is_some_and(|slot| slot.value().get().is_some())
    }

    /// Number of successful compilations, cached or not.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    /// Drop every cached expression. Expressions handed out earlier stay valid.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

fn result_type(root: &Node, source: &str) -> Result<ValueType, Error> {
    root.value_type().ok_or_else(|| {
        let err = CompileError::Unresolved {
            span: root.span.clone(),
        };
        Error::compilation(err.to_diagnostic(), source)
    })
}
