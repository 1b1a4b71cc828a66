use crate::api::RelatedInfo;
use crate::parser::Span;

/// Context information for error messages.
///
/// Provides additional information about where an error occurred, such as
/// "parameter first used here". Each context entry can
/// be converted to a RelatedInfo for diagnostic display.
#[derive(Debug, Clone, PartialEq)]
pub enum Context {
    /// Where something was first used
    DefinedHere { what: String, span: Span },
    /// Where a type was chosen by default
    InferredHere { type_name: String, span: Span },
}

impl Context {
    pub fn span(&self) -> &Span {
        match self {
            Context::DefinedHere { span, .. } | Context::InferredHere { span, .. } => span,
        }
    }

    /// Convert to a RelatedInfo for diagnostic display
    pub fn to_related_info(&self) -> RelatedInfo {
        let message = match self {
            Context::DefinedHere { what, .. } => format!("{} first used here", what),
            Context::InferredHere { type_name, .. } => {
                format!("type '{}' assumed here", type_name)
            }
        };
        RelatedInfo {
            span: self.span().clone(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_related_info() {
        let ctx = Context::DefinedHere {
            what: "parameter 'x'".to_string(),
            span: Span::new(3, 4),
        };
        let info = ctx.to_related_info();
        assert_eq!(info.span, Span::new(3, 4));
        assert_eq!(info.message, "parameter 'x' first used here");
    }
}
