//! Origin tags for nodes and declarations.
//!
//! An origin records *why* a node exists: user-written code carries no
//! expression origin, while lowering passes tag the nodes they synthesize
//! so later passes and diagnostics can tell them apart.

/// Why an expression node exists.
///
/// Absent (`None` in the arena) for nodes that directly mirror source
/// syntax.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeOrigin {
    /// Desugared compound assignment (`a += b` and friends).
    CompoundAssign,
    /// Node produced by for-loop desugaring (iterator protocol calls).
    ForLoopDesugar,
    /// Node produced by safe-navigation desugaring.
    SafeNavigation,
    /// Closure conversion artifact.
    Lambda,
    /// Default-argument stub call.
    DefaultArgument,
    /// Node synthesized by the coroutine state-machine pass.
    StateMachine,
}

/// Why a declaration exists.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum DeclOrigin {
    /// Written by the user.
    #[default]
    Source,
    /// Synthesized by a lowering pass (no more specific tag applies).
    Synthetic,
    /// Class generated to hold a suspended computation's state.
    ContinuationClass,
    /// Lambda lowered as a suspendable function object.
    SuspendLambda,
}

impl DeclOrigin {
    /// Whether this declaration belongs to continuation-resuming code.
    ///
    /// Consumed by the codegen coercion exemption for the result-wrapper
    /// type.
    #[inline]
    pub fn is_continuation_context(self) -> bool {
        matches!(self, DeclOrigin::ContinuationClass | DeclOrigin::SuspendLambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_contexts() {
        assert!(DeclOrigin::ContinuationClass.is_continuation_context());
        assert!(DeclOrigin::SuspendLambda.is_continuation_context());
        assert!(!DeclOrigin::Source.is_continuation_context());
        assert!(!DeclOrigin::Synthetic.is_continuation_context());
    }
}
