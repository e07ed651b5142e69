pub type SketchResult<T> = Result<T, SketchError>;

/// Every way a render can fail.
///
/// Input-side rejections (`InputTooLarge`, `ForbiddenConstruct`) are raised before the sandbox
/// runs anything. Script-side failures are normalized into `ExecutionTimeout` or `Execution`.
#[derive(thiserror::Error, Debug)]
pub enum SketchError {
    #[error("input too large: script is {size} bytes (limit {limit})")]
    InputTooLarge { size: usize, limit: usize },

    #[error("forbidden construct: script contains '{token}'")]
    ForbiddenConstruct { token: &'static str },

    #[error("execution timed out after {limit_ms} ms")]
    ExecutionTimeout { limit_ms: u64 },

    #[error("execution error: {0}")]
    Execution(#[from] ExecFailure),

    #[error("rasterization error: {0}")]
    Rasterization(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a script stopped before completing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecFailure {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("{0}")]
    Script(String),

    #[error("element limit exceeded: more than {limit} drawing elements")]
    ElementLimit { limit: usize },

    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),
}

impl SketchError {
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    pub fn script(msg: impl Into<String>) -> Self {
        Self::Execution(ExecFailure::Script(msg.into()))
    }

    /// `true` for failures caused by the script itself (as opposed to host/infra failures).
    pub fn is_script_failure(&self) -> bool {
        matches!(
            self,
            Self::InputTooLarge { .. }
                | Self::ForbiddenConstruct { .. }
                | Self::ExecutionTimeout { .. }
                | Self::Execution(_)
        )
    }
}
