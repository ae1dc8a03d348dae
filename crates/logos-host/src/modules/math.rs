//! `mathPlugin` demo module.

use crate::module::{number_arg, HostCallError, HostContext, HostModule};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Arithmetic over JSON numbers. Integer inputs give integer results.
#[derive(Debug, Default, Clone, Copy)]
pub struct MathPlugin;

impl MathPlugin {
    pub const NAME: &'static str = "mathPlugin";

    fn add(args: &[Value]) -> Result<Value, HostCallError> {
        let a = number_arg(args, 0)?;
        let b = number_arg(args, 1)?;

        if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
            return a
                .checked_add(b)
                .map(Value::from)
                .ok_or_else(|| HostCallError::Failed("integer overflow".into()));
        }

        let (a, b) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
        let sum = a + b;
        if !sum.is_finite() {
            return Err(HostCallError::Failed("non-finite result".into()));
        }
        Ok(json!(sum))
    }
}

#[async_trait]
impl HostModule for MathPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn call(
        &self,
        method: &str,
        args: &[Value],
        _ctx: &HostContext,
    ) -> Result<Value, HostCallError> {
        match method {
            "add" => Self::add(args),
            other => Err(HostCallError::unknown_method(Self::NAME, other)),
        }
    }
}
