//! `counter` demo module. Every change is announced as `countChanged`.

use crate::module::{HostCallError, HostContext, HostModule};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};

/// Event emitted after every change.
pub const COUNT_CHANGED: &str = "countChanged";

#[derive(Debug, Default)]
pub struct CounterModule {
    count: AtomicI64,
}

impl CounterModule {
    pub const NAME: &'static str = "counter";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> i64 {
        self.count.load(Ordering::SeqCst)
    }

    fn changed(&self, ctx: &HostContext, count: i64) -> Value {
        ctx.emit(COUNT_CHANGED, json!({ "count": count }));
        json!(count)
    }
}

#[async_trait]
impl HostModule for CounterModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn call(
        &self,
        method: &str,
        _args: &[Value],
        ctx: &HostContext,
    ) -> Result<Value, HostCallError> {
        match method {
            "increment" => {
                let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(self.changed(ctx, count))
            }
            "decrement" => {
                let count = self.count.fetch_sub(1, Ordering::SeqCst) - 1;
                Ok(self.changed(ctx, count))
            }
            "reset" => {
                self.count.store(0, Ordering::SeqCst);
                Ok(self.changed(ctx, 0))
            }
            "count" => Ok(json!(self.current())),
            other => Err(HostCallError::unknown_method(Self::NAME, other)),
        }
    }
}
