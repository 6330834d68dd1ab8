use crate::RequestContext;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::marker::PhantomData;

/// A route handler. Its return value is serialized as the JSON response body.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: RequestContext) -> Result<Value, Box<dyn Error + Send + Sync>>;
}

/// a holder which represents any async `Fn(RequestContext) -> Result<T, E>`
pub struct FnHandler<F, Fut> {
    f: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnHandler<F, Fut> {
    fn new(f: F) -> Self {
        Self { f, _phantom: PhantomData }
    }
}

impl<F, Fut> std::fmt::Debug for FnHandler<F, Fut> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").field("f", &std::any::type_name::<F>()).finish()
    }
}

pub fn handler_fn<F, Fut, T, E>(f: F) -> FnHandler<F, Fut>
where
    F: Fn(RequestContext) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    FnHandler::new(f)
}

#[async_trait]
impl<F, Fut, T, E> RequestHandler for FnHandler<F, Fut>
where
    F: Fn(RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: Into<Box<dyn Error + Send + Sync>> + Send + 'static,
{
    async fn invoke(&self, req: RequestContext) -> Result<Value, Box<dyn Error + Send + Sync>> {
        let output = (self.f)(req).await.map_err(Into::into)?;
        Ok(serde_json::to_value(output)?)
    }
}
