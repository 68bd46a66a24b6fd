use crate::error::CommonError;
use crate::outcome::ConversionOutcome;
use crate::result::CommonResult;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Conversion engine abstraction.
///
/// Implementations are synchronous and return a serialized
/// [`ConversionOutcome`]. `timestamp` is seconds since the Unix epoch; its
/// meaning belongs to the engine (document dates, dated feature rollouts).
pub trait Converter: Send + Sync {
    fn convert(&self, source: &str, timestamp: Option<i64>) -> String;
}

/// Late-bound, possibly absent conversion engine.
///
/// The slot starts empty and can be filled exactly once. Clones share the
/// same slot, so an engine installed through one handle is visible to all.
#[derive(Clone, Default)]
pub struct EngineSlot {
    engine: Arc<OnceLock<Arc<dyn Converter>>>,
}

impl EngineSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn loaded(converter: impl Converter + 'static) -> Self {
        let slot = Self::empty();
        let _ = slot.engine.set(Arc::new(converter));
        slot
    }

    pub fn install(&self, converter: Arc<dyn Converter>) -> CommonResult<()> {
        self.engine
            .set(converter)
            .map_err(|_| CommonError::EngineAlreadyInstalled)
    }

    pub fn get(&self) -> Option<Arc<dyn Converter>> {
        self.engine.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }
}

impl fmt::Debug for EngineSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSlot")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// In-process engine backed by a closure; handy for tests and embedding
pub struct StaticConverter<F> {
    convert: F,
}

impl<F> StaticConverter<F>
where
    F: Fn(&str, Option<i64>) -> ConversionOutcome + Send + Sync,
{
    pub fn new(convert: F) -> Self {
        Self { convert }
    }
}

impl<F> Converter for StaticConverter<F>
where
    F: Fn(&str, Option<i64>) -> ConversionOutcome + Send + Sync,
{
    fn convert(&self, source: &str, timestamp: Option<i64>) -> String {
        (self.convert)(source, timestamp).encode()
    }
}
