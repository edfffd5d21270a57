//! Process-wide setup at the application boundary
//!
//! Call [`configure`] once at startup; later code fetches the same handles
//! with [`instance`].

use crate::core::{Pipeline, Settings};
use crate::facade::{Logger, Notifier};
use parking_lot::{const_rwlock, RwLock};
use std::sync::Arc;

static INSTANCE: RwLock<Option<Arc<Toolkit>>> = const_rwlock(None);

/// Everything `configure` builds
pub struct Toolkit {
    pub pipeline: Arc<Pipeline>,
    pub logger: Logger,
    pub notifier: Notifier,
}

impl Toolkit {
    pub fn new(pipeline: Pipeline) -> Self {
        let pipeline = Arc::new(pipeline);
        let notifier = Notifier::for_pipeline(&pipeline);
        Self {
            logger: Logger::new(Arc::clone(&pipeline)),
            notifier,
            pipeline,
        }
    }
}

/// Build and remember the toolkit; calling again replaces it
pub fn configure(settings: Settings) -> Arc<Toolkit> {
    install(Toolkit::new(Pipeline::new(settings)))
}

/// Remember an already assembled toolkit
pub fn install(toolkit: Toolkit) -> Arc<Toolkit> {
    let toolkit = Arc::new(toolkit);
    *INSTANCE.write() = Some(Arc::clone(&toolkit));
    toolkit
}

/// The configured toolkit, `None` (with an error on stderr) before `configure`
pub fn instance() -> Option<Arc<Toolkit>> {
    let instance = INSTANCE.read().clone();
    if instance.is_none() {
        eprintln!("[LOGGER ERROR] Boot module should be configured before it is used without settings");
    }
    instance
}
