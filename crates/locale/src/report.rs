use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Callback receiving errors that cannot be returned to a caller, such as a
/// command body failing inside the dispatcher.
pub type ExceptionHandler = Arc<dyn Fn(&anyhow::Error) + Send + Sync>;

/// Shared, ordered list of exception handlers.
///
/// Clones share the same list; handlers added through any clone run for
/// every report, in registration order.
#[derive(Clone, Default)]
pub struct ExceptionHandlers {
	handlers: Arc<RwLock<Vec<ExceptionHandler>>>,
}

impl ExceptionHandlers {
	pub fn add(&self, handler: impl Fn(&anyhow::Error) + Send + Sync + 'static) {
		self.handlers.write().push(Arc::new(handler));
	}

	pub fn handle(&self, error: &anyhow::Error) {
		let handlers = self.handlers.read().clone();
		for handler in handlers {
			handler(error);
		}
	}
}

impl fmt::Debug for ExceptionHandlers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ExceptionHandlers").field("len", &self.handlers.read().len()).finish()
	}
}
