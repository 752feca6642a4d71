//! Glues [`App`] to the page.
//!
//! Event listeners only queue messages. A microtask drains the queue, updates the app and diffs the result once,
//! so the differ is never re-entered from its own event listeners.

use crate::{
	app::{App, AppError, Context},
	components::Message,
	config::Config,
	creatures::Bestiary,
	diff::{Dispatch, DomDiffer},
	load,
	persistence::LocalStorage,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{
	cell::{Cell, RefCell},
	collections::VecDeque,
	fmt,
	rc::Rc,
	sync::Once,
};
use tracing::{debug, error, info, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};

pub struct Runtime {
	window: web_sys::Window,
	app: RefCell<App>,
	differ: RefCell<DomDiffer<Message>>,
	queue: RefCell<VecDeque<Message>>,
	scheduled: Cell<bool>,
	flush: Closure<dyn Fn()>,
	depth_limit: usize,
}

impl fmt::Debug for Runtime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Runtime")
			.field("differ", &self.differ)
			.field("queued", &self.queue.borrow().len())
			.field("scheduled", &self.scheduled.get())
			.finish_non_exhaustive()
	}
}

/// Renders a new [`App`] into the element with id [`config.mount_id`](`Config::mount_id`).
///
/// Markup already inside that element is adopted and patched rather than thrown away.
#[instrument]
pub fn mount(config: Config) -> Result<Rc<Runtime>, AppError> {
	let window = web_sys::window().ok_or_else(|| AppError::Mount("no `window`".to_owned()))?;
	let document = window.document().ok_or_else(|| AppError::Mount("no `document`".to_owned()))?;
	let root = document
		.get_element_by_id(&config.mount_id)
		.ok_or_else(|| AppError::Mount(format!("no element with id {:?}", config.mount_id)))?;
	let config = config.with_dataset(root.get_attribute("data-storage-key"));

	let context = Context {
		store: Box::new(LocalStorage::from_window(&window)?),
		bestiary: Bestiary::bundled()?,
		rng: StdRng::from_entropy(),
		config,
	};
	let depth_limit = context.config.depth_limit;
	let app = App::new(context)?;
	let adopted = load::load_child_nodes(&root.child_nodes());

	let runtime = Rc::new_cyclic(|weak: &std::rc::Weak<Runtime>| {
		let dispatch: Dispatch<Message> = {
			let weak = weak.clone();
			Rc::new(move |message: Message| match weak.upgrade() {
				Some(runtime) => runtime.enqueue(message),
				None => warn!("Dropped a message dispatched after unmounting."),
			})
		};
		let flush = {
			let weak = weak.clone();
			Closure::wrap(Box::new(move || {
				if let Some(runtime) = weak.upgrade() {
					runtime.flush()
				}
			}) as Box<dyn Fn()>)
		};
		Runtime {
			window,
			app: RefCell::new(app),
			differ: RefCell::new(DomDiffer::adopt(root, adopted, dispatch)),
			queue: RefCell::new(VecDeque::new()),
			scheduled: Cell::new(false),
			flush,
			depth_limit,
		}
	});
	runtime.render();
	info!("Mounted.");
	Ok(runtime)
}

impl Runtime {
	/// Queues `message` for the next [`flush`](`Runtime::flush`), which is scheduled as a microtask.
	pub fn enqueue(&self, message: Message) {
		trace!(message = message.kind(), "Queued.");
		self.queue.borrow_mut().push_back(message);
		if !self.scheduled.replace(true) {
			self.window.queue_microtask(self.flush.as_ref().unchecked_ref::<js_sys::Function>());
		}
	}

	/// Applies all queued messages, then renders once.
	///
	/// Usually called from a microtask, but safe to call directly.
	#[instrument(skip(self))]
	pub fn flush(&self) {
		self.scheduled.set(false);
		loop {
			// Not borrowed across `update`.
			let message = self.queue.borrow_mut().pop_front();
			let message = match message {
				Some(message) => message,
				None => break,
			};
			if let Err(error) = self.app.borrow_mut().update(message) {
				report(&error)
			}
		}
		self.render();
	}

	fn render(&self) {
		let vdom = self.app.borrow().render();
		self.differ.borrow_mut().update_child_nodes(vdom, self.depth_limit);
	}

	#[must_use]
	pub fn app(&self) -> std::cell::Ref<'_, App> {
		self.app.borrow()
	}

	/// The mount element.
	#[must_use]
	pub fn element(&self) -> web_sys::Element {
		self.differ.borrow().element().clone()
	}
}

#[cfg(feature = "dangerous-logging")]
fn report(error: &AppError) {
	warn!("Update failed: {}", error);
}

#[cfg(not(feature = "dangerous-logging"))]
fn report(error: &AppError) {
	warn!(kind = error.kind(), "Update failed.");
}

thread_local! {
	static MOUNTED: RefCell<Option<Rc<Runtime>>> = RefCell::new(None);
}

static LOGGING: Once = Once::new();

/// Installs the panic hook and the console subscriber. Idempotent.
pub fn init_logging() {
	LOGGING.call_once(|| {
		console_error_panic_hook::set_once();
		tracing_wasm::set_as_global_default();
	});
}

/// Entry point: mounts into `#main` with the default [`Config`] and keeps the app alive for the rest of the page's lifetime.
#[wasm_bindgen]
pub fn run() -> Result<(), JsValue> {
	init_logging();
	let runtime = mount(Config::default()).map_err(|error| {
		error!("{}", error);
		JsValue::from_str(&error.to_string())
	})?;
	MOUNTED.with(|mounted| {
		if mounted.borrow_mut().replace(runtime).is_some() {
			debug!("Replaced a previously mounted runtime.");
		}
	});
	Ok(())
}
