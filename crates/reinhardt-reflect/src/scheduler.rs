//! Next-tick scheduling.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

/// A deferred task.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks on a later turn of the event loop.
pub trait Scheduler {
	/// Queues `task` to run after the current turn.
	fn defer(&self, task: Task);
}

/// Manually drained task queue.
///
/// Used on native targets and in tests, where "next tick" is whenever the
/// owner calls [`TickQueue::run_pending`].
#[derive(Default)]
pub struct TickQueue {
	pending: RefCell<VecDeque<Task>>,
}

impl TickQueue {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of queued tasks.
	pub fn pending(&self) -> usize {
		self.pending.borrow().len()
	}

	/// Runs the tasks queued before this call and returns how many ran.
	///
	/// Tasks deferred while running wait for the next call.
	pub fn run_pending(&self) -> usize {
		let batch: Vec<Task> = self.pending.borrow_mut().drain(..).collect();
		let count = batch.len();
		for task in batch {
			task();
		}
		count
	}
}

impl Scheduler for TickQueue {
	fn defer(&self, task: Task) {
		self.pending.borrow_mut().push_back(task);
	}
}

impl fmt::Debug for TickQueue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TickQueue")
			.field("pending", &self.pending())
			.finish()
	}
}

/// Browser scheduler: `setTimeout(task, 0)`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for TimeoutScheduler {
	fn defer(&self, task: Task) {
		gloo_timers::callback::Timeout::new(0, task).forget();
	}
}
