//! Ordered hook chains.
//!
//! A [`HookChain`] is an ordered list of handlers invoked one after another on
//! every call to the operation it observes. Handlers are added with
//! [`HookChain::subscribe`], which hands back a [`HookRegistration`] used to
//! remove the handler again.
//!
//! Dispatch iterates a snapshot of the chain taken when the call starts, so a
//! handler may register or unregister any handler (itself included) while the
//! chain is running. Such changes are visible from the next call on.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Value returned by a hook handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookFlow {
	/// Let the remaining handlers run.
	#[default]
	Continue,
	/// Skip the remaining handlers for this call.
	Stop,
}

type HookFn<A> = Rc<dyn Fn(&A) -> HookFlow>;

struct HookEntry<A: 'static> {
	id: u64,
	handler: HookFn<A>,
}

/// Type-erased view of a chain, used by [`HookRegistration`].
trait ChainHandle {
	fn remove(&self, id: u64) -> bool;
	fn contains(&self, id: u64) -> bool;
	fn chain_name(&self) -> &'static str;
}

/// An ordered, multi-subscriber chain of handlers taking `&A`.
pub struct HookChain<A: 'static> {
	name: &'static str,
	entries: RefCell<Vec<HookEntry<A>>>,
	next_id: Cell<u64>,
}

impl<A: 'static> HookChain<A> {
	/// Creates an empty chain. `name` only shows up in logs.
	pub fn new(name: &'static str) -> Rc<Self> {
		Rc::new(Self {
			name,
			entries: RefCell::new(Vec::new()),
			next_id: Cell::new(0),
		})
	}

	/// Returns the chain name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Returns the number of subscribed handlers.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns `true` if no handler is subscribed.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Appends `handler` to the end of the chain.
	pub fn subscribe<F>(self: &Rc<Self>, handler: F) -> HookRegistration
	where
		F: Fn(&A) -> HookFlow + 'static,
	{
		let id = self.next_id.get();
		self.next_id.set(id + 1);
		self.entries.borrow_mut().push(HookEntry {
			id,
			handler: Rc::new(handler),
		});
		tracing::debug!(chain = self.name, id, "hook registered");

		let chain: Weak<dyn ChainHandle> = Rc::downgrade(self) as Weak<dyn ChainHandle>;
		HookRegistration { chain, id }
	}

	/// Runs every handler in subscription order until one returns
	/// [`HookFlow::Stop`].
	///
	/// Returns `Stop` if a handler short-circuited the chain.
	pub fn run(&self, args: &A) -> HookFlow {
		let snapshot: Vec<HookFn<A>> = self
			.entries
			.borrow()
			.iter()
			.map(|entry| Rc::clone(&entry.handler))
			.collect();

		for handler in snapshot {
			if handler(args) == HookFlow::Stop {
				return HookFlow::Stop;
			}
		}
		HookFlow::Continue
	}
}

impl<A: 'static> ChainHandle for HookChain<A> {
	fn remove(&self, id: u64) -> bool {
		let mut entries = self.entries.borrow_mut();
		let before = entries.len();
		entries.retain(|entry| entry.id != id);
		before != entries.len()
	}

	fn contains(&self, id: u64) -> bool {
		self.entries.borrow().iter().any(|entry| entry.id == id)
	}

	fn chain_name(&self) -> &'static str {
		self.name
	}
}

impl<A: 'static> fmt::Debug for HookChain<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HookChain")
			.field("name", &self.name)
			.field("handlers", &self.len())
			.finish()
	}
}

/// Handle for one subscribed handler.
///
/// Dropping the handle leaves the handler subscribed; call
/// [`HookRegistration::unregister`] to remove it.
#[must_use = "the handler stays subscribed until `unregister` is called"]
pub struct HookRegistration {
	chain: Weak<dyn ChainHandle>,
	id: u64,
}

impl HookRegistration {
	/// Removes the handler from its chain.
	///
	/// Returns `false` if the handler was already gone or the chain was dropped.
	pub fn unregister(self) -> bool {
		match self.chain.upgrade() {
			Some(chain) => {
				let removed = chain.remove(self.id);
				tracing::debug!(chain = chain.chain_name(), id = self.id, removed, "hook unregistered");
				removed
			}
			None => false,
		}
	}

	/// Returns `true` while the handler is still subscribed.
	pub fn is_active(&self) -> bool {
		self.chain
			.upgrade()
			.map(|chain| chain.contains(self.id))
			.unwrap_or(false)
	}
}

impl fmt::Debug for HookRegistration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HookRegistration")
			.field("id", &self.id)
			.field("active", &self.is_active())
			.finish()
	}
}
