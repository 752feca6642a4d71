use crate::vdom::{Attribute, Element, EventBinding, EventData, Fragment, Handler, Node, Reaction};
use core::slice;
use hashbrown::{hash_map::Entry, HashMap, HashSet};
use std::{cell::RefCell, fmt, mem, rc::Rc};
use tracing::{debug, error, info, instrument, level_filters::STATIC_MAX_LEVEL, trace, trace_span, warn, Level};
use wasm_bindgen::{closure::Closure, throw_str, JsCast};

/// Receives the messages event handlers [dispatch](`Reaction::Dispatch`).
pub type Dispatch<M> = Rc<dyn Fn(M)>;

/// A live DOM event listener.
///
/// The JavaScript closure stays registered for as long as an element with the same event binding name is rendered in its place.
/// Only the handler it forwards to is swapped on each update.
pub(crate) struct Listener<M> {
	name: &'static str,
	handler: Rc<RefCell<Handler<M>>>,
	closure: Closure<dyn Fn(web_sys::Event)>,
}

/// Attached to a specific [`web_sys::Element`] during instantiation, this `struct` can be used to update its [***childNodes***](https://developer.mozilla.org/en-US/docs/Web/API/Node/childNodes).
///
/// Note that this does not include the [***Element***](https://developer.mozilla.org/en-US/docs/Web/API/element)
/// it is attached to itself, and also does not include the [***Attr***](https://developer.mozilla.org/en-US/docs/Web/API/Attr)ibutes of that element.
///
/// The differ owns the currently mounted virtual DOM, including its live event listeners.
/// Those listeners will start throwing errors into [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript)
/// if the instance is dropped while its DOM is still in the document.
pub struct DomDiffer<M> {
	element: web_sys::Element,
	mounted: Vec<Node<M>>,
	dispatch: Dispatch<M>,
	listener_count: usize,
}

impl<M> fmt::Debug for DomDiffer<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DomDiffer")
			.field("element", &self.element)
			.field("mounted", &self.mounted.len())
			.field("listener_count", &self.listener_count)
			.finish_non_exhaustive()
	}
}

/// How diffing a single pair of nodes went.
enum Outcome {
	Patched,
	/// The DOM ended before the node that was expected there.
	Exhausted,
	/// The DOM node can't be updated in place.
	Replace,
}

impl<M: 'static> DomDiffer<M> {
	#[must_use]
	#[instrument(skip(dispatch))]
	pub fn new_for_element_child_nodes(element: web_sys::Element, dispatch: Dispatch<M>) -> Self {
		Self::adopt(element, Vec::new(), dispatch)
	}

	/// Like [`new_for_element_child_nodes`](`DomDiffer::new_for_element_child_nodes`), but for an element whose child nodes already match `mounted`.
	///
	/// `mounted` usually comes from [`load_child_nodes`](`crate::load::load_child_nodes`) and must not carry event bindings.
	#[must_use]
	#[instrument(skip(mounted, dispatch), fields(mounted = mounted.len()))]
	pub fn adopt(element: web_sys::Element, mounted: Vec<Node<M>>, dispatch: Dispatch<M>) -> Self {
		Self {
			element,
			mounted,
			dispatch,
			listener_count: 0,
		}
	}

	#[must_use]
	pub fn element(&self) -> &web_sys::Element {
		&self.element
	}

	#[must_use]
	pub fn mounted(&self) -> &[Node<M>] {
		&self.mounted
	}

	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.listener_count
	}

	/// Patches the element's child nodes from the previously mounted tree to `vdom_b`, which becomes the mounted tree.
	#[instrument(skip(self, vdom_b))]
	pub fn update_child_nodes(&mut self, mut vdom_b: Vec<Node<M>>, depth_limit: usize) {
		let element = self.element.clone();
		let child_nodes = element.child_nodes();
		let owner_document = match element.owner_document() {
			Some(document) => document,
			None => return error!("No owner document found for root element."),
		};

		let mut vdom_a = mem::take(&mut self.mounted);
		let mut i = 0;
		self.diff_splice_node_list(&owner_document, &mut vdom_a, &mut vdom_b, &element, &child_nodes, &mut i, depth_limit);
		debug_assert_eq!(i as usize, vdom_b.iter().map(Node::dom_len).sum::<usize>());

		let leaked = self.discard_listeners(&mut vdom_a);
		if leaked != 0 {
			warn!("{} event listener(s) of the previous tree were still bound.", leaked)
		}
		self.mounted = vdom_b;
		info!("Event listener count: {}", self.listener_count);
	}

	/// If `vdom_b` is empty, `next_sibling` is guaranteed unused.
	#[allow(clippy::too_many_arguments)]
	#[instrument(skip(self, document, vdom_a, vdom_b))]
	fn diff_splice_node_list(
		&mut self,
		document: &web_sys::Document,
		vdom_a: &mut [Node<M>],
		vdom_b: &mut [Node<M>],
		parent_element: &web_sys::Element,
		dom_slice: &web_sys::NodeList,
		i: &mut u32,
		depth_limit: usize,
	) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		let common = vdom_a.len().min(vdom_b.len());
		for k in 0..common {
			if !self.diff_node(document, &mut vdom_a[k], &mut vdom_b[k], parent_element, dom_slice, i, depth_limit) {
				let missing = self.discard_listeners(&mut vdom_a[k..]);
				if missing != 0 {
					warn!("{} removed event listener(s) were unaccounted for.", missing)
				}
				return self.create_nodes(document, &mut vdom_b[k..], parent_element, dom_slice, i, depth_limit);
			}
		}

		self.remove_nodes(&mut vdom_a[common..], dom_slice, i, depth_limit);
		self.create_nodes(document, &mut vdom_b[common..], parent_element, dom_slice, i, depth_limit);
	}

	/// Returns `false` iff the DOM ended before `a` and nothing was changed.
	#[allow(clippy::too_many_arguments)]
	fn diff_node(
		&mut self,
		document: &web_sys::Document,
		a: &mut Node<M>,
		b: &mut Node<M>,
		parent_element: &web_sys::Element,
		dom_slice: &web_sys::NodeList,
		i: &mut u32,
		depth_limit: usize,
	) -> bool {
		let outcome = match (&mut *a, &mut *b) {
			(Node::Comment(c_1), Node::Comment(c_2)) => Self::diff_comment(c_1, c_2, dom_slice, *i),
			(Node::Text(t_1), Node::Text(t_2)) => Self::diff_text(t_1, t_2, dom_slice, *i),
			(Node::Element(e_1), Node::Element(e_2)) if e_1.name.eq_ignore_ascii_case(&e_2.name) => self.diff_element(document, e_1, e_2, dom_slice, *i, depth_limit),

			(Node::Multi(n_1), Node::Multi(n_2)) => {
				let span = trace_span!("Diffing multi", "n_1.len()" = n_1.len(), "n_2.len()" = n_2.len());
				let _enter = span.enter();
				// Skip `depth_limit` check one level down if there are no items at all.
				if !n_1.is_empty() || !n_2.is_empty() {
					self.diff_splice_node_list(document, n_1, n_2, parent_element, dom_slice, i, depth_limit - 1)
				}
				return true;
			}

			(Node::Keyed(rf_1), Node::Keyed(rf_2)) => {
				self.diff_keyed(document, rf_1, rf_2, parent_element, dom_slice, i, depth_limit);
				return true;
			}

			// Mismatching nodes: Destroy and rebuild.
			(n_1, n_2) => {
				trace!("Replacing mismatching node: {:?} -> {:?}", n_1, n_2);
				Outcome::Replace
			}
		};

		match outcome {
			Outcome::Patched => {
				*i += 1;
				true
			}
			Outcome::Exhausted => false,
			Outcome::Replace => {
				let span = trace_span!("Replace mismatching");
				let _enter = span.enter();
				self.remove_nodes(slice::from_mut(a), dom_slice, i, depth_limit);
				self.create_nodes(document, slice::from_mut(b), parent_element, dom_slice, i, depth_limit);
				true
			}
		}
	}

	fn diff_comment(c_1: &str, c_2: &str, dom_slice: &web_sys::NodeList, i: u32) -> Outcome {
		let span = trace_span!("Diffing comment", c_1, c_2);
		let _enter = span.enter();
		let node = match dom_slice.get(i) {
			Some(node) => node,
			None => {
				error!("Expected comment beyond end of `web_sys::NodeList`. Switching to insertions.");
				return Outcome::Exhausted;
			}
		};

		let comment = match node.dyn_ref::<web_sys::Comment>() {
			Some(comment) => comment,
			None => {
				error!("Expected to update `web_sys::Comment` but found {:?}; Recreating the node.", node);
				return Outcome::Replace;
			}
		};

		let data = comment.data();
		if STATIC_MAX_LEVEL >= Level::WARN && data != c_1 {
			warn!("Unexpected comment data: Expected {:?} but found {:?}", c_1, data);
		}
		if data != c_2 {
			comment.set_data(c_2)
		}
		Outcome::Patched
	}

	/// Text nodes inside `contenteditable` elements are expected to drift from the mounted tree, so that's only logged at `DEBUG`.
	fn diff_text(t_1: &str, t_2: &str, dom_slice: &web_sys::NodeList, i: u32) -> Outcome {
		let span = trace_span!("Diffing text node", t_1, t_2);
		let _enter = span.enter();
		let node = match dom_slice.get(i) {
			Some(node) => node,
			None => {
				debug!("Expected text beyond end of `web_sys::NodeList`. Switching to insertions.");
				return Outcome::Exhausted;
			}
		};

		let text = match node.dyn_ref::<web_sys::Text>() {
			Some(text) => text,
			None => {
				debug!("Expected to update `web_sys::Text` but found {:?}; Recreating the node.", node);
				return Outcome::Replace;
			}
		};

		let data = text.data();
		if data != t_2 {
			if data != t_1 {
				debug!("Unexpected text data: Expected {:?} but found {:?}. Overwriting.", t_1, data);
			}
			text.set_data(t_2)
		}
		Outcome::Patched
	}

	fn diff_element(&mut self, document: &web_sys::Document, e_1: &mut Element<M>, e_2: &mut Element<M>, dom_slice: &web_sys::NodeList, i: u32, depth_limit: usize) -> Outcome {
		let span = trace_span!("Diffing element", tag = &*e_1.name);
		let _enter = span.enter();
		let node = match dom_slice.get(i) {
			Some(node) => node,
			None => {
				error!("Expected <{}> beyond end of `web_sys::NodeList`. Switching to insertions.", e_1.name);
				return Outcome::Exhausted;
			}
		};

		let element = match node.dyn_ref::<web_sys::Element>() {
			Some(element) => element,
			None => {
				error!("Expected to update `web_sys::Element` but found {:?}; Recreating the node.", node);
				return Outcome::Replace;
			}
		};

		if !element.tag_name().eq_ignore_ascii_case(&e_1.name) {
			error!("Expected to update <{}> but found <{}>; Recreating the element.", e_1.name, element.tag_name());
			return Outcome::Replace;
		}

		self.update_element(document, e_1, e_2, element, depth_limit);
		Outcome::Patched
	}

	#[allow(clippy::too_many_arguments)]
	#[instrument(skip(self, document, rf_1, rf_2), fields(rf_1 = rf_1.len(), rf_2 = rf_2.len()))]
	fn diff_keyed(
		&mut self,
		document: &web_sys::Document,
		rf_1: &mut [Fragment<M>],
		rf_2: &mut [Fragment<M>],
		parent_element: &web_sys::Element,
		dom_slice: &web_sys::NodeList,
		i: &mut u32,
		depth_limit: usize,
	) {
		debug_assert_eq!(rf_2.len(), rf_2.iter().map(|b| b.dom_key).collect::<HashSet<_>>().len(), "Duplicate `Fragment::dom_key` encountered");

		let mut common = 0;
		while common < rf_1.len() && common < rf_2.len() && rf_1[common].dom_key == rf_2[common].dom_key {
			self.diff_splice_node_list(
				document,
				slice::from_mut(&mut rf_1[common].content),
				slice::from_mut(&mut rf_2[common].content),
				parent_element,
				dom_slice,
				i,
				depth_limit - 1,
			);
			common += 1;
		}
		let (rf_1, rf_2) = (&mut rf_1[common..], &mut rf_2[common..]);

		if rf_1.is_empty() {
			for Fragment { content, .. } in rf_2 {
				self.diff_splice_node_list(document, &mut [], slice::from_mut(content), parent_element, dom_slice, i, depth_limit - 1)
			}
			return;
		}
		if rf_2.is_empty() {
			for Fragment { content, .. } in rf_1 {
				self.diff_splice_node_list(document, slice::from_mut(content), &mut [], parent_element, dom_slice, i, depth_limit - 1)
			}
			return;
		}

		// Target slot per key: index into `rf_2` and the detached DOM nodes once diffed.
		let mut map = HashMap::<u64, (usize, Option<Vec<web_sys::Node>>)>::new();
		for (index, b) in rf_2.iter().enumerate() {
			match map.entry(b.dom_key) {
				Entry::Occupied(_) => {
					if cfg!(debug_assertions) {
						panic!("Duplicate `Fragment::dom_key` encountered: {}", b.dom_key);
					} else {
						throw_str("Duplicate `Fragment::dom_key` encountered.")
					}
				}
				Entry::Vacant(v) => {
					v.insert((index, None));
				}
			}
		}

		// Diff in place, then detach the resulting DOM nodes:
		for a in rf_1.iter_mut() {
			match map.get_mut(&a.dom_key) {
				None => {
					let span = trace_span!("Removing keyed fragment", dom_key = a.dom_key);
					let _enter = span.enter();
					self.diff_splice_node_list(document, slice::from_mut(&mut a.content), &mut [], parent_element, dom_slice, i, depth_limit - 1)
				}
				Some((index, detached)) => {
					let span = trace_span!("Moving keyed fragment", dom_key = a.dom_key);
					let _enter = span.enter();
					let mut k = *i;
					self.diff_splice_node_list(
						document,
						slice::from_mut(&mut a.content),
						slice::from_mut(&mut rf_2[*index].content),
						parent_element,
						dom_slice,
						&mut k,
						depth_limit - 1,
					);
					let mut nodes = Vec::with_capacity((k - *i) as usize);
					for _ in *i..k {
						match dom_slice.get(*i).map(|node| parent_element.remove_child(&node)) {
							Some(Ok(node)) => nodes.push(node),
							Some(Err(error)) => error!("Failed to detach node: {:?}", error),
							None => error!("Expected node to detach beyond end of `web_sys::NodeList`."),
						}
					}
					*detached = Some(nodes);
				}
			}
		}

		// Reinsert DOM nodes in order and diff-create new ones where necessary:
		let next_sibling = dom_slice.get(*i);
		let next_sibling = next_sibling.as_ref();
		for b in rf_2.iter_mut() {
			let detached = map.remove(&b.dom_key).and_then(|(_, detached)| detached);
			match detached {
				None => {
					let span = trace_span!("Creating keyed fragment", dom_key = b.dom_key);
					let _enter = span.enter();
					self.diff_splice_node_list(document, &mut [], slice::from_mut(&mut b.content), parent_element, dom_slice, i, depth_limit - 1)
				}
				Some(nodes) => {
					for node in nodes {
						match parent_element.insert_before(&node, next_sibling) {
							Ok(_) => *i += 1,
							Err(error) => error!("Failed to reinsert node: {:?}", error),
						}
					}
				}
			}
		}
		debug_assert!(map.is_empty());
	}

	/// Removes the DOM nodes of `vdom_a` starting at `dom_slice[i]`, detaching their event listeners first.
	#[instrument(skip(self, vdom_a), fields(vdom_a = vdom_a.len()))]
	fn remove_nodes(&mut self, vdom_a: &mut [Node<M>], dom_slice: &web_sys::NodeList, i: &mut u32, depth_limit: usize) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		for k in 0..vdom_a.len() {
			let removed_node = &mut vdom_a[k];
			match removed_node {
				Node::Multi(nodes) => {
					let span = trace_span!("Removing multi", "nodes.len()" = nodes.len());
					let _enter = span.enter();
					// May skip `depth_limit` check one level down.
					if !nodes.is_empty() {
						self.remove_nodes(nodes, dom_slice, i, depth_limit - 1);
					}
					continue;
				}
				Node::Keyed(fragments) => {
					let span = trace_span!("Removing keyed", "fragments.len()" = fragments.len());
					let _enter = span.enter();
					for fragment in fragments {
						self.remove_nodes(slice::from_mut(&mut fragment.content), dom_slice, i, depth_limit - 1)
					}
					continue;
				}
				Node::Comment(_) | Node::Text(_) | Node::Element(_) => (),
			}

			let node = match dom_slice.get(*i) {
				Some(node) => node,
				None => {
					error!("Expected to remove node beyond end of `web_sys::NodeList`. Skipping further deletions here while dropping listeners.");
					let missing = self.discard_listeners(&mut vdom_a[k..]);
					if missing != 0 {
						warn!("{} removed event listener(s) were unaccounted for.", missing)
					}
					return;
				}
			};

			match removed_node {
				Node::Comment(comment) => {
					let span = trace_span!("Removing comment", comment = comment.as_str());
					let _enter = span.enter();
					match node.dyn_ref::<web_sys::Comment>() {
						Some(dom_comment) if STATIC_MAX_LEVEL >= Level::ERROR && dom_comment.data() != *comment => error!("Unexpected removed comment data: {:?}", dom_comment.data()),
						Some(_) => (),
						None => error!("Expected to remove `web_sys::Comment` but found {:?}; Deleting the node anyway.", node),
					}
				}
				Node::Text(text) => {
					let span = trace_span!("Removing text node", text = text.as_str());
					let _enter = span.enter();
					if node.dyn_ref::<web_sys::Text>().is_none() {
						debug!("Expected to remove `web_sys::Text` but found {:?}; Deleting the node anyway.", node);
					}
				}
				Node::Element(element) => {
					let span = trace_span!("Removing element", tag = &*element.name);
					let _enter = span.enter();
					match node.dyn_ref::<web_sys::Element>() {
						Some(dom_element) if dom_element.tag_name().eq_ignore_ascii_case(&element.name) => {
							self.unbind_element(element, dom_element, depth_limit);
						}
						_ => {
							error!("Expected to remove <{}> but found {:?}; Removing anyway but dropping listeners unbound.", element.name, node);
							let missing = self.discard_listeners(slice::from_mut(removed_node));
							if missing != 0 {
								warn!("{} removed event listener(s) were unaccounted for.", missing)
							}
						}
					}
				}
				Node::Multi(_) | Node::Keyed(_) => unreachable!(),
			}

			match node.parent_node() {
				Some(parent) => {
					if let Err(error) = parent.remove_child(&node) {
						error!("Failed to remove the node: {:?}", error)
					}
				}
				None => error!("Could not find parent node of node to remove. Ignoring."),
			}
		}
	}

	/// Creates the DOM nodes for `vdom_b` before `dom_slice[i]`.
	#[instrument(skip(self, document, vdom_b), fields(vdom_b = vdom_b.len()))]
	fn create_nodes(&mut self, document: &web_sys::Document, vdom_b: &mut [Node<M>], parent_element: &web_sys::Element, dom_slice: &web_sys::NodeList, i: &mut u32, depth_limit: usize) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		let next_sibling = dom_slice.get(*i);
		let next_sibling = next_sibling.as_ref();
		for new_node in vdom_b {
			match new_node {
				Node::Comment(comment) => {
					let span = trace_span!("Creating comment", comment = comment.as_str());
					let _enter = span.enter();
					let dom_comment = document.create_comment(comment);
					match parent_element.insert_before(dom_comment.as_ref(), next_sibling) {
						Ok(_) => *i += 1,
						Err(error) => error!("Failed to insert comment: {:?}", error),
					}
				}

				Node::Text(text) => {
					let span = trace_span!("Creating text node", text = text.as_str());
					let _enter = span.enter();
					let dom_text = document.create_text_node(text);
					match parent_element.insert_before(dom_text.as_ref(), next_sibling) {
						Ok(_) => *i += 1,
						Err(error) => error!("Failed to insert text: {:?}", error),
					}
				}

				Node::Element(element) => {
					let span = trace_span!("Creating element", tag = &*element.name);
					let _enter = span.enter();
					let dom_element = match document.create_element(&element.name) {
						Ok(dom_element) => dom_element,
						Err(error) => {
							error!("Failed to create element: {:?}", error);
							continue;
						}
					};

					if let Err(error) = parent_element.insert_before(dom_element.as_ref(), next_sibling) {
						error!("Failed to insert element: {:?}", error);
						continue;
					}

					self.update_element(document, &mut Element::new(element.name.clone()), element, &dom_element, depth_limit);
					*i += 1;
				}

				Node::Multi(nodes) => {
					let span = trace_span!("Creating multi", "nodes.len()" = nodes.len());
					let _enter = span.enter();
					// May skip `depth_limit` check one level down.
					if !nodes.is_empty() {
						self.create_nodes(document, nodes, parent_element, dom_slice, i, depth_limit - 1);
					}
				}

				Node::Keyed(fragments) => {
					let span = trace_span!("Creating keyed", "fragments.len()" = fragments.len());
					let _enter = span.enter();
					debug_assert_eq!(
						fragments.len(),
						fragments.iter().map(|fragment| fragment.dom_key).collect::<HashSet<_>>().len(),
						"Duplicate `Fragment::dom_key` encountered"
					);
					for fragment in fragments {
						self.create_nodes(document, slice::from_mut(&mut fragment.content), parent_element, dom_slice, i, depth_limit - 1)
					}
				}
			}
		}
	}

	/// Detaches the event listeners of `element` and its descendants from the DOM, without removing any nodes.
	#[instrument(skip(self, element), fields(tag = &*element.name))]
	fn unbind_element(&mut self, element: &mut Element<M>, dom_element: &web_sys::Element, depth_limit: usize) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		for listener in mem::take(&mut element.listeners) {
			self.remove_event_listener(dom_element, listener)
		}

		let child_nodes = dom_element.child_nodes();
		let mut i = 0;
		self.unbind_node_list(&mut element.content, &child_nodes, &mut i, depth_limit - 1);
	}

	fn unbind_node_list(&mut self, nodes: &mut [Node<M>], dom_slice: &web_sys::NodeList, i: &mut u32, depth_limit: usize) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		for node in nodes {
			match node {
				Node::Comment(_) | Node::Text(_) => *i += 1,
				Node::Element(element) => {
					match dom_slice.get(*i).as_ref().and_then(|node| node.dyn_ref::<web_sys::Element>()) {
						Some(dom_element) if dom_element.tag_name().eq_ignore_ascii_case(&element.name) => self.unbind_element(element, dom_element, depth_limit),
						_ => {
							error!("Expected to unbind <{}> at a different position; Dropping its listeners unbound.", element.name);
							self.discard_listeners(slice::from_mut(node));
						}
					}
					*i += 1;
				}
				Node::Multi(nodes) => self.unbind_node_list(nodes, dom_slice, i, depth_limit - 1),
				Node::Keyed(fragments) => {
					for fragment in fragments {
						self.unbind_node_list(slice::from_mut(&mut fragment.content), dom_slice, i, depth_limit - 1)
					}
				}
			}
		}
	}

	/// Drops the listeners of `nodes` without touching the DOM. Returns how many there were.
	///
	/// This is only correct for listeners whose elements are already gone.
	fn discard_listeners(&mut self, nodes: &mut [Node<M>]) -> usize {
		let mut count = 0;
		for node in nodes {
			count += match node {
				Node::Comment(_) | Node::Text(_) => 0,
				Node::Element(element) => {
					let listeners = mem::take(&mut element.listeners).len();
					self.listener_count = self.listener_count.saturating_sub(listeners);
					listeners + self.discard_listeners(&mut element.content)
				}
				Node::Multi(nodes) => self.discard_listeners(nodes),
				Node::Keyed(fragments) => fragments.iter_mut().map(|fragment| self.discard_listeners(slice::from_mut(&mut fragment.content))).sum(),
			};
		}
		count
	}

	#[allow(clippy::similar_names)]
	#[instrument(skip(self, document, e_1, e_2), fields(tag = &*e_2.name))]
	fn update_element(&mut self, document: &web_sys::Document, e_1: &mut Element<M>, e_2: &mut Element<M>, element: &web_sys::Element, depth_limit: usize) {
		debug_assert!(e_1.name.eq_ignore_ascii_case(&e_2.name));

		#[instrument]
		fn remove_attribute(element: &web_sys::Element, Attribute { name, value }: &Attribute) {
			if STATIC_MAX_LEVEL >= Level::WARN {
				match element.get_attribute(name) {
					Some(found) if found != *value => warn!("Unexpected value of removed attribute {:?}: Expected {:?} but found {:?}", name, value, found),
					None => warn!("Attribute {:?} to remove is missing", name),
					Some(_) => (),
				}
			}
			if let Err(error) = element.remove_attribute(name) {
				warn!("Could not remove attribute with name {:?}, value {:?}: {:?}", name, value, error)
			}
		}

		#[instrument]
		fn add_attribute(element: &web_sys::Element, Attribute { name, value }: &Attribute) {
			if let Err(error) = element.set_attribute(name, value) {
				error!("Could not add attribute {:?}={:?}: {:?}", name, value, error)
			}
		}

		let mut a_1: &[Attribute] = &e_1.attributes;
		let mut a_2: &[Attribute] = &e_2.attributes;
		while !a_1.is_empty() && a_1.first() == a_2.first() {
			a_1 = &a_1[1..];
			a_2 = &a_2[1..];
		}
		while !a_1.is_empty() && a_1.last() == a_2.last() {
			a_1 = &a_1[..a_1.len() - 1];
			a_2 = &a_2[..a_2.len() - 1];
		}
		for removed in a_1 {
			// Overwritten below instead.
			if !a_2.iter().any(|added| added.name == removed.name) {
				remove_attribute(element, removed)
			}
		}
		for added in a_2 {
			add_attribute(element, added)
		}

		// Once picked by the user, an `<option>` ignores its `selected` attribute.
		if let Some(option) = element.dyn_ref::<web_sys::HtmlOptionElement>() {
			let selected = e_2.get_attribute("selected").is_some();
			if option.selected() != selected {
				trace!(selected, "Syncing live selectedness.");
				option.set_selected(selected)
			}
		}

		if STATIC_MAX_LEVEL >= Level::ERROR {
			for (i_a, eb_a) in e_2.event_bindings.iter().enumerate() {
				for eb_b in &e_2.event_bindings[i_a + 1..] {
					if eb_a.name == eb_b.name {
						// Only the first binding per event name is guaranteed to be kept across updates.
						error!("Duplicate event binding: {:?}", eb_a.name)
					}
				}
			}
		}

		let mut previous = mem::take(&mut e_1.listeners);
		for binding in &e_2.event_bindings {
			match previous.iter().position(|listener| listener.name == binding.name) {
				Some(position) => {
					let listener = previous.swap_remove(position);
					*listener.handler.borrow_mut() = Rc::clone(&binding.handler);
					e_2.listeners.push(listener);
				}
				None => {
					if let Some(listener) = self.add_event_listener(element, binding) {
						e_2.listeners.push(listener)
					}
				}
			}
		}
		for removed in previous {
			self.remove_event_listener(element, removed)
		}

		let child_nodes = element.child_nodes();
		let mut i = 0;
		self.diff_splice_node_list(document, &mut e_1.content, &mut e_2.content, element, &child_nodes, &mut i, depth_limit - 1);

		// `contenteditable` can leave extra nodes (usually `<br>`) behind.
		if depth_limit > 1 {
			while let Some(surplus) = child_nodes.get(i) {
				debug!("Removing surplus node {:?}.", surplus);
				if let Err(error) = element.remove_child(&surplus) {
					error!("Failed to remove surplus node: {:?}", error);
					break;
				}
			}
		}
	}

	#[instrument(skip(self, binding), fields(name = binding.name))]
	fn add_event_listener(&mut self, element: &web_sys::Element, binding: &EventBinding<M>) -> Option<Listener<M>> {
		let handler = Rc::new(RefCell::new(Rc::clone(&binding.handler)));
		let closure = {
			let handler = Rc::clone(&handler);
			let dispatch = Rc::clone(&self.dispatch);
			let name = binding.name;
			Closure::wrap(Box::new(move |event: web_sys::Event| {
				let span = trace_span!("listener", name);
				let _enter = span.enter();

				// Released before calling so that handlers may be swapped re-entrantly.
				let handler = Rc::clone(&handler.borrow());
				match handler(&event_data(&event)) {
					Reaction::Ignore => trace!("Ignored."),
					Reaction::Dispatch(message) => dispatch(message),
					Reaction::Blur => {
						event.prevent_default();
						match event.current_target().and_then(|target| target.dyn_into::<web_sys::HtmlElement>().ok()) {
							Some(target) => target.blur().unwrap_or_else(|error| error!("Failed to blur: {:?}", error)),
							None => warn!("The event's current target can't be blurred."),
						}
					}
				}
			}) as Box<dyn Fn(web_sys::Event)>)
		};

		if let Err(error) = element.add_event_listener_with_callback(binding.name, closure.as_ref().unchecked_ref::<js_sys::Function>()) {
			error!("Failed to add event listener {:?}: {:?}", binding.name, error);
			return None;
		}
		self.listener_count += 1;
		Some(Listener {
			name: binding.name,
			handler,
			closure,
		})
	}

	#[instrument(skip(self, removed), fields(name = removed.name))]
	fn remove_event_listener(&mut self, element: &web_sys::Element, removed: Listener<M>) {
		if let Err(error) = element.remove_event_listener_with_callback(removed.name, removed.closure.as_ref().unchecked_ref::<js_sys::Function>()) {
			error!("Failed to remove event listener {:?}: {:?}", removed.name, error)
		}
		self.listener_count = self.listener_count.saturating_sub(1);
	}
}

fn event_data(event: &web_sys::Event) -> EventData {
	let target = event.current_target();
	let target = target.as_ref();
	EventData {
		text: target.and_then(|target| target.dyn_ref::<web_sys::Node>()).and_then(web_sys::Node::text_content),
		value: target.and_then(|target| match target.dyn_ref::<web_sys::HtmlSelectElement>() {
			Some(select) => Some(select.value()),
			None => target.dyn_ref::<web_sys::HtmlInputElement>().map(web_sys::HtmlInputElement::value),
		}),
		key: event.dyn_ref::<web_sys::KeyboardEvent>().map(web_sys::KeyboardEvent::key),
		composing: event.dyn_ref::<web_sys::KeyboardEvent>().map_or(false, web_sys::KeyboardEvent::is_composing),
	}
}
