use initiative_tracker::{
	diff::{Dispatch, DomDiffer},
	runtime::init_logging,
	vdom::{Element, Fragment, Node, Reaction},
};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlElement, HtmlSelectElement, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> web_sys::Element {
	init_logging();
	let document = window().unwrap().document().unwrap();
	let container = document.create_element("div").unwrap();
	document.body().unwrap().append_child(&container).unwrap();
	container
}

fn differ(container: &web_sys::Element) -> (DomDiffer<u8>, Rc<RefCell<Vec<u8>>>) {
	let received = Rc::new(RefCell::new(Vec::new()));
	let dispatch: Dispatch<u8> = {
		let received = Rc::clone(&received);
		Rc::new(move |message| received.borrow_mut().push(message))
	};
	(DomDiffer::new_for_element_child_nodes(container.clone(), dispatch), received)
}

fn list(keys: &[u64]) -> Vec<Node<u8>> {
	vec![Element::new("ul")
		.child(Node::Keyed(
			keys.iter()
				.map(|&key| Fragment {
					dom_key: key,
					content: Element::new("li").text(key.to_string()).into(),
				})
				.collect(),
		))
		.into()]
}

#[wasm_bindgen_test]
fn create_update_remove() {
	let container = container();
	let (mut differ, _) = differ(&container);

	differ.update_child_nodes(vec![Node::Comment("c".to_owned()), Element::new("p").class("a").text("Hello").into()], 8);
	assert_eq!(container.inner_html(), r#"<!--c--><p class="a">Hello</p>"#);

	differ.update_child_nodes(vec![Node::Comment("c".to_owned()), Element::new("p").class("b").text("World").into()], 8);
	assert_eq!(container.inner_html(), r#"<!--c--><p class="b">World</p>"#);

	differ.update_child_nodes(vec![Node::Text("plain".to_owned())], 8);
	assert_eq!(container.inner_html(), "plain");

	differ.update_child_nodes(Vec::new(), 8);
	assert_eq!(container.child_nodes().length(), 0);
}

#[wasm_bindgen_test]
fn keyed_reorder_moves_nodes() {
	let container = container();
	let (mut differ, _) = differ(&container);

	differ.update_child_nodes(list(&[1, 2, 3]), 8);
	let ul = container.first_element_child().unwrap();
	let first = ul.child_nodes().get(0).unwrap();
	assert_eq!(ul.text_content().unwrap(), "123");

	differ.update_child_nodes(list(&[3, 1, 4]), 8);
	assert_eq!(ul.text_content().unwrap(), "314");
	assert!(ul.child_nodes().get(1).unwrap().is_same_node(Some(&first)));
	assert!(container.first_element_child().unwrap().is_same_node(Some(ul.as_ref())));

	differ.update_child_nodes(list(&[]), 8);
	assert_eq!(ul.child_nodes().length(), 0);
}

#[wasm_bindgen_test]
fn click_dispatches_through_swapped_handlers() {
	let container = container();
	let (mut differ, received) = differ(&container);

	let button = |message: u8| -> Vec<Node<u8>> { vec![Element::new("button").on("click", move |_| Reaction::Dispatch(message)).text("Go").into()] };

	differ.update_child_nodes(button(1), 8);
	assert_eq!(differ.listener_count(), 1);
	let dom_button: HtmlElement = container.first_element_child().unwrap().dyn_into().unwrap();
	dom_button.click();
	assert_eq!(*received.borrow(), [1]);

	differ.update_child_nodes(button(2), 8);
	assert_eq!(differ.listener_count(), 1);
	dom_button.click();
	assert_eq!(*received.borrow(), [1, 2]);

	differ.update_child_nodes(Vec::new(), 8);
	assert_eq!(differ.listener_count(), 0);
	dom_button.click();
	assert_eq!(*received.borrow(), [1, 2]);
}

#[wasm_bindgen_test]
fn blur_reaction_prevents_default() {
	let container = container();
	let (mut differ, received) = differ(&container);

	differ.update_child_nodes(
		vec![Element::new("div")
			.attribute("contenteditable", "true")
			.on("keydown", |data| match data.key.as_deref() {
				Some("Enter") => Reaction::Blur,
				_ => Reaction::Ignore,
			})
			.into()],
		8,
	);
	let cell = container.first_element_child().unwrap();

	let keydown = |key: &str| {
		let mut init = KeyboardEventInit::new();
		init.key(key).cancelable(true);
		KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap()
	};
	assert!(cell.dispatch_event(&keydown("a")).unwrap());
	assert!(!cell.dispatch_event(&keydown("Enter")).unwrap());
	assert!(received.borrow().is_empty());
}

#[wasm_bindgen_test]
fn edited_text_is_repaired() {
	let container = container();
	let (mut differ, _) = differ(&container);

	let cell = || vec![Element::new("td").attribute("contenteditable", "true").text("7").into()];
	differ.update_child_nodes(cell(), 8);
	let td = container.first_element_child().unwrap();

	// What a user's edit may leave behind.
	td.set_inner_html("lots<br>");
	differ.update_child_nodes(cell(), 8);
	assert_eq!(td.inner_html(), "7");
}

#[wasm_bindgen_test]
fn depth_limit_stops_descent() {
	let container = container();
	let (mut differ, _) = differ(&container);

	differ.update_child_nodes(vec![Element::new("div").child(Element::new("span").text("deep")).into()], 2);
	assert_eq!(container.inner_html(), "<div><span></span></div>");
}

#[wasm_bindgen_test]
fn rendered_selection_overrides_user_picks() {
	let container = container();
	let (mut differ, _) = differ(&container);
	let select = |selected: &str| -> Vec<Node<u8>> {
		vec![Element::new("select")
			.children(["a", "b", "c"].iter().map(|&value| {
				let option = Element::<u8>::new("option").attribute("value", value);
				if value == selected { option.attribute("selected", "") } else { option }.text(value).into()
			}))
			.into()]
	};

	differ.update_child_nodes(select("b"), 8);
	let dom_select: HtmlSelectElement = container.first_element_child().unwrap().dyn_into().unwrap();
	assert_eq!(dom_select.value(), "b");

	dom_select.set_value("c");
	differ.update_child_nodes(select("b"), 8);
	assert_eq!(dom_select.value(), "b");

	dom_select.set_value("c");
	differ.update_child_nodes(select("a"), 8);
	assert_eq!(dom_select.value(), "a");
}
