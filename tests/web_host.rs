#![cfg(all(target_arch = "wasm32", feature = "web_sys"))]

use dom_utils::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, Event, EventInit, EventTarget};

wasm_bindgen_test_configure!(run_in_browser);

fn element(tag: &str) -> Element {
    web_sys::window()
        .and_then(|w| w.document())
        .unwrap()
        .create_element(tag)
        .unwrap()
}

fn click() -> Event {
    let mut init = EventInit::new();
    init.bubbles(true);
    Event::new_with_event_init_dict("click", &init).unwrap()
}

#[wasm_bindgen_test]
fn registers_and_unregisters_on_real_elements() {
    let outer = element("div");
    let inner = element("span");
    outer.append_child(&inner).unwrap();
    let outer: EventTarget = outer.unchecked_into();
    let inner: EventTarget = inner.unchecked_into();

    let order = Rc::new(RefCell::new(Vec::new()));
    let sink = order.clone();
    let outer_cb = Callback::from(move |_: Event| sink.borrow_mut().push("outer-capture"));
    let ctx = Context::new();
    let sink = order.clone();
    ctx.set_method("onClick", move |_: Event| sink.borrow_mut().push("inner"));

    let mut registry = ListenerRegistry::new(WebHost);
    registry
        .register(&outer, "click", &outer_cb, None, ListenerOptions::capture())
        .unwrap();
    registry
        .register(&inner, "click", "onClick", Some(&ctx), ListenerOptions::default())
        .unwrap();

    inner.dispatch_event(&click()).unwrap();
    assert_eq!(*order.borrow(), vec!["outer-capture", "inner"]);

    assert!(registry.unregister(&outer, "click", &outer_cb, None).unwrap());
    assert!(!registry.unregister(&outer, "click", &outer_cb, None).unwrap());
    inner.dispatch_event(&click()).unwrap();
    assert_eq!(*order.borrow(), vec!["outer-capture", "inner", "inner"]);

    drop(registry);
    inner.dispatch_event(&click()).unwrap();
    assert_eq!(order.borrow().len(), 3);
}
