use std::cell::RefCell;
use std::rc::Rc;

use hob::memory::{MemoryDom, MemoryNode};
use hob::path::PathError;
use hob::prelude::*;
use serde_json::json;

type Log = Rc<RefCell<Vec<String>>>;

const GREETER: &str = r#"
<div class="alert" style="background-color: aqua">
    <button on-click="changeContent()">Click me!</button>
    Hello <input type="text" bind-model="hello"/>
    <span bind-innerText="user.name">Hover me</span>
    <nested></nested>
    <nested></nested>
    <nested></nested>
    <nested></nested>
    <nested></nested>
    <span bind-hidden="isButtonInVisible">I am togglable!</span>
</div>
"#;

const NESTED: &str = r#"
<p>Paragraph is nested!
    <a on-click="greet()">Hi!</a>
    <span bind-innerText="greetText"></span>
    <input type="text" bind-model="greetText"/>
</p>
"#;

fn greeter(log: &Log) -> Component {
    let watched = log.clone();
    let changes = log.clone();

    Component::new("greeter", GREETER)
        .unwrap()
        .state(|| {
            json!({
                "hello": "Private",
                "isButtonInVisible": false,
                "user": { "name": "Armen" },
            })
        })
        .method("changeContent", |this: &Reactive| -> Result<(), PathError> {
            let hidden = this.get("isButtonInVisible")?.as_bool().unwrap_or(false);

            this.set("isButtonInVisible", !hidden)?;
            this.at("user")?.set("name", "Vardanyan")?;

            Ok(())
        })
        .watch("hello", move |_: &Reactive, previous: &Value, current: &Value| {
            watched.borrow_mut().push(format!("watch {previous} -> {current}"));
        })
        .on_changes(move |_: &Reactive, change: &Change| {
            changes.borrow_mut().push(format!("hook {}", change.path));
        })
}

fn nested(log: &Log) -> Component {
    let greeted = log.clone();

    Component::new("nested", NESTED)
        .unwrap()
        .state(|| json!({ "greetText": "Hello, moto!" }))
        .method("greet", move |_: &Reactive| {
            greeted.borrow_mut().push(String::from("greet"));
        })
}

fn mount(log: &Log) -> (MemoryDom, MemoryNode, Module<MemoryDom>) {
    let dom = MemoryDom::new();
    let root = dom.element("greeter");
    let module = Module::new([greeter(log), nested(log)], root.clone(), dom.clone()).unwrap();

    (dom, root, module)
}

fn single(template: &str, state: Value) -> (MemoryNode, Module<MemoryDom>) {
    let dom = MemoryDom::new();
    let root = dom.element("single");
    let component = Component::new("single", template)
        .unwrap()
        .state(move || state.clone());

    let module = Module::new([component], root.clone(), dom).unwrap();

    (root, module)
}

#[test]
fn model_binding_round_trip() {
    let (root, module) = single(r#"<input bind-model="x"/>"#, json!({ "x": "a" }));
    let input = root.find("input").unwrap();

    assert_eq!(input.value(), "a");

    input.set_value("b");
    input.dispatch("input");

    assert_eq!(module.state().get("x").unwrap(), json!("b"));

    module.state().set("x", "c").unwrap();

    assert_eq!(input.value(), "c");
}

#[test]
fn clicks_call_method_once_each() {
    let template = r#"<button on-click="inc()"></button>"#;
    let dom = MemoryDom::new();
    let root = dom.element("clicker");

    let clicker = Component::new("clicker", template)
        .unwrap()
        .state(|| json!({ "count": 0 }))
        .method("inc", |this: &Reactive| {
            this.update("count", |n| json!(n.as_i64().unwrap_or(0) + 1)).map(drop)
        });

    let module = Module::new([clicker], root.clone(), dom).unwrap();
    let button = root.find("button").unwrap();

    for _ in 0..17 {
        button.dispatch("click");
    }

    assert_eq!(module.state().get("count").unwrap(), json!(17));
}

#[test]
fn unknown_root_fails_before_touching_dom() {
    let log = Log::default();
    let dom = MemoryDom::new();
    let root = dom.element("main");

    let result = Module::new([greeter(&log), nested(&log)], root.clone(), dom.clone());

    assert!(matches!(result, Err(Error::UnknownRoot { ref tag }) if tag == "main"));
    assert_eq!(dom.mutations(), 0);
    assert!(root.children().is_empty());
}

#[test]
fn root_tag_is_case_insensitive() {
    let dom = MemoryDom::new();
    let root = dom.element("GREETER");
    let log = Log::default();

    assert!(Module::new([greeter(&log), nested(&log)], root, dom).is_ok());
}

#[test]
fn renders_greeter() {
    let log = Log::default();
    let (_, root, module) = mount(&log);

    let div = root.find("div").unwrap();

    assert_eq!(div.property("className"), Some(json!("alert")));
    assert_eq!(div.property("style"), Some(json!("background-color: aqua")));
    assert_eq!(root.find("input").unwrap().value(), "Private");
    // Bound text goes in before the static children, until the first change
    assert_eq!(root.find("span").unwrap().text_content(), "ArmenHover me");
    assert_eq!(root.find_all("nested").len(), 5);
    assert_eq!(root.find_all("p").len(), 5);

    // greeter + five nested
    assert_eq!(module.instances().len(), 6);
    assert_eq!(module.instances()[0].selector(), "greeter");
    assert_eq!(module.instances_of("nested").count(), 5);

    let toggled = root.find_all("span").pop().unwrap();
    assert_eq!(toggled.property("hidden"), Some(json!(false)));
    assert!(toggled.text_content().contains("togglable"));
}

#[test]
fn click_updates_bound_properties() {
    let log = Log::default();
    let (_, root, module) = mount(&log);

    root.find("button").unwrap().dispatch("click");

    let toggled = root.find_all("span").pop().unwrap();

    assert_eq!(toggled.property("hidden"), Some(json!(true)));
    assert_eq!(root.find("span").unwrap().text_content(), "Vardanyan");
    assert_eq!(module.state().get("user.name").unwrap(), json!("Vardanyan"));
}

#[test]
fn change_hook_runs_after_the_turn() {
    let log = Log::default();
    let (dom, root, _module) = mount(&log);

    root.find("button").unwrap().dispatch("click");

    assert!(log.borrow().is_empty());
    assert_eq!(dom.run_pending(), 2);
    assert_eq!(*log.borrow(), ["hook isButtonInVisible", "hook user.name"]);
}

#[test]
fn watcher_sees_typed_input() {
    let log = Log::default();
    let (dom, root, _module) = mount(&log);

    let input = root.find("input").unwrap();
    input.set_value("World");
    input.dispatch("input");

    // Same value again, no change
    input.dispatch("input");

    assert_eq!(*log.borrow(), [r#"watch "Private" -> "World""#]);

    dom.run_pending();

    assert_eq!(log.borrow().len(), 2);
    assert_eq!(log.borrow()[1], "hook hello");
}

#[test]
fn nested_instances_are_independent() {
    let log = Log::default();
    let (_, root, module) = mount(&log);

    let containers = root.find_all("nested");
    let third = module.instances_of("nested").nth(2).unwrap();

    assert!(third.container().ptr_eq(&containers[2]));

    third.state().set("greetText", "Bye").unwrap();

    let texts: Vec<String> = containers
        .iter()
        .map(|nested| nested.find("span").unwrap().text_content())
        .collect();

    assert_eq!(
        texts,
        ["Hello, moto!", "Hello, moto!", "Bye", "Hello, moto!", "Hello, moto!"]
    );

    // Typing into the first nested input only touches the first instance
    let input = containers[0].find("input").unwrap();
    input.set_value("Hey");
    input.dispatch("input");

    let states: Vec<Value> = module
        .instances_of("nested")
        .map(|nested| nested.state().get("greetText").unwrap())
        .collect();

    assert_eq!(
        states,
        [
            json!("Hey"),
            json!("Hello, moto!"),
            json!("Bye"),
            json!("Hello, moto!"),
            json!("Hello, moto!"),
        ]
    );
}

#[test]
fn nested_listeners_call_nested_methods() {
    let log = Log::default();
    let (_, root, _module) = mount(&log);

    for a in root.find_all("a") {
        a.dispatch("click");
    }

    assert_eq!(log.borrow().len(), 5);
    assert!(log.borrow().iter().all(|entry| entry == "greet"));
}

#[test]
fn model_on_non_input_fails() {
    let dom = MemoryDom::new();
    let root = dom.element("broken");
    let broken = Component::new("broken", r#"<div bind-model="x"></div>"#)
        .unwrap()
        .state(|| json!({ "x": 1 }));

    let result = Module::new([broken], root.clone(), dom);

    assert!(matches!(result, Err(Error::ModelOnNonInput { ref tag }) if tag == "div"));
    assert!(root.children().is_empty());
}

#[test]
fn unknown_method_fails() {
    let dom = MemoryDom::new();
    let root = dom.element("broken");
    let broken = Component::new("broken", r#"<button on-click="missing()"/>"#).unwrap();

    let result = Module::new([broken], root, dom);

    assert!(matches!(
        result,
        Err(Error::UnknownMethod { ref method, .. }) if method == "missing"
    ));
}

#[test]
fn missing_binding_path_fails() {
    let dom = MemoryDom::new();
    let root = dom.element("broken");
    let broken = Component::new("broken", r#"<span bind-innerText="user.name"/>"#)
        .unwrap()
        .state(|| json!({ "user": null }));

    let result = Module::new([broken], root.clone(), dom);

    assert!(matches!(result, Err(Error::Path(PathError::NotAnObject { .. }))));
    assert!(root.children().is_empty());
}

#[test]
fn recursive_component_fails() {
    let dom = MemoryDom::new();
    let root = dom.element("tree");
    let tree = Component::new("tree", "<ul><li><tree/></li></ul>").unwrap();

    let result = Module::new([tree], root, dom);

    assert!(matches!(result, Err(Error::Recursive { ref selector }) if selector == "tree"));
}

#[test]
fn replacing_ancestor_updates_binding() {
    let (root, module) = single(
        r#"<span bind-innerText="user.name"/>"#,
        json!({ "user": { "name": "Armen" } }),
    );

    module
        .state()
        .set("user", json!({ "name": "Vardanyan" }))
        .unwrap();

    assert_eq!(root.text_content(), "Vardanyan");
}

#[test]
fn static_markup() {
    let (root, _module) = single(
        r#"<p class="note" title="a &amp; b">Plain <b>text</b></p>"#,
        json!({}),
    );

    assert_eq!(
        root.to_html(),
        r#"<single><p class="note" title="a &amp; b">Plain <b>text</b></p></single>"#
    );
}

#[test]
fn notifications_keep_write_order() {
    let (_, module) = single("<p/>", json!({ "a": 0, "b": 0 }));
    let seen: Log = Log::default();

    let log = seen.clone();
    let _subscription = module.state().subscribe(move |change| {
        if let Some(change) = change {
            log.borrow_mut().push(format!("{}={}", change.path, change.current));
        }
    });

    let state = module.state();
    state.set("a", 1).unwrap();
    state.set("b", 1).unwrap();
    state.set("a", 1).unwrap();
    state.set("a", 2).unwrap();

    assert_eq!(*seen.borrow(), ["a=1", "b=1", "a=2"]);
}

#[test]
fn unmount_releases_bindings() {
    let log = Log::default();
    let (_, root, module) = mount(&log);

    let state = module.state().clone();
    let button = root.find("button").unwrap();

    assert_eq!(state.subscriber_count(), 3);
    assert_eq!(button.listener_count(), 1);
    assert_eq!(module.instances()[0].listener_count(), 2);

    module.unmount();

    assert_eq!(state.subscriber_count(), 0);
    assert_eq!(button.listener_count(), 0);
    assert_eq!(button.dispatch("click"), 0);

    // The DOM stays in place
    assert_eq!(root.find_all("nested").len(), 5);
}
