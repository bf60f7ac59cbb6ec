use hob::path::PathError;
use hob::prelude::*;
use log::{debug, info};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Greeter {
    hello: &'static str,
    is_button_in_visible: bool,
    user: User,
}

#[derive(Serialize)]
struct User {
    name: &'static str,
}

fn greeter() -> Result<Component, Error> {
    let template = r#"
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

    let state = Greeter {
        hello: "Private",
        is_button_in_visible: false,
        user: User { name: "Armen" },
    };

    Ok(Component::new("greeter", template)?
        .state_from(&state)?
        .method("changeContent", |this: &Reactive| -> Result<(), PathError> {
            let hidden = this.get("isButtonInVisible")?.as_bool().unwrap_or(false);

            this.set("isButtonInVisible", !hidden)?;
            this.at("user")?.set("name", "Vardanyan")?;

            Ok(())
        })
        .watch("hello", |_: &Reactive, previous: &Value, current: &Value| {
            info!("hello changed from {previous} to {current}");
        })
        .on_changes(|_: &Reactive, change: &Change| {
            debug!("{} changed from {} to {}", change.path, change.previous, change.current);
        }))
}

fn nested() -> Result<Component, Error> {
    let template = r#"
        <p>Paragraph is nested!
            <a on-click="greet()">Hi!</a>
            <span bind-innerText="greetText"></span>
            <input type="text" bind-model="greetText"/>
        </p>
    "#;

    Ok(Component::new("nested", template)?
        .state(|| serde_json::json!({ "greetText": "Hello, moto!" }))
        .method("greet", |this: &Reactive| -> Result<(), PathError> {
            info!("{}", this.get("greetText")?);

            Ok(())
        }))
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());

    let started = greeter()
        .and_then(|greeter| Ok([greeter, nested()?]))
        .and_then(|components| hob::web::start(components, "root"));

    if let Err(err) = started {
        log::error!("{err}");
    }
}
