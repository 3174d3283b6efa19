use serde_json::Value;
use shared::CheckoutForm;
use wasm_bindgen::{JsCast, JsValue, UnwrapThrowExt};
use web_sys::{Event, HtmlFormElement, HtmlInputElement, HtmlSelectElement, InputEvent};

pub fn get_value_from_input_event(e: InputEvent) -> String {
    let event: Event = e.dyn_into().unwrap_throw();
    let event_target = event.target().unwrap_throw();
    let target: HtmlInputElement = event_target.dyn_into().unwrap_throw();

    target.value()
}

pub fn get_value_from_event(event: Event) -> String {
    let event_target = event.target().unwrap_throw();
    let target: HtmlSelectElement = event_target.dyn_into().unwrap_throw();

    target.value()
}

/// Current SPA location as (pathname, orderId query parameter).
pub fn page_location() -> (String, Option<String>) {
    let location = web_sys::window().unwrap_throw().location();
    let path = location.pathname().unwrap_or_default();
    let search = location.search().unwrap_or_default();

    let order_id = web_sys::UrlSearchParams::new_with_str(&search)
        .ok()
        .and_then(|params| params.get("orderId"));

    (path, order_id)
}

/// Builds a hidden form holding the signed checkout fields and submits it,
/// navigating the browser to the gateway's hosted payment page.
pub fn submit_gateway_form(action: &str, form_data: &CheckoutForm) -> Result<(), JsValue> {
    let document = web_sys::window().unwrap_throw().document().unwrap_throw();

    let form: HtmlFormElement = document.create_element("form")?.dyn_into().unwrap_throw();
    form.set_method("POST");
    form.set_action(action);
    form.set_attribute("style", "display: none")?;

    let Value::Object(fields) = serde_json::to_value(form_data).unwrap_throw() else {
        return Err(JsValue::from_str("checkout form is not a JSON object"));
    };

    for (name, value) in &fields {
        let input: HtmlInputElement = document.create_element("input")?.dyn_into().unwrap_throw();
        input.set_type("hidden");
        input.set_name(name);
        input.set_value(&field_value(value));

        form.append_child(&input)?;
    }

    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(&form)?;

    form.submit()
}

fn field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
