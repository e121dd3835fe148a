//! DOM construction and element bindings.
//!
//! The form is built once at startup under the mount point and every element
//! the handlers touch is kept in [`Elements`].

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlOptionElement};
use wslp_types::FormField;

pub const TOKEN_LIST_ID: &str = "wslp-tokens";

// ── Helpers ──

fn doc() -> Document {
    gloo_utils::document()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    doc().create_element(tag)
}

pub fn create_typed<T: JsCast>(tag: &str) -> Result<T, JsValue> {
    create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("<{tag}> has an unexpected type")))
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn set_input_value(el: &HtmlInputElement, val: &str) {
    el.set_value(val);
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn create_option(value: &str, text: &str) -> Result<HtmlOptionElement, JsValue> {
    let opt: HtmlOptionElement = create_typed("option")?;
    opt.set_value(value);
    opt.set_text_content(Some(text));
    Ok(opt)
}

fn text_block(tag: &str, class: &str, text: &str) -> Result<Element, JsValue> {
    let el = create_element(tag)?;
    add_class(&el, class);
    set_text(&el, text);
    Ok(el)
}

/// Labelled text input named after its form field.
fn field(
    form: &Element,
    field: FormField,
    label: &str,
    placeholder: &str,
) -> Result<HtmlInputElement, JsValue> {
    let wrapper = create_element("label")?;
    add_class(&wrapper, "form-field");
    wrapper.append_child(&text_block("span", "form-field-label", label)?.into())?;

    let input: HtmlInputElement = create_typed("input")?;
    input.set_type("text");
    input.set_name(field.name());
    input.set_placeholder(placeholder);
    input.set_autocomplete("off");
    wrapper.append_child(&input)?;

    form.append_child(&wrapper)?;
    Ok(input)
}

// ── Elements struct ──

/// All DOM element references used by the return form.
#[derive(Clone)]
pub struct Elements {
    pub form: HtmlFormElement,
    pub token_input: HtmlInputElement,
    pub token_list: Element,
    pub balance_row: HtmlElement,
    pub balance_value: Element,
    pub amount_input: HtmlInputElement,
    pub destination_input: HtmlInputElement,
    pub destination_hint: Element,
    pub submit_btn: HtmlButtonElement,
    pub toasts: Element,
}

impl Elements {
    /// Build the form under `#{mount_id}`, or under `<body>` when the mount
    /// point is missing.
    pub fn mount(mount_id: &str) -> Result<Self, JsValue> {
        let parent: Element = match by_id(mount_id) {
            Some(el) => el,
            None => doc()
                .body()
                .ok_or_else(|| JsValue::from_str("document has no body"))?
                .into(),
        };

        let section = create_element("section")?;
        add_class(&section, "wslp-return");
        section.append_child(&text_block("h2", "wslp-return-title", "WSLP (ERC20) - SLP Route")?.into())?;
        section.append_child(&text_block(
            "p",
            "wslp-return-description",
            "Return SLP tokens to the base",
        )?.into())?;

        let form: HtmlFormElement = create_typed("form")?;
        add_class(&form, "wslp-return-form");

        let token_input = field(
            &form,
            FormField::SourceTokenAddress,
            "ERC20 Token address",
            "e.g. 0xf42Fd6e5a...",
        )?;
        token_input.set_attribute("list", TOKEN_LIST_ID)?;

        let token_list = create_element("datalist")?;
        token_list.set_id(TOKEN_LIST_ID);
        form.append_child(&token_list)?;

        let balance_row: HtmlElement = create_typed("div")?;
        add_class(&balance_row, "balance-row");
        balance_row.append_child(&text_block("span", "balance-label", "Balance:")?.into())?;
        let balance_value = text_block("span", "balance-value", "")?;
        balance_row.append_child(&balance_value)?;
        balance_row.set_hidden(true);
        form.append_child(&balance_row)?;

        let amount_input = field(&form, FormField::Amount, "ERC20 Amount", "e.g. 123.45")?;
        let destination_input = field(
            &form,
            FormField::DestinationAddress,
            "SLP destination address",
            "e.g. simpleledger:qrx2z6d...",
        )?;
        let destination_hint = text_block("small", "destination-hint", "")?;
        form.append_child(&destination_hint)?;

        let actions = create_element("div")?;
        add_class(&actions, "form-actions");
        let submit_btn: HtmlButtonElement = create_typed("button")?;
        submit_btn.set_type("submit");
        submit_btn.set_text_content(Some("To the future!"));
        actions.append_child(&submit_btn)?;
        form.append_child(&actions)?;

        section.append_child(&form)?;

        let toasts = create_element("div")?;
        add_class(&toasts, "toasts");
        section.append_child(&toasts)?;

        parent.append_child(&section)?;

        Ok(Self {
            form,
            token_input,
            token_list,
            balance_row,
            balance_value,
            amount_input,
            destination_input,
            destination_hint,
            submit_btn,
            toasts,
        })
    }
}
