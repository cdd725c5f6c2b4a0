use shared::code_entry::{CodeEntry, EntryAction};
use shared::constants::CODE_LENGTH;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement, HtmlInputElement};
use yew::prelude::*;

use crate::styles;

fn field_id(index: usize) -> String {
    format!("code-input-{}", index)
}

fn focus_field(index: usize) {
    let element = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&field_id(index)))
        .and_then(|e| e.dyn_into::<HtmlElement>().ok());
    if let Some(element) = element {
        let _ = element.focus();
    }
}

#[derive(Properties, PartialEq)]
pub struct CodeEntryModalProps {
    pub show: bool,
    pub submitting: bool,
    #[prop_or_default]
    pub error: Option<String>,
    pub on_submit: Callback<String>,
    pub on_close: Callback<()>,
}

/// Six single-digit fields for the authenticator code.
#[function_component(CodeEntryModal)]
pub fn code_entry_modal(props: &CodeEntryModalProps) -> Html {
    let entry = use_mut_ref(CodeEntry::new);
    let redraw = use_force_update();

    // Reset and grab focus whenever the modal opens
    {
        let entry = entry.clone();
        let redraw = redraw.clone();
        use_effect_with(props.show, move |show| {
            if *show {
                entry.borrow_mut().clear();
                redraw.force_update();
                focus_field(0);
            }
            || ()
        });
    }

    if !props.show {
        return html! {};
    }

    let apply = {
        let entry = entry.clone();
        let redraw = redraw.clone();
        let on_submit = props.on_submit.clone();
        move |action: EntryAction| {
            match action {
                EntryAction::None => {}
                EntryAction::Focus(index) => focus_field(index),
                EntryAction::Submit(code) => {
                    entry.borrow_mut().clear();
                    on_submit.emit(code);
                    focus_field(0);
                }
            }
            redraw.force_update();
        }
    };

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let fields = (0..CODE_LENGTH).map(|index| {
        let oninput = {
            let entry = entry.clone();
            let apply = apply.clone();
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                let action = entry.borrow_mut().input(index, &input.value());
                apply(action);
            })
        };

        let onkeydown = {
            let entry = entry.clone();
            let apply = apply.clone();
            let on_close = props.on_close.clone();
            Callback::from(move |e: KeyboardEvent| match e.key().as_str() {
                "Backspace" => {
                    e.prevent_default();
                    let action = entry.borrow_mut().backspace(index);
                    apply(action);
                }
                "Enter" => {
                    e.prevent_default();
                    let action = entry.borrow().enter();
                    apply(action);
                }
                "Escape" => on_close.emit(()),
                _ => {}
            })
        };

        let onpaste = {
            let entry = entry.clone();
            let apply = apply.clone();
            Callback::from(move |e: Event| {
                e.prevent_default();
                let text = e
                    .dyn_ref::<web_sys::ClipboardEvent>()
                    .and_then(|e| e.clipboard_data())
                    .and_then(|data| data.get_data("text").ok())
                    .unwrap_or_default();
                let action = entry.borrow_mut().paste(index, &text);
                apply(action);
            })
        };

        let onfocus = {
            let entry = entry.clone();
            Callback::from(move |e: FocusEvent| {
                entry.borrow_mut().set_focus(index);
                let input: HtmlInputElement = e.target_unchecked_into();
                input.select();
            })
        };

        let value = entry.borrow().digit(index).map(String::from).unwrap_or_default();

        html! {
            <input
                id={field_id(index)}
                type="text"
                inputmode="numeric"
                autocomplete="one-time-code"
                maxlength="1"
                class={styles::CODE_INPUT}
                disabled={props.submitting}
                {value}
                {oninput}
                {onkeydown}
                {onpaste}
                {onfocus}
            />
        }
    });

    html! {
        <div class={styles::MODAL_OVERLAY}>
            <div class={styles::CODE_CARD}>
                <h2 class="text-xl font-bold text-white">{ "Enter authenticator code" }</h2>
                <div class={styles::CODE_ROW}>
                    { for fields }
                </div>
                if props.submitting {
                    <div class="flex justify-center mb-2">
                        <svg class={styles::LOADING_SPINNER} xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24">
                            <circle class="opacity-25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4"></circle>
                            <path class="opacity-75" fill="currentColor" d="M4 12a8 8 0 018-8v8z"></path>
                        </svg>
                    </div>
                }
                if let Some(error) = props.error.clone() {
                    <p class={styles::TEXT_ERROR}>{ error }</p>
                }
                <button class={classes!(styles::BUTTON_SECONDARY, "mt-4")} onclick={close}>
                    { "Cancel" }
                </button>
            </div>
        </div>
    }
}
