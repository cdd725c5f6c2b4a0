use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Promise, Reflect};
use shared::shared_wheel_game::SpinResult;
use shared::wheel_modes::WheelMode;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::window;
use yew::prelude::*;

use crate::styles;

const COPIED_FEEDBACK_MS: u32 = 1500;

// navigator.clipboard is still behind web-sys's unstable APIs, so go through Reflect
async fn copy_to_clipboard(text: &str) -> Result<(), JsValue> {
    let navigator = window().ok_or_else(|| JsValue::from_str("no window"))?.navigator();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    let write_text: Function = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into()?;
    let promise: Promise = write_text.call1(&clipboard, &JsValue::from_str(text))?.dyn_into()?;
    JsFuture::from(promise).await?;
    Ok(())
}

#[derive(Properties, PartialEq)]
pub struct CopyLinkButtonProps {
    pub label: AttrValue,
    pub url: AttrValue,
    #[prop_or_default]
    pub icon: Html,
}

/// Copies a wiki link and flashes "Copied!" in place of the label.
#[function_component(CopyLinkButton)]
pub fn copy_link_button(props: &CopyLinkButtonProps) -> Html {
    let copied = use_state(|| false);

    let onclick = {
        let copied = copied.clone();
        let url = props.url.clone();
        Callback::from(move |e: MouseEvent| {
            // Keep the modal open
            e.stop_propagation();
            let copied = copied.clone();
            let url = url.clone();
            spawn_local(async move {
                match copy_to_clipboard(&url).await {
                    Ok(()) => {
                        copied.set(true);
                        TimeoutFuture::new(COPIED_FEEDBACK_MS).await;
                        copied.set(false);
                    }
                    Err(e) => log::warn!("Clipboard write failed: {:?}", e),
                }
            });
        })
    };

    html! {
        <button class={styles::RESULT_LINK} {onclick} title={props.url.clone()}>
            { props.icon.clone() }
            <span>{ if *copied { AttrValue::from("Copied!") } else { props.label.clone() } }</span>
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultDisplayProps {
    pub result: Option<SpinResult>,
    pub show: bool,
    pub announce_enabled: bool,
    #[prop_or_default]
    pub announce_message: Option<Result<String, String>>,
    pub on_close: Callback<()>,
    pub on_announce: Callback<()>,
}

#[function_component(ResultDisplay)]
pub fn result_display(props: &ResultDisplayProps) -> Html {
    let Some(result) = props.result.as_ref().filter(|_| props.show) else {
        return html! {};
    };

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let announce = {
        let on_announce = props.on_announce.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_announce.emit(());
        })
    };

    let links = match (result.item.transport_url(), result.item.equipment_url()) {
        (Some(transport), Some(equipment)) => html! {
            <div class={styles::RESULT_LINKS}>
                <CopyLinkButton
                    label="Getting There"
                    url={transport}
                    icon={html! {
                        <svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                            <path d="M9 18l6-6-6-6"/>
                        </svg>
                    }}
                />
                <CopyLinkButton
                    label="Equipment"
                    url={equipment}
                    icon={html! {
                        <svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                            <rect x="5" y="2" width="14" height="20" rx="2" ry="2"/>
                            <line x1="12" y1="18" x2="12" y2="18"/>
                        </svg>
                    }}
                />
            </div>
        },
        _ => html! {},
    };

    let status = match &props.announce_message {
        Some(Ok(message)) => html! { <p class={styles::TEXT_SUCCESS}>{ message }</p> },
        Some(Err(message)) => html! { <p class={styles::TEXT_ERROR}>{ message }</p> },
        None => html! {},
    };

    html! {
        <div class={styles::MODAL_OVERLAY} onclick={close}>
            <div class={styles::RESULT_CARD}>
                if let Some(asset) = result.asset.clone() {
                    <img src={asset} class={styles::RESULT_IMAGE} crossorigin="anonymous" alt={result.item.name.clone()} />
                }
                <div class={styles::RESULT_TEXT}>{ &result.item.name }</div>
                { links }
                if props.announce_enabled {
                    <button class={styles::BUTTON_ANNOUNCE} onclick={announce}>
                        { "Announce on Discord" }
                    </button>
                }
                { status }
                <p class={classes!(styles::TEXT_SMALL, "mt-4")}>{ "Click anywhere to close" }</p>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SpinButtonProps {
    pub is_spinning: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(SpinButton)]
pub fn spin_button(props: &SpinButtonProps) -> Html {
    let button_class = if props.is_spinning {
        "bg-gray-600 opacity-75 cursor-not-allowed text-gray-300"
    } else {
        "bg-[#FFFF00] hover:bg-yellow-300 text-black shadow-lg hover:shadow-xl transform hover:-translate-y-0.5 active:translate-y-0"
    };

    let spin_icon_class = if props.is_spinning { "inline-block mr-2 animate-spin" } else { "hidden" };

    html! {
        <button
            onclick={props.onclick.clone()}
            disabled={props.is_spinning}
            class={classes!(
                "w-full",
                "max-w-xs",
                "mx-auto",
                "block",
                "mt-6",
                "px-8",
                "py-4",
                "rounded-full",
                "font-bold",
                "text-lg",
                "transition-all",
                "duration-300",
                "focus:outline-none",
                "focus:ring-4",
                "focus:ring-yellow-300",
                "focus:ring-opacity-50",
                button_class,
            )}
        >
            <div class="flex items-center justify-center">
                <svg class={spin_icon_class} xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
                    <circle cx="12" cy="12" r="10" />
                    <path d="M12 6v6l4 2" />
                </svg>
                <span>{ if props.is_spinning { "Spinning..." } else { "SPIN" } }</span>
            </div>
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct ModeSelectorProps {
    pub selected: WheelMode,
    pub disabled: bool,
    pub onchange: Callback<WheelMode>,
}

/// Radio group for the three wheels; locked while a spin runs.
#[function_component(ModeSelector)]
pub fn mode_selector(props: &ModeSelectorProps) -> Html {
    html! {
        <div class={styles::MODE_GROUP} role="radiogroup">
            { for WheelMode::ALL.iter().map(|mode| {
                let mode = *mode;
                let checked = mode == props.selected;
                let class = if props.disabled {
                    styles::MODE_OPTION_DISABLED
                } else if checked {
                    styles::MODE_OPTION_ACTIVE
                } else {
                    styles::MODE_OPTION
                };
                let onchange = {
                    let onchange = props.onchange.clone();
                    Callback::from(move |_: Event| onchange.emit(mode))
                };
                html! {
                    <label {class}>
                        <input
                            type="radio"
                            name="config"
                            class="sr-only"
                            value={mode.label()}
                            {checked}
                            disabled={props.disabled}
                            {onchange}
                        />
                        { mode.title_label() }
                    </label>
                }
            }) }
        </div>
    }
}
