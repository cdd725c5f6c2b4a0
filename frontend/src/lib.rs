pub mod api;
pub mod config;
pub mod pages;
pub mod sound;
pub mod styles;

use yew::prelude::*;

use crate::pages::wheel::WheelPage;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <main class={styles::CONTAINER}>
            <WheelPage />
        </main>
    }
}
