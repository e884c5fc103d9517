use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{Header, StartView, TestView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", StartView)] Start {},
        #[route("/test", TestView)] Test {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
