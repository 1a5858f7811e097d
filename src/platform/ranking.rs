//! Rankings modal
//!
//! Opens over the game, lists the top scores and lets the player save the
//! score of the last round. Each fetch and save is its own async round-trip.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlInputElement};

use super::dom::{element, set_class, set_text};
use super::hud::{RankingView, ranking_view};
use crate::leaderboard::{Leaderboard, fetch_rankings, submit_and_refresh};

pub struct RankingPanel<L> {
    board: L,
    document: Document,
    modal: Element,
    list: Element,
    /// Score offered by the save form
    last_score: Cell<u64>,
}

impl<L: Leaderboard + 'static> RankingPanel<L> {
    /// `None` when the modal markup is missing
    pub fn find(document: &Document, board: L) -> Option<Rc<Self>> {
        let modal = element(document, "ranking-modal")?;
        let list = element(document, "ranking-list")?;
        Some(Rc::new(Self {
            board,
            document: document.clone(),
            modal,
            list,
            last_score: Cell::new(0),
        }))
    }

    pub fn set_last_score(&self, score: u64) {
        self.last_score.set(score);
    }

    pub fn open(self: &Rc<Self>) {
        set_class(&self.modal, "hidden", false);
        self.refresh();
    }

    pub fn close(&self) {
        set_class(&self.modal, "hidden", true);
    }

    pub fn refresh(self: &Rc<Self>) {
        self.render(&RankingView::Loading);
        let panel = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_rankings(&panel.board).await;
            panel.render(&ranking_view(&result, js_sys::Date::now()));
        });
    }

    pub fn save(self: &Rc<Self>, name: String) {
        let score = self.last_score.get();
        let panel = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            match submit_and_refresh(&panel.board, &name, score).await {
                Ok(records) => {
                    panel.render(&ranking_view(&Ok(records), js_sys::Date::now()));
                }
                Err(e) if e.is_invalid_submission() => {
                    log::info!("Score not saved: {}", e);
                }
                Err(e) => {
                    log::error!("Error saving score: {}", e);
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(e.notice());
                    }
                }
            }
        });
    }

    fn render(&self, view: &RankingView) {
        self.list.set_inner_html("");
        if let Some(text) = view.placeholder() {
            if let Err(e) = self.append_row(&[("", text)]) {
                log::error!("Failed to render rankings: {:?}", e);
            }
            return;
        }
        if let RankingView::Rows(rows) = view {
            for row in rows {
                let rank = format!("#{}", row.rank);
                let score = row.score.to_string();
                let cells = [
                    ("rank", rank.as_str()),
                    ("name", row.name.as_str()),
                    ("score-val", score.as_str()),
                    ("when", row.when.as_str()),
                ];
                if let Err(e) = self.append_row(&cells) {
                    log::error!("Failed to render rankings: {:?}", e);
                    return;
                }
            }
        }
    }

    /// One `<li>`; names go in as text, never markup
    fn append_row(&self, cells: &[(&str, &str)]) -> Result<(), JsValue> {
        let li = self.document.create_element("li")?;
        if let [("", text)] = cells {
            set_text(&li, text);
        } else {
            for (class, text) in cells {
                let span = self.document.create_element("span")?;
                span.set_class_name(class);
                set_text(&span, text);
                li.append_child(&span)?;
            }
        }
        self.list.append_child(&li)?;
        Ok(())
    }

    /// Wire the open/close/save controls
    pub fn bind(self: &Rc<Self>) {
        if let Some(btn) = element(&self.document, "ranking-btn") {
            let panel = Rc::clone(self);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                panel.open();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = element(&self.document, "close-ranking-btn") {
            let panel = Rc::clone(self);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                panel.close();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Clicking the backdrop closes the modal
        if let Some(window) = web_sys::window() {
            let panel = Rc::clone(self);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let modal: &EventTarget = panel.modal.as_ref();
                if event.target().as_ref() == Some(modal) {
                    panel.close();
                }
            });
            let _ =
                window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = element(&self.document, "save-score-btn") {
            let panel = Rc::clone(self);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let name = panel
                    .document
                    .get_element_by_id("player-name")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                panel.save(name);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}
