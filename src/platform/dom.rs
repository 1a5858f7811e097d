//! DOM view of the game
//!
//! `BubbleView` maps bubble ids to their elements; `Hud` owns the text
//! slots and the start/retry overlay. Both only react to `GameEvent`s.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use super::hud::{HudField, HudUpdate, hud_updates};
use crate::consts::BUBBLE_RADIUS;
use crate::sim::{BubbleId, GameEvent};

/// Look up an element by id, logging when it's missing
pub fn element(document: &Document, id: &str) -> Option<Element> {
    let el = document.get_element_by_id(id);
    if el.is_none() {
        log::warn!("Element #{} not found", id);
    }
    el
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    let classes = el.class_list();
    let result = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if let Err(e) = result {
        log::warn!("Failed to toggle class {}: {:?}", class, e);
    }
}

/// Remove `el` from the page after `delay_ms`
fn remove_later(el: Element, delay_ms: f64) {
    let Some(window) = web_sys::window() else {
        el.remove();
        return;
    };
    let closure = Closure::once(move || el.remove());
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        delay_ms as i32,
    );
    closure.forget();
}

/// Bubble elements inside the play-area container
pub struct BubbleView {
    document: Document,
    container: Element,
    elements: HashMap<BubbleId, HtmlElement>,
}

impl BubbleView {
    pub fn new(document: Document, container: Element) -> Self {
        Self {
            document,
            container,
            elements: HashMap::new(),
        }
    }

    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::BubbleSpawned { id, value, pos } => {
                if let Err(e) = self.spawn(*id, *value, *pos) {
                    log::error!("Failed to create bubble {}: {:?}", id, e);
                }
            }
            GameEvent::BubblePopped {
                id,
                remove_after_ms,
            } => {
                if let Some(el) = self.elements.remove(id) {
                    set_class(&el, "selected", false);
                    set_class(&el, "pop", true);
                    remove_later(el.into(), *remove_after_ms);
                }
            }
            GameEvent::BubblesCleared => {
                self.elements.clear();
                self.container.set_inner_html("");
            }
            GameEvent::SelectionChanged { ids, .. } => {
                for (id, el) in &self.elements {
                    set_class(el, "selected", ids.contains(id));
                }
            }
            GameEvent::MatchFailed { ids, .. } => {
                for id in ids {
                    if let Some(el) = self.elements.get(id) {
                        set_class(el, "incorrect", true);
                    }
                }
            }
            GameEvent::FailMarksCleared => {
                for el in self.elements.values() {
                    set_class(el, "incorrect", false);
                }
            }
            _ => {}
        }
    }

    fn spawn(&mut self, id: BubbleId, value: u32, pos: glam::Vec2) -> Result<(), JsValue> {
        let el: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        el.set_class_name("bubble");
        el.set_text_content(Some(&value.to_string()));
        el.set_attribute("data-id", &id.to_string())?;

        let style = el.style();
        style.set_property("left", &format!("{}px", pos.x - BUBBLE_RADIUS))?;
        style.set_property("top", &format!("{}px", pos.y - BUBBLE_RADIUS))?;

        self.container.append_child(&el)?;
        self.elements.insert(id, el);
        Ok(())
    }
}

/// HUD text slots and the start/retry overlay
pub struct Hud {
    target: Option<Element>,
    score: Option<Element>,
    level: Option<Element>,
    timer: Option<Element>,
    current_sum: Option<Element>,
    selection_info: Option<Element>,
    overlay: Option<Element>,
    overlay_title: Option<Element>,
    overlay_msg: Option<Element>,
    start_btn: Option<Element>,
}

impl Hud {
    pub fn find(document: &Document) -> Self {
        Self {
            target: element(document, "target-number"),
            score: element(document, "score"),
            level: element(document, "level"),
            timer: element(document, "timer"),
            current_sum: element(document, "current-sum"),
            selection_info: element(document, "selection-info"),
            overlay: element(document, "overlay"),
            overlay_title: element(document, "overlay-title"),
            overlay_msg: element(document, "overlay-msg"),
            start_btn: element(document, "start-btn"),
        }
    }

    fn field(&self, field: HudField) -> Option<&Element> {
        match field {
            HudField::Target => self.target.as_ref(),
            HudField::Score => self.score.as_ref(),
            HudField::Level => self.level.as_ref(),
            HudField::Timer => self.timer.as_ref(),
            HudField::CurrentSum => self.current_sum.as_ref(),
        }
    }

    pub fn apply(&self, event: &GameEvent) {
        for update in hud_updates(event) {
            match update {
                HudUpdate::Text(field, text) => {
                    if let Some(el) = self.field(field) {
                        set_text(el, &text);
                    }
                }
                HudUpdate::SelectionVisible(on) => {
                    if let Some(el) = &self.selection_info {
                        set_class(el, "visible", on);
                    }
                }
                HudUpdate::HideOverlay => {
                    if let Some(el) = &self.overlay {
                        set_class(el, "hidden", true);
                    }
                }
                HudUpdate::ShowOverlay {
                    title,
                    message,
                    button,
                } => {
                    if let Some(el) = &self.overlay {
                        set_class(el, "hidden", false);
                    }
                    if let Some(el) = &self.overlay_title {
                        set_text(el, &title);
                    }
                    if let Some(el) = &self.overlay_msg {
                        set_text(el, &message);
                    }
                    if let Some(el) = &self.start_btn {
                        set_text(el, &button);
                    }
                }
            }
        }
    }
}
