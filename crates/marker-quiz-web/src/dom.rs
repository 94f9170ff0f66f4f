use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use marker_quiz::bridge::protocol::{
    element_label, final_score_lines, grade_status, outcome_status, timer_color, StatusLine,
    ELEMENT_DISPLAY_ID, ELEMENT_LABEL, FOUND_COUNT_ID, GAME_STATUS_ID, GAME_UI_ID, HINT_TEXT,
    PROGRESS_ID, PROGRESS_LABEL, REQUIRED_COUNT_ID, RESTART_BUTTON_ID, RESTART_LABEL,
    SCORE_DISPLAY_ID, SCORE_LABEL, TIMER_ID, TIME_DISPLAY_ID, TIME_LABEL, TOTAL_COUNT_ID,
};
use marker_quiz::{FinalScore, QuizEvent, QuizView, TrackingEvent};

use crate::scene::{mount_scene, MountedScene};

const PANEL_STYLE: &str = "position: fixed; top: 20px; left: 20px; z-index: 1000; \
    background: rgba(0, 0, 0, 0.8); color: white; padding: 15px 20px; border-radius: 10px; \
    font-family: Arial, sans-serif; font-size: 18px; min-width: 250px;";

const HINT_STYLE: &str = "font-size: 14px; color: #cccccc; margin-top: 5px;";

const RESTART_STYLE: &str = "margin-top: 15px; padding: 10px 20px; background: #4CAF50; \
    color: white; border: none; border-radius: 5px; cursor: pointer; font-size: 16px; width: 100%;";

/// Inner markup of the HUD panel.
pub fn hud_markup(round_seconds: u32) -> String {
    format!(
        "<div id=\"{timer}\">{time_label}: <span id=\"{time}\">{round_seconds}</span>s</div>\
         <div id=\"element\">{element_label}: <span id=\"{element}\"></span></div>\
         <div id=\"{progress}\">{progress_label}: <span id=\"{found}\">0</span>/<span id=\"{required}\">0</span></div>\
         <div id=\"score\">{score_label}: <span id=\"{score}\">0</span>/<span id=\"{total}\">0</span></div>\
         <div style=\"{hint_style}\">{hint}</div>\
         <div id=\"{status}\"></div>",
        timer = TIMER_ID,
        time_label = TIME_LABEL,
        time = TIME_DISPLAY_ID,
        element_label = ELEMENT_LABEL,
        element = ELEMENT_DISPLAY_ID,
        progress = PROGRESS_ID,
        progress_label = PROGRESS_LABEL,
        found = FOUND_COUNT_ID,
        required = REQUIRED_COUNT_ID,
        score_label = SCORE_LABEL,
        score = SCORE_DISPLAY_ID,
        total = TOTAL_COUNT_ID,
        hint_style = HINT_STYLE,
        hint = HINT_TEXT,
        status = GAME_STATUS_ID,
    )
}

/// Round result banner.
pub fn status_markup(line: StatusLine) -> String {
    format!(
        "<div style=\"color: {}; font-weight: bold;\">{}</div>",
        line.color, line.text
    )
}

/// Final score panel.
pub fn final_markup(summary: &FinalScore) -> String {
    let color = grade_status(summary.grade).color;
    format!(
        "<div style=\"color: {}; font-weight: bold; font-size: 20px; text-align: center;\">{}</div>",
        color,
        final_score_lines(summary).join("<br>")
    )
}

/// The restart button and its click listener. Dropping it removes the button.
struct RestartButton {
    element: Element,
    _listener: Closure<dyn FnMut(Event)>,
}

impl Drop for RestartButton {
    fn drop(&mut self) {
        self.element.remove();
    }
}

/// Renders quiz events into the page.
pub struct DomView {
    document: Document,
    scene: Option<MountedScene>,
    restart: Option<RestartButton>,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            scene: None,
            restart: None,
        }
    }

    /// Create the HUD panel unless the page already provides one.
    pub fn mount_hud(&self, round_seconds: u32) -> Result<(), JsValue> {
        if self.document.get_element_by_id(GAME_UI_ID).is_some() {
            return Ok(());
        }
        let panel = self.document.create_element("div")?;
        panel.set_id(GAME_UI_ID);
        panel.set_attribute("style", PANEL_STYLE)?;
        panel.set_inner_html(&hud_markup(round_seconds));
        self.document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&panel)?;
        Ok(())
    }

    fn element(&self, id: &str) -> Result<Element, JsValue> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))
    }

    fn set_text(&self, id: &str, text: &str) -> Result<(), JsValue> {
        self.element(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_status(&self, html: &str) -> Result<(), JsValue> {
        self.element(GAME_STATUS_ID)?.set_inner_html(html);
        Ok(())
    }

    fn offer_restart(&mut self) -> Result<(), JsValue> {
        let button = self.document.create_element("button")?;
        button.set_id(RESTART_BUTTON_ID);
        button.set_attribute("style", RESTART_STYLE)?;
        button.set_text_content(Some(RESTART_LABEL));

        let listener = Closure::wrap(Box::new(move |_: Event| {
            crate::push_tracking(TrackingEvent::Restart);
        }) as Box<dyn FnMut(Event)>);
        button.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
        self.element(GAME_STATUS_ID)?.append_child(&button)?;
        self.restart = Some(RestartButton {
            element: button,
            _listener: listener,
        });
        Ok(())
    }

    fn try_apply(&mut self, event: &QuizEvent) -> Result<(), JsValue> {
        match event {
            QuizEvent::RoundStarted { element, formula, required, .. } => {
                self.set_text(ELEMENT_DISPLAY_ID, &element_label(element, formula))?;
                self.set_text(REQUIRED_COUNT_ID, &required.to_string())?;
                self.restart = None;
                self.set_status("")?;
            }
            QuizEvent::SceneLoaded(decl) => {
                self.scene = None;
                self.scene = Some(mount_scene(&self.document, decl)?);
            }
            QuizEvent::SceneUnloaded => self.scene = None,
            QuizEvent::TimeChanged { seconds, band } => {
                self.set_text(TIME_DISPLAY_ID, &seconds.to_string())?;
                let timer: HtmlElement = self.element(TIMER_ID)?.dyn_into()?;
                timer.style().set_property("color", timer_color(*band))?;
            }
            QuizEvent::VisibleChanged { visible, required } => {
                self.set_text(FOUND_COUNT_ID, &visible.to_string())?;
                self.set_text(REQUIRED_COUNT_ID, &required.to_string())?;
            }
            QuizEvent::ScoreChanged { score, total } => {
                self.set_text(SCORE_DISPLAY_ID, &score.to_string())?;
                self.set_text(TOTAL_COUNT_ID, &total.to_string())?;
            }
            QuizEvent::RoundEnded { outcome } => {
                self.set_status(&status_markup(outcome_status(*outcome)))?;
            }
            QuizEvent::SessionFinished(summary) => {
                self.set_status(&final_markup(summary))?;
            }
            QuizEvent::RestartOffered => self.offer_restart()?,
        }
        Ok(())
    }
}

impl QuizView for DomView {
    fn apply(&mut self, event: &QuizEvent) {
        if let Err(err) = self.try_apply(event) {
            log::error!("Failed to render {:?}: {:?}", event, err);
        }
    }
}
