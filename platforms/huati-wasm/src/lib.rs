pub mod dto;

use std::collections::HashMap;

use huati_layout::{LayoutConfig, Point};
use huati_protocol::glossary;
use huati_protocol::{Corpus, CorpusPack, GrammarRole, NodeId, SentenceId};
use huati_view::{Controller, FitOptions, FitTicket, HoverRegistry, Rect, RegionHandle};
use wasm_bindgen::prelude::*;

use crate::dto::{BadgeDto, GlossaryDto, LayoutDto};

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// The tree viewer running in the browser.
#[wasm_bindgen]
pub struct TreeViewer {
    corpus: Corpus,
    active: Option<SentenceId>,
    controller: Controller,
    hover: HoverRegistry,
    regions: HashMap<u32, RegionHandle>,
    next_region: u32,
}

impl TreeViewer {
    fn with_corpus(corpus: Corpus) -> Self {
        Self {
            corpus,
            active: None,
            controller: Controller::default(),
            hover: HoverRegistry::new(),
            regions: HashMap::new(),
            next_region: 0,
        }
    }

    fn pending_ticket(&self) -> Option<u32> {
        self.controller.pending_fit().map(|ticket| ticket.0)
    }
}

#[wasm_bindgen]
impl TreeViewer {
    /// Loads a compiled corpus pack (fetched as bytes).
    #[wasm_bindgen(constructor)]
    pub fn new(pack: Vec<u8>) -> Result<TreeViewer, JsError> {
        let corpus = CorpusPack::from_bytes(&pack)
            .and_then(CorpusPack::into_corpus)
            .map_err(js_error)?;
        Ok(Self::with_corpus(corpus))
    }

    /// Loads an authored JSON corpus directly, for development builds.
    pub fn from_json(json: &str) -> Result<TreeViewer, JsError> {
        let corpus: Corpus = serde_json::from_str(json).map_err(js_error)?;
        Ok(Self::with_corpus(corpus))
    }

    /// Overrides layout and fit settings. Either argument may be
    /// `undefined`; missing fields keep their defaults. Resets the view.
    pub fn configure(&mut self, layout: JsValue, fit: JsValue) -> Result<(), JsError> {
        let layout: LayoutConfig = if layout.is_undefined() || layout.is_null() {
            LayoutConfig::default()
        } else {
            serde_wasm_bindgen::from_value(layout).map_err(js_error)?
        };
        let fit: FitOptions = if fit.is_undefined() || fit.is_null() {
            FitOptions::default()
        } else {
            serde_wasm_bindgen::from_value(fit).map_err(js_error)?
        };

        self.controller = Controller::new(layout, fit);
        if let Some(sentence) = self.active.as_ref().and_then(|id| self.corpus.get(id.as_str())) {
            self.controller.load(sentence.tree.clone());
        }
        Ok(())
    }

    pub fn sentence_ids(&self) -> Result<JsValue, JsError> {
        let ids: Vec<&str> = self.corpus.sentences.iter().map(|s| s.id.as_str()).collect();
        serde_wasm_bindgen::to_value(&ids).map_err(js_error)
    }

    pub fn active_sentence(&self) -> Option<String> {
        self.active.as_ref().map(|id| id.to_string())
    }

    /// Switches the active sentence; the view state is fully reset.
    pub fn select(&mut self, id: &str) -> Result<(), JsError> {
        let sentence = self
            .corpus
            .get(id)
            .ok_or_else(|| JsError::new(&format!("unknown sentence '{}'", id)))?;
        self.controller.load(sentence.tree.clone());
        self.active = Some(sentence.id.clone());
        Ok(())
    }

    pub fn toggle_node(&mut self, id: &str) -> bool {
        self.controller.toggle_node(id)
    }

    pub fn expand_all(&mut self) {
        self.controller.expand_all();
    }

    pub fn collapse_all(&mut self) {
        self.controller.collapse_all();
    }

    pub fn toggle_ghosts(&mut self) -> bool {
        self.controller.toggle_ghosts()
    }

    pub fn show_ghosts(&self) -> bool {
        self.controller.state().show_ghosts
    }

    /// Positioned nodes and edges for the current state.
    pub fn layout(&self) -> Result<JsValue, JsError> {
        let dto = LayoutDto::from(&self.controller.layout());
        serde_wasm_bindgen::to_value(&dto).map_err(js_error)
    }

    /// Ticket of the fit to run after `fit_delay_ms`, superseding older ones.
    pub fn pending_fit(&self) -> Option<u32> {
        self.pending_ticket()
    }

    pub fn fit_delay_ms(&self) -> u32 {
        self.controller.fit_options().delay_ms
    }

    /// Viewport transform `{x, y, zoom}`, or `null` when the ticket was superseded.
    pub fn fit(&mut self, ticket: u32, width: f64, height: f64) -> Result<JsValue, JsError> {
        match self.controller.fit(FitTicket(ticket), width, height) {
            Some(transform) => serde_wasm_bindgen::to_value(&transform).map_err(js_error),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn glossary(role: &str) -> Result<JsValue, JsError> {
        let role = GrammarRole::from_label(role).ok_or_else(|| JsError::new(&format!("unknown role '{}'", role)))?;
        let entry = glossary::glossary(role);
        serde_wasm_bindgen::to_value(&GlossaryDto {
            role: role.label(),
            headline: entry.headline,
            detail: entry.detail,
        })
        .map_err(js_error)
    }

    /// Every role with its glossary entry, for the legend.
    pub fn legend() -> Result<JsValue, JsError> {
        let entries: Vec<GlossaryDto> = GrammarRole::ALL
            .into_iter()
            .map(|role| {
                let entry = glossary::glossary(role);
                GlossaryDto {
                    role: role.label(),
                    headline: entry.headline,
                    detail: entry.detail,
                }
            })
            .collect();
        serde_wasm_bindgen::to_value(&entries).map_err(js_error)
    }

    pub fn badges(role: &str, sub_role: Option<String>) -> Result<JsValue, JsError> {
        let role = GrammarRole::from_label(role).ok_or_else(|| JsError::new(&format!("unknown role '{}'", role)))?;
        let badges: Vec<BadgeDto> = glossary::badges(role, sub_role.as_deref())
            .into_iter()
            .map(BadgeDto::from)
            .collect();
        serde_wasm_bindgen::to_value(&badges).map_err(js_error)
    }

    /// Called when an element with a tooltip mounts. Returns the key to pass
    /// to `unregister_region` on unmount.
    pub fn register_region(&mut self, x: f64, y: f64, width: f64, height: f64, node_id: &str) -> u32 {
        let handle = self.hover.register(Rect::new(x, y, width, height), NodeId::from(node_id));
        let key = self.next_region;
        self.next_region = self.next_region.wrapping_add(1);
        self.regions.insert(key, handle);
        key
    }

    pub fn update_region(&mut self, key: u32, x: f64, y: f64, width: f64, height: f64) -> bool {
        match self.regions.get(&key) {
            Some(&handle) => self.hover.update(handle, Rect::new(x, y, width, height)),
            None => false,
        }
    }

    pub fn unregister_region(&mut self, key: u32) -> bool {
        match self.regions.remove(&key) {
            Some(handle) => self.hover.unregister(handle),
            None => false,
        }
    }

    /// Node whose tooltip should show for a pointer at `(x, y)`.
    pub fn hover_at(&self, x: f64, y: f64) -> Option<String> {
        self.hover
            .innermost_at(Point { x, y })
            .map(|(_, node)| node.to_string())
    }
}
