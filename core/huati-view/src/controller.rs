use std::collections::BTreeSet;

use huati_layout::{layout_with_config, LayoutConfig, LayoutResult};
use huati_protocol::{GrammarNode, NodeId};
use tracing::debug;

use crate::viewport::{fit, Bounds, FitOptions, FitScheduler, FitTicket, Transform};

/// View state applied as a filter at layout time. The tree itself is never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub expanded: BTreeSet<NodeId>,
    pub show_ghosts: bool,
}

impl ViewState {
    /// Only the root expanded, ghosts visible.
    pub fn initial(tree: &GrammarNode) -> Self {
        Self {
            expanded: BTreeSet::from([tree.id.clone()]),
            show_ghosts: true,
        }
    }
}

/// Owns the active tree and its view state, and turns user events into
/// state transitions. Every transition schedules a viewport fit.
pub struct Controller {
    tree: Option<GrammarNode>,
    state: ViewState,
    config: LayoutConfig,
    fit_options: FitOptions,
    scheduler: FitScheduler,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), FitOptions::default())
    }
}

impl Controller {
    pub fn new(config: LayoutConfig, fit_options: FitOptions) -> Self {
        Self {
            tree: None,
            state: ViewState {
                expanded: BTreeSet::new(),
                show_ghosts: true,
            },
            config,
            fit_options,
            scheduler: FitScheduler::default(),
        }
    }

    /// Switches to a new sentence. The previous view state is discarded.
    pub fn load(&mut self, tree: GrammarNode) {
        debug!(root = %tree.id, "sentence loaded");
        self.state = ViewState::initial(&tree);
        self.tree = Some(tree);
        self.scheduler.schedule();
    }

    pub fn tree(&self) -> Option<&GrammarNode> {
        self.tree.as_ref()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn fit_options(&self) -> &FitOptions {
        &self.fit_options
    }

    /// Flips one node between expanded and collapsed. Unknown ids, leaves
    /// and ghosts are ignored.
    pub fn toggle_node(&mut self, id: &str) -> bool {
        let Some(tree) = &self.tree else { return false };
        let Some(node) = tree.find(id) else { return false };
        if node.is_dropped || !node.has_children() {
            return false;
        }

        if !self.state.expanded.remove(id) {
            self.state.expanded.insert(node.id.clone());
        }
        self.scheduler.schedule();
        true
    }

    /// Expands every interior node of the full tree, ghosts included.
    pub fn expand_all(&mut self) {
        let Some(tree) = &self.tree else { return };
        self.state
            .expanded
            .extend(tree.iter().filter(|n| n.has_children()).map(|n| n.id.clone()));
        self.scheduler.schedule();
    }

    /// Back to only the root expanded.
    pub fn collapse_all(&mut self) {
        let Some(tree) = &self.tree else { return };
        self.state.expanded = BTreeSet::from([tree.id.clone()]);
        self.scheduler.schedule();
    }

    /// Returns the new visibility.
    pub fn toggle_ghosts(&mut self) -> bool {
        self.state.show_ghosts = !self.state.show_ghosts;
        self.scheduler.schedule();
        self.state.show_ghosts
    }

    pub fn layout(&self) -> LayoutResult {
        match &self.tree {
            Some(tree) => layout_with_config(tree, &self.state.expanded, self.state.show_ghosts, &self.config),
            None => LayoutResult::default(),
        }
    }

    /// Ticket for the fit the host should run after `fit_options().delay_ms`.
    pub fn pending_fit(&self) -> Option<FitTicket> {
        self.scheduler.pending()
    }

    /// Runs a scheduled fit. Superseded tickets yield `None`.
    pub fn fit(&mut self, ticket: FitTicket, width: f64, height: f64) -> Option<Transform> {
        if !self.scheduler.take(ticket) {
            return None;
        }
        let result = self.layout();
        Some(fit(Bounds::of(&result.nodes), width, height, &self.fit_options))
    }
}
