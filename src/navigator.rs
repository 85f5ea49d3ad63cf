//! Panel navigation: a visibility switch over a fixed set of named panels.
//!
//! Panels are declared up front and only their hidden flag ever changes.
//! Triggers are declarative "go to panel X" controls; wiring collects the
//! enabled ones and shows the default panel. There is no history stack: a
//! back control is just a trigger whose target is the previous panel.

/// The panel shown after wiring.
pub const DEFAULT_PANEL: &str = "main-dashboard";

/// A named region of the UI shown or hidden as a unit.
#[derive(Debug, Clone)]
pub struct Panel {
    pub id: String,
    pub hidden: bool,
}

/// A clickable control requesting navigation to a named panel.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub label: String,
    pub target: String,
    pub disabled: bool,
}

/// Visibility switch over the declared panels.
pub struct Navigator {
    panels: Vec<Panel>,
    triggers: Vec<Trigger>,
    /// Indices into `triggers` attached by `wire`. Disabled triggers never
    /// make it in here.
    wired: Vec<usize>,
}

impl Navigator {
    /// Declare the fixed panel set. All panels start hidden.
    pub fn new<I, S>(panel_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let panels = panel_ids
            .into_iter()
            .map(|id| Panel { id: id.into(), hidden: true })
            .collect();
        Navigator {
            panels,
            triggers: Vec::new(),
            wired: Vec::new(),
        }
    }

    /// Declare a trigger. Has no effect until `wire` runs.
    pub fn add_trigger(&mut self, label: &str, target: &str, disabled: bool) {
        self.triggers.push(Trigger {
            label: label.to_string(),
            target: target.to_string(),
            disabled,
        });
    }

    /// Hide every panel, then show the one with the given id if it exists.
    ///
    /// An unknown id leaves every panel hidden; the show step is a silent
    /// no-op.
    pub fn activate(&mut self, panel_id: &str) {
        for panel in self.panels.iter_mut() {
            panel.hidden = true;
        }
        if let Some(panel) = self.panels.iter_mut().find(|p| p.id == panel_id) {
            panel.hidden = false;
        }
    }

    /// Attach every enabled trigger and show the default panel.
    pub fn wire(&mut self) {
        self.wired = self
            .triggers
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.disabled)
            .map(|(i, _)| i)
            .collect();
        self.activate(DEFAULT_PANEL);
    }

    /// The triggers `wire` attached, in declaration order.
    pub fn wired_triggers(&self) -> Vec<&Trigger> {
        self.wired.iter().map(|&i| &self.triggers[i]).collect()
    }

    /// Click the nth wired trigger: read its target and activate it.
    pub fn fire(&mut self, wired_index: usize) {
        if let Some(&trigger_index) = self.wired.get(wired_index) {
            let target = self.triggers[trigger_index].target.clone();
            self.activate(&target);
        }
    }

    /// The id of the single unhidden panel, if any.
    pub fn visible_panel(&self) -> Option<&str> {
        self.panels.iter().find(|p| !p.hidden).map(|p| p.id.as_str())
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// All declared triggers, wired or not.
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator() -> Navigator {
        Navigator::new([DEFAULT_PANEL, "planner", "about"])
    }

    #[test]
    fn test_activate_shows_exactly_one_declared_panel() {
        let mut nav = navigator();
        nav.activate("planner");
        let visible: Vec<&Panel> = nav.panels().iter().filter(|p| !p.hidden).collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "planner");
    }

    #[test]
    fn test_activate_unknown_panel_hides_everything() {
        let mut nav = navigator();
        nav.activate("planner");
        nav.activate("no-such-panel");
        assert!(nav.panels().iter().all(|p| p.hidden));
        assert_eq!(nav.visible_panel(), None);
    }

    #[test]
    fn test_activate_default_from_all_hidden() {
        let mut nav = navigator();
        nav.activate(DEFAULT_PANEL);
        assert_eq!(nav.visible_panel(), Some(DEFAULT_PANEL));
        let hidden = nav.panels().iter().filter(|p| p.hidden).count();
        assert_eq!(hidden, nav.panels().len() - 1);
    }

    #[test]
    fn test_wire_skips_disabled_triggers_and_shows_default() {
        let mut nav = navigator();
        nav.add_trigger("Planner", "planner", false);
        nav.add_trigger("Sync", "sync", true);
        nav.add_trigger("About", "about", false);
        nav.wire();

        let labels: Vec<&str> = nav.wired_triggers().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["Planner", "About"]);
        assert_eq!(nav.visible_panel(), Some(DEFAULT_PANEL));
    }

    #[test]
    fn test_fire_activates_the_triggers_target() {
        let mut nav = navigator();
        nav.add_trigger("Planner", "planner", false);
        nav.add_trigger("Back", DEFAULT_PANEL, false);
        nav.wire();

        nav.fire(0);
        assert_eq!(nav.visible_panel(), Some("planner"));
        // "Back" is just another trigger.
        nav.fire(1);
        assert_eq!(nav.visible_panel(), Some(DEFAULT_PANEL));
    }

    #[test]
    fn test_fire_out_of_range_changes_nothing() {
        let mut nav = navigator();
        nav.add_trigger("Planner", "planner", false);
        nav.wire();
        nav.fire(10);
        assert_eq!(nav.visible_panel(), Some(DEFAULT_PANEL));
    }
}
