//! UI focus coordinator.
//!
//! Which node's context menu is open is explicit state owned by one
//! [`UiFocus`] value and passed by reference to whoever needs it. At most one
//! menu is open at a time; opening another closes the first.

use crate::action::NodeAction;
use crate::id::NodeId;

/// Entries shown in a node's context menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Provision,
    Run,
    Reboot,
    Stop,
    Configure,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::Provision,
        MenuAction::Run,
        MenuAction::Reboot,
        MenuAction::Stop,
        MenuAction::Configure,
    ];

    pub fn title(self) -> &'static str {
        match self {
            MenuAction::Provision => "Provision",
            MenuAction::Run => "Run",
            MenuAction::Reboot => "Reboot",
            MenuAction::Stop => "Stop",
            MenuAction::Configure => "Configure",
        }
    }

    /// The remote action this entry requests. "Run" starts the resource.
    pub fn node_action(self) -> NodeAction {
        match self {
            MenuAction::Provision => NodeAction::Provision,
            MenuAction::Run => NodeAction::Start,
            MenuAction::Reboot => NodeAction::Reboot,
            MenuAction::Stop => NodeAction::Stop,
            MenuAction::Configure => NodeAction::Configure,
        }
    }
}

/// Tracks the single open context menu, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiFocus {
    context_menu: Option<NodeId>,
}

impl UiFocus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the menu for `node`, closing any other. Returns the node whose
    /// menu was displaced.
    pub fn open_context_menu(&mut self, node: NodeId) -> Option<NodeId> {
        self.context_menu.replace(node).filter(|prev| {
            self.context_menu.as_ref() != Some(prev)
        })
    }

    pub fn close_context_menu(&mut self) -> Option<NodeId> {
        self.context_menu.take()
    }

    pub fn context_menu(&self) -> Option<&NodeId> {
        self.context_menu.as_ref()
    }

    pub fn is_menu_open_for(&self, node: &NodeId) -> bool {
        self.context_menu.as_ref() == Some(node)
    }

    /// Picks an entry from the open menu: closes it and returns the target
    /// node with the action to request. `None` if no menu is open.
    pub fn choose(&mut self, entry: MenuAction) -> Option<(NodeId, NodeAction)> {
        self.context_menu
            .take()
            .map(|node| (node, entry.node_action()))
    }

    /// Drops focus held on a node that no longer exists.
    pub fn forget_node(&mut self, node: &NodeId) {
        if self.is_menu_open_for(node) {
            self.context_menu = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_menu_open() {
        let mut focus = UiFocus::new();
        assert_eq!(focus.open_context_menu("a".into()), None);
        assert_eq!(focus.open_context_menu("b".into()), Some(NodeId::from("a")));
        assert!(focus.is_menu_open_for(&"b".into()));
        assert!(!focus.is_menu_open_for(&"a".into()));
        // Reopening the same menu displaces nothing.
        assert_eq!(focus.open_context_menu("b".into()), None);
    }

    #[test]
    fn choose_closes_menu() {
        let mut focus = UiFocus::new();
        assert_eq!(focus.choose(MenuAction::Run), None);
        focus.open_context_menu("web-1".into());
        let (node, action) = focus.choose(MenuAction::Run).unwrap();
        assert_eq!(node, NodeId::from("web-1"));
        assert_eq!(action, NodeAction::Start);
        assert_eq!(focus.context_menu(), None);
    }

    #[test]
    fn forgetting_other_node_keeps_menu() {
        let mut focus = UiFocus::new();
        focus.open_context_menu("a".into());
        focus.forget_node(&"b".into());
        assert!(focus.is_menu_open_for(&"a".into()));
        focus.forget_node(&"a".into());
        assert_eq!(focus.context_menu(), None);
    }

    #[test]
    fn menu_titles_in_order() {
        let titles: Vec<&str> = MenuAction::ALL.iter().map(|a| a.title()).collect();
        assert_eq!(titles, ["Provision", "Run", "Reboot", "Stop", "Configure"]);
    }
}
