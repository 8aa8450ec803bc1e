//! Navigation drawer state

use crate::auth::{Role, Route};

/// An entry in the navigation drawer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Go(Route),
    Logout,
}

impl NavItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Go(Route::AdminDashboard) => "Forms",
            Self::Go(Route::FormBuilder) => "New Form",
            Self::Go(Route::ClientDashboard) => "My Forms",
            Self::Go(Route::Login) => "Sign in",
            Self::Logout => "Sign out",
        }
    }

    /// Whether this entry corresponds to the screen being shown
    pub fn is_active(&self, route: Route) -> bool {
        matches!(self, Self::Go(r) if *r == route)
    }
}

/// Entries available to a role
pub fn items_for(role: Option<Role>) -> Vec<NavItem> {
    match role {
        Some(Role::Admin) => vec![
            NavItem::Go(Route::AdminDashboard),
            NavItem::Go(Route::FormBuilder),
            NavItem::Logout,
        ],
        Some(Role::Client) => vec![NavItem::Go(Route::ClientDashboard), NavItem::Logout],
        None => Vec::new(),
    }
}

/// Collapsible drawer. On narrow terminals it overlays the screen; once the
/// terminal is wider than the collapse width it closes itself.
#[derive(Debug, Clone)]
pub struct NavState {
    is_open: bool,
    pub selected: usize,
    collapse_width: u16,
}

impl Default for NavState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_NAV_COLLAPSE_WIDTH)
    }
}

impl NavState {
    pub fn new(collapse_width: u16) -> Self {
        Self {
            is_open: false,
            selected: 0,
            collapse_width,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    /// React to a terminal resize
    pub fn on_resize(&mut self, width: u16) {
        if width > self.collapse_width && self.is_open {
            self.close();
        }
    }

    /// Whether the drawer is always visible at this width
    pub fn is_docked(&self, width: u16) -> bool {
        width > self.collapse_width
    }

    pub fn select_next(&mut self, count: usize) {
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self, count: usize) {
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut nav = NavState::new(100);
        assert!(!nav.is_open());
        nav.toggle();
        assert!(nav.is_open());
        nav.toggle();
        assert!(!nav.is_open());
    }

    #[test]
    fn test_resize_wider_than_collapse_width_closes() {
        let mut nav = NavState::new(100);
        nav.open();
        nav.on_resize(100);
        assert!(nav.is_open());
        nav.on_resize(101);
        assert!(!nav.is_open());
    }

    #[test]
    fn test_selection_wraps() {
        let mut nav = NavState::new(100);
        nav.open();
        nav.select_prev(3);
        assert_eq!(nav.selected, 2);
        nav.select_next(3);
        assert_eq!(nav.selected, 0);
    }

    #[test]
    fn test_items_by_role() {
        assert_eq!(items_for(None), Vec::<NavItem>::new());
        let admin = items_for(Some(Role::Admin));
        assert!(admin[0].is_active(Route::AdminDashboard));
        assert_eq!(admin.last(), Some(&NavItem::Logout));
        assert_eq!(items_for(Some(Role::Client))[0].label(), "My Forms");
    }
}
