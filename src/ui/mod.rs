//! UI module for rendering the TUI

mod components;
mod dashboard;
mod forms;
mod layout;

use crate::app::App;
use crate::auth::Route;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.state.route == Route::Login {
        forms::draw_login(frame, area, app);
        components::render_toasts(frame, &app.state.toasts);
        return;
    }

    let docked = app.nav_docked();
    let (sidebar_area, main_area) = layout::create_layout(area, docked);

    if let Some(sidebar_area) = sidebar_area {
        layout::draw_sidebar(frame, sidebar_area, app);
    }

    match app.state.route {
        Route::Login => {}
        Route::AdminDashboard | Route::ClientDashboard => {
            dashboard::draw_forms(frame, main_area, app)
        }
        Route::FormBuilder => forms::draw_form_builder(frame, main_area, app),
    }

    if !docked && app.state.nav.is_open() {
        layout::draw_nav_drawer(frame, main_area, app);
    }

    layout::draw_status_bar(frame, app);

    if let Some(dialog) = &app.state.confirm {
        components::render_confirm_dialog(frame, dialog);
    }
    components::render_toasts(frame, &app.state.toasts);
}
