//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = &self.model;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            model.set_should_quit(true).await;
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        // Handle search input when in search section
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    model.cycle_section_forward().await;
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward().await;
                    return Ok(());
                }
                KeyCode::Enter | KeyCode::Down => {
                    model.set_active_section(ActiveSection::MainContent).await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    if !self.dismiss_notification().await {
                        self.clear_search().await;
                    }
                    return Ok(());
                }
                KeyCode::Backspace => {
                    let query = model.backspace_search().await;
                    self.search_edited(query).await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Q still quits even in search mode when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    let query = model.append_to_search(c).await;
                    self.search_edited(query).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Handle MainContent section navigation
        if ui_state.active_section == ActiveSection::MainContent {
            match key.code {
                KeyCode::Up => {
                    model.content_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.content_move_down().await;
                    self.load_more_if_needed().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    if model.get_content_state().await.is_loading {
                        return Ok(());
                    }
                    let controller = self.clone();
                    tokio::spawn(async move {
                        controller.open_selected_movie().await;
                    });
                    return Ok(());
                }
                KeyCode::Backspace | KeyCode::Esc => {
                    if !self.dismiss_notification().await {
                        self.go_back().await;
                    }
                    return Ok(());
                }
                KeyCode::Char('f') | KeyCode::Char('F') => {
                    self.toggle_favorite_selected().await;
                    return Ok(());
                }
                KeyCode::Char('w') | KeyCode::Char('W') => {
                    self.toggle_watch_later_selected().await;
                    return Ok(());
                }
                KeyCode::Char('m') | KeyCode::Char('M') => {
                    self.spawn_load_more();
                    return Ok(());
                }
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    self.clear_watch_later().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                model.move_selection_down().await;
            }
            KeyCode::Enter => match ui_state.active_section {
                ActiveSection::Library => self.open_library_item().await,
                ActiveSection::Categories => self.select_category().await,
                _ => {}
            },
            KeyCode::Esc => {
                self.dismiss_notification().await;
            }
            KeyCode::Char('/') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.toggle_theme().await;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.cycle_language().await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::controller::AppController;
    use crate::model::testing::FakeCatalog;
    use crate::model::{
        ActiveSection, AppModel, Debouncer, PreferenceContext, PreferenceStore, Theme,
    };

    async fn controller() -> AppController {
        let prefs = PreferenceContext::load(PreferenceStore::in_memory()).await;
        let model = AppModel::new(Arc::new(FakeCatalog::default()), prefs, Duration::from_millis(1));
        let input = Arc::new(Debouncer::new(String::new(), Duration::from_millis(500)));
        AppController::new(model, input)
    }

    async fn press(controller: &AppController, code: KeyCode) {
        controller
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn letters_type_into_search_box() {
        let controller = controller().await;
        for c in "tlq".chars() {
            press(&controller, KeyCode::Char(c)).await;
        }
        let ui = controller.model.get_ui_state().await;
        assert_eq!(ui.search_query, "tlq");
        assert!(!controller.model.should_quit().await);
        assert_eq!(controller.model.prefs.theme().await, Theme::Dark);

        press(&controller, KeyCode::Backspace).await;
        assert_eq!(controller.model.get_ui_state().await.search_query, "tl");
        press(&controller, KeyCode::Esc).await;
        assert_eq!(controller.model.get_ui_state().await.search_query, "");
    }

    #[tokio::test]
    async fn global_keys_outside_search() {
        let controller = controller().await;
        press(&controller, KeyCode::Tab).await;
        assert_eq!(controller.model.get_ui_state().await.active_section, ActiveSection::Library);

        press(&controller, KeyCode::Char('t')).await;
        assert_eq!(controller.model.prefs.theme().await, Theme::Light);

        press(&controller, KeyCode::Char('h')).await;
        assert!(controller.model.is_help_popup_open().await);
        // Help swallows everything but its own close keys
        press(&controller, KeyCode::Char('q')).await;
        assert!(!controller.model.should_quit().await);
        press(&controller, KeyCode::Esc).await;

        press(&controller, KeyCode::Char('q')).await;
        assert!(controller.model.should_quit().await);
    }

    #[tokio::test]
    async fn error_blocks_until_acknowledged() {
        let controller = controller().await;
        controller.model.set_error("boom".into()).await;
        press(&controller, KeyCode::Char('x')).await;
        assert_eq!(controller.model.get_ui_state().await.search_query, "");
        press(&controller, KeyCode::Enter).await;
        assert!(!controller.model.has_error().await);
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_search() {
        let controller = controller().await;
        controller
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .await
            .unwrap();
        assert!(controller.model.should_quit().await);
    }
}
