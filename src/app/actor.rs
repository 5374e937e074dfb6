//! App actor - message loop processing UI events and backend responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{BackendCommand, BackendResponse, RenderState, UiEvent};

/// App actor that processes UI events and backend responses
pub struct AppActor {
    state: AppState,
    backend_tx: mpsc::UnboundedSender<BackendCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        backend_tx: mpsc::UnboundedSender<BackendCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            backend_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut backend_rx: mpsc::UnboundedReceiver<BackendResponse>,
    ) {
        // A persisted selection that still exists loads its items right away
        if let Some(cmd) = self.state.restore_selection() {
            self.dispatch(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.backend_tx.send(BackendCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = backend_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn dispatch(&self, cmd: BackendCommand) {
        let _ = self.backend_tx.send(cmd);
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmd = match event {
            // Navigation
            UiEvent::OpenWork => {
                self.state.open_work();
                None
            }
            UiEvent::OpenAdmin => {
                self.state.open_admin();
                None
            }
            UiEvent::GoHome => {
                self.state.go_home();
                None
            }
            UiEvent::MoveUp => {
                self.state.move_up();
                None
            }
            UiEvent::MoveDown => {
                self.state.move_down();
                None
            }

            // Input editing
            UiEvent::StartEditing => {
                self.state.start_editing();
                None
            }
            UiEvent::StopEditing => {
                self.state.stop_editing();
                None
            }
            UiEvent::CharInput(c) => {
                self.state.enter_char(c);
                None
            }
            UiEvent::Backspace => {
                self.state.delete_char();
                None
            }
            UiEvent::Submit => self.state.submit(),

            // Categories
            UiEvent::EnterCategory => self.state.enter_category(),
            UiEvent::LeaveCategory => {
                self.state.leave_category();
                None
            }
            UiEvent::DeleteCategory => self.state.delete_selected_category(),

            // Items
            UiEvent::ToggleItem => self.state.toggle_selected_item(),
            UiEvent::DeleteItem => self.state.delete_selected_item(),
            UiEvent::ReloadItems => self.state.request_reload(),

            // Popups
            UiEvent::DismissNotice => {
                self.state.dismiss_notice();
                None
            }
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                None
            }
            UiEvent::CloseHelp => {
                self.state.close_help();
                None
            }

            // System
            UiEvent::Quit => return true,
        };

        if let Some(cmd) = cmd {
            self.dispatch(cmd);
        }
        false
    }
}
