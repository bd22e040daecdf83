//! Main egui application — composes all panels and drives the chat runtime.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel};

use orbit_core::attachment;
use orbit_core::event_bus::EventBus;
use orbit_core::persistence::SessionRepository;
use orbit_core::ports::LlmPort;
use orbit_core::runtime::{ChatRuntime, Draft};
use orbit_core::session_store::SessionStore;
use orbit_platform::file_picker::FilePicker;
use orbit_platform::llm::GeminiProvider;
use orbit_platform::storage::{auto_detect_storage, open_storage};
use orbit_types::config::{AppConfig, LlmConfig};
use orbit_types::event::ChatEvent;
use orbit_types::session::ChatSession;
use orbit_types::{OrbitError, Result};
use orbit_ui::panels::chat::{self, ChatAction};
use orbit_ui::panels::settings::{self, SettingsAction};
use orbit_ui::panels::sidebar::{self, SidebarAction};
use orbit_ui::state::{SaveFeedback, UiState};
use orbit_ui::theme;

/// Everything read from storage at startup
struct Restored {
    config: AppConfig,
    dark_mode: bool,
    sessions: Vec<ChatSession>,
    sessions_repo: SessionRepository,
}

/// The main application state
pub struct OrbitApp {
    ui_state: UiState,
    config: AppConfig,
    event_bus: EventBus,
    runtime: ChatRuntime,
    llm: Rc<dyn LlmPort>,
    /// Config and dark mode; always the auto-detected backend
    prefs: SessionRepository,
    /// Session collection; backend chosen by the restored config
    sessions_repo: Option<SessionRepository>,
    restore_slot: Rc<RefCell<Option<Restored>>>,
    models_slot: Rc<RefCell<Option<Result<Vec<String>>>>>,
    file_picker: FilePicker,
    first_frame: bool,
}

impl OrbitApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::default();
        let event_bus = EventBus::new();
        let store = Rc::new(RefCell::new(SessionStore::new()));
        let runtime = ChatRuntime::new(store, event_bus.clone());
        let llm: Rc<dyn LlmPort> = Rc::new(GeminiProvider::new(config.llm.clone()));

        egui_extras::install_image_loaders(&cc.egui_ctx);

        let file_picker = FilePicker::new();
        let ctx = cc.egui_ctx.clone();
        if let Err(e) = file_picker.listen_for_paste(move || ctx.request_repaint()) {
            log::warn!("Pasting images unavailable: {}", e);
        }

        let prefs = SessionRepository::new(auto_detect_storage());
        let restore_slot = Rc::new(RefCell::new(None));
        Self::restore(prefs.clone(), restore_slot.clone(), cc.egui_ctx.clone());

        Self {
            ui_state: UiState::new(),
            config,
            event_bus,
            runtime,
            llm,
            prefs,
            sessions_repo: None,
            restore_slot,
            models_slot: Rc::new(RefCell::new(None)),
            file_picker,
            first_frame: true,
        }
    }

    /// Read config, theme and sessions (async). The result is picked up on the next frame.
    fn restore(prefs: SessionRepository, slot: Rc<RefCell<Option<Restored>>>, ctx: egui::Context) {
        wasm_bindgen_futures::spawn_local(async move {
            let config = match prefs.load_config().await {
                Some(config) => {
                    log::info!("Config restored from {}", prefs.backend_name());
                    config
                }
                None => AppConfig::default(),
            };
            let dark_mode = prefs.load_dark_mode().await;

            let sessions_repo = SessionRepository::new(open_storage(&config.storage.backend));
            let sessions = sessions_repo.load_sessions().await;
            log::info!(
                "Restored {} session(s) from {}",
                sessions.len(),
                sessions_repo.backend_name()
            );

            *slot.borrow_mut() = Some(Restored {
                config,
                dark_mode,
                sessions,
                sessions_repo,
            });
            ctx.request_repaint();
        });
    }

    fn apply_restored(&mut self, ctx: &egui::Context) {
        let Some(restored) = self.restore_slot.borrow_mut().take() else {
            return;
        };

        *self.runtime.store().borrow_mut() = SessionStore::hydrate(restored.sessions);
        self.config = restored.config;
        self.ui_state.config_draft = self.config.clone();
        self.ui_state.dark_mode = restored.dark_mode;
        self.sessions_repo = Some(restored.sessions_repo);
        self.rebuild_llm();
        theme::apply_theme(ctx, self.ui_state.dark_mode);
    }

    fn rebuild_llm(&mut self) {
        self.llm = Rc::new(GeminiProvider::new(self.config.llm.clone()));
    }

    /// Hand queued session writes to storage (async, fire-and-forget)
    fn flush_pending(&self) {
        // Nothing is written before the saved collection has been read back
        let Some(repo) = self.sessions_repo.clone() else {
            return;
        };
        let ops = self.runtime.store().borrow_mut().take_pending();
        if ops.is_empty() {
            return;
        }
        wasm_bindgen_futures::spawn_local(async move {
            repo.apply_all(ops).await;
        });
    }

    fn save_dark_mode(&self) {
        let prefs = self.prefs.clone();
        let enabled = self.ui_state.dark_mode;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = prefs.save_dark_mode(enabled).await {
                log::warn!("Failed to save theme: {}", e);
            }
        });
    }

    fn save_config(&self) {
        let prefs = self.prefs.clone();
        let config = self.config.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match prefs.save_config(&config).await {
                Ok(()) => log::info!("Config saved to {}", prefs.backend_name()),
                Err(e) => log::warn!("Failed to save config: {}", e),
            }
        });
    }

    fn accept_file(&mut self, name: &str, mime_type: &str, bytes: &[u8]) {
        match attachment::image_from_bytes(mime_type, name, bytes) {
            Ok(image) => {
                let size = attachment::decoded_len(&image);
                self.ui_state.set_pending_image(image, name, size);
            }
            Err(e) => {
                log::warn!("Rejected attachment {}: {}", name, e);
                self.ui_state.set_warning(e.to_string());
            }
        }
    }

    /// Files dropped onto the window this frame; one is attached, an image if there is any.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(index) = attachment::preferred_file(dropped.iter().map(|f| f.mime.as_str())) else {
            return;
        };
        let file = &dropped[index];
        match &file.bytes {
            Some(bytes) => self.accept_file(&file.name, &file.mime, bytes),
            None => self
                .ui_state
                .set_warning(format!("Could not read {}", file.name)),
        }
    }

    fn handle_picked_files(&mut self) {
        for picked in self.file_picker.drain() {
            match picked {
                Ok(file) => self.accept_file(&file.name, &file.mime_type, &file.bytes),
                Err(e) => self.ui_state.set_warning(e.to_string()),
            }
        }
    }

    fn open_file_picker(&mut self, ctx: &egui::Context) {
        let ctx = ctx.clone();
        if let Err(e) = self.file_picker.open(move || ctx.request_repaint()) {
            log::warn!("File dialog unavailable: {}", e);
            self.ui_state.set_warning(e.to_string());
        }
    }

    fn handle_sidebar(&mut self, action: SidebarAction) {
        let store = self.runtime.store().clone();
        match action {
            SidebarAction::NewChat => {
                store.borrow_mut().create();
            }
            SidebarAction::Select(id) => {
                store.borrow_mut().select(&id);
            }
            SidebarAction::Delete(id) => store.borrow_mut().delete(&id),
            SidebarAction::SetPersonality(p) => store.borrow_mut().set_personality(p),
            SidebarAction::ToggleSettings => self.toggle_settings(),
        }
    }

    fn toggle_settings(&mut self) {
        self.ui_state.show_settings = !self.ui_state.show_settings;
        if self.ui_state.show_settings {
            self.ui_state.config_draft = self.config.clone();
            self.ui_state.save_feedback = None;
            self.ui_state.confirm_clear = false;
        }
    }

    fn handle_settings(&mut self, action: SettingsAction, ctx: &egui::Context) {
        match action {
            SettingsAction::None => {}
            SettingsAction::ToggleDarkMode => {
                self.ui_state.dark_mode = !self.ui_state.dark_mode;
                theme::apply_theme(ctx, self.ui_state.dark_mode);
                self.save_dark_mode();
            }
            SettingsAction::ClearHistory => {
                self.runtime.store().borrow_mut().clear_all();
                self.ui_state.show_settings = false;
            }
            SettingsAction::SaveClicked => self.apply_config_draft(),
            SettingsAction::FetchModels => self.fetch_models(ctx),
            SettingsAction::Close => self.ui_state.show_settings = false,
        }
    }

    fn apply_config_draft(&mut self) {
        let draft = self.ui_state.config_draft.clone();
        if let Err(e) = draft.validate() {
            self.ui_state.save_feedback = Some(SaveFeedback {
                message: e.to_string(),
                success: false,
            });
            return;
        }

        let backend_changed = draft.storage.backend != self.config.storage.backend;
        self.config = draft;
        self.rebuild_llm();
        self.save_config();
        self.ui_state.save_feedback = Some(SaveFeedback {
            message: if backend_changed {
                "Saved. Storage change applies after reload.".to_string()
            } else {
                "Settings saved".to_string()
            },
            success: true,
        });
    }

    /// List models with the credentials currently in the settings form (async)
    fn fetch_models(&mut self, ctx: &egui::Context) {
        self.ui_state.models_loading = true;
        let provider = GeminiProvider::new(self.ui_state.config_draft.llm.clone());
        let slot = self.models_slot.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = provider.list_models().await;
            *slot.borrow_mut() = Some(result);
            ctx.request_repaint();
        });
    }

    fn poll_models(&mut self) {
        let Some(result) = self.models_slot.borrow_mut().take() else {
            return;
        };
        self.ui_state.models_loading = false;
        match result {
            Ok(models) => {
                log::info!("{} model(s) available", models.len());
                self.ui_state.available_models = models;
            }
            Err(e) => {
                self.ui_state.save_feedback = Some(SaveFeedback {
                    message: format!("Could not list models: {}", e),
                    success: false,
                });
            }
        }
    }

    /// Send a draft through the chat runtime (async)
    fn dispatch_send(&self, draft: Draft, ctx: &egui::Context) {
        let runtime = self.runtime.clone();
        let llm = self.llm.clone();
        let config: LlmConfig = self.config.llm.clone();
        let event_bus = self.event_bus.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match runtime.send(draft, llm.as_ref(), &config).await {
                Ok(reply) => log::info!("Reply complete ({} chars)", reply.chars().count()),
                // Rejected before a turn started, so no event reported it yet
                Err(e @ (OrbitError::Busy | OrbitError::EmptyMessage)) => {
                    event_bus.emit(ChatEvent::Error {
                        message: e.to_string(),
                    });
                }
                // Already logged and reported by the runtime
                Err(_) => {}
            }
            ctx.request_repaint();
        });
    }
}

impl eframe::App for OrbitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx, self.ui_state.dark_mode);
            self.first_frame = false;
        }
        self.apply_restored(ctx);

        // Drain events from the chat runtime
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        if self.ui_state.is_typing || self.runtime.is_generating() {
            ctx.request_repaint();
        }

        self.poll_models();
        self.handle_picked_files();
        self.handle_dropped_files(ctx);

        let pal = theme::palette(self.ui_state.dark_mode);
        let store = self.runtime.store().clone();

        // Session actions stay locked until the saved collection is loaded
        let restored = self.sessions_repo.is_some();

        // ── Sidebar ──────────────────────────────────────────
        let sidebar_action = SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(260.0)
            .frame(egui::Frame::default().fill(pal.bg_secondary).inner_margin(theme::PANEL_PADDING))
            .show(ctx, |ui| {
                let store = store.borrow();
                ui.add_enabled_ui(restored, |ui| {
                    sidebar::sidebar_panel(
                        ui,
                        pal,
                        store.sessions(),
                        store.current_id(),
                        store.personality(),
                        self.runtime.is_generating(),
                    )
                })
                .inner
            })
            .inner;
        if let Some(action) = sidebar_action.filter(|a| restored || !a.needs_sessions()) {
            self.handle_sidebar(action);
        }

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            let action = SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .show(ui, |ui| settings::settings_panel(ui, &mut self.ui_state, pal))
                        .inner
                })
                .inner;
            if restored || !action.needs_sessions() {
                self.handle_settings(action, ctx);
            }
        }

        // ── Main content ─────────────────────────────────────
        let chat_action = CentralPanel::default()
            .frame(egui::Frame::default().fill(pal.bg_primary))
            .show(ctx, |ui| {
                if !restored {
                    ui.centered_and_justified(|ui| ui.spinner());
                    return None;
                }
                let store = store.borrow();
                chat::chat_panel(
                    ui,
                    &mut self.ui_state,
                    pal,
                    store.current(),
                    store.personality(),
                )
            })
            .inner;
        match chat_action {
            Some(ChatAction::Send(draft)) => self.dispatch_send(draft, ctx),
            Some(ChatAction::AttachImage) => self.open_file_picker(ctx),
            None => {}
        }

        // Drop target hint
        if ctx.input(|i| !i.raw.hovered_files.is_empty()) {
            egui::Area::new(egui::Id::new("drop_hint"))
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(RichText::new("📥 Drop image to attach").color(pal.accent).size(18.0));
                    });
                });
        }

        self.flush_pending();
    }
}
