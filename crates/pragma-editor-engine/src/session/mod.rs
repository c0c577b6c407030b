//! The editing session: one editor instance wired to its host.
//!
//! A [`Session`] owns the current [`EditorState`], routes input events
//! through the editing rules and tells its [`SessionHost`] when the
//! document content changes. Selection moves, focus changes and style
//! overrides never reach the host.

use std::sync::Arc;

use pragma_editor_config::{EditorConfig, PreferenceStore, ShiftEnterPolicy};

use crate::editing::{BackspaceOutcome, KeyCommand, commands, links, list_behavior, paste};
use crate::html;
use crate::model::{
    BlockKey, BlockType, ContentState, EditorState, InlineStyle, LinkDecorator, SelectionState,
    StyleSet,
};

/// Callbacks from a session to whatever embeds it.
pub trait SessionHost {
    /// The document content changed. Called at most once per edit.
    fn on_change(&mut self, state: &EditorState);

    /// Backspace at the document start under
    /// [`BackspacePolicy::DelegateToHost`](pragma_editor_config::BackspacePolicy).
    fn on_delete_intent(&mut self) {}

    /// Shift+return under [`ShiftEnterPolicy::DelegateToHost`].
    fn on_shift_enter(&mut self) {}
}

/// Whether an input was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Handled,
    NotHandled,
}

impl Handled {
    pub fn is_handled(self) -> bool {
        self == Handled::Handled
    }
}

/// Raw input delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Typed characters
    Insert(String),
    Return { shift: bool },
    KeyCommand(KeyCommand),
    Tab { shift: bool },
    Paste { text: String, html: Option<String> },
    /// The user moved the caret or selection
    Select(SelectionState),
    Escape,
}

pub struct Session<H: SessionHost> {
    state: EditorState,
    spellcheck: bool,
    config: EditorConfig,
    preferences: Box<dyn PreferenceStore>,
    host: H,
}

impl<H: SessionHost> Session<H> {
    /// Start a session on an empty document.
    pub fn new(config: EditorConfig, preferences: Box<dyn PreferenceStore>, host: H) -> Self {
        Self::with_content(ContentState::empty(), config, preferences, host)
    }

    /// Start a session on stored HTML.
    pub fn from_html(
        html: &str,
        config: EditorConfig,
        preferences: Box<dyn PreferenceStore>,
        host: H,
    ) -> Self {
        Self::with_content(html::from_html(html), config, preferences, host)
    }

    fn with_content(
        content: ContentState,
        config: EditorConfig,
        preferences: Box<dyn PreferenceStore>,
        host: H,
    ) -> Self {
        let spellcheck = preferences.get(&spellcheck_key(&config)).as_deref() == Some("true");
        log::debug!(
            "Starting {} session with {} block(s), spellcheck {}",
            config.app_name,
            content.block_count(),
            spellcheck
        );
        Self {
            state: decorated(EditorState::create_with_content(content)),
            spellcheck,
            config,
            preferences,
            host,
        }
    }

    /// Adopt `state`, notifying the host only if its content differs from
    /// the current revision.
    pub fn on_change(&mut self, state: EditorState) {
        let changed = !state.content().is_same_revision(self.state.content());
        self.state = state;
        if changed {
            self.host.on_change(&self.state);
        }
    }

    pub fn toggle_inline_style(&mut self, style: InlineStyle) {
        let next = commands::toggle_inline_style(&self.state, style);
        self.on_change(next);
    }

    pub fn toggle_block_type(&mut self, kind: BlockType) {
        let next = commands::toggle_block_type(&self.state, kind);
        self.on_change(next);
    }

    pub fn on_tab(&mut self, shift: bool) -> Handled {
        match list_behavior::on_tab(&self.state, shift, self.config.max_list_depth) {
            Some(next) => {
                self.on_change(next);
                Handled::Handled
            }
            None => Handled::NotHandled,
        }
    }

    pub fn handle_return(&mut self, shift: bool) -> Handled {
        if shift {
            match self.config.shift_enter_policy {
                ShiftEnterPolicy::SoftNewline => {
                    let next = self.state.insert_characters("\n");
                    self.on_change(next);
                }
                ShiftEnterPolicy::DelegateToHost => self.host.on_shift_enter(),
            }
            return Handled::Handled;
        }
        match list_behavior::on_return(&self.state) {
            Some(next) => {
                self.on_change(next);
                Handled::Handled
            }
            None => Handled::NotHandled,
        }
    }

    pub fn handle_key_command(&mut self, command: &KeyCommand) -> Handled {
        if *command == KeyCommand::Backspace {
            match list_behavior::on_backspace(&self.state, self.config.backspace_policy) {
                BackspaceOutcome::Edit(next) => {
                    self.on_change(next);
                    return Handled::Handled;
                }
                BackspaceOutcome::DeleteIntent => {
                    self.host.on_delete_intent();
                    return Handled::Handled;
                }
                // Plain backspace never strips block styles past the document start
                BackspaceOutcome::NotHandled => return Handled::NotHandled,
            }
        }
        match commands::handle_key_command(&self.state, command) {
            Some(next) => {
                self.on_change(next);
                Handled::Handled
            }
            None => Handled::NotHandled,
        }
    }

    pub fn handle_pasted_text(&mut self, text: &str, html: Option<&str>) -> Handled {
        match paste::handle_pasted_text(&self.state, text, html) {
            Some(next) => {
                self.on_change(next);
                Handled::Handled
            }
            None => Handled::NotHandled,
        }
    }

    /// Run `event` through its handler, falling back to default editing
    /// when the handler declines. Returns `NotHandled` only when nothing
    /// applied, such as tab outside a list, so the host can act on the key
    /// itself.
    pub fn dispatch(&mut self, event: InputEvent) -> Handled {
        match event {
            InputEvent::Insert(text) => {
                let next = self.state.insert_characters(&text);
                self.on_change(next);
                Handled::Handled
            }
            InputEvent::Return { shift } => {
                if self.handle_return(shift).is_handled() {
                    return Handled::Handled;
                }
                log::debug!("Return not handled, splitting block");
                let next = self.state.split_block();
                self.on_change(next);
                Handled::Handled
            }
            InputEvent::KeyCommand(command) => {
                if self.handle_key_command(&command).is_handled() {
                    return Handled::Handled;
                }
                match commands::apply_default_key_command(&self.state, &command) {
                    Some(next) => {
                        log::debug!("Applied default behaviour for {command}");
                        self.on_change(next);
                        Handled::Handled
                    }
                    None => {
                        log::debug!("Ignoring key command {command}");
                        Handled::NotHandled
                    }
                }
            }
            InputEvent::Tab { shift } => self.on_tab(shift),
            InputEvent::Paste { text, html } => {
                if self.handle_pasted_text(&text, html.as_deref()).is_handled() {
                    return Handled::Handled;
                }
                log::debug!("Pasting {} char(s) as plain text", text.chars().count());
                let next = paste::paste_plain_text(&self.state, &text);
                self.on_change(next);
                Handled::Handled
            }
            InputEvent::Select(selection) => {
                let next = self.state.force_selection(selection);
                self.on_change(next);
                Handled::Handled
            }
            InputEvent::Escape => {
                self.on_escape();
                Handled::Handled
            }
        }
    }

    /// Flip the spellcheck flag and persist it. A failed write is logged and
    /// the flag still flips for this session.
    pub fn toggle_spellcheck(&mut self) {
        self.spellcheck = !self.spellcheck;
        let key = spellcheck_key(&self.config);
        let value = if self.spellcheck { "true" } else { "false" };
        if let Err(e) = self.preferences.set(&key, value) {
            log::warn!("Failed to save {key}: {e}");
        }
    }

    /// Replace the document with HTML from the host, unless it serializes
    /// the same as the current document. Returns whether it was adopted.
    pub fn receive_html(&mut self, html: &str) -> bool {
        let content = html::from_html(html);
        if html::to_html(&content) == self.to_html() {
            return false;
        }
        self.state = decorated(EditorState::create_with_content(content));
        true
    }

    /// Like [`Session::receive_html`] for a ready-made state.
    pub fn receive_state(&mut self, state: EditorState) -> bool {
        if html::to_html(state.content()) == self.to_html() {
            return false;
        }
        self.state = decorated(state);
        true
    }

    pub fn toggle_checked(&mut self, key: BlockKey) {
        if self.state.content().block_for_key(key).is_none() {
            log::warn!("Ignoring checkbox toggle for unknown block {key}");
            return;
        }
        let next = list_behavior::toggle_checked(&self.state, key);
        self.on_change(next);
    }

    pub fn apply_link(&mut self, url: &str) {
        let next = if self.state.selection().is_collapsed() {
            links::create_linked_text(&self.state, url, url)
        } else {
            links::apply_link_to_selection(&self.state, url)
        };
        self.on_change(next);
    }

    pub fn remove_link(&mut self) {
        let next = links::remove_link(&self.state);
        self.on_change(next);
    }

    pub fn on_escape(&mut self) {
        let next = self.state.blur();
        self.on_change(next);
    }

    pub fn current_style(&self) -> StyleSet {
        self.state.current_inline_style()
    }

    pub fn current_block_type(&self) -> BlockType {
        commands::current_block_type(&self.state)
    }

    pub fn spellcheck(&self) -> bool {
        self.spellcheck
    }

    pub fn is_focused(&self) -> bool {
        self.state.selection().has_focus
    }

    pub fn editor_state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn to_html(&self) -> String {
        html::to_html(self.state.content())
    }

    /// The selection as HTML for the clipboard; `None` for a caret.
    pub fn copy_html(&self) -> Option<String> {
        paste::copy_html(&self.state)
    }

    /// End the session, handing back the preference store and host.
    pub fn into_parts(self) -> (Box<dyn PreferenceStore>, H) {
        (self.preferences, self.host)
    }
}

fn spellcheck_key(config: &EditorConfig) -> String {
    format!("{}-spellcheck", config.app_name)
}

fn decorated(state: EditorState) -> EditorState {
    state.with_decorator(Arc::new(LinkDecorator))
}
