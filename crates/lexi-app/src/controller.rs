use std::fmt;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::console::{Console, ConsoleError};
use crate::editor::CardEditor;
use crate::field::{FieldKind, FieldRef};
use crate::template::{Section, format_card_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Init,
    EditFieldMenu,
    EditCardMenu,
    SelectProposition,
    WriteField,
    ListCards,
    SaveCard,
    SelectExample,
    EditExampleMenu,
    End,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Init => "init",
            State::EditFieldMenu => "editFieldMenu",
            State::EditCardMenu => "editCardMenu",
            State::SelectProposition => "selectProposition",
            State::WriteField => "writeField",
            State::ListCards => "listCards",
            State::SaveCard => "saveCard",
            State::SelectExample => "selectExample",
            State::EditExampleMenu => "editExampleMenu",
            State::End => "end",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    EditField,
    EditCard,
    SelectProposition,
    WriteField,
    ListCards,
    SaveCard,
    SelectExample,
    EditExample,
    Quit,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Event::EditField => "editField",
            Event::EditCard => "editCard",
            Event::SelectProposition => "selectProposition",
            Event::WriteField => "writeField",
            Event::ListCards => "listCards",
            Event::SaveCard => "saveCard",
            Event::SelectExample => "selectExample",
            Event::EditExample => "editExample",
            Event::Quit => "quit",
        };
        f.write_str(name)
    }
}

/// Destination of `event` fired in state `from`, `None` when the event is not allowed there.
pub fn transition(from: State, event: Event) -> Option<State> {
    use State as S;

    let to = match (event, from) {
        (
            Event::EditField,
            S::WriteField | S::SelectProposition | S::EditCardMenu | S::Init,
        ) => S::EditFieldMenu,
        (
            Event::EditCard,
            S::ListCards | S::EditFieldMenu | S::SaveCard | S::SelectExample,
        ) => S::EditCardMenu,
        (Event::SelectProposition, S::EditFieldMenu | S::EditExampleMenu) => S::SelectProposition,
        (Event::WriteField, S::EditFieldMenu | S::EditExampleMenu) => S::WriteField,
        (Event::Quit, S::EditCardMenu | S::SaveCard) => S::End,
        (Event::ListCards, S::EditCardMenu | S::Init) => S::ListCards,
        (Event::SaveCard, S::EditCardMenu) => S::SaveCard,
        (Event::SelectExample, S::EditCardMenu | S::EditExampleMenu) => S::SelectExample,
        (
            Event::EditExample,
            S::SelectExample | S::WriteField | S::SelectProposition,
        ) => S::EditExampleMenu,
        _ => return None,
    };

    Some(to)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event {event} is not allowed in state {state}")]
pub struct TransitionError {
    pub event: Event,
    pub state: State,
}

/// Current state plus the transition table. Refused events leave it untouched.
#[derive(Debug)]
pub struct StateMachine {
    current: State,
    previous: Option<State>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            current: State::Init,
            previous: None,
        }
    }

    pub fn current(&self) -> State {
        self.current
    }

    /// State the machine was in before the last transition
    pub fn previous(&self) -> Option<State> {
        self.previous
    }

    pub fn can(&self, event: Event) -> bool {
        transition(self.current, event).is_some()
    }

    pub fn fire(&mut self, event: Event) -> Result<State, TransitionError> {
        let to = transition(self.current, event).ok_or(TransitionError {
            event,
            state: self.current,
        })?;

        tracing::debug!(%event, from = %self.current, %to, "Transition");
        self.previous = Some(self.current);
        self.current = to;
        Ok(to)
    }

    /// Moves to `state` without going through the table and without entering it.
    pub fn force(&mut self, state: State) {
        tracing::debug!(from = %self.current, to = %state, "Forced transition");
        self.previous = Some(self.current);
        self.current = state;
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// No further interaction is possible
    #[error("console interrupted: {0}")]
    Interrupted(#[from] ConsoleError),

    #[error("event queue closed")]
    EventQueueClosed,

    #[error("selection {index} is out of range ({len} items)")]
    InvalidSelection { index: usize, len: usize },

    #[error("event loop stopped before the end state")]
    Aborted,
}

/// How a session begins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Start {
    /// Guided creation of a card with this title
    Create(String),
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardAction {
    EditTitle,
    EditDefinition,
    EditTranslations,
    EditExamples,
    Save,
    Delete,
    List,
    New,
    Quit,
}

const CARD_MENU: [(CardAction, &str); 9] = [
    (CardAction::EditTitle, "edit title"),
    (CardAction::EditDefinition, "edit definition"),
    (CardAction::EditTranslations, "edit translations"),
    (CardAction::EditExamples, "edit examples"),
    (CardAction::Save, "save"),
    (CardAction::Delete, "delete"),
    (CardAction::List, "list"),
    (CardAction::New, "new"),
    (CardAction::Quit, "quit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldAction {
    ShowPropositions,
    Edit,
    Validate,
    Cancel,
}

const FIELD_MENU: [(FieldAction, &str); 4] = [
    (FieldAction::ShowPropositions, "Show propositions"),
    (FieldAction::Edit, "Edit"),
    (FieldAction::Validate, "Validate"),
    (FieldAction::Cancel, "Cancel"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExampleAction {
    ShowSentences,
    EditExample,
    Translate,
    EditTranslation,
    Validate,
    Cancel,
    New,
}

const EXAMPLE_MENU: [(ExampleAction, &str); 7] = [
    (ExampleAction::ShowSentences, "Show sentences"),
    (ExampleAction::EditExample, "Edit example"),
    (ExampleAction::Translate, "Translate"),
    (ExampleAction::EditTranslation, "Edit translation"),
    (ExampleAction::Validate, "Validate"),
    (ExampleAction::Cancel, "Cancel"),
    (ExampleAction::New, "New"),
];

const CANCEL: &str = "cancel";
const NEW_TRANSLATION: &str = "new translation";

/// Interactive card editing session.
///
/// Entry actions never transition directly: they queue the next event, and
/// the single consumer of the queue performs the transition and runs the
/// entry action of the new state. The card and the current state are only
/// touched from that consumer.
pub struct CardController {
    editor: CardEditor,
    console: Arc<dyn Console>,
    fsm: StateMachine,
    active: FieldRef,
    guided: bool,
    events_tx: AsyncSender<Event>,
    events_rx: AsyncReceiver<Event>,
    done: Option<oneshot::Sender<Result<(), ControllerError>>>,
}

impl CardController {
    pub fn new(editor: CardEditor, console: Arc<dyn Console>) -> Self {
        let (events_tx, events_rx) = kanal::unbounded_async();

        Self {
            editor,
            console,
            fsm: StateMachine::new(),
            active: FieldRef::title(),
            guided: false,
            events_tx,
            events_rx,
            done: None,
        }
    }

    #[cfg(test)]
    pub fn editor(&self) -> &CardEditor {
        &self.editor
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.fsm.current()
    }

    #[cfg(test)]
    pub fn active_field(&self) -> FieldRef {
        self.active
    }

    #[cfg(test)]
    pub fn is_guided(&self) -> bool {
        self.guided
    }

    /// Runs a session until the end state, on a task of its own.
    pub async fn run(mut self, start: Start) -> Result<(), ControllerError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.done = Some(done_tx);
        self.start(start).await?;

        let mut controller = self;
        tokio::spawn(async move {
            if let Err(e) = controller.event_loop().await {
                tracing::error!("Event loop stopped: {e}");
                if let Some(done) = controller.done.take() {
                    let _ = done.send(Err(e));
                }
            }
        });

        done_rx.await.unwrap_or(Err(ControllerError::Aborted))
    }

    /// Queues the first event of a session.
    pub async fn start(&mut self, start: Start) -> Result<(), ControllerError> {
        match start {
            Start::Create(title) => {
                self.guided = true;
                self.active = FieldRef::title();
                if !title.is_empty()
                    && let Err(e) = self.editor.set_field(FieldRef::title(), &title)
                {
                    tracing::warn!("Unable to set title: {e}");
                }
                self.send(Event::EditField).await
            }
            Start::List => self.send(Event::ListCards).await,
        }
    }

    /// Handles one queued event, returning `false` when none was queued.
    #[cfg(test)]
    pub async fn step(&mut self) -> Result<bool, ControllerError> {
        let event = self
            .events_rx
            .try_recv()
            .map_err(|_| ControllerError::EventQueueClosed)?;

        match event {
            Some(event) => {
                self.handle(event).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn event_loop(&mut self) -> Result<(), ControllerError> {
        while self.fsm.current() != State::End {
            let event = self
                .events_rx
                .recv()
                .await
                .map_err(|_| ControllerError::EventQueueClosed)?;

            self.handle(event).await?;
        }

        Ok(())
    }

    async fn handle(&mut self, event: Event) -> Result<(), ControllerError> {
        let state = match self.fsm.fire(event) {
            Ok(to) => to,
            Err(e) => {
                tracing::warn!("{e}");
                self.fsm.current()
            }
        };

        self.enter(state).await
    }

    pub(crate) async fn send(&self, event: Event) -> Result<(), ControllerError> {
        tracing::trace!(
            %event,
            state = %self.fsm.current(),
            allowed = self.fsm.can(event),
            "Queue event"
        );

        self.events_tx
            .send(event)
            .await
            .map_err(|_| ControllerError::EventQueueClosed)
    }

    async fn enter(&mut self, state: State) -> Result<(), ControllerError> {
        match state {
            State::Init => Ok(()),
            State::EditFieldMenu => self.edit_field_menu().await,
            State::EditCardMenu => self.card_menu().await,
            State::SelectProposition => self.select_proposition().await,
            State::WriteField => self.write_field().await,
            State::ListCards => self.list_cards().await,
            State::SaveCard => self.save_card().await,
            State::SelectExample => self.select_example().await,
            State::EditExampleMenu => self.edit_example_menu().await,
            State::End => {
                self.finish();
                Ok(())
            }
        }
    }

    async fn choose<T: Copy>(&self, label: &str, options: &[(T, &str)]) -> Result<T, ControllerError> {
        let items: Vec<String> = options.iter().map(|(_, name)| name.to_string()).collect();
        let index = self.console.select(label, &items).await?;

        options
            .get(index)
            .map(|(action, _)| *action)
            .ok_or(ControllerError::InvalidSelection {
                index,
                len: options.len(),
            })
    }

    /// Index of the chosen item, `None` for the trailing cancel entry.
    async fn choose_or_cancel(
        &self,
        label: &str,
        mut items: Vec<String>,
    ) -> Result<Option<usize>, ControllerError> {
        let count = items.len();
        items.push(CANCEL.to_string());

        let index = self.console.select(label, &items).await?;
        match index {
            i if i < count => Ok(Some(i)),
            i if i == count => Ok(None),
            i => Err(ControllerError::InvalidSelection {
                index: i,
                len: items.len(),
            }),
        }
    }

    /// Back to the menu the active field is edited from.
    async fn route_back(&self) -> Result<(), ControllerError> {
        if self.active.kind.is_example() {
            self.send(Event::EditExample).await
        } else {
            self.send(Event::EditField).await
        }
    }

    async fn card_menu(&mut self) -> Result<(), ControllerError> {
        if self.guided {
            match self.active.kind.next() {
                Some(FieldKind::Example) => {
                    self.active = FieldRef::example(0);
                    return self.send(Event::SelectExample).await;
                }
                Some(kind) => {
                    self.active = FieldRef::new(kind, 0);
                    return self.send(Event::EditField).await;
                }
                None => {
                    tracing::debug!("Guided creation done");
                    self.guided = false;
                }
            }
        }

        self.console.print(&self.editor.render(Section::Card));

        match self.choose("Card", &CARD_MENU).await? {
            CardAction::EditTitle => {
                self.active = FieldRef::title();
                self.send(Event::EditField).await
            }
            CardAction::EditDefinition => {
                self.active = FieldRef::definition();
                self.send(Event::EditField).await
            }
            CardAction::EditTranslations => {
                self.active = FieldRef::translation(0);
                self.send(Event::EditField).await
            }
            CardAction::EditExamples => {
                self.active = FieldRef::example(0);
                self.send(Event::SelectExample).await
            }
            CardAction::Save => self.send(Event::SaveCard).await,
            CardAction::Delete => {
                if let Err(e) = self.editor.delete_card().await {
                    tracing::error!("Failed to delete card: {e}");
                    self.console.print("failed to delete card");
                }
                self.send(Event::ListCards).await
            }
            CardAction::List => self.send(Event::ListCards).await,
            CardAction::New => {
                self.guided = true;
                self.active = FieldRef::title();
                self.editor.reset_card();
                self.fsm.force(State::EditFieldMenu);
                self.send(Event::WriteField).await
            }
            CardAction::Quit => self.send(Event::Quit).await,
        }
    }

    async fn edit_field_menu(&mut self) -> Result<(), ControllerError> {
        self.console.print(&self.editor.render(Section::Field(self.active)));

        let options: Vec<(FieldAction, &str)> = FIELD_MENU
            .into_iter()
            .filter(|(action, _)| {
                *action != FieldAction::ShowPropositions || self.active.kind != FieldKind::Title
            })
            .collect();

        let label = format!("Edit field {}", self.active.kind);

        match self.choose(&label, &options).await? {
            FieldAction::ShowPropositions => self.send(Event::SelectProposition).await,
            FieldAction::Edit => {
                if self.active.kind == FieldKind::Translation {
                    self.active.index = self.select_translation().await?;
                }
                self.send(Event::WriteField).await
            }
            FieldAction::Validate => self.send(Event::EditCard).await,
            FieldAction::Cancel => {
                self.guided = false;
                self.send(Event::EditCard).await
            }
        }
    }

    /// Index of the translation to rewrite, the one past the last for a new one.
    async fn select_translation(&self) -> Result<usize, ControllerError> {
        let mut items = self.editor.card().translations.clone();
        let count = items.len();
        if count == 0 {
            return Ok(0);
        }

        items.push(NEW_TRANSLATION.to_string());
        let index = self.console.select("Select translation:", &items).await?;

        if index > count {
            return Err(ControllerError::InvalidSelection {
                index,
                len: items.len(),
            });
        }
        Ok(index)
    }

    async fn select_proposition(&mut self) -> Result<(), ControllerError> {
        let stop = CancellationToken::new();
        let busy = self.console.busy(stop.clone());

        let propositions = tokio::select! {
            propositions = self.editor.get_propositions(self.active) => Some(propositions),
            _ = self.console.interrupted() => None,
        };

        stop.cancel();
        if let Err(e) = busy.await {
            tracing::error!("Busy indicator failed: {e}");
        }

        let Some(propositions) = propositions else {
            return Err(ConsoleError::Interrupted.into());
        };

        let propositions = match propositions {
            Ok(propositions) if propositions.is_empty() => {
                self.console.print(&format!("No propositions for {}", self.active.kind));
                return self.route_back().await;
            }
            Ok(propositions) => propositions,
            Err(e) => {
                tracing::warn!("Unable to get propositions: {e}");
                self.console.print(&e.to_string());
                return self.route_back().await;
            }
        };

        let label = format!("Select {}:", self.active.kind);

        if let Some(choice) = self.choose_or_cancel(&label, propositions).await? {
            if let Err(e) = self.editor.set_proposition(self.active, choice).await {
                tracing::error!("Failed to set proposition: {e}");
                self.console.print(&e.to_string());
            }
        }

        self.route_back().await
    }

    async fn write_field(&mut self) -> Result<(), ControllerError> {
        self.console.print(&self.editor.render(Section::Field(self.active)));

        let current = self.editor.get_field(self.active);
        let value = self
            .console
            .prompt(&self.active.kind.to_string(), &current)
            .await?;

        if let Err(e) = self.editor.set_field(self.active, &value) {
            tracing::warn!("Error setting field: {e}");
            self.console.print(&e.to_string());
        }

        self.route_back().await
    }

    async fn list_cards(&mut self) -> Result<(), ControllerError> {
        let mut cards = self.editor.list_cards().await;

        if cards.is_empty() {
            self.console.print("No cards yet");
            return self.send(Event::EditCard).await;
        }

        let items = format_card_list(&cards);

        if let Some(choice) = self.choose_or_cancel("Select card:", items).await? {
            self.guided = false;
            self.editor.set_card(cards.swap_remove(choice));
        }

        self.send(Event::EditCard).await
    }

    async fn save_card(&mut self) -> Result<(), ControllerError> {
        match self.editor.save_card().await {
            Ok(()) => self.console.print("Card saved"),
            Err(e) => {
                tracing::error!("Failed to save card: {e}");
                self.console.print(&format!("failed to save card: {e}"));
            }
        }

        self.send(Event::EditCard).await
    }

    async fn select_example(&mut self) -> Result<(), ControllerError> {
        let count = self.editor.card().examples.len();

        if count == 0 {
            // Leaving an empty example menu must not bounce straight back into it
            if self.fsm.previous() == Some(State::EditExampleMenu) {
                return self.send(Event::EditCard).await;
            }

            self.active = FieldRef::example(0);
            return self.send(Event::EditExample).await;
        }

        self.console.print(&self.editor.render(Section::Examples));

        let items = (1..=count).map(|i| i.to_string()).collect();

        match self.choose_or_cancel("Select example", items).await? {
            Some(index) => {
                self.active = FieldRef::example(index);
                self.send(Event::EditExample).await
            }
            None => self.send(Event::EditCard).await,
        }
    }

    async fn edit_example_menu(&mut self) -> Result<(), ControllerError> {
        let index = self.active.index;
        self.console.print(&self.editor.render(Section::Field(FieldRef::example(index))));

        let label = format!("Edit example {}", index + 1);

        match self.choose(&label, &EXAMPLE_MENU).await? {
            ExampleAction::ShowSentences => {
                self.active = FieldRef::example(index);
                self.send(Event::SelectProposition).await
            }
            ExampleAction::EditExample => {
                self.active = FieldRef::example(index);
                self.send(Event::WriteField).await
            }
            ExampleAction::Translate => {
                self.active = FieldRef::example_translation(index);
                self.send(Event::SelectProposition).await
            }
            ExampleAction::EditTranslation => {
                self.active = FieldRef::example_translation(index);
                self.send(Event::WriteField).await
            }
            ExampleAction::Validate | ExampleAction::Cancel => {
                self.send(Event::SelectExample).await
            }
            ExampleAction::New => {
                self.active = FieldRef::example(self.editor.card().examples.len());
                self.send(Event::WriteField).await
            }
        }
    }

    fn finish(&mut self) {
        tracing::info!("Session ended");
        if let Some(done) = self.done.take() {
            let _ = done.send(Ok(()));
        }
    }
}
