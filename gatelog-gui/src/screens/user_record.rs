//! One user's check-in history, plus the lock toggle for that user.

use gatelog_lib::RecordStore;
use iced::{
    Element,
    Length::Fill,
    Task,
    widget::{button, column, row, text},
};
use tokio::task::spawn_blocking;
use tracing::debug;

use super::{NO_ENTRIES_TEXT, State, entry_list, fetched_state};

#[derive(Debug, Clone)]
pub enum Message {
    RefreshPressed,
    LockTogglePressed,
    Fetched { generation: u64, state: State },
    /// Outcome of a lock write: the value the store acknowledged, or the
    /// failure's message.
    LockUpdated(Result<bool, String>),
}

pub struct UserRecord {
    store: RecordStore,
    user_name: String,
    state: State,
    /// Tags in-flight fetches; a result from a superseded fetch is dropped.
    generation: u64,
    /// Lock state for the tracked user: whatever the first row of the last
    /// successful fetch reported. Rows beyond the first are not consulted.
    locked: bool,
}

impl UserRecord {
    /// The tracked identity is a required argument; this screen has no
    /// baked-in user name.
    pub fn new(store: RecordStore, user_name: impl Into<String>) -> (Self, Task<Message>) {
        let mut screen = Self {
            store,
            user_name: user_name.into(),
            state: State::Loading,
            generation: 0,
            locked: false,
        };
        let task = screen.start_fetch();

        (screen, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RefreshPressed => self.start_fetch(),
            Message::LockTogglePressed => update_lock(&self.store, &self.user_name, !self.locked),
            Message::Fetched { generation, state } => {
                if generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        "dropping superseded fetch result"
                    );
                    return Task::none();
                }

                // Lock state for the user is read off the first returned row;
                // an empty fetch leaves the flag as it was.
                if let State::Loaded(entries) = &state {
                    if let Some(first) = entries.first() {
                        self.locked = first.is_locked;
                    }
                }
                self.state = state;
                Task::none()
            }
            Message::LockUpdated(Ok(locked)) => {
                // The store acknowledged the write; mirror it immediately,
                // then re-fetch to resynchronize with the rows.
                self.locked = locked;
                self.start_fetch()
            }
            Message::LockUpdated(Err(message)) => {
                self.state = State::Error(format!("Failed to update lock state: {message}"));
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let lock_button = if self.locked {
            button("Unlock User").style(button::danger)
        } else {
            button("Lock User").style(button::success)
        };

        let body: Element<'_, Message> = match &self.state {
            State::Loading => text("Loading entries...").into(),
            State::Error(message) => text(message).into(),
            State::Empty => text(NO_ENTRIES_TEXT).into(),
            State::Loaded(entries) => entry_list(entries),
        };

        column![
            text(format!("User History: {}", self.user_name)).size(24),
            row![
                button("Refresh").on_press(Message::RefreshPressed),
                lock_button.on_press(Message::LockTogglePressed),
            ]
            .spacing(10),
            body,
        ]
        .spacing(10)
        .padding(20)
        .height(Fill)
        .into()
    }

    fn start_fetch(&mut self) -> Task<Message> {
        self.generation += 1;
        self.state = State::Loading;
        list_user_entries(&self.store, &self.user_name, self.generation)
    }
}

fn list_user_entries(store: &RecordStore, user_name: &str, generation: u64) -> Task<Message> {
    let store = store.clone();
    let user_name = user_name.to_owned();
    Task::perform(
        async move {
            spawn_blocking(move || fetched_state(store.list_by_user(&user_name)))
                .await
                .unwrap_or_else(|err| State::Error(format!("entry fetch panicked: {err}")))
        },
        move |state| Message::Fetched { generation, state },
    )
}

fn update_lock(store: &RecordStore, user_name: &str, locked: bool) -> Task<Message> {
    let store = store.clone();
    let user_name = user_name.to_owned();
    Task::perform(
        async move {
            match spawn_blocking(move || store.set_locked(&user_name, locked)).await {
                Ok(Ok(())) => Ok(locked),
                Ok(Err(err)) => Err(err.to_string()),
                Err(err) => Err(format!("lock update panicked: {err}")),
            }
        },
        Message::LockUpdated,
    )
}

#[cfg(test)]
mod tests {
    use super::{Message, State, UserRecord};
    use chrono::{NaiveDate, NaiveTime};
    use gatelog_lib::{Entry, RecordStore, StoreConfig};

    const USER: &str = "Adi Jain";

    fn screen() -> UserRecord {
        let config = StoreConfig::new("http://127.0.0.1:9", "test-key").expect("config");
        let (screen, _task) = UserRecord::new(RecordStore::new(config), USER);
        screen
    }

    fn entry(id: i64, locked: bool) -> Entry {
        Entry {
            id,
            user_name: USER.into(),
            room_no: "204".into(),
            entry_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            entry_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            is_locked: locked,
        }
    }

    fn fetched(generation: u64, state: State) -> Message {
        Message::Fetched { generation, state }
    }

    #[test]
    fn starts_loading_and_unlocked() {
        let screen = screen();

        assert!(matches!(screen.state, State::Loading));
        assert!(!screen.locked);
        assert_eq!(screen.user_name, USER);
    }

    #[test]
    fn mirrors_the_first_rows_lock_flag() {
        let mut screen = screen();

        let _ = screen.update(fetched(
            1,
            State::Loaded(vec![entry(1, true), entry(2, false)]),
        ));

        assert!(screen.locked);
    }

    #[test]
    fn empty_fetch_leaves_the_lock_flag_alone() {
        let mut screen = screen();
        let _ = screen.update(fetched(1, State::Loaded(vec![entry(1, true)])));
        assert!(screen.locked);

        let _ = screen.update(Message::RefreshPressed);
        let _ = screen.update(fetched(2, State::Empty));

        assert!(matches!(screen.state, State::Empty));
        assert!(screen.locked);
    }

    #[test]
    fn acknowledged_lock_write_is_mirrored_and_refetches() {
        let mut screen = screen();
        let _ = screen.update(fetched(1, State::Loaded(vec![entry(1, false)])));
        assert!(!screen.locked);

        let _ = screen.update(Message::LockUpdated(Ok(true)));

        assert!(screen.locked);
        // The resynchronizing fetch has already started.
        assert!(matches!(screen.state, State::Loading));
        assert_eq!(screen.generation, 2);
    }

    #[test]
    fn failed_lock_write_keeps_the_flag_and_surfaces_the_error() {
        let mut screen = screen();
        let _ = screen.update(fetched(1, State::Loaded(vec![entry(1, false)])));

        let _ = screen.update(Message::LockUpdated(Err("JWT expired".into())));

        assert!(!screen.locked);
        match &screen.state {
            State::Error(message) => {
                assert_eq!(message, "Failed to update lock state: JWT expired");
            }
            other => panic!("expected error state, got {other:?}"),
        }
    }

    #[test]
    fn superseded_fetch_cannot_clobber_the_resync() {
        let mut screen = screen();

        // A toggle ack starts the generation-2 fetch; the stale generation-1
        // fetch resolves afterwards and is dropped.
        let _ = screen.update(Message::LockUpdated(Ok(true)));
        let _ = screen.update(fetched(1, State::Loaded(vec![entry(1, false)])));

        assert!(matches!(screen.state, State::Loading));
        assert!(screen.locked);

        // The resync's own result still applies.
        let _ = screen.update(fetched(2, State::Loaded(vec![entry(1, true)])));
        assert!(screen.locked);
        assert!(matches!(screen.state, State::Loaded(_)));
    }
}
