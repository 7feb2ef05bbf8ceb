//! Every check-in row in the store, listed in the order the service returns.

use gatelog_lib::RecordStore;
use iced::{
    Element,
    Length::Fill,
    Task,
    widget::{button, column, text},
};
use tokio::task::spawn_blocking;
use tracing::debug;

use super::{NO_ENTRIES_TEXT, State, entry_list, fetched_state};

#[derive(Debug, Clone)]
pub enum Message {
    RefreshPressed,
    Fetched { generation: u64, state: State },
}

pub struct AllRecords {
    store: RecordStore,
    state: State,
    /// Tags in-flight fetches; a result from a superseded fetch is dropped.
    generation: u64,
}

impl AllRecords {
    pub fn new(store: RecordStore) -> (Self, Task<Message>) {
        let mut screen = Self {
            store,
            state: State::Loading,
            generation: 0,
        };
        let task = screen.start_fetch();

        (screen, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RefreshPressed => self.start_fetch(),
            Message::Fetched { generation, state } => {
                if generation == self.generation {
                    self.state = state;
                } else {
                    debug!(
                        generation,
                        current = self.generation,
                        "dropping superseded fetch result"
                    );
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let body: Element<'_, Message> = match &self.state {
            State::Loading => text("Loading entries...").into(),
            State::Error(message) => text(message).into(),
            State::Empty => text(NO_ENTRIES_TEXT).into(),
            State::Loaded(entries) => entry_list(entries),
        };

        column![
            text("All User History").size(24),
            button("Refresh").on_press(Message::RefreshPressed),
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
        list_entries(&self.store, self.generation)
    }
}

fn list_entries(store: &RecordStore, generation: u64) -> Task<Message> {
    let store = store.clone();
    Task::perform(
        async move {
            spawn_blocking(move || fetched_state(store.list_all()))
                .await
                .unwrap_or_else(|err| State::Error(format!("entry fetch panicked: {err}")))
        },
        move |state| Message::Fetched { generation, state },
    )
}

#[cfg(test)]
mod tests {
    use super::{AllRecords, Message, State};
    use chrono::{NaiveDate, NaiveTime};
    use gatelog_lib::{Entry, RecordStore, StoreConfig};

    fn screen() -> AllRecords {
        let config = StoreConfig::new("http://127.0.0.1:9", "test-key").expect("config");
        let (screen, _task) = AllRecords::new(RecordStore::new(config));
        screen
    }

    fn entry(id: i64, user: &str) -> Entry {
        Entry {
            id,
            user_name: user.into(),
            room_no: "204".into(),
            entry_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            entry_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            is_locked: false,
        }
    }

    fn fetched(generation: u64, state: State) -> Message {
        Message::Fetched { generation, state }
    }

    #[test]
    fn starts_loading() {
        let screen = screen();

        assert!(matches!(screen.state, State::Loading));
        assert_eq!(screen.generation, 1);
    }

    #[test]
    fn applies_rows_verbatim_and_in_order() {
        let mut screen = screen();
        let rows = vec![entry(7, "a"), entry(2, "b"), entry(5, "c")];

        let _ = screen.update(fetched(1, State::Loaded(rows.clone())));

        match &screen.state {
            State::Loaded(held) => assert_eq!(held, &rows),
            other => panic!("expected loaded state, got {other:?}"),
        }
    }

    #[test]
    fn empty_fetch_shows_empty_not_error() {
        let mut screen = screen();

        let _ = screen.update(fetched(1, State::Empty));

        assert!(matches!(screen.state, State::Empty));
    }

    #[test]
    fn failed_fetch_does_not_stay_loading() {
        let mut screen = screen();

        let _ = screen.update(fetched(1, State::Error("JWT expired".into())));

        match &screen.state {
            State::Error(message) => assert_eq!(message, "JWT expired"),
            other => panic!("expected error state, got {other:?}"),
        }
    }

    #[test]
    fn refresh_supersedes_the_in_flight_fetch() {
        let mut screen = screen();

        // Refresh while the initial fetch is still in flight.
        let _ = screen.update(Message::RefreshPressed);
        assert!(matches!(screen.state, State::Loading));
        assert_eq!(screen.generation, 2);

        // The superseded initial fetch resolves late and is dropped.
        let _ = screen.update(fetched(1, State::Loaded(vec![entry(1, "stale")])));
        assert!(matches!(screen.state, State::Loading));

        // The refresh's own result still applies.
        let _ = screen.update(fetched(2, State::Loaded(vec![entry(2, "fresh")])));
        match &screen.state {
            State::Loaded(held) => assert_eq!(held.first().expect("one row").id, 2),
            other => panic!("expected loaded state, got {other:?}"),
        }
    }
}
