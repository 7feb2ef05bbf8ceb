//! The two entry-list screens.
//!
//! Both are Elm-style components: a `Message` enum, a `new` that returns the
//! initial fetch task, an `update`, and a `view`. They share one fetch state
//! machine; the user screen layers the lock toggle on top of it.

use gatelog_lib::Entry;
use iced::{
    Element,
    Length::Fill,
    widget::{Column, column, container, scrollable, text},
};

pub mod all_records;
pub mod user_record;

/// Shown in place of the list when a fetch returns no rows.
const NO_ENTRIES_TEXT: &str = "No entry records found";

/// Where a screen is in its fetch cycle.
///
/// `Loading` is re-entered on every refresh; there is no terminal state.
#[derive(Debug, Clone)]
pub enum State {
    Loading,
    Error(String),
    Empty,
    Loaded(Vec<Entry>),
}

/// Map a finished fetch onto the next screen state.
///
/// Rows are held exactly as the store returned them; an empty result set is
/// `Empty`, never an error.
fn fetched_state(result: gatelog_lib::Result<Vec<Entry>>) -> State {
    match result {
        Ok(entries) if entries.is_empty() => State::Empty,
        Ok(entries) => State::Loaded(entries),
        Err(err) => State::Error(err.to_string()),
    }
}

/// The list body below a screen's header: one card per entry, scrollable.
fn entry_list<'a, Message: 'a>(entries: &'a [Entry]) -> Element<'a, Message> {
    scrollable(Column::with_children(entries.iter().map(entry_card)).spacing(10))
        .height(Fill)
        .into()
}

fn entry_card<'a, Message: 'a>(entry: &'a Entry) -> Element<'a, Message> {
    container(
        column![
            text(format!("User: {}", entry.user_name)),
            text(format!("Room No: {}", entry.room_no)),
            text(format!("Entry Date: {}", entry.date_str())),
            text(format!("Entry Time: {}", entry.time_str())),
        ]
        .spacing(5),
    )
    .padding(15)
    .width(Fill)
    .style(container::rounded_box)
    .into()
}
