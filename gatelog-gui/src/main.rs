use gatelog_lib::{RecordStore, StoreConfig};
use iced::{
    Element,
    Length::Fill,
    Task, application,
    widget::{button, column, row},
};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::screens::{
    all_records::{self, AllRecords},
    user_record::{self, UserRecord},
};

pub mod screens;

/// The identity whose history the user screen tracks. The screen itself
/// takes the name as a constructor argument; only the shell knows which
/// user this deployment cares about.
const TRACKED_USER: &str = "Adi Jain";

fn main() -> iced::Result {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let store = RecordStore::new(config);

    application(
        move || App::new(store.clone(), TRACKED_USER),
        App::update,
        App::view,
    )
    .title(App::title)
    .run()
}

#[derive(Debug, Clone)]
enum Message {
    ScreenSelected(Screen),
    // Components
    AllRecords(all_records::Message),
    UserRecord(user_record::Message),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    AllRecords,
    UserRecord,
}

struct App {
    title: String,
    active_screen: Screen,
    // Components
    all_records: AllRecords,
    user_record: UserRecord,
}

impl App {
    pub fn new(store: RecordStore, tracked_user: &str) -> (Self, Task<Message>) {
        let (all_records, all_records_task) = AllRecords::new(store.clone());
        let (user_record, user_record_task) = UserRecord::new(store, tracked_user);

        (
            Self {
                title: "Gatelog".into(),
                active_screen: Screen::AllRecords,
                all_records,
                user_record,
            },
            Task::batch([
                all_records_task.map(Message::AllRecords),
                user_record_task.map(Message::UserRecord),
            ]),
        )
    }

    // Update application state based on messages passed by view()
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Redirect messages to relevant child components
            Message::AllRecords(msg) => self.all_records.update(msg).map(Message::AllRecords),
            Message::UserRecord(msg) => self.user_record.update(msg).map(Message::UserRecord),
            Message::ScreenSelected(screen) => {
                self.active_screen = screen;
                Task::none()
            }
        }
    }

    // Render the application and pass along messages from components to update()
    pub fn view(&self) -> Element<'_, Message> {
        let screen = match self.active_screen {
            Screen::AllRecords => self.all_records.view().map(Message::AllRecords),
            Screen::UserRecord => self.user_record.view().map(Message::UserRecord),
        };

        column![
            // Nav bar
            row![
                nav_button("All Records", Screen::AllRecords, self.active_screen),
                nav_button("Tracked User", Screen::UserRecord, self.active_screen),
            ]
            .spacing(5)
            .padding(10),
            screen,
        ]
        .height(Fill)
        .into()
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }
}

fn nav_button(label: &str, target: Screen, active: Screen) -> Element<'_, Message> {
    let style = if target == active {
        button::primary
    } else {
        button::subtle
    };

    button(label)
        .style(style)
        .on_press(Message::ScreenSelected(target))
        .into()
}
